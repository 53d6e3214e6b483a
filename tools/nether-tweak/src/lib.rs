//! nether-tweak library
//!
//! Line-oriented numeral rewriting for text assets such as sprite-sheet
//! definitions. Exposed as a library so other tools can run the same rules
//! in-process.

pub mod error;
pub mod numeral;
pub mod rules;
pub mod transform;

pub use error::{NumeralError, TweakError};
pub use numeral::{Numeral, format_float};
pub use rules::{CoordinateOffset, NumeralRule, ScaleByConstant};
pub use transform::{
    Substitution, TransformStats, find_substitution, open_input, transform_file, transform_line,
    transform_stream,
};

//! Line-by-line numeral substitution
//!
//! Input is streamed one line at a time with `read_until(b'\n')`, so every
//! byte of a line (including `\r\n` or a missing final newline) is written
//! back except the one token a rule replaces. Lines are never dropped,
//! merged, or reordered.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::ops::Range;
use std::path::Path;

use crate::error::{NumeralError, TweakError};
use crate::numeral::Numeral;
use crate::rules::NumeralRule;

/// Counters for one pass over an input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformStats {
    /// Lines read (and written)
    pub lines: usize,
    /// Lines whose numeral was rewritten
    pub substitutions: usize,
}

/// A single replacement on a line
#[derive(Debug, Clone, PartialEq)]
pub struct Substitution {
    /// Byte span of the matched token
    pub range: Range<usize>,
    pub value: Numeral,
}

impl Substitution {
    /// Write `line` with the token span replaced.
    pub fn write_to<W: Write + ?Sized>(&self, line: &[u8], out: &mut W) -> std::io::Result<()> {
        out.write_all(&line[..self.range.start])?;
        write!(out, "{}", self.value)?;
        out.write_all(&line[self.range.end..])
    }
}

/// Find the substitution `rule` makes on `line`, if any.
pub fn find_substitution<R: NumeralRule + ?Sized>(
    rule: &R,
    line: &[u8],
) -> Result<Option<Substitution>, NumeralError> {
    if rule.skips(line) {
        tracing::trace!(rule = rule.name(), "line skipped");
        return Ok(None);
    }

    let Some(found) = rule.pattern().find(line) else {
        return Ok(None);
    };
    let token = found.as_bytes();

    let value = std::str::from_utf8(token)
        .ok()
        .and_then(|text| text.parse::<f64>().ok())
        .ok_or_else(|| NumeralError::new(token, "not a number"))?;
    if !value.is_finite() {
        return Err(NumeralError::new(token, "value is not finite"));
    }

    let replacement = rule
        .replace(line, value)
        .ok_or_else(|| NumeralError::new(token, "result is out of range"))?;
    if !replacement.is_finite() {
        return Err(NumeralError::new(token, "result is not finite"));
    }

    Ok(Some(Substitution {
        range: found.range(),
        value: replacement,
    }))
}

/// Apply `rule` to a single line.
pub fn transform_line<'a, R: NumeralRule + ?Sized>(
    rule: &R,
    line: &'a [u8],
) -> Result<Cow<'a, [u8]>, NumeralError> {
    match find_substitution(rule, line)? {
        Some(substitution) => {
            let range = substitution.range;
            let mut out = Vec::with_capacity(line.len() + 8);
            out.extend_from_slice(&line[..range.start]);
            out.extend_from_slice(substitution.value.to_string().as_bytes());
            out.extend_from_slice(&line[range.end..]);
            Ok(Cow::Owned(out))
        }
        None => Ok(Cow::Borrowed(line)),
    }
}

/// Stream `input` through `rule` into `output`.
///
/// Each line is written as soon as it is processed. On a parse failure the
/// offending line is not written and processing stops.
pub fn transform_stream<R, I, O>(
    rule: &R,
    mut input: I,
    output: &mut O,
) -> Result<TransformStats, TweakError>
where
    R: NumeralRule + ?Sized,
    I: BufRead,
    O: Write + ?Sized,
{
    let mut stats = TransformStats::default();
    let mut line = Vec::new();

    loop {
        line.clear();
        let read = input.read_until(b'\n', &mut line).map_err(TweakError::Read)?;
        if read == 0 {
            break;
        }
        stats.lines += 1;

        let substitution = find_substitution(rule, &line).map_err(|source| TweakError::Parse {
            line: stats.lines,
            source,
        })?;

        match substitution {
            Some(substitution) => {
                tracing::debug!(
                    "line {}: {} -> {}",
                    stats.lines,
                    String::from_utf8_lossy(&line[substitution.range.clone()]),
                    substitution.value
                );
                substitution.write_to(&line, output)?;
                stats.substitutions += 1;
            }
            None => output.write_all(&line)?,
        }
    }

    output.flush()?;
    Ok(stats)
}

/// Open an input file for streaming.
///
/// The first buffer is read before returning, so inputs that open but cannot
/// be read (directories, for one) fail here rather than mid-stream.
pub fn open_input(path: &Path) -> Result<BufReader<File>, TweakError> {
    let file_access = |source: std::io::Error| TweakError::FileAccess {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(file_access)?;
    let mut reader = BufReader::new(file);
    reader.fill_buf().map_err(file_access)?;
    Ok(reader)
}

/// Stream the file at `path` through `rule` into `output`.
///
/// The file handle is held only for the duration of the call.
pub fn transform_file<R, O>(rule: &R, path: &Path, output: &mut O) -> Result<TransformStats, TweakError>
where
    R: NumeralRule + ?Sized,
    O: Write + ?Sized,
{
    let reader = open_input(path)?;
    transform_stream(rule, reader, output).map_err(|err| err.with_input_path(path))
}

use std::fmt::Write;

use crate::error::DalError;
use crate::types::{Params, SqlValue};

/// Positional placeholder style of the target driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// PostgreSQL-style placeholders like `$1`.
    Postgres,
    /// SQLite-style placeholders like `?1` (also used by LibSQL/Turso).
    Sqlite,
}

/// SQL text after placeholder rewriting, paired with its ordered arguments.
///
/// Invariant: `args[i]` binds to positional marker `i + 1` in `sql`; the
/// counts always match because both are produced by the same scan.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundStatement {
    /// The rewritten SQL text with positional placeholders
    pub sql: String,
    /// The arguments, one per placeholder occurrence, in textual order
    pub args: Vec<SqlValue>,
}

/// Rewrite `:name` placeholders into positional form and collect arguments.
///
/// The text is scanned left to right; each occurrence gets the next 1-based
/// positional index and one lookup in `params` (repeated names are fetched
/// once per occurrence). Placeholders inside string literals, quoted
/// identifiers, `--` and `/* */` comments, and dollar-quoted blocks are left
/// untouched, as are `::` casts. Binding is deterministic: mapping iteration
/// order never matters, only placeholder order in the text.
///
/// # Errors
///
/// Returns `DalError::MissingParameter` when a referenced name has no entry
/// in `params`.
pub fn bind(
    sql: &str,
    params: Option<&Params>,
    style: PlaceholderStyle,
) -> Result<BoundStatement, DalError> {
    let mut out: Option<String> = None;
    // start of the literal text not yet copied into `out`; always sits on an
    // ASCII boundary (`:` or the byte after an identifier), so slice copies
    // keep multi-byte UTF-8 sequences intact
    let mut span = 0;
    let mut args: Vec<SqlValue> = Vec::new();
    let mut state = State::Normal;
    let mut idx = 0;
    let bytes = sql.as_bytes();

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                _ if is_line_comment_start(bytes, idx) => state = State::LineComment,
                _ if is_block_comment_start(bytes, idx) => {
                    state = State::BlockComment(1);
                    idx += 1; // consume the `*` so `/*/` cannot self-close
                }
                b'$' => {
                    if let Some((tag, advance)) = try_start_dollar_quote(bytes, idx) {
                        state = State::DollarQuoted(tag);
                        idx = advance;
                    }
                }
                b':' => {
                    if bytes.get(idx + 1) == Some(&b':') {
                        // `::` cast, not a placeholder
                        idx += 1;
                    } else if let Some((name_end, name)) = scan_identifier(bytes, idx + 1) {
                        let value = params
                            .and_then(|p| p.get(name))
                            .ok_or_else(|| DalError::MissingParameter(name.to_string()))?
                            .clone();
                        args.push(value);
                        let buf = out.get_or_insert_with(|| String::with_capacity(sql.len()));
                        buf.push_str(&sql[span..idx]);
                        let marker = match style {
                            PlaceholderStyle::Postgres => '$',
                            PlaceholderStyle::Sqlite => '?',
                        };
                        let _ = write!(buf, "{marker}{}", args.len());
                        span = name_end;
                        idx = name_end - 1;
                    }
                }
                _ => {}
            },
            State::SingleQuoted => {
                if b == b'\'' {
                    if bytes.get(idx + 1) == Some(&b'\'') {
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::DoubleQuoted => {
                if b == b'"' {
                    if bytes.get(idx + 1) == Some(&b'"') {
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if is_block_comment_start(bytes, idx) {
                    state = State::BlockComment(depth + 1);
                    idx += 1;
                } else if is_block_comment_end(bytes, idx) {
                    if depth == 1 {
                        state = State::Normal;
                    } else {
                        state = State::BlockComment(depth - 1);
                    }
                    idx += 1;
                }
            }
            State::DollarQuoted(ref tag) => {
                if b == b'$' && matches_tag(bytes, idx, tag) {
                    let skip = tag.len() + 1;
                    state = State::Normal;
                    idx += skip;
                }
            }
        }

        idx += 1;
    }

    let sql = match out {
        Some(mut buf) => {
            buf.push_str(&sql[span..]);
            buf
        }
        None => sql.to_string(),
    };

    Ok(BoundStatement { sql, args })
}

#[derive(Clone)]
enum State {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    LineComment,
    BlockComment(u32),
    DollarQuoted(String),
}

fn is_line_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'-') && bytes.get(idx + 1) == Some(&b'-')
}

fn is_block_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'/') && bytes.get(idx + 1) == Some(&b'*')
}

fn is_block_comment_end(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'*') && bytes.get(idx + 1) == Some(&b'/')
}

fn scan_identifier(bytes: &[u8], start: usize) -> Option<(usize, &str)> {
    let first = *bytes.get(start)?;
    if !(first.is_ascii_alphabetic() || first == b'_') {
        return None;
    }
    let mut idx = start + 1;
    while idx < bytes.len() && (bytes[idx].is_ascii_alphanumeric() || bytes[idx] == b'_') {
        idx += 1;
    }
    std::str::from_utf8(&bytes[start..idx])
        .ok()
        .map(|name| (idx, name))
}

fn try_start_dollar_quote(bytes: &[u8], start: usize) -> Option<(String, usize)> {
    let mut idx = start + 1;
    while idx < bytes.len() && bytes[idx] != b'$' {
        let b = bytes[idx];
        if !(b.is_ascii_alphanumeric() || b == b'_') {
            return None;
        }
        idx += 1;
    }

    if idx < bytes.len() && bytes[idx] == b'$' {
        let tag = String::from_utf8(bytes[start + 1..idx].to_vec()).ok()?;
        Some((tag, idx))
    } else {
        None
    }
}

fn matches_tag(bytes: &[u8], idx: usize, tag: &str) -> bool {
    let end = idx + 1 + tag.len();
    end < bytes.len()
        && bytes[idx + 1..=end].starts_with(tag.as_bytes())
        && bytes.get(end) == Some(&b'$')
}

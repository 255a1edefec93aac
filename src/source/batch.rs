//! Decoding of `mysql --batch --skip-column-names` output.
//!
//! Batch mode writes one row per line with tab-separated fields. Inside a
//! field, backslash, tab, newline and NUL are escaped as `\\`, `\t`, `\n` and
//! `\0`, and SQL NULL prints as the bare word `NULL`.

use crate::{
    constants::*,
    error::{CallflowError, CallflowResult},
};

/// Decode one escaped batch field. NULL becomes the empty string.
pub(crate) fn decode_field(raw: &str) -> String {
    if raw == NULL_MARKER {
        return String::new();
    }
    if !raw.contains('\\') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Split batch output into decoded rows.
///
/// With `expected_fields` set, every row must have exactly that many fields.
pub(crate) fn parse_rows(
    output: &str,
    expected_fields: Option<usize>,
) -> CallflowResult<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    for (index, line) in output
        .split(ROW_SEPARATOR)
        .enumerate()
    {
        let line = line
            .strip_suffix('\r')
            .unwrap_or(line);
        if line.is_empty() {
            continue;
        }

        let row: Vec<String> = line
            .split(FIELD_SEPARATOR)
            .map(decode_field)
            .collect();

        if let Some(expected) = expected_fields {
            if row.len() != expected {
                return Err(CallflowError::MalformedOutput {
                    line: index + 1,
                    expected,
                    found: row.len(),
                });
            }
        }
        rows.push(row);
    }

    Ok(rows)
}

/// Pull the numeric code out of `ERROR 2002 (HY000): Can't connect ...`
pub(crate) fn client_error_code(stderr: &str) -> Option<u32> {
    let rest = stderr
        .lines()
        .find_map(|line| {
            line.trim()
                .strip_prefix("ERROR ")
        })?;
    let digits: String = rest
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits
        .parse()
        .ok()
}

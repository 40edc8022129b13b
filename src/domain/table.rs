//! Parser for the ASCII tables printed by OpenStack CLIs
//!
//! ```text
//! +----+-------+
//! | ID | Name  |
//! +----+-------+
//! | 1  | gold  |
//! +----+-------+
//! ```
//!
//! Column spans come from the `+` positions of the delimiter line, so cell
//! text containing `|` survives intact.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::domain::{DomainError, DomainResult, Record};

static DELIMITER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+-[+-]+-\+$").expect("valid delimiter pattern"));

/// Headers plus rows of a single table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub values: Vec<Vec<String>>,
}

/// Column spans `(start, end)` in chars, between consecutive `+`.
fn columns(delimiter: &str) -> Vec<(usize, usize)> {
    let plus: Vec<usize> = delimiter
        .chars()
        .enumerate()
        .filter(|(_, c)| *c == '+')
        .map(|(i, _)| i)
        .collect();
    plus.windows(2).map(|w| (w[0] + 1, w[1])).collect()
}

fn cell(chars: &[char], (start, end): (usize, usize)) -> String {
    let end = end.min(chars.len());
    let start = start.min(end);
    chars[start..end].iter().collect::<String>().trim().to_string()
}

/// Parse CLI output into a [`Table`].
///
/// The first row after a delimiter line is the header row.
pub fn table(output: &str) -> DomainResult<Table> {
    let mut result = Table::default();
    let mut spans: Option<Vec<(usize, usize)>> = None;
    let mut headers_seen = false;

    for (idx, line) in output.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if DELIMITER_LINE.is_match(line) {
            spans = Some(columns(line));
            continue;
        }
        if !line.contains('|') {
            if !line.trim().is_empty() {
                debug!("table: skipping invalid table line: {}", line);
            }
            continue;
        }
        let spans = spans.as_ref().ok_or_else(|| DomainError::TableParse {
            line: idx + 1,
            message: "row before delimiter line".to_string(),
        })?;

        let chars: Vec<char> = line.chars().collect();
        let row: Vec<String> = spans.iter().map(|span| cell(&chars, *span)).collect();
        if headers_seen {
            result.values.push(row);
        } else {
            result.headers = row;
            headers_seen = true;
        }
    }

    Ok(result)
}

/// Parse CLI output into one [`Record`] per row.
pub fn listing(output: &str) -> DomainResult<Vec<Record>> {
    let table = table(output)?;
    Ok(table
        .values
        .into_iter()
        .map(|row| table.headers.iter().cloned().zip(row).collect())
        .collect())
}

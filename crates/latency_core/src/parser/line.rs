//! Quote-aware delimited line parser.
//!
//! Follows RFC 4180 quoting within a single line:
//! - a `"` toggles the quoted state
//! - `""` inside a quoted field is a literal quote
//! - the delimiter inside quotes is part of the field
//!
//! Fields are trimmed after unquoting.

/// Split a line on `delimiter`, honoring double quotes.
pub fn parse_delimited_line(line: &str, delimiter: char) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '"' {
            if in_quotes && chars.peek() == Some(&'"') {
                current.push('"');
                chars.next();
            } else {
                in_quotes = !in_quotes;
            }
        } else if c == delimiter && !in_quotes {
            cells.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    cells.push(current);

    cells.into_iter().map(|c| c.trim().to_string()).collect()
}

/// Split a comma-separated line.
pub fn parse_csv_line(line: &str) -> Vec<String> {
    parse_delimited_line(line, ',')
}

use anyhow::Result;

use crate::schema::Table;

/// Strip markdown noise from a raw model reply, keeping only lines that
/// plausibly belong to a CSV table.
///
/// Line predicates, applied in order:
/// 1. drop the line if its trimmed form is empty or begins with a code
///    fence marker (```` ``` ````);
/// 2. keep the line only if it contains a comma or begins with a double
///    quote.
pub fn clean_reply(reply: &str) -> String {
    reply
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with("```") {
                return false;
            }
            line.contains(',') || line.starts_with('"')
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse a raw model reply into a table: clean first, then read the
/// survivors as CSV with the first retained line as the header.
///
/// A reply with no surviving lines parses to the empty table, which
/// signals "no extractable data" rather than an error; a structurally
/// broken reply is an error for that record only.
pub fn parse_reply(reply: &str) -> Result<Table> {
    Table::from_csv(&clean_reply(reply))
}

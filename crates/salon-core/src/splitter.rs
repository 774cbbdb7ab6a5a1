//! Quote-aware statement splitting for migration scripts.
//!
//! This is a lightweight lexer, not a grammar. It tracks a single flag for
//! "inside a single-quoted literal" and treats `;` as a terminator only
//! outside of it.
//!
//! Known limitations:
//! - Comments are not recognised; a `'` or `;` inside `--` or `/* */`
//!   comments is treated like any other character.
//! - Doubled quotes (`''`) are not understood as an escape, they simply
//!   toggle the flag twice.
//! - Double-quoted identifiers containing `;` split incorrectly.

/// Split `raw` into trimmed, non-empty statements.
///
/// A trailing statement without a terminating `;` is still returned.
///
/// # Examples
/// ```
/// use salon_core::split_statements;
/// let stmts = split_statements("INSERT INTO t (s) VALUES ('a;b'); DELETE FROM t;");
/// assert_eq!(stmts, vec!["INSERT INTO t (s) VALUES ('a;b')", "DELETE FROM t"]);
/// ```
pub fn split_statements(raw: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;

    for ch in raw.chars() {
        if ch == '\'' {
            in_quote = !in_quote;
        }
        if ch == ';' && !in_quote {
            push_statement(&mut statements, &current);
            current.clear();
        } else {
            current.push(ch);
        }
    }
    push_statement(&mut statements, &current);

    statements
}

fn push_statement(statements: &mut Vec<String>, segment: &str) {
    let trimmed = segment.trim();
    if !trimmed.is_empty() {
        statements.push(trimmed.to_string());
    }
}

#[cfg(test)]
#[path = "splitter_test.rs"]
mod tests;

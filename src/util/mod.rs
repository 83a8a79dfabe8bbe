// QueryBench - util/mod.rs
//
// Utility modules: error types, named constants, logging setup.
// No dependencies on core, app, or platform layers.

pub mod constants;
pub mod error;
pub mod logging;

/// Shorten a statement for log and error output.
///
/// Cuts at a character boundary after `DEBUG_MAX_SQL_PREVIEW` characters and
/// appends an ellipsis marker when anything was dropped.
pub fn sql_preview(sql: &str) -> String {
    let max = constants::DEBUG_MAX_SQL_PREVIEW;
    match sql.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &sql[..cut]),
        None => sql.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_preview_short_passthrough() {
        assert_eq!(sql_preview("SELECT 1"), "SELECT 1");
    }

    #[test]
    fn test_sql_preview_truncates_on_char_boundary() {
        let sql = "é".repeat(constants::DEBUG_MAX_SQL_PREVIEW + 10);
        let preview = sql_preview(&sql);
        assert!(preview.ends_with("..."));
        assert_eq!(
            preview.chars().count(),
            constants::DEBUG_MAX_SQL_PREVIEW + 3
        );
    }
}

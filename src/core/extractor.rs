// QueryBench - core/extractor.rs
//
// Extraction of replayable SQL statements from MySQL general query log lines.
// Core layer: works on strings and line iterators, never touches the
// filesystem directly.
//
// A line yields a statement when it contains
//     <connection-id> <ws> query <ws> <payload>
// with the connection id preceded by whitespace or at the start of the line,
// for example `121107 12:00:01    7 Query   SELECT * FROM t`. Without a
// connection filter only purely numeric (ASCII digit) ids match.

use crate::util::error::ConfigError;
use regex::{Regex, RegexBuilder};

/// Which lines are eligible for extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFilter {
    /// Only accept lines from this connection id (case-insensitive).
    /// `None` or blank accepts any purely numeric connection id.
    pub connection_id: Option<String>,

    /// Drop payloads starting with any of these prefixes (case-insensitive).
    pub ignore_prefixes: Vec<String>,
}

impl QueryFilter {
    /// The connection id to match, with blank values treated as unset.
    fn effective_connection_id(&self) -> Option<&str> {
        self.connection_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// Compiled form of a [`QueryFilter`]; build once per log file.
#[derive(Debug, Clone)]
pub struct QueryExtractor {
    pattern: Regex,
    ignore_prefixes: Vec<String>,
}

impl QueryExtractor {
    /// Compile the line pattern for the given filter.
    pub fn new(filter: &QueryFilter) -> Result<Self, ConfigError> {
        let token = match filter.effective_connection_id() {
            Some(id) => regex::escape(id),
            None => "[0-9]+".to_string(),
        };
        // ASCII classes only: Unicode digits and spaces are not separators.
        let source = format!(r"(?:^|(?-u:\s)){token}(?-u:\s)+query(?-u:\s)+(.*)$");
        let pattern = RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .map_err(|e| ConfigError::InvalidPattern {
                field: "connection_id",
                value: filter.connection_id.clone().unwrap_or_default(),
                source: e,
            })?;

        Ok(Self {
            pattern,
            ignore_prefixes: filter
                .ignore_prefixes
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
        })
    }

    /// Extract the statement from one log line.
    ///
    /// Returns `None` when the line does not match or when the payload starts
    /// with an ignored prefix. The payload keeps its original case and
    /// internal whitespace.
    pub fn extract<'l>(&self, line: &'l str) -> Option<&'l str> {
        let payload = self.pattern.captures(line)?.get(1)?.as_str();
        if self.is_ignored(payload) {
            tracing::trace!(payload = %crate::util::sql_preview(payload), "Ignored by prefix");
            return None;
        }
        Some(payload)
    }

    /// Extract statements from a sequence of lines, in line order.
    ///
    /// Duplicates are kept; nothing is reordered.
    pub fn extract_all<I, S>(&self, lines: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut queries = Vec::with_capacity(crate::util::constants::INITIAL_QUERY_CAPACITY);
        for line in lines {
            if let Some(query) = self.extract(line.as_ref()) {
                queries.push(query.to_string());
            }
        }
        queries
    }

    fn is_ignored(&self, payload: &str) -> bool {
        if self.ignore_prefixes.is_empty() {
            return false;
        }
        let lowered = payload.to_lowercase();
        self.ignore_prefixes
            .iter()
            .any(|prefix| lowered.starts_with(prefix.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor(connection_id: Option<&str>, ignore: &[&str]) -> QueryExtractor {
        QueryExtractor::new(&QueryFilter {
            connection_id: connection_id.map(str::to_string),
            ignore_prefixes: ignore.iter().map(|s| s.to_string()).collect(),
        })
        .unwrap()
    }

    #[test]
    fn test_numeric_connection_without_filter() {
        let ex = extractor(None, &[]);
        assert_eq!(
            ex.extract("121107  7 Query SELECT * FROM t"),
            Some("SELECT * FROM t")
        );
    }

    #[test]
    fn test_timestamped_general_log_line() {
        let ex = extractor(None, &[]);
        assert_eq!(
            ex.extract("121107 12:00:01\t   42 Query\tUPDATE t SET a = 1"),
            Some("UPDATE t SET a = 1")
        );
        assert_eq!(ex.extract("\t\t   42 Query\tSELECT 1"), Some("SELECT 1"));
    }

    #[test]
    fn test_connection_id_at_line_start() {
        let ex = extractor(None, &[]);
        assert_eq!(ex.extract("7 Query SELECT 1"), Some("SELECT 1"));
    }

    #[test]
    fn test_keyword_and_payload_case() {
        let ex = extractor(None, &[]);
        assert_eq!(
            ex.extract("   7 qUeRy select  Name  FROM Users"),
            Some("select  Name  FROM Users")
        );
    }

    #[test]
    fn test_non_query_commands_ignored() {
        let ex = extractor(None, &[]);
        assert_eq!(ex.extract("121107  7 Connect root@localhost on test"), None);
        assert_eq!(ex.extract("121107  7 Quit"), None);
        assert_eq!(ex.extract("Time                 Id Command    Argument"), None);
        assert_eq!(ex.extract(""), None);
    }

    #[test]
    fn test_non_numeric_id_rejected_without_filter() {
        let ex = extractor(None, &[]);
        assert_eq!(ex.extract("  abc Query SELECT 1"), None);
        assert_eq!(ex.extract("  12a Query SELECT 1"), None);
    }

    #[test]
    fn test_unicode_digits_and_spaces_not_accepted() {
        let ex = extractor(None, &[]);
        assert_eq!(ex.extract("  \u{667} Query SELECT 1"), None);
        assert_eq!(ex.extract("  \u{ff17} Query SELECT 1"), None);
        assert_eq!(ex.extract("\u{a0}7 Query SELECT 1"), None);
        assert_eq!(ex.extract("  7\u{2003}Query SELECT 1"), None);
        assert_eq!(ex.extract("  7 Query SELECT 1"), Some("SELECT 1"));
    }

    #[test]
    fn test_connection_filter_selects_one_session() {
        let ex = extractor(Some("7"), &[]);
        assert_eq!(ex.extract("121107  7 Query SELECT 1"), Some("SELECT 1"));
        assert_eq!(ex.extract("121107  8 Query SELECT 2"), None);
        assert_eq!(ex.extract("121107  77 Query SELECT 3"), None);
    }

    #[test]
    fn test_connection_filter_case_insensitive_and_literal() {
        let ex = extractor(Some("Conn.A"), &[]);
        assert_eq!(ex.extract("  conn.a QUERY SELECT 1"), Some("SELECT 1"));
        // The dot is matched literally, not as a wildcard.
        assert_eq!(ex.extract("  connXa QUERY SELECT 1"), None);
    }

    #[test]
    fn test_blank_filter_behaves_as_unset() {
        let ex = extractor(Some("  "), &[]);
        assert_eq!(ex.extract("  9 Query SELECT 1"), Some("SELECT 1"));
        assert_eq!(ex.extract("  x Query SELECT 1"), None);
    }

    #[test]
    fn test_ignore_prefix_case_insensitive() {
        let ex = extractor(None, &["select"]);
        assert_eq!(ex.extract("121107  7 Query SELECT * FROM t"), None);
        assert_eq!(
            ex.extract("121107  7 Query INSERT INTO t VALUES (1)"),
            Some("INSERT INTO t VALUES (1)")
        );
    }

    #[test]
    fn test_ignore_prefix_matches_start_only() {
        let ex = extractor(None, &["SET ", "show"]);
        assert_eq!(ex.extract("  7 Query set names utf8"), None);
        assert_eq!(ex.extract("  7 Query SHOW TABLES"), None);
        assert_eq!(
            ex.extract("  7 Query SELECT 'SET x'"),
            Some("SELECT 'SET x'")
        );
    }

    #[test]
    fn test_extract_all_preserves_order_and_duplicates() {
        let ex = extractor(None, &["commit"]);
        let lines = [
            "121107  7 Query SELECT 2",
            "121107  7 Connect root@localhost",
            "121107  8 Query SELECT 1",
            "121107  7 Query COMMIT",
            "121107  7 Query SELECT 2",
        ];
        let queries = ex.extract_all(lines);
        assert_eq!(queries, vec!["SELECT 2", "SELECT 1", "SELECT 2"]);
    }

    #[test]
    fn test_extract_all_is_repeatable() {
        let ex = extractor(Some("8"), &[]);
        let lines = vec![
            "  8 Query SELECT a".to_string(),
            "  9 Query SELECT b".to_string(),
            "  8 Query SELECT c".to_string(),
        ];
        let first = ex.extract_all(&lines);
        let second = ex.extract_all(&lines);
        assert_eq!(first, second);
        assert_eq!(first, vec!["SELECT a", "SELECT c"]);
    }
}

// QueryBench - platform/fs.rs
//
// Filesystem helpers: streaming the query log and writing the report.

use crate::core::extractor::QueryExtractor;
use crate::util::error::{InputError, ReportError};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

/// Stream a query log through `extractor`, one line at a time.
///
/// Lines with invalid UTF-8 are converted lossily rather than rejected, so a
/// stray binary byte in a log never aborts the run. A missing or unreadable
/// file is an error; no partial result is returned.
pub fn extract_queries_from_file(
    path: &Path,
    extractor: &QueryExtractor,
) -> Result<Vec<String>, InputError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => InputError::NotFound {
            path: path.to_path_buf(),
        },
        _ => InputError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let queries = extract_queries_from_reader(BufReader::new(file), extractor).map_err(|e| {
        InputError::Io {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    tracing::debug!(
        path = %path.display(),
        queries = queries.len(),
        "Query log read"
    );
    Ok(queries)
}

/// Stream any buffered reader through `extractor`.
pub fn extract_queries_from_reader<R: BufRead>(
    mut reader: R,
    extractor: &QueryExtractor,
) -> io::Result<Vec<String>> {
    let mut queries = Vec::with_capacity(crate::util::constants::INITIAL_QUERY_CAPACITY);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(&['\n', '\r'][..]);
        if let Some(query) = extractor.extract(line) {
            queries.push(query.to_string());
        }
    }
    Ok(queries)
}

/// Write the rendered report, replacing any existing file.
pub fn write_report(path: &Path, report: &str) -> Result<(), ReportError> {
    let to_err = |e| ReportError::Io {
        path: path.to_path_buf(),
        source: e,
    };
    let mut file = File::create(path).map_err(to_err)?;
    file.write_all(report.as_bytes()).map_err(to_err)?;
    file.flush().map_err(to_err)?;
    tracing::debug!(path = %path.display(), bytes = report.len(), "Report written");
    Ok(())
}

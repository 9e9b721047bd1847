//! CLI request/response I/O
//!
//! One JSON request per stdin line, one JSON response per stdout
//! line.

use std::io::{self, BufRead, Write};

use super::errors::CliResult;

/// Read the next request line; None on EOF
pub fn read_request() -> CliResult<Option<String>> {
    let mut line = String::new();
    let bytes = io::stdin().lock().read_line(&mut line)?;
    if bytes == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Write one response line
pub fn write_response(json: &str) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(json.as_bytes())?;
    stdout.write_all(b"\n")?;
    stdout.flush()?;
    Ok(())
}

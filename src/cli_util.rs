use std::io::{self, Write};

use crate::translator::TranslateError;

/// Print a fatal translation error, with a caret under the offending byte
/// when the error points into the source.
pub fn print_translate_error(program: &str, source: &[u8], err: &TranslateError) {
    let msg = match err {
        TranslateError::UnmatchedClose { .. } => "Fatal: unexpected closing bracket".to_string(),
        TranslateError::UnmatchedOpen { count, .. } => {
            format!("Fatal: program doesn't have enough closing brackets ({count} unmatched)")
        }
        TranslateError::Io { source } => format!("Fatal: failed to read program: {source}"),
    };

    match err.offset() {
        Some(offset) => print_error_with_context(&format!("{program}: {msg}"), source, offset),
        None => {
            eprintln!("{program}: {msg}");
            let _ = io::stderr().flush();
        }
    }
}

/// Print a one-line error followed by a window of the source around byte
/// `pos` and a caret line pointing at it.
pub fn print_error_with_context(prefix: &str, source: &[u8], pos: usize) {
    eprintln!("{prefix} at byte {pos}");

    const WINDOW: usize = 32;

    let start = pos.saturating_sub(WINDOW);
    let end = (pos + WINDOW + 1).min(source.len());
    if start >= end {
        let _ = io::stderr().flush();
        return;
    }

    let (line, caret) = context_window(&source[start..end], pos - start);
    eprintln!("  {line}");
    eprintln!("  {caret}");
    let _ = io::stderr().flush();
}

// Line breaks and tabs are drawn as spaces so the caret stays aligned; other
// non-printable or non-ASCII bytes become '?', one column per byte.
fn context_window(window: &[u8], caret_at: usize) -> (String, String) {
    let line: String = window
        .iter()
        .map(|&b| match b {
            b'\n' | b'\r' | b'\t' => ' ',
            0x20..=0x7e => b as char,
            _ => '?',
        })
        .collect();

    let mut caret = " ".repeat(caret_at);
    caret.push('^');
    (line, caret)
}

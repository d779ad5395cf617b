//! Lexical analysis for command lines.
//!
//! The language here is deliberately tiny: a command line is a sequence of
//! whitespace-delimited words, and the pipe separator `|` is just another
//! word. No quoting or escaping is interpreted, so an argument containing a
//! literal whitespace character cannot be expressed.

/// Splits a raw command line into owned tokens.
///
/// Runs of whitespace collapse into a single separator; leading and trailing
/// whitespace is ignored. An empty line (or one consisting only of
/// whitespace) produces an empty sequence, which the dispatcher treats as
/// "nothing to do".
///
/// Token order is argv order and is preserved end-to-end through planning
/// and execution.
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_line_yields_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t  ").is_empty());
    }

    #[test]
    fn test_splits_on_whitespace_runs() {
        assert_eq!(tokenize("echo   hello\tworld"), vec!["echo", "hello", "world"]);
    }

    #[test]
    fn test_leading_and_trailing_whitespace_ignored() {
        assert_eq!(tokenize("  ls -l  "), vec!["ls", "-l"]);
    }

    #[test]
    fn test_pipe_is_an_ordinary_token() {
        assert_eq!(tokenize("a | b"), vec!["a", "|", "b"]);
    }

    #[test]
    fn test_no_quoting_is_interpreted() {
        // Quotes pass through as literal characters and never join words.
        assert_eq!(tokenize("echo \"a b\""), vec!["echo", "\"a", "b\""]);
    }
}

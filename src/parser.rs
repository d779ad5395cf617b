//! Pipeline planning: partitioning a token sequence into pipe-separated
//! stages.

/// The stage separator token.
pub const PIPE: &str = "|";

/// One program invocation inside a pipeline: the contiguous tokens between
/// two separators (or between a separator and a boundary).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    tokens: Vec<String>,
}

impl Stage {
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    /// The full token sequence, in argv order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// The program to execute, i.e. the first token. `None` for an empty
    /// stage, which is a planning artifact that fails at execution.
    pub fn program(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }

    /// Arguments following the program token.
    pub fn args(&self) -> &[String] {
        self.tokens.get(1..).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// An ordered chain of at least one [`Stage`]. A single-stage pipeline
/// degenerates to one direct execution with no pipe plumbing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Stages in execution order: the leftmost stage of the command line is
    /// first and feeds the one after it.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }
}

/// Returns whether a token sequence contains the stage separator anywhere.
///
/// The dispatcher uses this to decide that `history` is being piped into
/// something (and is therefore an external command) rather than invoked as
/// the builtin.
pub fn contains_pipe(tokens: &[String]) -> bool {
    tokens.iter().any(|token| token == PIPE)
}

/// Partitions a token sequence into a [`Pipeline`].
///
/// Stages are peeled off the rightmost remaining separator: everything past
/// it becomes the last unplanned stage and the scan repeats on the prefix.
/// Within every stage the original left-to-right argv order is preserved,
/// even though the boundary search runs right-to-left.
///
/// A sequence with `k` separators always yields `k + 1` stages. A separator
/// as the first or last token (or two adjacent separators) is not rejected
/// here; it produces an empty stage, which the executor refuses to launch.
pub fn plan(tokens: Vec<String>) -> Pipeline {
    let mut stages = Vec::new();
    let mut rest = tokens;
    while let Some(pos) = rest.iter().rposition(|token| token == PIPE) {
        let stage = rest.split_off(pos + 1);
        rest.truncate(pos); // drop the separator itself
        stages.push(Stage::new(stage));
    }
    stages.push(Stage::new(rest));
    stages.reverse();
    Pipeline { stages }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(line: &str) -> Vec<String> {
        crate::lexer::tokenize(line)
    }

    #[test]
    fn test_no_separator_yields_single_full_stage() {
        let pipeline = plan(tokens("ls -l /tmp"));
        assert_eq!(pipeline.stages().len(), 1);
        assert_eq!(pipeline.stages()[0].tokens(), tokens("ls -l /tmp"));
    }

    #[test]
    fn test_k_separators_yield_k_plus_one_stages() {
        let pipeline = plan(tokens("a | b x | c y z"));
        let stages = pipeline.stages();
        assert_eq!(stages.len(), 3);
        assert_eq!(stages[0].tokens(), tokens("a"));
        assert_eq!(stages[1].tokens(), tokens("b x"));
        assert_eq!(stages[2].tokens(), tokens("c y z"));
    }

    #[test]
    fn test_rejoining_stages_reproduces_the_input() {
        let input = tokens("a b | c | d e f | g");
        let pipeline = plan(input.clone());
        let mut rejoined: Vec<String> = Vec::new();
        for (i, stage) in pipeline.stages().iter().enumerate() {
            if i > 0 {
                rejoined.push(PIPE.to_owned());
            }
            rejoined.extend(stage.tokens().iter().cloned());
        }
        assert_eq!(rejoined, input);
    }

    #[test]
    fn test_argv_order_preserved_within_stages() {
        let pipeline = plan(tokens("sort -r names | head -n 3"));
        assert_eq!(pipeline.stages()[0].program(), Some("sort"));
        assert_eq!(pipeline.stages()[0].args(), ["-r", "names"]);
        assert_eq!(pipeline.stages()[1].program(), Some("head"));
        assert_eq!(pipeline.stages()[1].args(), ["-n", "3"]);
    }

    #[test]
    fn test_boundary_separators_produce_empty_stages() {
        let leading = plan(tokens("| a"));
        assert_eq!(leading.stages().len(), 2);
        assert!(leading.stages()[0].is_empty());
        assert_eq!(leading.stages()[0].program(), None);

        let trailing = plan(tokens("a |"));
        assert_eq!(trailing.stages().len(), 2);
        assert!(trailing.stages()[1].is_empty());

        let adjacent = plan(tokens("a | | b"));
        assert_eq!(adjacent.stages().len(), 3);
        assert!(adjacent.stages()[1].is_empty());
    }

    #[test]
    fn test_contains_pipe() {
        assert!(contains_pipe(&tokens("history | cat")));
        assert!(!contains_pipe(&tokens("history 3")));
    }
}

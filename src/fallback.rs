use crate::selection::{ChooserOutcome, SelectionModel};
use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::Write;
use std::path::Path;

pub const PROMPT: &str = "Choice(s) (Ctrl+C to cancel): ";

/// What the user typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Line(String),
    /// Ctrl+C, end of input, or an unreadable terminal.
    Cancelled,
}

/// A source of one prompted line of input.
pub trait PromptInput {
    fn read_answer(&mut self, prompt: &str) -> Answer;
}

impl PromptInput for DefaultEditor {
    fn read_answer(&mut self, prompt: &str) -> Answer {
        answer_from(self.readline(prompt))
    }
}

fn answer_from(read: Result<String, ReadlineError>) -> Answer {
    match read {
        Ok(line) => Answer::Line(line),
        Err(ReadlineError::Interrupted) => {
            log::debug!("choice prompt interrupted");
            Answer::Cancelled
        }
        Err(ReadlineError::Eof) => Answer::Cancelled,
        Err(e) => {
            log::warn!("could not read choice: {}", e);
            Answer::Cancelled
        }
    }
}

/// Plain numbered-menu chooser for terminals without full-screen support.
///
/// Prints every candidate once, reads a single line, and returns the picked
/// paths in list order. Enqueue mode can be switched on by typing `q`
/// anywhere in the answer. Cancelling the prompt picks nothing.
pub fn choose<I: PromptInput, W: Write>(
    candidates: &[String],
    strip_path: bool,
    enqueue: bool,
    input: &mut I,
    output: &mut W,
) -> Result<ChooserOutcome> {
    for (pos, path) in candidates.iter().enumerate() {
        writeln!(output, "{:>3}) {}", pos + 1, display_name(path, strip_path))?;
    }
    output.flush()?;

    let line = match input.read_answer(PROMPT) {
        Answer::Line(line) => line,
        Answer::Cancelled => {
            writeln!(output)?;
            return Ok(empty_outcome(enqueue));
        }
    };

    let mut model = SelectionModel::new(candidates.len(), enqueue, None);
    let answer = model.apply_queue_hint(&line);
    for diagnostic in model.replace_from_text(&answer) {
        writeln!(output, "{}", diagnostic)?;
    }
    Ok(model.into_outcome(candidates))
}

fn empty_outcome(enqueue: bool) -> ChooserOutcome {
    ChooserOutcome {
        paths: Vec::new(),
        enqueue,
        override_command: None,
    }
}

fn display_name(path: &str, strip_path: bool) -> String {
    if !strip_path {
        return path.to_string();
    }
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    /// Replays canned readline results and remembers the prompts shown.
    struct Scripted {
        reads: Vec<Result<String, ReadlineError>>,
        prompts: Vec<String>,
    }

    impl Scripted {
        fn new(reads: Vec<Result<String, ReadlineError>>) -> Self {
            Scripted {
                reads,
                prompts: Vec::new(),
            }
        }

        fn line(answer: &str) -> Self {
            Scripted::new(vec![Ok(answer.to_string())])
        }
    }

    impl PromptInput for Scripted {
        fn read_answer(&mut self, prompt: &str) -> Answer {
            self.prompts.push(prompt.to_string());
            if self.reads.is_empty() {
                return answer_from(Err(ReadlineError::Eof));
            }
            answer_from(self.reads.remove(0))
        }
    }

    fn candidates(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("/music/album/{:02} song.flac", i)).collect()
    }

    fn run(
        list: &[String],
        strip: bool,
        enqueue: bool,
        input: &mut Scripted,
    ) -> (ChooserOutcome, String) {
        let mut output = Vec::new();
        let outcome = choose(list, strip, enqueue, input, &mut output).unwrap();
        (outcome, String::from_utf8(output).unwrap())
    }

    #[test]
    fn renders_right_justified_basenames() {
        let list = candidates(2);
        let mut input = Scripted::line("");
        let (_, shown) = run(&list, true, false, &mut input);
        assert_eq!(shown, "  1) 01 song.flac\n  2) 02 song.flac\n");
        assert_eq!(input.prompts, vec![PROMPT.to_string()]);
    }

    #[test]
    fn renders_full_paths_when_asked() {
        let list = candidates(1);
        let (_, shown) = run(&list, false, false, &mut Scripted::line(""));
        assert!(shown.contains("  1) /music/album/01 song.flac"));
    }

    #[test]
    fn picks_with_queue_hint() {
        let list = candidates(5);
        let (outcome, _) = run(&list, true, false, &mut Scripted::line("1 3 q"));
        assert_eq!(outcome.paths, vec![list[0].clone(), list[2].clone()]);
        assert!(outcome.enqueue);
        assert_eq!(outcome.override_command, None);
    }

    #[test]
    fn out_of_range_is_reported_to_the_user() {
        let list = candidates(5);
        let (outcome, shown) = run(&list, true, false, &mut Scripted::line("9"));
        assert!(outcome.paths.is_empty());
        assert!(shown.contains("Invalid result index: 9"));
    }

    #[test]
    fn huge_range_answer_is_clipped() {
        let list = candidates(3);
        let (outcome, shown) =
            run(&list, true, false, &mut Scripted::line("2:99999999999999999"));
        assert_eq!(outcome.paths, vec![list[1].clone(), list[2].clone()]);
        assert!(shown.contains("Invalid result index: 2:99999999999999999"));
    }

    #[test]
    fn keeps_initial_enqueue_default() {
        let list = candidates(3);
        let (outcome, _) = run(&list, true, true, &mut Scripted::line("2"));
        assert!(outcome.enqueue);
        assert_eq!(outcome.paths, vec![list[1].clone()]);
    }

    #[test]
    fn interrupt_picks_nothing() {
        let list = candidates(3);
        let mut input = Scripted::new(vec![Err(ReadlineError::Interrupted)]);
        let (outcome, shown) = run(&list, true, true, &mut input);
        assert!(outcome.paths.is_empty());
        assert!(outcome.enqueue);
        assert!(shown.ends_with("\n\n"));
    }

    #[test]
    fn end_of_input_picks_nothing() {
        let list = candidates(3);
        let (outcome, _) = run(&list, true, false, &mut Scripted::new(Vec::new()));
        assert!(outcome.paths.is_empty());
    }

    #[test]
    fn read_failure_picks_nothing() {
        let list = candidates(3);
        let broken = io::Error::new(io::ErrorKind::BrokenPipe, "gone");
        let mut input = Scripted::new(vec![Err(ReadlineError::Io(broken))]);
        let (outcome, _) = run(&list, true, false, &mut input);
        assert!(outcome.paths.is_empty());
    }
}

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use colored::Colorize;

use super::session::Judge;
use crate::domain::models::StoreInfo;
use crate::rating::{ComparisonOutcome, StoreId};

/// Asks "which store do you prefer" on a terminal.
///
/// Answers are `1` or `2`; `q` or end of input leaves the session.
pub struct TerminalJudge<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalJudge<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_answer(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read answer")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_lowercase()))
    }
}

impl<R: BufRead, W: Write> Judge for TerminalJudge<R, W> {
    fn choose(&mut self, first: &StoreInfo, second: &StoreInfo) -> Result<Option<StoreId>> {
        writeln!(self.output, "\n{}", "Which store do you prefer?".bold())?;
        writeln!(self.output, "  {} {} ({})", "1)".cyan(), first.name, first.category)?;
        writeln!(self.output, "  {} {} ({})", "2)".cyan(), second.name, second.category)?;

        loop {
            write!(self.output, "{} ", "[1/2/q]>".dimmed())?;
            self.output.flush()?;

            match self.read_answer()?.as_deref() {
                Some("1") => return Ok(Some(first.id)),
                Some("2") => return Ok(Some(second.id)),
                Some("q") | None => return Ok(None),
                Some(other) => writeln!(self.output, "{} {:?}", "Please answer 1, 2 or q, not".yellow(), other)?,
            }
        }
    }

    fn recorded(&mut self, outcome: &ComparisonOutcome) {
        // Display only; a broken terminal surfaces on the next prompt.
        let _ = writeln!(
            self.output,
            "{} {:.2} / {:.2}",
            "Saved:".green(),
            outcome.winner.value,
            outcome.loser.value
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::StoreCategory;
    use std::io::Cursor;

    fn stores() -> (StoreInfo, StoreInfo) {
        (
            StoreInfo::new(4, "Zara", StoreCategory::HighStreetChain),
            StoreInfo::new(9, "Oxfam", StoreCategory::Thrift),
        )
    }

    fn ask(input: &str) -> (Option<StoreId>, String) {
        let (a, b) = stores();
        let mut output = Vec::new();
        let answer = {
            let mut judge = TerminalJudge::new(Cursor::new(input.as_bytes()), &mut output);
            judge.choose(&a, &b).unwrap()
        };
        (answer, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_picks_by_position() {
        assert_eq!(ask("1\n").0, Some(4));
        assert_eq!(ask("2\n").0, Some(9));
    }

    #[test]
    fn test_quit_and_end_of_input() {
        assert_eq!(ask("q\n").0, None);
        assert_eq!(ask("").0, None);
    }

    #[test]
    fn test_reprompts_on_invalid_answer() {
        let (answer, output) = ask("maybe\n 2 \n");
        assert_eq!(answer, Some(9));
        assert!(output.contains("maybe"));
        assert!(output.contains("Oxfam"));
    }
}

//! Line-based operator prompts

use std::io::{self, BufRead, Write};

/// Reads operator answers from `input` and writes prompts to `output`
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writer the prompts go to
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Print `label` and read one trimmed line. `None` at end of input.
    pub fn ask(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}: ", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Ask a yes/no question; anything but `y`/`yes` counts as no
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let answer = self.ask(&format!("{} [y/N]", question))?;
        Ok(matches!(
            answer.as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("y") | Some("yes")
        ))
    }

    /// Ask for a 1-based item number out of `count` and return its 0-based
    /// index. Empty input cancels.
    pub fn select(&mut self, label: &str, count: usize) -> io::Result<Option<usize>> {
        loop {
            let Some(answer) = self.ask(&format!("{} (1-{}, empty to cancel)", label, count))? else {
                return Ok(None);
            };
            if answer.is_empty() {
                return Ok(None);
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=count).contains(&n) => return Ok(Some(n - 1)),
                _ => writeln!(self.output, "Please enter a number between 1 and {}", count)?,
            }
        }
    }
}

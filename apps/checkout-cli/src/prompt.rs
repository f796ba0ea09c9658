use std::io::Write;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Line-oriented terminal input shared by every question of a command.
///
/// One reader owns stdin for the whole process; lines it has buffered are
/// handed to the following questions.
pub struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    pub fn stdin() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Print `question` and read one trimmed line.
    ///
    /// Returns `None` once stdin is closed.
    pub async fn line(&mut self, question: &str) -> Result<Option<String>> {
        print!("{question}");
        std::io::stdout().flush().context("failed to write stdout")?;

        let line = self
            .lines
            .next_line()
            .await
            .context("failed to read stdin")?;
        Ok(line.map(|l| l.trim().to_owned()))
    }
}

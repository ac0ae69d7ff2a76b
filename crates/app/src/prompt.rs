use std::collections::BTreeSet;
use std::io::Write as _;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

/// Line-oriented terminal input. `None` means the input was closed.
pub struct Prompt<R> {
    lines: Lines<R>,
}

impl Prompt<BufReader<Stdin>> {
    #[must_use]
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> Prompt<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// # Errors
    ///
    /// Returns an I/O error if the input cannot be read.
    pub async fn line(&mut self, label: &str) -> std::io::Result<Option<String>> {
        print!("{label} ");
        std::io::stdout().flush()?;
        self.lines.next_line().await
    }

    /// Read lines until a blank one; used for typed code.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the input cannot be read.
    pub async fn block(&mut self, label: &str) -> std::io::Result<Option<String>> {
        println!("{label}");
        let mut collected = Vec::new();
        while let Some(line) = self.lines.next_line().await? {
            if line.trim().is_empty() {
                return Ok(Some(collected.join("\n")));
            }
            collected.push(line);
        }
        Ok((!collected.is_empty()).then(|| collected.join("\n")))
    }
}

/// Parse "1, 3 4" (1-based) into bug indices. Any bad token rejects the whole input.
#[must_use]
pub fn parse_selection(input: &str) -> Option<BTreeSet<usize>> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
        })
        .collect()
}

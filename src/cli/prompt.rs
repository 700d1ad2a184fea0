// src/cli/prompt.rs
use anyhow::Result;
use std::io::{BufRead, Write};

/// Ask a yes/no question; anything but `y`/`yes` (or end of input) is a no
pub fn confirm<I: BufRead, O: Write>(input: &mut I, output: &mut O, question: &str) -> Result<bool> {
    write!(output, "{question} [y/N] ")?;
    output.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        writeln!(output)?;
        return Ok(false);
    }
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

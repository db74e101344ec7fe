//! Line-oriented terminal prompts.
//!
//! Generic over the reader and writer so the interactive menu and the
//! publisher can be driven from a byte buffer in tests.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    pub fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{}", message).context("Failed to write to terminal")
    }

    /// One trimmed line, `None` at end of input.
    pub fn line(&mut self, prompt: &str) -> Result<Option<String>> {
        read_line(&mut self.input, &mut self.output, prompt)
    }

    /// A number, re-asking until it parses and lies in `[min, max]`.
    /// Blank input and end of input yield `default`.
    pub fn float(&mut self, prompt: &str, default: f64, min: f64, max: f64) -> Result<f64> {
        loop {
            let Some(answer) = self.line(&format!("{} [{}]: ", prompt, default))? else {
                return Ok(default);
            };
            if answer.is_empty() {
                return Ok(default);
            }
            match answer.parse::<f64>() {
                Ok(value) if value.is_finite() && (min..=max).contains(&value) => {
                    return Ok(value)
                }
                Ok(_) => self.say(&format!("  Enter a value between {} and {}", min, max))?,
                Err(_) => self.say("  Not a number")?,
            }
        }
    }

    pub fn yes_no(&mut self, prompt: &str, default: bool) -> Result<bool> {
        let hint = if default { "Y/n" } else { "y/N" };
        loop {
            let Some(answer) = self.line(&format!("{} [{}]: ", prompt, hint))? else {
                return Ok(default);
            };
            match answer.to_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.say("  Answer y or n")?,
            }
        }
    }

    /// Menu choice in `1..=count`. `None` when the user quits with `q` or
    /// input ends.
    pub fn choice(&mut self, prompt: &str, count: usize) -> Result<Option<usize>> {
        loop {
            let Some(answer) = self.line(prompt)? else {
                return Ok(None);
            };
            if answer.eq_ignore_ascii_case("q") {
                return Ok(None);
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=count).contains(&n) => return Ok(Some(n)),
                _ => self.say(&format!("  Choose 1-{} or q", count))?,
            }
        }
    }
}

/// Print `prompt`, flush, read one line and trim it.
pub fn read_line(
    input: &mut dyn BufRead,
    output: &mut dyn Write,
    prompt: &str,
) -> Result<Option<String>> {
    write!(output, "{}", prompt).context("Failed to write prompt")?;
    output.flush().context("Failed to flush prompt")?;

    let mut buf = String::new();
    let read = input.read_line(&mut buf).context("Failed to read input")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(buf.trim().to_string()))
}

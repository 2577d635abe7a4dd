use std::io::{BufRead, Write};

use anyhow::{bail, Context};
use lazy_static::lazy_static;
use regex::Regex;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Line-oriented terminal I/O. Keeps prompting out of the store so both
/// sides can be exercised with in-memory buffers.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Print one line of output.
    pub fn say(&mut self, line: &str) -> anyhow::Result<()> {
        writeln!(self.output, "{line}").context("write to terminal")?;
        Ok(())
    }

    /// Show `label` and read one line without its line ending.
    pub fn ask(&mut self, label: &str) -> anyhow::Result<String> {
        write!(self.output, "{label}").context("write to terminal")?;
        self.output.flush().context("flush terminal")?;
        let mut line = String::new();
        let n = self.input.read_line(&mut line).context("read from terminal")?;
        if n == 0 {
            bail!("input ended while waiting for: {}", label.trim());
        }
        Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
    }

    pub fn ask_i64(&mut self, label: &str) -> anyhow::Result<i64> {
        loop {
            let raw = self.ask(label)?;
            match raw.trim().parse::<i64>() {
                Ok(v) => return Ok(v),
                Err(_) => self.say("Please enter a whole number")?,
            }
        }
    }

    pub fn ask_email(&mut self, label: &str) -> anyhow::Result<String> {
        loop {
            let raw = self.ask(label)?.trim().to_lowercase();
            if is_valid_email(&raw) {
                return Ok(raw);
            }
            self.say("Invalid email")?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(p: Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(p.into_output()).unwrap()
    }

    #[test]
    fn ask_strips_line_endings_and_echoes_label() {
        let mut p = prompter("Alice Smith\r\n");
        assert_eq!(p.ask("Enter the User Name : ").unwrap(), "Alice Smith");
        assert_eq!(output(p), "Enter the User Name : ");
    }

    #[test]
    fn ask_i64_reprompts_until_numeric() {
        let mut p = prompter("abc\n 42 \n");
        assert_eq!(p.ask_i64("Enter user id: ").unwrap(), 42);
        let out = output(p);
        assert!(out.contains("Please enter a whole number"));
        assert_eq!(out.matches("Enter user id: ").count(), 2);
    }

    #[test]
    fn ask_email_reprompts_until_valid() {
        let mut p = prompter("not-an-email\n  A@X.COM \n");
        assert_eq!(p.ask_email("Enter Email: ").unwrap(), "a@x.com");
        assert!(output(p).contains("Invalid email"));
    }

    #[test]
    fn end_of_input_is_an_error() {
        let mut p = prompter("");
        let err = p.ask_i64("Enter user id: ").unwrap_err();
        assert!(err.to_string().contains("Enter user id:"));
    }

    #[test]
    fn email_regex() {
        assert!(is_valid_email("a@x.com"));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("a b@x.com"));
    }
}

//! Interactive console input and coloured output.
//!
//! Styling is applied per call through [`paint`]; there is no global colour
//! state to initialise or reset. Input functions take any `BufRead` and
//! `Write` so they can be driven from tests.

use crate::models::Article;
use colored::{ColoredString, Colorize};
use std::io::{self, BufRead, Write};

/// Semantic colour of a console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// A step is starting.
    Step,
    /// A step succeeded.
    Done,
    /// Something was skipped or degraded.
    Notice,
    /// Fatal or rejected.
    Failure,
    /// Plain body text.
    Body,
    /// Links.
    Link,
    /// The greeting banner.
    Banner,
}

/// Style `text` for `tone`.
pub fn paint(tone: Tone, text: &str) -> ColoredString {
    match tone {
        Tone::Step => text.cyan(),
        Tone::Done => text.green(),
        Tone::Notice => text.yellow(),
        Tone::Failure => text.red(),
        Tone::Body => text.white(),
        Tone::Link => text.blue(),
        Tone::Banner => text.magenta().bold(),
    }
}

/// Print one styled line to stdout.
pub fn say(tone: Tone, text: impl AsRef<str>) {
    println!("{}", paint(tone, text.as_ref()));
}

/// Print the numbered article list, 1-based.
pub fn display_articles<W: Write>(out: &mut W, articles: &[Article]) -> io::Result<()> {
    writeln!(out, "{}", paint(Tone::Step, "Displaying fetched articles:"))?;
    for (i, article) in articles.iter().enumerate() {
        writeln!(
            out,
            "{}",
            paint(Tone::Notice, &format!("\n{}. Title: {}", i + 1, article.title))
        )?;
        writeln!(
            out,
            "{}",
            paint(Tone::Body, &format!("   Abstract: {}", article.summary))
        )?;
        if let Some(published) = article.published {
            writeln!(
                out,
                "{}",
                paint(
                    Tone::Body,
                    &format!("   Published: {}", published.format("%Y-%m-%d %H:%M"))
                )
            )?;
        }
    }
    Ok(())
}

fn read_line<R: BufRead>(input: &mut R) -> io::Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "console input closed",
        ));
    }
    Ok(line)
}

/// Prompt until the user enters a number in `1..=max`.
///
/// Non-numeric and out-of-range entries are rejected with a message and the
/// prompt is repeated without limit.
///
/// # Errors
///
/// Fails only when input cannot be read, including end of input.
pub fn choose_article<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    max: usize,
) -> io::Result<usize> {
    loop {
        write!(
            out,
            "{}",
            paint(Tone::Step, &format!("\nChoose an article (1-{max}): "))
        )?;
        out.flush()?;

        let line = read_line(input)?;
        // Signed parse so negative numbers get the range message.
        match line.trim().parse::<i64>() {
            Ok(choice) if choice >= 1 && usize::try_from(choice).is_ok_and(|c| c <= max) => {
                return Ok(choice as usize);
            }
            Ok(_) => writeln!(
                out,
                "{}",
                paint(
                    Tone::Failure,
                    &format!("Please enter a number between 1 and {max}.")
                )
            )?,
            Err(_) => writeln!(
                out,
                "{}",
                paint(Tone::Failure, "Please enter a valid number.")
            )?,
        }
    }
}

/// Ask a yes/no question; only `y` (any case) counts as yes.
///
/// # Errors
///
/// Fails when input cannot be read, including end of input.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, out: &mut W, question: &str) -> io::Result<bool> {
    write!(out, "{}", paint(Tone::Step, question))?;
    out.flush()?;
    let line = read_line(input)?;
    Ok(line.trim().eq_ignore_ascii_case("y"))
}

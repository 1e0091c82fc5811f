//! Revising the request text in an external editor.
//!
//! [`TextEditor`] is the capability the pipeline depends on; [`ExternalEditor`]
//! shells out to `$EDITOR`, and tests substitute an in-memory editor.

use crate::console::{paint, Tone};
use std::io::{self, BufRead, Write};
use std::process::Command;
use tempfile::Builder;
use thiserror::Error;
use tracing::{debug, info, instrument};

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("temporary file error: {0}")]
    TempFile(#[source] io::Error),
    #[error("failed to launch editor {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("console error: {0}")]
    Console(#[from] io::Error),
}

/// Something that can turn a text into a revised text.
pub trait TextEditor {
    /// Human-readable editor name for messages.
    fn name(&self) -> &str;

    /// Let the user revise `text` and return the result.
    fn edit(&self, text: &str) -> Result<String, EditorError>;
}

/// Runs `<program> <tempfile>` and blocks until it exits.
#[derive(Debug, Clone)]
pub struct ExternalEditor {
    program: String,
}

impl ExternalEditor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl TextEditor for ExternalEditor {
    fn name(&self) -> &str {
        &self.program
    }

    #[instrument(level = "info", skip_all, fields(editor = %self.program))]
    fn edit(&self, text: &str) -> Result<String, EditorError> {
        // Removed when `file` drops, whichever way this returns.
        let mut file = Builder::new()
            .suffix(".tmp")
            .tempfile()
            .map_err(EditorError::TempFile)?;
        file.write_all(text.as_bytes())
            .and_then(|()| file.flush())
            .map_err(EditorError::TempFile)?;

        let status = Command::new(&self.program)
            .arg(file.path())
            .status()
            .map_err(|source| EditorError::Launch {
                program: self.program.clone(),
                source,
            })?;
        debug!(%status, path = %file.path().display(), "Editor exited");

        let edited = std::fs::read_to_string(file.path()).map_err(EditorError::TempFile)?;
        info!(bytes = edited.len(), "Read edited request");
        Ok(edited)
    }
}

/// Print the prompt between rules, as it will be sent.
pub fn display_full_prompt<W: Write>(out: &mut W, request: &str) -> io::Result<()> {
    let rule = "-".repeat(50);
    writeln!(
        out,
        "{}",
        paint(Tone::Step, "Full prompt to be sent to Anthropic API:")
    )?;
    writeln!(out, "{}", paint(Tone::Body, &rule))?;
    writeln!(out, "{}", paint(Tone::Notice, request))?;
    writeln!(out, "{}", paint(Tone::Body, &rule))
}

fn edit_once<E: TextEditor, W: Write>(
    editor: &E,
    out: &mut W,
    request: &str,
) -> Result<String, EditorError> {
    writeln!(
        out,
        "{}",
        paint(
            Tone::Step,
            &format!("Opening request in {} for editing...", editor.name())
        )
    )?;
    let edited = editor.edit(request)?;
    writeln!(out, "{}", paint(Tone::Done, "Request editing completed."))?;
    Ok(edited)
}

/// Edit the request once, then keep offering further edits until declined.
///
/// # Errors
///
/// Fails if the editor cannot be run or the console cannot be read.
pub fn edit_until_done<E, R, W>(
    editor: &E,
    input: &mut R,
    out: &mut W,
    request: String,
) -> Result<String, EditorError>
where
    E: TextEditor,
    R: BufRead,
    W: Write,
{
    let mut current = edit_once(editor, out, &request)?;
    let mut rounds = 1usize;
    loop {
        display_full_prompt(out, &current)?;
        let again = crate::console::confirm(
            input,
            out,
            "Would you like to edit the prompt again? (y/n): ",
        )?;
        if !again {
            break;
        }
        current = edit_once(editor, out, &current)?;
        rounds += 1;
    }
    info!(rounds, "Request finalised");
    Ok(current)
}

//! Terminal input: the line editor and hidden password entry.

use dialoguer::{Password, console::Term};
use rustyline::{Config, DefaultEditor, EditMode};
use thiserror::Error;
use zeroize::Zeroizing;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("password required; pass it inline when input is not a terminal")]
    NoTerminal,
    #[error("password prompt failed: {0}")]
    Terminal(#[from] dialoguer::Error),
}

/// Source of passwords that were left off the command line.
pub trait SecretPrompt {
    fn read_secret(&mut self, label: &str) -> Result<Zeroizing<String>, PromptError>;
}

/// Reads a password on the terminal without echoing it.
#[derive(Debug, Default)]
pub struct HiddenPrompt;

impl SecretPrompt for HiddenPrompt {
    fn read_secret(&mut self, label: &str) -> Result<Zeroizing<String>, PromptError> {
        let secret = Password::new()
            .with_prompt(label)
            .interact_on(&Term::stderr())?;
        Ok(Zeroizing::new(secret))
    }
}

/// Used for piped input, where nobody can answer a prompt.
#[derive(Debug, Default)]
pub struct NoTerminal;

impl SecretPrompt for NoTerminal {
    fn read_secret(&mut self, _label: &str) -> Result<Zeroizing<String>, PromptError> {
        Err(PromptError::NoTerminal)
    }
}

/// Line editor for interactive sessions. History stays in memory and is
/// filled by the shell.
pub fn line_editor() -> rustyline::Result<DefaultEditor> {
    let config = Config::builder()
        .edit_mode(EditMode::Emacs)
        .auto_add_history(false)
        .build();
    DefaultEditor::with_config(config)
}

// src/infrastructure/editor.rs
use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::process::Command;
use tempfile::Builder;
use tracing::{debug, instrument};

/// Lets the user rewrite a piece of text
pub trait ContentEditor {
    fn edit(&mut self, initial: &str) -> Result<String>;
}

/// Opens `$VISUAL` or `$EDITOR` on a temporary copy of the text
#[derive(Debug, Default)]
pub struct ExternalEditor {
    command: Option<String>,
}

impl ExternalEditor {
    pub fn new() -> Self {
        Self { command: None }
    }

    /// Use `command` instead of the environment's editor
    pub fn with_command(command: impl Into<String>) -> Self {
        Self {
            command: Some(command.into()),
        }
    }

    fn resolve_command(&self) -> String {
        if let Some(command) = &self.command {
            return command.clone();
        }
        env::var("VISUAL")
            .or_else(|_| env::var("EDITOR"))
            .ok()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| default_editor().to_string())
    }
}

fn default_editor() -> &'static str {
    if cfg!(target_os = "windows") {
        "notepad"
    } else {
        "vi"
    }
}

impl ContentEditor for ExternalEditor {
    #[instrument(level = "debug", skip(self, initial))]
    fn edit(&mut self, initial: &str) -> Result<String> {
        let temp_dir = Builder::new()
            .prefix("notex-")
            .rand_bytes(5)
            .tempdir()
            .context("Failed to create temporary directory")?;
        let file_path = temp_dir.path().join("note.md");
        fs::write(&file_path, initial)
            .with_context(|| format!("Failed to write temp file at {}", file_path.display()))?;

        // Editor commands may carry arguments, e.g. "code --wait"
        let command = self.resolve_command();
        let mut parts = command.split_whitespace();
        let program = parts.next().context("Editor command is empty")?;
        debug!(program, path = %file_path.display(), "Launching editor");

        let status = Command::new(program)
            .args(parts)
            .arg(&file_path)
            .status()
            .with_context(|| format!("Failed to launch editor '{program}'"))?;
        if !status.success() {
            bail!("Editor '{program}' exited with {status}");
        }

        fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read back {}", file_path.display()))
    }
}

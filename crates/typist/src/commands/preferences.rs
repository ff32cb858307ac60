use super::Command;
use crate::error::Error;
use async_trait::async_trait;
use eyre::Result;
use shell_words::split;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command as ProcessCommand;
use typist_core::{Endpoints, Preferences};

pub struct PreferencesCommand {
    pub action: PreferencesAction,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferencesAction {
    Show,
    Edit,
    Reset,
}

#[async_trait]
impl Command for PreferencesCommand {
    async fn execute(&self) -> Result<()> {
        let mut stdout = std::io::stdout();
        match self.action {
            PreferencesAction::Show => self.show(&mut stdout).map_err(Into::into),
            PreferencesAction::Edit => self.edit(&mut stdout).map_err(Into::into),
            PreferencesAction::Reset => self.reset(&mut stdout).map_err(Into::into),
        }
    }
}

impl PreferencesCommand {
    /// Act on the preferences file in the user config directory.
    pub fn new(action: PreferencesAction) -> std::result::Result<Self, Error> {
        Ok(Self {
            action,
            path: Preferences::config_path()?,
        })
    }

    fn show(&self, out: &mut impl Write) -> std::result::Result<(), Error> {
        let prefs = Preferences::load_from(&self.path)?;

        let origin = if self.path.exists() { "" } else { " (not found, showing defaults)" };
        writeln!(out, "Preferences file: {}{origin}", self.path.display())?;
        writeln!(out, "\n{}", toml::to_string_pretty(&prefs)?)?;

        match Endpoints::from_preferences(&prefs.server) {
            Ok(endpoints) => {
                writeln!(out, "Resource: {}", endpoints.resource_url()?)?;
                writeln!(out, "Chat:     {}", endpoints.chat_post_url()?)?;
            }
            Err(e) => writeln!(out, "Invalid server URL: {e}")?,
        }
        Ok(())
    }

    fn edit(&self, out: &mut impl Write) -> std::result::Result<(), Error> {
        if !self.path.exists() {
            Preferences::default().save_to(&self.path)?;
        }

        let (editor, mut args) = Self::parse_editor_command()?;
        args.push(self.path.to_string_lossy().to_string());

        let status = ProcessCommand::new(&editor)
            .args(&args)
            .status()
            .map_err(|err| {
                Error::Process(format!(
                    "Failed to launch editor '{editor}': {err}. Set $VISUAL or $EDITOR to a valid editor."
                ))
            })?;

        if !status.success() {
            return Err(Error::Process(format!(
                "Editor '{editor}' exited with status: {status}"
            )));
        }

        if let Some(problem) = Self::validate(&self.path)? {
            writeln!(out, "Warning: {problem}. Defaults will be used until it is fixed.")?;
        }
        Ok(())
    }

    /// Parse the file strictly, since loading falls back to defaults on bad input.
    fn validate(path: &Path) -> std::result::Result<Option<String>, Error> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str::<Preferences>(&contents)
            .err()
            .map(|e| format!("{} does not parse: {}", path.display(), e.message())))
    }

    fn parse_editor_command() -> std::result::Result<(String, Vec<String>), Error> {
        let editor = ["VISUAL", "EDITOR"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|v| !v.trim().is_empty())
            .unwrap_or_else(|| {
                if cfg!(target_os = "windows") {
                    "notepad".to_string()
                } else {
                    "vi".to_string()
                }
            });

        Self::parse_editor_command_str(&editor)
    }

    fn parse_editor_command_str(editor: &str) -> std::result::Result<(String, Vec<String>), Error> {
        let parts = split(editor).map_err(|err| {
            Error::Process(format!(
                "Failed to parse editor command '{editor}': {err}. Set $VISUAL or $EDITOR to a valid editor."
            ))
        })?;

        let Some((command, args)) = parts.split_first() else {
            return Err(Error::Process(
                "Editor command is empty. Set $VISUAL or $EDITOR to a valid editor.".to_string(),
            ));
        };

        Ok((command.to_string(), args.to_vec()))
    }

    fn reset(&self, out: &mut impl Write) -> std::result::Result<(), Error> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
            writeln!(out, "Preferences reset to defaults")?;
        } else {
            writeln!(out, "No preferences file found")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn command(dir: &TempDir, action: PreferencesAction) -> PreferencesCommand {
        PreferencesCommand {
            action,
            path: dir.path().join("typist").join("preferences.toml"),
        }
    }

    #[test]
    fn parses_editor_with_arguments() {
        let (command, args) =
            PreferencesCommand::parse_editor_command_str(r"code --wait --new-window").unwrap();
        assert_eq!(command, "code");
        assert_eq!(args, vec!["--wait", "--new-window"]);
    }

    #[test]
    fn rejects_empty_editor() {
        assert!(PreferencesCommand::parse_editor_command_str("   ").is_err());
    }

    #[test]
    fn show_reports_defaults_and_urls() {
        let dir = TempDir::new().unwrap();
        let cmd = command(&dir, PreferencesAction::Show);
        let mut out = Vec::new();
        cmd.show(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("not found, showing defaults"));
        assert!(text.contains("reveal_delay_ms = 20"));
        assert!(text.contains("Resource: http://localhost:8000/index_full.html"));
        assert!(text.contains("Chat:     http://localhost:8000/chat"));
    }

    #[test]
    fn reset_removes_existing_file() {
        let dir = TempDir::new().unwrap();
        let cmd = command(&dir, PreferencesAction::Reset);
        Preferences::default().save_to(&cmd.path).unwrap();

        let mut out = Vec::new();
        cmd.reset(&mut out).unwrap();
        assert!(!cmd.path.exists());
        assert_eq!(String::from_utf8(out).unwrap(), "Preferences reset to defaults\n");

        let mut out = Vec::new();
        cmd.reset(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No preferences file found\n");
    }

    #[test]
    fn validate_flags_broken_files() {
        let dir = TempDir::new().unwrap();
        let cmd = command(&dir, PreferencesAction::Edit);
        Preferences::default().save_to(&cmd.path).unwrap();
        assert_eq!(PreferencesCommand::validate(&cmd.path).unwrap(), None);

        std::fs::write(&cmd.path, "[display]\nreveal_delay_ms = \"fast\"\n").unwrap();
        let problem = PreferencesCommand::validate(&cmd.path).unwrap();
        assert!(problem.is_some_and(|p| p.contains("does not parse")));
    }
}

//! Sharing a document's text with another program.
//!
//! [CommandShare] runs the `[share]` command from the config, writes the content to its stdin and
//! passes the suggested title both as the `{title}` placeholder in the arguments and in the
//! `FOLIO_SHARE_TITLE` environment variable.

use crate::core::error::{Error, Result};

use std::io::Write;
use std::process::{Command, Stdio};

/// Environment variable carrying the suggested title.
pub const SHARE_TITLE_ENV: &str = "FOLIO_SHARE_TITLE";
const TITLE_PLACEHOLDER: &str = "{title}";

pub trait ShareTarget {
    fn share(&self, content: &str, suggested_title: &str) -> Result<()>;
}

/// Pipes the content into an external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandShare {
    cmd: String,
    args: Vec<String>,
}

impl CommandShare {
    pub fn new(cmd: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            cmd: cmd.into(),
            args,
        }
    }

    pub fn cmd(&self) -> &str {
        &self.cmd
    }

    fn expanded_args(&self, title: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.replace(TITLE_PLACEHOLDER, title))
            .collect()
    }
}

impl ShareTarget for CommandShare {
    fn share(&self, content: &str, suggested_title: &str) -> Result<()> {
        if self.cmd.trim().is_empty() {
            return Err(Error::Share("no share command configured".into()));
        }
        let program = which::which(&self.cmd)
            .map_err(|_| Error::Share(format!("command not found: {}", self.cmd)))?;

        let mut child = Command::new(program)
            .args(self.expanded_args(suggested_title))
            .env(SHARE_TITLE_ENV, suggested_title)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::Share(format!("{}: {}", self.cmd, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(content.as_bytes())
                .map_err(|e| Error::Share(format!("{}: {}", self.cmd, e)))?;
        }

        let status = child
            .wait()
            .map_err(|e| Error::Share(format!("{}: {}", self.cmd, e)))?;
        if !status.success() {
            return Err(Error::Share(format!("{} exited with {}", self.cmd, status)));
        }
        log::info!("shared {:?} via {}", suggested_title, self.cmd);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_placeholder_is_expanded() {
        let share = CommandShare::new("mail", vec!["-s".into(), "{title}".into(), "me@x".into()]);
        assert_eq!(share.expanded_args("notes.txt"), ["-s", "notes.txt", "me@x"]);
    }

    #[test]
    fn missing_command_is_a_share_error() {
        let share = CommandShare::new("folio-no-such-share-command", Vec::new());
        assert!(matches!(share.share("x", "t"), Err(Error::Share(_))));

        let empty = CommandShare::new("  ", Vec::new());
        assert!(matches!(empty.share("x", "t"), Err(Error::Share(_))));
    }

    #[cfg(unix)]
    #[test]
    fn content_and_title_reach_the_command() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let out = dir.path().join("shared.txt");
        let script = format!("cat > '{}'; printf '%s' \"${SHARE_TITLE_ENV}\" >> '{}'", out.display(), out.display());
        let share = CommandShare::new("sh", vec!["-c".into(), script]);

        share.share("body\n", "title.txt")?;
        assert_eq!(std::fs::read_to_string(&out)?, "body\ntitle.txt");
        Ok(())
    }
}

//! Outside programs and document sources folio talks to.
//!
//! `[share]` names the command that receives shared text. Each `[[providers]]` entry mounts a
//! directory under a `content://` authority.

use crate::core::provider::{DirectoryProvider, ProviderRegistry};
use crate::core::share::CommandShare;
use crate::utils::expand_home_path;

use serde::Deserialize;

use std::sync::Arc;

/// `[share]` table. `{title}` in `args` is replaced by the document name.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub(crate) struct Share {
    cmd: String,
    args: Vec<String>,
}

impl Share {
    #[inline]
    pub(crate) fn is_configured(&self) -> bool {
        !self.cmd.trim().is_empty()
    }

    pub(crate) fn target(&self) -> CommandShare {
        CommandShare::new(self.cmd.trim(), self.args.clone())
    }
}

/// One `[[providers]]` entry.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProviderEntry {
    authority: String,
    root: String,
}

impl ProviderEntry {
    #[cfg(test)]
    pub(crate) fn new(authority: &str, root: &str) -> Self {
        Self {
            authority: authority.into(),
            root: root.into(),
        }
    }

    #[inline]
    pub(crate) fn authority(&self) -> &str {
        &self.authority
    }
}

/// Builds the registry for all configured providers. Entries with an empty authority are
/// skipped; later entries replace earlier ones with the same authority.
pub(crate) fn build_registry(entries: &[ProviderEntry]) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    for entry in entries {
        let authority = entry.authority.trim();
        if authority.is_empty() {
            eprintln!("[Warning] ignoring [[providers]] entry without an authority");
            continue;
        }
        let root = expand_home_path(entry.root.trim());
        registry.register(Arc::new(DirectoryProvider::new(authority, root)));
    }
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_skips_blank_authorities() {
        let entries = vec![
            ProviderEntry::new("notes", "/tmp/notes"),
            ProviderEntry::new("  ", "/tmp/ignored"),
            ProviderEntry::new("work", "~/work"),
        ];
        let registry = build_registry(&entries);
        assert_eq!(registry.len(), 2);
        assert!(registry.get("notes").is_some());
        assert!(registry.get("work").is_some());
    }

    #[test]
    fn share_without_command_is_unconfigured() -> Result<(), Box<dyn std::error::Error>> {
        let share: Share = toml::from_str("")?;
        assert!(!share.is_configured());

        let share: Share = toml::from_str("cmd = \"mail\"\nargs = [\"-s\", \"{title}\"]")?;
        assert!(share.is_configured());
        assert_eq!(share.target().cmd(), "mail");
        Ok(())
    }
}

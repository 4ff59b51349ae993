use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::auth::Token;
use crate::error::{BuddyError, Result};

const CONFIG_FILE_NAME: &str = ".buddy_config.json";

/// Per-user configuration file for buddyctl.
///
/// Holds the API credentials and the names that must never be deployed.
/// The file is always read and written as one whole JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Buddy personal access token
    #[serde(default)]
    pub token: String,

    /// Workspace (tenant) domain
    #[serde(default)]
    pub workspace: String,

    /// Branch and pipeline names that block deployment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protected: Option<Protected>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Protected {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline: Option<String>,
}

/// A field that `config set <key> <value>` can update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Token,
    Workspace,
    ProtectedBranch,
    ProtectedPipeline,
}

impl FromStr for ConfigKey {
    type Err = BuddyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "token" => Ok(Self::Token),
            "workspace" => Ok(Self::Workspace),
            "protected.branch" => Ok(Self::ProtectedBranch),
            "protected.pipeline" => Ok(Self::ProtectedPipeline),
            _ => Err(BuddyError::Config(format!(
                "Invalid key: {s}. Use 'token', 'workspace', 'protected.branch' or 'protected.pipeline'."
            ))),
        }
    }
}

impl Config {
    /// `~/.buddy_config.json`
    pub fn default_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(CONFIG_FILE_NAME))
            .ok_or_else(|| BuddyError::Config("Unable to determine home directory".to_string()))
    }

    /// Load the configuration, failing with [`BuddyError::MissingConfig`] if the file is absent.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(BuddyError::MissingConfig(path.display().to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        debug!("Loaded config from {}", path.display());

        serde_json::from_str(&contents).map_err(|e| {
            BuddyError::Config(format!("Failed to parse {}: {e}", path.display()))
        })
    }

    /// Like [`Config::load`], but an absent file yields an empty configuration.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(BuddyError::MissingConfig(_)) => Ok(Self::default()),
            other => other,
        }
    }

    /// Write the whole document with owner-only permissions.
    ///
    /// The content goes to a sibling temp file first and is renamed into
    /// place, so a crash never leaves a half-written config behind.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("json.tmp");
        {
            let mut options = OpenOptions::new();
            options.write(true).create(true).truncate(true);
            #[cfg(unix)]
            {
                use std::os::unix::fs::OpenOptionsExt;
                options.mode(0o600);
            }

            let mut file = options.open(&tmp_path)?;
            file.write_all(contents.as_bytes())?;
            file.sync_all()?;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o600))?;
        }

        fs::rename(&tmp_path, path)?;
        debug!("Saved config to {}", path.display());

        Ok(())
    }

    /// Delete the configuration file. Returns `false` if there was nothing to delete.
    pub fn reset(path: &Path) -> Result<bool> {
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Update one field. An empty value clears a protected name.
    pub fn set(&mut self, key: ConfigKey, value: &str) {
        let protected_value = (!value.is_empty()).then(|| value.to_string());

        match key {
            ConfigKey::Token => self.token = value.to_string(),
            ConfigKey::Workspace => self.workspace = value.to_string(),
            ConfigKey::ProtectedBranch => {
                self.protected.get_or_insert_with(Protected::default).branch = protected_value;
            }
            ConfigKey::ProtectedPipeline => {
                self.protected.get_or_insert_with(Protected::default).pipeline = protected_value;
            }
        }

        if self
            .protected
            .as_ref()
            .is_some_and(|p| p.branch.is_none() && p.pipeline.is_none())
        {
            self.protected = None;
        }
    }

    /// Deploying needs both a token and a workspace.
    pub fn ensure_complete(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(BuddyError::Config(
                "No API token configured. Run `buddyctl config set token <value>`".to_string(),
            ));
        }
        if self.workspace.trim().is_empty() {
            return Err(BuddyError::Config(
                "No workspace configured. Run `buddyctl config set workspace <value>`".to_string(),
            ));
        }
        Ok(())
    }

    pub fn token(&self) -> Token {
        Token::from(self.token.as_str())
    }

    pub fn protected_branch(&self) -> Option<&str> {
        self.protected.as_ref()?.branch.as_deref()
    }

    pub fn protected_pipeline(&self) -> Option<&str> {
        self.protected.as_ref()?.pipeline.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn full_config() -> Config {
        Config {
            token: "t1".to_string(),
            workspace: "w1".to_string(),
            protected: Some(Protected {
                branch: Some("main".to_string()),
                pipeline: Some("CD".to_string()),
            }),
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.token.is_empty());
        assert!(config.workspace.is_empty());
        assert!(config.protected.is_none());
        assert!(config.ensure_complete().is_err());
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = full_config();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert!(!dir.path().join("config.json.tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        full_config().save(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        full_config().save(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_load_json_without_protected() {
        let mut temp_file = NamedTempFile::with_suffix(".json").unwrap();
        write!(temp_file, r#"{{"token": "abc", "workspace": "acme"}}"#).unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.token, "abc");
        assert_eq!(config.workspace, "acme");
        assert_eq!(config.protected_branch(), None);
        assert_eq!(config.protected_pipeline(), None);
        assert!(config.ensure_complete().is_ok());
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, BuddyError::MissingConfig(_)));
        assert_eq!(Config::load_or_default(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_load_corrupt_config() {
        let mut temp_file = NamedTempFile::with_suffix(".json").unwrap();
        write!(temp_file, "{{ not json").unwrap();

        let err = Config::load(temp_file.path()).unwrap_err();
        assert!(matches!(err, BuddyError::Config(_)));
        assert!(Config::load_or_default(temp_file.path()).is_err());
    }

    #[test]
    fn test_config_key_parsing() {
        assert_eq!("TOKEN".parse::<ConfigKey>().unwrap(), ConfigKey::Token);
        assert_eq!("workspace".parse::<ConfigKey>().unwrap(), ConfigKey::Workspace);
        assert_eq!(
            "protected.branch".parse::<ConfigKey>().unwrap(),
            ConfigKey::ProtectedBranch
        );
        assert_eq!(
            "Protected.Pipeline".parse::<ConfigKey>().unwrap(),
            ConfigKey::ProtectedPipeline
        );
        assert!("region".parse::<ConfigKey>().is_err());
    }

    #[test]
    fn test_set_protected_values() {
        let mut config = Config::default();
        config.set(ConfigKey::ProtectedBranch, "main");
        config.set(ConfigKey::ProtectedPipeline, "CD");
        assert_eq!(config.protected_branch(), Some("main"));
        assert_eq!(config.protected_pipeline(), Some("CD"));

        config.set(ConfigKey::ProtectedBranch, "");
        assert_eq!(config.protected_branch(), None);
        assert_eq!(config.protected_pipeline(), Some("CD"));

        config.set(ConfigKey::ProtectedPipeline, "");
        assert!(config.protected.is_none());
    }

    #[test]
    fn test_set_credentials() {
        let mut config = Config::default();
        config.set(ConfigKey::Token, "abc");
        config.set(ConfigKey::Workspace, "acme");
        assert_eq!(config.token(), Token::from("abc"));
        assert_eq!(config.workspace, "acme");
        assert!(config.protected.is_none());
    }

    #[test]
    fn test_reset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        full_config().save(&path).unwrap();

        assert!(Config::reset(&path).unwrap());
        assert!(!path.exists());
        assert!(!Config::reset(&path).unwrap());
    }
}

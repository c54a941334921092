//! Configuration types and parsing for mq2.yml

use crate::error::{CoreError, CoreResult};
use crate::ids::{is_path_component, SessionId};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Service configuration from mq2.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Folder holding one sub-folder per upload session
    pub upload_folder: PathBuf,

    /// File extensions accepted for uploaded archives (without the dot)
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,

    /// Mimetypes accepted for uploaded archives
    #[serde(default = "default_allowed_mimetypes")]
    pub allowed_mimetypes: Vec<String>,

    /// Demo session that the retention sweep never removes
    #[serde(default)]
    pub sample_session: Option<SessionId>,

    /// Sessions older than this many days are removed by the retention sweep
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
}

const DEFAULT_RETENTION_DAYS: u32 = 7;

fn default_allowed_extensions() -> Vec<String> {
    vec!["zip".to_string()]
}

fn default_allowed_mimetypes() -> Vec<String> {
    vec![
        "application/zip".to_string(),
        "application/x-zip-compressed".to_string(),
    ]
}

fn default_retention_days() -> u32 {
    DEFAULT_RETENTION_DAYS
}

impl Config {
    /// Build a configuration with defaults around an upload folder
    pub fn with_upload_folder(upload_folder: impl Into<PathBuf>) -> Self {
        Self {
            upload_folder: upload_folder.into(),
            allowed_extensions: default_allowed_extensions(),
            allowed_mimetypes: default_allowed_mimetypes(),
            sample_session: None,
            retention_days: DEFAULT_RETENTION_DAYS,
        }
    }

    /// Load configuration from a file path
    ///
    /// A relative `upload_folder` is resolved against the directory holding
    /// the configuration file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let mut config: Config = serde_yaml::from_str(&content)?;
        if config.upload_folder.is_relative() {
            if let Some(parent) = path.parent() {
                config.upload_folder = parent.join(&config.upload_folder);
            }
        }
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory
    /// Looks for mq2.yml or mq2.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("mq2.yml");
        let yaml_path = dir.join("mq2.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.upload_folder.as_os_str().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "upload_folder cannot be empty".to_string(),
            });
        }

        if self.allowed_extensions.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "At least one allowed_extensions entry must be specified".to_string(),
            });
        }

        if let Some(ext) = self
            .allowed_extensions
            .iter()
            .find(|ext| ext.starts_with('.') || !is_path_component(ext))
        {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "Invalid extension '{ext}' in allowed_extensions (list extensions without the leading dot)"
                ),
            });
        }

        if self.retention_days == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "retention_days must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Check an uploaded file name and mimetype against the allow-lists.
    pub fn is_allowed_upload(&self, file_name: &str, mimetype: &str) -> bool {
        let extension_ok = file_name
            .rsplit_once('.')
            .is_some_and(|(_, ext)| self.allowed_extensions.iter().any(|a| a == ext));
        let mimetype_ok = self.allowed_mimetypes.iter().any(|m| m == mimetype);
        if !(extension_ok && mimetype_ok) {
            log::warn!("Rejected upload: {file_name} - {mimetype}");
        }
        extension_ok && mimetype_ok
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

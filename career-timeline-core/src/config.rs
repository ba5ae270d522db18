use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

pub const DEFAULT_STACK_NAME: &str = "career-timeline-api";
pub const DEFAULT_API_ENDPOINT_OUTPUT: &str = "ApiEndpoint";
pub const DEFAULT_BUCKET_NAME_OUTPUT: &str = "S3BucketName";
pub const DEFAULT_ENV_VAR_NAME: &str = "VITE_PUBLIC_API_URL";
pub const DEFAULT_ENV_FILE_NAME: &str = ".env.local";
pub const DEFAULT_OBJECT_KEY: &str = "careerEvents.json";
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";
pub const DEFAULT_REGION: &str = "eu-west-1";

/// Directory, below the project root, that relative data file paths are
/// resolved against.
pub const SCRIPTS_DIR: &str = "scripts";

/// Names shared by both operations. Every field defaults to the value the
/// deployed stack and the site's build tooling expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub stack_name: String,
    pub api_endpoint_output: String,
    pub bucket_name_output: String,
    pub env_var_name: String,
    pub env_file_name: String,
    pub object_key: String,
    pub content_type: String,
    pub default_region: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            stack_name: DEFAULT_STACK_NAME.to_string(),
            api_endpoint_output: DEFAULT_API_ENDPOINT_OUTPUT.to_string(),
            bucket_name_output: DEFAULT_BUCKET_NAME_OUTPUT.to_string(),
            env_var_name: DEFAULT_ENV_VAR_NAME.to_string(),
            env_file_name: DEFAULT_ENV_FILE_NAME.to_string(),
            object_key: DEFAULT_OBJECT_KEY.to_string(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            default_region: DEFAULT_REGION.to_string(),
        }
    }
}

impl Settings {
    pub fn trace_loaded(&self) {
        info!(
            stack_name = %self.stack_name,
            env_var_name = %self.env_var_name,
            object_key = %self.object_key,
            "Loaded Settings"
        );
        debug!(?self, "Settings loaded (full debug)");
    }

    /// Location of the env file inside `project_root`.
    pub fn env_file_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.env_file_name)
    }
}

/// Resolve a data file path the way the operator passes it: absolute paths
/// are kept, relative ones are taken from `<project_root>/scripts`.
pub fn resolve_data_path(project_root: &Path, file: &Path) -> PathBuf {
    if file.is_absolute() {
        return file.to_path_buf();
    }
    normalize(&project_root.join(SCRIPTS_DIR).join(file))
}

// Lexically fold `.` and `..` so the reported path reads like the one the
// operator meant; the file itself may not exist yet.
fn normalize(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(out.components().next_back(), Some(Component::Normal(_)))
                    && out.pop();
                if !popped {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Load settings from an optional YAML file. Without a path the defaults
/// are returned; fields missing from the file keep their defaults.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let Some(path) = path else {
        debug!("No settings file given, using defaults");
        return Ok(Settings::default());
    };
    info!(config_path = ?path, "Loading settings from file");

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path, "Failed to read settings file");
            return Err(anyhow::anyhow!(
                "Failed to read settings file {:?}: {}",
                path,
                e
            ));
        }
    };

    // An empty document deserializes to unit, not to a map.
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }

    match serde_yaml::from_str::<Settings>(&content) {
        Ok(settings) => {
            info!(config_path = ?path, "Parsed settings YAML successfully");
            Ok(settings)
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path, "Failed to parse settings YAML");
            Err(anyhow::anyhow!("Failed to parse settings YAML: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_data_path_lands_in_project_data_dir() {
        let resolved = resolve_data_path(
            Path::new("/home/me/site"),
            Path::new("../data/careerEvents.json"),
        );
        assert_eq!(resolved, PathBuf::from("/home/me/site/data/careerEvents.json"));
    }

    #[test]
    fn absolute_data_path_is_kept() {
        let resolved = resolve_data_path(Path::new("/home/me/site"), Path::new("/tmp/data.json"));
        assert_eq!(resolved, PathBuf::from("/tmp/data.json"));
    }

    #[test]
    fn relative_root_keeps_leading_parent_components() {
        let resolved = resolve_data_path(Path::new("."), Path::new("../../elsewhere.json"));
        assert_eq!(resolved, PathBuf::from("../elsewhere.json"));
    }

    #[test]
    fn env_file_lives_in_project_root() {
        let settings = Settings::default();
        assert_eq!(
            settings.env_file_path(Path::new("/srv/site")),
            PathBuf::from("/srv/site/.env.local")
        );
    }
}

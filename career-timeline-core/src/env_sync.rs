//! Keeps the local env file pointed at the deployed API.
//!
//! One linear run: describe the stack, pick the API endpoint output, compare
//! it with what the env file already holds and rewrite the file only when
//! the value changed. An unchanged value leaves the file's bytes untouched.

use std::path::Path;

use tracing::{error, info};

use crate::config::Settings;
use crate::contract::{CollaboratorError, StackDescriber};
use crate::env_file::{EnvFile, EnvFileError};
use crate::outputs::{find_output_value, OutputError};

#[derive(Debug, thiserror::Error)]
pub enum EnvSyncError {
    #[error(transparent)]
    Describe(#[from] CollaboratorError),
    #[error("API endpoint unavailable: {0}")]
    Output(#[from] OutputError),
    #[error(transparent)]
    Write(#[from] EnvFileError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvSyncOutcome {
    /// The stored value already matched; nothing was written.
    Unchanged { value: String },
    /// No env file existed; a new one was written.
    Created { value: String },
    /// The env file was rewritten with the new value.
    Updated {
        value: String,
        previous: Option<String>,
    },
}

impl EnvSyncOutcome {
    pub fn value(&self) -> &str {
        match self {
            EnvSyncOutcome::Unchanged { value }
            | EnvSyncOutcome::Created { value }
            | EnvSyncOutcome::Updated { value, .. } => value,
        }
    }

    pub fn wrote_file(&self) -> bool {
        !matches!(self, EnvSyncOutcome::Unchanged { .. })
    }
}

pub async fn sync_env_file<D>(
    describer: &D,
    settings: &Settings,
    env_path: &Path,
) -> Result<EnvSyncOutcome, EnvSyncError>
where
    D: StackDescriber + ?Sized,
{
    info!(stack_name = %settings.stack_name, "[ENV] Fetching stack outputs");
    let outputs = describer
        .describe_outputs(&settings.stack_name)
        .await
        .map_err(|e| {
            error!(error = %e, "[ENV][ERROR] Describing stack failed");
            e
        })?;

    let value = find_output_value(&outputs, &settings.api_endpoint_output)
        .map_err(|e| {
            error!(error = %e, "[ENV][ERROR] API endpoint output unavailable");
            e
        })?
        .to_string();
    info!(api_url = %value, "[ENV] Retrieved API URL");

    let existed = env_path.exists();
    let mut env = EnvFile::load(env_path);

    if env.get(&settings.env_var_name) == Some(value.as_str()) {
        info!(
            path = %env_path.display(),
            var = %settings.env_var_name,
            "[ENV] Env file already up to date, no changes needed"
        );
        return Ok(EnvSyncOutcome::Unchanged { value });
    }

    let previous = env.set(settings.env_var_name.clone(), value.clone());
    env.write(env_path)?;
    info!(
        path = %env_path.display(),
        var = %settings.env_var_name,
        previous = ?previous,
        "[ENV] Env file updated with latest API URL"
    );

    Ok(if existed {
        EnvSyncOutcome::Updated { value, previous }
    } else {
        EnvSyncOutcome::Created { value }
    })
}

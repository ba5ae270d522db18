//! Publishes the local career data file to the site's bucket.
//!
//! The file is validated as JSON before any collaborator is called; the
//! parsed value is thrown away and the original text is what gets stored,
//! so formatting and key order in the uploaded object match the file on
//! disk exactly.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::config::Settings;
use crate::contract::{CollaboratorError, ObjectStore, PutObjectRequest, StackDescriber};
use crate::outputs::{find_output_value, OutputError};

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("file not found at {}", path.display())]
    FileNotFound { path: PathBuf },
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid JSON in {}: {source}", path.display())]
    InvalidJson {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Describe(CollaboratorError),
    #[error("could not find S3 bucket name in stack outputs: {0}")]
    Output(#[from] OutputError),
    #[error(transparent)]
    Put(CollaboratorError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    pub bucket: String,
    pub key: String,
    pub bytes: usize,
    pub e_tag: Option<String>,
}

/// Read `path` and check that it holds valid JSON. Returns the text as read.
///
/// Validation uses `serde_json`, which rejects documents nested deeper than
/// 128 levels even when they are otherwise valid JSON.
pub fn read_career_data(path: &Path) -> Result<String, UploadError> {
    if !path.exists() {
        error!(path = %path.display(), "[UPLOAD][ERROR] Career data file not found");
        return Err(UploadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|source| UploadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if let Err(source) = serde_json::from_str::<serde::de::IgnoredAny>(&content) {
        error!(path = %path.display(), error = %source, "[UPLOAD][ERROR] Career data is not valid JSON");
        return Err(UploadError::InvalidJson {
            path: path.to_path_buf(),
            source,
        });
    }

    debug!(path = %path.display(), bytes = content.len(), "[UPLOAD] Career data file is valid JSON");
    Ok(content)
}

/// One-shot pipeline for library callers: read, validate, resolve the
/// bucket and upload. The CLI runs the same steps one by one so it can
/// report progress between them.
pub async fn upload_career_data<D, S>(
    describer: &D,
    store: &S,
    settings: &Settings,
    data_path: &Path,
) -> Result<UploadReport, UploadError>
where
    D: StackDescriber + ?Sized,
    S: ObjectStore + ?Sized,
{
    info!(path = %data_path.display(), "[UPLOAD] Reading career data");
    let body = read_career_data(data_path)?;
    let bucket = resolve_bucket(describer, settings).await?;
    put_career_data(store, settings, bucket, body).await
}

/// Look up the destination bucket in the stack outputs.
pub async fn resolve_bucket<D>(describer: &D, settings: &Settings) -> Result<String, UploadError>
where
    D: StackDescriber + ?Sized,
{
    info!(stack_name = %settings.stack_name, "[UPLOAD] Fetching bucket name from stack outputs");
    let outputs = describer
        .describe_outputs(&settings.stack_name)
        .await
        .map_err(|e| {
            error!(error = %e, "[UPLOAD][ERROR] Describing stack failed");
            UploadError::Describe(e)
        })?;

    let bucket = find_output_value(&outputs, &settings.bucket_name_output)
        .map_err(|e| {
            error!(error = %e, "[UPLOAD][ERROR] Bucket name output unavailable");
            e
        })?
        .to_string();
    info!(bucket = %bucket, "[UPLOAD] Found S3 bucket");
    Ok(bucket)
}

/// Store already-validated career data text in `bucket`.
pub async fn put_career_data<S>(
    store: &S,
    settings: &Settings,
    bucket: String,
    body: String,
) -> Result<UploadReport, UploadError>
where
    S: ObjectStore + ?Sized,
{
    let bytes = body.len();
    let req = PutObjectRequest {
        bucket: bucket.clone(),
        key: settings.object_key.clone(),
        body,
        content_type: settings.content_type.clone(),
    };
    let receipt = store.put_object(req).await.map_err(|e| {
        error!(error = %e, bucket = %bucket, "[UPLOAD][ERROR] Put object failed");
        UploadError::Put(e)
    })?;
    info!(bucket = %receipt.bucket, key = %receipt.key, bytes, "[UPLOAD] Career data uploaded");

    Ok(UploadReport {
        bucket: receipt.bucket,
        key: receipt.key,
        bytes,
        e_tag: receipt.e_tag,
    })
}

#![allow(unused)]

//! # contract: seams to the cloud collaborators
//!
//! The core never talks to a cloud SDK directly. Both pipelines take their
//! collaborators as trait objects (or generics) implementing the traits below:
//!
//! - [`StackDescriber`]: returns the named outputs of a deployed stack.
//! - [`ObjectStore`]: stores a single object in a bucket.
//!
//! The CLI crate provides the AWS-backed implementations. Tests use the
//! `mockall` mocks generated here (`MockStackDescriber`, `MockObjectStore`),
//! exported under the `test-export-mocks` feature.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use mockall::{automock, predicate::*};

/// A named value exported by a deployed stack.
///
/// Field names follow the CloudFormation JSON shape so output dumps from
/// `aws cloudformation describe-stacks` deserialize directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackOutput {
    pub output_key: String,
    #[serde(default)]
    pub output_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_name: Option<String>,
}

impl StackOutput {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            output_key: key.into(),
            output_value: Some(value.into()),
            description: None,
            export_name: None,
        }
    }
}

/// Everything needed to store one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutObjectRequest {
    pub bucket: String,
    pub key: String,
    /// Object body, stored verbatim.
    pub body: String,
    pub content_type: String,
}

/// What the store reports back after a successful put.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutObjectReceipt {
    pub bucket: String,
    pub key: String,
    pub e_tag: Option<String>,
}

/// Failure reported by a collaborator (network, credentials, service errors).
#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    #[error("failed to describe stack '{stack_name}': {message}")]
    DescribeStack { stack_name: String, message: String },
    #[error("failed to put object s3://{bucket}/{key}: {message}")]
    PutObject {
        bucket: String,
        key: String,
        message: String,
    },
}

/// Source of stack outputs.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait StackDescriber: Send + Sync {
    /// Return the outputs of `stack_name`, in the order the service reports them.
    async fn describe_outputs(&self, stack_name: &str)
        -> Result<Vec<StackOutput>, CollaboratorError>;
}

/// Destination for single-shot object uploads.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `req.body` under `req.key` in `req.bucket`, replacing any existing object.
    async fn put_object(&self, req: PutObjectRequest)
        -> Result<PutObjectReceipt, CollaboratorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_outputs_deserialize_from_cloudformation_json() {
        let raw = r#"[
            {"OutputKey": "ApiEndpoint", "OutputValue": "https://api.example.com/prod", "Description": "API"},
            {"OutputKey": "S3BucketName", "OutputValue": "my-bucket", "ExportName": "career-bucket"}
        ]"#;
        let outputs: Vec<StackOutput> = serde_json::from_str(raw).unwrap();
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[0].output_key, "ApiEndpoint");
        assert_eq!(
            outputs[0].output_value.as_deref(),
            Some("https://api.example.com/prod")
        );
        assert_eq!(outputs[1].export_name.as_deref(), Some("career-bucket"));
    }

    #[test]
    fn stack_output_without_value_deserializes_to_none() {
        let output: StackOutput = serde_json::from_str(r#"{"OutputKey": "ApiEndpoint"}"#).unwrap();
        assert_eq!(output.output_value, None);
    }
}

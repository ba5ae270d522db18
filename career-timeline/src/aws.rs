//! # AWS-backed collaborators
//!
//! Implements the core's [`StackDescriber`] and [`ObjectStore`] traits with
//! the AWS SDK (CloudFormation `DescribeStacks`, S3 `PutObject`).
//!
//! Credentials and region come from an explicit [`AwsContext`] passed to the
//! client constructors. Nothing here reads or mutates `AWS_PROFILE`; when a
//! context field is unset the SDK's default provider chain decides.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_cloudformation::types::Output;
use aws_sdk_s3::primitives::ByteStream;
use tracing::{debug, error, info, warn};

use career_timeline_core::contract::{
    CollaboratorError, ObjectStore, PutObjectReceipt, PutObjectRequest, StackDescriber,
    StackOutput,
};

/// Profile and region selection for every client built in one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwsContext {
    pub profile: Option<String>,
    pub region: Option<String>,
}

impl AwsContext {
    /// Resolve the shared SDK configuration (credentials provider, region).
    pub async fn load(&self) -> SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(profile) = &self.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(region) = &self.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let config = loader.load().await;
        info!(
            profile = self.profile.as_deref().unwrap_or("<ambient>"),
            region = ?config.region(),
            "Initialized AWS configuration"
        );
        config
    }
}

pub struct CloudFormationDescriber {
    client: aws_sdk_cloudformation::Client,
}

impl CloudFormationDescriber {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_cloudformation::Client::new(config),
        }
    }
}

fn to_stack_output(output: &Output) -> StackOutput {
    StackOutput {
        output_key: output.output_key().unwrap_or_default().to_string(),
        output_value: output.output_value().map(str::to_string),
        description: output.description().map(str::to_string),
        export_name: output.export_name().map(str::to_string),
    }
}

#[async_trait]
impl StackDescriber for CloudFormationDescriber {
    async fn describe_outputs(
        &self,
        stack_name: &str,
    ) -> Result<Vec<StackOutput>, CollaboratorError> {
        tracing::info!(stack_name, "Describing CloudFormation stack");
        let response = self
            .client
            .describe_stacks()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(|e| {
                let message = aws_sdk_cloudformation::error::DisplayErrorContext(&e).to_string();
                error!(stack_name, error = %message, "DescribeStacks failed");
                CollaboratorError::DescribeStack {
                    stack_name: stack_name.to_string(),
                    message,
                }
            })?;

        let Some(stack) = response.stacks().first() else {
            warn!(stack_name, "DescribeStacks returned no stacks");
            return Ok(Vec::new());
        };
        let outputs: Vec<StackOutput> = stack.outputs().iter().map(to_stack_output).collect();
        debug!(stack_name, count = outputs.len(), "Fetched stack outputs");
        Ok(outputs)
    }
}

pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_s3::Client::new(config),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(
        &self,
        req: PutObjectRequest,
    ) -> Result<PutObjectReceipt, CollaboratorError> {
        tracing::info!(
            bucket = %req.bucket,
            key = %req.key,
            bytes = req.body.len(),
            "Uploading object to S3"
        );
        let result = self
            .client
            .put_object()
            .bucket(&req.bucket)
            .key(&req.key)
            .content_type(&req.content_type)
            .body(ByteStream::from(req.body.into_bytes()))
            .send()
            .await;

        match result {
            Ok(output) => {
                tracing::info!(bucket = %req.bucket, key = %req.key, "Successfully uploaded object");
                Ok(PutObjectReceipt {
                    bucket: req.bucket,
                    key: req.key,
                    e_tag: output.e_tag().map(str::to_string),
                })
            }
            Err(e) => {
                let message = aws_sdk_s3::error::DisplayErrorContext(&e).to_string();
                tracing::error!(bucket = %req.bucket, key = %req.key, error = %message, "PutObject failed");
                Err(CollaboratorError::PutObject {
                    bucket: req.bucket,
                    key: req.key,
                    message,
                })
            }
        }
    }
}

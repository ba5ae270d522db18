#![doc = "career-timeline-core: core logic for the career-timeline operator tooling."]

//! This crate holds the data model and the two operator pipelines:
//! syncing the deployed API URL into the local env file, and uploading the
//! career data file to the site's bucket. Cloud access goes through the
//! traits in [`contract`]; the AWS-backed implementations live in the CLI
//! crate.
//!
//! # Usage
//! Call [`env_sync::sync_env_file`] or [`upload::upload_career_data`] with
//! a [`contract::StackDescriber`] (and [`contract::ObjectStore`]) and a
//! [`config::Settings`].

pub mod config;
pub mod contract;
pub mod env_file;
pub mod env_sync;
pub mod outputs;
pub mod upload;

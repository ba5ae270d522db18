pub mod aws;
pub mod cli;
pub mod report;

pub use cli::{run, Cli, Commands, UploadArgs};

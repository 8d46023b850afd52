//! Infrastructure layer for MindSage.
//!
//! File-system backed implementations: configuration loading and the
//! persisted identity client.

pub mod config_service;
pub mod file_identity_client;
pub mod paths;

pub use config_service::ConfigService;
pub use file_identity_client::{FileIdentityClient, FileIdentityClientFactory};
pub use paths::MindsagePaths;

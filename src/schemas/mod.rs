// Serde schemas for the files setup-shellbox reads.
pub mod setup_config;

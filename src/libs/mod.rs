// Shared building blocks used by the installers and the menu.

// Loads `config.yaml` and resolves it into runtime `Settings`.
pub mod config_loading;
// `SetupError`, `InstallOutcome` and the crate `Result` alias.
pub mod errors;
// The `Host` trait: every process, PATH lookup, download and login-shell change.
pub mod host;
// Section banners.
pub mod presenter;
// Keyed-line and append-once edits to shell startup files.
pub mod shell_configurator;
pub mod utilities;

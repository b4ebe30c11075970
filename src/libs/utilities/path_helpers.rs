use crate::{log_debug, log_warn};
use colored::Colorize;
use std::env;
use std::path::PathBuf;

/// Expands `~` and `$VAR`/`${VAR}` references in a configured path.
///
/// Unset variables are not fatal: the path is then expanded for `~` only and
/// the variable reference is left as written, with a warning.
pub fn expand_path(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(e) => {
            log_warn!(
                "[Paths] Could not expand variables in '{}': {}. Expanding '~' only.",
                path.yellow(),
                e
            );
            PathBuf::from(shellexpand::tilde(path).as_ref())
        }
    }
}

/// Directory that holds setup-shellbox's own files, `~/.setup-shellbox`.
/// Falls back to the working directory when no home directory can be determined.
pub fn get_shellbox_dir() -> PathBuf {
    let base = dirs::home_dir()
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    let dir = base.join(".setup-shellbox");
    log_debug!(
        "[Paths] setup-shellbox directory resolved to: {}",
        dir.display().to_string().cyan()
    );
    dir
}

pub fn default_config_path() -> PathBuf {
    get_shellbox_dir().join("config.yaml")
}

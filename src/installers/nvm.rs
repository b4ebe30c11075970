use std::fs;

use colored::Colorize; // Highlights paths and URLs in log lines.

use crate::libs::config_loading::Settings;
use crate::libs::errors::{InstallOutcome, Result};
use crate::libs::host::{CommandSpec, Host};
use crate::{log_debug, log_info};

/// nvm counts as installed when `nvm` resolves on `PATH` or `$NVM_DIR/nvm.sh` exists.
/// nvm is a shell function, so a child process normally only sees the second marker.
pub fn is_installed(host: &dyn Host, settings: &Settings) -> bool {
    host.resolve("nvm").is_some() || settings.nvm_dir.join("nvm.sh").is_file()
}

/// Installs nvm with its upstream install script.
///
/// The current process environment is not touched: the user has to open a new shell
/// (or source the startup file) before `nvm` is usable.
///
/// # Arguments
/// * `host`: Downloads the install script and runs it with `bash`.
/// * `settings`: Supplies `nvm_dir` and the installer URL.
///
/// # Returns
/// * `Result<InstallOutcome>`:
///   - `Ok(InstallOutcome::AlreadySatisfied)` if [`is_installed`] holds.
///   - `Ok(InstallOutcome::Installed)` once the script exits successfully.
///   - An `Err` if the download or the script fails.
pub fn install_node_manager(
    host: &mut dyn Host,
    settings: &Settings,
) -> Result<InstallOutcome> {
    if is_installed(host, settings) {
        log_info!("[Node] nvm is already installed.");
        return Ok(InstallOutcome::AlreadySatisfied);
    }

    // The upstream script refuses to run when NVM_DIR points at a missing directory.
    fs::create_dir_all(&settings.nvm_dir)?;
    log_debug!("[Node] Using NVM_DIR={}", settings.nvm_dir.display());

    log_info!("[Node] Installing nvm...");
    let script = host.fetch_script(&settings.nvm_installer_url)?;
    let spec = CommandSpec::new("bash")
        .arg(script.display().to_string())
        .env("NVM_DIR", settings.nvm_dir.display().to_string());
    host.run(&spec)?;

    log_info!("[Node] {}", "nvm installed.".green());
    log_info!(
        "[Node] Open a new terminal or run {} to start using nvm.",
        format!("source {}", settings.zshrc_path.display()).bold()
    );
    Ok(InstallOutcome::Installed)
}

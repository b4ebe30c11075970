//! # Oh My Zsh + theme installer
//!
//! Composite installer. Each step probes its own target state first and is skipped
//! when that state already holds, so the whole operation can be re-run safely:
//!
//! 1. `git` present (apt install after an index refresh otherwise)
//! 2. zsh present (delegates to [`crate::installers::shell`])
//! 3. Oh My Zsh directory present (remote installer, `--unattended`)
//! 4. theme checkout present (`git clone --depth=1`)
//! 5. `ZSH_THEME` selects the theme in `~/.zshrc`
//! 6. zsh is the login shell (`chsh`)
//!
//! Any failing command aborts the remaining steps and propagates.

use std::path::Path;

use colored::Colorize; // Highlights paths and values in log lines.

use crate::installers::{apt, shell};
use crate::libs::config_loading::Settings;
use crate::libs::errors::{InstallOutcome, Result, SetupError};
use crate::libs::host::{CommandSpec, Host};
use crate::libs::shell_configurator::{KeyedLineChange, set_keyed_line};
use crate::{log_debug, log_info};

/// Variable in `.zshrc` that selects the Oh My Zsh theme.
pub const THEME_KEY: &str = "ZSH_THEME";

/// Runs the six steps listed in the module docs, in order.
///
/// # Arguments
/// * `host`: Runs the package manager, installer script, `git` and `chsh`.
/// * `settings`: Supplies the framework and theme locations and the `.zshrc` path.
///
/// # Returns
/// * `Result<InstallOutcome>`:
///   - `Ok(InstallOutcome::Installed)` if any step changed something.
///   - `Ok(InstallOutcome::AlreadySatisfied)` if every step was already in place.
///   - The first step error, after which no further step runs.
pub fn install_framework_and_theme(
    host: &mut dyn Host,
    settings: &Settings,
) -> Result<InstallOutcome> {
    let mut outcome = ensure_git(host, settings)?;
    outcome = outcome.merge(shell::install_shell(host, settings)?);
    outcome = outcome.merge(ensure_framework(host, settings)?);
    outcome = outcome.merge(ensure_theme(host, settings)?);
    outcome = outcome.merge(ensure_theme_selected(settings)?);
    outcome = outcome.merge(ensure_default_shell(host, settings)?);
    log_debug!("[Framework] Finished with outcome {:?}", outcome);
    Ok(outcome)
}

fn ensure_git(host: &mut dyn Host, settings: &Settings) -> Result<InstallOutcome> {
    if host.resolve("git").is_some() {
        log_info!("[Framework] git is already installed.");
        return Ok(InstallOutcome::AlreadySatisfied);
    }
    log_info!("[Framework] git not found. Installing...");
    apt::update(host, settings)?;
    apt::install(host, settings, &["git".to_string()])?;
    Ok(InstallOutcome::Installed)
}

fn ensure_framework(host: &mut dyn Host, settings: &Settings) -> Result<InstallOutcome> {
    let dir = &settings.framework_dir;
    if dir.exists() {
        log_info!(
            "[Framework] Oh My Zsh is already installed at {}.",
            dir.display().to_string().cyan()
        );
        return Ok(InstallOutcome::AlreadySatisfied);
    }

    log_info!("[Framework] Installing Oh My Zsh into {}...", dir.display());
    let script = host.fetch_script(&settings.framework_installer_url)?;
    // RUNZSH/CHSH keep the installer from starting zsh or changing the login shell itself.
    let spec = CommandSpec::new("sh")
        .arg(script.display().to_string())
        .arg("--unattended")
        .env("ZSH", dir.display().to_string())
        .env("RUNZSH", "no")
        .env("CHSH", "no");
    host.run(&spec)?;
    log_info!("[Framework] {}", "Oh My Zsh installed.".green());
    Ok(InstallOutcome::Installed)
}

fn ensure_theme(host: &mut dyn Host, settings: &Settings) -> Result<InstallOutcome> {
    let dir = &settings.theme_dir;
    if dir.exists() {
        log_info!(
            "[Framework] Theme {} is already installed.",
            settings.theme_name.bold()
        );
        return Ok(InstallOutcome::AlreadySatisfied);
    }

    log_info!("[Framework] Cloning theme {}...", settings.theme_name.bold());
    let spec = CommandSpec::new("git")
        .args(["clone", "--depth=1"])
        .arg(settings.theme_repo.as_str())
        .arg(dir.display().to_string());
    host.run(&spec)?;
    Ok(InstallOutcome::Installed)
}

pub fn theme_line(settings: &Settings) -> String {
    format!("{THEME_KEY}=\"{}\"", settings.theme_value)
}

fn ensure_theme_selected(settings: &Settings) -> Result<InstallOutcome> {
    let line = theme_line(settings);
    let change = set_keyed_line(
        &settings.zshrc_path,
        THEME_KEY,
        &line,
        settings.theme_line_strategy,
    )?;

    Ok(match change {
        KeyedLineChange::AlreadyPresent => {
            log_info!("[Framework] {} already selects {}.", THEME_KEY, settings.theme_value.bold());
            InstallOutcome::AlreadySatisfied
        }
        KeyedLineChange::Replaced(_) | KeyedLineChange::Appended => InstallOutcome::Installed,
        KeyedLineChange::KeyMissing => InstallOutcome::NothingToDo,
    })
}

fn shell_name(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().to_string())
}

fn ensure_default_shell(host: &mut dyn Host, settings: &Settings) -> Result<InstallOutcome> {
    let current = host.default_shell();
    if current.as_deref().and_then(shell_name).as_deref() == Some(settings.shell.as_str()) {
        log_info!("[Framework] {} is already the default shell.", settings.shell.bold());
        return Ok(InstallOutcome::AlreadySatisfied);
    }

    let target = host
        .resolve(&settings.shell)
        .ok_or_else(|| SetupError::ProgramNotFound {
            program: settings.shell.clone(),
        })?;
    log_info!(
        "[Framework] Changing default shell from {} to {}...",
        current
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "unknown".to_string())
            .yellow(),
        target.display().to_string().cyan()
    );
    host.set_default_shell(&target)?;
    log_info!(
        "[Framework] {}",
        "Default shell changed. Log out and back in for it to take effect.".green()
    );
    Ok(InstallOutcome::Installed)
}

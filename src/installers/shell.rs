use colored::Colorize;

use crate::installers::apt;
use crate::libs::config_loading::Settings;
use crate::libs::errors::{InstallOutcome, Result};
use crate::libs::host::{CommandSpec, Host};
use crate::{log_info, log_warn};

/// Makes sure the configured shell (zsh) is installed.
///
/// Already on `PATH`: reports its version and returns. Otherwise refreshes the package
/// index and installs the package of the same name; either apt step failing is fatal.
///
/// # Arguments
/// * `host`: Resolves and probes the shell, and runs `apt-get`.
/// * `settings`: Supplies the shell name and the `sudo` preference.
///
/// # Returns
/// * `Result<InstallOutcome>`:
///   - `Ok(InstallOutcome::AlreadySatisfied)` if the shell was already on `PATH`.
///   - `Ok(InstallOutcome::Installed)` after a successful `apt-get install`.
///   - An `Err` if either `apt-get` call fails.
pub fn install_shell(host: &mut dyn Host, settings: &Settings) -> Result<InstallOutcome> {
    let shell = settings.shell.as_str();

    if let Some(path) = host.resolve(shell) {
        let version = host
            .capture(&CommandSpec::new(path.display().to_string()).arg("--version"))
            .unwrap_or_else(|e| {
                log_warn!("[Shell] Could not read {} version: {}", shell, e);
                "unknown version".to_string()
            });
        log_info!(
            "[Shell] {} is already installed ({}).",
            shell.bold(),
            version.green()
        );
        return Ok(InstallOutcome::AlreadySatisfied);
    }

    log_info!("[Shell] {} not found. Installing...", shell.bold());
    apt::update(host, settings)?;
    apt::install(host, settings, &[shell.to_string()])?;
    log_info!("[Shell] {}", format!("{shell} installed.").green());
    Ok(InstallOutcome::Installed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::errors::SetupError;
    use crate::libs::host::mock::MockHost;
    use tempfile::TempDir;

    #[test]
    fn present_shell_is_a_no_op() {
        let home = TempDir::new().unwrap();
        let settings = Settings::for_home(home.path());
        let mut host = MockHost::new().with_program("zsh", "/usr/bin/zsh");
        host.captured_output
            .insert("/usr/bin/zsh".to_string(), "zsh 5.9 (x86_64-ubuntu-linux-gnu)".to_string());

        let outcome = install_shell(&mut host, &settings).unwrap();
        assert_eq!(outcome, InstallOutcome::AlreadySatisfied);
        assert_eq!(host.ran, vec!["/usr/bin/zsh --version"]);
    }

    #[test]
    fn missing_shell_is_installed_through_apt() {
        let home = TempDir::new().unwrap();
        let mut settings = Settings::for_home(home.path());
        settings.use_sudo = false;
        let mut host = MockHost::new();

        let outcome = install_shell(&mut host, &settings).unwrap();
        assert_eq!(outcome, InstallOutcome::Installed);
        assert_eq!(
            host.ran,
            vec![
                "apt-get update",
                "DEBIAN_FRONTEND=noninteractive apt-get install -y zsh"
            ]
        );
    }

    #[test]
    fn failed_index_refresh_stops_before_install() {
        let home = TempDir::new().unwrap();
        let settings = Settings::for_home(home.path());
        let mut host = MockHost::new();
        host.fail_matching = Some("update".to_string());

        let err = install_shell(&mut host, &settings).unwrap_err();
        assert!(matches!(err, SetupError::CommandFailed { .. }));
        assert!(!host.ran_matching("install"));
    }
}

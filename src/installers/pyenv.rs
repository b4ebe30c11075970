use std::path::Path;

use colored::Colorize;

use crate::installers::apt;
use crate::libs::config_loading::Settings;
use crate::libs::errors::{InstallOutcome, Result};
use crate::libs::host::{CommandSpec, Host};
use crate::libs::shell_configurator::append_block_if_absent; // Marker-guarded rc edits.
use crate::log_info;

/// Substring whose presence in the startup file means the init lines are already there.
pub const INIT_MARKER: &str = "PYENV_ROOT";

/// Renders `path` for a shell script, using `$HOME` for paths inside the home directory.
fn shell_literal(path: &Path, home: Option<&Path>) -> String {
    match home.and_then(|h| path.strip_prefix(h).ok()) {
        Some(rest) if rest.as_os_str().is_empty() => "$HOME".to_string(),
        Some(rest) => format!("$HOME/{}", rest.display()),
        None => path.display().to_string(),
    }
}

/// The three lines that put pyenv on `PATH` and hook it into the shell.
pub fn init_lines(pyenv_root: &Path, home: Option<&Path>) -> [String; 3] {
    [
        format!("export PYENV_ROOT=\"{}\"", shell_literal(pyenv_root, home)),
        "[[ -d $PYENV_ROOT/bin ]] && export PATH=\"$PYENV_ROOT/bin:$PATH\"".to_string(),
        "eval \"$(pyenv init -)\"".to_string(),
    ]
}

/// Appends the init lines to the login-shell startup file unless [`INIT_MARKER`] is present.
///
/// # Arguments
/// * `settings`: Supplies `pyenv_root` and the startup file (`pyenv_rc_path`).
/// * `home`: The home directory, used to write `$HOME/...` instead of an absolute path.
///
/// # Returns
/// * `Result<bool>`: `Ok(true)` if the lines were appended, `Ok(false)` if already present.
pub fn configure_shell(settings: &Settings, home: Option<&Path>) -> Result<bool> {
    let lines = init_lines(&settings.pyenv_root, home);
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    Ok(append_block_if_absent(&settings.pyenv_rc_path, INIT_MARKER, &refs)?)
}

/// Installs pyenv plus the native packages needed to build Python from source.
///
/// An existing `PYENV_ROOT` directory short-circuits everything, including the
/// build dependency install.
///
/// # Arguments
/// * `host`: Runs `apt-get`, downloads the install script and runs it with `bash`.
/// * `settings`: Supplies `pyenv_root`, the build packages and the installer URL.
///
/// # Returns
/// * `Result<InstallOutcome>`:
///   - `Ok(InstallOutcome::AlreadySatisfied)` if `pyenv_root` already exists.
///   - `Ok(InstallOutcome::Installed)` after the packages, the script and the init lines.
///   - An `Err` from the first failing step.
pub fn install_language_manager(
    host: &mut dyn Host,
    settings: &Settings,
) -> Result<InstallOutcome> {
    let root = &settings.pyenv_root;
    if root.exists() {
        log_info!(
            "[Python] pyenv is already installed at {}.",
            root.display().to_string().cyan()
        );
        return Ok(InstallOutcome::AlreadySatisfied);
    }

    log_info!("[Python] Installing Python build dependencies...");
    apt::update(host, settings)?;
    apt::install(host, settings, &settings.pyenv_build_deps)?;

    log_info!("[Python] Installing pyenv...");
    let script = host.fetch_script(&settings.pyenv_installer_url)?;
    let spec = CommandSpec::new("bash")
        .arg(script.display().to_string())
        .env("PYENV_ROOT", root.display().to_string());
    host.run(&spec)?;

    let home = dirs::home_dir();
    if configure_shell(settings, home.as_deref())? {
        log_info!(
            "[Python] Added pyenv init to {}.",
            settings.pyenv_rc_path.display().to_string().cyan()
        );
    } else {
        log_info!(
            "[Python] pyenv init already present in {}.",
            settings.pyenv_rc_path.display()
        );
    }

    log_info!("[Python] {}", "pyenv installed.".green());
    log_info!("[Python] Open a new terminal session to start using pyenv.");
    Ok(InstallOutcome::Installed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::errors::SetupError;
    use crate::libs::host::mock::MockHost;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn init_lines_use_home_variable() {
        let lines = init_lines(Path::new("/home/dev/.pyenv"), Some(Path::new("/home/dev")));
        assert_eq!(lines[0], "export PYENV_ROOT=\"$HOME/.pyenv\"");
        assert!(lines[1].contains("$PYENV_ROOT/bin"));
        assert_eq!(lines[2], "eval \"$(pyenv init -)\"");

        let elsewhere = init_lines(Path::new("/opt/pyenv"), Some(Path::new("/home/dev")));
        assert_eq!(elsewhere[0], "export PYENV_ROOT=\"/opt/pyenv\"");
    }

    #[test]
    fn existing_root_skips_everything() {
        let home = TempDir::new().unwrap();
        let settings = Settings::for_home(home.path());
        fs::create_dir_all(&settings.pyenv_root).unwrap();
        let mut host = MockHost::new();

        let outcome = install_language_manager(&mut host, &settings).unwrap();
        assert_eq!(outcome, InstallOutcome::AlreadySatisfied);
        assert!(host.ran.is_empty());
        assert!(host.fetched.is_empty());
        assert!(!settings.pyenv_rc_path.exists());
    }

    #[test]
    fn fresh_install_runs_deps_then_script_then_appends_init() {
        let home = TempDir::new().unwrap();
        let mut settings = Settings::for_home(home.path());
        settings.use_sudo = false;
        let mut host = MockHost::new();

        let outcome = install_language_manager(&mut host, &settings).unwrap();
        assert_eq!(outcome, InstallOutcome::Installed);
        assert_eq!(host.ran[0], "apt-get update");
        assert!(host.ran[1].contains("apt-get install -y make build-essential libssl-dev"));
        assert!(host.ran[1].ends_with("liblzma-dev"));
        assert!(host.ran[2].contains("bash "));
        assert_eq!(host.fetched, vec!["https://pyenv.run".to_string()]);

        let rc = fs::read_to_string(&settings.pyenv_rc_path).unwrap();
        assert_eq!(rc.matches(INIT_MARKER).count(), 3);
        assert!(rc.contains("eval \"$(pyenv init -)\""));
    }

    #[test]
    fn reordered_existing_lines_are_not_duplicated() {
        let home = TempDir::new().unwrap();
        let settings = Settings::for_home(home.path());
        let original = concat!(
            "eval \"$(pyenv init -)\"\n",
            "alias ll='ls -la'\n",
            "[[ -d $PYENV_ROOT/bin ]] && export PATH=\"$PYENV_ROOT/bin:$PATH\"\n",
            "export EDITOR=vim\n",
            "export PYENV_ROOT=\"$HOME/.pyenv\"\n",
        );
        fs::write(&settings.pyenv_rc_path, original).unwrap();

        assert!(!configure_shell(&settings, Some(home.path())).unwrap());
        assert!(!configure_shell(&settings, Some(home.path())).unwrap());
        assert_eq!(fs::read_to_string(&settings.pyenv_rc_path).unwrap(), original);
    }

    #[test]
    fn configure_shell_appends_exactly_once() {
        let home = TempDir::new().unwrap();
        let settings = Settings::for_home(home.path());

        assert!(configure_shell(&settings, Some(home.path())).unwrap());
        assert!(!configure_shell(&settings, Some(home.path())).unwrap());
        let rc = fs::read_to_string(&settings.pyenv_rc_path).unwrap();
        assert_eq!(rc.matches("export PYENV_ROOT=\"$HOME/.pyenv\"").count(), 1);
    }

    #[test]
    fn dependency_failure_stops_before_script() {
        let home = TempDir::new().unwrap();
        let settings = Settings::for_home(home.path());
        let mut host = MockHost::new();
        host.fail_matching = Some("install -y".to_string());

        let err = install_language_manager(&mut host, &settings).unwrap_err();
        assert!(matches!(err, SetupError::CommandFailed { .. }));
        assert!(host.fetched.is_empty());
        assert!(!settings.pyenv_rc_path.exists());
    }
}

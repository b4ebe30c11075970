// Thin wrapper over `apt-get`, the only package manager setup-shellbox targets.

use colored::Colorize;

use crate::libs::config_loading::Settings;
use crate::libs::errors::Result;
use crate::libs::host::{CommandSpec, Host};
use crate::{log_debug, log_info};

/// Prefixes `spec` with `sudo` when configured and `sudo` exists. Running as root inside a
/// container usually means there is no `sudo`, and the command runs as is.
pub fn privileged(host: &dyn Host, settings: &Settings, spec: CommandSpec) -> CommandSpec {
    if settings.use_sudo && host.resolve("sudo").is_some() {
        spec.with_sudo()
    } else {
        log_debug!("[Apt] Running without sudo: {}", spec);
        spec
    }
}

/// Refreshes the package index (`apt-get update`).
pub fn update(host: &mut dyn Host, settings: &Settings) -> Result<()> {
    log_info!("[Apt] Refreshing package index...");
    let spec = privileged(host, settings, CommandSpec::new("apt-get").arg("update"));
    host.run(&spec)
}

/// Installs `packages` non-interactively (`apt-get install -y`).
pub fn install(host: &mut dyn Host, settings: &Settings, packages: &[String]) -> Result<()> {
    log_info!("[Apt] Installing: {}", packages.join(" ").bold());
    let spec = CommandSpec::new("apt-get")
        .args(["install", "-y"])
        .args(packages.iter().cloned())
        .env("DEBIAN_FRONTEND", "noninteractive");
    let spec = privileged(host, settings, spec);
    host.run(&spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::host::mock::MockHost;
    use tempfile::TempDir;

    #[test]
    fn uses_sudo_when_available() {
        let home = TempDir::new().unwrap();
        let settings = Settings::for_home(home.path());
        let mut host = MockHost::new().with_program("sudo", "/usr/bin/sudo");

        update(&mut host, &settings).unwrap();
        install(&mut host, &settings, &["git".to_string()]).unwrap();

        assert_eq!(host.ran[0], "sudo apt-get update");
        assert_eq!(
            host.ran[1],
            "sudo env DEBIAN_FRONTEND=noninteractive apt-get install -y git"
        );
    }

    #[test]
    fn runs_directly_without_sudo() {
        let home = TempDir::new().unwrap();
        let mut settings = Settings::for_home(home.path());
        settings.use_sudo = false;
        let mut host = MockHost::new().with_program("sudo", "/usr/bin/sudo");

        update(&mut host, &settings).unwrap();
        assert_eq!(host.ran, vec!["apt-get update"]);
    }
}

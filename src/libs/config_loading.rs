use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use colored::Colorize; // Cyan config path in the info line.

use crate::libs::errors::{Result, SetupError};
use crate::libs::utilities::path_helpers::{default_config_path, expand_path};
use crate::schemas::setup_config::{SetupConfig, ThemeLineStrategy};
use crate::{log_debug, log_info};

/// Fully resolved runtime settings: every path expanded, every derived location computed.
/// Installers only ever see this struct, never the raw YAML schema.
#[derive(Debug, Clone)]
pub struct Settings {
    pub fonts_source_dir: PathBuf,
    pub fonts_install_dir: PathBuf,
    pub shell: String,
    pub framework_dir: PathBuf,
    pub framework_installer_url: String,
    pub theme_name: String,
    pub theme_repo: String,
    /// `<custom root>/themes/<theme_name>`
    pub theme_dir: PathBuf,
    pub theme_value: String,
    pub zshrc_path: PathBuf,
    pub theme_line_strategy: ThemeLineStrategy,
    pub nvm_dir: PathBuf,
    pub nvm_installer_url: String,
    pub pyenv_root: PathBuf,
    pub pyenv_installer_url: String,
    pub pyenv_rc_path: PathBuf,
    pub pyenv_build_deps: Vec<String>,
    pub use_sudo: bool,
    pub invalid_choice_pause: Duration,
}

impl Settings {
    /// Resolves a config against the real environment (`~`, `$VAR`, `ZSH_CUSTOM`).
    pub fn resolve(config: SetupConfig) -> Self {
        let zsh_custom = std::env::var_os("ZSH_CUSTOM")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::resolve_with(config, expand_path, zsh_custom)
    }

    /// Resolves a config with an explicit path expander and custom-themes root.
    pub fn resolve_with<F>(config: SetupConfig, expand: F, zsh_custom: Option<PathBuf>) -> Self
    where
        F: Fn(&str) -> PathBuf,
    {
        let framework_dir = expand(&config.framework_dir);
        let custom_root = zsh_custom.unwrap_or_else(|| framework_dir.join("custom"));
        let theme_dir = custom_root.join("themes").join(&config.theme_name);

        Self {
            fonts_source_dir: expand(&config.fonts_source_dir),
            fonts_install_dir: expand(&config.fonts_install_dir),
            shell: config.shell,
            framework_dir,
            framework_installer_url: config.framework_installer_url,
            theme_name: config.theme_name,
            theme_repo: config.theme_repo,
            theme_dir,
            theme_value: config.theme_value,
            zshrc_path: expand(&config.zshrc_path),
            theme_line_strategy: config.theme_line_strategy,
            nvm_dir: expand(&config.nvm_dir),
            nvm_installer_url: config.nvm_installer_url,
            pyenv_root: expand(&config.pyenv_root),
            pyenv_installer_url: config.pyenv_installer_url,
            pyenv_rc_path: expand(&config.pyenv_rc_path),
            pyenv_build_deps: config.pyenv_build_deps,
            use_sudo: config.use_sudo,
            invalid_choice_pause: Duration::from_millis(config.invalid_choice_pause_ms),
        }
    }

    /// Defaults rooted at a scratch home directory, for tests.
    #[cfg(test)]
    pub fn for_home(home: &Path) -> Self {
        let home = home.to_path_buf();
        let mut settings = Self::resolve_with(
            SetupConfig::default(),
            move |p: &str| match p.strip_prefix("~/") {
                Some(rest) => home.join(rest),
                None => PathBuf::from(p),
            },
            None,
        );
        settings.invalid_choice_pause = Duration::ZERO;
        settings
    }
}

/// Loads the YAML config.
///
/// An explicitly passed path must exist. The default path (`~/.setup-shellbox/config.yaml`)
/// is optional: when it is absent every setting takes its built-in default.
/// A file that exists but does not parse is always an error.
///
/// # Arguments
/// * `explicit_path`: The `--config` value, if given. `~` and `$VAR` are expanded.
///
/// # Returns
/// * `Result<SetupConfig>`:
///   - `Ok(config)` read from the file, or `SetupConfig::default()` when the default file
///     is absent.
///   - `Err(SetupError::Config)` for a missing explicit file or one that is not valid YAML.
pub fn load_setup_config(explicit_path: Option<&Path>) -> Result<SetupConfig> {
    let (path, required) = match explicit_path {
        Some(p) => (expand_path(&p.to_string_lossy()), true),
        None => (default_config_path(), false),
    };
    log_debug!("[Config] Looking for configuration at {}", path.display());

    let contents = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound && !required => {
            log_debug!("[Config] No configuration file found. Using built-in defaults.");
            return Ok(SetupConfig::default());
        }
        Err(e) => {
            return Err(SetupError::Config {
                path,
                message: e.to_string(),
            });
        }
    };

    let config: SetupConfig = serde_yaml::from_str(&contents).map_err(|e| SetupError::Config {
        path: path.clone(),
        message: e.to_string(),
    })?;
    log_info!("Using configuration file: {}", path.display().to_string().cyan());
    log_debug!("[Config] Loaded: {:?}", config);
    Ok(config)
}

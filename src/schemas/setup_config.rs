use serde::{Deserialize, Serialize};

/// How the theme-selection line is written into the shell startup file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeLineStrategy {
    /// Rewrite an existing `ZSH_THEME=` line; leave the file alone when there is none.
    #[default]
    Substitute,
    /// Rewrite an existing line, or append one when the key is missing.
    Upsert,
}

/// Schema for the optional `~/.setup-shellbox/config.yaml`.
///
/// Every field is optional in the file; anything left out falls back to the
/// values below. Path fields may use `~` and `$VAR`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupConfig {
    /// Directory holding the bundled `.ttf`/`.otf` files. Relative to the working directory.
    pub fonts_source_dir: String,
    /// Per-user font directory the fonts are copied into.
    pub fonts_install_dir: String,

    /// Shell executable and apt package name.
    pub shell: String,

    /// Oh My Zsh install location and its installer.
    pub framework_dir: String,
    pub framework_installer_url: String,

    /// Theme directory name under `<framework>/custom/themes` and its git source.
    pub theme_name: String,
    pub theme_repo: String,
    /// Value assigned to `ZSH_THEME`.
    pub theme_value: String,
    pub zshrc_path: String,
    pub theme_line_strategy: ThemeLineStrategy,

    pub nvm_dir: String,
    pub nvm_installer_url: String,

    pub pyenv_root: String,
    pub pyenv_installer_url: String,
    /// Login-shell startup file that receives the pyenv init lines.
    pub pyenv_rc_path: String,
    /// Native packages needed to compile Python from source.
    pub pyenv_build_deps: Vec<String>,

    /// Prefix apt and other privileged commands with `sudo` when it is available.
    pub use_sudo: bool,
    /// Pause after an invalid menu choice, in milliseconds.
    pub invalid_choice_pause_ms: u64,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            fonts_source_dir: "fonts".to_string(),
            fonts_install_dir: "~/.local/share/fonts".to_string(),
            shell: "zsh".to_string(),
            framework_dir: "~/.oh-my-zsh".to_string(),
            framework_installer_url:
                "https://raw.githubusercontent.com/ohmyzsh/ohmyzsh/master/tools/install.sh"
                    .to_string(),
            theme_name: "powerlevel10k".to_string(),
            theme_repo: "https://github.com/romkatv/powerlevel10k.git".to_string(),
            theme_value: "powerlevel10k/powerlevel10k".to_string(),
            zshrc_path: "~/.zshrc".to_string(),
            theme_line_strategy: ThemeLineStrategy::default(),
            nvm_dir: "~/.nvm".to_string(),
            nvm_installer_url: "https://raw.githubusercontent.com/nvm-sh/nvm/v0.39.7/install.sh"
                .to_string(),
            pyenv_root: "~/.pyenv".to_string(),
            pyenv_installer_url: "https://pyenv.run".to_string(),
            pyenv_rc_path: "~/.zprofile".to_string(),
            pyenv_build_deps: [
                "make",
                "build-essential",
                "libssl-dev",
                "zlib1g-dev",
                "libbz2-dev",
                "libreadline-dev",
                "libsqlite3-dev",
                "wget",
                "curl",
                "llvm",
                "libncursesw5-dev",
                "xz-utils",
                "tk-dev",
                "libxml2-dev",
                "libxmlsec1-dev",
                "libffi-dev",
                "liblzma-dev",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            use_sudo: true,
            invalid_choice_pause_ms: 1000,
        }
    }
}

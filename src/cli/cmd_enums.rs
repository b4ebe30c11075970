use clap::Parser;
use std::path::PathBuf;

/// Command-line flags for `setup-shellbox`. All of them are optional: with no flags the
/// tool goes straight to the interactive menu with the built-in defaults.
#[derive(Debug, Parser)]
#[command(name = "setup-shellbox")]
#[command(
    version,
    about = "Interactive installer for fonts, zsh, Oh My Zsh, nvm and pyenv",
    long_about = None
)]
pub struct Cli {
    /// Enables detailed debug output for troubleshooting.
    #[arg(short, long)]
    pub(crate) debug: bool,

    /// Path to a YAML config file (defaults to ~/.setup-shellbox/config.yaml when present).
    #[arg(long, env = "SETUP_SHELLBOX_CONFIG")]
    pub(crate) config: Option<PathBuf>,

    /// Directory with the .ttf/.otf files to install (defaults to ./fonts).
    #[arg(long)]
    pub(crate) fonts_dir: Option<String>,

    /// Pause after an invalid menu choice, in milliseconds.
    #[arg(long)]
    pub(crate) pause_ms: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_is_valid() {
        let cli = Cli::try_parse_from(["setup-shellbox"]).unwrap();
        assert!(!cli.debug);
        assert!(cli.fonts_dir.is_none());
        assert!(cli.pause_ms.is_none());
    }

    #[test]
    fn overrides_are_parsed() {
        let cli = Cli::try_parse_from([
            "setup-shellbox",
            "-d",
            "--fonts-dir",
            "assets/fonts",
            "--pause-ms",
            "0",
        ])
        .unwrap();
        assert!(cli.debug);
        assert_eq!(cli.fonts_dir.as_deref(), Some("assets/fonts"));
        assert_eq!(cli.pause_ms, Some(0));
    }

    #[test]
    fn positional_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["setup-shellbox", "install"]).is_err());
    }
}

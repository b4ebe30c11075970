// The installers behind each menu entry, plus the `Toolbox` that dispatches a menu
// choice to the matching installer.

/// `apt-get` helpers shared by every installer that needs system packages.
pub(crate) mod apt;

/// Copies bundled `.ttf`/`.otf` fonts into the user font directory.
pub(crate) mod fonts;

/// Oh My Zsh, the powerlevel10k theme, `ZSH_THEME` and the login shell.
pub(crate) mod framework;

/// nvm, the Node.js version manager.
pub(crate) mod nvm;

/// pyenv and the native packages it needs to build Python.
pub(crate) mod pyenv;

/// zsh itself.
pub(crate) mod shell;

use colored::Colorize; // Red path in the missing-fonts message.

use crate::cli::menu::{MenuActions, MenuChoice};
use crate::libs::config_loading::Settings;
use crate::libs::errors::{InstallOutcome, Result, SetupError};
use crate::libs::host::Host;
use crate::{log_debug, log_error};

/// Owns the settings and the host, and runs one installer per menu choice.
pub struct Toolbox<H: Host> {
    settings: Settings,
    host: H,
}

impl<H: Host> Toolbox<H> {
    pub fn new(settings: Settings, host: H) -> Self {
        Self { settings, host }
    }
}

impl<H: Host> MenuActions for Toolbox<H> {
    /// Runs the installer behind `choice`.
    ///
    /// # Arguments
    /// * `choice`: Any entry except `MenuChoice::Exit`, which the menu handles itself.
    ///
    /// # Returns
    /// * `Result<InstallOutcome>`: The installer's outcome. A missing font directory is
    ///   logged and turned into `Ok(InstallOutcome::NothingToDo)`; every other error is
    ///   returned as is.
    fn perform(&mut self, choice: MenuChoice) -> Result<InstallOutcome> {
        log_debug!("[Toolbox] Dispatching {:?}", choice);
        let settings = &self.settings;
        let host: &mut dyn Host = &mut self.host;

        match choice {
            MenuChoice::Fonts => match fonts::install_fonts(host, settings) {
                // A missing font directory is reported and the menu carries on.
                Err(SetupError::SourceMissing { path }) => {
                    log_error!(
                        "[Fonts] Font source directory {} does not exist.",
                        path.display().to_string().red()
                    );
                    Ok(InstallOutcome::NothingToDo)
                }
                other => other,
            },
            MenuChoice::Shell => shell::install_shell(host, settings),
            MenuChoice::Framework => framework::install_framework_and_theme(host, settings),
            MenuChoice::NodeManager => nvm::install_node_manager(host, settings),
            MenuChoice::PythonManager => pyenv::install_language_manager(host, settings),
            MenuChoice::Exit => Ok(InstallOutcome::NothingToDo),
        }
    }
}

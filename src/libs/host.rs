// The boundary between setup-shellbox and the operating system.
//
// Installers never spawn processes or touch the network directly; they describe what they
// need through `Host`. `SystemHost` performs the real work (std::process, `which`, `ureq`),
// while the tests drive the installers through a recording `MockHost`.

use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use colored::Colorize;
use tempfile::{NamedTempFile, TempPath};

use crate::libs::errors::{Result, SetupError};
use crate::{log_debug, log_info};

/// A fully described external command: program, arguments and extra environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Wraps this command in `sudo`, keeping any extra environment on the inner command.
    pub fn with_sudo(self) -> Self {
        let mut wrapped = CommandSpec::new("sudo");
        if !self.env.is_empty() {
            wrapped = wrapped.arg("env");
            for (key, value) in &self.env {
                wrapped = wrapped.arg(format!("{key}={value}"));
            }
        }
        wrapped.arg(self.program).args(self.args)
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        cmd
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.env {
            write!(f, "{key}={value} ")?;
        }
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Everything the installers need from the machine they run on.
///
/// Every call is synchronous and blocks until the underlying process or request finishes.
/// No timeouts are applied.
pub trait Host {
    /// Runs a command with inherited stdio. A non-zero exit is an error.
    fn run(&mut self, spec: &CommandSpec) -> Result<()>;

    /// Runs a command and returns its trimmed stdout. A non-zero exit is an error.
    fn capture(&mut self, spec: &CommandSpec) -> Result<String>;

    /// Resolves an executable name against `PATH`.
    fn resolve(&self, program: &str) -> Option<PathBuf>;

    /// Downloads a script into a temporary file that is deleted when the returned path drops.
    fn fetch_script(&mut self, url: &str) -> Result<TempPath>;

    /// The user's current login shell, as recorded by the OS.
    ///
    /// # Returns
    /// * `Option<PathBuf>`: The login shell from the user database, which reflects earlier
    ///   `chsh` calls. `None` when neither the database nor `$SHELL` yields one.
    fn default_shell(&mut self) -> Option<PathBuf>;

    /// Changes the user's login shell. Takes effect for new sessions only.
    fn set_default_shell(&mut self, shell: &Path) -> Result<()>;
}

/// The production `Host`.
#[derive(Debug, Default)]
pub struct SystemHost;

impl SystemHost {
    pub fn new() -> Self {
        Self
    }
}

fn spawn_error(spec: &CommandSpec, source: io::Error) -> SetupError {
    SetupError::CommandSpawn {
        command: spec.to_string(),
        source,
    }
}

impl SystemHost {
    /// The invoking user's name: `$USER`, else whatever `id -un` reports.
    fn current_user(&mut self) -> Option<String> {
        std::env::var("USER")
            .ok()
            .filter(|user| !user.is_empty())
            .or_else(|| self.capture(&CommandSpec::new("id").arg("-un")).ok())
            .filter(|user| !user.is_empty())
    }
}

/// The login shell field (the last one) of a passwd entry such as
/// `alice:x:1000:1000:Alice:/home/alice:/bin/zsh`.
fn passwd_login_shell(entry: &str) -> Option<PathBuf> {
    let line = entry.lines().next()?.trim();
    if line.split(':').count() < 7 {
        return None;
    }
    line.rsplit(':')
        .next()
        .filter(|shell| !shell.is_empty())
        .map(PathBuf::from)
}

/// The passwd record wins; the session's `$SHELL` is only used when no record could be read.
fn pick_login_shell(
    recorded: Option<PathBuf>,
    session_shell: Option<OsString>,
) -> Option<PathBuf> {
    recorded.or_else(|| {
        session_shell
            .filter(|shell| !shell.is_empty())
            .map(PathBuf::from)
    })
}

impl Host for SystemHost {
    fn run(&mut self, spec: &CommandSpec) -> Result<()> {
        log_info!("Running: {}", spec.to_string().cyan());
        let status = spec
            .to_command()
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| spawn_error(spec, e))?;

        if status.success() {
            log_debug!("[Host] `{}` exited successfully", spec);
            Ok(())
        } else {
            Err(SetupError::CommandFailed {
                command: spec.to_string(),
                code: status.code(),
            })
        }
    }

    fn capture(&mut self, spec: &CommandSpec) -> Result<String> {
        log_debug!("[Host] Capturing output of: {}", spec);
        let output = spec
            .to_command()
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| spawn_error(spec, e))?;

        if !output.status.success() {
            return Err(SetupError::CommandFailed {
                command: spec.to_string(),
                code: output.status.code(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn resolve(&self, program: &str) -> Option<PathBuf> {
        let resolved = which::which(program).ok();
        log_debug!("[Host] Resolved '{}' -> {:?}", program, resolved);
        resolved
    }

    fn fetch_script(&mut self, url: &str) -> Result<TempPath> {
        log_info!("Downloading install script from {}", url.cyan());
        let response = ureq::get(url).call().map_err(|e| SetupError::FetchFailed {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let mut file = NamedTempFile::with_prefix("setup-shellbox-")?;
        let mut reader = response.into_reader();
        io::copy(&mut reader, &mut file).map_err(|e| SetupError::FetchFailed {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let path = file.into_temp_path();
        log_debug!("[Host] Script saved to {}", path.display());
        Ok(path)
    }

    fn default_shell(&mut self) -> Option<PathBuf> {
        // `$SHELL` is fixed when the session starts and does not follow `chsh`.
        let recorded = self
            .current_user()
            .and_then(|user| {
                self.capture(&CommandSpec::new("getent").arg("passwd").arg(user)).ok()
            })
            .and_then(|entry| passwd_login_shell(&entry));
        pick_login_shell(recorded, std::env::var_os("SHELL"))
    }

    fn set_default_shell(&mut self, shell: &Path) -> Result<()> {
        self.run(&CommandSpec::new("chsh").arg("-s").arg(shell.display().to_string()))
    }
}

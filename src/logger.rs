// Logging for setup-shellbox.
// Every installer reports progress through these macros. Messages go to stderr with a
// colored severity prefix so they never interleave with the menu, which is written to stdout.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// Environment variable that turns debug output on without passing `--debug`.
pub const DEBUG_ENV_VAR: &str = "SETUP_SHELLBOX_DEBUG";

// `log_info!` for normal installer progress.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        use colored::Colorize as _;
        eprintln!("{} {}", "[INFO]".bright_green(), format!($($arg)*))
    }};
}

// `log_warn!` for conditions the user should know about but that do not stop the run.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        use colored::Colorize as _;
        eprintln!("{} {}", "[WARN]".bright_yellow(), format!($($arg)*))
    }};
}

// `log_error!` for failures. Fatal ones are followed by process exit in `main`.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        use colored::Colorize as _;
        eprintln!("{} {}", "[ERROR]".bright_red(), format!($($arg)*))
    }};
}

// `log_debug!` prints only once `logger::init` enabled debug mode.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if $crate::logger::is_debug_enabled() {
            use colored::Colorize as _;
            eprintln!("{} {}", "[DEBUG]".dimmed(), format!($($arg)*));
        }
    };
}

static DEBUG_ENABLED: OnceLock<AtomicBool> = OnceLock::new();

/// Sets the global debug flag. `--debug` wins; otherwise the
/// `SETUP_SHELLBOX_DEBUG` variable enables debug output when set to anything but `0`.
pub fn init(debug_flag: bool) {
    let from_env = std::env::var(DEBUG_ENV_VAR)
        .map(|value| !value.is_empty() && value != "0")
        .unwrap_or(false);
    let debug = debug_flag || from_env;

    DEBUG_ENABLED
        .get_or_init(|| AtomicBool::new(debug))
        .store(debug, Ordering::Relaxed);

    if debug {
        log_debug!("Logger initialized in DEBUG mode");
    }
}

pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED
        .get()
        .map(|flag| flag.load(Ordering::Relaxed))
        .unwrap_or(false)
}

// Edits to the user's shell startup files (`~/.zshrc`, `~/.zprofile`).
//
// Two kinds of edits exist:
// - keyed lines (`ZSH_THEME="..."`), handled through a small `(key, raw line)` model so a
//   key is rewritten in place instead of being duplicated;
// - appended blocks (pyenv init), guarded by a marker substring so a re-run never appends twice.
//
// Files are only written when their content actually changes.

use std::fs::{self, OpenOptions}; // `OpenOptions` for append-only writes.
use std::io::{self, Write};
use std::path::Path;

use colored::Colorize; // Colors the file paths and lines in log output.

use crate::schemas::setup_config::ThemeLineStrategy;
use crate::{log_debug, log_info, log_warn};

/// One line of a startup file together with the variable it assigns, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RcLine {
    pub key: Option<String>,
    pub raw: String,
}

/// A startup file split on `\n`. Each `raw` line keeps a trailing `\r` if the file uses CRLF
/// endings, and the document remembers whether the file ended with a newline, so rendering
/// it back is byte-for-byte identical when nothing was changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RcDocument {
    pub lines: Vec<RcLine>,
    trailing_newline: bool,
}

/// What `apply_keyed_line` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyedLineChange {
    /// The exact target line was already present.
    AlreadyPresent,
    /// This many lines carrying the key were rewritten.
    Replaced(usize),
    /// No line carried the key; the target line was appended.
    Appended,
    /// No line carried the key and the strategy does not insert. Nothing changed.
    KeyMissing,
}

/// Returns the assigned variable for lines shaped like `NAME=value`, anchored at column 0.
/// Comments, indented lines and `export NAME=` lines have no key.
pub fn line_key(line: &str) -> Option<&str> {
    let (name, _) = line.split_once('=')?;
    let valid = !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    valid.then_some(name)
}

impl RcDocument {
    pub fn parse(content: &str) -> Self {
        let body = content.strip_suffix('\n').unwrap_or(content);
        let lines = if content.is_empty() {
            Vec::new()
        } else {
            body.split('\n')
                .map(|raw| RcLine {
                    key: line_key(raw).map(str::to_string),
                    raw: raw.to_string(),
                })
                .collect()
        };
        Self {
            lines,
            trailing_newline: content.ends_with('\n'),
        }
    }

    /// True when the first line ends in `\r\n`.
    fn uses_crlf(&self) -> bool {
        self.lines.first().is_some_and(|l| l.raw.ends_with('\r'))
    }

    pub fn render(&self) -> String {
        let mut out = self
            .lines
            .iter()
            .map(|l| l.raw.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        if self.trailing_newline && !self.lines.is_empty() {
            out.push('\n');
        }
        out
    }

    pub fn contains_line(&self, line: &str) -> bool {
        self.lines.iter().any(|l| l.raw.trim_end() == line)
    }

    /// Points every line assigning `key` at `line`, or appends `line` when the strategy allows.
    pub fn apply_keyed_line(
        &mut self,
        key: &str,
        line: &str,
        strategy: ThemeLineStrategy,
    ) -> KeyedLineChange {
        if self.contains_line(line) {
            return KeyedLineChange::AlreadyPresent;
        }

        let mut replaced = 0;
        for entry in self.lines.iter_mut().filter(|l| l.key.as_deref() == Some(key)) {
            // Keep the line's own ending.
            entry.raw = if entry.raw.ends_with('\r') {
                format!("{line}\r")
            } else {
                line.to_string()
            };
            replaced += 1;
        }
        if replaced > 0 {
            return KeyedLineChange::Replaced(replaced);
        }

        match strategy {
            ThemeLineStrategy::Substitute => KeyedLineChange::KeyMissing,
            ThemeLineStrategy::Upsert => {
                let raw = if self.uses_crlf() {
                    format!("{line}\r")
                } else {
                    line.to_string()
                };
                self.lines.push(RcLine {
                    key: Some(key.to_string()),
                    raw,
                });
                self.trailing_newline = true;
                KeyedLineChange::Appended
            }
        }
    }
}

fn read_or_empty(path: &Path) -> io::Result<String> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e),
    }
}

/// Ensures `line` is the assignment for `key` in the startup file at `rc_path`.
///
/// With `ThemeLineStrategy::Substitute` a file without a `key=` line is left untouched
/// (and not created); the caller gets `KeyedLineChange::KeyMissing` back.
///
/// # Arguments
/// * `rc_path`: The startup file to edit. A missing file reads as empty.
/// * `key`: The variable name, e.g. `ZSH_THEME`.
/// * `line`: The full target line, e.g. `ZSH_THEME="powerlevel10k/powerlevel10k"`.
/// * `strategy`: Whether a missing key is appended (`Upsert`) or only reported (`Substitute`).
///
/// # Returns
/// * `io::Result<KeyedLineChange>`:
///   - `Ok(change)` describing what happened. The file is written only for
///     `Replaced` and `Appended`.
///   - An `Err` if the file cannot be read or written.
pub fn set_keyed_line(
    rc_path: &Path,
    key: &str,
    line: &str,
    strategy: ThemeLineStrategy,
) -> io::Result<KeyedLineChange> {
    log_debug!(
        "[ShellRC] Setting '{}' in {} ({:?})",
        key,
        rc_path.display(),
        strategy
    );
    let original = read_or_empty(rc_path)?;
    let mut doc = RcDocument::parse(&original);
    let change = doc.apply_keyed_line(key, line, strategy);

    match change {
        KeyedLineChange::Replaced(_) | KeyedLineChange::Appended => {
            fs::write(rc_path, doc.render())?;
            log_info!(
                "[ShellRC] Wrote '{}' to {}",
                line.green(),
                rc_path.display().to_string().cyan()
            );
        }
        KeyedLineChange::KeyMissing => {
            log_warn!(
                "[ShellRC] No '{}=' line found in {}. File left unchanged; \
                 add the line manually or set theme_line_strategy: upsert.",
                key.yellow(),
                rc_path.display().to_string().yellow()
            );
        }
        KeyedLineChange::AlreadyPresent => {}
    }
    Ok(change)
}

/// Appends `lines` to `rc_path` unless the file already mentions `marker` anywhere.
/// The file is created if it does not exist.
///
/// # Arguments
/// * `rc_path`: The startup file to append to.
/// * `marker`: A substring whose presence anywhere in the file means the block is already there.
/// * `lines`: The block, written after a `# Added by setup-shellbox` header.
///
/// # Returns
/// * `io::Result<bool>`: `Ok(true)` when the block was appended, `Ok(false)` when the marker
///   was found and nothing was written.
pub fn append_block_if_absent(rc_path: &Path, marker: &str, lines: &[&str]) -> io::Result<bool> {
    let existing = read_or_empty(rc_path)?;
    if existing.contains(marker) {
        log_debug!(
            "[ShellRC] Marker '{}' already present in {}. Nothing appended.",
            marker,
            rc_path.display()
        );
        return Ok(false);
    }

    let mut file = OpenOptions::new().create(true).append(true).open(rc_path)?;
    if !existing.is_empty() && !existing.ends_with('\n') {
        writeln!(file)?;
    }
    writeln!(file, "\n# Added by setup-shellbox")?;
    for line in lines {
        writeln!(file, "{line}")?;
    }
    log_info!(
        "[ShellRC] Appended {} lines to {}",
        lines.len().to_string().bold(),
        rc_path.display().to_string().cyan()
    );
    Ok(true)
}

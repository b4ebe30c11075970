// Small helpers without a better home.

// `~`/`$VAR` expansion and setup-shellbox's own directory.
pub mod path_helpers;

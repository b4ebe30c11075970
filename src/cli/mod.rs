// Command-line flags and the interactive menu.
pub mod cmd_enums;
pub mod menu;

// The interactive menu: render, read one line, dispatch, repeat.
//
// Input and output are generic so the loop can be driven from tests with in-memory buffers.
// Installer errors are not caught here; they bubble out of `MenuController::run` and end
// the program.

use std::io::{BufRead, Write};
use std::thread;
use std::time::Duration;

use colored::Colorize;

use crate::libs::errors::{InstallOutcome, Result};
use crate::libs::presenter::write_header;
use crate::log_debug;

/// One entry of the numbered menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Fonts,
    Shell,
    Framework,
    NodeManager,
    PythonManager,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 6] = [
        MenuChoice::Fonts,
        MenuChoice::Shell,
        MenuChoice::Framework,
        MenuChoice::NodeManager,
        MenuChoice::PythonManager,
        MenuChoice::Exit,
    ];

    pub fn number(self) -> u8 {
        match self {
            MenuChoice::Fonts => 1,
            MenuChoice::Shell => 2,
            MenuChoice::Framework => 3,
            MenuChoice::NodeManager => 4,
            MenuChoice::PythonManager => 5,
            MenuChoice::Exit => 6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::Fonts => "Install fonts",
            MenuChoice::Shell => "Install zsh",
            MenuChoice::Framework => "Install Oh My Zsh + powerlevel10k",
            MenuChoice::NodeManager => "Install nvm (Node.js version manager)",
            MenuChoice::PythonManager => "Install pyenv (Python version manager)",
            MenuChoice::Exit => "Exit",
        }
    }

    /// Parses a line of user input. Surrounding whitespace is ignored; anything that is not
    /// one of the menu numbers yields `None`.
    pub fn parse(input: &str) -> Option<MenuChoice> {
        let number: u8 = input.trim().parse().ok()?;
        MenuChoice::ALL.into_iter().find(|choice| choice.number() == number)
    }
}

/// Whatever runs the installer behind a menu entry.
pub trait MenuActions {
    fn perform(&mut self, choice: MenuChoice) -> Result<InstallOutcome>;
}

pub struct MenuController<R, W> {
    input: R,
    output: W,
    invalid_pause: Duration,
}

impl<R: BufRead, W: Write> MenuController<R, W> {
    pub fn new(input: R, output: W, invalid_pause: Duration) -> Self {
        Self {
            input,
            output,
            invalid_pause,
        }
    }

    fn render_menu(&mut self) -> Result<()> {
        write_header(&mut self.output, "Workstation Setup")?;
        for choice in MenuChoice::ALL {
            writeln!(self.output, "  {}) {}", choice.number().to_string().bold(), choice.label())?;
        }
        write!(self.output, "\nEnter your choice [1-{}]: ", MenuChoice::ALL.len())?;
        self.output.flush()?;
        Ok(())
    }

    /// Reads one line. `None` means end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    /// Runs until the user picks "Exit" or input ends. Returns the first installer error.
    pub fn run<A: MenuActions + ?Sized>(&mut self, actions: &mut A) -> Result<()> {
        loop {
            self.render_menu()?;

            let Some(line) = self.read_line()? else {
                writeln!(self.output)?;
                log_debug!("[Menu] End of input, exiting.");
                return Ok(());
            };

            let Some(choice) = MenuChoice::parse(&line) else {
                writeln!(
                    self.output,
                    "{}",
                    format!(
                        "Invalid choice '{}'. Please enter a number between 1 and {}.",
                        line.trim(),
                        MenuChoice::ALL.len()
                    )
                    .red()
                )?;
                self.output.flush()?;
                thread::sleep(self.invalid_pause);
                continue;
            };

            if choice == MenuChoice::Exit {
                writeln!(self.output, "Goodbye!")?;
                return Ok(());
            }

            write_header(&mut self.output, choice.label())?;
            self.output.flush()?;
            let outcome = actions.perform(choice)?;
            log_debug!("[Menu] {:?} finished: {:?}", choice, outcome);

            write!(self.output, "\nPress Enter to continue...")?;
            self.output.flush()?;
            if self.read_line()?.is_none() {
                writeln!(self.output)?;
                return Ok(());
            }
        }
    }
}

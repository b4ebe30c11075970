mod cli;
mod installers;
mod libs;
mod logger;
mod schemas;

use std::io;

use anyhow::Context;
use clap::Parser;

use cli::cmd_enums::Cli;
use cli::menu::MenuController;
use installers::Toolbox;
use libs::config_loading::{Settings, load_setup_config};
use libs::host::SystemHost;

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config =
        load_setup_config(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(fonts_dir) = cli.fonts_dir {
        config.fonts_source_dir = fonts_dir;
    }
    if let Some(pause_ms) = cli.pause_ms {
        config.invalid_choice_pause_ms = pause_ms;
    }

    let settings = Settings::resolve(config);
    log_debug!("Resolved settings: {:#?}", settings);
    let pause = settings.invalid_choice_pause;
    let mut toolbox = Toolbox::new(settings, SystemHost::new());

    let stdin = io::stdin();
    let mut menu = MenuController::new(stdin.lock(), io::stdout(), pause);
    menu.run(&mut toolbox).context("installation aborted")?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    logger::init(cli.debug);

    if let Err(e) = run(cli) {
        log_error!("{:#}", e);
        std::process::exit(1);
    }
}

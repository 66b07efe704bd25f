#![forbid(unsafe_code)]

mod app;
mod cli;
mod error;
mod pointer;
mod terminal;

use std::fs::File;
use std::sync::Mutex;

use clap::Parser;
use relist_core::logging;
use relist_widgets::ReorderList;

use crate::cli::Cli;
use crate::error::Result;

fn init_file_logging(cli: &Cli) -> Result<()> {
    let Some(path) = &cli.log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    logging::init_json(Mutex::new(file));
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    init_file_logging(&cli)?;
    let list = ReorderList::with_keymap(cli.items(), cli.keymap()?)?;

    let final_order = {
        let _session = terminal::TerminalSession::enter()?;
        app::App::new(list).run()?
    };

    for (position, item) in final_order.iter().enumerate() {
        println!("{:>3}. {} (id {})", position + 1, item.label(), item.id());
    }
    Ok(())
}

fn main() {
    if let Err(error) = run(Cli::parse()) {
        eprintln!("{error}");
        std::process::exit(error.exit_code());
    }
}

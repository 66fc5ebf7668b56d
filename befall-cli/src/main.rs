//! Evil Befall
//!
//! Runs one `--command` and exits, or starts the interactive shell.

mod commands;
mod shell;

use clap::Parser;

use befall_core::{init_logging, App, CancelToken, Config};

use crate::commands::{dispatch, Outcome};

#[derive(Parser, Debug)]
#[command(name = "evil-befall", version, about = "Interactive shell for exploring and testing an API")]
struct Cli {
    /// Command to run. If unset, runs as a shell
    #[arg(long)]
    command: Option<String>,
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();

    let app = match Config::from_env().and_then(App::new) {
        Ok(app) => app,
        Err(e) => {
            println!("Error initializing cli: {}", e);
            std::process::exit(1);
        }
    };

    install_interrupt_handler(app.cancel_token());

    match cli.command.filter(|c| !c.trim().is_empty()) {
        Some(command) => run_once(app, &command),
        None => shell::run(app),
    }
}

/// Ctrl-C cancels the API call of the running command. A second Ctrl-C
/// before the next command starts exits. At the prompt the line editor
/// handles Ctrl-C itself.
fn install_interrupt_handler(cancel: CancelToken) {
    let result = ctrlc::set_handler(move || {
        if cancel.is_cancelled() {
            std::process::exit(130);
        }
        cancel.cancel();
    });

    if let Err(e) = result {
        tracing::warn!(error = %e, "Failed to install Ctrl-C handler");
    }
}

/// Each line of `commands` runs in order; the first failure stops the run.
fn run_once(mut app: App, commands: &str) -> anyhow::Result<()> {
    let stdout = std::io::stdout();

    for line in commands.lines() {
        match dispatch(&mut app, line, &mut stdout.lock()) {
            Ok(Outcome::Continue) => {}
            Ok(Outcome::Exit) => {
                println!("Exiting...");
                break;
            }
            Err(e) => {
                println!("Error: {}", e);
                break;
            }
        }
    }

    Ok(())
}

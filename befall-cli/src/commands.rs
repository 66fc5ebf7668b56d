//! Shell built-ins and line dispatch

use std::io::Write;

use befall_core::{App, Result};

/// Commands handled by the shell itself rather than a route.
pub const BUILTINS: &[&str] = &["exit", "getcompletion", "help", "quit", "refresh"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Exit,
}

/// Run one input line against the app.
pub fn dispatch(app: &mut App, line: &str, out: &mut dyn Write) -> Result<Outcome> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim_start()),
        None => (line, ""),
    };

    match head {
        "" => {}
        "exit" | "quit" => return Ok(Outcome::Exit),
        "help" => help(app, rest, out)?,
        "getcompletion" => {
            for candidate in app.complete(BUILTINS, rest).candidates {
                writeln!(out, "{}", candidate)?;
            }
        }
        "refresh" => app.refresh(out)?,
        _ => app.execute_line(line, out)?,
    }

    Ok(Outcome::Continue)
}

fn help(app: &App, command: &str, out: &mut dyn Write) -> Result<()> {
    if command.is_empty() {
        let registry = app.registry();
        let width = registry
            .all()
            .map(|r| r.command().len())
            .chain(BUILTINS.iter().map(|b| b.len()))
            .max()
            .unwrap_or(0);

        writeln!(out, "Commands:")?;
        for route in registry.all() {
            writeln!(out, "  {:<width$}  {}", route.command(), route.description(), width = width)?;
        }
        for builtin in BUILTINS {
            writeln!(out, "  {:<width$}  {}", builtin, builtin_description(builtin), width = width)?;
        }
        return Ok(());
    }

    match app.registry().get(command) {
        Some(route) => {
            writeln!(out, "{}: {}", route.command(), route.description())?;
            for arg in route.arguments() {
                writeln!(out, "  {} ({}): {}", arg.name, arg.hint, arg.description)?;
            }
        }
        None if BUILTINS.contains(&command) => {
            writeln!(out, "{}: {}", command, builtin_description(command))?;
        }
        None => writeln!(out, "unknown command: {}", command)?,
    }
    Ok(())
}

fn builtin_description(name: &str) -> &'static str {
    match name {
        "exit" | "quit" => "Leave the shell",
        "getcompletion" => "Show completions for a partial command line",
        "help" => "List commands, or describe one",
        "refresh" => "Re-run the current route",
        _ => "",
    }
}

//! Interactive shell

use std::io::Write;
use std::sync::Arc;

use parking_lot::RwLock;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use befall_core::App;

use crate::commands::{dispatch, Outcome, BUILTINS};

const PROMPT: &str = "evil-befall> ";

/// Line-editor helper; completes against the shared app.
struct ShellHelper {
    app: Arc<RwLock<App>>,
    debug: bool,
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let completion = self.app.read().complete(BUILTINS, &line[..pos]);

        if self.debug {
            eprintln!(
                "\n[completion] line={:?} start={} candidates={:?}",
                &line[..pos],
                completion.start,
                completion.candidates
            );
        }

        let pairs = completion
            .candidates
            .into_iter()
            .map(|c| Pair {
                display: c.clone(),
                replacement: c,
            })
            .collect();
        Ok((completion.start, pairs))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;
}

impl Highlighter for ShellHelper {}

impl Validator for ShellHelper {}

impl Helper for ShellHelper {}

/// Read-eval loop until `exit` or end of input.
pub fn run(app: App) -> anyhow::Result<()> {
    let history_path = app.config().history_path.clone();
    let debug = app.config().debug_completions;

    let editor_config = rustyline::Config::builder()
        .auto_add_history(true)
        .bracketed_paste(app.state().prefs.paste_enabled)
        .build();

    let app = Arc::new(RwLock::new(app));
    let mut rl: Editor<ShellHelper, DefaultHistory> = Editor::with_config(editor_config)?;
    rl.set_helper(Some(ShellHelper {
        app: app.clone(),
        debug,
    }));

    if let Err(e) = rl.load_history(&history_path) {
        tracing::debug!(path = %history_path.display(), error = %e, "No history loaded");
    }

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                let stdout = std::io::stdout();
                let mut out = stdout.lock();
                match dispatch(&mut app.write(), &line, &mut out) {
                    Ok(Outcome::Continue) => {}
                    Ok(Outcome::Exit) => break,
                    Err(e) => writeln!(out, "Error: {}", e)?,
                }
                out.flush()?;
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    if let Err(e) = rl.save_history(&history_path) {
        tracing::warn!(path = %history_path.display(), error = %e, "Failed to save history");
    }

    Ok(())
}

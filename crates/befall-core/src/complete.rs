//! Input completion
//!
//! Completes the word under the cursor: command names for the first word,
//! then either the route's own completion or `name=` for each declared
//! argument not given yet.

use befall_router::{Route, RouteRegistry};
use befall_state::SessionState;

use crate::line::{parse_args, split_line};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    /// Byte offset where the replaced word starts
    pub start: usize,
    pub candidates: Vec<String>,
}

pub(crate) fn complete(
    registry: &RouteRegistry,
    state: &SessionState,
    extra_commands: &[&str],
    line: &str,
) -> Completion {
    let word_start = word_start(line);
    let partial = &line[word_start..];
    let head = line[..word_start].trim();

    if head.is_empty() {
        let mut candidates: Vec<String> = registry
            .all()
            .map(|r| r.command().to_string())
            .chain(extra_commands.iter().map(|c| c.to_string()))
            .filter(|c| c.starts_with(partial))
            .collect();
        candidates.sort();
        return Completion {
            start: word_start,
            candidates,
        };
    }

    // Unbalanced quotes while typing just mean nothing to suggest yet.
    let Ok(words) = split_line(line) else {
        return Completion::default();
    };
    let Some(route) = words.first().and_then(|name| registry.get(name)) else {
        return Completion::default();
    };
    let args = parse_args(&words[1..]);

    let candidates = match route.as_completable() {
        Some(completer) => match completer.completion(state, line, &args) {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::debug!(route = %route.command(), error = %e, "Completion failed");
                Vec::new()
            }
        },
        None => argument_candidates(route, &words[1..], partial),
    };

    Completion {
        start: word_start,
        candidates: candidates
            .into_iter()
            .filter(|c| c.starts_with(partial))
            .collect(),
    }
}

/// Byte offset of the last word, with the quoting rules of `split_line`:
/// whitespace inside quotes or after `\` does not end a word.
fn word_start(line: &str) -> usize {
    let mut start = 0;
    let mut quote: Option<char> = None;
    let mut chars = line.char_indices();

    while let Some((i, c)) = chars.next() {
        match (quote, c) {
            (None, c) if c.is_whitespace() => start = i + c.len_utf8(),
            (None, '\'' | '"') => quote = Some(c),
            (None | Some('"'), '\\') => {
                chars.next();
            }
            (Some(q), c) if c == q => quote = None,
            _ => {}
        }
    }
    start
}

fn argument_candidates(route: &dyn Route, given: &[String], partial: &str) -> Vec<String> {
    route
        .arguments()
        .iter()
        .filter(|spec| {
            !given.iter().any(|w| {
                w != partial && w.split_once('=').map_or(w.as_str(), |(k, _)| k) == spec.name
            })
        })
        .map(|spec| format!("{}=", spec.name))
        .collect()
}

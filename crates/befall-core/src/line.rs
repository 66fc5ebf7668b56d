//! Command line parsing
//!
//! `command key=value key::type="quoted value" flag`
//!
//! Words split on whitespace. Single quotes keep everything literally,
//! double quotes allow `\"` and `\\`. A word without `=` is a flag and gets
//! the value `true`.

use befall_state::RawArgs;

use crate::error::CoreError;
use crate::Result;

const FLAG_VALUE: &str = "true";

pub fn split_line(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => current.push(c),
                        None => return Err(CoreError::InvalidLine("unterminated '".to_string())),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c @ ('"' | '\\')) => current.push(c),
                            Some(c) => {
                                current.push('\\');
                                current.push(c);
                            }
                            None => {
                                return Err(CoreError::InvalidLine("unterminated \"".to_string()))
                            }
                        },
                        Some(c) => current.push(c),
                        None => return Err(CoreError::InvalidLine("unterminated \"".to_string())),
                    }
                }
            }
            '\\' => {
                in_word = true;
                if let Some(c) = chars.next() {
                    current.push(c);
                }
            }
            c => {
                in_word = true;
                current.push(c);
            }
        }
    }

    if in_word {
        words.push(current);
    }
    Ok(words)
}

pub fn parse_args<S: AsRef<str>>(words: &[S]) -> RawArgs {
    words
        .iter()
        .map(|word| match word.as_ref().split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (word.as_ref().to_string(), FLAG_VALUE.to_string()),
        })
        .collect()
}

/// Split a line into its command name and arguments. Blank lines give `None`.
pub fn parse_command(line: &str) -> Result<Option<(String, RawArgs)>> {
    let words = split_line(line)?;
    let Some((name, rest)) = words.split_first() else {
        return Ok(None);
    };
    Ok(Some((name.clone(), parse_args(rest))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_line_quotes() {
        let words = split_line(r#"apiexec.exec route=ping payload::json='{"x": 1}' msg="say \"hi\"""#)
            .unwrap();
        assert_eq!(
            words,
            vec![
                "apiexec.exec",
                "route=ping",
                r#"payload::json={"x": 1}"#,
                r#"msg=say "hi""#,
            ]
        );
    }

    #[test]
    fn test_split_line_unterminated() {
        assert!(matches!(
            split_line("apiexec.exec msg='oops"),
            Err(CoreError::InvalidLine(_))
        ));
    }

    #[test]
    fn test_parse_command() {
        let (name, args) = parse_command("  apiexec.exec route=ping __debug tags::[]string=a,b ")
            .unwrap()
            .unwrap();

        assert_eq!(name, "apiexec.exec");
        assert_eq!(args["route"], "ping");
        assert_eq!(args["__debug"], "true");
        assert_eq!(args["tags::[]string"], "a,b");
    }

    #[test]
    fn test_parse_command_blank() {
        assert!(parse_command("   ").unwrap().is_none());
    }

    #[test]
    fn test_value_keeps_equals() {
        let args = parse_args(&["query=a=b"]);
        assert_eq!(args["query"], "a=b");
    }
}

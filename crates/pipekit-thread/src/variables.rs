//! Prompt variable substitution
//!
//! Placeholders look like `{{name}}` with optional whitespace inside the
//! braces. Names are case-sensitive and limited to `[A-Za-z0-9_.-]`.
//! Placeholders without a value are left exactly as written.

use crate::error::CompositionError;
use crate::message::Message;
use crate::pipe::Pipe;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Variable name to value
pub type Variables = HashMap<String, String>;

fn placeholder_regex() -> Result<&'static Regex, CompositionError> {
    static PLACEHOLDER: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    PLACEHOLDER
        .get_or_init(|| Regex::new(r"\{\{\s*([A-Za-z0-9_.-]+)\s*\}\}"))
        .as_ref()
        .map_err(|e| CompositionError::Pattern(e.to_string()))
}

/// Pipe defaults overlaid with the request's variables
pub fn resolve_variables(pipe: &Pipe, request: Option<&Variables>) -> Variables {
    let mut variables: Variables = pipe
        .variables
        .iter()
        .map(|variable| (variable.name.clone(), variable.value.clone()))
        .collect();

    if let Some(request) = request {
        variables.extend(request.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    variables
}

fn substitute(regex: &Regex, content: &str, variables: &Variables) -> String {
    regex
        .replace_all(content, |caps: &Captures<'_>| {
            caps.get(1)
                .and_then(|name| variables.get(name.as_str()))
                .map_or_else(
                    || caps.get(0).map_or("", |m| m.as_str()).to_string(),
                    Clone::clone,
                )
        })
        .into_owned()
}

#[cfg(test)]
fn substitute_variables(
    content: &str,
    variables: &Variables,
) -> Result<String, CompositionError> {
    Ok(substitute(placeholder_regex()?, content, variables))
}

/// Substitute variables in the content of every message
pub(crate) fn apply_variables(
    messages: Vec<Message>,
    variables: &Variables,
) -> Result<Vec<Message>, CompositionError> {
    let regex = placeholder_regex()?;
    Ok(messages
        .into_iter()
        .map(|mut message| {
            message.content = substitute(regex, &message.content, variables);
            message
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipe::PipeVariable;

    fn vars(pairs: &[(&str, &str)]) -> Variables {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_known_placeholder_replaced_unknown_kept() {
        let result = substitute_variables("Hi {{name}}, {{missing}}!", &vars(&[("name", "Ada")]))
            .expect("substitutes");
        assert_eq!(result, "Hi Ada, {{missing}}!");
    }

    #[test]
    fn test_inner_whitespace_allowed() {
        let result = substitute_variables("{{ topic }} and {{topic}}", &vars(&[("topic", "Rust")]))
            .expect("substitutes");
        assert_eq!(result, "Rust and Rust");
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let result =
            substitute_variables("{{Name}}", &vars(&[("name", "Ada")])).expect("substitutes");
        assert_eq!(result, "{{Name}}");
    }

    #[test]
    fn test_invalid_names_untouched() {
        let result =
            substitute_variables("{{not valid}} {{a/b}}", &vars(&[("not valid", "x")]))
                .expect("substitutes");
        assert_eq!(result, "{{not valid}} {{a/b}}");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let result = substitute_variables("{{a}}", &vars(&[("a", "{{b}}"), ("b", "nope")]))
            .expect("substitutes");
        assert_eq!(result, "{{b}}");
    }

    #[test]
    fn test_request_overrides_pipe_defaults() {
        let pipe = Pipe {
            variables: vec![
                PipeVariable {
                    name: "tone".to_string(),
                    value: "formal".to_string(),
                },
                PipeVariable {
                    name: "lang".to_string(),
                    value: "English".to_string(),
                },
            ],
            ..Pipe::default()
        };

        let resolved = resolve_variables(&pipe, Some(&vars(&[("tone", "casual")])));
        assert_eq!(resolved.get("tone").map(String::as_str), Some("casual"));
        assert_eq!(resolved.get("lang").map(String::as_str), Some("English"));
    }
}

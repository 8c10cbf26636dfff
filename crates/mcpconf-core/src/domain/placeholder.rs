//! `${input:NAME}` / `${env:NAME}` tokens.
//!
//! Tokens are opaque text to the core. This module only finds them so that
//! validation can skip strict parsing and adapters can carry input hints
//! along with the values that reference them.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PLACEHOLDER_REGEX: Regex = Regex::new(r"\$\{(input|env):([^}\s]+)\}").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    Input,
    Env,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    pub kind: PlaceholderKind,
    pub name: &'a str,
}

/// All placeholder tokens in `text`, in order of appearance.
pub fn placeholders(text: &str) -> Vec<Placeholder<'_>> {
    PLACEHOLDER_REGEX
        .captures_iter(text)
        .filter_map(|caps| {
            let kind = match caps.get(1)?.as_str() {
                "input" => PlaceholderKind::Input,
                _ => PlaceholderKind::Env,
            };
            Some(Placeholder {
                kind,
                name: caps.get(2)?.as_str(),
            })
        })
        .collect()
}

pub fn contains_placeholder(text: &str) -> bool {
    PLACEHOLDER_REGEX.is_match(text)
}

/// Names of the `${input:..}` tokens in `text`.
pub fn input_names(text: &str) -> impl Iterator<Item = &str> {
    placeholders(text)
        .into_iter()
        .filter(|p| p.kind == PlaceholderKind::Input)
        .map(|p| p.name)
}

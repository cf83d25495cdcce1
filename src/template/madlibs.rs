use itertools::Itertools;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::hash::BuildHasher;
use std::sync::OnceLock;

fn variable_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{(\w+)\}").expect("variable regex must compile"))
}

/// Variable names referenced as `{name}` in `template`, deduplicated in first-occurrence order.
pub fn extract_variables(template: &str) -> Vec<String> {
    variable_pattern()
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .unique()
        .collect()
}

/// Replaces every `{name}` with its value.
///
/// A variable without a value, or with an empty one, stays as the literal `{name}` so the
/// preview still shows what needs filling.
pub fn fill_template<S: BuildHasher>(template: &str, values: &HashMap<String, String, S>) -> String {
    variable_pattern()
        .replace_all(template, |caps: &Captures| match values.get(&caps[1]) {
            Some(value) if !value.is_empty() => value.clone(),
            _ => caps[0].to_string(),
        })
        .into_owned()
}

/// Replaces each `{name}` that `lookup` knows in one pass. Substituted text is not rescanned,
/// and unknown names stay literal.
pub(crate) fn substitute<'a>(template: &str, lookup: impl Fn(&str) -> Option<&'a str>) -> String {
    variable_pattern()
        .replace_all(template, |caps: &Captures| match lookup(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Rewrites `{name}` placeholders as `[name]` for printed scripts.
pub fn bracket_variables(template: &str) -> String {
    variable_pattern().replace_all(template, "[$1]").into_owned()
}

//! Prefix autocomplete over the command vocabulary.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Nothing to do: blank input or no match.
    None,
    /// Replace the input with this value.
    Fill(String),
    /// Leave the input alone and show these candidates.
    Suggest(Vec<&'static str>),
}

/// Matches the trimmed, lower-cased input as a prefix of each vocabulary entry.
///
/// A single match always fills with a trailing space, even for verbs that take
/// no arguments.
pub fn resolve(input: &str, vocabulary: &[&'static str]) -> Completion {
    let prefix = input.trim().to_lowercase();
    if prefix.is_empty() {
        return Completion::None;
    }

    let matches: Vec<&'static str> = vocabulary
        .iter()
        .copied()
        .filter(|candidate| candidate.starts_with(&prefix))
        .collect();

    match matches.as_slice() {
        [] => Completion::None,
        [only] => Completion::Fill(format!("{only} ")),
        _ => Completion::Suggest(matches),
    }
}

pub fn suggestion_line(matches: &[&str]) -> String {
    format!("Suggestions: {}", matches.join(", "))
}

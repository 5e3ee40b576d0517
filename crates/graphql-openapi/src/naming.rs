//! Naming heuristics
//!
//! String transforms shared by the type converter, the REST pattern detector
//! and the path builder. Pluralization is a configurable heuristic; it makes
//! no attempt at linguistic correctness and `singularize` is not a true
//! inverse of `pluralize` for irregular or ambiguous words.

use crate::config::Pluralization;

/// Description prefixes that already read like an operation summary
const ACTION_VERBS: [&str; 20] = [
    "List ", "Get ", "Fetch ", "Retrieve ", "Find ", "Create ", "Add ", "Insert ", "Post ",
    "Update ", "Modify ", "Edit ", "Put ", "Patch ", "Delete ", "Remove ", "Destroy ", "Search ",
    "Query ", "Filter ",
];

/// Sentence delimiters in priority order, used to split a summary off a description
const SENTENCE_DELIMITERS: [&str; 6] = [". ", "! ", "? ", ": ", "; ", " - "];

/// Pluralizes and singularizes resource names according to a set of rules
#[derive(Debug, Clone, Copy)]
pub struct Inflector<'a> {
    rules: &'a Pluralization,
}

impl<'a> Inflector<'a> {
    pub fn new(rules: &'a Pluralization) -> Self {
        Self { rules }
    }

    pub fn pluralize(&self, word: &str) -> String {
        if let Some((suffix, replacement)) = self.longest_custom_match(word, |(suffix, _)| suffix) {
            let stem = word.strip_suffix(suffix).unwrap_or(word);
            return format!("{stem}{replacement}");
        }

        if self
            .rules
            .es_suffixes
            .iter()
            .any(|suffix| !suffix.is_empty() && word.ends_with(suffix.as_str()))
        {
            return format!("{word}es");
        }

        if !self.rules.ies_suffix.is_empty() {
            if let Some(stem) = word.strip_suffix(self.rules.ies_suffix.as_str()) {
                if stem.chars().last().is_some_and(|c| !is_vowel(c)) {
                    return format!("{stem}ies");
                }
            }
        }

        format!("{word}{}", self.rules.default_suffix)
    }

    pub fn singularize(&self, word: &str) -> String {
        if let Some((suffix, replacement)) =
            self.longest_custom_match(word, |(_, replacement)| replacement)
        {
            let stem = word.strip_suffix(replacement).unwrap_or(word);
            return format!("{stem}{suffix}");
        }

        if !self.rules.ies_suffix.is_empty() {
            if let Some(stem) = word.strip_suffix("ies").filter(|stem| !stem.is_empty()) {
                return format!("{stem}{}", self.rules.ies_suffix);
            }
        }

        if let Some(base) = word.strip_suffix("es").filter(|base| !base.is_empty()) {
            if self
                .rules
                .es_suffixes
                .iter()
                .any(|suffix| !suffix.is_empty() && base.ends_with(suffix.as_str()))
            {
                return base.to_string();
            }
        }

        let default_suffix = self.rules.default_suffix.as_str();
        if !default_suffix.is_empty() {
            if let Some(stem) = word.strip_suffix(default_suffix).filter(|s| !s.is_empty()) {
                return stem.to_string();
            }
        }

        word.to_string()
    }

    /// Find the custom rule whose selected side is the longest suffix of `word`
    fn longest_custom_match(
        &self,
        word: &str,
        side: impl Fn((&'a String, &'a String)) -> &'a String,
    ) -> Option<(&'a String, &'a String)> {
        let rules: &'a Pluralization = self.rules;
        rules
            .custom
            .iter()
            .filter(|entry| {
                let matched = side(*entry);
                !matched.is_empty() && word.ends_with(matched.as_str())
            })
            .fold(None, |longest, entry| match longest {
                Some(current) if side(current).len() >= side(entry).len() => Some(current),
                _ => Some(entry),
            })
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Uppercase the first character
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercase the first character
pub fn uncapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Convert a camelCase or PascalCase name into Title Case words.
///
/// `addComment` becomes `Add Comment`. Acronym runs are split letter by letter.
pub fn camel_to_title(name: &str) -> String {
    let mut title = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if i == 0 {
            title.extend(c.to_uppercase());
        } else if c.is_ascii_uppercase() {
            title.push(' ');
            title.push(c);
        } else {
            title.push(c);
        }
    }
    title
}

/// Prefix a description with the human-readable field name, unless it already
/// starts with an action verb
pub fn add_field_name_prefix(name: &str, description: &str) -> String {
    if description.is_empty() {
        return camel_to_title(name);
    }

    if ACTION_VERBS
        .iter()
        .any(|verb| description.starts_with(verb))
    {
        return description.to_string();
    }

    format!("{} - {}", camel_to_title(name), description)
}

/// Split text into a `(summary, description)` pair at the first sentence delimiter.
///
/// The summary is the trimmed text before the delimiter and the description is
/// the whole trimmed text. Without a delimiter both halves are the full text.
pub fn split_description(text: &str) -> (String, String) {
    if text.is_empty() {
        return (String::new(), String::new());
    }

    let first_delimiter = SENTENCE_DELIMITERS
        .iter()
        .filter_map(|delimiter| text.find(delimiter))
        .min();

    match first_delimiter.and_then(|offset| text.get(..offset)) {
        Some(summary) => (summary.trim().to_string(), text.trim().to_string()),
        None => (text.to_string(), text.to_string()),
    }
}

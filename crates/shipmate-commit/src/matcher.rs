//! Commit type list matching.

use regex::Regex;

/// Matches a commit header against a list of commit types.
///
/// Matching is case-insensitive and anchored at the start of the header,
/// but is a prefix test: a `fix` entry also matches `fixup: ...`.
#[derive(Debug, Clone)]
pub struct TypeMatcher {
    types: Vec<String>,
    pattern: Option<Regex>,
}

impl TypeMatcher {
    /// Creates a matcher for the given types.
    ///
    /// An empty list (or a list of empty strings) never matches.
    #[must_use]
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let types: Vec<String> = types
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        let pattern = if types.is_empty() {
            None
        } else {
            let alternation = types
                .iter()
                .map(String::as_str)
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join("|");
            Regex::new(&format!("^(?:{alternation})")).ok()
        };

        Self { types, pattern }
    }

    /// Returns true if the lower-cased header starts with one of the types.
    #[must_use]
    pub fn matches(&self, header: &str) -> bool {
        self.pattern
            .as_ref()
            .is_some_and(|re| re.is_match(&header.to_lowercase()))
    }

    /// Returns the normalized type list.
    #[must_use]
    pub fn types(&self) -> &[String] {
        &self.types
    }

    /// Returns true if no type is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for TypeMatcher {
    fn default() -> Self {
        Self::new(std::iter::empty::<&str>())
    }
}

//! Conventional commit header grammar.

use std::sync::LazyLock;

use regex::Regex;

/// `type[(scope)][!]: description`
///
/// `type` excludes `(`, `!` and `:`; `scope` is anything up to the first `)`.
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<type>[^(!:]+)(?:\((?P<scope>[^)]*)\))?!?:\s*(?P<description>.+)$")
        .expect("invalid regex")
});

/// Result of matching a commit header against the conventional grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderParse {
    /// The header follows the grammar.
    Matched {
        /// The commit type, as written.
        r#type: String,
        /// The scope: `None` without parentheses, `Some("")` for `()`.
        scope: Option<String>,
        /// The trimmed description.
        description: String,
    },
    /// The header does not follow the grammar.
    Unmatched,
}

impl HeaderParse {
    /// Parses a commit header.
    #[must_use]
    pub fn parse(header: &str) -> Self {
        let Some(captures) = HEADER_RE.captures(header) else {
            return Self::Unmatched;
        };

        let (Some(r#type), Some(description)) =
            (captures.name("type"), captures.name("description"))
        else {
            return Self::Unmatched;
        };

        Self::Matched {
            r#type: r#type.as_str().to_string(),
            scope: captures.name("scope").map(|m| m.as_str().to_string()),
            description: description.as_str().trim().to_string(),
        }
    }

    /// Returns true if the header matched.
    #[must_use]
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }
}

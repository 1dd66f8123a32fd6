//! Release notes.

use std::collections::{BTreeMap, HashMap};

use shipmate_commit::{BREAKING_GROUP, ClassifiedCommit, CommitRecord, TypeMatcher, classify};
use shipmate_config::ReleaseInputs;
use shipmate_host::RepoSlug;
use tracing::debug;

/// Built-in section titles by group.
pub const DEFAULT_TYPE_TITLES: &[(&str, &str)] = &[
    ("breaking", "BREAKING CHANGES"),
    ("build", "Build"),
    ("chore", "Chores"),
    ("ci", "Continuous Integration"),
    ("docs", "Documentation"),
    ("feat", "Features"),
    ("fix", "Fixes"),
    ("perf", "Performance Improvements"),
    ("refactor", "Refactoring"),
    ("revert", "Reverted Commits"),
    ("style", "Code Style and Formatting"),
    ("test", "Tests"),
];

const BREAKING_FALLBACK_TITLE: &str = "BREAKING CHANGES";

/// Section titles, keyed by commit type or `breaking`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeTitles {
    titles: BTreeMap<String, String>,
}

impl TypeTitles {
    /// Returns the built-in titles with `overrides` merged over them.
    #[must_use]
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Self {
        let mut titles: BTreeMap<String, String> = DEFAULT_TYPE_TITLES
            .iter()
            .map(|(group, title)| ((*group).to_string(), (*title).to_string()))
            .collect();
        titles.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self { titles }
    }

    /// Returns the title of a group.
    ///
    /// Missing or empty titles fall back to `BREAKING CHANGES` for the
    /// breaking group and to the group name otherwise.
    #[must_use]
    pub fn title_for<'a>(&'a self, group: &'a str) -> &'a str {
        match self.titles.get(group) {
            Some(title) if !title.is_empty() => title,
            _ if group == BREAKING_GROUP => BREAKING_FALLBACK_TITLE,
            _ => group,
        }
    }
}

impl Default for TypeTitles {
    fn default() -> Self {
        Self::with_overrides(&BTreeMap::new())
    }
}

/// Change lines grouped by key, iterated in first-seen order.
#[derive(Debug, Default)]
struct ChangeGroups {
    groups: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

impl ChangeGroups {
    fn push(&mut self, key: &str, line: String) {
        if let Some(&i) = self.index.get(key) {
            self.groups[i].1.push(line);
        } else {
            self.index.insert(key.to_string(), self.groups.len());
            self.groups.push((key.to_string(), vec![line]));
        }
    }

    fn get(&self, key: &str) -> Option<&[String]> {
        self.index.get(key).map(|&i| self.groups[i].1.as_slice())
    }

    fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|(key, lines)| (key.as_str(), lines.as_slice()))
    }
}

/// Renders the markdown release notes for a commit history.
#[derive(Debug, Clone)]
pub struct ChangelogBuilder {
    slug: RepoSlug,
    titles: TypeTitles,
    major_types: TypeMatcher,
}

impl ChangelogBuilder {
    /// Creates a builder linking commits to `slug`.
    #[must_use]
    pub fn new(slug: RepoSlug) -> Self {
        Self {
            slug,
            titles: TypeTitles::default(),
            major_types: TypeMatcher::default(),
        }
    }

    /// Creates a builder with the title overrides and major types of a release.
    #[must_use]
    pub fn for_release(slug: RepoSlug, inputs: &ReleaseInputs) -> Self {
        Self::new(slug)
            .with_titles(TypeTitles::with_overrides(&inputs.changelog_titles))
            .with_major_types(TypeMatcher::new(&inputs.major_types))
    }

    /// Sets the section titles.
    #[must_use]
    pub fn with_titles(mut self, titles: TypeTitles) -> Self {
        self.titles = titles;
        self
    }

    /// Sets the types that always count as breaking.
    #[must_use]
    pub fn with_major_types(mut self, major_types: TypeMatcher) -> Self {
        self.major_types = major_types;
        self
    }

    /// Builds the release notes.
    ///
    /// Breaking changes come first, then every other group in the order its
    /// first commit appears. Each section is `# Title`, one line per commit
    /// and a blank line. No classifiable commit yields an empty string.
    #[must_use]
    pub fn build(&self, history: &[CommitRecord]) -> String {
        let mut groups = ChangeGroups::default();

        for record in history {
            let Some(commit) = classify(record, &self.major_types) else {
                debug!(hash = %record.short_hash(), "commit left out of the changelog");
                continue;
            };
            groups.push(commit.group(), self.change_line(&commit));
        }

        let mut output = Vec::new();
        if let Some(lines) = groups.get(BREAKING_GROUP) {
            push_section(&mut output, self.titles.title_for(BREAKING_GROUP), lines);
        }
        for (group, lines) in groups.iter().filter(|(g, _)| *g != BREAKING_GROUP) {
            push_section(&mut output, self.titles.title_for(group), lines);
        }

        output.join("\n")
    }

    fn change_line(&self, commit: &ClassifiedCommit) -> String {
        let link = format!(
            "([{}]({}))",
            commit.short_hash(),
            self.slug.commit_url(&commit.hash)
        );

        match commit.scope.as_deref() {
            Some(scope) if !scope.is_empty() => {
                format!("- {scope}: {} {link}", commit.description)
            }
            _ => format!("- {} {link}", commit.description),
        }
    }
}

fn push_section(output: &mut Vec<String>, title: &str, lines: &[String]) {
    output.push(format!("# {title}"));
    output.extend(lines.iter().cloned());
    output.push(String::new());
}

//! Category normalization: free-text vocabulary → catalog category names.

use std::collections::{BTreeSet, HashMap};

/// Category names used by the upstream store.
pub const CATALOG_CATEGORIES: &[&str] = &[
    "electronics",
    "jewelery",
    "men's clothing",
    "women's clothing",
];

/// Aliases and their catalog targets. `None` marks a term that names a
/// category the catalog does not carry.
const DEFAULT_SYNONYMS: &[(&str, Option<&str>)] = &[
    ("men", Some("men's clothing")),
    ("men's", Some("men's clothing")),
    ("women", Some("women's clothing")),
    ("women's", Some("women's clothing")),
    ("jewelry", Some("jewelery")),
    ("jewels", Some("jewelery")),
    ("electronics", Some("electronics")),
    ("clothes", None),
    ("shoes", None),
];

/// Immutable category vocabulary: the valid catalog names plus a synonym table.
#[derive(Debug, Clone)]
pub struct CategoryVocabulary {
    categories: BTreeSet<String>,
    synonyms: HashMap<String, Option<String>>,
}

impl CategoryVocabulary {
    /// Vocabulary with the given catalog names and no synonyms.
    pub fn new<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categories: categories
                .into_iter()
                .map(|c| {
                    let c: String = c.into();
                    c.trim().to_lowercase()
                })
                .collect(),
            synonyms: HashMap::new(),
        }
    }

    /// Add an alias. A `None` target makes the alias resolve to nothing.
    pub fn with_synonym(mut self, alias: &str, target: Option<&str>) -> Self {
        self.synonyms.insert(
            alias.trim().to_lowercase(),
            target.map(|t| t.trim().to_lowercase()),
        );
        self
    }

    /// True if `name` is one of the catalog's category names.
    pub fn contains(&self, name: &str) -> bool {
        self.categories.contains(name)
    }

    /// Resolve a single raw term to a catalog category, if any.
    ///
    /// Synonyms take precedence over direct matches. A synonym whose target
    /// is not in the catalog resolves to `None`.
    pub fn resolve(&self, raw: &str) -> Option<&str> {
        let term = raw.trim().to_lowercase();
        let candidate = match self.synonyms.get(&term) {
            Some(target) => target.as_deref()?,
            None => term.as_str(),
        };
        self.categories.get(candidate).map(String::as_str)
    }
}

impl Default for CategoryVocabulary {
    fn default() -> Self {
        DEFAULT_SYNONYMS.iter().fold(
            Self::new(CATALOG_CATEGORIES.iter().copied()),
            |vocab, (alias, target)| vocab.with_synonym(alias, *target),
        )
    }
}

/// Maps user or model category terms onto a [`CategoryVocabulary`].
#[derive(Debug, Clone, Default)]
pub struct CategoryNormalizer {
    vocabulary: CategoryVocabulary,
}

impl CategoryNormalizer {
    pub fn new(vocabulary: CategoryVocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &CategoryVocabulary {
        &self.vocabulary
    }

    /// Normalize a list of raw terms into sorted, deduplicated catalog names.
    ///
    /// Unrecognized terms are dropped rather than reported.
    pub fn normalize<S: AsRef<str>>(&self, raw: &[S]) -> Vec<String> {
        let mut out = BTreeSet::new();
        for term in raw {
            match self.vocabulary.resolve(term.as_ref()) {
                Some(name) => {
                    out.insert(name.to_string());
                }
                None => tracing::debug!(term = term.as_ref(), "dropping unknown category"),
            }
        }
        out.into_iter().collect()
    }
}

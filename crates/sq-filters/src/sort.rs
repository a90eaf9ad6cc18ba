//! Sort hint sanitization: any string → one of the four [`SortKey`]s.

use sq_protocol::SortKey;

/// Phrase rules checked in order; the first rule with a matching phrase wins.
const DEFAULT_RULES: &[(&[&str], SortKey)] = &[
    (
        &["good review", "best rated", "high rating"],
        SortKey::RatingDesc,
    ),
    (&["cheap"], SortKey::PriceAsc),
    (&["expensive"], SortKey::PriceDesc),
];

/// Ordered phrase → sort key rules used when a hint is not an exact key.
#[derive(Debug, Clone)]
pub struct SortHeuristics {
    rules: Vec<(Vec<String>, SortKey)>,
}

impl SortHeuristics {
    /// Heuristics with no phrase rules: anything but an exact key is `relevance`.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule. Rules added earlier take priority.
    pub fn with_rule(mut self, phrases: &[&str], key: SortKey) -> Self {
        self.rules.push((
            phrases.iter().map(|p| p.to_lowercase()).collect(),
            key,
        ));
        self
    }

    fn lookup(&self, hint: &str) -> Option<SortKey> {
        self.rules
            .iter()
            .find(|(phrases, _)| phrases.iter().any(|p| hint.contains(p.as_str())))
            .map(|(_, key)| *key)
    }
}

impl Default for SortHeuristics {
    fn default() -> Self {
        DEFAULT_RULES
            .iter()
            .fold(Self::empty(), |h, (phrases, key)| h.with_rule(phrases, *key))
    }
}

/// Maps untrusted sort hints onto [`SortKey`]. Never fails.
#[derive(Debug, Clone, Default)]
pub struct SortSanitizer {
    heuristics: SortHeuristics,
}

impl SortSanitizer {
    pub fn new(heuristics: SortHeuristics) -> Self {
        Self { heuristics }
    }

    pub fn sanitize(&self, hint: Option<&str>) -> SortKey {
        let Some(hint) = hint.map(str::trim).filter(|h| !h.is_empty()) else {
            return SortKey::Relevance;
        };

        if let Some(key) = SortKey::parse(hint) {
            return key;
        }

        let lower = hint.to_lowercase();
        match self.heuristics.lookup(&lower) {
            Some(key) => {
                tracing::debug!(hint = %hint, sort_by = %key, "mapped free-text sort hint");
                key
            }
            None => SortKey::Relevance,
        }
    }
}

//! Deterministic price-bound extraction from raw query text.
//!
//! Independent of the language model; used to override its price direction.

use regex::Regex;
use std::sync::LazyLock;

// between $A and $B / from $A to $B / between $A - $B
static RE_RANGE_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:between|from)\s*\$?\s*(\d+(?:\.\d+)?)\s*(?:and|to|-)\s*\$?\s*(\d+(?:\.\d+)?)",
    )
    .unwrap()
});

// $A-$B
static RE_RANGE_DASH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\s*(\d+(?:\.\d+)?)\s*-\s*\$?\s*(\d+(?:\.\d+)?)").unwrap()
});

static RE_UPPER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\b(?:under|below|less than|max(?:imum)?)|<=|<)\s*\$?\s*(\d+(?:\.\d+)?)")
        .unwrap()
});

static RE_LOWER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:\b(?:over|above|more than|min(?:imum)?|at least)|>=|>)\s*\$?\s*(\d+(?:\.\d+)?)",
    )
    .unwrap()
});

/// Price bounds stated literally in the query.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PriceBounds {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl PriceBounds {
    pub fn new(lower: Option<f64>, upper: Option<f64>) -> Self {
        Self { lower, upper }
    }

    pub fn is_empty(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }
}

/// Extract price bounds from a raw query.
///
/// Rules are tried in priority order (range, upper bound, lower bound) and the
/// first match wins. Range ends are returned in ascending order.
pub fn extract_price_bounds(query: &str) -> PriceBounds {
    let text = query.to_lowercase().replace(',', "");

    let range = capture_pair(&RE_RANGE_WORDS, &text).or_else(|| capture_pair(&RE_RANGE_DASH, &text));
    if let Some((a, b)) = range {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        return PriceBounds::new(Some(lo), Some(hi));
    }

    if let Some(n) = capture_one(&RE_UPPER, &text) {
        return PriceBounds::new(None, Some(n));
    }

    if let Some(n) = capture_one(&RE_LOWER, &text) {
        return PriceBounds::new(Some(n), None);
    }

    PriceBounds::default()
}

fn capture_pair(re: &Regex, text: &str) -> Option<(f64, f64)> {
    let caps = re.captures(text)?;
    Some((parse_price(&caps[1])?, parse_price(&caps[2])?))
}

fn capture_one(re: &Regex, text: &str) -> Option<f64> {
    parse_price(&re.captures(text)?[1])
}

/// Digit runs past f64 range parse to infinity; those are not prices.
fn parse_price(digits: &str) -> Option<f64> {
    digits.parse::<f64>().ok().filter(|n| n.is_finite())
}

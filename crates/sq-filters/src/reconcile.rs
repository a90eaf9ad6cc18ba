//! Price reconciliation between model output and literal query text.
//!
//! The query text decides price direction; the model decides everything else.
//! The merge is a small decision table: [`plan`] turns the extracted bounds
//! into an ordered list of [`PriceRule`]s and [`apply_rule`] executes one.
//! The table is re-run until a whole pass leaves the prices where it found
//! them, so reconciling an already-reconciled filter is a no-op.

use sq_protocol::Filter;

use crate::price::{PriceBounds, extract_price_bounds};

/// Upper limit on table passes.
const MAX_PASSES: usize = 8;

/// One row of the reconciliation table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceRule {
    /// Literal lower bound replaces the model's `price_min`.
    SetMin(f64),
    /// Model echoed the literal lower bound as `price_max`; drop it.
    ClearMaxIfEqual(f64),
    /// Literal upper bound replaces the model's `price_max`.
    SetMax(f64),
    /// Model echoed the literal upper bound as `price_min`; drop it.
    ClearMinIfEqual(f64),
    /// Restore `price_min <= price_max`.
    SwapIfInverted,
}

/// Build the ordered rule list for the given literal bounds.
pub fn plan(bounds: PriceBounds) -> Vec<PriceRule> {
    let mut rules = Vec::with_capacity(5);
    if let Some(lo) = bounds.lower {
        rules.push(PriceRule::SetMin(lo));
        rules.push(PriceRule::ClearMaxIfEqual(lo));
    }
    if let Some(hi) = bounds.upper {
        rules.push(PriceRule::SetMax(hi));
        rules.push(PriceRule::ClearMinIfEqual(hi));
    }
    rules.push(PriceRule::SwapIfInverted);
    rules
}

/// Apply one rule. Returns `true` if the filter changed.
pub fn apply_rule(filter: &mut Filter, rule: PriceRule) -> bool {
    let before = (filter.price_min, filter.price_max);
    match rule {
        PriceRule::SetMin(v) => filter.price_min = Some(v),
        PriceRule::ClearMaxIfEqual(v) => {
            if filter.price_max == Some(v) {
                filter.price_max = None;
            }
        }
        PriceRule::SetMax(v) => filter.price_max = Some(v),
        PriceRule::ClearMinIfEqual(v) => {
            if filter.price_min == Some(v) {
                filter.price_min = None;
            }
        }
        PriceRule::SwapIfInverted => {
            if filter.has_inverted_price_range() {
                std::mem::swap(&mut filter.price_min, &mut filter.price_max);
            }
        }
    }
    before != (filter.price_min, filter.price_max)
}

/// Reconcile `filter` against the price bounds stated in `query`.
pub fn reconcile_prices(filter: Filter, query: &str) -> Filter {
    reconcile_with_bounds(filter, extract_price_bounds(query))
}

/// Reconcile `filter` against already-extracted literal bounds.
pub fn reconcile_with_bounds(mut filter: Filter, bounds: PriceBounds) -> Filter {
    let model_prices = (filter.price_min, filter.price_max);
    settle(&mut filter, &plan(bounds));

    if model_prices != (filter.price_min, filter.price_max) {
        tracing::debug!(
            model_min = ?model_prices.0,
            model_max = ?model_prices.1,
            price_min = ?filter.price_min,
            price_max = ?filter.price_max,
            "price bounds reconciled against query text"
        );
    }
    filter
}

/// Run the table until a pass ends on the prices it started from.
///
/// Rules inside a pass may toggle a bound back and forth (an equal-bound
/// range sets then clears `price_min`), so only the end-of-pass state is
/// compared. Returns the number of passes run.
fn settle(filter: &mut Filter, rules: &[PriceRule]) -> usize {
    for pass in 1..=MAX_PASSES {
        let before = (filter.price_min, filter.price_max);
        for rule in rules {
            apply_rule(filter, *rule);
        }
        if before == (filter.price_min, filter.price_max) {
            return pass;
        }
    }
    MAX_PASSES
}

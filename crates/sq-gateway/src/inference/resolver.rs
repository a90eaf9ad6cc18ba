//! Intent resolver — query text → language model → sanitized `Filter`.
//!
//! The model's output is untrusted: it may be wrapped in prose, use the
//! wrong types, or invent sort keys. Everything it returns passes through
//! the sort sanitizer and category normalizer before a `Filter` is built.

use std::sync::Arc;

use serde_json::{Map, Value};
use sq_filters::{CategoryNormalizer, SortSanitizer};
use sq_protocol::Filter;

use super::{CompletionOptions, CompletionSource, InferenceError, InferenceResult};

/// Instruction prompt: output schema, price-direction rules and worked examples.
const SYSTEM_PROMPT: &str = r#"You turn shopping queries into strict JSON filters for a product search engine.
Return ONLY JSON with exactly this schema:

{
  "categories": string[],
  "keywords": string[],
  "price_min": number|null,
  "price_max": number|null,
  "rating_min": number|null,
  "sort_by": "relevance" | "price_asc" | "price_desc" | "rating_desc"
}

Price rules:
- "under", "below", "less than", "<= $X", "< $X", "max $X" => price_max = X
- "over", "above", "more than", ">= $X", "> $X", "min $X", "at least $X" => price_min = X
- "between $A and $B" or "$A-$B" => price_min = A and price_max = B
- Never set price_min and price_max to the same X unless the user asked for exactly that price.
- Never invert these rules.

Other rules:
- Only set rating_min when a numeric threshold is given (e.g. "4+ stars").
- "good reviews" alone => rating_min null and sort_by = "rating_desc".
- "cheapest" => sort_by = "price_asc"; "most expensive" => sort_by = "price_desc".
- Leave unknown fields null or empty, but always return valid JSON.

Examples:
Q: "electronics under $100"
A: {"categories":["electronics"],"keywords":[],"price_min":null,"price_max":100,"rating_min":null,"sort_by":"relevance"}

Q: "electronics over $100"
A: {"categories":["electronics"],"keywords":[],"price_min":100,"price_max":null,"rating_min":null,"sort_by":"relevance"}

Q: "women's clothing between $20 and $50 with 4+ stars"
A: {"categories":["women's clothing"],"keywords":[],"price_min":20,"price_max":50,"rating_min":4,"sort_by":"relevance"}
"#;

/// Build the full completion prompt for a shopper query.
pub fn build_prompt(query: &str) -> String {
    format!("{SYSTEM_PROMPT}\n\nUser query: \"\"\"{query}\"\"\"\nReturn JSON now:")
}

/// Resolves free-text queries into filters via a [`CompletionSource`].
pub struct IntentResolver {
    source: Arc<dyn CompletionSource>,
    options: CompletionOptions,
    categories: CategoryNormalizer,
    sort: SortSanitizer,
}

impl IntentResolver {
    /// Resolver with the default catalog vocabulary and sort heuristics.
    pub fn new(source: Arc<dyn CompletionSource>, options: CompletionOptions) -> Self {
        Self {
            source,
            options,
            categories: CategoryNormalizer::default(),
            sort: SortSanitizer::default(),
        }
    }

    /// Replace the category normalizer (e.g. for a different catalog).
    pub fn with_categories(mut self, categories: CategoryNormalizer) -> Self {
        self.categories = categories;
        self
    }

    /// Replace the sort sanitizer.
    pub fn with_sort(mut self, sort: SortSanitizer) -> Self {
        self.sort = sort;
        self
    }

    /// Ask the model for a filter and sanitize whatever comes back.
    pub async fn resolve(&self, query: &str) -> InferenceResult<Filter> {
        let prompt = build_prompt(query);
        let text = self.source.complete(&prompt, &self.options).await?;

        let raw = parse_model_output(&text).inspect_err(|e| {
            tracing::warn!(
                source = self.source.name(),
                error = %e,
                output = %text,
                "unusable model output"
            );
        })?;

        let filter = self.filter_from_raw(&raw);
        tracing::debug!(
            source = self.source.name(),
            categories = ?filter.categories,
            keywords = ?filter.keywords,
            price_min = ?filter.price_min,
            price_max = ?filter.price_max,
            rating_min = ?filter.rating_min,
            sort_by = %filter.sort_by,
            "model filter resolved"
        );
        Ok(filter)
    }

    /// Build a `Filter` from a raw model object, coercing or dropping bad fields.
    pub fn filter_from_raw(&self, raw: &Map<String, Value>) -> Filter {
        let sort_by = self.sort.sanitize(raw.get("sort_by").and_then(Value::as_str));

        let mut filter = Filter::new(
            string_list(raw.get("categories")),
            string_list(raw.get("keywords")),
            number(raw.get("price_min")),
            number(raw.get("price_max")),
            number(raw.get("rating_min")),
            sort_by,
        );
        filter.categories = self.categories.normalize(filter.categories.as_slice());
        filter
    }
}

/// Parse model text into a JSON object.
///
/// Tries the whole text first, then the first balanced `{...}` block in it.
pub fn parse_model_output(text: &str) -> InferenceResult<Map<String, Value>> {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(text) {
        return Ok(map);
    }

    let candidate = extract_json_object(text)
        .ok_or_else(|| InferenceError::Parse("no JSON object found".into()))?;

    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => {
            tracing::debug!("recovered JSON object embedded in model output");
            Ok(map)
        }
        Ok(_) => Err(InferenceError::Parse("embedded JSON is not an object".into())),
        Err(e) => Err(InferenceError::Parse(e.to_string())),
    }
}

/// Find the first top-level balanced `{...}` substring.
///
/// Braces inside JSON string literals are ignored.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Read a list of strings; a lone string becomes a one-element list.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// Read a number, accepting numeric strings such as `"$49.99"`.
fn number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_start_matches('$').trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockCompletion;
    use sq_protocol::SortKey;

    fn resolver(reply: &str) -> (IntentResolver, Arc<MockCompletion>) {
        let mock = Arc::new(MockCompletion::replying(reply));
        let options = crate::config::OllamaConfig::default().completion_options();
        (IntentResolver::new(mock.clone(), options), mock)
    }

    // ── prompt ───────────────────────────────────────────────────

    #[test]
    fn prompt_embeds_query_and_schema() {
        let prompt = build_prompt("cheap rings");
        assert!(prompt.contains("User query: \"\"\"cheap rings\"\"\""));
        assert!(prompt.contains("\"sort_by\""));
        assert!(prompt.ends_with("Return JSON now:"));
    }

    // ── extract_json_object ──────────────────────────────────────

    #[test]
    fn extract_from_surrounding_prose() {
        let text = "Sure! Here you go: {\"categories\": [\"electronics\"]} Hope that helps.";
        assert_eq!(extract_json_object(text), Some("{\"categories\": [\"electronics\"]}"));
    }

    #[test]
    fn extract_stops_at_first_balanced_object() {
        let text = "{\"a\": {\"b\": 1}} trailing {\"c\": 2}";
        assert_eq!(extract_json_object(text), Some("{\"a\": {\"b\": 1}}"));
    }

    #[test]
    fn extract_ignores_braces_in_strings() {
        let text = "x {\"keywords\": [\"}{\", \"a\\\"}\"]} y";
        assert_eq!(extract_json_object(text), Some("{\"keywords\": [\"}{\", \"a\\\"}\"]}"));
    }

    #[test]
    fn extract_unbalanced_or_missing() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("{\"open\": true"), None);
    }

    // ── parse_model_output ───────────────────────────────────────

    #[test]
    fn parse_direct_json() {
        let map = parse_model_output(r#"{"sort_by": "price_asc"}"#).unwrap();
        assert_eq!(map["sort_by"], "price_asc");
    }

    #[test]
    fn parse_markdown_fenced_json() {
        let map = parse_model_output("```json\n{\"keywords\": [\"ring\"]}\n```").unwrap();
        assert_eq!(map["keywords"][0], "ring");
    }

    #[test]
    fn parse_rejects_non_json() {
        let err = parse_model_output("I cannot help with that.").unwrap_err();
        assert!(matches!(err, InferenceError::Parse(_)));
    }

    #[test]
    fn parse_rejects_broken_embedded_object() {
        let err = parse_model_output("result: {categories: electronics}").unwrap_err();
        assert!(matches!(err, InferenceError::Parse(_)));
    }

    #[test]
    fn parse_rejects_empty_text() {
        assert!(parse_model_output("").is_err());
    }

    // ── filter_from_raw ──────────────────────────────────────────

    #[test]
    fn raw_fields_are_sanitized() {
        let (resolver, _) = resolver("{}");
        let raw = parse_model_output(
            r#"{
                "categories": ["Women", "shoes", "jewelry"],
                "keywords": ["Cotton", " "],
                "price_min": "$20",
                "price_max": 50,
                "rating_min": 9,
                "sort_by": "best rated first"
            }"#,
        )
        .unwrap();
        let f = resolver.filter_from_raw(&raw);
        assert_eq!(f.categories, vec!["jewelery", "women's clothing"]);
        assert_eq!(f.keywords, vec!["cotton"]);
        assert_eq!(f.price_min, Some(20.0));
        assert_eq!(f.price_max, Some(50.0));
        assert_eq!(f.rating_min, Some(5.0));
        assert_eq!(f.sort_by, SortKey::RatingDesc);
    }

    #[test]
    fn wrong_types_become_empty() {
        let (resolver, _) = resolver("{}");
        let raw = parse_model_output(
            r#"{"categories": "electronics", "keywords": 7, "price_min": true,
                "price_max": "cheap", "rating_min": null, "sort_by": 3}"#,
        )
        .unwrap();
        let f = resolver.filter_from_raw(&raw);
        assert_eq!(f.categories, vec!["electronics"]);
        assert!(f.keywords.is_empty());
        assert!(f.price_min.is_none());
        assert!(f.price_max.is_none());
        assert!(f.rating_min.is_none());
        assert_eq!(f.sort_by, SortKey::Relevance);
    }

    // ── resolve ──────────────────────────────────────────────────

    #[tokio::test]
    async fn resolve_sends_prompt_with_options() {
        let (resolver, mock) = resolver(
            r#"{"categories":["electronics"],"keywords":[],"price_min":null,"price_max":100,"rating_min":null,"sort_by":"relevance"}"#,
        );
        let f = resolver.resolve("electronics under $100").await.unwrap();
        assert_eq!(f.categories, vec!["electronics"]);
        assert_eq!(f.price_max, Some(100.0));

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].0.contains("electronics under $100"));
        assert!(calls[0].1.json_format);
    }

    #[tokio::test]
    async fn resolve_propagates_upstream_errors() {
        let mock = Arc::new(MockCompletion::failing(InferenceError::Status {
            status: 500,
            body: "out of memory".into(),
        }));
        let resolver = IntentResolver::new(mock, crate::config::OllamaConfig::default().completion_options());
        let err = resolver.resolve("rings").await.unwrap_err();
        assert!(matches!(err, InferenceError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn resolve_reports_non_json() {
        let (resolver, _) = resolver("Sorry, I don't know.");
        let err = resolver.resolve("rings").await.unwrap_err();
        assert!(matches!(err, InferenceError::Parse(_)));
    }

    #[tokio::test]
    async fn resolve_with_custom_vocabulary() {
        let (resolver, _) = resolver(r#"{"categories": ["novels", "electronics"]}"#);
        let resolver = resolver.with_categories(CategoryNormalizer::new(
            sq_filters::CategoryVocabulary::new(["books"]).with_synonym("novels", Some("books")),
        ));
        let f = resolver.resolve("novels").await.unwrap();
        assert_eq!(f.categories, vec!["books"]);
    }

    #[tokio::test]
    async fn resolve_with_custom_sort_heuristics() {
        let (resolver, _) = resolver(r#"{"sort_by": "bargains first"}"#);
        let resolver = resolver.with_sort(SortSanitizer::new(
            sq_filters::SortHeuristics::empty().with_rule(&["bargain"], SortKey::PriceAsc),
        ));
        let f = resolver.resolve("bargains").await.unwrap();
        assert_eq!(f.sort_by, SortKey::PriceAsc);
    }
}

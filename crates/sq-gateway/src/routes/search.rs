//! Natural-language search endpoint.

use axum::Json;
use axum::extract::State;
use tracing::Instrument;
use uuid::Uuid;

use sq_filters::{apply_filter, reconcile_prices};
use sq_protocol::{SearchRequest, SearchResponse};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// POST /nlp-search — resolve a shopping query into filters and run it.
///
/// The model call and the catalog fetch run concurrently; an empty query is
/// rejected before either starts. If both fail, the model error is reported.
pub async fn nlp_search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> ApiResult<Json<SearchResponse>> {
    let query = req.query.trim();
    if query.is_empty() {
        return Err(ApiError::BadRequest("missing query".into()));
    }

    let span = tracing::info_span!("nlp_search", search_id = %Uuid::now_v7());
    async move {
        let (resolved, fetched) = tokio::join!(
            state.resolver.resolve(query),
            state.catalog.fetch_products(),
        );
        // Model errors take precedence so a double failure always reports the same status.
        let filter = resolved?;
        let products = fetched?;

        let filter = reconcile_prices(filter, query);
        let catalog_size = products.len();
        let results = apply_filter(products, &filter);

        tracing::info!(
            query = %query,
            catalog_size,
            count = results.len(),
            sort_by = %filter.sort_by,
            "search completed"
        );

        Ok::<_, ApiError>(Json(SearchResponse::new(filter, results)))
    }
    .instrument(span)
    .await
}

//! POST /query — answers a question grounded in the book corpus.

use std::sync::Arc;

use axum::{Json, extract::State};
use qa_engine::QaAnswer;
use tracing::debug;

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    routes::query::query_request::{QueryRequest, QueryResponse},
};

/// Handler: POST /query
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/query \
///   -H 'content-type: application/json' \
///   -d '{"question":"What does the author say about fairness?"}'
/// ```
pub async fn query_route(
    State(state): State<Arc<AppState>>,
    Json(body): Json<QueryRequest>,
) -> AppResult<Json<QueryResponse>> {
    debug!(question_len = body.question.len(), "query_route: start");

    let QaAnswer { answer, context } = state.engine.answer(&body.question).await?;

    debug!(context_chunks = context.len(), "query_route: success");
    Ok(Json(QueryResponse { answer, context }))
}

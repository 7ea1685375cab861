use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{EnrichedDetail, MovieId},
    routes::AppState,
};

const NO_RESULTS_MESSAGE: &str = "No recommendations found. Try another movie.";

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub title: String,
    #[serde(default)]
    pub k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationItem {
    pub rank: usize,
    pub position: usize,
    pub movie_id: MovieId,
    pub score: f64,
    pub details: EnrichedDetail,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub title: String,
    pub recommendations: Vec<RecommendationItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Handler for the recommendations endpoint
///
/// Ranking completes before any metadata is fetched; an unknown title yields
/// an empty list rather than an error.
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    if params.title.trim().is_empty() {
        return Err(AppError::InvalidInput("title cannot be empty".to_string()));
    }

    let k = params.k.unwrap_or(state.default_recommendations);
    if k == 0 || k > state.max_recommendations {
        return Err(AppError::InvalidInput(format!(
            "k must be between 1 and {}",
            state.max_recommendations
        )));
    }

    let ranked = state.engine.recommend(&params.title, k);

    tracing::info!(
        request_id = %request_id,
        title = %params.title,
        k,
        found = ranked.len(),
        "Ranked recommendations"
    );

    if ranked.is_empty() {
        return Ok(Json(RecommendationResponse {
            title: params.title,
            recommendations: Vec::new(),
            message: Some(NO_RESULTS_MESSAGE.to_string()),
        }));
    }

    let ids: Vec<MovieId> = ranked.iter().map(|r| r.movie.id).collect();
    let outcomes = state.enricher.enrich_all(&ids).await;

    let failed = outcomes.iter().filter(|o| o.error.is_some()).count();
    if failed > 0 {
        tracing::warn!(
            request_id = %request_id,
            failed,
            total = outcomes.len(),
            "Some recommendations were returned with placeholder details"
        );
    }

    let recommendations = ranked
        .iter()
        .zip(outcomes)
        .map(|(ranked, outcome)| RecommendationItem {
            rank: ranked.rank,
            position: ranked.movie.position,
            movie_id: ranked.movie.id,
            score: ranked.score,
            details: outcome.detail,
            error: outcome.error,
        })
        .collect();

    Ok(Json(RecommendationResponse {
        title: params.title,
        recommendations,
        message: None,
    }))
}

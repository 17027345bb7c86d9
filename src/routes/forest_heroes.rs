use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::extractors::QueryParams;
use crate::response::AppError;
use crate::state::AppState;
use crate::store::query::TreeFilter;
use crate::validation::parse_limit;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_hero_trees))
}

#[derive(Debug, Default, Deserialize)]
pub struct HeroTreesQuery {
    pub area: Option<String>,
    #[serde(rename = "type")]
    pub tree_type: Option<String>,
    pub limit: Option<String>,
    pub after_id: Option<i64>,
}

/// Keyset page over every tree owned by a subscriber.
async fn list_hero_trees(
    State(state): State<AppState>,
    QueryParams(q): QueryParams<HeroTreesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = parse_limit(q.limit.as_deref())
        .map_err(|msg| AppError::bad_request("INVALID_QUERY", &msg))?;
    let filter = TreeFilter {
        subscribers_only: true,
        area: q.area,
        tree_type: q.tree_type,
        after_id: q.after_id,
        limit,
        ..TreeFilter::default()
    };
    let page = state.store().query_trees(&filter, state.pagination())?;
    Ok(Json(page))
}

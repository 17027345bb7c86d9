use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::constants::MAX_CODES_PER_LOOKUP;
use crate::extractors::QueryParams;
use crate::model::RowsBody;
use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::store::query::TreeFilter;
use crate::validation::{parse_code_list, parse_limit};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_owner_page))
        .route("/all", get(list_owner_trees))
        .route("/by-codes", get(trees_by_codes))
        .route("/:id", get(get_tree))
}

/// Query string shared by the owner endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct OwnerTreesQuery {
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub area: Option<String>,
    #[serde(rename = "type")]
    pub tree_type: Option<String>,
    pub code: Option<String>,
    pub limit: Option<String>,
    pub after_id: Option<i64>,
}

impl OwnerTreesQuery {
    fn into_filter(self) -> Result<TreeFilter, AppError> {
        let limit = parse_limit(self.limit.as_deref())
            .map_err(|msg| AppError::bad_request("INVALID_QUERY", &msg))?;
        let filter = TreeFilter {
            subscribers_only: false,
            area: self.area,
            tree_type: self.tree_type,
            user_id: self.user_id,
            email: self.email,
            code: self.code,
            codes: Vec::new(),
            after_id: self.after_id,
            limit,
        };
        // An owner lookup without a usable identity would list every tree.
        if !filter.has_identity() {
            return Err(AppError::bad_request(
                "MISSING_IDENTITY",
                "missing email or user_id",
            ));
        }
        Ok(filter)
    }
}

async fn list_owner_page(
    State(state): State<AppState>,
    QueryParams(q): QueryParams<OwnerTreesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = q.into_filter()?;
    let page = state.store().query_trees(&filter, state.pagination())?;
    Ok(Json(page))
}

async fn list_owner_trees(
    State(state): State<AppState>,
    QueryParams(q): QueryParams<OwnerTreesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = q.into_filter()?;
    let rows = state.store().list_trees(&filter, state.pagination())?;
    Ok(Json(RowsBody { rows }))
}

#[derive(Debug, Default, Deserialize)]
pub struct CodesQuery {
    pub codes: Option<String>,
}

async fn trees_by_codes(
    State(state): State<AppState>,
    QueryParams(q): QueryParams<CodesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let codes = parse_code_list(q.codes.as_deref().unwrap_or(""));
    if codes.is_empty() {
        return Err(AppError::bad_request(
            "MISSING_CODES",
            "parameter 'codes' is required",
        ));
    }
    if codes.len() > MAX_CODES_PER_LOOKUP {
        return Err(AppError::bad_request(
            "TOO_MANY_CODES",
            &format!("at most {MAX_CODES_PER_LOOKUP} codes per request"),
        ));
    }

    let filter = TreeFilter {
        codes,
        ..TreeFilter::default()
    };
    let rows = state.store().list_trees(&filter, state.pagination())?;
    Ok(Json(RowsBody { rows }))
}

async fn get_tree(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    match state.store().get_tree(id)? {
        Some(tree) => Ok(ok(tree)),
        None => Err(AppError::not_found("tree not found")),
    }
}

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use spaces_core::CategoryConfig;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

pub(super) async fn list_categories(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<CategoryConfig>>> {
    let categories = state.catalog.all().to_vec();
    let total = categories.len();
    Json(ApiResponse::ok(categories, req_id.0).with_total(total))
}

pub(super) async fn get_category(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(category): Path<String>,
) -> Result<Json<ApiResponse<CategoryConfig>>, ApiError> {
    let Some(config) = state.catalog.get(&category) else {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("category '{category}' not found"),
        ));
    };
    Ok(Json(ApiResponse::ok(config.clone(), req_id.0)))
}

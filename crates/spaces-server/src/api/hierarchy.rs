use axum::{extract::State, Extension, Json};
use spaces_core::CountryNode;

use crate::middleware::RequestId;

use super::{ApiResponse, AppState};

pub(super) async fn get_hierarchy(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<CountryNode>>> {
    Json(ApiResponse::ok(state.store.hierarchy().to_vec(), req_id.0))
}

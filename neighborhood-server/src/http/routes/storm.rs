//! Storm endpoint

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};

use super::trees::require_house;
use crate::db::ErrorKind;
use crate::http::error::ApiError;
use crate::http::extractors::HouseId;
use crate::http::server::AppState;
use crate::models::Tree;

/// POST /storm/{houseID} - fell a random tree, then report the yard
async fn send_storm(
    State(state): State<Arc<AppState>>,
    HouseId(house_id): HouseId,
) -> Result<Json<Vec<Tree>>, ApiError> {
    require_house(&state.gateway, house_id).await?;

    let felled = match state.gateway.fell_random_tree(house_id).await {
        Ok(tree_id) => tree_id,
        Err(err) if err.kind() == ErrorKind::NoTreesAtHouse => {
            return Err(ApiError::bad_request(err.to_string()))
        }
        Err(err) => return Err(ApiError::server("server error sending storm")(err)),
    };
    tracing::info!(house_id, tree_id = felled, "storm felled tree");

    // Separate read: a report of the yard, not part of the transaction.
    let trees = state
        .gateway
        .list_trees_for_house(house_id)
        .await
        .map_err(ApiError::server("server error getting trees post-storm"))?;

    Ok(Json(trees))
}

/// Storm routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/storm/{id}", post(send_storm))
}

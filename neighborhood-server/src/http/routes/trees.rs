//! Tree endpoints
//!
//! `/trees/{id}` is a house ID for GET and POST and a tree ID for DELETE.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use crate::db::{ErrorKind, Gateway};
use crate::http::error::ApiError;
use crate::http::extractors::{DeferredJson, HouseId, TreeId};
use crate::http::server::AppState;
use crate::models::{NewTree, PlantTreeRequest, Tree};

/// 404 unless the house exists.
pub(crate) async fn require_house(gateway: &Gateway, house_id: i32) -> Result<(), ApiError> {
    let exists = gateway
        .house_exists(house_id)
        .await
        .map_err(ApiError::server("server error getting House"))?;

    if !exists {
        return Err(ApiError::not_found(format!(
            "no House exists with ID {}",
            house_id
        )));
    }
    Ok(())
}

/// GET /trees/{houseID} - trees growing at a house
async fn list_trees(
    State(state): State<Arc<AppState>>,
    HouseId(house_id): HouseId,
) -> Result<Json<Vec<Tree>>, ApiError> {
    require_house(&state.gateway, house_id).await?;

    let trees = state
        .gateway
        .list_trees_for_house(house_id)
        .await
        .map_err(ApiError::server("server error getting Trees"))?;

    if trees.is_empty() {
        return Err(ApiError::not_found(format!(
            "no trees growing at house {}",
            house_id
        )));
    }

    Ok(Json(trees))
}

/// POST /trees/{houseID} - plant a tree
///
/// The house is checked before the body is decoded, so a bad body sent to
/// a missing house is a 404.
async fn plant_tree(
    State(state): State<Arc<AppState>>,
    HouseId(house_id): HouseId,
    body: DeferredJson,
) -> Result<Json<Tree>, ApiError> {
    require_house(&state.gateway, house_id).await?;

    let req: PlantTreeRequest = body.decode()?;
    let tree = NewTree::new(&req)?;

    let id = match state.gateway.add_tree(&tree, house_id).await {
        Ok(id) => id,
        Err(err) => {
            return Err(match err.kind() {
                ErrorKind::DuplicateTree => ApiError::bad_request(err.to_string()),
                ErrorKind::NoSuchRecord => ApiError::not_found(format!(
                    "no House exists with ID {}",
                    house_id
                )),
                _ => ApiError::server("server error adding Tree")(err),
            })
        }
    };

    Ok(Json(Tree {
        id,
        house_id,
        species: tree.species,
        x: tree.x.get(),
        y: tree.y.get(),
        relative_location: tree.relative_location,
        fallen: false,
    }))
}

/// DELETE /trees/{treeID} - clear away a fallen tree
async fn remove_tree(
    State(state): State<Arc<AppState>>,
    TreeId(tree_id): TreeId,
) -> Result<StatusCode, ApiError> {
    let fallen = match state.gateway.is_tree_fallen(tree_id).await {
        Ok(fallen) => fallen,
        Err(err) if err.kind() == ErrorKind::NoSuchRecord => {
            return Err(ApiError::not_found(format!(
                "no Tree found with ID {}",
                tree_id
            )))
        }
        Err(err) => return Err(ApiError::server("server error getting Tree")(err)),
    };

    if !fallen {
        return Err(ApiError::bad_request("call us back when the Tree falls"));
    }

    state
        .gateway
        .remove_tree(tree_id)
        .await
        .map_err(ApiError::server("server error removing Tree"))?;

    Ok(StatusCode::OK)
}

/// Tree routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/trees/{id}",
        get(list_trees).post(plant_tree).delete(remove_tree),
    )
}

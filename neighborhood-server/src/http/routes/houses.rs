//! House endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::http::error::ApiError;
use crate::http::extractors::JsonBody;
use crate::http::server::AppState;
use crate::models::{AddHouseRequest, House, NewHouse};

/// GET /houses - every house in the neighborhood
async fn list_houses(State(state): State<Arc<AppState>>) -> Result<Json<Vec<House>>, ApiError> {
    let houses = state
        .gateway
        .list_houses()
        .await
        .map_err(ApiError::server("server error getting houses"))?;

    if houses.is_empty() {
        return Err(ApiError::not_found("no houses in the neighborhood"));
    }

    Ok(Json(houses))
}

/// POST /houses - build a new house
async fn add_house(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<AddHouseRequest>,
) -> Result<Json<House>, ApiError> {
    let house = NewHouse::new(&req)?;

    let id = state
        .gateway
        .add_house(&house)
        .await
        .map_err(ApiError::server("server error adding House"))?;

    Ok(Json(House {
        id,
        address_one: house.address_one,
        address_two: house.address_two,
        city: house.city,
        state: house.state,
        zip: house.zip,
    }))
}

/// House routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/houses", get(list_houses).post(add_house))
}

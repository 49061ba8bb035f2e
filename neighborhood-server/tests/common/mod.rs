//! Shared setup for database-backed tests
//!
//! Run with: DATABASE_URL=postgres://... cargo test -p neighborhood-server -- --ignored

#![allow(dead_code)]

use neighborhood_server::db::schema;
use neighborhood_server::models::{AddHouseRequest, NewHouse, NewTree, PlantTreeRequest};
use neighborhood_server::Gateway;
use sqlx::PgPool;

pub async fn gateway() -> Gateway {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let pool = PgPool::connect(&url).await.expect("pool creation failed");
    schema::apply(&pool).await.expect("schema apply failed");
    Gateway::new(pool).await.expect("statements failed to prepare")
}

pub fn new_house(street: &str) -> NewHouse {
    NewHouse::new(&AddHouseRequest {
        address_one: street.into(),
        address_two: None,
        city: "Springfield".into(),
        state: "OR".into(),
        zip: "97477".into(),
    })
    .unwrap()
}

pub fn new_tree(species: &str, x: i64, y: i64) -> NewTree {
    NewTree::new(&PlantTreeRequest {
        species: species.into(),
        x,
        y,
        relative_location: None,
    })
    .unwrap()
}

/// A fresh house, so tests never share rows.
pub async fn fresh_house(gateway: &Gateway) -> i32 {
    gateway
        .add_house(&new_house("1 Test Lane"))
        .await
        .expect("add house")
}

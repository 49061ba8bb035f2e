//! House records and creation input

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::{optional, required};
use super::ValidationError;

/// A dwelling place at an address.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct House {
    pub id: i32,
    pub address_one: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_two: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// House creation request body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddHouseRequest {
    #[serde(default)]
    pub address_one: String,
    #[serde(default)]
    pub address_two: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
}

/// Validated house, ready to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHouse {
    pub address_one: String,
    pub address_two: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl NewHouse {
    pub fn new(req: &AddHouseRequest) -> Result<Self, ValidationError> {
        Ok(Self {
            address_one: required("address one", &req.address_one)?,
            address_two: optional(req.address_two.as_deref()),
            city: required("city", &req.city)?,
            state: required("state", &req.state)?,
            zip: required("zip", &req.zip)?,
        })
    }
}

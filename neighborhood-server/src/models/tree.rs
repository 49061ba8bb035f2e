//! Tree records and planting input

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::{optional, required};
use super::ValidationError;

/// Smallest valid grid coordinate
pub const GRID_MIN: i32 = 1;

/// Largest valid grid coordinate
pub const GRID_MAX: i32 = 255;

/// A tree growing (or lying) on a house's yard grid.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tree {
    pub id: i32,
    pub house_id: i32,
    pub species: String,
    #[sqlx(rename = "x_coord")]
    pub x: i32,
    #[sqlx(rename = "y_coord")]
    pub y: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_location: Option<String>,
    pub fallen: bool,
}

/// Validated coordinate on the yard grid (1-255 inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCoord(i32);

impl GridCoord {
    /// Validate a raw coordinate for the named axis.
    pub fn new(field: &'static str, value: i64) -> Result<Self, ValidationError> {
        if value < i64::from(GRID_MIN) || value > i64::from(GRID_MAX) {
            return Err(ValidationError::OutOfRange {
                field,
                min: GRID_MIN,
                max: GRID_MAX,
            });
        }
        Ok(Self(value as i32))
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

/// Tree planting request body.
///
/// Fields default when missing so the validator, not the decoder, reports
/// which one is wrong.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantTreeRequest {
    #[serde(default)]
    pub species: String,
    #[serde(default)]
    pub x: i64,
    #[serde(default)]
    pub y: i64,
    #[serde(default)]
    pub relative_location: Option<String>,
}

/// Validated tree, ready to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTree {
    pub species: String,
    pub x: GridCoord,
    pub y: GridCoord,
    pub relative_location: Option<String>,
}

impl NewTree {
    /// Validate a planting request.
    ///
    /// # Rules
    /// - Species not blank (stored as sent)
    /// - x and y within 1-255
    /// - Empty relative location is stored as absent
    pub fn new(req: &PlantTreeRequest) -> Result<Self, ValidationError> {
        Ok(Self {
            species: required("species", &req.species)?,
            x: GridCoord::new("an x coordinate", req.x)?,
            y: GridCoord::new("a y coordinate", req.y)?,
            relative_location: optional(req.relative_location.as_deref()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(species: &str, x: i64, y: i64) -> PlantTreeRequest {
        PlantTreeRequest {
            species: species.into(),
            x,
            y,
            relative_location: None,
        }
    }

    #[test]
    fn valid_tree() {
        let tree = NewTree::new(&request("oak", 10, 20)).unwrap();
        assert_eq!(tree.species, "oak");
        assert_eq!(tree.x.get(), 10);
        assert_eq!(tree.y.get(), 20);
        assert_eq!(tree.relative_location, None);
    }

    #[test]
    fn text_fields_stored_as_sent() {
        let mut req = request(" oak ", 10, 20);
        req.relative_location = Some("   ".into());
        let tree = NewTree::new(&req).unwrap();
        assert_eq!(tree.species, " oak ");
        assert_eq!(tree.relative_location.as_deref(), Some("   "));

        req.relative_location = Some(String::new());
        assert_eq!(NewTree::new(&req).unwrap().relative_location, None);
    }

    #[test]
    fn grid_bounds_are_inclusive() {
        assert!(NewTree::new(&request("elm", 1, 1)).is_ok());
        assert!(NewTree::new(&request("elm", 255, 255)).is_ok());
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        for (x, y) in [(0, 5), (256, 5), (-3, 5), (5, 0), (5, 256), (5, i64::MAX)] {
            let err = NewTree::new(&request("elm", x, y)).unwrap_err();
            assert!(matches!(err, ValidationError::OutOfRange { min: 1, max: 255, .. }));
        }
    }

    #[test]
    fn rejects_missing_species() {
        let err = NewTree::new(&request("  ", 5, 5)).unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "species" });
    }

    #[test]
    fn missing_fields_default_to_invalid() {
        let req: PlantTreeRequest = serde_json::from_str(r#"{"species":"oak"}"#).unwrap();
        let err = NewTree::new(&req).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { field: "an x coordinate", .. }));
    }

    #[test]
    fn tree_json_shape() {
        let tree = Tree {
            id: 7,
            house_id: 3,
            species: "oak".into(),
            x: 10,
            y: 20,
            relative_location: None,
            fallen: false,
        };
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "houseId": 3,
                "species": "oak",
                "x": 10,
                "y": 20,
                "fallen": false
            })
        );
    }
}

//! Persistence gateway for houses and trees
//!
//! Owns the pool and every statement the service runs. Callers get entity
//! types and [`GatewayError`] back, never raw rows.
//!
//! - Fixed statement set, prepared once at construction
//! - Uniqueness of (house, x, y) is left to the database constraint
//! - The storm runs as a single transaction

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use sqlx::{Executor, PgPool};

use super::error::{is_foreign_key_violation, is_unique_violation, GatewayError};
use crate::models::{House, NewHouse, NewTree, Tree};

/// Every statement the gateway can run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    ListHouses,
    HouseExists,
    ListTreesForHouse,
    AddHouse,
    AddTree,
    TreeIdsForHouse,
    FellTree,
    TreeFallen,
    RemoveTree,
}

impl Query {
    pub const ALL: [Query; 9] = [
        Query::ListHouses,
        Query::HouseExists,
        Query::ListTreesForHouse,
        Query::AddHouse,
        Query::AddTree,
        Query::TreeIdsForHouse,
        Query::FellTree,
        Query::TreeFallen,
        Query::RemoveTree,
    ];

    pub fn sql(self) -> &'static str {
        match self {
            Query::ListHouses => {
                r#"
                SELECT h.id, h.address_one, h.address_two, h.city, h.state, h.zip
                FROM house h
                ORDER BY h.id ASC
                "#
            }
            Query::HouseExists => "SELECT EXISTS(SELECT 1 FROM house WHERE id = $1)",
            Query::ListTreesForHouse => {
                r#"
                SELECT t.id, t.house_id, t.species, t.x_coord, t.y_coord,
                       t.relative_location, t.fallen
                FROM tree t
                WHERE t.house_id = $1
                ORDER BY t.id ASC
                "#
            }
            Query::AddHouse => {
                r#"
                INSERT INTO house (address_one, address_two, city, state, zip)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id
                "#
            }
            Query::AddTree => {
                r#"
                INSERT INTO tree (house_id, species, x_coord, y_coord, relative_location)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id
                "#
            }
            // Row locks keep a concurrent delete from landing between the
            // candidate read and the update.
            Query::TreeIdsForHouse => {
                r#"
                SELECT t.id
                FROM tree t
                WHERE t.house_id = $1
                ORDER BY t.id ASC
                FOR UPDATE
                "#
            }
            Query::FellTree => "UPDATE tree SET fallen = TRUE WHERE id = $1 AND house_id = $2",
            Query::TreeFallen => "SELECT fallen FROM tree WHERE id = $1",
            Query::RemoveTree => "DELETE FROM tree WHERE id = $1",
        }
    }
}

/// Pick one candidate with equal probability across the whole slice.
///
/// `None` only for an empty slice; a single candidate is always chosen.
pub fn pick_uniform<R: Rng + ?Sized>(candidates: &[i32], rng: &mut R) -> Option<i32> {
    candidates.choose(rng).copied()
}

/// Entity-level access to the relational store.
///
/// Cheap to clone; all clones share one pool.
#[derive(Clone)]
pub struct Gateway {
    pool: PgPool,
}

impl Gateway {
    /// Wrap a pool, preparing every statement once so bad SQL or a missing
    /// schema fails here instead of on the first request.
    ///
    /// The pool is closed when preparation fails.
    pub async fn new(pool: PgPool) -> Result<Self, GatewayError> {
        for query in Query::ALL {
            if let Err(err) = pool.prepare(query.sql()).await {
                pool.close().await;
                return Err(err.into());
            }
        }
        Ok(Self::new_unchecked(pool))
    }

    /// Wrap a pool without preparing anything.
    pub fn new_unchecked(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// All houses, ascending by ID. Empty is not an error.
    pub async fn list_houses(&self) -> Result<Vec<House>, GatewayError> {
        let houses = sqlx::query_as::<_, House>(Query::ListHouses.sql())
            .fetch_all(&self.pool)
            .await?;
        Ok(houses)
    }

    pub async fn house_exists(&self, house_id: i32) -> Result<bool, GatewayError> {
        let exists: bool = sqlx::query_scalar(Query::HouseExists.sql())
            .bind(house_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Trees at a house, ascending by ID. Empty is not an error.
    pub async fn list_trees_for_house(&self, house_id: i32) -> Result<Vec<Tree>, GatewayError> {
        let trees = sqlx::query_as::<_, Tree>(Query::ListTreesForHouse.sql())
            .bind(house_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(trees)
    }

    /// Insert a house and return its generated ID.
    pub async fn add_house(&self, house: &NewHouse) -> Result<i32, GatewayError> {
        let id: i32 = sqlx::query_scalar(Query::AddHouse.sql())
            .bind(&house.address_one)
            .bind(house.address_two.as_deref())
            .bind(&house.city)
            .bind(&house.state)
            .bind(&house.zip)
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    /// Plant a tree and return its generated ID.
    ///
    /// A second tree at the same (house, x, y) is reported as
    /// [`GatewayError::DuplicateTree`].
    pub async fn add_tree(&self, tree: &NewTree, house_id: i32) -> Result<i32, GatewayError> {
        let result = sqlx::query_scalar::<_, i32>(Query::AddTree.sql())
            .bind(house_id)
            .bind(&tree.species)
            .bind(tree.x.get())
            .bind(tree.y.get())
            .bind(tree.relative_location.as_deref())
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(id) => Ok(id),
            Err(err) if is_unique_violation(&err) => Err(GatewayError::DuplicateTree {
                house_id,
                x: tree.x.get(),
                y: tree.y.get(),
            }),
            Err(err) if is_foreign_key_violation(&err) => Err(GatewayError::NoSuchRecord {
                resource: "house",
                id: house_id,
            }),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn is_tree_fallen(&self, tree_id: i32) -> Result<bool, GatewayError> {
        sqlx::query_scalar::<_, bool>(Query::TreeFallen.sql())
            .bind(tree_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(GatewayError::NoSuchRecord {
                resource: "tree",
                id: tree_id,
            })
    }

    /// Delete a tree. Deleting nothing is a failure.
    pub async fn remove_tree(&self, tree_id: i32) -> Result<(), GatewayError> {
        let result = sqlx::query(Query::RemoveTree.sql())
            .bind(tree_id)
            .execute(&self.pool)
            .await?;

        expect_one_row("DELETE tree", result.rows_affected())
    }

    /// Fell one tree at the house, chosen uniformly at random, and return
    /// its ID.
    pub async fn fell_random_tree(&self, house_id: i32) -> Result<i32, GatewayError> {
        let mut rng = rand::rngs::StdRng::from_entropy();
        self.fell_random_tree_with(house_id, &mut rng).await
    }

    /// [`Gateway::fell_random_tree`] with a caller-supplied RNG.
    ///
    /// Read, pick, and update share one transaction. Any failure after
    /// `BEGIN` rolls back; dropping the transaction on an early `?` does the
    /// same.
    pub async fn fell_random_tree_with<R: Rng + Send + ?Sized>(
        &self,
        house_id: i32,
        rng: &mut R,
    ) -> Result<i32, GatewayError> {
        let mut tx = self.pool.begin().await?;

        let candidates: Vec<i32> = sqlx::query_scalar(Query::TreeIdsForHouse.sql())
            .bind(house_id)
            .fetch_all(&mut *tx)
            .await?;

        let Some(tree_id) = pick_uniform(&candidates, rng) else {
            tx.rollback().await?;
            return Err(GatewayError::NoTreesAtHouse { house_id });
        };

        let result = sqlx::query(Query::FellTree.sql())
            .bind(tree_id)
            .bind(house_id)
            .execute(&mut *tx)
            .await?;

        if let Err(err) = expect_one_row("UPDATE tree SET fallen", result.rows_affected()) {
            tx.rollback().await?;
            return Err(err);
        }

        tx.commit().await?;
        Ok(tree_id)
    }

    /// Close the pool, releasing connections and their prepared statements.
    ///
    /// Safe to call more than once; only the first call does anything.
    pub async fn close(&self) {
        if self.pool.is_closed() {
            return;
        }
        tracing::info!("gateway: closing database pool");
        self.pool.close().await;
        tracing::info!("gateway: database pool closed");
    }
}

fn expect_one_row(operation: &'static str, actual: u64) -> Result<(), GatewayError> {
    if actual == 1 {
        Ok(())
    } else {
        Err(GatewayError::UnexpectedRowCount {
            operation,
            expected: 1,
            actual,
        })
    }
}

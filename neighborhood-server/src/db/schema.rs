//! Table definitions for houses and trees
//!
//! Every statement is idempotent, so applying the schema to a database that
//! already has it is a no-op.

use sqlx::PgPool;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS house (
        id SERIAL PRIMARY KEY,
        address_one TEXT NOT NULL,
        address_two TEXT,
        city TEXT NOT NULL,
        state TEXT NOT NULL,
        zip TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tree (
        id SERIAL PRIMARY KEY,
        house_id INTEGER NOT NULL REFERENCES house(id) ON DELETE CASCADE,
        species TEXT NOT NULL,
        x_coord INTEGER NOT NULL CHECK (x_coord BETWEEN 1 AND 255),
        y_coord INTEGER NOT NULL CHECK (y_coord BETWEEN 1 AND 255),
        relative_location TEXT,
        fallen BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT tree_house_coords_key UNIQUE (house_id, x_coord, y_coord)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_tree_house_id ON tree(house_id)",
    r#"
    CREATE OR REPLACE FUNCTION touch_updated_at() RETURNS TRIGGER AS $$
    BEGIN
        NEW.updated_at = NOW();
        RETURN NEW;
    END;
    $$ LANGUAGE plpgsql
    "#,
    "DROP TRIGGER IF EXISTS house_touch_updated_at ON house",
    r#"
    CREATE TRIGGER house_touch_updated_at
        BEFORE UPDATE ON house
        FOR EACH ROW EXECUTE FUNCTION touch_updated_at()
    "#,
    "DROP TRIGGER IF EXISTS tree_touch_updated_at ON tree",
    r#"
    CREATE TRIGGER tree_touch_updated_at
        BEFORE UPDATE ON tree
        FOR EACH ROW EXECUTE FUNCTION touch_updated_at()
    "#,
];

/// Create the `house` and `tree` tables if they are missing.
///
/// Runs inside one transaction so a half-applied schema is never left behind.
pub async fn apply(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    for statement in STATEMENTS {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await
}

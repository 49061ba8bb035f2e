//! Route handlers organized by resource

pub mod health;
pub mod houses;
pub mod trees;
pub mod storm;

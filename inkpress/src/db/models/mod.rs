//! Database layer models.

pub mod posts;
pub mod users;

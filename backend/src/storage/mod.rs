//! Persistence layer: a shared SQLite connection pool plus per-entity
//! query modules implemented as blocks on [`db::DbConnection`].

pub mod classes;
pub mod db;
pub mod enrollments;
pub mod exercises;
pub mod guides;
pub mod members;

pub use db::DbConnection;

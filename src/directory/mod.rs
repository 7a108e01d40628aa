//! LLDAP directory queries and data models.

pub mod models;
pub mod users;

pub use models::UsersResult;

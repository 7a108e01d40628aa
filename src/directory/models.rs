//! Directory data models returned by the LLDAP GraphQL API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A directory user.
///
/// Only `id` is required; other fields are empty when the query does not select them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID (the login name).
    pub id: String,

    #[serde(default)]
    pub creation_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub display_name: String,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub last_name: String,

    /// Stable entry UUID.
    #[serde(default, alias = "entryuuid")]
    pub uuid: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub groups: Vec<GroupRef>,

    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl User {
    /// Comma-separated group names.
    pub fn group_names(&self) -> String {
        self.groups
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)?;
        if !self.display_name.is_empty() {
            write!(f, " ({})", self.display_name)?;
        }
        if !self.email.is_empty() {
            write!(f, " <{}>", self.email)?;
        }
        if let Some(created) = self.creation_date {
            write!(f, " created {}", created.format("%Y-%m-%d"))?;
        }
        write!(f, " groups=[{}]", self.group_names())
    }
}

/// Group membership reference nested under a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRef {
    pub id: i64,
    #[serde(rename = "displayName")]
    pub name: String,
}

/// Free-form user attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Result shape of the all-users query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsersResult {
    pub users: Vec<User>,
}

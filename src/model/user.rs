//! Application users managed from the dashboard.
//!
//! Distinct from the authenticated [`Principal`](crate::model::Principal): a `User` is a
//! business record with a role and department, and may not be able to sign in at all.

use crate::filter::Filterable;
use crate::framework::Record;
use crate::model::LocationId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

record_id! {
    /// Type-safe identifier for Users.
    UserId(i64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

impl UserStatus {
    pub fn label(self) -> &'static str {
        match self {
            UserStatus::Active => "Active",
            UserStatus::Inactive => "Inactive",
        }
    }
}

impl Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(alias = "username")]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default)]
    pub location_id: Option<LocationId>,
    /// Assigned location, embedded on fetch. Absent on rows returned by writes.
    #[serde(default, rename = "locations", skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationName>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The slice of a [`Location`](crate::model::Location) shown next to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationName {
    pub name: String,
}

impl User {
    pub fn location_name(&self) -> Option<&str> {
        self.location.as_ref().map(|l| l.name.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub role: String,
    pub department: String,
    pub status: UserStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<LocationId>,
}

impl UserDraft {
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role: role.into(),
            department: String::new(),
            status: UserStatus::Active,
            location_id: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<LocationId>,
}

impl Record for User {
    type Id = UserId;
    type Draft = UserDraft;
    type Patch = UserPatch;

    const TABLE: &'static str = "users";

    fn id(&self) -> &UserId {
        &self.id
    }

    fn embeds() -> &'static [&'static str] {
        &["locations(name)"]
    }

    fn keep_embedded(&mut self, previous: &Self) {
        if self.location.is_none() && self.location_id == previous.location_id {
            self.location = previous.location.clone();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserFacet {
    Role,
    Status,
}

impl Filterable for User {
    type Facet = UserFacet;

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str()]
    }

    fn facet(&self, facet: UserFacet) -> Option<&str> {
        match facet {
            UserFacet::Role => Some(self.role.as_str()),
            UserFacet::Status => Some(self.status.label()),
        }
    }
}

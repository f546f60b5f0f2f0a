//! Member model and related types

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::store::Record;

/// Member record as persisted in members.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Member {
    /// Email address, unique key
    pub email: String,
    pub name: String,
    pub phone: String,
}

impl Record for Member {
    const COLLECTION: &'static str = "members";

    fn key(&self) -> String {
        self.email.clone()
    }
}

/// Create member request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMember {
    pub email: String,
    pub name: String,
    pub phone: String,
}

/// Update member request (fields merge into the existing record)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateMember {
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// Member list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct MemberQuery {
    /// Substring match on name, email or phone
    pub search: Option<String>,
    /// Sort field: name or email
    pub sort: Option<String>,
}

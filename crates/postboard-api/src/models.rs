// Wire models for the posts and users endpoints
//
// Both endpoints answer with a bare JSON array. Users carry far more fields
// than the board needs; the well-known ones are typed and everything else
// lands in `extra` so nothing is lost on a round trip.

use serde::{Deserialize, Serialize};

/// A post as returned by `GET /posts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    pub body: String,
}

/// A user as returned by `GET /users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Address, company, and anything else the endpoint adds.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

//! Domain DTOs for the myrunes API.
//!
//! # Design
//! Request bodies and typed views over response bodies. The gateway itself
//! only deals in `serde_json::Value`; these types are what callers decode
//! into via `ApiResponse::json`. Field names match the server's JSON keys.
//! Snowflake ids travel as strings.
//!
//! These mirror the mock-server's schema but are defined independently.
//! Integration tests catch any drift between the two crates.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `login` and `register`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub remember: bool,
}

/// A rune page. Server-assigned fields are absent on pages that were never
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited: Option<DateTime<Utc>>,
    #[serde(default)]
    pub champions: Vec<String>,
    pub primary: PrimaryTree,
    pub secondary: SecondaryTree,
    pub perks: Perks,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PrimaryTree {
    pub tree: String,
    pub rows: [String; 4],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SecondaryTree {
    pub tree: String,
    pub rows: [String; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Perks {
    pub rows: [String; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub uid: String,
    pub username: String,
    #[serde(default)]
    pub mailaddress: String,
    pub displayname: String,
    pub lastlogin: DateTime<Utc>,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub favorites: Vec<String>,
    #[serde(default)]
    pub pageorder: Option<HashMap<String, Vec<String>>>,
    #[serde(default, rename = "hasoldpw")]
    pub has_old_password: bool,
}

/// Body of `update_user`. Empty strings leave the field unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct UserUpdate {
    pub username: String,
    pub displayname: String,
    pub newpassword: String,
    pub currpassword: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentPassword {
    pub currpassword: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Favorites {
    pub favorites: Vec<String>,
}

/// Body of `create_share`. A zero `maxaccesses` means unlimited.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateShare {
    pub maxaccesses: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,
    pub page: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Share {
    pub uid: String,
    pub ident: String,
    pub owner: String,
    pub page: String,
    pub created: DateTime<Utc>,
    pub maxaccesses: i64,
    pub expires: DateTime<Utc>,
    pub accesses: i64,
    pub lastaccess: DateTime<Utc>,
}

/// Response of `get_share`: the share plus the page and its owner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShareView {
    pub share: Share,
    pub page: Page,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageOrder {
    pub pageorder: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MailUpdate {
    pub mailaddress: String,
    pub reset: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PasswordReset {
    pub mailaddress: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PasswordResetConfirm {
    pub token: String,
    pub new_password: String,
    pub page_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiToken {
    pub userid: String,
    pub token: String,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Version {
    pub version: String,
    pub apiversion: String,
    pub release: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub key: String,
    pub uid: String,
}

/// `{n, data}` wrapper used by list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListResponse<T> {
    pub n: usize,
    pub data: T,
}

/// `{code, message}` body the server sends for errors and bare statuses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusBody {
    pub code: u16,
    pub message: String,
}

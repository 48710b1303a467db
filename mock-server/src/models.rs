use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Champions the mock accepts, as lowercase ids.
pub const CHAMPIONS: &[&str] = &[
    "ahri", "annie", "ashe", "darius", "ekko", "garen", "jinx", "lee-sin", "lux", "miss-fortune", "nami", "thresh",
    "yasuo", "zed",
];

pub const RUNE_TREES: &[&str] = &["precission", "domination", "sorcery", "resolve", "inspiration"];

pub const PERKS: [[&str; 3]; 3] = [
    ["diamond", "axe", "time"],
    ["diamond", "shield", "circle"],
    ["heart", "shield", "circle"],
];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub uid: String,
    pub username: String,
    pub mailaddress: String,
    pub displayname: String,
    pub lastlogin: DateTime<Utc>,
    pub created: DateTime<Utc>,
    pub favorites: Vec<String>,
    pub pageorder: Option<HashMap<String, Vec<String>>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page {
    pub uid: String,
    pub owner: String,
    pub title: String,
    pub created: DateTime<Utc>,
    pub edited: DateTime<Utc>,
    pub champions: Vec<String>,
    pub primary: PrimaryTree,
    pub secondary: SecondaryTree,
    pub perks: Perks,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrimaryTree {
    pub tree: String,
    pub rows: [String; 4],
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecondaryTree {
    pub tree: String,
    pub rows: [String; 2],
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Perks {
    pub rows: [String; 3],
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
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

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiToken {
    pub userid: String,
    pub token: String,
    pub created: DateTime<Utc>,
}

// --- request bodies ---

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub remember: bool,
}

/// Page body for create and edit. Server-owned fields sent by clients are
/// ignored.
#[derive(Deserialize)]
pub struct PageInput {
    pub title: String,
    #[serde(default)]
    pub champions: Vec<String>,
    pub primary: PrimaryTree,
    pub secondary: SecondaryTree,
    pub perks: Perks,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct UserRequest {
    pub username: String,
    pub displayname: String,
    pub newpassword: String,
    pub currpassword: String,
}

#[derive(Deserialize)]
pub struct FavoritesRequest {
    pub favorites: Option<Vec<String>>,
}

#[derive(Deserialize)]
pub struct ShareRequest {
    #[serde(default)]
    pub maxaccesses: i64,
    #[serde(default)]
    pub expires: Option<DateTime<Utc>>,
    #[serde(default)]
    pub page: String,
}

#[derive(Deserialize)]
pub struct PageOrderRequest {
    pub pageorder: Vec<String>,
}

#[derive(Deserialize)]
pub struct MailRequest {
    #[serde(default)]
    pub mailaddress: String,
    #[serde(default)]
    pub reset: bool,
}

#[derive(Deserialize)]
pub struct TokenRequest {
    pub token: String,
}

#[derive(Deserialize)]
pub struct PasswordResetRequest {
    pub mailaddress: String,
}

#[derive(Deserialize)]
pub struct PasswordResetConfirmRequest {
    pub token: String,
    pub new_password: String,
    #[serde(default)]
    pub page_names: Vec<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PagesQuery {
    pub sort_by: Option<String>,
    pub champion: Option<String>,
    pub short: Option<String>,
    pub filter: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct ChampionQuery {
    pub champion: Option<String>,
}

/// `"1"` or any casing of `"true"`.
pub fn is_true(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

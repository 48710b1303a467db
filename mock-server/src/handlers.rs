use std::collections::{BTreeMap, HashMap};

use axum::{
    extract::{Path, Query, State},
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{status_body, ApiFailure};
use crate::models::{
    is_true, ApiToken, ChampionQuery, FavoritesRequest, LoginRequest, MailRequest, Page, PageInput,
    PageOrderRequest, PagesQuery, PasswordResetConfirmRequest, PasswordResetRequest, Share, ShareRequest,
    TokenRequest, User, UserRequest, CHAMPIONS, PERKS, RUNE_TREES,
};
use crate::store::{Db, Store, UserRecord};

const SESSION_COOKIE: &str = "__session";
const CLEAR_SESSION: &str = "__session=; Max-Age=0; Path=/; HttpOnly";
const SESSION_SECS_DEFAULT: i64 = 2 * 3600;
const SESSION_SECS_REMEMBER: i64 = 30 * 24 * 3600;
const DEFAULT_CHAMPION: &str = "general";

type Reply = Result<Response, ApiFailure>;

fn ok() -> Response {
    status_body(StatusCode::OK, "ok").into_response()
}

fn session_cookie(key: &str, remember: bool) -> String {
    let max_age = if remember {
        SESSION_SECS_REMEMBER
    } else {
        SESSION_SECS_DEFAULT
    };
    format!("{SESSION_COOKIE}={key}; Max-Age={max_age}; Path=/; HttpOnly")
}

fn session_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
}

/// Uid of the user owning the request's session cookie.
fn authenticate(store: &Store, headers: &HeaderMap) -> Result<String, ApiFailure> {
    let key = session_key(headers).ok_or(ApiFailure::Unauthorized)?;
    store
        .session_user(key)
        .map(str::to_string)
        .ok_or(ApiFailure::Unauthorized)
}

fn check_password(store: &Store, uid: &str, password: &str) -> Result<(), ApiFailure> {
    match store.users.get(uid) {
        Some(record) if record.password == password => Ok(()),
        _ => Err(ApiFailure::Unauthorized),
    }
}

fn validate_username(username: &str) -> Result<(), ApiFailure> {
    let valid_chars = username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-');
    if username.len() < 3 || !valid_chars {
        return Err(ApiFailure::BadRequest("invalid username"));
    }
    Ok(())
}

/// Checks a page body and returns its de-duplicated champion list.
fn validate_page(input: &PageInput) -> Result<Vec<String>, ApiFailure> {
    if input.title.is_empty() {
        return Err(ApiFailure::BadRequest("invalid title"));
    }
    let primary = input.primary.tree.as_str();
    let secondary = input.secondary.tree.as_str();
    if !RUNE_TREES.contains(&primary) || !RUNE_TREES.contains(&secondary) || primary == secondary {
        return Err(ApiFailure::BadRequest("invalid tree"));
    }

    let mut champions: Vec<String> = Vec::with_capacity(input.champions.len());
    for champion in &input.champions {
        if !CHAMPIONS.contains(&champion.as_str()) {
            return Err(ApiFailure::BadRequest("invalid champion"));
        }
        if !champions.contains(champion) {
            champions.push(champion.clone());
        }
    }
    Ok(champions)
}

fn display_name(id: &str) -> String {
    id.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn short_token(len: usize) -> String {
    Uuid::new_v4().simple().to_string()[..len].to_string()
}

// --- session ---

pub async fn login(State(db): State<Db>, Json(input): Json<LoginRequest>) -> Reply {
    let mut store = db.write().await;
    let uid = match store.user_by_name(&input.username) {
        Some(record) if record.password == input.password => record.user.uid.clone(),
        _ => return Err(ApiFailure::Unauthorized),
    };

    if let Some(record) = store.users.get_mut(&uid) {
        record.user.lastlogin = Utc::now();
    }
    let key = store.create_session(&uid);
    info!(%uid, remember = input.remember, "login");

    let (status, body) = status_body(StatusCode::OK, "ok");
    Ok((status, [(SET_COOKIE, session_cookie(&key, input.remember))], body).into_response())
}

pub async fn logout(State(db): State<Db>, headers: HeaderMap) -> Reply {
    let key = session_key(&headers).ok_or(ApiFailure::Unauthorized)?;
    db.write().await.sessions.remove(key);

    let (status, body) = status_body(StatusCode::OK, "ok");
    Ok((status, [(SET_COOKIE, CLEAR_SESSION)], body).into_response())
}

// --- static resources ---

pub async fn version() -> Json<Value> {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "apiversion": "1.7",
        "release": "FALSE",
    }))
}

pub async fn champions() -> Json<Value> {
    let data: Vec<Value> = CHAMPIONS
        .iter()
        .map(|id| json!({ "uid": id, "name": display_name(id) }))
        .collect();
    Json(json!({ "n": data.len(), "data": data }))
}

pub async fn runes() -> Json<Value> {
    let trees: Vec<Value> = RUNE_TREES
        .iter()
        .map(|id| json!({ "uid": id, "name": display_name(id) }))
        .collect();
    Json(json!({ "trees": trees, "perks": PERKS }))
}

// --- users ---

pub async fn create_user(State(db): State<Db>, Json(input): Json<LoginRequest>) -> Reply {
    if input.username.is_empty() || input.password.len() < 8 {
        return Err(ApiFailure::BadRequest("invalid arguments"));
    }

    let mut store = db.write().await;
    if store.user_by_name(&input.username).is_some() {
        return Err(ApiFailure::UsernameTaken);
    }
    validate_username(&input.username)?;

    let now = Utc::now();
    let uid = store.next_id();
    let user = User {
        uid: uid.clone(),
        username: input.username.to_lowercase(),
        mailaddress: String::new(),
        displayname: input.username.clone(),
        lastlogin: now,
        created: now,
        favorites: Vec::new(),
        pageorder: None,
    };
    store.users.insert(
        uid.clone(),
        UserRecord {
            user: user.clone(),
            password: input.password,
        },
    );
    let key = store.create_session(&uid);
    info!(%uid, username = %user.username, "user created");

    Ok((
        StatusCode::CREATED,
        [(SET_COOKIE, session_cookie(&key, input.remember))],
        Json(user),
    )
        .into_response())
}

pub async fn get_me(State(db): State<Db>, headers: HeaderMap) -> Result<Json<User>, ApiFailure> {
    let store = db.read().await;
    let uid = authenticate(&store, &headers)?;
    let record = store.users.get(&uid).ok_or(ApiFailure::Unauthorized)?;
    Ok(Json(record.user.clone()))
}

pub async fn post_me(State(db): State<Db>, headers: HeaderMap, Json(input): Json<UserRequest>) -> Reply {
    let mut store = db.write().await;
    let uid = authenticate(&store, &headers)?;
    check_password(&store, &uid, &input.currpassword)?;

    if !input.username.is_empty() {
        validate_username(&input.username)?;
        if let Some(other) = store.user_by_name(&input.username) {
            if other.user.uid != uid {
                return Err(ApiFailure::BadRequest("username is already taken"));
            }
        }
    }
    if !input.newpassword.is_empty() && input.newpassword.len() < 8 {
        return Err(ApiFailure::BadRequest("invalid new password"));
    }

    let record = store.users.get_mut(&uid).ok_or(ApiFailure::Unauthorized)?;
    if !input.username.is_empty() {
        record.user.username = input.username.to_lowercase();
    }
    if !input.displayname.is_empty() {
        record.user.displayname = input.displayname;
    }
    if !input.newpassword.is_empty() {
        record.password = input.newpassword;
    }
    debug!(%uid, "user updated");
    Ok(ok())
}

pub async fn delete_me(State(db): State<Db>, headers: HeaderMap, Json(input): Json<UserRequest>) -> Reply {
    let mut store = db.write().await;
    let uid = authenticate(&store, &headers)?;
    check_password(&store, &uid, &input.currpassword)?;
    store.remove_user(&uid);
    info!(%uid, "user deleted");

    let (status, body) = status_body(StatusCode::OK, "ok");
    Ok((status, [(SET_COOKIE, CLEAR_SESSION)], body).into_response())
}

pub async fn check_username(State(db): State<Db>, Path(uname): Path<String>) -> Reply {
    match db.read().await.user_by_name(&uname) {
        Some(_) => Ok(ok()),
        None => Err(ApiFailure::NotFound),
    }
}

pub async fn post_page_order(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<ChampionQuery>,
    Json(input): Json<PageOrderRequest>,
) -> Reply {
    let mut store = db.write().await;
    let uid = authenticate(&store, &headers)?;
    let champion = query
        .champion
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CHAMPION.to_string());

    let record = store.users.get_mut(&uid).ok_or(ApiFailure::Unauthorized)?;
    record
        .user
        .pageorder
        .get_or_insert_with(HashMap::new)
        .insert(champion, input.pageorder);
    Ok(ok())
}

// --- mail and password flows ---

pub async fn post_mail(State(db): State<Db>, headers: HeaderMap, Json(input): Json<MailRequest>) -> Reply {
    let mut store = db.write().await;
    let uid = authenticate(&store, &headers)?;

    if input.reset {
        let record = store.users.get_mut(&uid).ok_or(ApiFailure::Unauthorized)?;
        record.user.mailaddress.clear();
        return Ok(ok());
    }

    if !input.mailaddress.contains('@') {
        return Err(ApiFailure::BadRequest("invalid mail address"));
    }
    let token = short_token(16);
    store
        .mail_confirmations
        .insert(token, (uid.clone(), input.mailaddress));
    debug!(%uid, "mail confirmation pending");
    Ok(ok())
}

pub async fn confirm_mail(State(db): State<Db>, Json(input): Json<TokenRequest>) -> Reply {
    let mut store = db.write().await;
    let (uid, mail) = store
        .mail_confirmations
        .remove(&input.token)
        .ok_or(ApiFailure::BadRequest("invalid token"))?;
    let record = store.users.get_mut(&uid).ok_or(ApiFailure::BadRequest("unknown user"))?;
    record.user.mailaddress = mail;
    Ok(ok())
}

pub async fn password_reset(State(db): State<Db>, Json(input): Json<PasswordResetRequest>) -> Reply {
    let mut store = db.write().await;
    let uid = store.user_by_mail(&input.mailaddress).map(|r| r.user.uid.clone());
    if let Some(uid) = uid {
        let token = Uuid::new_v4().simple().to_string();
        store.password_resets.insert(token, uid);
    }
    Ok(ok())
}

pub async fn password_reset_confirm(
    State(db): State<Db>,
    Json(input): Json<PasswordResetConfirmRequest>,
) -> Reply {
    if input.new_password.len() < 8 {
        return Err(ApiFailure::BadRequest("invalid password length"));
    }

    let mut store = db.write().await;
    let uid = store
        .password_resets
        .get(&input.token)
        .cloned()
        .ok_or(ApiFailure::BadRequest("invalid token"))?;

    let check_failed = ApiFailure::BadRequest("security check failed");
    let guesses: Vec<String> = input.page_names.iter().map(|n| n.to_lowercase()).collect();
    if guesses.len() < 3 || guesses[..3].iter().any(String::is_empty) {
        return Err(check_failed);
    }
    for (i, guess) in guesses.iter().enumerate() {
        if guesses[..i].contains(guess) {
            return Err(check_failed);
        }
    }
    let titles: Vec<String> = store
        .pages
        .values()
        .filter(|p| p.owner == uid)
        .map(|p| p.title.to_lowercase())
        .collect();
    let guessed = guesses.iter().filter(|g| titles.contains(g)).count();
    if guessed < 3 {
        return Err(check_failed);
    }

    store.password_resets.remove(&input.token);
    let record = store.users.get_mut(&uid).ok_or(ApiFailure::BadRequest("unknown user"))?;
    record.password = input.new_password;
    info!(%uid, "password reset");
    Ok(ok())
}

// --- pages ---

pub async fn list_pages(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<PagesQuery>,
) -> Result<Json<Value>, ApiFailure> {
    let store = db.read().await;
    let uid = authenticate(&store, &headers)?;
    let champion = query
        .champion
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CHAMPION.to_string());
    let filter = query.filter.unwrap_or_default().to_lowercase();

    let mut pages: Vec<&Page> = store
        .pages
        .values()
        .filter(|p| p.owner == uid)
        .filter(|p| champion == DEFAULT_CHAMPION || p.champions.contains(&champion))
        .filter(|p| filter.is_empty() || p.title.to_lowercase().contains(&filter))
        .collect();
    pages.sort_by_key(|p| p.uid.parse::<u64>().unwrap_or(u64::MAX));

    match query.sort_by.as_deref() {
        Some("created") => pages.sort_by(|a, b| b.created.cmp(&a.created)),
        Some("title") => pages.sort_by_key(|p| p.title.to_lowercase()),
        Some("custom") => {
            let order = store
                .users
                .get(&uid)
                .and_then(|r| r.user.pageorder.as_ref())
                .and_then(|orders| orders.get(&champion));
            if let Some(order) = order {
                pages.sort_by_key(|p| order.iter().position(|u| *u == p.uid).unwrap_or(usize::MAX));
            }
        }
        _ => {}
    }

    if query.short.as_deref().is_some_and(is_true) {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for page in &pages {
            for champion in &page.champions {
                *counts.entry(champion.as_str()).or_default() += 1;
            }
        }
        return Ok(Json(json!({ "n": counts.len(), "data": counts })));
    }

    Ok(Json(json!({ "n": pages.len(), "data": pages })))
}

pub async fn create_page(State(db): State<Db>, headers: HeaderMap, Json(input): Json<PageInput>) -> Reply {
    let mut store = db.write().await;
    let uid = authenticate(&store, &headers)?;
    let champions = validate_page(&input)?;

    let now = Utc::now();
    let page = Page {
        uid: store.next_id(),
        owner: uid,
        title: input.title,
        created: now,
        edited: now,
        champions,
        primary: input.primary,
        secondary: input.secondary,
        perks: input.perks,
    };
    store.pages.insert(page.uid.clone(), page.clone());
    debug!(page = %page.uid, "page created");
    Ok((StatusCode::CREATED, Json(page)).into_response())
}

pub async fn get_page(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(page_uid): Path<String>,
) -> Result<Json<Page>, ApiFailure> {
    let store = db.read().await;
    let uid = authenticate(&store, &headers)?;
    store
        .pages
        .get(&page_uid)
        .filter(|p| p.owner == uid)
        .cloned()
        .map(Json)
        .ok_or(ApiFailure::NotFound)
}

pub async fn edit_page(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(page_uid): Path<String>,
    Json(input): Json<PageInput>,
) -> Result<Json<Page>, ApiFailure> {
    let mut store = db.write().await;
    let uid = authenticate(&store, &headers)?;
    let page = store
        .pages
        .get_mut(&page_uid)
        .filter(|p| p.owner == uid)
        .ok_or(ApiFailure::NotFound)?;
    let champions = validate_page(&input)?;

    page.title = input.title;
    page.champions = champions;
    page.primary = input.primary;
    page.secondary = input.secondary;
    page.perks = input.perks;
    page.edited = Utc::now();
    Ok(Json(page.clone()))
}

pub async fn delete_page(State(db): State<Db>, headers: HeaderMap, Path(page_uid): Path<String>) -> Reply {
    let mut store = db.write().await;
    let uid = authenticate(&store, &headers)?;
    if !store.pages.get(&page_uid).is_some_and(|p| p.owner == uid) {
        return Err(ApiFailure::NotFound);
    }
    store.pages.remove(&page_uid);
    Ok(ok())
}

// --- sessions (retired) ---

pub async fn sessions_gone() -> ApiFailure {
    ApiFailure::Gone
}

// --- favorites ---

pub async fn get_favorites(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Value>, ApiFailure> {
    let store = db.read().await;
    let uid = authenticate(&store, &headers)?;
    let favorites = store
        .users
        .get(&uid)
        .map(|r| r.user.favorites.clone())
        .unwrap_or_default();
    Ok(Json(json!({ "n": favorites.len(), "data": favorites })))
}

pub async fn post_favorites(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<FavoritesRequest>,
) -> Result<Json<Value>, ApiFailure> {
    let mut store = db.write().await;
    let uid = authenticate(&store, &headers)?;
    let favorites: Vec<String> = input
        .favorites
        .ok_or(ApiFailure::BadRequest("bad request"))?
        .iter()
        .map(|f| f.to_lowercase())
        .collect();
    if favorites.iter().any(|f| !CHAMPIONS.contains(&f.as_str())) {
        return Err(ApiFailure::BadRequest("invalid champion"));
    }

    let record = store.users.get_mut(&uid).ok_or(ApiFailure::Unauthorized)?;
    record.user.favorites = favorites.clone();
    Ok(Json(json!({ "n": favorites.len(), "data": favorites })))
}

// --- shares ---

pub async fn create_share(State(db): State<Db>, headers: HeaderMap, Json(input): Json<ShareRequest>) -> Reply {
    let mut store = db.write().await;
    let uid = authenticate(&store, &headers)?;
    if !store.pages.get(&input.page).is_some_and(|p| p.owner == uid) {
        return Err(ApiFailure::NotFound);
    }

    let now = Utc::now();
    let share = Share {
        uid: store.next_id(),
        ident: short_token(5),
        owner: uid,
        page: input.page,
        created: now,
        maxaccesses: if input.maxaccesses == 0 { -1 } else { input.maxaccesses },
        expires: input.expires.unwrap_or(now + Duration::days(100 * 365)),
        accesses: 0,
        lastaccess: now,
    };
    store.shares.insert(share.uid.clone(), share.clone());
    Ok((StatusCode::CREATED, Json(share)).into_response())
}

/// Owners look shares up by uid or ident. Anonymous visitors use the ident,
/// and each visit is counted against `maxaccesses`.
pub async fn get_share(State(db): State<Db>, headers: HeaderMap, Path(ident): Path<String>) -> Reply {
    let mut store = db.write().await;
    let viewer = session_key(&headers)
        .and_then(|key| store.session_user(key))
        .map(str::to_string);

    let mut share = store
        .shares
        .values()
        .find(|s| s.ident == ident || (viewer.is_some() && s.uid == ident))
        .cloned()
        .ok_or(ApiFailure::NotFound)?;

    match &viewer {
        Some(uid) if *uid != share.owner => return Err(ApiFailure::NotFound),
        Some(_) => {}
        None => {
            let now = Utc::now();
            if share.maxaccesses == 0 || share.expires < now {
                return Err(ApiFailure::NotFound);
            }
            if let Some(stored) = store.shares.get_mut(&share.uid) {
                if stored.maxaccesses > 0 {
                    stored.maxaccesses -= 1;
                }
                stored.accesses += 1;
                stored.lastaccess = now;
                share = stored.clone();
            }
        }
    }

    let page = store.pages.get(&share.page).cloned().ok_or(ApiFailure::NotFound)?;
    let user = store
        .users
        .get(&page.owner)
        .map(|r| r.user.clone())
        .ok_or(ApiFailure::NotFound)?;

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "share": share, "page": page, "user": user })),
    )
        .into_response())
}

pub async fn post_share(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(share_uid): Path<String>,
    Json(input): Json<ShareRequest>,
) -> Reply {
    let mut store = db.write().await;
    let uid = authenticate(&store, &headers)?;
    let share = store
        .shares
        .get_mut(&share_uid)
        .filter(|s| s.owner == uid)
        .ok_or(ApiFailure::NotFound)?;

    if let Some(expires) = input.expires {
        share.expires = expires;
    }
    if input.maxaccesses != 0 {
        share.maxaccesses = input.maxaccesses;
    }
    Ok((StatusCode::CREATED, Json(share.clone())).into_response())
}

pub async fn delete_share(State(db): State<Db>, headers: HeaderMap, Path(share_uid): Path<String>) -> Reply {
    let mut store = db.write().await;
    let uid = authenticate(&store, &headers)?;
    if !store.shares.get(&share_uid).is_some_and(|s| s.owner == uid) {
        return Err(ApiFailure::NotFound);
    }
    store.shares.remove(&share_uid);
    Ok(ok())
}

// --- api token ---

pub async fn get_api_token(State(db): State<Db>, headers: HeaderMap) -> Result<Json<ApiToken>, ApiFailure> {
    let store = db.read().await;
    let uid = authenticate(&store, &headers)?;
    store
        .api_tokens
        .get(&uid)
        .cloned()
        .map(Json)
        .ok_or(ApiFailure::NotFound)
}

pub async fn post_api_token(State(db): State<Db>, headers: HeaderMap) -> Result<Json<ApiToken>, ApiFailure> {
    let mut store = db.write().await;
    let uid = authenticate(&store, &headers)?;
    let token = ApiToken {
        userid: uid.clone(),
        token: format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple()),
        created: Utc::now(),
    };
    store.api_tokens.insert(uid, token.clone());
    Ok(Json(token))
}

pub async fn delete_api_token(State(db): State<Db>, headers: HeaderMap) -> Reply {
    let mut store = db.write().await;
    let uid = authenticate(&store, &headers)?;
    store.api_tokens.remove(&uid);
    Ok(ok())
}

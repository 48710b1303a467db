use axum::{
    http::{self, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use mock_server::{app, app_with_db, new_db, Page, Share, User};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn request(method: &str, uri: &str, session: Option<&str>, body: Option<Value>) -> Request<String> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(key) = session {
        builder = builder.header(http::header::COOKIE, format!("__session={key}"));
    }
    match body {
        Some(body) => builder
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .unwrap(),
        None => builder.body(String::new()).unwrap(),
    }
}

fn session_from(response: &axum::response::Response) -> String {
    let cookie = response
        .headers()
        .get(http::header::SET_COOKIE)
        .expect("set-cookie header")
        .to_str()
        .unwrap();
    let pair = cookie.split(';').next().unwrap();
    pair.strip_prefix("__session=").unwrap().to_string()
}

async fn register(app: &Router, username: &str) -> String {
    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/users",
            None,
            Some(json!({ "username": username, "password": "hunter22hunter" })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    session_from(&resp)
}

fn page_body(title: &str, champions: &[&str]) -> Value {
    json!({
        "title": title,
        "champions": champions,
        "primary": { "tree": "sorcery", "rows": ["summon-aery", "manaflow-band", "transcendence", "scorch"] },
        "secondary": { "tree": "inspiration", "rows": ["biscuit-delivery", "cosmic-insight"] },
        "perks": { "rows": ["diamond", "shield", "heart"] },
    })
}

async fn create_page(app: &Router, session: &str, title: &str, champions: &[&str]) -> Page {
    let resp = app
        .clone()
        .oneshot(request("POST", "/api/pages", Some(session), Some(page_body(title, champions))))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await
}

// --- public resources ---

#[tokio::test]
async fn version_is_public() {
    let resp = app()
        .oneshot(request("GET", "/api/version", None, None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert!(body["version"].is_string());
    assert!(body["apiversion"].is_string());
}

#[tokio::test]
async fn champions_are_listed() {
    let resp = app()
        .oneshot(request("GET", "/api/resources/champions", None, None))
        .await
        .unwrap();

    let body: Value = body_json(resp).await;
    assert_eq!(body["n"], body["data"].as_array().unwrap().len());
    assert!(body["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c["uid"] == "lee-sin" && c["name"] == "Lee Sin"));
}

#[tokio::test]
async fn sessions_endpoints_are_gone() {
    let app = app();
    let resp = app
        .clone()
        .oneshot(request("GET", "/api/sessions", None, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::GONE);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({ "code": 410, "message": "deprecated" }));

    let resp = app
        .oneshot(request("DELETE", "/api/sessions/abc", None, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::GONE);
}

// --- users ---

#[tokio::test]
async fn create_user_returns_user_and_session() {
    let app = app();
    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/users",
            None,
            Some(json!({ "username": "Alice", "password": "hunter22hunter", "remember": true })),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let cookie = resp.headers()[http::header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(cookie.contains("Max-Age=2592000"));
    let session = session_from(&resp);
    let user: User = body_json(resp).await;
    assert_eq!(user.username, "alice");
    assert_eq!(user.displayname, "Alice");

    let resp = app
        .oneshot(request("GET", "/api/users/me", Some(&session), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let me: User = body_json(resp).await;
    assert_eq!(me.uid, user.uid);
}

#[tokio::test]
async fn duplicate_username_is_409() {
    let app = app();
    register(&app, "alice").await;

    let resp = app
        .oneshot(request(
            "POST",
            "/api/users",
            None,
            Some(json!({ "username": "ALICE", "password": "whatever123" })),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = body_json(resp).await;
    assert_eq!(body["code"], 409);
    assert_eq!(body["message"], "username is already in use");
}

#[tokio::test]
async fn short_password_is_400() {
    let resp = app()
        .oneshot(request(
            "POST",
            "/api/users",
            None,
            Some(json!({ "username": "bob", "password": "short" })),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn check_username_reports_existence() {
    let app = app();
    register(&app, "carol").await;

    let resp = app
        .clone()
        .oneshot(request("GET", "/api/users/carol", None, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .oneshot(request("GET", "/api/users/nobody", None, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn me_requires_session() {
    let resp = app()
        .oneshot(request("GET", "/api/users/me", Some("forged"), None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = body_json(resp).await;
    assert_eq!(body["message"], "unauthorized");
}

#[tokio::test]
async fn login_checks_password_and_logout_ends_session() {
    let app = app();
    register(&app, "dave").await;

    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/login",
            None,
            Some(json!({ "username": "dave", "password": "wrong-password" })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/login",
            None,
            Some(json!({ "username": "dave", "password": "hunter22hunter", "remember": false })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let session = session_from(&resp);

    let resp = app
        .clone()
        .oneshot(request("POST", "/api/logout", Some(&session), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers()[http::header::SET_COOKIE]
        .to_str()
        .unwrap()
        .contains("Max-Age=0"));

    let resp = app
        .oneshot(request("GET", "/api/users/me", Some(&session), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn update_user_requires_current_password() {
    let app = app();
    let session = register(&app, "erin").await;

    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/users/me",
            Some(&session),
            Some(json!({ "displayname": "Erin", "currpassword": "nope" })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/users/me",
            Some(&session),
            Some(json!({ "displayname": "Erin", "currpassword": "hunter22hunter" })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .oneshot(request("GET", "/api/users/me", Some(&session), None))
        .await
        .unwrap();
    let me: User = body_json(resp).await;
    assert_eq!(me.displayname, "Erin");
}

// --- pages ---

#[tokio::test]
async fn pages_are_filtered_and_counted() {
    let app = app();
    let session = register(&app, "frank").await;
    create_page(&app, &session, "Mid Burst", &["ahri", "lux"]).await;
    create_page(&app, &session, "Support", &["lux"]).await;

    let resp = app
        .clone()
        .oneshot(request(
            "GET",
            "/api/pages?sortBy=title&champion=lux&short=false&filter=burst",
            Some(&session),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["n"], 1);
    assert_eq!(body["data"][0]["title"], "Mid Burst");

    let resp = app
        .oneshot(request("GET", "/api/pages?short=TRUE", Some(&session), None))
        .await
        .unwrap();
    let body: Value = body_json(resp).await;
    assert_eq!(body["data"], json!({ "ahri": 1, "lux": 2 }));
}

#[tokio::test]
async fn invalid_champion_is_400() {
    let app = app();
    let session = register(&app, "gina").await;

    let resp = app
        .oneshot(request(
            "POST",
            "/api/pages",
            Some(&session),
            Some(page_body("Nope", &["not-a-champion"])),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body["message"], "invalid champion");
}

#[tokio::test]
async fn pages_are_private_to_their_owner() {
    let app = app();
    let owner = register(&app, "hank").await;
    let other = register(&app, "ivan").await;
    let page = create_page(&app, &owner, "Mine", &["zed"]).await;
    let uri = format!("/api/pages/{}", page.uid);

    let resp = app
        .clone()
        .oneshot(request("GET", &uri, Some(&other), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app
        .clone()
        .oneshot(request("DELETE", &uri, Some(&owner), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_bytes(resp).await;
    assert_eq!(&body[..], br#"{"code":200,"message":"ok"}"#);

    let resp = app
        .oneshot(request("GET", &uri, Some(&owner), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- favorites ---

#[tokio::test]
async fn favorites_must_be_known_champions() {
    let app = app();
    let session = register(&app, "judy").await;

    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/favorites",
            Some(&session),
            Some(json!({ "favorites": ["Ahri", "zed"] })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({ "n": 2, "data": ["ahri", "zed"] }));

    let resp = app
        .oneshot(request(
            "POST",
            "/api/favorites",
            Some(&session),
            Some(json!({ "favorites": ["teemo"] })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- shares ---

#[tokio::test]
async fn anonymous_share_access_is_limited() {
    let app = app();
    let session = register(&app, "kim").await;
    let page = create_page(&app, &session, "Shared", &["jinx"]).await;

    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/shares",
            Some(&session),
            Some(json!({ "page": page.uid, "maxaccesses": 1 })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let share: Share = body_json(resp).await;
    assert_eq!(share.ident.len(), 5);
    let uri = format!("/api/shares/{}", share.ident);

    let resp = app
        .clone()
        .oneshot(request("GET", &uri, None, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    let body: Value = body_json(resp).await;
    assert_eq!(body["page"]["uid"], page.uid);
    assert_eq!(body["share"]["accesses"], 1);
    assert_eq!(body["user"]["username"], "kim");

    let resp = app
        .oneshot(request("GET", &uri, None, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unlimited_share_by_default() {
    let app = app();
    let session = register(&app, "lena").await;
    let page = create_page(&app, &session, "Open", &[]).await;

    let resp = app
        .oneshot(request(
            "POST",
            "/api/shares",
            Some(&session),
            Some(json!({ "page": page.uid })),
        ))
        .await
        .unwrap();
    let share: Share = body_json(resp).await;
    assert_eq!(share.maxaccesses, -1);
    assert!(share.expires > share.created);
}

// --- api token ---

#[tokio::test]
async fn api_token_lifecycle() {
    let app = app();
    let session = register(&app, "mona").await;

    let resp = app
        .clone()
        .oneshot(request("GET", "/api/apitoken", Some(&session), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app
        .clone()
        .oneshot(request("POST", "/api/apitoken", Some(&session), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Value = body_json(resp).await;

    let resp = app
        .clone()
        .oneshot(request("GET", "/api/apitoken", Some(&session), None))
        .await
        .unwrap();
    let fetched: Value = body_json(resp).await;
    assert_eq!(created["token"], fetched["token"]);

    let resp = app
        .clone()
        .oneshot(request("DELETE", "/api/apitoken", Some(&session), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .oneshot(request("GET", "/api/apitoken", Some(&session), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- mail and password reset ---

#[tokio::test]
async fn password_reset_requires_page_names() {
    let db = new_db();
    let app = app_with_db(db.clone());
    let session = register(&app, "nora").await;
    for title in ["One", "Two", "Three"] {
        create_page(&app, &session, title, &[]).await;
    }

    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/users/me/mail",
            Some(&session),
            Some(json!({ "mailaddress": "nora@example.com" })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let token = db.read().await.pending_mail_token("nora@example.com").unwrap();

    let resp = app
        .clone()
        .oneshot(request("POST", "/api/users/me/mail/confirm", None, Some(json!({ "token": token }))))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/users/me/passwordreset",
            None,
            Some(json!({ "mailaddress": "nora@example.com" })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let token = db.read().await.pending_password_reset("nora@example.com").unwrap();

    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/users/me/passwordreset/confirm",
            None,
            Some(json!({ "token": token, "new_password": "brand-new-pass", "page_names": ["one", "two", "four"] })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body["message"], "security check failed");

    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/users/me/passwordreset/confirm",
            None,
            Some(json!({ "token": token, "new_password": "brand-new-pass", "page_names": ["one", "TWO", "three"] })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .oneshot(request(
            "POST",
            "/api/login",
            None,
            Some(json!({ "username": "nora", "password": "brand-new-pass" })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_mail_token_is_400() {
    let resp = app()
        .oneshot(request(
            "POST",
            "/api/users/me/mail/confirm",
            None,
            Some(json!({ "token": "bogus" })),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body["message"], "invalid token");
}

//! Stateless request builder for the myrunes API.
//!
//! # Design
//! `RunesClient` holds only the resolved base URL and carries no mutable
//! state between calls. Each API operation has one `build_*` method that
//! produces an `HttpRequest`: path template, method, optional query and
//! optional JSON body. Nothing here performs I/O or interprets responses;
//! `Gateway` pairs these builders with a `Transport` and the shared
//! normalization step.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::types::{
    CreateShare, Credentials, CurrentPassword, Favorites, MailUpdate, Page, PageOrder,
    PasswordReset, PasswordResetConfirm, Share, Token, UserUpdate,
};

/// Characters escaped when an identifier is embedded as one path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Builds one `HttpRequest` per API operation.
#[derive(Debug, Clone)]
pub struct RunesClient {
    base_url: String,
}

impl RunesClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            base_url: config.base_url().to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // --- user session ---

    pub fn build_get_me(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/api/users/me")
    }

    pub fn build_check_username(&self, username: &str) -> Result<HttpRequest, ApiError> {
        Ok(self.request(HttpMethod::Get, &format!("/api/users/{}", segment(username)?)))
    }

    pub fn build_register(&self, username: &str, password: &str, remember: bool) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/api/users", &credentials(username, password, remember))
    }

    pub fn build_login(&self, username: &str, password: &str, remember: bool) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/api/login", &credentials(username, password, remember))
    }

    pub fn build_logout(&self) -> HttpRequest {
        self.request(HttpMethod::Post, "/api/logout")
    }

    // --- resources ---

    pub fn build_get_champs(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/api/resources/champions")
    }

    pub fn build_get_runes(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/api/resources/runes")
    }

    // --- pages ---

    /// Every query key is always present; unset ones carry `Null`.
    pub fn build_get_pages(
        &self,
        sort_by: Option<&str>,
        champion: Option<&str>,
        short: Option<bool>,
        filter: Option<&str>,
    ) -> HttpRequest {
        self.request(HttpMethod::Get, "/api/pages").with_query(vec![
            ("sortBy".to_string(), opt_str(sort_by)),
            ("champion".to_string(), opt_str(champion)),
            ("short".to_string(), short.map(Value::Bool).unwrap_or(Value::Null)),
            ("filter".to_string(), opt_str(filter)),
        ])
    }

    pub fn build_get_page(&self, uid: &str) -> Result<HttpRequest, ApiError> {
        Ok(self.request(HttpMethod::Get, &format!("/api/pages/{}", segment(uid)?)))
    }

    pub fn build_create_page(&self, page: &Page) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/api/pages", page)
    }

    pub fn build_update_page(&self, uid: &str, page: &Page) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, &format!("/api/pages/{}", segment(uid)?), page)
    }

    pub fn build_delete_page(&self, uid: &str) -> Result<HttpRequest, ApiError> {
        Ok(self.request(HttpMethod::Delete, &format!("/api/pages/{}", segment(uid)?)))
    }

    // --- account ---

    pub fn build_update_user(&self, update: &UserUpdate) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/api/users/me", update)
    }

    pub fn build_delete_user(&self, current_password: &str) -> Result<HttpRequest, ApiError> {
        let body = CurrentPassword {
            currpassword: current_password.to_string(),
        };
        self.json_request(HttpMethod::Delete, "/api/users/me", &body)
    }

    pub fn build_get_sessions(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/api/sessions")
    }

    pub fn build_delete_session(&self, session_id: &str) -> Result<HttpRequest, ApiError> {
        Ok(self.request(HttpMethod::Delete, &format!("/api/sessions/{}", segment(session_id)?)))
    }

    pub fn build_get_favorites(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/api/favorites")
    }

    pub fn build_set_favorites(&self, favorites: &[String]) -> Result<HttpRequest, ApiError> {
        let body = Favorites {
            favorites: favorites.to_vec(),
        };
        self.json_request(HttpMethod::Post, "/api/favorites", &body)
    }

    // --- shares ---

    /// `ident` is either the public share ident or the share uid.
    pub fn build_get_share(&self, ident: &str) -> Result<HttpRequest, ApiError> {
        Ok(self.request(HttpMethod::Get, &format!("/api/shares/{}", segment(ident)?)))
    }

    pub fn build_create_share(&self, share: &CreateShare) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/api/shares", share)
    }

    pub fn build_update_share(&self, share: &Share) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, &format!("/api/shares/{}", segment(&share.uid)?), share)
    }

    pub fn build_delete_share(&self, share: &Share) -> Result<HttpRequest, ApiError> {
        Ok(self.request(HttpMethod::Delete, &format!("/api/shares/{}", segment(&share.uid)?)))
    }

    // --- misc ---

    pub fn build_get_version(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/api/version")
    }

    pub fn build_get_api_token(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/api/apitoken")
    }

    pub fn build_generate_api_token(&self) -> HttpRequest {
        self.request(HttpMethod::Post, "/api/apitoken")
    }

    pub fn build_delete_api_token(&self) -> HttpRequest {
        self.request(HttpMethod::Delete, "/api/apitoken")
    }

    pub fn build_set_page_order(&self, page_order: &[String], champion: Option<&str>) -> Result<HttpRequest, ApiError> {
        let body = PageOrder {
            pageorder: page_order.to_vec(),
        };
        Ok(self
            .json_request(HttpMethod::Post, "/api/users/me/pageorder", &body)?
            .with_query(vec![("champion".to_string(), opt_str(champion))]))
    }

    // --- mail and password flows ---

    /// `reset` defaults to `false` so the server always receives it.
    pub fn build_set_mail_address(&self, mail_address: &str, reset: Option<bool>) -> Result<HttpRequest, ApiError> {
        let body = MailUpdate {
            mailaddress: mail_address.to_string(),
            reset: reset.unwrap_or(false),
        };
        self.json_request(HttpMethod::Post, "/api/users/me/mail", &body)
    }

    pub fn build_confirm_mail(&self, token: &str) -> Result<HttpRequest, ApiError> {
        let body = Token {
            token: token.to_string(),
        };
        self.json_request(HttpMethod::Post, "/api/users/me/mail/confirm", &body)
    }

    pub fn build_reset_password(&self, mail_address: &str) -> Result<HttpRequest, ApiError> {
        let body = PasswordReset {
            mailaddress: mail_address.to_string(),
        };
        self.json_request(HttpMethod::Post, "/api/users/me/passwordreset", &body)
    }

    pub fn build_reset_password_confirm(
        &self,
        token: &str,
        new_password: &str,
        page_names: &[String],
    ) -> Result<HttpRequest, ApiError> {
        let body = PasswordResetConfirm {
            token: token.to_string(),
            new_password: new_password.to_string(),
            page_names: page_names.to_vec(),
        };
        self.json_request(HttpMethod::Post, "/api/users/me/passwordreset/confirm", &body)
    }

    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest::new(method, format!("{}{path}", self.base_url))
    }

    fn json_request<T: Serialize + ?Sized>(&self, method: HttpMethod, path: &str, body: &T) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(body).map_err(ApiError::Serialization)?;
        Ok(self.request(method, path).with_body(body))
    }
}

fn credentials(username: &str, password: &str, remember: bool) -> Credentials {
    Credentials {
        username: username.to_string(),
        password: password.to_string(),
        remember,
    }
}

fn opt_str(value: Option<&str>) -> Value {
    value.map(|s| Value::String(s.to_string())).unwrap_or(Value::Null)
}

/// Percent-encode `value` so it stays a single path segment.
///
/// Empty and dot identifiers are rejected: URL normalization would resolve
/// them against the parent path, escaped or not.
fn segment(value: &str) -> Result<String, ApiError> {
    if matches!(value, "" | "." | "..") {
        return Err(ApiError::InvalidIdentifier(value.to_string()));
    }
    Ok(utf8_percent_encode(value, SEGMENT).to_string())
}

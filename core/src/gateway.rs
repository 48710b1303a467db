//! Async gateway: one method per API operation.
//!
//! # Design
//! Each operation is a declarative pairing of a `RunesClient::build_*`
//! descriptor with [`Gateway::send`], the single place where requests hit
//! the transport and responses are normalized. Operations carry no error
//! handling of their own.
//!
//! The gateway holds no mutable state. Concurrent calls are independent and
//! complete in whatever order the transport finishes them. There is no retry
//! and no timeout at this layer.

use tracing::{debug, error, warn};

use crate::client::RunesClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::response::{normalize, ApiResponse};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{CreateShare, Page, Share, UserUpdate};

pub type ApiResult = Result<ApiResponse, ApiError>;

#[derive(Debug, Clone)]
pub struct Gateway<T> {
    client: RunesClient,
    transport: T,
}

impl Gateway<ReqwestTransport> {
    /// Gateway over a fresh cookie-keeping reqwest transport.
    pub fn with_reqwest(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(config, ReqwestTransport::new()?))
    }
}

impl<T: Transport> Gateway<T> {
    pub fn new(config: &ClientConfig, transport: T) -> Self {
        Self {
            client: RunesClient::new(config),
            transport,
        }
    }

    pub fn client(&self) -> &RunesClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Execute `request` exactly once and normalize the outcome.
    ///
    /// Credentials are always included, regardless of the flag on `request`.
    pub async fn send(&self, mut request: HttpRequest) -> ApiResult {
        request.with_credentials = true;

        let method = request.method.as_str();
        let url = request.url.clone();
        debug!(method, %url, query = request.query.len(), "dispatching request");

        let response = self.transport.execute(request).await.map_err(|err| {
            error!(method, %url, error = %err, "transport failure");
            ApiError::Transport(err)
        })?;
        debug!(method, %url, status = response.status, "response received");

        normalize(response).inspect_err(|err| {
            if let ApiError::Application(failure) = err {
                warn!(method, %url, status = failure.status, message = failure.message().unwrap_or(""), "request rejected");
            }
        })
    }

    pub async fn get_me(&self) -> ApiResult {
        self.send(self.client.build_get_me()).await
    }

    pub async fn check_username(&self, username: &str) -> ApiResult {
        self.send(self.client.build_check_username(username)?).await
    }

    pub async fn register(&self, username: &str, password: &str, remember: bool) -> ApiResult {
        self.send(self.client.build_register(username, password, remember)?).await
    }

    pub async fn login(&self, username: &str, password: &str, remember: bool) -> ApiResult {
        self.send(self.client.build_login(username, password, remember)?).await
    }

    pub async fn logout(&self) -> ApiResult {
        self.send(self.client.build_logout()).await
    }

    pub async fn get_champs(&self) -> ApiResult {
        self.send(self.client.build_get_champs()).await
    }

    pub async fn get_runes(&self) -> ApiResult {
        self.send(self.client.build_get_runes()).await
    }

    pub async fn get_pages(
        &self,
        sort_by: Option<&str>,
        champion: Option<&str>,
        short: Option<bool>,
        filter: Option<&str>,
    ) -> ApiResult {
        self.send(self.client.build_get_pages(sort_by, champion, short, filter)).await
    }

    pub async fn get_page(&self, uid: &str) -> ApiResult {
        self.send(self.client.build_get_page(uid)?).await
    }

    pub async fn create_page(&self, page: &Page) -> ApiResult {
        self.send(self.client.build_create_page(page)?).await
    }

    pub async fn update_page(&self, uid: &str, page: &Page) -> ApiResult {
        self.send(self.client.build_update_page(uid, page)?).await
    }

    pub async fn delete_page(&self, uid: &str) -> ApiResult {
        self.send(self.client.build_delete_page(uid)?).await
    }

    pub async fn update_user(&self, update: &UserUpdate) -> ApiResult {
        self.send(self.client.build_update_user(update)?).await
    }

    pub async fn delete_user(&self, current_password: &str) -> ApiResult {
        self.send(self.client.build_delete_user(current_password)?).await
    }

    pub async fn get_sessions(&self) -> ApiResult {
        self.send(self.client.build_get_sessions()).await
    }

    pub async fn delete_session(&self, session_id: &str) -> ApiResult {
        self.send(self.client.build_delete_session(session_id)?).await
    }

    pub async fn get_favorites(&self) -> ApiResult {
        self.send(self.client.build_get_favorites()).await
    }

    pub async fn set_favorites(&self, favorites: &[String]) -> ApiResult {
        self.send(self.client.build_set_favorites(favorites)?).await
    }

    pub async fn get_share(&self, ident: &str) -> ApiResult {
        self.send(self.client.build_get_share(ident)?).await
    }

    pub async fn create_share(&self, share: &CreateShare) -> ApiResult {
        self.send(self.client.build_create_share(share)?).await
    }

    pub async fn update_share(&self, share: &Share) -> ApiResult {
        self.send(self.client.build_update_share(share)?).await
    }

    pub async fn delete_share(&self, share: &Share) -> ApiResult {
        self.send(self.client.build_delete_share(share)?).await
    }

    pub async fn get_version(&self) -> ApiResult {
        self.send(self.client.build_get_version()).await
    }

    pub async fn get_api_token(&self) -> ApiResult {
        self.send(self.client.build_get_api_token()).await
    }

    pub async fn generate_api_token(&self) -> ApiResult {
        self.send(self.client.build_generate_api_token()).await
    }

    pub async fn delete_api_token(&self) -> ApiResult {
        self.send(self.client.build_delete_api_token()).await
    }

    pub async fn set_page_order(&self, page_order: &[String], champion: Option<&str>) -> ApiResult {
        self.send(self.client.build_set_page_order(page_order, champion)?).await
    }

    pub async fn set_mail_address(&self, mail_address: &str, reset: Option<bool>) -> ApiResult {
        self.send(self.client.build_set_mail_address(mail_address, reset)?).await
    }

    pub async fn confirm_mail(&self, token: &str) -> ApiResult {
        self.send(self.client.build_confirm_mail(token)?).await
    }

    pub async fn reset_password(&self, mail_address: &str) -> ApiResult {
        self.send(self.client.build_reset_password(mail_address)?).await
    }

    pub async fn reset_password_confirm(&self, token: &str, new_password: &str, page_names: &[String]) -> ApiResult {
        self.send(self.client.build_reset_password_confirm(token, new_password, page_names)?).await
    }
}

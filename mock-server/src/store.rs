use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{ApiToken, Page, Share, User};

pub type Db = Arc<RwLock<Store>>;

pub struct UserRecord {
    pub user: User,
    pub password: String,
}

/// Everything the mock API keeps in memory.
#[derive(Default)]
pub struct Store {
    pub(crate) users: HashMap<String, UserRecord>,
    pub(crate) sessions: HashMap<String, String>,
    pub(crate) pages: HashMap<String, Page>,
    pub(crate) shares: HashMap<String, Share>,
    pub(crate) api_tokens: HashMap<String, ApiToken>,
    pub(crate) mail_confirmations: HashMap<String, (String, String)>,
    pub(crate) password_resets: HashMap<String, String>,
    last_id: u64,
}

impl Store {
    /// Monotonic numeric id, rendered as a string like a snowflake.
    pub(crate) fn next_id(&mut self) -> String {
        self.last_id += 1;
        (1_180_000_000_000_000_000 + self.last_id).to_string()
    }

    pub(crate) fn user_by_name(&self, username: &str) -> Option<&UserRecord> {
        let username = username.to_lowercase();
        self.users.values().find(|r| r.user.username == username)
    }

    pub(crate) fn user_by_mail(&self, mail: &str) -> Option<&UserRecord> {
        self.users
            .values()
            .find(|r| !r.user.mailaddress.is_empty() && r.user.mailaddress == mail)
    }

    pub(crate) fn create_session(&mut self, uid: &str) -> String {
        let key = Uuid::new_v4().simple().to_string();
        self.sessions.insert(key.clone(), uid.to_string());
        key
    }

    pub(crate) fn session_user(&self, key: &str) -> Option<&str> {
        self.sessions.get(key).map(String::as_str)
    }

    /// Drop a user together with everything they own.
    pub(crate) fn remove_user(&mut self, uid: &str) {
        self.users.remove(uid);
        self.sessions.retain(|_, owner| owner != uid);
        self.pages.retain(|_, page| page.owner != uid);
        self.shares.retain(|_, share| share.owner != uid);
        self.api_tokens.remove(uid);
    }

    /// Token a confirmation mail for `mail` would have carried.
    pub fn pending_mail_token(&self, mail: &str) -> Option<String> {
        self.mail_confirmations
            .iter()
            .find(|(_, (_, address))| address == mail)
            .map(|(token, _)| token.clone())
    }

    /// Token a password reset mail to the owner of `mail` would have carried.
    pub fn pending_password_reset(&self, mail: &str) -> Option<String> {
        let uid = &self.user_by_mail(mail)?.user.uid;
        self.password_resets
            .iter()
            .find(|(_, owner)| *owner == uid)
            .map(|(token, _)| token.clone())
    }
}

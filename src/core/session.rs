//! 会话与闪存消息
//!
//! 浏览器只持有签名的会话 ID cookie，数据保存在 [`SessionStore`] 中。
//! 闪存消息写入会话后只会被下一次页面渲染读取一次。

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;
use tower_cookies::{
    cookie::{Key, SameSite},
    Cookie, Cookies,
};
use uuid::Uuid;

use super::{error::CoreError, state::AppState};

const FLASH_KEY: &str = "_flash";

/// 单个会话的键值数据
pub type SessionData = HashMap<String, serde_json::Value>;

/// 会话存储接口
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, id: &str) -> Result<SessionData, CoreError>;
    async fn store(&self, id: &str, data: SessionData) -> Result<(), CoreError>;
    async fn destroy(&self, id: &str) -> Result<(), CoreError>;
}

/// 进程内会话存储
///
/// 超过空闲时间未访问的会话视为不存在，写入时顺带清理。
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, StoredSession>>,
    idle_timeout: Duration,
}

struct StoredSession {
    data: SessionData,
    last_access: Instant,
}

impl MemorySessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    fn is_expired(&self, session: &StoredSession, now: Instant) -> bool {
        now.duration_since(session.last_access) > self.idle_timeout
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: &str) -> Result<SessionData, CoreError> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let expired = match sessions.get_mut(id) {
            Some(session) if !self.is_expired(session, now) => {
                session.last_access = now;
                return Ok(session.data.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            sessions.remove(id);
        }
        Ok(SessionData::new())
    }

    async fn store(&self, id: &str, data: SessionData) -> Result<(), CoreError> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, session| !self.is_expired(session, now));
        if data.is_empty() {
            sessions.remove(id);
        } else {
            sessions.insert(
                id.to_string(),
                StoredSession {
                    data,
                    last_access: now,
                },
            );
        }
        Ok(())
    }

    async fn destroy(&self, id: &str) -> Result<(), CoreError> {
        self.sessions.write().await.remove(id);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Info,
    Error,
}

/// 闪存消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub message: String,
}

/// 当前请求的会话句柄
pub struct Session {
    id: String,
    store: Arc<dyn SessionStore>,
}

impl Session {
    pub fn new(id: impl Into<String>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            id: id.into(),
            store,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CoreError> {
        let data = self.store.load(&self.id).await?;
        match data.get(key) {
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| CoreError::InternalServerError(format!("session decode: {}", e))),
            None => Ok(None),
        }
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CoreError> {
        let value = serde_json::to_value(value)
            .map_err(|e| CoreError::InternalServerError(format!("session encode: {}", e)))?;
        let mut data = self.store.load(&self.id).await?;
        data.insert(key.to_string(), value);
        self.store.store(&self.id, data).await
    }

    pub async fn remove(&self, key: &str) -> Result<(), CoreError> {
        let mut data = self.store.load(&self.id).await?;
        if data.remove(key).is_some() {
            self.store.store(&self.id, data).await?;
        }
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), CoreError> {
        self.store.destroy(&self.id).await
    }

    /// 追加一条闪存消息
    pub async fn flash(&self, level: FlashLevel, message: impl Into<String>) -> Result<(), CoreError> {
        let mut messages: Vec<FlashMessage> = self.get(FLASH_KEY).await?.unwrap_or_default();
        messages.push(FlashMessage {
            level,
            message: message.into(),
        });
        self.set(FLASH_KEY, &messages).await
    }

    /// 取出并清空所有闪存消息
    pub async fn take_flashes(&self) -> Result<Vec<FlashMessage>, CoreError> {
        let messages = self.get(FLASH_KEY).await?.unwrap_or_default();
        self.remove(FLASH_KEY).await?;
        Ok(messages)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = CoreError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let cookies = Cookies::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| CoreError::InternalServerError(msg.to_string()))?;

        let id = session_id(&cookies, &state.session.key, &state.session.cookie_name);
        Ok(Session::new(id, state.session.store.clone()))
    }
}

/// 读取签名 cookie 中的会话 ID，缺失或被篡改时签发新的
fn session_id(cookies: &Cookies, key: &Key, cookie_name: &str) -> String {
    let signed = cookies.signed(key);
    if let Some(cookie) = signed.get(cookie_name) {
        return cookie.value().to_string();
    }

    let id = Uuid::new_v4().to_string();
    let mut cookie = Cookie::new(cookie_name.to_string(), id.clone());
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookie.set_same_site(SameSite::Lax);
    signed.add(cookie);
    id
}

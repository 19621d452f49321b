//! 应用共享状态

use sha2::{Digest, Sha512};
use std::sync::Arc;
use tower_cookies::cookie::Key;

use super::{
    error::CoreError,
    session::{MemorySessionStore, SessionStore},
    view::Views,
};
use crate::{
    app::{
        category::{CategoryRepository, CategoryService},
        product::{ProductRepository, ProductService},
        user::{UserRepository, UserService},
    },
    infrastructure::{config::SessionConfig, memory::MemoryStore},
};

/// 三个实体的存储实现
#[derive(Clone)]
pub struct Repositories {
    pub categories: Arc<dyn CategoryRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Repositories {
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        use crate::app::{
            category::PgCategoryRepository, product::PgProductRepository,
            user::PgUserRepository,
        };

        Self {
            categories: Arc::new(PgCategoryRepository::new(pool.clone())),
            products: Arc::new(PgProductRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            categories: store.clone(),
            products: store.clone(),
            users: store,
        }
    }
}

/// 会话相关状态
#[derive(Clone)]
pub struct SessionState {
    pub store: Arc<dyn SessionStore>,
    pub key: Key,
    pub cookie_name: String,
}

impl SessionState {
    pub fn new(config: &SessionConfig, store: Arc<dyn SessionStore>) -> Self {
        // 签名密钥需要 64 字节，由配置的密钥字符串派生
        let digest = Sha512::digest(config.secret.as_bytes());
        Self {
            store,
            key: Key::from(digest.as_slice()),
            cookie_name: config.cookie_name.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub category_service: CategoryService,
    pub product_service: ProductService,
    pub user_service: UserService,
    pub views: Views,
    pub session: SessionState,
}

impl AppState {
    pub fn new(repositories: Repositories, session: SessionState) -> Result<Self, CoreError> {
        Ok(Self {
            category_service: CategoryService::new(repositories.categories),
            product_service: ProductService::new(repositories.products),
            user_service: UserService::new(repositories.users),
            views: Views::new()?,
            session,
        })
    }

    /// 全内存状态，供测试与 `memory` 存储后端使用
    pub fn in_memory(config: &SessionConfig) -> Result<Self, CoreError> {
        let session = SessionState::new(config, Arc::new(MemorySessionStore::new(config.idle_timeout())));
        Self::new(Repositories::in_memory(), session)
    }
}

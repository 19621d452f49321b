//! 用户业务服务

use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, warn};
use validator::Validate;

use super::{
    model::{NewUser, SignUpRequest, UpdateUserRequest, User},
    repository::UserRepository,
};
use crate::{
    core::error::CoreError,
    infrastructure::password::{hash_password, verify_password, PasswordError},
};

#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    /// 未知用户登录时用于校验的占位哈希，首次使用时生成
    dummy_hash: Arc<OnceCell<String>>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self {
            repository,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    pub async fn all(&self) -> Result<Vec<User>, CoreError> {
        self.repository.all().await
    }

    pub async fn get(&self, id: i32) -> Result<Option<User>, CoreError> {
        self.repository.get(id).await
    }

    /// 注册：校验输入，哈希密码后写入
    pub async fn create_account(&self, request: SignUpRequest) -> Result<User, CoreError> {
        let request = request.normalized();
        request.validate()?;

        let password = request.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| CoreError::InternalServerError(e.to_string()))?
            .map_err(|e| CoreError::InternalServerError(e.to_string()))?;

        let user = self
            .repository
            .insert(&NewUser {
                username: request.username,
                email: request.email,
                full_name: request.full_name,
                password_hash,
            })
            .await?;

        info!("Created user: {} ({})", user.username, user.id);
        Ok(user)
    }

    /// 目标不存在时返回 `Ok(false)`
    pub async fn update(&self, id: i32, changes: UpdateUserRequest) -> Result<bool, CoreError> {
        let changes = changes.normalized();
        changes.validate()?;

        let updated = self.repository.update(id, &changes).await?;
        if updated {
            info!("Updated user: {}", id);
        }
        Ok(updated)
    }

    pub async fn delete(&self, id: i32) -> Result<bool, CoreError> {
        let deleted = self.repository.delete(id).await?;
        if deleted {
            info!("Deleted user: {}", id);
        }
        Ok(deleted)
    }

    /// 凭据匹配返回 `Some(user)`；用户不存在或密码错误都返回 `None`
    ///
    /// 用户不存在时也对一个占位哈希做一次校验，两种失败耗时相同。
    pub async fn find_by_credentials(
        &self,
        login: &str,
        password: &str,
    ) -> Result<Option<User>, CoreError> {
        let Some(user) = self.repository.find_by_login(login.trim()).await? else {
            let dummy = self.dummy_hash().await?;
            let _ = verify_blocking(password, dummy).await?;
            return Ok(None);
        };

        match verify_blocking(password, &user.password_hash).await? {
            Ok(true) => Ok(Some(user)),
            Ok(false) => Ok(None),
            Err(e) => {
                warn!("Stored password hash for user {} is unusable: {}", user.id, e);
                Ok(None)
            }
        }
    }

    async fn dummy_hash(&self) -> Result<&str, CoreError> {
        let hash = self
            .dummy_hash
            .get_or_try_init(|| async {
                match tokio::task::spawn_blocking(|| hash_password("not-a-real-password")).await {
                    Ok(hashed) => hashed.map_err(|e| CoreError::InternalServerError(e.to_string())),
                    Err(e) => Err(CoreError::InternalServerError(e.to_string())),
                }
            })
            .await?;
        Ok(hash.as_str())
    }
}

async fn verify_blocking(
    password: &str,
    hash: &str,
) -> Result<Result<bool, PasswordError>, CoreError> {
    let password = password.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| CoreError::InternalServerError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::MemoryStore;

    fn service() -> UserService {
        UserService::new(Arc::new(MemoryStore::new()))
    }

    fn sign_up(username: &str, email: &str) -> SignUpRequest {
        SignUpRequest {
            username: username.to_string(),
            email: email.to_string(),
            full_name: Some("Ada Lovelace".to_string()),
            password: "analytical".to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_up_then_login() {
        let service = service();
        let created = service
            .create_account(sign_up("ada", "ada@example.com"))
            .await
            .unwrap();

        assert_ne!(created.password_hash, "analytical");

        let by_username = service.find_by_credentials("ada", "analytical").await.unwrap();
        assert_eq!(by_username.map(|u| u.id), Some(created.id));

        let by_email = service
            .find_by_credentials("ada@example.com", "analytical")
            .await
            .unwrap();
        assert_eq!(by_email.map(|u| u.id), Some(created.id));
    }

    #[tokio::test]
    async fn test_wrong_password_or_unknown_user() {
        let service = service();
        service
            .create_account(sign_up("ada", "ada@example.com"))
            .await
            .unwrap();

        assert!(service.find_by_credentials("ada", "wrong").await.unwrap().is_none());
        assert!(service.dummy_hash.get().is_none());
        assert!(service.find_by_credentials("bob", "analytical").await.unwrap().is_none());
        // 未知用户同样走了一次哈希校验
        assert!(service.dummy_hash.get().is_some());
        assert!(service.find_by_credentials("carol", "analytical").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let service = service();
        service
            .create_account(sign_up("ada", "ada@example.com"))
            .await
            .unwrap();

        let err = service
            .create_account(sign_up("ada", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
        assert_eq!(service.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_sign_up_is_rejected() {
        let mut request = sign_up("ada", "not-an-email");
        request.password = "123".to_string();

        let err = service().create_account(request).await.unwrap_err();
        match err {
            CoreError::BadRequest(msg) => {
                assert!(msg.contains("Invalid email format"));
                assert!(msg.contains("Password must be at least 6 characters"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fields_are_trimmed_before_validation() {
        let service = service();
        for username in ["   ", " ab "] {
            let err = service
                .create_account(sign_up(username, "ada@example.com"))
                .await
                .unwrap_err();
            assert!(matches!(err, CoreError::BadRequest(_)));
        }
        assert!(service.all().await.unwrap().is_empty());

        let created = service
            .create_account(sign_up("  ada  ", " ada@example.com "))
            .await
            .unwrap();
        assert_eq!(created.username, "ada");
        assert_eq!(created.email, "ada@example.com");

        let blank_email = UpdateUserRequest {
            email: "   ".to_string(),
            full_name: None,
        };
        let err = service.update(created.id, blank_email).await.unwrap_err();
        assert!(matches!(err, CoreError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_update_and_delete_user() {
        let service = service();
        let ada = service
            .create_account(sign_up("ada", "ada@example.com"))
            .await
            .unwrap();
        let grace = service
            .create_account(sign_up("grace", "grace@example.com"))
            .await
            .unwrap();

        let changes = UpdateUserRequest {
            email: "countess@example.com".to_string(),
            full_name: Some("  ".to_string()),
        };
        assert!(service.update(ada.id, changes).await.unwrap());
        let updated = service.get(ada.id).await.unwrap().unwrap();
        assert_eq!(updated.email, "countess@example.com");
        assert_eq!(updated.full_name, None);

        let taken = UpdateUserRequest {
            email: "grace@example.com".to_string(),
            full_name: None,
        };
        let err = service.update(ada.id, taken).await.unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));

        assert!(service.delete(grace.id).await.unwrap());
        assert!(!service.delete(grace.id).await.unwrap());
        let missing = UpdateUserRequest {
            email: "ghost@example.com".to_string(),
            full_name: None,
        };
        assert!(!service.update(grace.id, missing).await.unwrap());
    }
}

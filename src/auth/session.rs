// ==========================================
// 角色档案追踪 - 会话提供者
// ==========================================
// 职责: 向对账引擎提供当前用户与活动档案
// 说明: 登录/切换档案由外层认证流程调用 SessionState 的写方法
// ==========================================

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

// ==========================================
// SessionProvider Trait
// ==========================================
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// 当前登录用户（未登录返回 None）
    async fn current_user_id(&self) -> Option<String>;

    /// 用户的活动档案（未选择返回 None）
    async fn active_profile_id(&self, user_id: &str) -> Option<String>;
}

#[async_trait]
impl<T: SessionProvider + ?Sized> SessionProvider for Arc<T> {
    async fn current_user_id(&self) -> Option<String> {
        (**self).current_user_id().await
    }

    async fn active_profile_id(&self, user_id: &str) -> Option<String> {
        (**self).active_profile_id(user_id).await
    }
}

#[derive(Debug, Default)]
struct SessionInner {
    user_id: Option<String>,
    // user_id -> profile_id
    active_profiles: HashMap<String, String>,
}

// ==========================================
// SessionState - 进程内会话状态
// ==========================================
#[derive(Debug, Default)]
pub struct SessionState {
    inner: RwLock<SessionInner>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已登录且已选择档案的会话
    pub fn signed_in(user_id: &str, profile_id: &str) -> Self {
        let state = Self::new();
        state.sign_in(user_id);
        state.select_profile(profile_id);
        state
    }

    pub fn sign_in(&self, user_id: &str) {
        match self.inner.write() {
            Ok(mut inner) => {
                inner.user_id = Some(user_id.to_string());
                info!(user_id, "用户已登录");
            }
            Err(e) => warn!(error = %e, "会话锁已中毒，忽略登录"),
        }
    }

    /// 登出（保留各用户最后选择的档案）
    pub fn sign_out(&self) {
        match self.inner.write() {
            Ok(mut inner) => inner.user_id = None,
            Err(e) => warn!(error = %e, "会话锁已中毒，忽略登出"),
        }
    }

    /// 为当前用户选择活动档案
    ///
    /// # 返回
    /// - false: 未登录，未记录
    pub fn select_profile(&self, profile_id: &str) -> bool {
        let mut inner = match self.inner.write() {
            Ok(inner) => inner,
            Err(e) => {
                warn!(error = %e, "会话锁已中毒，忽略档案选择");
                return false;
            }
        };

        let Some(user_id) = inner.user_id.clone() else {
            warn!(profile_id, "未登录，无法选择档案");
            return false;
        };
        inner
            .active_profiles
            .insert(user_id, profile_id.to_string());
        true
    }
}

#[async_trait]
impl SessionProvider for SessionState {
    async fn current_user_id(&self) -> Option<String> {
        self.inner.read().ok().and_then(|inner| inner.user_id.clone())
    }

    async fn active_profile_id(&self, user_id: &str) -> Option<String> {
        self.inner
            .read()
            .ok()
            .and_then(|inner| inner.active_profiles.get(user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_anonymous_session() {
        let session = SessionState::new();
        assert_eq!(session.current_user_id().await, None);
        assert!(!session.select_profile("p1"));
    }

    #[tokio::test]
    async fn test_profile_survives_sign_out() {
        let session = SessionState::signed_in("u1", "p1");
        assert_eq!(session.current_user_id().await.as_deref(), Some("u1"));
        assert_eq!(session.active_profile_id("u1").await.as_deref(), Some("p1"));

        session.sign_out();
        assert_eq!(session.current_user_id().await, None);

        session.sign_in("u1");
        assert_eq!(session.active_profile_id("u1").await.as_deref(), Some("p1"));
        assert_eq!(session.active_profile_id("u2").await, None);
    }
}

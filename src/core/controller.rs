//! 刷新控制器：加载/刷新生命周期与并发护栏
//!
//! 快照由单一逻辑写者每周期写入一次；重叠的 refresh 被拒绝而非排队。
//! 派生进度按数据版本显式记忆化：读取时始终反映最新文档计数，
//! 底层记录不变则不重算。

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::core::{
    ConnectionStatus, DashboardError, DashboardState, LoadError, SessionContext,
};
use crate::dashboard::{aggregate, derive, DashboardData};
use crate::sources::StudentDataSource;

/// 看板控制器：持有数据源、会话与当前快照
pub struct DashboardController {
    sources: Arc<dyn StudentDataSource>,
    session: SessionContext,
    state: RwLock<DashboardState>,
    /// 刷新护栏：在途刷新期间的再次调用为 no-op
    refresh_guard: AtomicBool,
    /// 成功加载计数，作为派生字段的记忆化键
    data_version: AtomicU64,
    progress_memo: RwLock<Option<(u64, u8)>>,
}

impl DashboardController {
    pub fn new(sources: Arc<dyn StudentDataSource>, session: SessionContext) -> Self {
        Self {
            sources,
            session,
            state: RwLock::new(DashboardState::default()),
            refresh_guard: AtomicBool::new(false),
            data_version: AtomicU64::new(0),
            progress_memo: RwLock::new(None),
        }
    }

    /// 加载：扇出聚合 + 派生合成，成功则发布新快照
    ///
    /// 顶层失败（区别于已被吸收的单源失败）置结构化可重试错误，
    /// 并保留上一份成功快照。
    pub async fn load(&self) {
        {
            let mut st = self.state.write().await;
            st.loading = true;
            st.error = None;
            st.connection = ConnectionStatus::Checking;
        }

        match self.run_cycle().await {
            Ok(data) => {
                let mut st = self.state.write().await;
                st.data = Some(data);
                st.connection = ConnectionStatus::Connected;
                st.last_updated = Some(Utc::now());
                st.loading = false;
                drop(st);
                self.data_version.fetch_add(1, Ordering::SeqCst);
            }
            Err(e) => {
                tracing::error!("Dashboard load failed: {}", e);
                let mut st = self.state.write().await;
                st.error = Some(LoadError::from_error(&e));
                st.connection = ConnectionStatus::Error;
                st.loading = false;
            }
        }
    }

    /// 单次加载周期：会话校验 → 扇出聚合 → 派生合成
    async fn run_cycle(&self) -> Result<DashboardData, DashboardError> {
        if !self.session.is_valid() {
            return Err(DashboardError::SessionExpired);
        }

        let records = aggregate::gather(self.sources.as_ref()).await;
        Ok(derive::compose(records, Utc::now()))
    }

    /// 刷新：已有刷新在途时为 no-op，否则等同于带 refreshing 标记的 load
    pub async fn refresh(&self) {
        if self
            .refresh_guard
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("Refresh already in flight, ignoring");
            return;
        }

        self.state.write().await.refreshing = true;
        self.load().await;
        self.state.write().await.refreshing = false;
        self.refresh_guard.store(false, Ordering::SeqCst);
    }

    /// 重试 = 重新执行 load
    pub async fn retry(&self) {
        self.load().await;
    }

    /// 当前快照（克隆供渲染层使用）
    pub async fn state(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    /// 按最新文档计数派生的总体进度，按数据版本记忆化
    ///
    /// 论文记录自带的 progress 可能过期；这里始终以 documents 为准。
    pub async fn effective_progress(&self) -> u8 {
        let version = self.data_version.load(Ordering::SeqCst);

        if let Some((cached_version, cached)) = *self.progress_memo.read().await {
            if cached_version == version {
                return cached;
            }
        }

        let computed = {
            let st = self.state.read().await;
            st.data
                .as_ref()
                .map(|d| derive::overall_progress(&d.documents))
                .unwrap_or(0)
        };

        *self.progress_memo.write().await = Some((version, computed));
        computed
    }

    /// 控制器绑定的会话上下文
    pub fn session(&self) -> &SessionContext {
        &self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::MockDataSource;

    #[tokio::test]
    async fn test_session_expired_on_first_load_yields_error_state() {
        let session = SessionContext::new("est-1", "tok");
        session.sign_out();

        let controller =
            DashboardController::new(Arc::new(MockDataSource::healthy()), session);
        controller.load().await;

        let state = controller.state().await;
        assert!(!state.loading);
        assert_eq!(state.connection, ConnectionStatus::Error);
        assert!(state.data.is_none());
        let err = state.error.unwrap();
        assert_eq!(err.code, "session_expired");
        assert!(err.retryable);
    }

    #[tokio::test]
    async fn test_effective_progress_memoized_per_version() {
        let controller = DashboardController::new(
            Arc::new(MockDataSource::healthy()),
            SessionContext::new("est-1", "tok"),
        );
        controller.load().await;

        // healthy 样本：plan 与 diagnostico 两个阶段有已批准文档
        assert_eq!(controller.effective_progress().await, 40);

        // 版本未变 → 第二次读取命中缓存
        assert_eq!(controller.effective_progress().await, 40);
        let memo = *controller.progress_memo.read().await;
        assert_eq!(memo, Some((1, 40)));
    }

    #[tokio::test]
    async fn test_effective_progress_tracks_fresh_documents() {
        // 论文记录声称 20%，文档计数推出 40% → 以文档为准
        let controller = DashboardController::new(
            Arc::new(MockDataSource::healthy()),
            SessionContext::new("est-1", "tok"),
        );
        controller.load().await;

        let state = controller.state().await;
        assert_eq!(state.data.unwrap().thesis.progress, 20);
        assert_eq!(controller.effective_progress().await, 40);
    }
}

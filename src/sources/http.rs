//! HTTP 数据源（生产后端）
//!
//! 通过 REST 接口逐分类拉取记录：base_url 来自配置，Bearer token 与学号来自会话上下文。
//! 请求超时属于客户端配置（[backend] 段）；引擎层面对数据源调用不设超时。

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::config::BackendSection;
use crate::core::SessionContext;
use crate::dashboard::{AdvisorInfo, DocumentsStats, GuideInfo, ThesisInfo, UserInfo};
use crate::sources::{SourceError, StudentDataSource};

/// REST 后端客户端：每个分类一个 GET 端点
pub struct HttpDataSource {
    client: reqwest::Client,
    base_url: String,
    student_id: String,
    token: String,
}

impl HttpDataSource {
    pub fn new(backend: &BackendSection, session: &SessionContext) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = backend.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Self {
            client: builder.build().unwrap_or_else(|_| reqwest::Client::new()),
            base_url: backend.base_url.trim_end_matches('/').to_string(),
            student_id: session.student_id().to_string(),
            token: session.auth_token().to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, SourceError> {
        let url = format!("{}/api/students/{}/{}", self.base_url, self.student_id, path);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(SourceError::Unauthorized);
        }
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| SourceError::Decode(e.to_string()))
    }
}

#[async_trait]
impl StudentDataSource for HttpDataSource {
    async fn fetch_user(&self) -> Result<UserInfo, SourceError> {
        self.get_json("profile").await
    }

    async fn fetch_thesis(&self) -> Result<ThesisInfo, SourceError> {
        self.get_json("thesis").await
    }

    async fn fetch_documents(&self) -> Result<DocumentsStats, SourceError> {
        // 通过率在本端重算，后端给的值不作数
        let mut stats: DocumentsStats = self.get_json("documents/stats").await?;
        stats.recompute_approval_rate();
        Ok(stats)
    }

    async fn fetch_advisor(&self) -> Result<AdvisorInfo, SourceError> {
        self.get_json("advisor").await
    }

    async fn fetch_guides(&self) -> Result<GuideInfo, SourceError> {
        self.get_json("guides").await
    }
}

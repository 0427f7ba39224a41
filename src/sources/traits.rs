//! 学生数据源抽象
//!
//! 五个相互独立的检索操作（用户 / 论文 / 文档 / 导师 / 指南）由同一 trait 提供。
//! 契约：每个操作要么返回完整的分类记录，要么失败；不接受部分记录。
//! 引擎不为调用设定超时，也不重试（重试由用户发起的 load/refresh 承担）。

use async_trait::async_trait;
use thiserror::Error;

use crate::dashboard::{AdvisorInfo, DocumentsStats, GuideInfo, ThesisInfo, UserInfo};

/// 数据源错误（网络、鉴权、后端状态、解码）
#[derive(Error, Debug, Clone)]
pub enum SourceError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Backend returned status {0}")]
    Status(u16),

    #[error("Decode error: {0}")]
    Decode(String),
}

/// 五个分类标识（聚合器日志与失败注入用）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceCategory {
    User,
    Thesis,
    Documents,
    Advisor,
    Guides,
}

impl SourceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceCategory::User => "user",
            SourceCategory::Thesis => "thesis",
            SourceCategory::Documents => "documents",
            SourceCategory::Advisor => "advisor",
            SourceCategory::Guides => "guides",
        }
    }
}

/// 学生数据源 trait：五个检索操作
#[async_trait]
pub trait StudentDataSource: Send + Sync {
    async fn fetch_user(&self) -> Result<UserInfo, SourceError>;

    async fn fetch_thesis(&self) -> Result<ThesisInfo, SourceError>;

    async fn fetch_documents(&self) -> Result<DocumentsStats, SourceError>;

    async fn fetch_advisor(&self) -> Result<AdvisorInfo, SourceError>;

    async fn fetch_guides(&self) -> Result<GuideInfo, SourceError>;
}

//! 看板错误类型
//!
//! 两类错误：单源失败在聚合器内被吸收，不会出现在这里；
//! 顶层加载失败以结构化、可重试的 LoadError 暴露给调用方。

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 顶层加载错误（数据源层错误已在扇出聚合器中落为默认记录）
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Session expired")]
    SessionExpired,

    #[error("Load failed: {0}")]
    LoadFailed(String),
}

/// 暴露给调用方的结构化错误对象；本引擎产生的加载失败均可重试
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    pub retryable: bool,
}

impl LoadError {
    pub fn from_error(err: &DashboardError) -> Self {
        let (code, message) = match err {
            DashboardError::SessionExpired => ("session_expired", "Tu sesión ha expirado"),
            DashboardError::LoadFailed(_) => ("load_failed", "No se pudo cargar el panel"),
        };

        Self {
            code: code.to_string(),
            message: message.to_string(),
            details: Some(err.to_string()),
            retryable: true,
        }
    }
}

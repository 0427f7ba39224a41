//! 看板状态快照
//!
//! 生命周期：idle → loading → {ready, errored}；ready → refreshing → {ready, errored}。
//! 快照仅由 Load/Refresh 周期写入（单一逻辑写者），进程重启不保留。

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::LoadError;
use crate::dashboard::DashboardData;

/// 后端连通状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Checking,
    Connected,
    Error,
}

/// 供渲染层读取的状态快照
#[derive(Debug, Clone, Serialize)]
pub struct DashboardState {
    pub loading: bool,
    pub error: Option<LoadError>,
    pub data: Option<DashboardData>,
    pub connection: ConnectionStatus,
    pub last_updated: Option<DateTime<Utc>>,
    pub refreshing: bool,
}

impl Default for DashboardState {
    fn default() -> Self {
        // 首次挂载即处于加载中
        Self {
            loading: true,
            error: None,
            data: None,
            connection: ConnectionStatus::Checking,
            last_updated: None,
            refreshing: false,
        }
    }
}

//! Faro - 学生学业看板引擎
//!
//! 模块划分：
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误类型、会话上下文、状态快照与刷新控制器
//! - **dashboard**: 数据模型、扇出聚合器与纯函数派生引擎
//! - **observability**: tracing 日志初始化
//! - **sources**: 学生数据源抽象与实现（HTTP / Mock）

pub mod config;
pub mod core;
pub mod dashboard;
pub mod observability;
pub mod sources;

pub use crate::core::{DashboardController, SessionContext};
pub use crate::dashboard::{DashboardData, RecordSet};

//! 核心层：错误类型、会话上下文、状态快照与刷新控制器

pub mod controller;
pub mod error;
pub mod session;
pub mod state;

pub use controller::DashboardController;
pub use error::{DashboardError, LoadError};
pub use session::SessionContext;
pub use state::{ConnectionStatus, DashboardState};

//! 会话上下文：显式身份与生命周期
//!
//! 身份在会话开始时获取、登出时失效；聚合器与适配器只从这里取身份，
//! 不读取任何环境全局状态。失效通过 CancellationToken 广播，
//! 克隆出的上下文共享同一令牌。

use tokio_util::sync::CancellationToken;

/// 已认证学生的会话上下文
#[derive(Debug, Clone)]
pub struct SessionContext {
    student_id: String,
    token: String,
    invalidated: CancellationToken,
}

impl SessionContext {
    pub fn new(student_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            token: token.into(),
            invalidated: CancellationToken::new(),
        }
    }

    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    pub fn auth_token(&self) -> &str {
        &self.token
    }

    /// 登出：使所有克隆出的上下文同时失效
    pub fn sign_out(&self) {
        self.invalidated.cancel();
    }

    pub fn is_valid(&self) -> bool {
        !self.invalidated.is_cancelled()
    }

    /// 失效令牌（供需要联动取消的组件监听）
    pub fn invalidation_token(&self) -> CancellationToken {
        self.invalidated.clone()
    }
}

//! Faro - 学生学业看板演示入口
//!
//! 初始化日志，用 Mock 数据源跑一个完整的加载周期，并以 JSON 打印合成视图。

use std::sync::Arc;

use anyhow::Context;
use faro::core::{DashboardController, SessionContext};
use faro::sources::MockDataSource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    faro::observability::init();

    let session = SessionContext::new("est-0001", "token-demo");
    let sources = Arc::new(MockDataSource::healthy());
    let controller = DashboardController::new(sources, session);

    controller.load().await;

    let state = controller.state().await;
    let json =
        serde_json::to_string_pretty(&state).context("Failed to serialize dashboard state")?;
    println!("{}", json);

    tracing::info!(
        "Overall progress (derived from documents): {}%",
        controller.effective_progress().await
    );

    Ok(())
}

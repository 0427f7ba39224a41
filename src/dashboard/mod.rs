//! 看板层：数据模型、扇出聚合器与派生引擎

pub mod aggregate;
pub mod derive;
pub mod types;

pub use aggregate::{gather, RecordSet};
pub use derive::{
    activity_timeline, compose, guide_task, next_action, overall_progress, pending_tasks,
    priority_color, quick_actions, status_color, time_ago, time_ago_from, INVALID_DATE_LABEL,
};
pub use types::{
    ActionColor, ActivityEvent, ActivityKind, AdvisorInfo, DashboardData, DocumentsStats,
    GuideInfo, PendingTask, PhaseDocCounts, PhaseInfo, QuickAction, TaskKind, TaskPriority,
    ThesisInfo, ThesisStatus, UserInfo, PHASE_IDS, PHASE_NAMES,
};

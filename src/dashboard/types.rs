//! 看板数据模型
//!
//! 所有分类记录始终完整填充：每个类型提供 `fallback()` 静态默认记录，
//! 单源失败时由聚合器整体替换为该默认值，字段永不缺失。
//! 枚举均为闭集，序列化为 snake_case。

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 论文五个固定阶段标识（有序）
pub const PHASE_IDS: [&str; 5] = [
    "plan",
    "diagnostico",
    "marco_teorico",
    "desarrollo",
    "resultados",
];

/// 阶段显示名，与 PHASE_IDS 一一对应
pub const PHASE_NAMES: [&str; 5] = [
    "Plan de trabajo",
    "Diagnóstico",
    "Marco teórico",
    "Desarrollo",
    "Resultados",
];

/// 用户信息（每次加载的不可变快照）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub name: String,
    pub role: String,
    pub role_label: String,
    pub program: String,
    pub profile_complete: bool,
    pub email: String,
}

impl UserInfo {
    pub fn fallback() -> Self {
        Self {
            name: "Estudiante".to_string(),
            role: "student".to_string(),
            role_label: "Estudiante".to_string(),
            program: String::new(),
            profile_complete: false,
            email: String::new(),
        }
    }
}

/// 论文状态（闭集）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThesisStatus {
    NoThesis,
    Propuesta,
    Desarrollo,
    Revision,
    Sustentacion,
    Completed,
}

/// 当前阶段信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseInfo {
    /// 阶段序号 1-5
    pub number: u8,
    pub name: String,
    /// 本阶段进度 0-100
    pub progress: u8,
    pub completed: bool,
    pub unlocked: bool,
    pub documents_required: u32,
    pub documents_completed: u32,
}

impl PhaseInfo {
    pub fn fallback() -> Self {
        Self {
            number: 1,
            name: PHASE_NAMES[0].to_string(),
            progress: 0,
            completed: false,
            unlocked: true,
            documents_required: 0,
            documents_completed: 0,
        }
    }
}

/// 论文记录；`has_thesis = false` 时其余字段为默认值，而非缺失
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThesisInfo {
    pub has_thesis: bool,
    pub id: String,
    pub title: String,
    pub description: String,
    pub phase: PhaseInfo,
    /// 总体进度 0-100（后端记录值；展示层应优先用按文档重算的派生进度）
    pub progress: u8,
    pub days_remaining: u32,
    pub next_deadline: Option<DateTime<Utc>>,
    pub status: ThesisStatus,
}

impl ThesisInfo {
    pub fn fallback() -> Self {
        Self {
            has_thesis: false,
            id: String::new(),
            title: String::new(),
            description: String::new(),
            phase: PhaseInfo::fallback(),
            progress: 0,
            days_remaining: 0,
            next_deadline: None,
            status: ThesisStatus::NoThesis,
        }
    }
}

/// 单阶段文档计数
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhaseDocCounts {
    pub uploaded: u32,
    pub approved: u32,
    pub pending: u32,
    pub rejected: u32,
}

/// 文档统计
///
/// `by_phase` 键为五个固定阶段标识；未知键按「不存在」处理，查询方不得报错。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsStats {
    pub total_uploaded: u32,
    pub approved: u32,
    pub pending: u32,
    pub rejected: u32,
    pub by_phase: HashMap<String, PhaseDocCounts>,
    pub last_upload: Option<DateTime<Utc>>,
    /// 通过率 = approved / total × 100；total = 0 时为 0
    pub approval_rate: f32,
}

impl DocumentsStats {
    pub fn fallback() -> Self {
        Self {
            total_uploaded: 0,
            approved: 0,
            pending: 0,
            rejected: 0,
            by_phase: HashMap::new(),
            last_upload: None,
            approval_rate: 0.0,
        }
    }

    /// 按当前计数重算通过率（total = 0 时为 0）
    pub fn recompute_approval_rate(&mut self) {
        self.approval_rate = if self.total_uploaded == 0 {
            0.0
        } else {
            self.approved as f32 / self.total_uploaded as f32 * 100.0
        };
    }
}

/// 导师记录；`has_advisor = false` 时其余字段为默认值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorInfo {
    pub has_advisor: bool,
    pub id: String,
    pub name: String,
    pub email: String,
    pub specialty: String,
    /// 固定为 false：无在线通道
    pub online: bool,
    pub response_time: String,
    pub students_assigned: u32,
}

impl AdvisorInfo {
    pub fn fallback() -> Self {
        Self {
            has_advisor: false,
            id: String::new(),
            name: String::new(),
            email: String::new(),
            specialty: String::new(),
            online: false,
            response_time: String::new(),
            students_assigned: 0,
        }
    }
}

/// 活动类型（闭集）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    DocumentUpload,
    DocumentApproval,
    DocumentRejection,
    Meeting,
    Comment,
    PhaseChange,
    ThesisRegistration,
    GuideDownload,
}

/// 活动时间线条目（合成条目，非逐条取自后端）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub id: String,
    pub kind: ActivityKind,
    pub title: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub icon: String,
    pub priority: TaskPriority,
}

/// 任务优先级（闭集）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

/// 待办任务类型（闭集）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    ResubmitDocument,
    UploadNextDocument,
    ScheduleMeeting,
    DownloadGuide,
    CompleteProfile,
    RegisterThesis,
}

/// 系统推荐的下一步行动
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingTask {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub kind: TaskKind,
    pub action_target: String,
    pub estimated_time: String,
    pub overdue: bool,
}

/// 快捷操作配色（闭集）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionColor {
    Blue,
    Green,
    Purple,
    Orange,
}

/// 固定导航快捷操作；仅 enabled 与徽标随数据变化
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickAction {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub icon: String,
    pub target: String,
    pub enabled: bool,
    pub badge: Option<u32>,
    pub badge_label: Option<String>,
    pub color: ActionColor,
    pub requires_thesis: bool,
}

/// 指南概览
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideInfo {
    pub has_new_guides: bool,
    pub total: u32,
    pub new_count: u32,
    pub last_upload: Option<DateTime<Utc>>,
    pub phases_with_guides: BTreeSet<String>,
}

impl GuideInfo {
    pub fn fallback() -> Self {
        Self {
            has_new_guides: false,
            total: 0,
            new_count: 0,
            last_upload: None,
            phases_with_guides: BTreeSet::new(),
        }
    }
}

/// 合成后的完整看板视图：五个分类记录 + 派生字段
///
/// 不变量：所有字段始终填充；单源失败只会让对应分类落到默认记录。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardData {
    pub user: UserInfo,
    pub thesis: ThesisInfo,
    pub documents: DocumentsStats,
    pub advisor: AdvisorInfo,
    pub guides: GuideInfo,
    pub activities: Vec<ActivityEvent>,
    pub pending_tasks: Vec<PendingTask>,
    pub quick_actions: Vec<QuickAction>,
}

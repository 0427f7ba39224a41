//! 派生引擎：进度计算、下一步行动、时间线合成与快捷操作
//!
//! 纯函数，无 I/O；时间由调用方传入。
//! 「当前阶段」取论文记录自带的阶段号，不从文档审批状态反推——它可能与
//! 按文档计算的阶段完成判断不一致，这里保留原语义而非修正。

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::dashboard::aggregate::RecordSet;
use crate::dashboard::types::*;

/// 无法解析的时间戳渲染为该固定标签
pub const INVALID_DATE_LABEL: &str = "fecha inválida";

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// 总体进度：五个固定阶段中 approved > 0 的阶段计为完成，round(k/5 × 100)
///
/// 没有任何上传时强制为 0，即使 by_phase 里残留旧计数。
pub fn overall_progress(documents: &DocumentsStats) -> u8 {
    if documents.total_uploaded == 0 {
        return 0;
    }

    let completed = PHASE_IDS
        .iter()
        .filter(|id| {
            documents
                .by_phase
                .get(**id)
                .map_or(false, |c| c.approved > 0)
        })
        .count();

    ((completed as f64 / PHASE_IDS.len() as f64) * 100.0).round() as u8
}

/// 阶段完成判定（按文档计数）：有已批准文档且没有在审文档
fn phase_is_complete(counts: &PhaseDocCounts) -> bool {
    counts.approved > 0 && counts.pending == 0
}

/// 下一步行动选择：按序取第一条命中的规则，最多返回一个任务
///
/// 1. 未注册论文 → 注册（high）
/// 2. 有被驳回文档 → 重新提交（high，overdue）
/// 3. 当前阶段尚无已批准文档 → 上传第一份文档（medium）
/// 4. 当前阶段已完成且不是第五阶段 → 开始下一阶段（medium）
/// 5. 无
pub fn next_action(thesis: &ThesisInfo, documents: &DocumentsStats) -> Option<PendingTask> {
    if !thesis.has_thesis {
        return Some(PendingTask {
            id: new_id(),
            title: "Registra tu tesis".to_string(),
            description: "Aún no tienes un proyecto de tesis registrado".to_string(),
            priority: TaskPriority::High,
            kind: TaskKind::RegisterThesis,
            action_target: "/tesis/registrar".to_string(),
            estimated_time: "15 min".to_string(),
            overdue: false,
        });
    }

    if documents.rejected > 0 {
        return Some(PendingTask {
            id: new_id(),
            title: "Reenvía los documentos observados".to_string(),
            description: format!(
                "Tienes {} documento(s) rechazado(s) por corregir",
                documents.rejected
            ),
            priority: TaskPriority::High,
            kind: TaskKind::ResubmitDocument,
            action_target: "/documentos".to_string(),
            estimated_time: "1 h".to_string(),
            overdue: true,
        });
    }

    let idx = (thesis.phase.number.max(1) as usize - 1).min(PHASE_IDS.len() - 1);
    let counts = documents
        .by_phase
        .get(PHASE_IDS[idx])
        .cloned()
        .unwrap_or_default();

    if counts.approved == 0 {
        return Some(PendingTask {
            id: new_id(),
            title: format!("Sube el primer documento de {}", PHASE_NAMES[idx]),
            description: "La fase actual todavía no tiene documentos aprobados".to_string(),
            priority: TaskPriority::Medium,
            kind: TaskKind::UploadNextDocument,
            action_target: "/documentos/subir".to_string(),
            estimated_time: "30 min".to_string(),
            overdue: false,
        });
    }

    if phase_is_complete(&counts) && idx + 1 < PHASE_IDS.len() {
        return Some(PendingTask {
            id: new_id(),
            title: "Inicia la siguiente fase".to_string(),
            description: format!("Ya puedes comenzar {}", PHASE_NAMES[idx + 1]),
            priority: TaskPriority::Medium,
            kind: TaskKind::UploadNextDocument,
            action_target: "/documentos/subir".to_string(),
            estimated_time: "30 min".to_string(),
            overdue: false,
        });
    }

    None
}

/// 新指南任务：有新指南时给一条 low 优先级提醒
pub fn guide_task(guides: &GuideInfo) -> Option<PendingTask> {
    if !guides.has_new_guides {
        return None;
    }

    Some(PendingTask {
        id: new_id(),
        title: "Revisa las guías nuevas".to_string(),
        description: format!("Tu asesor publicó {} guía(s) nueva(s)", guides.new_count),
        priority: TaskPriority::Low,
        kind: TaskKind::DownloadGuide,
        action_target: "/guias".to_string(),
        estimated_time: "10 min".to_string(),
        overdue: false,
    })
}

/// 待办列表 = 下一步行动 ++ 指南任务；最多两项，无需再排序
pub fn pending_tasks(
    thesis: &ThesisInfo,
    documents: &DocumentsStats,
    guides: &GuideInfo,
) -> Vec<PendingTask> {
    next_action(thesis, documents)
        .into_iter()
        .chain(guide_task(guides))
        .collect()
}

/// 活动时间线：由统计合成的汇总条目，按时间降序（稳定排序，平局保持插入序）
pub fn activity_timeline(documents: &DocumentsStats, now: DateTime<Utc>) -> Vec<ActivityEvent> {
    let mut events = Vec::new();
    let anchor = documents.last_upload.unwrap_or(now);

    if documents.total_uploaded > 0 {
        events.push(ActivityEvent {
            id: new_id(),
            kind: ActivityKind::DocumentUpload,
            title: "Documentos subidos".to_string(),
            description: format!(
                "Has subido {} documento(s) en total",
                documents.total_uploaded
            ),
            timestamp: anchor,
            icon: "upload".to_string(),
            priority: TaskPriority::Medium,
        });
    }

    if documents.approved > 0 {
        events.push(ActivityEvent {
            id: new_id(),
            kind: ActivityKind::DocumentApproval,
            title: "Documentos aprobados".to_string(),
            description: format!("{} documento(s) aprobado(s) por tu asesor", documents.approved),
            timestamp: anchor,
            icon: "check".to_string(),
            priority: TaskPriority::Low,
        });
    }

    events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    events
}

/// 快捷操作：固定四项、标识稳定；仅 enabled 与徽标随数据变化
pub fn quick_actions(
    thesis: &ThesisInfo,
    documents: &DocumentsStats,
    guides: &GuideInfo,
) -> Vec<QuickAction> {
    let nonzero = |n: u32| if n > 0 { Some(n) } else { None };

    let (thesis_title, thesis_subtitle, thesis_target) = if thesis.has_thesis {
        (
            "Mi tesis",
            "Consulta el estado de tu proyecto",
            "/tesis",
        )
    } else {
        (
            "Registrar tesis",
            "Comienza tu proyecto de tesis",
            "/tesis/registrar",
        )
    };

    vec![
        QuickAction {
            id: "upload_document".to_string(),
            title: "Subir documento".to_string(),
            subtitle: "Envía un avance a revisión".to_string(),
            icon: "upload".to_string(),
            target: "/documentos/subir".to_string(),
            enabled: thesis.has_thesis,
            badge: None,
            badge_label: None,
            color: ActionColor::Blue,
            requires_thesis: true,
        },
        QuickAction {
            id: "view_documents".to_string(),
            title: "Mis documentos".to_string(),
            subtitle: "Revisa el estado de tus entregas".to_string(),
            icon: "folder".to_string(),
            target: "/documentos".to_string(),
            enabled: true,
            badge: nonzero(documents.total_uploaded),
            badge_label: nonzero(documents.total_uploaded).map(|_| "documentos".to_string()),
            color: ActionColor::Green,
            requires_thesis: false,
        },
        QuickAction {
            id: "view_guides".to_string(),
            title: "Guías".to_string(),
            subtitle: "Material publicado por tu asesor".to_string(),
            icon: "book".to_string(),
            target: "/guias".to_string(),
            enabled: true,
            badge: nonzero(guides.new_count),
            badge_label: nonzero(guides.new_count).map(|_| "nuevas".to_string()),
            color: ActionColor::Purple,
            requires_thesis: false,
        },
        QuickAction {
            id: "thesis".to_string(),
            title: thesis_title.to_string(),
            subtitle: thesis_subtitle.to_string(),
            icon: "graduation-cap".to_string(),
            target: thesis_target.to_string(),
            enabled: true,
            badge: None,
            badge_label: None,
            color: ActionColor::Orange,
            requires_thesis: false,
        },
    ]
}

/// 相对时间：解析 RFC 3339 时间戳并按最粗适用单位渲染；解析失败返回固定标签
pub fn time_ago(raw: &str, now: DateTime<Utc>) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => time_ago_from(ts.with_timezone(&Utc), now),
        Err(_) => INVALID_DATE_LABEL.to_string(),
    }
}

/// 最粗适用单位：天 > 小时 > 分钟 > 刚刚
pub fn time_ago_from(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(ts);

    if delta.num_days() > 0 {
        spanish_ago(delta.num_days(), "día", "días")
    } else if delta.num_hours() > 0 {
        spanish_ago(delta.num_hours(), "hora", "horas")
    } else if delta.num_minutes() > 0 {
        spanish_ago(delta.num_minutes(), "minuto", "minutos")
    } else {
        "ahora mismo".to_string()
    }
}

fn spanish_ago(n: i64, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("hace 1 {}", singular)
    } else {
        format!("hace {} {}", n, plural)
    }
}

/// 优先级 → 展示色
pub fn priority_color(priority: TaskPriority) -> &'static str {
    match priority {
        TaskPriority::High => "red",
        TaskPriority::Medium => "amber",
        TaskPriority::Low => "green",
    }
}

/// 论文状态 → 展示色
pub fn status_color(status: ThesisStatus) -> &'static str {
    match status {
        ThesisStatus::NoThesis => "gray",
        ThesisStatus::Propuesta => "blue",
        ThesisStatus::Desarrollo => "amber",
        ThesisStatus::Revision => "purple",
        ThesisStatus::Sustentacion => "orange",
        ThesisStatus::Completed => "green",
    }
}

/// 合成完整看板视图：五分类记录 + 派生字段
///
/// 论文记录中的 progress 保持后端取回的原值；展示层用控制器的
/// `effective_progress()` 读取按最新文档重算的进度。
pub fn compose(records: RecordSet, now: DateTime<Utc>) -> DashboardData {
    let activities = activity_timeline(&records.documents, now);
    let pending = pending_tasks(&records.thesis, &records.documents, &records.guides);
    let actions = quick_actions(&records.thesis, &records.documents, &records.guides);

    DashboardData {
        user: records.user,
        thesis: records.thesis,
        documents: records.documents,
        advisor: records.advisor,
        guides: records.guides,
        activities,
        pending_tasks: pending,
        quick_actions: actions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    /// 构造文档统计：指定哪些阶段（按下标）有已批准文档
    fn docs_with_approved_phases(phases: &[usize]) -> DocumentsStats {
        let mut docs = DocumentsStats::fallback();
        for &i in phases {
            docs.by_phase.insert(
                PHASE_IDS[i].to_string(),
                PhaseDocCounts {
                    uploaded: 1,
                    approved: 1,
                    pending: 0,
                    rejected: 0,
                },
            );
            docs.total_uploaded += 1;
            docs.approved += 1;
        }
        docs.recompute_approval_rate();
        docs
    }

    fn thesis_in_phase(number: u8) -> ThesisInfo {
        let idx = (number.max(1) as usize - 1).min(4);
        let mut thesis = ThesisInfo::fallback();
        thesis.has_thesis = true;
        thesis.id = "tes-test".to_string();
        thesis.status = ThesisStatus::Desarrollo;
        thesis.phase.number = number;
        thesis.phase.name = PHASE_NAMES[idx].to_string();
        thesis
    }

    #[test]
    fn test_progress_forced_zero_without_uploads() {
        // by_phase 有旧的 approved 计数，但没有任何上传 → 进度强制为 0
        let mut docs = docs_with_approved_phases(&[0, 1, 2]);
        docs.total_uploaded = 0;
        assert_eq!(overall_progress(&docs), 0);
    }

    #[test]
    fn test_progress_per_completed_phase_count() {
        let expected = [0u8, 20, 40, 60, 80, 100];
        for k in 0..=5usize {
            let phases: Vec<usize> = (0..k).collect();
            let mut docs = docs_with_approved_phases(&phases);
            if k == 0 {
                // k = 0 也要有上传，否则命中「无上传强制 0」分支
                docs.total_uploaded = 1;
            }
            assert_eq!(overall_progress(&docs), expected[k], "k = {}", k);
        }
    }

    #[test]
    fn test_progress_ignores_unknown_phase_keys() {
        let mut docs = docs_with_approved_phases(&[0]);
        docs.by_phase.insert(
            "fase_fantasma".to_string(),
            PhaseDocCounts {
                uploaded: 9,
                approved: 9,
                pending: 0,
                rejected: 0,
            },
        );
        assert_eq!(overall_progress(&docs), 20);
    }

    #[test]
    fn test_next_action_register_thesis_wins() {
        // 无论文时无视文档与指南状态
        let thesis = ThesisInfo::fallback();
        let mut docs = docs_with_approved_phases(&[0]);
        docs.rejected = 3;

        let task = next_action(&thesis, &docs).unwrap();
        assert_eq!(task.kind, TaskKind::RegisterThesis);
        assert_eq!(task.priority, TaskPriority::High);
        assert!(!task.overdue);
    }

    #[test]
    fn test_next_action_rejected_beats_incomplete_phase() {
        // 当前阶段也未完成，但有驳回文档 → 重新提交优先
        let thesis = thesis_in_phase(2);
        let mut docs = docs_with_approved_phases(&[0]);
        docs.rejected = 1;

        let task = next_action(&thesis, &docs).unwrap();
        assert_eq!(task.kind, TaskKind::ResubmitDocument);
        assert_eq!(task.priority, TaskPriority::High);
        assert!(task.overdue);
    }

    #[test]
    fn test_next_action_upload_first_document_of_phase() {
        let thesis = thesis_in_phase(2);
        let docs = docs_with_approved_phases(&[0]);

        let task = next_action(&thesis, &docs).unwrap();
        assert_eq!(task.kind, TaskKind::UploadNextDocument);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert!(task.title.contains("Diagnóstico"));
    }

    #[test]
    fn test_next_action_begin_next_phase() {
        let thesis = thesis_in_phase(2);
        let docs = docs_with_approved_phases(&[0, 1]);

        let task = next_action(&thesis, &docs).unwrap();
        assert_eq!(task.kind, TaskKind::UploadNextDocument);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert!(task.description.contains("Marco teórico"));
    }

    #[test]
    fn test_next_action_none_when_final_phase_complete() {
        let thesis = thesis_in_phase(5);
        let docs = docs_with_approved_phases(&[0, 1, 2, 3, 4]);
        assert!(next_action(&thesis, &docs).is_none());
    }

    #[test]
    fn test_guide_task_carries_count() {
        let mut guides = GuideInfo::fallback();
        assert!(guide_task(&guides).is_none());

        guides.has_new_guides = true;
        guides.new_count = 2;
        let task = guide_task(&guides).unwrap();
        assert_eq!(task.kind, TaskKind::DownloadGuide);
        assert_eq!(task.priority, TaskPriority::Low);
        assert!(task.description.contains('2'));
    }

    #[test]
    fn test_pending_tasks_concatenation() {
        let thesis = ThesisInfo::fallback();
        let docs = DocumentsStats::fallback();
        let mut guides = GuideInfo::fallback();
        guides.has_new_guides = true;
        guides.new_count = 1;

        let tasks = pending_tasks(&thesis, &docs, &guides);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].kind, TaskKind::RegisterThesis);
        assert_eq!(tasks[1].kind, TaskKind::DownloadGuide);
    }

    #[test]
    fn test_timeline_synthesis_and_order() {
        let now = Utc::now();
        let mut docs = docs_with_approved_phases(&[0, 1]);
        docs.last_upload = Some(now - Duration::hours(2));

        let events = activity_timeline(&docs, now);
        assert_eq!(events.len(), 2);
        // 时间戳相同 → 稳定排序保持插入序：先上传汇总，后批准汇总
        assert_eq!(events[0].kind, ActivityKind::DocumentUpload);
        assert_eq!(events[1].kind, ActivityKind::DocumentApproval);

        let empty = activity_timeline(&DocumentsStats::fallback(), now);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_quick_actions_always_four_with_stable_ids() {
        let expected_ids = ["upload_document", "view_documents", "view_guides", "thesis"];

        for (thesis, docs, guides) in [
            (
                ThesisInfo::fallback(),
                DocumentsStats::fallback(),
                GuideInfo::fallback(),
            ),
            (
                thesis_in_phase(3),
                docs_with_approved_phases(&[0, 1]),
                GuideInfo::fallback(),
            ),
        ] {
            let actions = quick_actions(&thesis, &docs, &guides);
            assert_eq!(actions.len(), 4);
            for (action, expected) in actions.iter().zip(expected_ids) {
                assert_eq!(action.id, expected);
            }
        }
    }

    #[test]
    fn test_quick_actions_badges_and_thesis_variant() {
        let thesis = ThesisInfo::fallback();
        let docs = docs_with_approved_phases(&[0]);
        let mut guides = GuideInfo::fallback();
        guides.new_count = 2;
        guides.has_new_guides = true;

        let actions = quick_actions(&thesis, &docs, &guides);
        // 无论文：上传禁用，但论文操作本身始终可用且指向注册
        assert!(!actions[0].enabled);
        assert!(actions[3].enabled);
        assert_eq!(actions[3].target, "/tesis/registrar");
        assert_eq!(actions[1].badge, Some(1));
        assert_eq!(actions[2].badge, Some(2));

        let with_thesis = quick_actions(&thesis_in_phase(1), &docs, &guides);
        assert!(with_thesis[0].enabled);
        assert_eq!(with_thesis[3].target, "/tesis");

        // 计数为零时不显示徽标
        let bare = quick_actions(&thesis, &DocumentsStats::fallback(), &GuideInfo::fallback());
        assert_eq!(bare[1].badge, None);
        assert_eq!(bare[2].badge, None);
    }

    #[test]
    fn test_time_ago_hour_granularity() {
        let now = Utc::now();
        let raw = (now - Duration::minutes(90)).to_rfc3339();
        assert_eq!(time_ago(&raw, now), "hace 1 hora");
    }

    #[test]
    fn test_time_ago_invalid_date_label() {
        let now = Utc::now();
        assert_eq!(time_ago("no-es-una-fecha", now), INVALID_DATE_LABEL);
    }

    #[test]
    fn test_time_ago_units() {
        let now = Utc::now();
        assert_eq!(time_ago_from(now - Duration::days(3), now), "hace 3 días");
        assert_eq!(time_ago_from(now - Duration::days(1), now), "hace 1 día");
        assert_eq!(
            time_ago_from(now - Duration::minutes(5), now),
            "hace 5 minutos"
        );
        assert_eq!(time_ago_from(now - Duration::seconds(30), now), "ahora mismo");
    }

    #[test]
    fn test_color_lookups() {
        assert_eq!(priority_color(TaskPriority::High), "red");
        assert_eq!(priority_color(TaskPriority::Low), "green");
        assert_eq!(status_color(ThesisStatus::Completed), "green");
        assert_eq!(status_color(ThesisStatus::NoThesis), "gray");
    }
}

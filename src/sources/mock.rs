//! Mock 数据源（用于测试与演示，无需后端）
//!
//! 每个分类持有预置结果，可逐分类注入失败；`with_delay` 可模拟慢源，
//! 原子计数器记录检索调用总数（刷新护栏测试用）。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};

use crate::dashboard::{
    AdvisorInfo, DocumentsStats, GuideInfo, PhaseDocCounts, PhaseInfo, ThesisInfo, ThesisStatus,
    UserInfo, PHASE_IDS, PHASE_NAMES,
};
use crate::sources::{SourceCategory, SourceError, StudentDataSource};

/// Mock 数据源：预置结果 + 失败注入 + 调用计数
pub struct MockDataSource {
    user: Result<UserInfo, SourceError>,
    thesis: Result<ThesisInfo, SourceError>,
    documents: Result<DocumentsStats, SourceError>,
    advisor: Result<AdvisorInfo, SourceError>,
    guides: Result<GuideInfo, SourceError>,
    delay: Option<Duration>,
    fetches: Arc<AtomicUsize>,
}

impl MockDataSource {
    /// 有论文、有文档、有导师的「健康」学生样本
    pub fn healthy() -> Self {
        let now = Utc::now();

        let user = UserInfo {
            name: "Lucía Fernández".to_string(),
            role: "student".to_string(),
            role_label: "Estudiante".to_string(),
            program: "Ingeniería de Sistemas".to_string(),
            profile_complete: true,
            email: "lucia.fernandez@uni.example".to_string(),
        };

        let thesis = ThesisInfo {
            has_thesis: true,
            id: "tes-0042".to_string(),
            title: "Sistema de monitoreo de cultivos con sensores IoT".to_string(),
            description: "Plataforma de telemetría agrícola de bajo costo".to_string(),
            phase: PhaseInfo {
                number: 2,
                name: PHASE_NAMES[1].to_string(),
                progress: 50,
                completed: false,
                unlocked: true,
                documents_required: 2,
                documents_completed: 1,
            },
            progress: 20,
            days_remaining: 45,
            next_deadline: Some(now + ChronoDuration::days(45)),
            status: ThesisStatus::Desarrollo,
        };

        let mut documents = DocumentsStats {
            total_uploaded: 4,
            approved: 3,
            pending: 1,
            rejected: 0,
            by_phase: [
                (
                    PHASE_IDS[0].to_string(),
                    PhaseDocCounts {
                        uploaded: 2,
                        approved: 2,
                        pending: 0,
                        rejected: 0,
                    },
                ),
                (
                    PHASE_IDS[1].to_string(),
                    PhaseDocCounts {
                        uploaded: 2,
                        approved: 1,
                        pending: 1,
                        rejected: 0,
                    },
                ),
            ]
            .into_iter()
            .collect(),
            last_upload: Some(now - ChronoDuration::hours(3)),
            approval_rate: 0.0,
        };
        documents.recompute_approval_rate();

        let advisor = AdvisorInfo {
            has_advisor: true,
            id: "doc-0007".to_string(),
            name: "Dra. Carmen Rojas".to_string(),
            email: "carmen.rojas@uni.example".to_string(),
            specialty: "Metodología de la investigación".to_string(),
            online: false,
            response_time: "24 h".to_string(),
            students_assigned: 8,
        };

        let guides = GuideInfo {
            has_new_guides: true,
            total: 6,
            new_count: 2,
            last_upload: Some(now - ChronoDuration::days(1)),
            phases_with_guides: [PHASE_IDS[0].to_string(), PHASE_IDS[1].to_string()]
                .into_iter()
                .collect(),
        };

        Self {
            user: Ok(user),
            thesis: Ok(thesis),
            documents: Ok(documents),
            advisor: Ok(advisor),
            guides: Ok(guides),
            delay: None,
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// 刚入学、尚未注册论文的学生样本
    pub fn fresh_student() -> Self {
        let user = UserInfo {
            name: "Marco Quispe".to_string(),
            role: "student".to_string(),
            role_label: "Estudiante".to_string(),
            program: "Administración".to_string(),
            profile_complete: false,
            email: "marco.quispe@uni.example".to_string(),
        };

        Self {
            user: Ok(user),
            thesis: Ok(ThesisInfo::fallback()),
            documents: Ok(DocumentsStats::fallback()),
            advisor: Ok(AdvisorInfo::fallback()),
            guides: Ok(GuideInfo::fallback()),
            delay: None,
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// 替换论文记录
    pub fn with_thesis(mut self, thesis: ThesisInfo) -> Self {
        self.thesis = Ok(thesis);
        self
    }

    /// 替换文档统计
    pub fn with_documents(mut self, documents: DocumentsStats) -> Self {
        self.documents = Ok(documents);
        self
    }

    /// 替换指南概览
    pub fn with_guides(mut self, guides: GuideInfo) -> Self {
        self.guides = Ok(guides);
        self
    }

    /// 注入单分类失败
    pub fn failing(mut self, category: SourceCategory) -> Self {
        let err = SourceError::Transport("connection refused".to_string());
        match category {
            SourceCategory::User => self.user = Err(err),
            SourceCategory::Thesis => self.thesis = Err(err),
            SourceCategory::Documents => self.documents = Err(err),
            SourceCategory::Advisor => self.advisor = Err(err),
            SourceCategory::Guides => self.guides = Err(err),
        }
        self
    }

    /// 所有分类都失败（后端全挂）
    pub fn all_failing(self) -> Self {
        self.failing(SourceCategory::User)
            .failing(SourceCategory::Thesis)
            .failing(SourceCategory::Documents)
            .failing(SourceCategory::Advisor)
            .failing(SourceCategory::Guides)
    }

    /// 每次检索前 sleep，模拟慢源
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// 检索调用总数（五个操作合计）
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    async fn touch(&self) {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl StudentDataSource for MockDataSource {
    async fn fetch_user(&self) -> Result<UserInfo, SourceError> {
        self.touch().await;
        self.user.clone()
    }

    async fn fetch_thesis(&self) -> Result<ThesisInfo, SourceError> {
        self.touch().await;
        self.thesis.clone()
    }

    async fn fetch_documents(&self) -> Result<DocumentsStats, SourceError> {
        self.touch().await;
        self.documents.clone()
    }

    async fn fetch_advisor(&self) -> Result<AdvisorInfo, SourceError> {
        self.touch().await;
        self.advisor.clone()
    }

    async fn fetch_guides(&self) -> Result<GuideInfo, SourceError> {
        self.touch().await;
        self.guides.clone()
    }
}

//! 扇出聚合器
//!
//! 并发调用五个数据源操作并等待全部落定（all-settle）：任一失败不短路、
//! 不取消兄弟调用。失败的分类整体替换为其静态默认记录并记一条 warn 日志；
//! 本组件不向上抛错——只有在扇出开始前就抛出的错误才会到达顶层 Load。

use crate::dashboard::{AdvisorInfo, DocumentsStats, GuideInfo, ThesisInfo, UserInfo};
use crate::sources::{SourceCategory, SourceError, StudentDataSource};

/// 落定后的五分类记录集（派生引擎的输入）
#[derive(Debug, Clone)]
pub struct RecordSet {
    pub user: UserInfo,
    pub thesis: ThesisInfo,
    pub documents: DocumentsStats,
    pub advisor: AdvisorInfo,
    pub guides: GuideInfo,
}

/// 扇出五个检索并等待全部完成；逐结果落定为记录或默认值
pub async fn gather(sources: &dyn StudentDataSource) -> RecordSet {
    let (user, thesis, documents, advisor, guides) = tokio::join!(
        sources.fetch_user(),
        sources.fetch_thesis(),
        sources.fetch_documents(),
        sources.fetch_advisor(),
        sources.fetch_guides(),
    );

    RecordSet {
        user: settle(SourceCategory::User, user, UserInfo::fallback),
        thesis: settle(SourceCategory::Thesis, thesis, ThesisInfo::fallback),
        documents: settle(SourceCategory::Documents, documents, DocumentsStats::fallback),
        advisor: settle(SourceCategory::Advisor, advisor, AdvisorInfo::fallback),
        guides: settle(SourceCategory::Guides, guides, GuideInfo::fallback),
    }
}

fn settle<T>(
    category: SourceCategory,
    result: Result<T, SourceError>,
    fallback: fn() -> T,
) -> T {
    match result {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!(
                "Source '{}' failed ({}), substituting fallback record",
                category.as_str(),
                e
            );
            fallback()
        }
    }
}

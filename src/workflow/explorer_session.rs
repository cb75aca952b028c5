//! 题库浏览会话 - 流程层
//!
//! 持有只读数据集和分面索引，对外只暴露两个入口：
//! - `recompute`：筛选状态 → (结果列表, 展示数据)
//! - `export`：筛选状态 → 分页文档字节

use crate::error::ExportError;
use crate::models::question::{Dataset, Question};
use crate::models::selection::{SelectionEvent, SelectionState};
use crate::services::document_exporter::{DocumentExporter, FilterSummary};
use crate::services::export_grouper::group;
use crate::services::facet_index::{FacetIndex, FacetOptions};
use crate::services::filter_engine::{filter, ResultList};
use crate::services::result_presenter::{present, DisplayRecord};
use tracing::debug;

/// 一次重算的输出
#[derive(Debug, Clone)]
pub struct Recomputed<'a> {
    pub results: ResultList<'a>,
    pub display: Vec<DisplayRecord>,
}

impl Recomputed<'_> {
    /// 结果为空时界面应显示"无结果"
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// 题库浏览会话
///
/// 数据集加载后不再变化，索引只构建一次
pub struct ExplorerSession {
    dataset: Dataset,
    index: FacetIndex,
}

impl ExplorerSession {
    pub fn new(dataset: Dataset) -> Self {
        let index = FacetIndex::build(&dataset);
        debug!(
            "分面索引: {} 个年份, {} 个科目, {} 个考试",
            index.years().len(),
            index.subjects().len(),
            index.exams().len()
        );
        Self { dataset, index }
    }

    pub fn dataset(&self) -> &[Question] {
        &self.dataset
    }

    pub fn index(&self) -> &FacetIndex {
        &self.index
    }

    /// 应用界面事件，返回新的筛选状态
    pub fn apply(&self, selection: SelectionState, event: SelectionEvent) -> SelectionState {
        selection.apply(event, &self.index)
    }

    /// 当前可选的知识点
    pub fn topic_options(&self, selection: &SelectionState) -> FacetOptions {
        self.index.topic_options(&selection.subjects)
    }

    /// 当前可选的子知识点
    pub fn subtopic_options(&self, selection: &SelectionState) -> FacetOptions {
        self.index.subtopic_options(&selection.topics)
    }

    /// 完整重算一次结果，不做增量
    pub fn recompute(&self, selection: &SelectionState) -> Recomputed<'_> {
        let results = filter(&self.dataset, selection);
        let display = present(&results, &selection.search_term);
        Recomputed { results, display }
    }

    /// 导出当前筛选结果
    pub fn export(
        &self,
        selection: &SelectionState,
        exporter: &DocumentExporter,
    ) -> Result<Vec<u8>, ExportError> {
        let results = filter(&self.dataset, selection);
        let grouping = group(&results);
        let summary = FilterSummary::from_selection(selection, results.len());
        exporter.export(&grouping, &summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::selection::{Facet, SortOrder};

    fn q(subject: &str, year: i32, topic: &str, subtopic: &str, marks: i32, text: &str) -> Question {
        Question {
            subject: subject.to_string(),
            year,
            exam: Some("Board".to_string()),
            topic: topic.to_string(),
            subtopic: subtopic.to_string(),
            marks,
            question: text.to_string(),
        }
    }

    fn create_test_session() -> ExplorerSession {
        ExplorerSession::new(vec![
            q("Physics", 2020, "Thermo", "Conduction", 5, "Heat transfer in rods"),
            q("Physics", 2021, "Mechanics", "Friction", 5, "Static friction on a ramp"),
            q("Chemistry", 2020, "Organic", "Alkanes", 10, "Name the first alkane"),
        ])
    }

    #[test]
    fn test_recompute_with_highlight() {
        let session = create_test_session();
        let selection = session
            .apply(SelectionState::default(), SelectionEvent::Toggle(Facet::Subject, "Physics".to_string()))
            .apply(SelectionEvent::SetMarks("5".to_string()), session.index())
            .apply(SelectionEvent::SetSearch("heat".to_string()), session.index());

        let out = session.recompute(&selection);
        assert_eq!(out.results.len(), 2);
        assert_eq!(out.display.len(), 2);
        assert_eq!(out.display[0].highlights().collect::<Vec<_>>(), vec!["Heat"]);
        assert_eq!(out.display[1].highlights().count(), 0);
    }

    #[test]
    fn test_no_results_signal() {
        let session = create_test_session();
        let selection = session.apply(SelectionState::default(), SelectionEvent::SetMarks("7".to_string()));
        assert!(session.recompute(&selection).is_empty());
    }

    #[test]
    fn test_facet_options_follow_selection() {
        let session = create_test_session();
        let selection = SelectionState::default();
        assert!(!session.topic_options(&selection).enabled);

        let selection = session.apply(selection, SelectionEvent::Toggle(Facet::Subject, "Physics".to_string()));
        assert_eq!(session.topic_options(&selection).values, vec!["Mechanics", "Thermo"]);
        assert!(!session.subtopic_options(&selection).enabled);

        let selection = session.apply(selection, SelectionEvent::Toggle(Facet::Topic, "Thermo".to_string()));
        assert_eq!(session.subtopic_options(&selection).values, vec!["Conduction"]);
    }

    #[test]
    fn test_export_does_not_touch_state() {
        let session = create_test_session();
        let selection = session.apply(SelectionState::default(), SelectionEvent::SetSort(SortOrder::YearDesc));
        let before = selection.clone();

        let exporter = DocumentExporter::new(crate::services::document_exporter::ExportOptions {
            title: "T".to_string(),
            attribution: "A".to_string(),
            watermark_text: "W".to_string(),
        })
        .unwrap();
        let bytes = session.export(&selection, &exporter).unwrap();

        assert!(!bytes.is_empty());
        assert_eq!(selection, before);
        assert_eq!(session.dataset().len(), 3);
    }
}

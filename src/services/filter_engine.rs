//! 筛选引擎 - 业务能力层
//!
//! (数据集, 筛选状态) → 结果列表 的纯函数，不修改任何输入

use crate::models::question::Question;
use crate::models::selection::{SelectionState, SortOrder};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use tracing::debug;

/// 筛选后的有序结果，借用自数据集
pub type ResultList<'a> = Vec<&'a Question>;

/// 按筛选状态过滤并排序
pub fn filter<'a>(dataset: &'a [Question], selection: &SelectionState) -> ResultList<'a> {
    let mut results: ResultList<'a> = dataset
        .iter()
        .filter(|q| matches_selection(q, selection))
        .collect();

    sort_results(&mut results, selection.sort);

    debug!(
        "筛选完成: {}/{} 道题, 排序: {:?}",
        results.len(),
        dataset.len(),
        selection.sort
    );

    results
}

/// 单道题是否满足全部已激活的约束
pub fn matches_selection(q: &Question, selection: &SelectionState) -> bool {
    facet_allows(&selection.years, &q.year)
        && facet_allows(&selection.subjects, &q.subject)
        && facet_allows(&selection.topics, &q.topic)
        && facet_allows(&selection.subtopics, &q.subtopic)
        && exam_allows(&selection.exams, q.exam.as_deref())
        && selection.marks.matches(q.marks)
}

fn facet_allows<T: Ord>(selected: &BTreeSet<T>, value: &T) -> bool {
    selected.is_empty() || selected.contains(value)
}

// 缺少 exam 的题目只在考试分面未激活时出现
fn exam_allows(selected: &BTreeSet<String>, exam: Option<&str>) -> bool {
    if selected.is_empty() {
        return true;
    }
    exam.is_some_and(|e| selected.contains(e))
}

/// 稳定排序，相等键保持原有相对顺序
pub fn sort_results(results: &mut ResultList<'_>, order: SortOrder) {
    let compare: fn(&Question, &Question) -> Ordering = match order {
        SortOrder::Unsorted => return,
        SortOrder::YearAsc => |a, b| a.year.cmp(&b.year),
        SortOrder::YearDesc => |a, b| b.year.cmp(&a.year),
        SortOrder::MarksAsc => |a, b| a.marks.cmp(&b.marks),
        SortOrder::MarksDesc => |a, b| b.marks.cmp(&a.marks),
        SortOrder::TopicAsc => |a, b| a.topic.cmp(&b.topic),
        SortOrder::TopicDesc => |a, b| b.topic.cmp(&a.topic),
        SortOrder::SubtopicAsc => |a, b| a.subtopic.cmp(&b.subtopic),
        SortOrder::SubtopicDesc => |a, b| b.subtopic.cmp(&a.subtopic),
    };

    results.sort_by(|a, b| compare(a, b));
}

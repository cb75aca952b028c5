//! 筛选状态
//!
//! 选择状态是一个普通值：事件作用于旧状态，返回新状态，不存在全局可变状态

use crate::models::question::parse_whole_number;
use crate::services::facet_index::FacetIndex;
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, warn};

/// 分面类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    Year,
    Subject,
    Topic,
    Subtopic,
    Exam,
}

impl Facet {
    /// 导出封面和日志里使用的名称
    pub fn label(self) -> &'static str {
        match self {
            Facet::Year => "Years",
            Facet::Subject => "Subjects",
            Facet::Topic => "Topics",
            Facet::Subtopic => "Subtopics",
            Facet::Exam => "Exams",
        }
    }
}

/// 排序方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// 保持数据集原始顺序
    #[default]
    Unsorted,
    YearAsc,
    YearDesc,
    MarksAsc,
    MarksDesc,
    TopicAsc,
    TopicDesc,
    SubtopicAsc,
    SubtopicDesc,
}

/// 界面使用的排序键
static SORT_KEYS: phf::Map<&'static str, SortOrder> = phf::phf_map! {
    "" => SortOrder::Unsorted,
    "yearAsc" => SortOrder::YearAsc,
    "yearDesc" => SortOrder::YearDesc,
    "marksAsc" => SortOrder::MarksAsc,
    "marksDesc" => SortOrder::MarksDesc,
    "topicAsc" => SortOrder::TopicAsc,
    "topicDesc" => SortOrder::TopicDesc,
    "subtopicAsc" => SortOrder::SubtopicAsc,
    "subtopicDesc" => SortOrder::SubtopicDesc,
};

impl SortOrder {
    /// 从界面使用的排序键解析（如 "yearDesc"）
    pub fn from_key(key: &str) -> Option<Self> {
        SORT_KEYS.get(key.trim()).copied()
    }
}

/// 分值筛选
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MarksFilter {
    /// 不限
    #[default]
    Any,
    /// 精确匹配
    Exact(i32),
    /// 非数字输入，按字面相等处理，不会匹配任何题目
    Unmatchable(String),
}

impl MarksFilter {
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return MarksFilter::Any;
        }
        match parse_whole_number(trimmed) {
            Some(marks) => MarksFilter::Exact(marks),
            None => MarksFilter::Unmatchable(trimmed.to_string()),
        }
    }

    pub fn matches(&self, marks: i32) -> bool {
        match self {
            MarksFilter::Any => true,
            MarksFilter::Exact(expected) => *expected == marks,
            MarksFilter::Unmatchable(_) => false,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, MarksFilter::Any)
    }
}

impl fmt::Display for MarksFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarksFilter::Any => write!(f, "All"),
            MarksFilter::Exact(marks) => write!(f, "{}", marks),
            MarksFilter::Unmatchable(raw) => write!(f, "{}", raw),
        }
    }
}

/// 外部交互层发来的事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    /// 切换某个分面值的选中状态
    Toggle(Facet, String),
    /// 设置分值筛选（原始输入文本）
    SetMarks(String),
    SetSort(SortOrder),
    SetSearch(String),
    /// 重置全部筛选
    Reset,
}

/// 当前筛选状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub years: BTreeSet<i32>,
    pub subjects: BTreeSet<String>,
    pub topics: BTreeSet<String>,
    pub subtopics: BTreeSet<String>,
    pub exams: BTreeSet<String>,
    pub marks: MarksFilter,
    pub sort: SortOrder,
    /// 只用于高亮，不参与筛选
    pub search_term: String,
}

impl SelectionState {
    /// 应用一个事件，返回新的状态
    ///
    /// 科目变化后重新推导知识点候选集，知识点变化后重新推导子知识点候选集，
    /// 不再可达的选择会被丢弃
    pub fn apply(mut self, event: SelectionEvent, index: &FacetIndex) -> Self {
        match event {
            SelectionEvent::Toggle(Facet::Year, value) => match value.trim().parse::<i32>() {
                Ok(year) => toggle(&mut self.years, year),
                Err(_) => warn!("忽略无法解析的年份: {}", value),
            },
            SelectionEvent::Toggle(Facet::Exam, value) => toggle(&mut self.exams, value),
            SelectionEvent::Toggle(Facet::Subject, value) => {
                toggle(&mut self.subjects, value);
                self.prune_topics(index);
            }
            SelectionEvent::Toggle(Facet::Topic, value) => {
                if !index.topic_candidates(&self.subjects).contains(&value) {
                    debug!("知识点 {} 当前不可选，忽略", value);
                    return self;
                }
                toggle(&mut self.topics, value);
                self.prune_subtopics(index);
            }
            SelectionEvent::Toggle(Facet::Subtopic, value) => {
                if !index.subtopic_candidates(&self.topics).contains(&value) {
                    debug!("子知识点 {} 当前不可选，忽略", value);
                    return self;
                }
                toggle(&mut self.subtopics, value);
            }
            SelectionEvent::SetMarks(input) => self.marks = MarksFilter::parse(&input),
            SelectionEvent::SetSort(sort) => self.sort = sort,
            SelectionEvent::SetSearch(term) => self.search_term = term,
            SelectionEvent::Reset => return Self::default(),
        }
        self
    }

    /// 某个分面当前选中的值（年份转为文本）
    pub fn selected(&self, facet: Facet) -> Vec<String> {
        match facet {
            Facet::Year => self.years.iter().map(|y| y.to_string()).collect(),
            Facet::Subject => self.subjects.iter().cloned().collect(),
            Facet::Topic => self.topics.iter().cloned().collect(),
            Facet::Subtopic => self.subtopics.iter().cloned().collect(),
            Facet::Exam => self.exams.iter().cloned().collect(),
        }
    }

    fn prune_topics(&mut self, index: &FacetIndex) {
        if self.subjects.is_empty() {
            self.topics.clear();
            self.subtopics.clear();
            return;
        }
        let candidates = index.topic_candidates(&self.subjects);
        self.topics.retain(|t| candidates.contains(t));
        self.prune_subtopics(index);
    }

    fn prune_subtopics(&mut self, index: &FacetIndex) {
        if self.topics.is_empty() {
            self.subtopics.clear();
            return;
        }
        let candidates = index.subtopic_candidates(&self.topics);
        self.subtopics.retain(|s| candidates.contains(s));
    }
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    if set.contains(&value) {
        set.remove(&value);
    } else {
        set.insert(value);
    }
}

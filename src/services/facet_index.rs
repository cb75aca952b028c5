//! 分面索引 - 业务能力层
//!
//! 从数据集一次性构建各分面的取值列表和依赖关系（科目 → 知识点 → 子知识点）

use crate::models::question::Question;
use std::collections::{BTreeMap, BTreeSet};

/// 分面索引
///
/// 只读结构，数据集变化时整体重建
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetIndex {
    years: Vec<i32>,
    subjects: Vec<String>,
    exams: Vec<String>,
    subject_topics: BTreeMap<String, BTreeSet<String>>,
    topic_subtopics: BTreeMap<String, BTreeSet<String>>,
}

/// 依赖分面的可选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetOptions {
    /// 上级分面为空时不可用
    pub enabled: bool,
    pub values: Vec<String>,
}

impl FacetOptions {
    fn disabled() -> Self {
        Self {
            enabled: false,
            values: Vec::new(),
        }
    }
}

impl FacetIndex {
    /// 从数据集构建索引
    ///
    /// 空数据集得到空索引；空字符串的 topic / subtopic / exam 不进入索引
    pub fn build(dataset: &[Question]) -> Self {
        let mut years = BTreeSet::new();
        let mut subjects = BTreeSet::new();
        let mut exams = BTreeSet::new();
        let mut subject_topics: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut topic_subtopics: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for q in dataset {
            years.insert(q.year);
            subjects.insert(q.subject.clone());

            if let Some(exam) = q.exam.as_deref().filter(|e| !e.is_empty()) {
                exams.insert(exam.to_string());
            }

            if !q.topic.is_empty() {
                subject_topics
                    .entry(q.subject.clone())
                    .or_default()
                    .insert(q.topic.clone());

                if !q.subtopic.is_empty() {
                    topic_subtopics
                        .entry(q.topic.clone())
                        .or_default()
                        .insert(q.subtopic.clone());
                }
            }
        }

        Self {
            years: years.into_iter().collect(),
            subjects: subjects.into_iter().collect(),
            exams: exams.into_iter().collect(),
            subject_topics,
            topic_subtopics,
        }
    }

    /// 年份列表（升序）
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// 科目列表（字典序）
    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    /// 考试列表（字典序）
    pub fn exams(&self) -> &[String] {
        &self.exams
    }

    pub fn subject_topics(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.subject_topics
    }

    pub fn topic_subtopics(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.topic_subtopics
    }

    /// 所选科目下全部知识点的并集
    pub fn topic_candidates<'a, I>(&self, subjects: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        union_of(&self.subject_topics, subjects)
    }

    /// 所选知识点下全部子知识点的并集
    pub fn subtopic_candidates<'a, I>(&self, topics: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        union_of(&self.topic_subtopics, topics)
    }

    /// 知识点分面的可选项；未选科目时不可用
    pub fn topic_options(&self, subjects: &BTreeSet<String>) -> FacetOptions {
        if subjects.is_empty() {
            return FacetOptions::disabled();
        }
        FacetOptions {
            enabled: true,
            values: self.topic_candidates(subjects).into_iter().collect(),
        }
    }

    /// 子知识点分面的可选项；未选知识点时不可用
    pub fn subtopic_options(&self, topics: &BTreeSet<String>) -> FacetOptions {
        if topics.is_empty() {
            return FacetOptions::disabled();
        }
        FacetOptions {
            enabled: true,
            values: self.subtopic_candidates(topics).into_iter().collect(),
        }
    }
}

fn union_of<'a, I>(map: &BTreeMap<String, BTreeSet<String>>, keys: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a String>,
{
    keys.into_iter()
        .filter_map(|key| map.get(key))
        .flat_map(|values| values.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(subject: &str, year: i32, topic: &str, subtopic: &str, exam: Option<&str>) -> Question {
        Question {
            subject: subject.to_string(),
            year,
            exam: exam.map(str::to_string),
            topic: topic.to_string(),
            subtopic: subtopic.to_string(),
            marks: 5,
            question: "text".to_string(),
        }
    }

    fn sample() -> Vec<Question> {
        vec![
            q("Physics", 2021, "Thermo", "Conduction", Some("Board")),
            q("Chemistry", 2019, "Organic", "Alkanes", Some("Entrance")),
            q("Physics", 2020, "Mechanics", "Friction", None),
            q("Physics", 2021, "Thermo", "Convection", Some("Board")),
        ]
    }

    #[test]
    fn test_build_sorted_distinct_lists() {
        let index = FacetIndex::build(&sample());

        assert_eq!(index.years(), &[2019, 2020, 2021]);
        assert_eq!(index.subjects(), &["Chemistry".to_string(), "Physics".to_string()]);
        assert_eq!(index.exams(), &["Board".to_string(), "Entrance".to_string()]);

        let physics: Vec<_> = index.subject_topics()["Physics"].iter().cloned().collect();
        assert_eq!(physics, vec!["Mechanics", "Thermo"]);

        let thermo: Vec<_> = index.topic_subtopics()["Thermo"].iter().cloned().collect();
        assert_eq!(thermo, vec!["Conduction", "Convection"]);
    }

    #[test]
    fn test_build_empty_dataset() {
        let index = FacetIndex::build(&[]);
        assert_eq!(index, FacetIndex::default());
    }

    #[test]
    fn test_topic_options_disabled_without_subjects() {
        let index = FacetIndex::build(&sample());

        let options = index.topic_options(&BTreeSet::new());
        assert!(!options.enabled);
        assert!(options.values.is_empty());

        let subjects: BTreeSet<String> = ["Physics".to_string(), "Chemistry".to_string()].into();
        let options = index.topic_options(&subjects);
        assert!(options.enabled);
        assert_eq!(options.values, vec!["Mechanics", "Organic", "Thermo"]);
    }

    #[test]
    fn test_subtopic_candidates_union() {
        let index = FacetIndex::build(&sample());
        let topics: BTreeSet<String> = ["Thermo".to_string(), "Mechanics".to_string()].into();

        let candidates: Vec<_> = index.subtopic_candidates(&topics).into_iter().collect();
        assert_eq!(candidates, vec!["Conduction", "Convection", "Friction"]);
    }
}

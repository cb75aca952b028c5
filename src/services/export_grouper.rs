//! 导出分组 - 业务能力层
//!
//! 科目 → 知识点 → 题目 两级分组，顺序与结果列表中首次出现的顺序一致

use crate::models::question::Question;
use std::collections::HashMap;

/// 知识点分组
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicGroup<'a> {
    pub topic: String,
    pub questions: Vec<&'a Question>,
}

/// 科目分组
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectGroup<'a> {
    pub subject: String,
    pub topics: Vec<TopicGroup<'a>>,
}

impl SubjectGroup<'_> {
    pub fn question_count(&self) -> usize {
        self.topics.iter().map(|t| t.questions.len()).sum()
    }
}

/// 导出用的分组结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportGrouping<'a> {
    pub subjects: Vec<SubjectGroup<'a>>,
}

impl<'a> ExportGrouping<'a> {
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    pub fn question_count(&self) -> usize {
        self.subjects.iter().map(SubjectGroup::question_count).sum()
    }
}

/// 单次遍历分组，不做任何排序
pub fn group<'a>(results: &[&'a Question]) -> ExportGrouping<'a> {
    let mut subjects: Vec<SubjectGroup<'a>> = Vec::new();
    let mut subject_pos: HashMap<&str, usize> = HashMap::new();
    let mut topic_pos: HashMap<(&str, &str), usize> = HashMap::new();

    for &q in results {
        let si = *subject_pos.entry(q.subject.as_str()).or_insert_with(|| {
            subjects.push(SubjectGroup {
                subject: q.subject.clone(),
                topics: Vec::new(),
            });
            subjects.len() - 1
        });

        let topics = &mut subjects[si].topics;
        let ti = *topic_pos
            .entry((q.subject.as_str(), q.topic.as_str()))
            .or_insert_with(|| {
                topics.push(TopicGroup {
                    topic: q.topic.clone(),
                    questions: Vec::new(),
                });
                topics.len() - 1
            });

        topics[ti].questions.push(q);
    }

    ExportGrouping { subjects }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(subject: &str, topic: &str, text: &str) -> Question {
        Question {
            subject: subject.to_string(),
            year: 2020,
            exam: None,
            topic: topic.to_string(),
            subtopic: String::new(),
            marks: 1,
            question: text.to_string(),
        }
    }

    #[test]
    fn test_group_follows_encounter_order() {
        let b1 = q("B", "T1", "b1");
        let a1 = q("A", "T9", "a1");
        let b2 = q("B", "T1", "b2");
        let grouping = group(&[&b1, &a1, &b2]);

        let subjects: Vec<_> = grouping.subjects.iter().map(|s| s.subject.as_str()).collect();
        assert_eq!(subjects, vec!["B", "A"]);

        let b_questions: Vec<_> = grouping.subjects[0].topics[0]
            .questions
            .iter()
            .map(|q| q.question.as_str())
            .collect();
        assert_eq!(b_questions, vec!["b1", "b2"]);
        assert_eq!(grouping.question_count(), 3);
    }

    #[test]
    fn test_topics_not_sorted() {
        let x = q("A", "Zeta", "x");
        let y = q("A", "Alpha", "y");
        let z = q("A", "Zeta", "z");
        let grouping = group(&[&x, &y, &z]);

        let topics: Vec<_> = grouping.subjects[0]
            .topics
            .iter()
            .map(|t| t.topic.as_str())
            .collect();
        assert_eq!(topics, vec!["Zeta", "Alpha"]);
        assert_eq!(grouping.subjects[0].topics[0].questions.len(), 2);
    }

    #[test]
    fn test_same_topic_name_under_different_subjects() {
        let x = q("A", "Shared", "x");
        let y = q("B", "Shared", "y");
        let grouping = group(&[&x, &y]);

        assert_eq!(grouping.subjects.len(), 2);
        assert_eq!(grouping.subjects[1].topics[0].questions[0].question, "y");
    }

    #[test]
    fn test_empty_results() {
        assert!(group(&[]).is_empty());
    }
}

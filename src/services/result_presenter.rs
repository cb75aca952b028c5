//! 结果展示 - 业务能力层
//!
//! 把结果列表转为带高亮标记的展示数据（只是数据，不生成标记语言）

use crate::models::question::Question;
use regex::{Regex, RegexBuilder};
use tracing::warn;

/// 一段题干文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSegment {
    pub text: String,
    pub highlighted: bool,
}

/// 一道题的展示数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRecord {
    /// 如 "Physics (2020) - 5 marks"
    pub heading: String,
    pub segments: Vec<TextSegment>,
    /// 如 "Thermo -> Conduction"
    pub breadcrumb: String,
}

impl DisplayRecord {
    /// 拼回完整题干
    pub fn plain_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// 被高亮的片段
    pub fn highlights(&self) -> impl Iterator<Item = &str> {
        self.segments
            .iter()
            .filter(|s| s.highlighted)
            .map(|s| s.text.as_str())
    }
}

/// 生成展示数据
///
/// 搜索词按字面量、不区分大小写匹配；空搜索词不做标记
pub fn present(results: &[&Question], search_term: &str) -> Vec<DisplayRecord> {
    let matcher = build_matcher(search_term);

    results
        .iter()
        .map(|q| DisplayRecord {
            heading: format!("{} ({}) - {} marks", q.subject, q.year, q.marks),
            segments: highlight(&q.question, matcher.as_ref()),
            breadcrumb: format!("{} -> {}", q.topic, q.subtopic),
        })
        .collect()
}

fn build_matcher(search_term: &str) -> Option<Regex> {
    if search_term.is_empty() {
        return None;
    }

    // 转义后特殊字符只按字面匹配
    match RegexBuilder::new(&regex::escape(search_term))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => Some(re),
        Err(e) => {
            warn!("搜索词无法用于高亮, 按无高亮展示: {}", e);
            None
        }
    }
}

/// 把文本切分为普通片段和高亮片段
pub fn highlight(text: &str, matcher: Option<&Regex>) -> Vec<TextSegment> {
    let Some(re) = matcher else {
        return vec![plain(text)];
    };

    let mut segments = Vec::new();
    let mut last = 0;

    for m in re.find_iter(text) {
        if m.start() > last {
            segments.push(plain(&text[last..m.start()]));
        }
        segments.push(TextSegment {
            text: m.as_str().to_string(),
            highlighted: true,
        });
        last = m.end();
    }

    if last < text.len() || segments.is_empty() {
        segments.push(plain(&text[last..]));
    }

    segments
}

fn plain(text: &str) -> TextSegment {
    TextSegment {
        text: text.to_string(),
        highlighted: false,
    }
}

use crate::error::ConfigError;
use crate::models::question::deserialize_text;
use crate::models::selection::{Facet, SelectionEvent, SelectionState, SortOrder};
use crate::services::facet_index::FacetIndex;
use serde::Deserialize;
use std::path::Path;
use tokio::fs;
use tracing::{info, warn};

/// TOML 筛选预设
///
/// ```toml
/// subjects = ["Physics"]
/// topics = ["Thermo"]
/// years = [2020, 2021]
/// marks = 5
/// sort = "yearDesc"
/// search = "heat"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilterPreset {
    pub years: Vec<i32>,
    pub subjects: Vec<String>,
    pub topics: Vec<String>,
    pub subtopics: Vec<String>,
    pub exams: Vec<String>,
    #[serde(deserialize_with = "deserialize_text")]
    pub marks: String,
    pub sort: String,
    pub search: String,
}

impl FilterPreset {
    /// 按 科目 → 知识点 → 子知识点 的顺序回放事件，保证级联规则成立
    pub fn into_selection(self, index: &FacetIndex) -> SelectionState {
        let mut events = Vec::new();

        let toggles = |facet: Facet, values: Vec<String>| {
            values
                .into_iter()
                .map(move |v| SelectionEvent::Toggle(facet, v))
        };
        let years = self.years.iter().map(|y| y.to_string()).collect();

        events.extend(toggles(Facet::Year, years));
        events.extend(toggles(Facet::Exam, self.exams));
        events.extend(toggles(Facet::Subject, self.subjects));
        events.extend(toggles(Facet::Topic, self.topics));
        events.extend(toggles(Facet::Subtopic, self.subtopics));

        events.push(SelectionEvent::SetMarks(self.marks));
        match SortOrder::from_key(&self.sort) {
            Some(sort) => events.push(SelectionEvent::SetSort(sort)),
            None => warn!("未知的排序方式 '{}', 保持原始顺序", self.sort),
        }
        events.push(SelectionEvent::SetSearch(self.search));

        events
            .into_iter()
            .fold(SelectionState::default(), |state, event| state.apply(event, index))
    }
}

/// 从 TOML 文件加载筛选预设
pub async fn load_filter_preset(path: &Path) -> Result<FilterPreset, ConfigError> {
    let path_str = path.display().to_string();
    let content = fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::PresetReadFailed {
            path: path_str.clone(),
            source,
        })?;

    let preset = parse_filter_preset(&content, &path_str)?;
    info!("✓ 已加载筛选预设: {}", path_str);
    Ok(preset)
}

pub fn parse_filter_preset(content: &str, path: &str) -> Result<FilterPreset, ConfigError> {
    toml::from_str(content).map_err(|source| ConfigError::PresetParseFailed {
        path: path.to_string(),
        source,
    })
}

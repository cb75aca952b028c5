use pyq_explorer::config::Config;
use pyq_explorer::error::{AppError, ConfigError, LoadError};
use pyq_explorer::models::loaders::{load_dataset, parse_dataset, DatasetSource};
use pyq_explorer::models::selection::{Facet, SelectionEvent, SelectionState, SortOrder};
use pyq_explorer::services::document_exporter::{DocumentExporter, ExportOptions, FilterSummary};
use pyq_explorer::services::export_grouper::group;
use pyq_explorer::{App, ExplorerSession};
use std::path::PathBuf;
use std::time::Duration;

const SAMPLE_JSON: &str = r#"[
  {"subject":"Physics","year":2020,"topic":"Thermo","subtopic":"Conduction","marks":5,"question":"Heat transfer in rods"},
  {"subject":"Physics","year":"2021","topic":"Mechanics","subtopic":"Friction","marks":"3","question":"Static friction on a ramp"},
  {"subject":"Chemistry","year":2020,"exam":"Board","topic":"Organic","subtopic":"Alkanes","marks":5,"question":"Name the first <b>alkane</b> &amp; its formula"}
]"#;

fn create_test_session() -> ExplorerSession {
    ExplorerSession::new(parse_dataset(SAMPLE_JSON, "inline").expect("样例数据解析失败"))
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("pyq_explorer_{}_{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).expect("创建临时目录失败");
    dir
}

#[test]
fn test_subject_and_marks_filter() {
    let session = create_test_session();
    let selection = session.apply(
        SelectionState::default(),
        SelectionEvent::Toggle(Facet::Subject, "Physics".to_string()),
    );
    let selection = session.apply(selection, SelectionEvent::SetMarks("5".to_string()));

    let out = session.recompute(&selection);
    assert_eq!(out.results.len(), 1);
    assert_eq!(out.results[0].question, "Heat transfer in rods");
}

#[test]
fn test_year_desc_keeps_ties_stable() {
    let session = create_test_session();
    let selection = session.apply(SelectionState::default(), SelectionEvent::SetSort(SortOrder::YearDesc));

    let out = session.recompute(&selection);
    let years: Vec<i32> = out.results.iter().map(|q| q.year).collect();
    assert_eq!(years, vec![2021, 2020, 2020]);
    // 同年份保持原始顺序
    assert_eq!(out.results[1].subject, "Physics");
    assert_eq!(out.results[2].subject, "Chemistry");
}

#[test]
fn test_cascade_drops_unreachable_topics() {
    let session = create_test_session();
    let mut selection = SelectionState::default();
    for event in [
        SelectionEvent::Toggle(Facet::Subject, "Physics".to_string()),
        SelectionEvent::Toggle(Facet::Subject, "Chemistry".to_string()),
        SelectionEvent::Toggle(Facet::Topic, "Thermo".to_string()),
        SelectionEvent::Toggle(Facet::Topic, "Organic".to_string()),
        SelectionEvent::Toggle(Facet::Subtopic, "Alkanes".to_string()),
        // 取消 Chemistry，Organic 与 Alkanes 不再可达
        SelectionEvent::Toggle(Facet::Subject, "Chemistry".to_string()),
    ] {
        selection = session.apply(selection, event);
    }

    assert_eq!(selection.selected(Facet::Topic), vec!["Thermo"]);
    assert!(selection.selected(Facet::Subtopic).is_empty());

    let topics = session.topic_options(&selection);
    for topic in selection.selected(Facet::Topic) {
        assert!(topics.values.contains(&topic));
    }
}

#[test]
fn test_search_highlights_without_filtering() {
    let session = create_test_session();
    let selection = session.apply(SelectionState::default(), SelectionEvent::SetSearch("HEAT".to_string()));

    let out = session.recompute(&selection);
    assert_eq!(out.results.len(), 3);
    assert_eq!(out.display[0].highlights().collect::<Vec<_>>(), vec!["Heat"]);
    assert_eq!(out.display[0].heading, "Physics (2020) - 5 marks");
    assert_eq!(out.display[0].breadcrumb, "Thermo -> Conduction");
}

#[test]
fn test_empty_export_is_cover_only() {
    let exporter = DocumentExporter::new(ExportOptions::from(&Config::default())).expect("导出器初始化失败");
    let summary = FilterSummary::from_selection(&SelectionState::default(), 0);
    let layout = exporter.layout(&group(&[]), &summary, chrono::Local::now());
    assert_eq!(layout.page_count(), 1);
}

#[tokio::test]
async fn test_load_dataset_from_file() {
    let dir = scratch_dir("load");
    let path = dir.join("pyqs.json");
    std::fs::write(&path, SAMPLE_JSON).expect("写入样例数据失败");

    let source = DatasetSource::parse(&path.display().to_string());
    let dataset = load_dataset(&source, Duration::from_secs(5)).await.expect("加载失败");
    assert_eq!(dataset.len(), 3);
    assert_eq!(dataset[1].year, 2021);
    assert_eq!(dataset[1].marks, 3);
    assert_eq!(dataset[2].exam.as_deref(), Some("Board"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_app_run_writes_pdf() {
    let dir = scratch_dir("run");
    let dataset_path = dir.join("pyqs.json");
    let preset_path = dir.join("preset.toml");
    std::fs::write(&dataset_path, SAMPLE_JSON).expect("写入样例数据失败");
    std::fs::write(&preset_path, "subjects = [\"Physics\"]\nsort = \"yearAsc\"\n").expect("写入预设失败");

    let config = Config {
        dataset_source: dataset_path.display().to_string(),
        filter_preset: Some(preset_path.display().to_string()),
        output_dir: dir.join("out").display().to_string(),
        ..Config::default()
    };

    let app = App::initialize(config).await.expect("初始化失败");
    assert_eq!(app.selection().selected(Facet::Subject), vec!["Physics"]);
    assert_eq!(app.session().dataset().len(), 3);

    let stats = app.run().await.expect("运行失败");
    assert_eq!(stats.total, 3);
    assert_eq!(stats.matched, 2);

    let bytes = std::fs::read(&stats.export_path).expect("导出文件不存在");
    assert!(bytes.starts_with(b"%PDF"));
    assert_eq!(bytes.len(), stats.export_bytes);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_missing_preset_fails_initialize() {
    let dir = scratch_dir("preset");
    let dataset_path = dir.join("pyqs.json");
    std::fs::write(&dataset_path, SAMPLE_JSON).expect("写入样例数据失败");

    let config = Config {
        dataset_source: dataset_path.display().to_string(),
        filter_preset: Some(dir.join("missing.toml").display().to_string()),
        ..Config::default()
    };
    let result = App::initialize(config).await;
    assert!(matches!(
        result,
        Err(AppError::Config(ConfigError::PresetReadFailed { .. }))
    ));

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_unparsable_dataset_fails_initialize() {
    let dir = scratch_dir("bad_dataset");
    let dataset_path = dir.join("pyqs.json");
    std::fs::write(&dataset_path, r#"[{"subject":"Physics","year":2020,"marks":"five"}]"#)
        .expect("写入样例数据失败");

    let config = Config {
        dataset_source: dataset_path.display().to_string(),
        ..Config::default()
    };
    let result = App::initialize(config).await;
    assert!(matches!(
        result,
        Err(AppError::Load(LoadError::ParseFailed { .. }))
    ));

    let _ = std::fs::remove_dir_all(&dir);
}

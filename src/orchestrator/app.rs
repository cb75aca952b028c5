use crate::config::Config;
use crate::error::{AppResult, ExportError};
use crate::models::loaders::{load_dataset, load_filter_preset, DatasetSource};
use crate::models::selection::SelectionState;
use crate::services::document_exporter::{DocumentExporter, ExportOptions};
use crate::utils::logging::{
    log_dataset_loaded, log_results_preview, log_startup, print_final_stats,
};
use crate::workflow::ExplorerSession;
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tracing::{error, info};

/// 应用主结构
pub struct App {
    config: Config,
    session: ExplorerSession,
    selection: SelectionState,
}

/// 一次运行的统计
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub total: usize,
    pub matched: usize,
    pub export_path: String,
    pub export_bytes: usize,
}

impl App {
    /// 初始化应用：加载数据集、构建索引、读取筛选预设
    ///
    /// 题库加载失败直接返回，程序无法继续
    pub async fn initialize(config: Config) -> AppResult<Self> {
        log_startup(&config);

        let source = DatasetSource::parse(&config.dataset_source);
        let timeout = Duration::from_secs(config.fetch_timeout_secs);
        let dataset = load_dataset(&source, timeout).await.map_err(|e| {
            error!("❌ 无法加载题库: {}", e);
            e
        })?;

        let session = ExplorerSession::new(dataset);
        log_dataset_loaded(session.dataset().len(), session.index());

        let selection = match &config.filter_preset {
            Some(path) => load_filter_preset(Path::new(path))
                .await?
                .into_selection(session.index()),
            None => {
                info!("未配置筛选预设, 使用全部题目");
                SelectionState::default()
            }
        };

        Ok(Self {
            config,
            session,
            selection,
        })
    }

    pub fn session(&self) -> &ExplorerSession {
        &self.session
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// 运行应用主逻辑：筛选 → 展示 → 导出
    pub async fn run(&self) -> AppResult<RunStats> {
        let recomputed = self.session.recompute(&self.selection);
        log_results_preview(&recomputed.display, self.config.preview_limit);

        let exporter = DocumentExporter::new(ExportOptions::from(&self.config))?;
        let bytes = self.session.export(&self.selection, &exporter)?;

        let export_path = self.config.export_path();
        write_export(&export_path, &bytes).await?;

        let stats = RunStats {
            total: self.session.dataset().len(),
            matched: recomputed.results.len(),
            export_path: export_path.display().to_string(),
            export_bytes: bytes.len(),
        };
        print_final_stats(
            stats.matched,
            stats.total,
            &stats.export_path,
            stats.export_bytes,
        );

        Ok(stats)
    }
}

async fn write_export(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let write_failed = |source| ExportError::WriteFailed {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(write_failed)?;
    }
    fs::write(path, bytes).await.map_err(write_failed)
}

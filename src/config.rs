/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 题库数据来源（本地路径或 http(s) URL）
    pub dataset_source: String,
    /// 拉取数据集的超时时间（秒）
    pub fetch_timeout_secs: u64,
    /// 筛选预设 TOML 文件（可选）
    pub filter_preset: Option<String>,
    /// 导出目录
    pub output_dir: String,
    /// 导出文件名
    pub export_file_name: String,
    // --- 导出文档 ---
    pub export_title: String,
    pub export_attribution: String,
    pub watermark_text: String,
    /// 日志中预览的题目数量
    pub preview_limit: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_source: "./data/pyqs.json".to_string(),
            fetch_timeout_secs: 30,
            filter_preset: None,
            output_dir: "output".to_string(),
            export_file_name: "pyqs.pdf".to_string(),
            export_title: "PYQ Explorer".to_string(),
            export_attribution: "Compiled from previous year question papers".to_string(),
            watermark_text: "PYQ Explorer".to_string(),
            preview_limit: 20,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            dataset_source: std::env::var("DATASET_SOURCE").unwrap_or(default.dataset_source),
            fetch_timeout_secs: std::env::var("FETCH_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.fetch_timeout_secs),
            filter_preset: std::env::var("FILTER_PRESET").ok().filter(|v| !v.trim().is_empty()).or(default.filter_preset),
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or(default.output_dir),
            export_file_name: std::env::var("EXPORT_FILE_NAME").unwrap_or(default.export_file_name),
            export_title: std::env::var("EXPORT_TITLE").unwrap_or(default.export_title),
            export_attribution: std::env::var("EXPORT_ATTRIBUTION").unwrap_or(default.export_attribution),
            watermark_text: std::env::var("WATERMARK_TEXT").unwrap_or(default.watermark_text),
            preview_limit: std::env::var("PREVIEW_LIMIT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.preview_limit),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// 导出文件的完整路径
    pub fn export_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.output_dir).join(&self.export_file_name)
    }
}

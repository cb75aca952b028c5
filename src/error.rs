use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 数据集加载错误
    #[error("数据集错误: {0}")]
    Load(#[from] LoadError),
    /// 文档导出错误
    #[error("导出错误: {0}")]
    Export(#[from] ExportError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 数据集加载错误
#[derive(Debug, Error)]
pub enum LoadError {
    /// 网络请求失败
    #[error("请求失败 ({url}): {source}")]
    RequestFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// 请求超时
    #[error("请求超时 ({url}), 超过 {secs} 秒")]
    Timeout { url: String, secs: u64 },
    /// 服务端返回非成功状态码
    #[error("服务端返回错误状态 ({url}): {status}")]
    BadStatus { url: String, status: u16 },
    /// 读取本地文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// JSON 解析失败
    #[error("JSON解析失败 ({origin}): {source}")]
    ParseFailed {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 文档导出错误
#[derive(Debug, Error)]
pub enum ExportError {
    /// PDF 生成失败
    #[error("PDF生成失败: {0}")]
    Pdf(#[from] lopdf::Error),
    /// 序列化 PDF 失败
    #[error("PDF写出失败: {0}")]
    Render(String),
    /// 文本清洗规则编译失败
    #[error("正则编译失败: {0}")]
    Regex(#[from] regex::Error),
    /// 写入导出文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取预设文件失败
    #[error("读取预设文件失败 ({path}): {source}")]
    PresetReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 预设 TOML 解析失败
    #[error("预设TOML解析失败 ({path}): {source}")]
    PresetParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 便捷构造函数 ==========

impl LoadError {
    /// 根据 reqwest 错误区分超时和普通请求失败
    pub fn from_request(url: impl Into<String>, secs: u64, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            LoadError::Timeout { url, secs }
        } else {
            LoadError::RequestFailed { url, source }
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

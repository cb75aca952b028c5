use crate::error::LoadError;
use crate::models::question::{Dataset, Question};
use std::time::Duration;
use tokio::fs;
use tracing::{debug, info};

/// 数据集来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// http(s) 地址
    Url(String),
    /// 本地 JSON 文件
    Path(String),
}

impl DatasetSource {
    pub fn parse(source: &str) -> Self {
        let trimmed = source.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            DatasetSource::Url(trimmed.to_string())
        } else {
            DatasetSource::Path(trimmed.to_string())
        }
    }

    fn describe(&self) -> &str {
        match self {
            DatasetSource::Url(url) => url,
            DatasetSource::Path(path) => path,
        }
    }
}

/// 加载题库数据集（整个会话只调用一次）
///
/// 失败直接返回错误，不重试
pub async fn load_dataset(source: &DatasetSource, timeout: Duration) -> Result<Dataset, LoadError> {
    info!("📥 正在加载题库: {}", source.describe());

    let raw = match source {
        DatasetSource::Url(url) => fetch_remote(url, timeout).await?,
        DatasetSource::Path(path) => fs::read_to_string(path)
            .await
            .map_err(|source| LoadError::ReadFailed {
                path: path.clone(),
                source,
            })?,
    };

    let dataset = parse_dataset(&raw, source.describe())?;
    info!("✓ 成功加载 {} 道题", dataset.len());
    Ok(dataset)
}

/// 解析 JSON 数组形式的题库
pub fn parse_dataset(raw: &str, origin: &str) -> Result<Dataset, LoadError> {
    serde_json::from_str::<Vec<Question>>(raw).map_err(|source| LoadError::ParseFailed {
        origin: origin.to_string(),
        source,
    })
}

async fn fetch_remote(url: &str, timeout: Duration) -> Result<String, LoadError> {
    let secs = timeout.as_secs();
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LoadError::from_request(url, secs, e))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| LoadError::from_request(url, secs, e))?;

    let status = response.status();
    debug!("题库请求返回状态: {}", status);
    if !status.is_success() {
        return Err(LoadError::BadStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response
        .text()
        .await
        .map_err(|e| LoadError::from_request(url, secs, e))
}

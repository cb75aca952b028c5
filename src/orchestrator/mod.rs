//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 管理应用生命周期：加载题库、读取筛选预设、驱动一次筛选和导出、输出统计。
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (加载 / 运行 / 写文件)
//!     ↓
//! workflow::ExplorerSession (recompute / export)
//!     ↓
//! services (索引 / 筛选 / 展示 / 分组 / 文档排版)
//!     ↓
//! infrastructure (PdfCanvas)
//! ```
//!
//! 只有编排层做文件和网络 I/O，下层都是纯函数。

pub mod app;

pub use app::{App, RunStats};

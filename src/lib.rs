//! # PYQ Explorer
//!
//! 历年真题题库的筛选、展示与导出
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - `PdfCanvas`，把排好版的文本渲染成 PDF 字节
//!
//! ### ② 业务能力层（Services）
//! - `FacetIndex` - 年份 / 科目 / 知识点 / 子知识点 / 考试 的候选值
//! - `filter` - 按筛选状态过滤并排序
//! - `present` - 生成展示数据，高亮搜索词
//! - `group` - 按 科目 → 知识点 分组
//! - `DocumentExporter` - 封面、分页、水印、页脚
//!
//! ### ③ 流程层（Workflow）
//! - `ExplorerSession` - 持有数据集和索引，提供 recompute / export
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator::App` - 加载数据、读取预设、写出导出文件
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::PdfCanvas;
pub use models::question::{Dataset, Question};
pub use models::selection::{Facet, MarksFilter, SelectionEvent, SelectionState, SortOrder};
pub use orchestrator::{App, RunStats};
pub use workflow::{ExplorerSession, Recomputed};

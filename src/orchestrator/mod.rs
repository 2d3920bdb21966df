//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_report` - 批量报告
//! - 展开数据源路径（文件 / 目录）
//! - 逐个数据源生成报告，写警告文件
//! - 输出全局汇总
//!
//! ### `source_report` - 单个数据源报告
//! - 加载、统计、一致性检查
//! - 逐条列出未通过判定的记录和抽查记录
//!
//! ### `correction` - 修正任务
//! - 删除匹配记录、重新编号、原子覆写
//!
//! ## 层次关系
//!
//! ```text
//! batch_report (处理 Vec<Source>)
//!     ↓
//! source_report (处理 Vec<QuestionRecord>)
//!     ↓
//! services (能力层：predicates / validator / report / warn)
//!     ↓
//! models (数据层：schema / loaders)
//! ```

pub mod batch_report;
pub mod correction;
pub mod source_report;

pub use batch_report::{App, RunSummary};
pub use correction::run_renumber;
pub use source_report::{report_source, ReportOptions, SourceOutcome};

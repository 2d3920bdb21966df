//! # Question Audit
//!
//! 检查、统计和修正以 JSONL 保存的考试题目记录
//!
//! ## 架构设计
//!
//! ### ① 数据层（Models）
//! - `models/` - 记录结构、字段级校验、JSONL 读写
//! - `schema` - 解码前逐字段检查，违规时指出具体字段
//! - `loaders` - 加载（收集违规）与原子覆写
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 只处理记录序列，不关心文件
//! - `predicates` - 五个独立判定
//! - `RecordValidator` - 一次扫描完成计数
//! - `ReportWriter` - 报告渲染到任意 `Write`
//! - `WarnWriter` - 写警告文件
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 批量修正：规则 → 重新编号 → 覆写
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/` - 多数据源报告与修正任务
//!
//! ## 模块结构

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AuditError, AuditResult, SchemaViolation};
pub use models::QuestionRecord;
pub use orchestrator::{App, ReportOptions, RunSummary};
pub use services::{Predicate, RecordValidator};
pub use workflow::{BulkTransform, IdScheme};

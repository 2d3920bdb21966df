//! 单个数据源报告 - 编排层
//!
//! 加载一个 JSONL 文件，统计、检查一致性，并把报告写到输出端。

use crate::error::SchemaViolation;
use crate::models::loaders::load_jsonl_source;
use crate::services::{check_integrity, Predicate, RecordValidator, ReportWriter, SourceStats};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// 逐条输出的选项
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// 列出不满足这些判定的记录
    pub list_failing: Vec<Predicate>,
    /// 固定抽查的 ID
    pub sample_ids: Vec<String>,
}

/// 单个数据源的报告结果
#[derive(Debug, Clone)]
pub struct SourceOutcome {
    pub stats: SourceStats,
    pub violations: Vec<SchemaViolation>,
    pub integrity_clean: bool,
}

/// 处理单个数据源
///
/// # 参数
/// - `path`: 数据源路径
/// - `validator`: 判定集合
/// - `writer`: 报告渲染器
/// - `options`: 逐条输出选项
/// - `out`: 报告输出端
pub async fn report_source(
    path: &Path,
    validator: &RecordValidator,
    writer: &ReportWriter,
    options: &ReportOptions,
    out: &mut dyn Write,
) -> Result<SourceOutcome> {
    info!("📂 正在加载: {}", path.display());
    let outcome = load_jsonl_source(path).await?;
    let records = &outcome.records;

    let stats = validator.validate(records);
    let integrity = check_integrity(records);

    writer.write_header(out, &path.display().to_string())?;
    writer.write_stats(out, &stats, outcome.violations.len())?;
    writer.write_integrity(out, &integrity)?;
    writer.write_violations(out, &outcome.violations)?;

    for predicate in &options.list_failing {
        let rows = validator.failing(*predicate, records);
        writer.write_records(out, &format!("不满足 {}", predicate), &rows, validator)?;
    }

    if !options.sample_ids.is_empty() {
        let rows: Vec<_> = records
            .iter()
            .enumerate()
            .filter(|(_, r)| options.sample_ids.iter().any(|id| id == &r.id))
            .map(|(index, r)| (index + 1, r))
            .collect();
        for id in &options.sample_ids {
            if !rows.iter().any(|(_, r)| &r.id == id) {
                warn!("⚠️ 抽查 ID 不存在: {} ({})", id, path.display());
            }
        }
        writer.write_records(out, "抽查", &rows, validator)?;
    }

    out.flush().context("无法输出报告")?;

    if !outcome.violations.is_empty() {
        warn!(
            "⚠️ {} 条记录未通过结构校验: {}",
            outcome.violations.len(),
            path.display()
        );
    }

    Ok(SourceOutcome {
        stats,
        integrity_clean: integrity.is_clean(),
        violations: outcome.violations,
    })
}

//! 报告输出 - 业务能力层
//!
//! 所有输出都写入调用方传入的 `Write`，不依赖全局的标准输出状态。

use crate::error::SchemaViolation;
use crate::models::question::QuestionRecord;
use crate::services::id_integrity::IntegrityReport;
use crate::services::record_validator::{RecordValidator, SourceStats};
use crate::utils::logging::truncate_text;
use std::io::{self, Write};

/// 报告渲染器
pub struct ReportWriter {
    preview_width: usize,
}

impl ReportWriter {
    pub fn new(preview_width: usize) -> Self {
        Self { preview_width }
    }

    /// 数据源标题
    pub fn write_header(&self, out: &mut dyn Write, source: &str) -> io::Result<()> {
        writeln!(out, "{}", "=".repeat(60))?;
        writeln!(out, "📄 {}", source)?;
        writeln!(out, "{}", "=".repeat(60))
    }

    /// 无法解析的数据源：标题加一行原因
    pub fn write_load_failure(
        &self,
        out: &mut dyn Write,
        source: &str,
        reason: &str,
    ) -> io::Result<()> {
        self.write_header(out, source)?;
        writeln!(out, "❌ 无法解析，已跳过: {}", reason)
    }

    /// 统计表
    pub fn write_stats(
        &self,
        out: &mut dyn Write,
        stats: &SourceStats,
        violation_count: usize,
    ) -> io::Result<()> {
        writeln!(out, "记录总数: {}  结构违规: {}", stats.total, violation_count)?;
        for stat in &stats.predicates {
            writeln!(out, "  {:<24} {}", stat.predicate.label(), stat)?;
        }
        Ok(())
    }

    /// 逐条输出记录：序号、ID、题干预览、判定标记
    pub fn write_records(
        &self,
        out: &mut dyn Write,
        title: &str,
        rows: &[(usize, &QuestionRecord)],
        validator: &RecordValidator,
    ) -> io::Result<()> {
        writeln!(out, "{}", "─".repeat(60))?;
        writeln!(out, "{} ({} 条)", title, rows.len())?;
        for (seq, record) in rows {
            writeln!(
                out,
                "{:>5}  {:<8}  {:<width$}  {}",
                seq,
                record.id,
                self.preview(&record.question_text),
                validator.flags(record),
                width = self.preview_width + 3,
            )?;
        }
        Ok(())
    }

    /// 一致性检查结果，全部通过时只输出一行
    pub fn write_integrity(&self, out: &mut dyn Write, report: &IntegrityReport) -> io::Result<()> {
        if report.is_clean() {
            return writeln!(out, "✓ ID 连续且唯一，选项数一致");
        }

        writeln!(out, "{}", "─".repeat(60))?;
        for (id, positions) in &report.duplicates {
            writeln!(out, "⚠️ 重复 ID {}: 位置 {:?}", id, positions)?;
        }
        if !report.missing.is_empty() {
            writeln!(out, "⚠️ 缺失序号: {}", join_numbers(&report.missing))?;
        }
        if !report.out_of_range.is_empty() {
            writeln!(out, "⚠️ 超出范围的序号: {}", join_numbers(&report.out_of_range))?;
        }
        if !report.unparsable.is_empty() {
            writeln!(out, "⚠️ 无法解析序号的 ID: {}", report.unparsable.join(", "))?;
        }
        if !report.choice_count_is_constant() {
            let counts: Vec<String> = report
                .choice_counts
                .iter()
                .map(|(choices, records)| format!("{} 个选项 × {}", choices, records))
                .collect();
            writeln!(out, "⚠️ 选项数不一致: {}", counts.join(", "))?;
        }
        Ok(())
    }

    /// 结构违规清单，每条一行原因
    pub fn write_violations(
        &self,
        out: &mut dyn Write,
        violations: &[SchemaViolation],
    ) -> io::Result<()> {
        if violations.is_empty() {
            return Ok(());
        }
        writeln!(out, "{}", "─".repeat(60))?;
        writeln!(out, "❌ 结构违规 ({} 条)", violations.len())?;
        for (i, v) in violations.iter().enumerate() {
            writeln!(
                out,
                "{:>5}. 第 {} 行 [{}] {}: {}",
                i + 1,
                v.line,
                v.id.as_deref().unwrap_or("?"),
                v.field,
                v.reason
            )?;
        }
        Ok(())
    }

    /// 多个数据源的汇总
    pub fn write_summary(
        &self,
        out: &mut dyn Write,
        source_count: usize,
        stats: &SourceStats,
        violation_count: usize,
    ) -> io::Result<()> {
        writeln!(out, "{}", "=".repeat(60))?;
        writeln!(out, "📊 汇总: {} 个数据源", source_count)?;
        self.write_stats(out, stats, violation_count)?;
        writeln!(out, "{}", "=".repeat(60))
    }

    fn preview(&self, text: &str) -> String {
        let flat: String = text
            .chars()
            .map(|c| if c.is_whitespace() { ' ' } else { c })
            .collect();
        truncate_text(flat.trim(), self.preview_width)
    }
}

fn join_numbers(numbers: &[u64]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

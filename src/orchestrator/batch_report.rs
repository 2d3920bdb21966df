//! 批量报告 - 编排层
//!
//! ## 职责
//!
//! 1. **展开数据源**：文件原样处理，目录展开为其中的 `.jsonl` 文件
//! 2. **逐个报告**：委托 `source_report` 处理单个数据源
//! 3. **警告落盘**：结构违规写入警告文件（如已配置）
//! 4. **跳过坏数据源**：某个文件无法解析时记录原因，继续处理其余文件
//! 5. **全局统计**：多个数据源时输出汇总

use crate::config::Config;
use crate::error::AuditError;
use crate::models::loaders::discover_sources;
use crate::orchestrator::source_report::{report_source, ReportOptions};
use crate::services::{PredicateRules, RecordValidator, ReportWriter, WarnWriter};
use crate::utils::logging;
use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;
use tracing::{error, warn};

/// 一次运行的统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub sources: usize,
    pub records: usize,
    pub violations: usize,
    /// 一致性检查未通过的数据源数
    pub integrity_issues: usize,
    /// 无法解析而跳过的数据源数
    pub failed_sources: usize,
}

impl RunSummary {
    pub fn has_violations(&self) -> bool {
        self.violations > 0
    }

    pub fn has_failures(&self) -> bool {
        self.failed_sources > 0
    }
}

/// 报告应用
pub struct App {
    config: Config,
    options: ReportOptions,
}

impl App {
    pub fn new(config: Config, options: ReportOptions) -> Self {
        Self { config, options }
    }

    /// 对所有数据源生成报告
    pub async fn run(&self, paths: &[PathBuf], out: &mut dyn Write) -> Result<RunSummary> {
        logging::log_startup(&self.config);

        let sources = discover_sources(paths).await?;
        if sources.is_empty() {
            warn!("⚠️ 没有找到待检查的 JSONL 文件，程序结束");
            return Ok(RunSummary::default());
        }
        logging::log_sources_found(sources.len());

        let validator = RecordValidator::new(PredicateRules::new(&self.config));
        let writer = ReportWriter::new(self.config.preview_width);

        let warn_writer = match &self.config.warn_file {
            Some(path) => {
                let w = WarnWriter::with_path(path.clone());
                w.init().await?;
                Some(w)
            }
            None => None,
        };

        let mut summary = RunSummary::default();
        let mut overall = validator.validate(&[]);

        for (index, source) in sources.iter().enumerate() {
            logging::log_source_start(index + 1, sources.len(), source);

            let name = source.display().to_string();
            let result = report_source(source, &validator, &writer, &self.options, out).await;
            let outcome = match result {
                Ok(outcome) => outcome,
                Err(e) => {
                    let confined = matches!(
                        e.downcast_ref::<AuditError>(),
                        Some(audit) if !audit.is_fatal()
                    );
                    if !confined {
                        return Err(e);
                    }

                    error!("❌ 跳过数据源 {}: {:#}", name, e);
                    writer.write_load_failure(out, &name, &format!("{:#}", e))?;
                    if let Some(w) = &warn_writer {
                        w.write_failure(&name, &format!("{:#}", e)).await?;
                    }
                    summary.failed_sources += 1;
                    continue;
                }
            };

            if let Some(w) = &warn_writer {
                w.write(&name, &outcome.violations).await?;
            }

            summary.sources += 1;
            summary.records += outcome.stats.total;
            summary.violations += outcome.violations.len();
            if !outcome.integrity_clean {
                summary.integrity_issues += 1;
            }
            overall.absorb(&outcome.stats);
        }

        if summary.sources > 1 {
            writer.write_summary(out, summary.sources, &overall, summary.violations)?;
        }
        out.flush()?;

        logging::print_final_stats(&summary, warn_writer.as_ref().map(|w| w.path()));
        Ok(summary)
    }
}

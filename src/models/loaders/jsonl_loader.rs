use crate::error::{AuditError, AuditResult, SchemaViolation};
use crate::models::question::QuestionRecord;
use crate::models::schema::decode_record;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 一个数据源的加载结果
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    /// 通过结构校验的记录，保持文件行序
    pub records: Vec<QuestionRecord>,
    /// 未通过结构校验的记录
    pub violations: Vec<SchemaViolation>,
}

impl LoadOutcome {
    /// 记录行总数（不含空行）
    pub fn line_count(&self) -> usize {
        self.records.len() + self.violations.len()
    }

    /// 要求全部记录合法，否则返回第一条违规
    pub fn into_strict(self) -> AuditResult<Vec<QuestionRecord>> {
        match self.violations.into_iter().next() {
            Some(violation) => Err(violation.into()),
            None => Ok(self.records),
        }
    }
}

/// 解析 JSONL 文本
///
/// 空行跳过；任意一行不是合法 JSON 时立即中止并报告行号和原始内容；
/// 结构违规逐条收集，不中止。
pub fn parse_jsonl(content: &str) -> AuditResult<LoadOutcome> {
    let mut outcome = LoadOutcome::default();

    for (index, raw) in content.lines().enumerate() {
        let line = index + 1;
        if raw.trim().is_empty() {
            continue;
        }

        let value: Value = serde_json::from_str(raw).map_err(|source| AuditError::MalformedRecord {
            line,
            raw: raw.to_string(),
            source,
        })?;

        match decode_record(line, value) {
            Ok(record) => outcome.records.push(record),
            Err(violation) => {
                tracing::debug!("结构违规: {}", violation);
                outcome.violations.push(violation);
            }
        }
    }

    Ok(outcome)
}

/// 从 JSONL 文件加载记录
pub async fn load_jsonl_source(path: &Path) -> AuditResult<LoadOutcome> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AuditError::read_failed(path, e))?;

    let outcome = parse_jsonl(&content)?;
    tracing::info!(
        "成功加载 {}/{} 条记录 ({} 条结构违规): {}",
        outcome.records.len(),
        outcome.line_count(),
        outcome.violations.len(),
        path.display()
    );

    Ok(outcome)
}

/// 展开命令行给出的路径：文件原样保留，目录展开为其中的 `.jsonl` 文件（按文件名排序）
pub async fn discover_sources(paths: &[PathBuf]) -> AuditResult<Vec<PathBuf>> {
    let mut sources = Vec::new();

    for path in paths {
        let metadata = fs::metadata(path)
            .await
            .map_err(|e| AuditError::read_failed(path, e))?;

        if !metadata.is_dir() {
            sources.push(path.clone());
            continue;
        }

        let mut found = Vec::new();
        let mut entries = fs::read_dir(path)
            .await
            .map_err(|e| AuditError::read_failed(path, e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AuditError::read_failed(path, e))?
        {
            let entry_path = entry.path();
            if entry_path.extension().and_then(|s| s.to_str()) == Some("jsonl") {
                found.push(entry_path);
            }
        }

        if found.is_empty() {
            tracing::warn!("在文件夹 {} 中没有找到 JSONL 文件", path.display());
        }
        found.sort();
        sources.extend(found);
    }

    Ok(sources)
}

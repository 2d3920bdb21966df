//! 警告写入服务 - 业务能力层
//!
//! 只负责把结构违规追加到警告文件，不关心流程

use crate::error::SchemaViolation;
use anyhow::{Context, Result};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// 警告写入服务
pub struct WarnWriter {
    warn_file_path: String,
}

impl WarnWriter {
    /// 使用给定文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            warn_file_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.warn_file_path
    }

    /// 写入文件头（覆盖旧内容）
    pub async fn init(&self) -> Result<()> {
        let header = format!(
            "{}\n结构违规记录 - {}\n{}\n",
            "=".repeat(60),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            "=".repeat(60)
        );
        tokio::fs::write(&self.warn_file_path, header)
            .await
            .with_context(|| format!("无法写入警告文件: {}", self.warn_file_path))
    }

    /// 追加一个数据源的所有违规
    ///
    /// # 参数
    /// - `source`: 数据源名称
    /// - `violations`: 该数据源的违规列表
    pub async fn write(&self, source: &str, violations: &[SchemaViolation]) -> Result<()> {
        if violations.is_empty() {
            return Ok(());
        }
        debug!("写入警告: {} | {} 条", source, violations.len());

        let mut warn_msg = String::new();
        for v in violations {
            warn_msg.push_str(&format!(
                "数据源 {} | 第 {} 行 | ID {} | {}: {}\n",
                source,
                v.line,
                v.id.as_deref().unwrap_or("?"),
                v.field,
                v.reason
            ));
        }

        self.append(&warn_msg).await
    }

    /// 追加一个无法解析的数据源
    pub async fn write_failure(&self, source: &str, reason: &str) -> Result<()> {
        debug!("写入解析失败: {}", source);
        self.append(&format!("数据源 {} | 无法解析 | {}\n", source, reason))
            .await
    }

    async fn append(&self, text: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.warn_file_path)
            .await
            .with_context(|| format!("无法打开警告文件: {}", self.warn_file_path))?;

        file.write_all(text.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}

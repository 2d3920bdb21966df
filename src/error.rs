use std::path::PathBuf;
use thiserror::Error;

/// 题库审计错误类型
#[derive(Debug, Error)]
pub enum AuditError {
    /// 数据源文件不存在
    #[error("数据源不存在: {}", .path.display())]
    SourceNotFound { path: PathBuf },

    /// 读取数据源失败
    #[error("读取数据源失败 ({}): {source}", .path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 某一行不是合法的 JSON
    #[error("第 {line} 行 JSON 解析失败: {source} | 原始内容: {raw}")]
    MalformedRecord {
        line: usize,
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    /// 字段缺失或类型不符
    #[error(transparent)]
    SchemaViolation(#[from] SchemaViolation),

    /// 覆写数据源失败
    #[error("写入数据源失败 ({}): {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigInvalid(String),
}

/// 单条记录的结构违规
///
/// 在报告流程中被收集计数，在修正流程中直接中止。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("第 {line} 行 [{}] 字段 `{field}`: {reason}", .id.as_deref().unwrap_or("?"))]
pub struct SchemaViolation {
    /// 行号（从1开始）
    pub line: usize,
    /// 记录ID（能解析出来时）
    pub id: Option<String>,
    /// 出问题的字段路径，例如 `answer.keys`
    pub field: String,
    /// 一行原因
    pub reason: String,
}

impl SchemaViolation {
    pub fn new(
        line: usize,
        id: Option<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            line,
            id,
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// ========== 便捷构造函数 ==========

impl AuditError {
    /// 创建文件读取错误，文件不存在时归类为 SourceNotFound
    pub fn read_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            AuditError::SourceNotFound { path }
        } else {
            AuditError::ReadFailure { path, source }
        }
    }

    /// 创建写入错误
    pub fn write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AuditError::WriteFailure {
            path: path.into(),
            source,
        }
    }

    /// 是否中止整个运行
    ///
    /// 解析失败和结构违规只影响所在的数据源，批量报告跳过该数据源继续执行
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            AuditError::SchemaViolation(_) | AuditError::MalformedRecord { .. }
        )
    }
}

// ========== Result 类型别名 ==========

/// 审计结果类型
pub type AuditResult<T> = Result<T, AuditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_maps_to_source_not_found() {
        let err = AuditError::read_failed(
            "missing.jsonl",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, AuditError::SourceNotFound { .. }));
        assert!(err.to_string().contains("missing.jsonl"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_violation_display_names_field_and_id() {
        let v = SchemaViolation::new(3, Some("Q003".into()), "answer.keys", "应为字符串数组");
        let msg = v.to_string();
        assert!(msg.contains("第 3 行"));
        assert!(msg.contains("Q003"));
        assert!(msg.contains("answer.keys"));
        assert!(!AuditError::from(v).is_fatal());
    }

    #[test]
    fn test_malformed_record_is_confined_to_source() {
        let source = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = AuditError::MalformedRecord {
            line: 2,
            raw: "{oops".into(),
            source,
        };
        assert!(!err.is_fatal());
        assert!(AuditError::ConfigInvalid("x".into()).is_fatal());
    }
}

use crate::error::{AuditError, AuditResult};
use serde::Deserialize;
use std::path::Path;

/// 程序配置
///
/// 加载顺序：默认值 → TOML 配置文件 → 环境变量 → 命令行参数
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 每道题应有的选项数
    pub expected_choice_count: usize,
    /// 视为疑问句结尾的后缀
    pub question_suffixes: Vec<String>,
    /// 报告中题干预览的最大字符数
    pub preview_width: usize,
    /// 结构违规写入的文件，不设置则不写
    pub warn_file: Option<String>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- 重新编号 ---
    pub id_prefix: String,
    pub id_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            expected_choice_count: 4,
            question_suffixes: ["?", "가", "는가", "인가", "까"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            preview_width: 40,
            warn_file: None,
            verbose_logging: false,
            id_prefix: "Q".to_string(),
            id_width: 3,
        }
    }
}

impl Config {
    /// 从 TOML 文件加载，未出现的键取默认值
    pub fn from_toml_file(path: &Path) -> AuditResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| AuditError::read_failed(path, e))?;
        toml::from_str(&content).map_err(|e| {
            AuditError::ConfigInvalid(format!("无法解析配置文件 {}: {}", path.display(), e))
        })
    }

    /// 用进程环境变量覆盖
    pub fn with_env(self) -> Self {
        self.with_vars(|name| std::env::var(name).ok())
    }

    /// 用给定的变量查找函数覆盖
    pub fn with_vars(self, var: impl Fn(&str) -> Option<String>) -> Self {
        // 解析失败时保留原值
        let parsed = |name: &str| -> Option<usize> { var(name).and_then(|v| v.parse().ok()) };

        Self {
            expected_choice_count: parsed("QUESTION_AUDIT_EXPECTED_CHOICES")
                .unwrap_or(self.expected_choice_count),
            question_suffixes: var("QUESTION_AUDIT_SUFFIXES")
                .map(|v| parse_suffixes(&v))
                .unwrap_or(self.question_suffixes),
            preview_width: parsed("QUESTION_AUDIT_PREVIEW_WIDTH").unwrap_or(self.preview_width),
            warn_file: var("QUESTION_AUDIT_WARN_FILE").or(self.warn_file),
            verbose_logging: var("VERBOSE_LOGGING")
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.verbose_logging),
            id_prefix: var("QUESTION_AUDIT_ID_PREFIX").unwrap_or(self.id_prefix),
            id_width: parsed("QUESTION_AUDIT_ID_WIDTH").unwrap_or(self.id_width),
        }
    }

    /// 检查配置是否可用
    pub fn validate(&self) -> AuditResult<()> {
        if self.question_suffixes.iter().any(|s| s.is_empty()) {
            return Err(AuditError::ConfigInvalid("question_suffixes 不能包含空字符串".into()));
        }
        if self.preview_width == 0 {
            return Err(AuditError::ConfigInvalid("preview_width 必须大于 0".into()));
        }
        Ok(())
    }
}

fn parse_suffixes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

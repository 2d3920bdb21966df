//! 重新编号规则

use crate::models::question::QuestionRecord;

/// ID 格式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdScheme {
    /// 带前缀、补零，例如 `Q001`
    Prefixed { prefix: String, width: usize },
    /// 裸数字，例如 `1`
    Bare,
}

impl IdScheme {
    pub fn prefixed(prefix: impl Into<String>, width: usize) -> Self {
        IdScheme::Prefixed {
            prefix: prefix.into(),
            width,
        }
    }

    /// 生成第 n 条记录（从1开始）的 ID
    pub fn format(&self, n: usize) -> String {
        match self {
            IdScheme::Prefixed { prefix, width } => format!("{}{:0width$}", prefix, n, width = *width),
            IdScheme::Bare => n.to_string(),
        }
    }
}

impl Default for IdScheme {
    fn default() -> Self {
        IdScheme::prefixed("Q", 3)
    }
}

/// 按当前顺序重新生成 ID 与位置锚点，返回 (旧ID, 新ID) 列表
pub fn renumber(records: &mut [QuestionRecord], scheme: &IdScheme) -> Vec<(String, String)> {
    records
        .iter_mut()
        .enumerate()
        .map(|(index, record)| {
            let position = index + 1;
            let new_id = scheme.format(position);
            let old_id = std::mem::replace(&mut record.id, new_id.clone());
            record.set_position(position);
            (old_id, new_id)
        })
        .collect()
}

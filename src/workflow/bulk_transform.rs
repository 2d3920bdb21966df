//! 批量修正流程 - 流程层
//!
//! 流程顺序：
//! 1. 严格加载（任何结构违规都中止）
//! 2. 逐条应用调用方给出的规则（保留 / 删除 / 替换 / 拆分）
//! 3. 按 `IdScheme` 重新编号，重算位置锚点
//! 4. 原子覆写数据源
//!
//! 1-3 任何一步失败，目标文件都不会被触碰。

use crate::error::AuditResult;
use crate::models::loaders::{load_jsonl_source, save_jsonl_atomic};
use crate::models::question::QuestionRecord;
use crate::workflow::renumber::{renumber, IdScheme};
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

/// 单条记录的处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    /// 保留（可以是修改后的记录）
    Keep(QuestionRecord),
    /// 删除
    Drop,
    /// 拆成多条
    Split(Vec<QuestionRecord>),
}

/// 修正规则
pub trait TransformRule {
    fn apply(&mut self, record: QuestionRecord) -> Edit;
}

impl<F> TransformRule for F
where
    F: FnMut(QuestionRecord) -> Edit,
{
    fn apply(&mut self, record: QuestionRecord) -> Edit {
        self(record)
    }
}

/// 按 ID 或题干子串删除记录
#[derive(Debug, Clone, Default)]
pub struct DropMatching {
    pub ids: HashSet<String>,
    pub text_fragments: Vec<String>,
}

impl DropMatching {
    pub fn new<I, T, S, U>(ids: I, text_fragments: T) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        T: IntoIterator<Item = U>,
        U: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
            text_fragments: text_fragments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty() && self.text_fragments.is_empty()
    }

    fn matches(&self, record: &QuestionRecord) -> bool {
        self.ids.contains(&record.id)
            || self
                .text_fragments
                .iter()
                .any(|fragment| record.question_text.contains(fragment.as_str()))
    }
}

impl TransformRule for DropMatching {
    fn apply(&mut self, record: QuestionRecord) -> Edit {
        if self.matches(&record) {
            Edit::Drop
        } else {
            Edit::Keep(record)
        }
    }
}

/// 修正结果统计
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformSummary {
    pub before: usize,
    pub after: usize,
    /// 被删除记录的原 ID
    pub dropped: Vec<String>,
    /// 被拆分记录的原 ID 及拆分数
    pub split: Vec<(String, usize)>,
    /// (旧ID, 新ID)，只含发生变化的
    pub renamed: Vec<(String, String)>,
    /// 是否已写回文件
    pub written: bool,
}

/// 批量修正
pub struct BulkTransform {
    scheme: IdScheme,
    dry_run: bool,
}

impl BulkTransform {
    pub fn new(scheme: IdScheme) -> Self {
        Self {
            scheme,
            dry_run: false,
        }
    }

    /// 只计算不写回
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// 在内存中应用规则并重新编号
    pub fn apply<R: TransformRule + ?Sized>(
        &self,
        records: Vec<QuestionRecord>,
        rule: &mut R,
    ) -> (Vec<QuestionRecord>, TransformSummary) {
        let mut summary = TransformSummary {
            before: records.len(),
            ..Default::default()
        };
        let mut output = Vec::with_capacity(records.len());

        for record in records {
            let original_id = record.id.clone();
            match rule.apply(record) {
                Edit::Keep(kept) => output.push(kept),
                Edit::Drop => summary.dropped.push(original_id),
                Edit::Split(parts) => {
                    summary.split.push((original_id, parts.len()));
                    output.extend(parts);
                }
            }
        }

        summary.renamed = renumber(&mut output, &self.scheme)
            .into_iter()
            .filter(|(old, new)| old != new)
            .collect();
        summary.after = output.len();

        (output, summary)
    }

    /// 对文件执行：加载 → 规则 → 编号 → 覆写
    pub async fn run_on_file<R: TransformRule + ?Sized>(
        &self,
        path: &Path,
        rule: &mut R,
    ) -> AuditResult<TransformSummary> {
        info!("📂 正在加载: {}", path.display());
        let records = load_jsonl_source(path).await?.into_strict()?;

        let (output, mut summary) = self.apply(records, rule);
        info!(
            "✓ 修正完成: {} → {} 条 (删除 {}, 拆分 {})",
            summary.before,
            summary.after,
            summary.dropped.len(),
            summary.split.len()
        );

        if self.dry_run {
            warn!("⚠️ dry-run 模式，未写回文件");
            return Ok(summary);
        }

        save_jsonl_atomic(path, &output).await?;
        summary.written = true;
        Ok(summary)
    }
}

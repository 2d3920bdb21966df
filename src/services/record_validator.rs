//! 记录统计 - 业务能力层
//!
//! 对记录序列做一次线性扫描，每个判定维护一个计数。

use crate::models::question::QuestionRecord;
use crate::services::predicates::{Predicate, PredicateRules};
use std::fmt;

/// 百分比，保留一位小数；total 为 0 时返回 0
pub fn percentage(satisfied: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (satisfied as f64 / total as f64 * 1000.0).round() / 10.0
}

/// 单个判定的统计
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredicateStat {
    pub predicate: Predicate,
    pub satisfied: usize,
    pub total: usize,
}

impl PredicateStat {
    pub fn percentage(&self) -> f64 {
        percentage(self.satisfied, self.total)
    }
}

impl fmt::Display for PredicateStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({:.1}%)", self.satisfied, self.total, self.percentage())
    }
}

/// 一个数据源的汇总统计
#[derive(Debug, Clone, PartialEq)]
pub struct SourceStats {
    pub total: usize,
    pub predicates: Vec<PredicateStat>,
}

impl SourceStats {
    pub fn get(&self, predicate: Predicate) -> Option<&PredicateStat> {
        self.predicates.iter().find(|s| s.predicate == predicate)
    }

    /// 合并另一个数据源的统计（判定列表需一致）
    pub fn absorb(&mut self, other: &SourceStats) {
        self.total += other.total;
        for stat in &mut self.predicates {
            stat.total = self.total;
            if let Some(theirs) = other.get(stat.predicate) {
                stat.satisfied += theirs.satisfied;
            }
        }
    }
}

/// 记录校验器
pub struct RecordValidator {
    rules: PredicateRules,
    predicates: Vec<Predicate>,
}

impl RecordValidator {
    /// 使用全部判定
    pub fn new(rules: PredicateRules) -> Self {
        Self::with_predicates(rules, Predicate::ALL.to_vec())
    }

    pub fn with_predicates(rules: PredicateRules, predicates: Vec<Predicate>) -> Self {
        Self { rules, predicates }
    }

    pub fn check(&self, predicate: Predicate, record: &QuestionRecord) -> bool {
        self.rules.evaluate(predicate, record)
    }

    /// 统计所有判定
    pub fn validate(&self, records: &[QuestionRecord]) -> SourceStats {
        let mut counts = vec![0usize; self.predicates.len()];

        for record in records {
            for (count, predicate) in counts.iter_mut().zip(&self.predicates) {
                if self.rules.evaluate(*predicate, record) {
                    *count += 1;
                }
            }
        }

        let total = records.len();
        SourceStats {
            total,
            predicates: self
                .predicates
                .iter()
                .zip(counts)
                .map(|(predicate, satisfied)| PredicateStat {
                    predicate: *predicate,
                    satisfied,
                    total,
                })
                .collect(),
        }
    }

    /// 不满足某判定的记录，附带序号（从1开始），保持文件顺序
    pub fn failing<'a>(
        &self,
        predicate: Predicate,
        records: &'a [QuestionRecord],
    ) -> Vec<(usize, &'a QuestionRecord)> {
        records
            .iter()
            .enumerate()
            .filter(|(_, record)| !self.rules.evaluate(predicate, record))
            .map(|(index, record)| (index + 1, record))
            .collect()
    }

    /// 按判定顺序生成标记串，不满足的位置为 `·`
    pub fn flags(&self, record: &QuestionRecord) -> String {
        self.predicates
            .iter()
            .map(|p| if self.rules.evaluate(*p, record) { p.flag() } else { '·' })
            .collect()
    }
}

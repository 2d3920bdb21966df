//! 数据源一致性检查
//!
//! ID 唯一、ID 从1开始连续、选项数在整个数据源内一致。
//! 这些约束在历史数据里并不总是成立，这里只检查并报告。

use crate::models::question::QuestionRecord;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::OnceLock;

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([A-Za-z_-]*?)(\d+)$").expect("id pattern is a valid regex"))
}

/// 取出 ID 中的序号，`Q007` 和 `7` 都得到 7
pub fn id_number(id: &str) -> Option<u64> {
    id_pattern()
        .captures(id.trim())
        .and_then(|caps| caps.get(2))
        .and_then(|m| m.as_str().parse().ok())
}

/// 一致性检查结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntegrityReport {
    /// 重复的 ID 及其出现位置（从1开始）
    pub duplicates: Vec<(String, Vec<usize>)>,
    /// 1..=N 中缺失的序号
    pub missing: Vec<u64>,
    /// 超出 1..=N 的序号
    pub out_of_range: Vec<u64>,
    /// 无法解析出序号的 ID
    pub unparsable: Vec<String>,
    /// 选项数 → 记录数（没有选项的记录不计）
    pub choice_counts: BTreeMap<usize, usize>,
}

impl IntegrityReport {
    pub fn ids_are_dense(&self) -> bool {
        self.duplicates.is_empty()
            && self.missing.is_empty()
            && self.out_of_range.is_empty()
            && self.unparsable.is_empty()
    }

    pub fn choice_count_is_constant(&self) -> bool {
        self.choice_counts.len() <= 1
    }

    pub fn is_clean(&self) -> bool {
        self.ids_are_dense() && self.choice_count_is_constant()
    }
}

/// 检查一个数据源
pub fn check_integrity(records: &[QuestionRecord]) -> IntegrityReport {
    let mut report = IntegrityReport::default();

    let mut positions: HashMap<&str, Vec<usize>> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for (index, record) in records.iter().enumerate() {
        let entry = positions.entry(record.id.as_str()).or_default();
        if entry.is_empty() {
            order.push(record.id.as_str());
        }
        entry.push(index + 1);

        if let Some(count) = record.choice_count() {
            *report.choice_counts.entry(count).or_default() += 1;
        }
    }

    report.duplicates = order
        .iter()
        .filter_map(|id| {
            let seen = &positions[id];
            (seen.len() > 1).then(|| (id.to_string(), seen.clone()))
        })
        .collect();

    let total = records.len() as u64;
    let mut numbers = BTreeSet::new();
    for id in &order {
        match id_number(id) {
            Some(n) if (1..=total).contains(&n) => {
                numbers.insert(n);
            }
            Some(n) => report.out_of_range.push(n),
            None => report.unparsable.push(id.to_string()),
        }
    }
    report.out_of_range.sort_unstable();

    if report.unparsable.is_empty() {
        report.missing = (1..=total).filter(|n| !numbers.contains(n)).collect();
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(ids: &[&str]) -> Vec<QuestionRecord> {
        ids.iter().map(|id| QuestionRecord::new(*id, "x")).collect()
    }

    #[test]
    fn test_id_number() {
        assert_eq!(id_number("Q007"), Some(7));
        assert_eq!(id_number("12"), Some(12));
        assert_eq!(id_number("Q-3"), Some(3));
        assert_eq!(id_number("abc"), None);
        assert_eq!(id_number("3a"), None);
    }

    #[test]
    fn test_dense_source_is_clean() {
        let report = check_integrity(&records(&["Q001", "Q002", "Q003"]));
        assert!(report.is_clean());
    }

    #[test]
    fn test_duplicates_and_gaps() {
        let report = check_integrity(&records(&["Q001", "Q002", "Q002", "Q005"]));
        assert_eq!(report.duplicates, vec![("Q002".to_string(), vec![2, 3])]);
        assert_eq!(report.out_of_range, vec![5]);
        assert_eq!(report.missing, vec![3, 4]);
        assert!(!report.ids_are_dense());
    }

    #[test]
    fn test_unparsable_ids_skip_gap_check() {
        let report = check_integrity(&records(&["intro", "1"]));
        assert_eq!(report.unparsable, vec!["intro"]);
        assert!(report.missing.is_empty());
    }

    #[test]
    fn test_mixed_choice_counts() {
        let recs = vec![
            QuestionRecord::new("1", "x").with_options(["a", "b", "c", "d"]),
            QuestionRecord::new("2", "x").with_options(["a", "b", "c", "d", "e"]),
            QuestionRecord::new("3", "x"),
        ];
        let report = check_integrity(&recs);
        assert!(!report.choice_count_is_constant());
        assert_eq!(report.choice_counts.get(&4), Some(&1));
        assert_eq!(report.choice_counts.get(&5), Some(&1));
    }

    #[test]
    fn test_empty_source_is_clean() {
        assert!(check_integrity(&[]).is_clean());
    }
}

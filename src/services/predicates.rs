//! 记录判定
//!
//! 每个判定都是 `&QuestionRecord -> bool` 的纯函数，不依赖其他记录。
//! 缺失字段一律判为 false。

use crate::config::Config;
use crate::models::question::QuestionRecord;
use clap::ValueEnum;
use std::fmt;

/// 报告中可配置的判定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Predicate {
    /// 答案非空
    HasAnswer,
    /// 有解析
    HasExplanation,
    /// 题干以疑问后缀结尾
    EndsAsQuestion,
    /// 选项数等于期望值
    HasExpectedChoiceCount,
    /// 含代码块
    HasCodeBlock,
}

impl Predicate {
    pub const ALL: [Predicate; 5] = [
        Predicate::HasAnswer,
        Predicate::HasExplanation,
        Predicate::EndsAsQuestion,
        Predicate::HasExpectedChoiceCount,
        Predicate::HasCodeBlock,
    ];

    /// 报告表头使用的名称
    pub fn label(self) -> &'static str {
        match self {
            Predicate::HasAnswer => "hasAnswer",
            Predicate::HasExplanation => "hasExplanation",
            Predicate::EndsAsQuestion => "endsAsQuestion",
            Predicate::HasExpectedChoiceCount => "hasExpectedChoiceCount",
            Predicate::HasCodeBlock => "hasCodeBlock",
        }
    }

    /// 逐条输出时使用的单字符标记
    pub fn flag(self) -> char {
        match self {
            Predicate::HasAnswer => 'A',
            Predicate::HasExplanation => 'E',
            Predicate::EndsAsQuestion => 'Q',
            Predicate::HasExpectedChoiceCount => 'C',
            Predicate::HasCodeBlock => 'K',
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn has_answer(record: &QuestionRecord) -> bool {
    !record.answer.keys.is_empty()
}

/// 缺失、null、空串、纯空白都算没有解析
pub fn has_explanation(record: &QuestionRecord) -> bool {
    record
        .explanation
        .as_deref()
        .is_some_and(|text| !text.trim().is_empty())
}

pub fn ends_as_question<S: AsRef<str>>(record: &QuestionRecord, suffixes: &[S]) -> bool {
    let text = record.question_text.trim_end();
    suffixes.iter().any(|suffix| text.ends_with(suffix.as_ref()))
}

pub fn has_expected_choice_count(record: &QuestionRecord, expected: usize) -> bool {
    record.choice_count() == Some(expected)
}

pub fn has_code_block(record: &QuestionRecord) -> bool {
    !record.code_blocks.is_empty()
}

/// 判定参数
#[derive(Debug, Clone)]
pub struct PredicateRules {
    pub question_suffixes: Vec<String>,
    pub expected_choice_count: usize,
}

impl PredicateRules {
    pub fn new(config: &Config) -> Self {
        Self {
            question_suffixes: config.question_suffixes.clone(),
            expected_choice_count: config.expected_choice_count,
        }
    }

    pub fn evaluate(&self, predicate: Predicate, record: &QuestionRecord) -> bool {
        match predicate {
            Predicate::HasAnswer => has_answer(record),
            Predicate::HasExplanation => has_explanation(record),
            Predicate::EndsAsQuestion => ends_as_question(record, &self.question_suffixes),
            Predicate::HasExpectedChoiceCount => {
                has_expected_choice_count(record, self.expected_choice_count)
            }
            Predicate::HasCodeBlock => has_code_block(record),
        }
    }
}

impl Default for PredicateRules {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

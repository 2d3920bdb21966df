use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// 题目记录（JSONL 中的一行）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub question_text: String,

    #[serde(default)]
    pub answer: Answer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, alias = "choices", skip_serializing_if = "Option::is_none")]
    pub options: Option<Choices>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub code_blocks: Vec<CodeBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,

    /// 未在结构中声明的字段，原样保留
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QuestionRecord {
    pub fn new(id: impl Into<String>, question_text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            question_text: question_text.into(),
            answer: Answer::default(),
            explanation: None,
            options: None,
            code_blocks: Vec::new(),
            meta: None,
            extra: Map::new(),
        }
    }

    pub fn with_answer<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.answer.keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(Choices::List(options.into_iter().map(Into::into).collect()));
        self
    }

    /// 选项数量，没有选项时为 None
    pub fn choice_count(&self) -> Option<usize> {
        self.options.as_ref().map(Choices::len)
    }

    /// 设置位置锚点（从1开始）
    pub fn set_position(&mut self, position: usize) {
        self.meta.get_or_insert_with(Meta::default).position = Some(position);
    }
}

/// 答案
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    /// 可接受的答案，空表示未作答
    #[serde(default)]
    pub keys: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 选项：有的数据源是数组，有的是 `{"A": "..."}` 映射
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Choices {
    List(Vec<String>),
    Map(BTreeMap<String, String>),
}

impl Choices {
    pub fn len(&self) -> usize {
        match self {
            Choices::List(items) => items.len(),
            Choices::Map(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 代码块（仅代码输出类题目使用）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub code: String,
}

/// 溯源元数据
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// 指回原始文档的锚点文本
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub anchors: Vec<String>,
    /// 记录在数据源中的位置（从1开始），重新编号时重新计算
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ID 可能是 "Q001"，也可能是裸整数
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer id")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

//! 记录结构校验
//!
//! 先按字段检查 JSON 形状，得到能指出具体字段的诊断信息，
//! 再交给 serde 做真正的解码。

use crate::error::SchemaViolation;
use crate::models::question::QuestionRecord;
use serde_json::{Map, Value};

/// 校验并解码一行记录
///
/// # 参数
/// - `line`: 行号（从1开始，仅用于诊断）
/// - `value`: 已解析的 JSON 值
pub fn decode_record(line: usize, mut value: Value) -> Result<QuestionRecord, SchemaViolation> {
    let object = match value.as_object() {
        Some(object) => object,
        None => {
            return Err(SchemaViolation::new(
                line,
                None,
                "<record>",
                format!("应为 JSON 对象, 实际为 {}", kind_of(&value)),
            ))
        }
    };

    let id = read_id(object);
    check_fields(object)
        .map_err(|(field, reason)| SchemaViolation::new(line, id.clone(), field, reason))?;
    drop_nulls(&mut value);

    serde_json::from_value(value)
        .map_err(|e| SchemaViolation::new(line, id, "<record>", e.to_string()))
}

fn read_id(object: &Map<String, Value>) -> Option<String> {
    match object.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) if n.is_u64() || n.is_i64() => Some(n.to_string()),
        _ => None,
    }
}

type FieldIssue = (String, String);

fn check_fields(object: &Map<String, Value>) -> Result<(), FieldIssue> {
    match object.get("id") {
        None => return Err(issue("id", "缺少必填字段")),
        Some(Value::String(_)) => {}
        Some(Value::Number(n)) if n.is_u64() || n.is_i64() => {}
        Some(other) => return Err(expected("id", "字符串或整数", other)),
    }

    match object.get("questionText") {
        None => return Err(issue("questionText", "缺少必填字段")),
        Some(Value::String(_)) => {}
        Some(other) => return Err(expected("questionText", "字符串", other)),
    }

    match object.get("answer") {
        None | Some(Value::Null) => {}
        Some(Value::Object(answer)) => match answer.get("keys") {
            None | Some(Value::Null) => {}
            Some(Value::Array(keys)) => {
                if let Some(bad) = keys.iter().find(|k| !k.is_string()) {
                    return Err(expected("answer.keys[]", "字符串", bad));
                }
            }
            Some(other) => return Err(expected("answer.keys", "字符串数组", other)),
        },
        Some(other) => return Err(expected("answer", "对象", other)),
    }

    match object.get("explanation") {
        None | Some(Value::Null) | Some(Value::String(_)) => {}
        Some(other) => return Err(expected("explanation", "字符串", other)),
    }

    for name in ["options", "choices"] {
        match object.get(name) {
            None | Some(Value::Null) => {}
            Some(Value::Array(items)) => {
                if let Some(bad) = items.iter().find(|v| !is_string_or_null(v)) {
                    return Err(expected(&format!("{}[]", name), "字符串", bad));
                }
            }
            Some(Value::Object(items)) => {
                if let Some((label, bad)) = items.iter().find(|(_, v)| !is_string_or_null(v)) {
                    return Err(expected(&format!("{}.{}", name, label), "字符串", bad));
                }
            }
            Some(other) => return Err(expected(name, "数组或对象", other)),
        }
    }

    match object.get("codeBlocks") {
        None | Some(Value::Null) => {}
        Some(Value::Array(blocks)) => {
            for (i, block) in blocks.iter().enumerate() {
                let Some(block) = block.as_object() else {
                    return Err(expected(&format!("codeBlocks[{}]", i), "对象", block));
                };
                for key in ["language", "filename", "code"] {
                    match block.get(key) {
                        None | Some(Value::Null) | Some(Value::String(_)) => {}
                        Some(other) => {
                            let field = format!("codeBlocks[{}].{}", i, key);
                            return Err(expected(&field, "字符串", other));
                        }
                    }
                }
            }
        }
        Some(other) => return Err(expected("codeBlocks", "数组", other)),
    }

    match object.get("meta") {
        None | Some(Value::Null) => {}
        Some(Value::Object(meta)) => {
            match meta.get("confidence") {
                None | Some(Value::Null) | Some(Value::Number(_)) => {}
                Some(other) => return Err(expected("meta.confidence", "数字", other)),
            }
            for key in ["warnings", "anchors"] {
                match meta.get(key) {
                    None | Some(Value::Null) => {}
                    Some(Value::Array(items)) if items.iter().all(Value::is_string) => {}
                    Some(other) => {
                        return Err(expected(&format!("meta.{}", key), "字符串数组", other))
                    }
                }
            }
            match meta.get("position") {
                None | Some(Value::Null) => {}
                Some(Value::Number(n)) if n.is_u64() => {}
                Some(other) => return Err(expected("meta.position", "非负整数", other)),
            }
        }
        Some(other) => return Err(expected("meta", "对象", other)),
    }

    Ok(())
}

// null 与缺省同义，去掉后再交给 serde。
// 选项里的 null 也一并去掉，不计入选项数。
fn drop_nulls(value: &mut Value) {
    let Some(object) = value.as_object_mut() else {
        return;
    };
    object.retain(|_, v| !v.is_null());
    for nested in ["answer", "meta"] {
        if let Some(Value::Object(inner)) = object.get_mut(nested) {
            inner.retain(|_, v| !v.is_null());
        }
    }
    for name in ["options", "choices"] {
        match object.get_mut(name) {
            Some(Value::Array(items)) => items.retain(|v| !v.is_null()),
            Some(Value::Object(items)) => items.retain(|_, v| !v.is_null()),
            _ => {}
        }
    }
    if let Some(Value::Array(blocks)) = object.get_mut("codeBlocks") {
        for block in blocks.iter_mut().filter_map(Value::as_object_mut) {
            block.retain(|_, v| !v.is_null());
        }
    }
}

fn is_string_or_null(value: &Value) -> bool {
    value.is_string() || value.is_null()
}

fn issue(field: &str, reason: &str) -> FieldIssue {
    (field.to_string(), reason.to_string())
}

fn expected(field: &str, what: &str, got: &Value) -> FieldIssue {
    (field.to_string(), format!("应为{}, 实际为 {}", what, kind_of(got)))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_record_decodes() {
        let record = decode_record(
            1,
            json!({"id": "Q001", "questionText": "무엇인가?", "answer": {"keys": ["2"]}}),
        )
        .unwrap();
        assert_eq!(record.answer.keys, vec!["2"]);
    }

    #[test]
    fn test_missing_question_text() {
        let err = decode_record(4, json!({"id": "Q004"})).unwrap_err();
        assert_eq!(err.line, 4);
        assert_eq!(err.id.as_deref(), Some("Q004"));
        assert_eq!(err.field, "questionText");
    }

    #[test]
    fn test_keys_not_a_sequence() {
        let err = decode_record(
            2,
            json!({"id": 2, "questionText": "x", "answer": {"keys": "3"}}),
        )
        .unwrap_err();
        assert_eq!(err.field, "answer.keys");
        assert_eq!(err.id.as_deref(), Some("2"));
        assert!(err.reason.contains("string"));
    }

    #[test]
    fn test_non_object_line() {
        let err = decode_record(9, json!([1, 2])).unwrap_err();
        assert_eq!(err.field, "<record>");
        assert!(err.id.is_none());
    }

    #[test]
    fn test_null_explanation_is_accepted() {
        let record =
            decode_record(1, json!({"id": "1", "questionText": "x", "explanation": null})).unwrap();
        assert!(record.explanation.is_none());
    }

    #[test]
    fn test_code_block_with_null_filename() {
        let record = decode_record(
            1,
            json!({
                "id": "Q001",
                "questionText": "출력 결과는?",
                "answer": {"keys": ["3"]},
                "codeBlocks": [{"language": "c", "filename": null, "code": "int main(){}"}]
            }),
        )
        .unwrap();
        assert_eq!(record.code_blocks.len(), 1);
        assert_eq!(record.code_blocks[0].language, "c");
        assert_eq!(record.code_blocks[0].filename, "");
        assert_eq!(record.code_blocks[0].code, "int main(){}");
    }

    #[test]
    fn test_code_block_with_wrong_type() {
        let err = decode_record(
            5,
            json!({"id": "Q005", "questionText": "x", "codeBlocks": [{"code": 42}]}),
        )
        .unwrap_err();
        assert_eq!(err.field, "codeBlocks[0].code");
        assert!(err.reason.contains("number"));
    }

    #[test]
    fn test_null_options_are_not_counted() {
        let record = decode_record(
            1,
            json!({"id": "1", "questionText": "x", "options": ["①", null, "③", "④"]}),
        )
        .unwrap();
        assert_eq!(record.choice_count(), Some(3));

        let record = decode_record(
            2,
            json!({"id": "2", "questionText": "x", "choices": {"A": "a", "B": null}}),
        )
        .unwrap();
        assert_eq!(record.choice_count(), Some(1));
    }

    #[test]
    fn test_bad_option_label() {
        let err = decode_record(
            1,
            json!({"id": "1", "questionText": "x", "choices": {"A": "one", "B": 2}}),
        )
        .unwrap_err();
        assert_eq!(err.field, "choices.B");
    }
}

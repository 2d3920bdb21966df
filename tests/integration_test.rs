#![allow(deprecated)] // Command::cargo_bin is deprecated but still functional

use assert_cmd::Command;
use predicates::str::contains;
use question_audit::models::loaders::{load_jsonl_source, save_jsonl_atomic};
use question_audit::orchestrator::{App, ReportOptions};
use question_audit::services::{Predicate, PredicateRules, RecordValidator};
use question_audit::workflow::{BulkTransform, DropMatching, IdScheme};
use question_audit::{Config, QuestionRecord};
use std::path::Path;

fn exam_source(total: usize, answered: usize) -> Vec<QuestionRecord> {
    (1..=total)
        .map(|i| {
            let record = QuestionRecord::new(format!("Q{:03}", i), format!("{}번 문제는 무엇인가?", i))
                .with_options(["①", "②", "③", "④"]);
            if i <= answered {
                record.with_answer([((i % 4) + 1).to_string()])
            } else {
                record
            }
        })
        .collect()
}

async fn write_source(path: &Path, records: &[QuestionRecord]) {
    save_jsonl_atomic(path, records).await.unwrap();
}

#[tokio::test]
async fn test_eighteen_of_twenty_answered() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("2023-1.jsonl");
    write_source(&path, &exam_source(20, 18)).await;

    let mut out = Vec::new();
    let app = App::new(Config::default(), ReportOptions::default());
    let summary = app.run(&[path.clone()], &mut out).await.unwrap();

    let text = String::from_utf8(out).unwrap();
    assert_eq!(summary.records, 20);
    assert!(text.contains("hasAnswer"));
    assert!(text.contains("18/20 (90.0%)"));
}

#[tokio::test]
async fn test_empty_source_reports_zero_without_fault() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.jsonl");
    std::fs::write(&path, "\n\n").unwrap();

    let mut out = Vec::new();
    let app = App::new(Config::default(), ReportOptions::default());
    let summary = app.run(&[path], &mut out).await.unwrap();

    assert_eq!(summary.records, 0);
    assert!(String::from_utf8(out).unwrap().contains("0/0 (0.0%)"));
}

#[tokio::test]
async fn test_report_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bank.jsonl");
    write_source(&path, &exam_source(12, 7)).await;

    let validator = RecordValidator::new(PredicateRules::default());
    let first = load_jsonl_source(&path).await.unwrap();
    let second = load_jsonl_source(&path).await.unwrap();
    assert_eq!(validator.validate(&first.records), validator.validate(&second.records));
}

#[tokio::test]
async fn test_noop_transform_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bank.jsonl");
    let original = exam_source(6, 6);
    write_source(&path, &original).await;

    let loaded = load_jsonl_source(&path).await.unwrap().into_strict().unwrap();
    write_source(&path, &loaded).await;
    let reloaded = load_jsonl_source(&path).await.unwrap().into_strict().unwrap();

    assert_eq!(reloaded, original);
}

#[tokio::test]
async fn test_remove_three_of_twenty_three_then_renumber() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bank.jsonl");
    write_source(&path, &exam_source(23, 23)).await;

    let mut rule = DropMatching::new(["Q002", "Q011"], ["23번 문제"]);
    let summary = BulkTransform::new(IdScheme::default())
        .run_on_file(&path, &mut rule)
        .await
        .unwrap();
    assert_eq!(summary.after, 20);

    let records = load_jsonl_source(&path).await.unwrap().into_strict().unwrap();
    let ids: Vec<_> = records.iter().map(|r| r.id.clone()).collect();
    let expected: Vec<_> = (1..=20).map(|i| format!("Q{:03}", i)).collect();
    assert_eq!(ids, expected);

    let positions: Vec<_> = records
        .iter()
        .filter_map(|r| r.meta.as_ref().and_then(|m| m.position))
        .collect();
    assert_eq!(positions, (1..=20).collect::<Vec<_>>());

    // 第三条原来是 Q004
    assert_eq!(records[2].question_text, "4번 문제는 무엇인가?");
    assert!(!records.iter().any(|r| r.question_text.starts_with("23번")));
}

#[test]
fn test_endings() {
    let validator = RecordValidator::with_predicates(
        PredicateRules::default(),
        vec![Predicate::EndsAsQuestion],
    );
    let asked = QuestionRecord::new("1", "이것은 무엇인가");
    let stated = QuestionRecord::new("2", "완료되었다");
    assert!(validator.check(Predicate::EndsAsQuestion, &asked));
    assert!(!validator.check(Predicate::EndsAsQuestion, &stated));
}

#[test]
fn test_cli_missing_source_exits_non_zero() {
    Command::cargo_bin("question-audit")
        .unwrap()
        .args(["report", "/definitely/not/here.jsonl"])
        .assert()
        .failure()
        .stderr(contains("/definitely/not/here.jsonl"));
}

#[test]
fn test_cli_strict_fails_on_violations() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bank.jsonl");
    std::fs::write(
        &path,
        "{\"id\":\"Q001\",\"questionText\":\"무엇인가?\"}\n{\"id\":\"Q002\",\"answer\":{\"keys\":\"1\"}}\n",
    )
    .unwrap();

    Command::cargo_bin("question-audit")
        .unwrap()
        .arg("report")
        .arg(&path)
        .assert()
        .success()
        .stdout(contains("结构违规 (1 条)"));

    Command::cargo_bin("question-audit")
        .unwrap()
        .arg("report")
        .arg(&path)
        .arg("--strict")
        .assert()
        .failure();
}

#[test]
fn test_cli_malformed_line_reports_line_number() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bank.jsonl");
    std::fs::write(&path, "{\"id\":\"Q001\",\"questionText\":\"a\"}\n{oops\n").unwrap();

    Command::cargo_bin("question-audit")
        .unwrap()
        .arg("report")
        .arg(&path)
        .assert()
        .failure()
        .stdout(contains("第 2 行"))
        .stdout(contains("{oops"))
        .stderr(contains("1 个数据源无法解析"));
}

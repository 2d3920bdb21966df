//! 修正任务 - 编排层
//!
//! 把命令行给出的删除条件交给 `BulkTransform`，并输出修正摘要。

use crate::workflow::{BulkTransform, DropMatching, IdScheme, TransformSummary};
use anyhow::Result;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// 删除匹配的记录并重新编号
pub async fn run_renumber(
    path: &Path,
    rule: &mut DropMatching,
    scheme: IdScheme,
    dry_run: bool,
    out: &mut dyn Write,
) -> Result<TransformSummary> {
    if rule.is_empty() {
        info!("💡 未指定删除条件，仅重新编号");
    }

    let summary = BulkTransform::new(scheme)
        .dry_run(dry_run)
        .run_on_file(path, rule)
        .await?;

    write_summary(out, path, &summary)?;
    Ok(summary)
}

fn write_summary(out: &mut dyn Write, path: &Path, summary: &TransformSummary) -> std::io::Result<()> {
    writeln!(out, "{}", "=".repeat(60))?;
    writeln!(out, "🛠️ {}", path.display())?;
    writeln!(out, "记录: {} → {}", summary.before, summary.after)?;
    if !summary.dropped.is_empty() {
        writeln!(out, "删除: {}", summary.dropped.join(", "))?;
    }
    for (id, parts) in &summary.split {
        writeln!(out, "拆分: {} → {} 条", id, parts)?;
    }
    writeln!(out, "重新编号: {} 条", summary.renamed.len())?;
    if summary.written {
        writeln!(out, "✓ 已写回")?;
    } else {
        writeln!(out, "dry-run，未写回")?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::loaders::{load_jsonl_source, save_jsonl_atomic};
    use crate::models::question::QuestionRecord;

    #[tokio::test]
    async fn test_run_renumber_writes_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.jsonl");
        let records: Vec<_> = ["3", "5", "9"]
            .iter()
            .map(|id| QuestionRecord::new(*id, "질문인가"))
            .collect();
        save_jsonl_atomic(&path, &records).await.unwrap();

        let mut rule = DropMatching::new(["5"], Vec::<String>::new());
        let mut out = Vec::new();
        let summary = run_renumber(&path, &mut rule, IdScheme::Bare, false, &mut out)
            .await
            .unwrap();

        assert!(summary.written);
        let reloaded = load_jsonl_source(&path).await.unwrap().into_strict().unwrap();
        let ids: Vec<_> = reloaded.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert!(String::from_utf8(out).unwrap().contains("删除: 5"));
    }
}

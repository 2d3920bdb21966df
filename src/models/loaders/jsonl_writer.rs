use crate::error::{AuditError, AuditResult};
use crate::models::question::QuestionRecord;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// 将记录序列化为 JSONL 文本（每条记录后跟一个换行）
pub fn to_jsonl(records: &[QuestionRecord]) -> serde_json::Result<String> {
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    Ok(out)
}

/// 原子覆写数据源
///
/// 先写入同目录下的临时文件，再 rename 覆盖原文件；
/// 任何一步失败，原文件保持不变。原文件存在时沿用其权限。
pub async fn save_jsonl_atomic(path: &Path, records: &[QuestionRecord]) -> AuditResult<()> {
    let content = to_jsonl(records)
        .map_err(|e| AuditError::write_failed(path, std::io::Error::other(e)))?;
    let target = path.to_path_buf();

    tokio::task::spawn_blocking(move || write_atomic(&target, content.as_bytes()))
        .await
        .map_err(|e| AuditError::write_failed(path, std::io::Error::other(e)))??;

    tracing::info!("✓ 已写入 {} 条记录: {}", records.len(), path.display());
    Ok(())
}

fn write_atomic(target: &Path, bytes: &[u8]) -> AuditResult<()> {
    let dir = parent_dir(target);
    let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| AuditError::write_failed(&dir, e))?;

    tmp.write_all(bytes)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| AuditError::write_failed(tmp.path(), e))?;

    match std::fs::metadata(target) {
        Ok(metadata) => tmp
            .as_file()
            .set_permissions(metadata.permissions())
            .map_err(|e| AuditError::write_failed(tmp.path(), e))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(AuditError::read_failed(target, e)),
    }

    tmp.persist(target)
        .map_err(|e| AuditError::write_failed(target, e.error))?;
    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::loaders::jsonl_loader::load_jsonl_source;

    fn sample() -> Vec<QuestionRecord> {
        vec![
            QuestionRecord::new("Q001", "다음 중 옳은 것은?")
                .with_answer(["2"])
                .with_options(["가", "나", "다", "라"]),
            QuestionRecord::new("Q002", "[보기]\n무엇인가").with_explanation("설명"),
        ]
    }

    #[tokio::test]
    async fn test_round_trip_is_field_equal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("round.jsonl");
        let records = sample();

        save_jsonl_atomic(&path, &records).await.unwrap();
        let first = load_jsonl_source(&path).await.unwrap().into_strict().unwrap();
        assert_eq!(first, records);

        save_jsonl_atomic(&path, &first).await.unwrap();
        let second = load_jsonl_source(&path).await.unwrap().into_strict().unwrap();
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn test_overwrite_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.jsonl");
        std::fs::write(&path, "old content\n").unwrap();

        save_jsonl_atomic(&path, &sample()[..1]).await.unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.ends_with('\n'));
        assert!(text.contains("Q001"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_overwrite_keeps_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.jsonl");
        std::fs::write(&path, "old content\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        save_jsonl_atomic(&path, &sample()).await.unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[tokio::test]
    async fn test_missing_directory_is_write_failure() {
        let path = Path::new("/definitely/not/here/bank.jsonl");
        let err = save_jsonl_atomic(path, &sample()).await.unwrap_err();
        assert!(matches!(err, AuditError::WriteFailure { .. }));
    }

    #[test]
    fn test_parent_dir_of_bare_file_name() {
        assert_eq!(parent_dir(Path::new("bank.jsonl")), PathBuf::from("."));
    }
}

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use tokio_rusqlite::Connection;

use crate::error::Result;
use crate::models::SummaryRecord;

use super::schema::SCHEMA;

const SELECT_COLUMNS: &str = "SELECT id, original_text, summary, created_at FROM summaries";

/// Append/list/delete store for past summarizations.
///
/// Every operation opens its own connection and closes it before returning, so
/// no transaction or lock outlives a single call.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    db_path: PathBuf,
}

impl HistoryStore {
    /// Creates the `summaries` table if it does not exist yet.
    pub async fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let store = Self { db_path };
        let conn = store.connect().await?;
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;
        conn.close().await?;

        tracing::debug!("History store ready at {}", store.db_path.display());
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    async fn connect(&self) -> Result<Connection> {
        Ok(Connection::open(&self.db_path).await?)
    }

    pub async fn append(&self, original: &str, summary: &str) -> Result<i64> {
        let original = original.to_string();
        let summary = summary.to_string();

        let conn = self.connect().await?;
        let id = conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO summaries (original_text, summary) VALUES (?1, ?2)",
                    params![original, summary],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;
        conn.close().await?;

        tracing::debug!("Saved summary {}", id);
        Ok(id)
    }

    /// All records, most recent first. Rows written within the same second keep
    /// reverse insertion order through the id tie-break.
    pub async fn list_all(&self) -> Result<Vec<SummaryRecord>> {
        let conn = self.connect().await?;
        let records = conn
            .call(|conn| {
                let mut stmt =
                    conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY created_at DESC, id DESC"))?;
                let records = stmt
                    .query_map([], record_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(records)
            })
            .await?;
        conn.close().await?;
        Ok(records)
    }

    pub async fn get(&self, id: i64) -> Result<Option<SummaryRecord>> {
        let conn = self.connect().await?;
        let record = conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?;
                let record = stmt
                    .query_row(params![id], record_from_row)
                    .optional()?;
                Ok(record)
            })
            .await?;
        conn.close().await?;
        Ok(record)
    }

    /// Removes the record if present. Unknown ids are ignored.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let conn = self.connect().await?;
        let removed = conn
            .call(move |conn| {
                let removed = conn.execute("DELETE FROM summaries WHERE id = ?1", params![id])?;
                Ok(removed)
            })
            .await?;
        conn.close().await?;

        if removed == 0 {
            tracing::debug!("Delete of missing summary {} ignored", id);
        }
        Ok(())
    }
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    // Try RFC3339 first (e.g., "2026-01-11T12:34:56+00:00")
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // SQLite CURRENT_TIMESTAMP format (e.g., "2026-01-11 12:34:56")
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}

fn record_from_row(row: &Row) -> rusqlite::Result<SummaryRecord> {
    Ok(SummaryRecord {
        id: row.get(0)?,
        original_text: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        summary: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        created_at: row
            .get::<_, Option<String>>(3)?
            .and_then(|s| parse_datetime(&s))
            .unwrap_or_else(Utc::now),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio_test::assert_ok;

    async fn temp_store() -> (TempDir, HistoryStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::open(dir.path().join("summarizer.db"))
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn append_then_list_returns_new_record_first() {
        let (_dir, store) = temp_store().await;

        store.append("older", "old summary").await.unwrap();
        let id = store.append("ข้อความต้นฉบับ", "สรุป").await.unwrap();

        let records = store.list_all().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, id);
        assert_eq!(records[0].original_text, "ข้อความต้นฉบับ");
        assert_eq!(records[0].summary, "สรุป");
    }

    #[tokio::test]
    async fn lists_in_reverse_insertion_order() {
        let (_dir, store) = temp_store().await;

        store.append("Text A", "Sum A").await.unwrap();
        store.append("Text B", "Sum B").await.unwrap();

        let pairs: Vec<(String, String)> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| (r.original_text, r.summary))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("Text B".to_string(), "Sum B".to_string()),
                ("Text A".to_string(), "Sum A".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn ids_are_unique_and_increasing() {
        let (_dir, store) = temp_store().await;

        let first = store.append("a", "1").await.unwrap();
        let second = store.append("b", "2").await.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn delete_removes_only_that_record() {
        let (_dir, store) = temp_store().await;

        let keep = store.append("keep", "k").await.unwrap();
        let gone = store.append("gone", "g").await.unwrap();

        store.delete(gone).await.unwrap();

        let records = store.list_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, keep);
        assert!(store.get(gone).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_of_missing_id_is_a_no_op() {
        let (_dir, store) = temp_store().await;
        store.append("only", "one").await.unwrap();

        let before = store.list_all().await.unwrap();
        assert_ok!(store.delete(9_999).await);
        let after = store.list_all().await.unwrap();

        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn records_survive_reopening_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.db");

        let id = {
            let store = HistoryStore::open(&path).await.unwrap();
            store.append("persisted", "yes").await.unwrap()
        };

        let reopened = HistoryStore::open(&path).await.unwrap();
        let record = reopened.get(id).await.unwrap().unwrap();
        assert_eq!(record.original_text, "persisted");
        assert_eq!(record.summary, "yes");
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let (_dir, store) = temp_store().await;
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[test]
    fn parses_sqlite_timestamps() {
        let dt = parse_datetime("2026-01-11 12:34:56").unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-01-11T12:34:56+00:00");
        assert!(parse_datetime("not a date").is_none());
    }
}

//! SQLite implementation of the record store and of the certificate texts setting.
//!
//! Like the rest of the service it opens a short-lived connection per call and
//! runs the synchronous rusqlite work on the blocking pool.

use crate::store::{RecordField, RecordStore, StoreError};
use common::model::certificate::CertificateTexts;
use common::model::record::{EnrollmentRecord, Score};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS students (
    id TEXT PRIMARY KEY,
    code TEXT NOT NULL,
    name TEXT NOT NULL,
    mobile_number TEXT NOT NULL,
    service TEXT NOT NULL,
    score INTEGER,
    attendance INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_students_code ON students (code);
CREATE INDEX IF NOT EXISTS idx_students_mobile ON students (mobile_number);
CREATE TABLE IF NOT EXISTS certificate_texts (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    body TEXT NOT NULL
);
";

#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    /// Opens the database at `path`, creating the tables if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
        };
        store.connect()?.execute_batch(SCHEMA)?;
        Ok(store)
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        Ok(Connection::open(&self.path)?)
    }

    /// Synchronous equality lookup. `score` NULL stands for the absent sentinel.
    pub fn find_where_blocking(
        &self,
        field: RecordField,
        value: &str,
    ) -> Result<Vec<EnrollmentRecord>, StoreError> {
        let conn = self.connect()?;
        let sql = format!(
            "SELECT id, code, name, mobile_number, service, score, attendance \
             FROM students WHERE {} = ?1 ORDER BY rowid",
            field.column()
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![value], read_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row??);
        }
        Ok(records)
    }

    /// Inserts all `records` in one transaction.
    pub fn insert_batch(&self, records: &[EnrollmentRecord]) -> Result<usize, StoreError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO students (id, code, name, mobile_number, service, score, attendance) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for r in records {
                stmt.execute(params![
                    r.id,
                    r.code,
                    r.name,
                    r.mobile_number,
                    r.service,
                    r.score.points(),
                    r.attendance
                ])?;
            }
        }
        tx.commit()?;
        Ok(records.len())
    }

    /// Latest stored certificate texts, or the defaults if none were saved yet.
    pub fn load_texts(&self) -> Result<CertificateTexts, StoreError> {
        let conn = self.connect()?;
        let body: Option<String> = conn
            .query_row("SELECT body FROM certificate_texts WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;
        match body {
            Some(json) => serde_json::from_str(&json).map_err(|e| StoreError::Malformed {
                id: "certificate_texts".to_string(),
                reason: e.to_string(),
            }),
            None => Ok(CertificateTexts::default()),
        }
    }

    pub fn save_texts(&self, texts: &CertificateTexts) -> Result<(), StoreError> {
        let body = serde_json::to_string(texts).map_err(|e| StoreError::Malformed {
            id: "certificate_texts".to_string(),
            reason: e.to_string(),
        })?;
        self.connect()?.execute(
            "INSERT OR REPLACE INTO certificate_texts (id, body) VALUES (1, ?1)",
            params![body],
        )?;
        Ok(())
    }
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<Result<EnrollmentRecord, StoreError>> {
    let id: String = row.get(0)?;
    let score: Option<i64> = row.get(5)?;
    let attendance: i64 = row.get(6)?;

    let score = match score {
        None => Score::Absent,
        Some(points) => match Score::from_number(points as f64) {
            Some(s) => s,
            None => {
                return Ok(Err(StoreError::Malformed {
                    id,
                    reason: format!("score {} out of range", points),
                }))
            }
        },
    };
    let attendance = match u8::try_from(attendance) {
        Ok(a) if a <= 100 => a,
        _ => {
            return Ok(Err(StoreError::Malformed {
                id,
                reason: format!("attendance {} out of range", attendance),
            }))
        }
    };

    Ok(Ok(EnrollmentRecord {
        id,
        code: row.get(1)?,
        name: row.get(2)?,
        mobile_number: row.get(3)?,
        service: row.get(4)?,
        score,
        attendance,
    }))
}

impl RecordStore for SqliteStore {
    fn find_where<'a>(
        &'a self,
        field: RecordField,
        value: &'a str,
    ) -> BoxFuture<'a, Result<Vec<EnrollmentRecord>, StoreError>> {
        let store = self.clone();
        let value = value.to_string();
        async move {
            tokio::task::spawn_blocking(move || store.find_where_blocking(field, &value))
                .await
                .map_err(|e| StoreError::Task(e.to_string()))?
        }
        .boxed()
    }
}

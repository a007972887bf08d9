use super::record::{WorkItemRecord, format_date};
use super::{
    NewWorkItem, StoreError, StoreResult, WorkItemFilter, WorkItemPatch, WorkItemStore, now_local,
    validate_row,
};
use crate::work_item::{WorkItem, WorkItemId};
use rusqlite::{Connection, OptionalExtension, Row, Transaction, params};
use std::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

const COLUMNS: &str = "id, work_date, work_time, duration_minutes, status, department, detail, \
                       worker, worker_role, work_shift, created_by, created_at";

pub struct SqliteWorkItemStore {
    connection: Mutex<Connection>,
}

impl SqliteWorkItemStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> StoreResult<Self> {
        let connection = Connection::open(path.as_ref())?;
        Self::initialize_schema(&connection)?;
        info!(path = %path.as_ref().display(), "opened sqlite work item store");
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub fn in_memory() -> StoreResult<Self> {
        let connection = Connection::open_in_memory()?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> StoreResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS work_schedule (
                id TEXT PRIMARY KEY,
                work_date TEXT NOT NULL,
                work_time TEXT NOT NULL,
                duration_minutes INTEGER NOT NULL DEFAULT 60,
                status TEXT,
                department TEXT NOT NULL,
                detail TEXT NOT NULL,
                worker TEXT NOT NULL,
                worker_role TEXT NOT NULL,
                work_shift TEXT NOT NULL,
                created_by TEXT,
                created_at TEXT
            );
            CREATE INDEX IF NOT EXISTS work_schedule_start
                ON work_schedule (work_date, work_time);
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn read_record(row: &Row<'_>) -> rusqlite::Result<WorkItemRecord> {
        Ok(WorkItemRecord {
            id: row.get(0)?,
            work_date: row.get(1)?,
            work_time: row.get(2)?,
            duration_minutes: row.get(3)?,
            status: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            department: row.get(5)?,
            detail: row.get(6)?,
            worker: row.get(7)?,
            worker_role: row.get(8)?,
            work_shift: row.get(9)?,
            created_by: row.get::<_, Option<String>>(10)?.unwrap_or_default(),
            created_at: row.get::<_, Option<String>>(11)?.unwrap_or_default(),
        })
    }

    fn write_record(tx: &Transaction<'_>, record: &WorkItemRecord) -> StoreResult<usize> {
        let changed = tx.execute(
            "UPDATE work_schedule SET work_date = ?2, work_time = ?3, duration_minutes = ?4, \
             status = ?5, department = ?6, detail = ?7, worker = ?8, worker_role = ?9, \
             work_shift = ?10 WHERE id = ?1",
            params![
                record.id,
                record.work_date,
                record.work_time,
                record.duration_minutes,
                record.status,
                record.department,
                record.detail,
                record.worker,
                record.worker_role,
                record.work_shift,
            ],
        )?;
        Ok(changed)
    }

    fn find_in(tx: &Transaction<'_>, id: WorkItemId) -> StoreResult<Option<WorkItem>> {
        let sql = format!("SELECT {COLUMNS} FROM work_schedule WHERE id = ?1");
        let record = tx
            .query_row(&sql, params![id.to_string()], Self::read_record)
            .optional()?;
        record.map(WorkItem::try_from).transpose()
    }
}

impl WorkItemStore for SqliteWorkItemStore {
    fn list(&self, filter: &WorkItemFilter) -> StoreResult<Vec<WorkItem>> {
        let conn = self.connection.lock().expect("sqlite mutex poisoned");
        let from = filter.from.map(format_date).unwrap_or_default();
        let to = filter.to.map(format_date).unwrap_or_else(|| "9999-12-31".to_string());

        let sql = format!(
            "SELECT {COLUMNS} FROM work_schedule WHERE work_date >= ?1 AND work_date <= ?2 \
             ORDER BY work_date ASC, work_time ASC, rowid ASC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![from, to], Self::read_record)?;

        let mut items = Vec::new();
        for record in rows {
            let item = WorkItem::try_from(record?)?;
            if filter.matches(&item) {
                items.push(item);
            }
        }
        Ok(items)
    }

    fn get(&self, id: WorkItemId) -> StoreResult<Option<WorkItem>> {
        let mut conn = self.connection.lock().expect("sqlite mutex poisoned");
        let tx = conn.transaction()?;
        let item = Self::find_in(&tx, id)?;
        tx.commit()?;
        Ok(item)
    }

    fn insert(&self, fields: NewWorkItem) -> StoreResult<WorkItem> {
        let item = fields.into_item(Uuid::new_v4(), now_local());
        validate_row(&item)?;
        let record = WorkItemRecord::from(&item);
        let conn = self.connection.lock().expect("sqlite mutex poisoned");
        let sql = format!(
            "INSERT INTO work_schedule ({COLUMNS}) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
        );
        conn.execute(
            &sql,
            params![
                record.id,
                record.work_date,
                record.work_time,
                record.duration_minutes,
                record.status,
                record.department,
                record.detail,
                record.worker,
                record.worker_role,
                record.work_shift,
                item.created_by,
                record.created_at,
            ],
        )?;
        debug!(id = %item.id, "inserted work item row");
        // hand back exactly what a later read decodes
        WorkItem::try_from(record)
    }

    fn update(&self, id: WorkItemId, fields: WorkItemPatch) -> StoreResult<()> {
        let mut conn = self.connection.lock().expect("sqlite mutex poisoned");
        let tx = conn.transaction()?;
        let mut item = Self::find_in(&tx, id)?.ok_or(StoreError::NotFound(id))?;
        fields.apply(&mut item);
        validate_row(&item)?;
        Self::write_record(&tx, &WorkItemRecord::from(&item))?;
        tx.commit()?;
        Ok(())
    }
}

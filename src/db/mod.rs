mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::config::{self, ConfigDocument};
use crate::ids::{IdGenerator, UuidGenerator};
use crate::models::*;

pub struct Database {
    conn: Connection,
    ids: Box<dyn IdGenerator>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set database pragmas")?;
        let mut db = Self::from_connection(conn);
        db.migrate().context("Database migration failed")?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self::from_connection(conn);
        db.migrate()?;
        Ok(db)
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            ids: Box::new(UuidGenerator),
        }
    }

    /// Replace the id source used for every id this database mints.
    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn ids(&self) -> &dyn IdGenerator {
        self.ids.as_ref()
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            tracing::info!(version = schema::CURRENT_VERSION, "creating budget schema");
            let tx = self.conn.transaction()?;
            tx.execute_batch(schema::SCHEMA_V1)?;
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            tx.commit()?;
            return Ok(());
        }

        let stored: Option<i32> = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()
            .context("Failed to read schema version")?;
        let current = stored.unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                tracing::info!(from_version, "applying schema migration");
                self.conn.execute_batch(sql)?;
            }
        }

        match stored {
            None => {
                tracing::warn!("schema version row missing, restoring it");
                self.conn.execute(
                    "INSERT INTO schema_version (version) VALUES (?1)",
                    params![schema::CURRENT_VERSION],
                )?;
            }
            Some(v) if v < schema::CURRENT_VERSION => {
                self.conn.execute(
                    "UPDATE schema_version SET version = ?1",
                    params![schema::CURRENT_VERSION],
                )?;
            }
            Some(_) => {}
        }

        Ok(())
    }

    // ── Categories ────────────────────────────────────────────

    /// Categories for `month`, income first, then by sort order.
    /// An unknown month yields an empty list.
    pub fn load_categories(&self, month: &str) -> Result<Vec<BudgetCategory>> {
        query_categories(&self.conn, month)
    }

    pub fn has_categories(&self, month: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM categories WHERE month = ?1",
            params![month],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Whether any month holds categories. An empty store is the signal to
    /// run the legacy config migration.
    pub fn has_any_categories(&self) -> Result<bool> {
        store_has_categories(&self.conn)
    }

    /// Insert or update by id. On conflict every field is overwritten,
    /// including the month, so re-saving under another month moves the row.
    pub fn save_category(&self, month: &str, category: &BudgetCategory, sort_order: i64) -> Result<()> {
        upsert_category(&self.conn, month, category, sort_order)
    }

    /// Replace every category of `month` with `categories`, numbering
    /// `sort_order` by position. Runs in one transaction; an empty slice
    /// leaves the month empty.
    pub fn save_all_categories(&mut self, month: &str, categories: &[BudgetCategory]) -> Result<()> {
        let tx = self.conn.transaction()?;
        replace_categories(&tx, month, categories)?;
        tx.commit()?;
        Ok(())
    }

    pub fn delete_category(&self, category_id: &str) -> Result<()> {
        self.conn.execute(
            "DELETE FROM categories WHERE category_id = ?1",
            params![category_id],
        )?;
        Ok(())
    }

    /// Copy the categories of `source_month` into `target_month` under new
    /// ids, replacing whatever the target held. Returns the new categories.
    /// An empty source copies nothing and leaves the target untouched.
    pub fn copy_from_month(&mut self, source_month: &str, target_month: &str) -> Result<Vec<BudgetCategory>> {
        let tx = self.conn.transaction()?;
        let source = query_categories(&tx, source_month)?;
        if source.is_empty() {
            return Ok(Vec::new());
        }

        let copied: Vec<BudgetCategory> = source
            .iter()
            .map(|cat| cat.with_new_id(self.ids.as_ref()))
            .collect();
        replace_categories(&tx, target_month, &copied)?;
        tx.commit()?;

        tracing::debug!(
            source_month,
            target_month,
            count = copied.len(),
            "copied categories"
        );
        Ok(copied)
    }

    /// Months that hold categories, most recent first.
    pub fn get_months_with_data(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT month FROM categories ORDER BY month DESC")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    // ── Rollovers ─────────────────────────────────────────────

    /// Transfers leaving `source_month`.
    pub fn load_outgoing_rollovers(&self, source_month: &str) -> Result<Vec<Transfer>> {
        query_rollovers(&self.conn, OUTGOING_ROLLOVERS, source_month)
    }

    /// Transfers entering `to_month`.
    pub fn load_incoming_rollovers(&self, to_month: &str) -> Result<Vec<Transfer>> {
        query_rollovers(&self.conn, INCOMING_ROLLOVERS, to_month)
    }

    /// Insert or update by id; all fields are overwritten on conflict.
    /// `source_month == to_month` is accepted.
    pub fn save_rollover(&self, source_month: &str, to_month: &str, transfer: &Transfer) -> Result<()> {
        upsert_rollover(&self.conn, source_month, to_month, transfer)
    }

    pub fn delete_rollover(&self, rollover_id: &str) -> Result<()> {
        self.conn.execute(
            "DELETE FROM rollovers WHERE rollover_id = ?1",
            params![rollover_id],
        )?;
        Ok(())
    }

    /// Delete every transfer leaving `source_month`. Transfers that only
    /// target the month are kept.
    pub fn delete_month_rollovers(&self, source_month: &str) -> Result<()> {
        let removed = self.conn.execute(
            "DELETE FROM rollovers WHERE source_month = ?1",
            params![source_month],
        )?;
        tracing::debug!(source_month, removed, "deleted month rollovers");
        Ok(())
    }

    /// Replace the outgoing transfers of `source_month` in one transaction.
    /// Scoped by source month only; an empty slice clears them.
    pub fn save_month_rollovers(
        &mut self,
        source_month: &str,
        to_month: &str,
        transfers: &[Transfer],
    ) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM rollovers WHERE source_month = ?1",
            params![source_month],
        )?;
        for transfer in transfers {
            upsert_rollover(&tx, source_month, to_month, transfer)?;
        }
        tx.commit()?;

        tracing::debug!(
            source_month,
            to_month,
            count = transfers.len(),
            "replaced month rollovers"
        );
        Ok(())
    }

    // ── Month view ────────────────────────────────────────────

    /// Categories plus both rollover directions, read from one snapshot.
    pub fn load_month_data(&self, month: &str) -> Result<MonthData> {
        let tx = self.conn.unchecked_transaction()?;
        let data = MonthData {
            categories: query_categories(&tx, month)?,
            outgoing_rollovers: query_rollovers(&tx, OUTGOING_ROLLOVERS, month)?,
            incoming_rollovers: query_rollovers(&tx, INCOMING_ROLLOVERS, month)?,
        };
        tx.finish()?;
        Ok(data)
    }

    // ── Legacy config ─────────────────────────────────────────

    /// Seed an empty store from a legacy config document, filing every
    /// category under `month`. Does nothing once any category exists.
    ///
    /// The emptiness check and the insert share one write transaction, so
    /// two processes racing on the same file cannot both seed it.
    pub fn migrate_legacy_config(&mut self, month: &str, doc: &ConfigDocument) -> Result<Vec<BudgetCategory>> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if store_has_categories(&tx)? {
            tracing::info!("budget data already present, skipping legacy config migration");
            return Ok(Vec::new());
        }

        let categories = config::config_to_categories(doc, self.ids.as_ref());
        replace_categories(&tx, month, &categories)?;
        tx.commit()?;
        tracing::info!(
            month,
            count = categories.len(),
            "migrated legacy budget config"
        );
        Ok(categories)
    }

    /// The legacy document view of one month.
    pub fn export_config(&self, month: &str) -> Result<ConfigDocument> {
        Ok(config::categories_to_config(&self.load_categories(month)?))
    }
}

// ── Statements ────────────────────────────────────────────────

// rowid keeps insertion order; upserts do not move a row
const OUTGOING_ROLLOVERS: &str = "SELECT rollover_id, from_category, to_category, amount
     FROM rollovers WHERE source_month = ?1 ORDER BY rowid";
const INCOMING_ROLLOVERS: &str = "SELECT rollover_id, from_category, to_category, amount
     FROM rollovers WHERE to_month = ?1 ORDER BY rowid";

fn query_categories(conn: &Connection, month: &str) -> Result<Vec<BudgetCategory>> {
    let mut stmt = conn.prepare(
        "SELECT category_id, type, name, expected, tags, require_all, amount_sign
         FROM categories
         WHERE month = ?1
         ORDER BY type DESC, sort_order ASC",
    )?;
    let rows = stmt.query_map(params![month], category_from_row)?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

fn category_from_row(row: &Row) -> rusqlite::Result<BudgetCategory> {
    let type_str: String = row.get(1)?;
    let category_type = CategoryType::parse(&type_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            format!("unknown category type '{type_str}'").into(),
        )
    })?;
    Ok(BudgetCategory {
        id: row.get(0)?,
        category_type,
        name: row.get(2)?,
        expected: decode_decimal(row.get(3)?),
        tags: decode_tags(row.get(4)?),
        require_all: row.get::<_, Option<bool>>(5)?.unwrap_or(false),
        amount_sign: row
            .get::<_, Option<String>>(6)?
            .and_then(|s| AmountSign::parse(&s)),
    })
}

fn upsert_category(conn: &Connection, month: &str, category: &BudgetCategory, sort_order: i64) -> Result<()> {
    let now = chrono::Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO categories
            (category_id, month, type, name, expected, tags, require_all, amount_sign, sort_order, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
         ON CONFLICT(category_id) DO UPDATE SET
            month = excluded.month,
            type = excluded.type,
            name = excluded.name,
            expected = excluded.expected,
            tags = excluded.tags,
            require_all = excluded.require_all,
            amount_sign = excluded.amount_sign,
            sort_order = excluded.sort_order,
            updated_at = excluded.updated_at",
        params![
            category.id,
            month,
            category.category_type.as_str(),
            category.name,
            category.expected.to_string(),
            serde_json::to_string(&category.tags)?,
            category.require_all,
            category.amount_sign.map(|s| s.as_str()),
            sort_order,
            now,
        ],
    )?;
    Ok(())
}

fn store_has_categories(conn: &Connection) -> Result<bool> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
    Ok(count > 0)
}

fn replace_categories(conn: &Connection, month: &str, categories: &[BudgetCategory]) -> Result<()> {
    conn.execute("DELETE FROM categories WHERE month = ?1", params![month])?;
    for (i, cat) in categories.iter().enumerate() {
        upsert_category(conn, month, cat, i as i64)?;
    }
    tracing::debug!(month, count = categories.len(), "replaced month categories");
    Ok(())
}

fn query_rollovers(conn: &Connection, sql: &str, month: &str) -> Result<Vec<Transfer>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params![month], |row| {
        Ok(Transfer {
            id: row.get(0)?,
            from_category: row.get(1)?,
            to_category: row.get(2)?,
            amount: decode_decimal(row.get(3)?),
        })
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

fn upsert_rollover(conn: &Connection, source_month: &str, to_month: &str, transfer: &Transfer) -> Result<()> {
    conn.execute(
        "INSERT INTO rollovers
            (rollover_id, source_month, from_category, to_category, to_month, amount, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(rollover_id) DO UPDATE SET
            source_month = excluded.source_month,
            from_category = excluded.from_category,
            to_category = excluded.to_category,
            to_month = excluded.to_month,
            amount = excluded.amount",
        params![
            transfer.id,
            source_month,
            transfer.from_category,
            transfer.to_category,
            to_month,
            transfer.amount.to_string(),
            chrono::Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(())
}

// ── Column decoding ───────────────────────────────────────────

fn decode_decimal(raw: Option<String>) -> Decimal {
    match raw {
        Some(s) => Decimal::from_str(&s).unwrap_or_else(|_| {
            tracing::warn!(value = %s, "unreadable amount, using zero");
            Decimal::ZERO
        }),
        None => Decimal::ZERO,
    }
}

fn decode_tags(raw: Option<String>) -> Vec<String> {
    match raw.as_deref() {
        None | Some("") => Vec::new(),
        Some(s) => serde_json::from_str(s).unwrap_or_else(|_| {
            tracing::warn!(value = s, "unreadable tag list, using none");
            Vec::new()
        }),
    }
}

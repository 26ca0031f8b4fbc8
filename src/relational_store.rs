// Relational Store Handler - classifications in SQLite
//
// Four tables: areas, categories, and the two journal link tables. Every
// set-valued filter is substituted through a placeholder list sized to the
// filter set, never concatenated into the SQL text. A connection is opened
// per call and dropped with it; nothing is held across calls.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::{params, params_from_iter, Connection};

use crate::handlers::ClassificationStore;
use crate::records::ClassificationRecord;

/// Create the classification schema if it does not exist.
pub fn setup_classification_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS areas (
            id TEXT PRIMARY KEY
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS categories (
            id TEXT PRIMARY KEY,
            quartile TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS journal_categories (
            issn TEXT,
            category_id TEXT,
            quartile TEXT,
            PRIMARY KEY (issn, category_id),
            FOREIGN KEY (category_id) REFERENCES categories(id)
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS journal_areas (
            issn TEXT,
            area_id TEXT,
            PRIMARY KEY (issn, area_id),
            FOREIGN KEY (area_id) REFERENCES areas(id)
        )",
        [],
    )?;

    Ok(())
}

/// One `?` per element of a set-valued filter.
fn placeholders(count: usize) -> String {
    vec!["?"; count].join(",")
}

/// Classification query handler backed by a SQLite database file.
pub struct SqliteClassificationHandler {
    db_path: PathBuf,
}

impl SqliteClassificationHandler {
    pub fn new(db_path: &Path) -> Self {
        SqliteClassificationHandler {
            db_path: db_path.to_path_buf(),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self) -> Result<Connection> {
        Connection::open(&self.db_path).with_context(|| {
            format!(
                "failed to open classification database {}",
                self.db_path.display()
            )
        })
    }

    fn query_categories(
        &self,
        conn: &Connection,
        sql: &str,
        filter: &BTreeSet<String>,
    ) -> Result<Vec<ClassificationRecord>> {
        let mut stmt = conn.prepare(sql)?;
        let records = stmt
            .query_map(params_from_iter(filter.iter()), |row| {
                Ok(ClassificationRecord::Category {
                    id: row.get(0)?,
                    quartile: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn query_areas(
        &self,
        conn: &Connection,
        sql: &str,
        filter: &BTreeSet<String>,
    ) -> Result<Vec<ClassificationRecord>> {
        let mut stmt = conn.prepare(sql)?;
        let records = stmt
            .query_map(params_from_iter(filter.iter()), |row| {
                Ok(ClassificationRecord::Area { id: row.get(0)? })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn query_issns(&self, sql: &str, id: &str) -> Result<BTreeSet<String>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(sql)?;
        let issns = stmt
            .query_map(params![id], |row| row.get::<_, String>(0))?
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(issns)
    }
}

impl ClassificationStore for SqliteClassificationHandler {
    fn classification_by_id(&self, id: &str) -> Result<Vec<ClassificationRecord>> {
        let conn = self.connect()?;

        let mut single = BTreeSet::new();
        single.insert(id.to_string());

        let categories = self.query_categories(
            &conn,
            "SELECT id, quartile FROM categories WHERE id = ?",
            &single,
        )?;
        if !categories.is_empty() {
            return Ok(categories);
        }

        self.query_areas(&conn, "SELECT id FROM areas WHERE id = ?", &single)
    }

    fn all_categories(&self) -> Result<Vec<ClassificationRecord>> {
        let conn = self.connect()?;
        self.query_categories(
            &conn,
            "SELECT DISTINCT id, quartile FROM categories ORDER BY id",
            &BTreeSet::new(),
        )
    }

    fn all_areas(&self) -> Result<Vec<ClassificationRecord>> {
        let conn = self.connect()?;
        self.query_areas(
            &conn,
            "SELECT DISTINCT id FROM areas ORDER BY id",
            &BTreeSet::new(),
        )
    }

    fn categories_with_quartiles(
        &self,
        quartiles: &BTreeSet<String>,
    ) -> Result<Vec<ClassificationRecord>> {
        if quartiles.is_empty() {
            return self.all_categories();
        }

        let conn = self.connect()?;
        let sql = format!(
            "SELECT DISTINCT id, quartile FROM categories
             WHERE quartile IN ({})
             ORDER BY id",
            placeholders(quartiles.len())
        );
        self.query_categories(&conn, &sql, quartiles)
    }

    fn categories_in_areas(
        &self,
        area_ids: &BTreeSet<String>,
    ) -> Result<Vec<ClassificationRecord>> {
        if area_ids.is_empty() {
            return self.all_categories();
        }

        let conn = self.connect()?;
        let sql = format!(
            "SELECT DISTINCT c.id, c.quartile
             FROM categories c
             JOIN journal_categories jc ON c.id = jc.category_id
             JOIN journal_areas ja ON jc.issn = ja.issn
             WHERE ja.area_id IN ({})
             ORDER BY c.id",
            placeholders(area_ids.len())
        );
        self.query_categories(&conn, &sql, area_ids)
    }

    fn areas_with_categories(
        &self,
        category_ids: &BTreeSet<String>,
    ) -> Result<Vec<ClassificationRecord>> {
        if category_ids.is_empty() {
            return self.all_areas();
        }

        let conn = self.connect()?;
        let sql = format!(
            "SELECT DISTINCT a.id
             FROM areas a
             JOIN journal_areas ja ON a.id = ja.area_id
             JOIN journal_categories jc ON ja.issn = jc.issn
             WHERE jc.category_id IN ({})
             ORDER BY a.id",
            placeholders(category_ids.len())
        );
        self.query_areas(&conn, &sql, category_ids)
    }

    fn journal_ids_for_category(&self, category_id: &str) -> Result<BTreeSet<String>> {
        self.query_issns(
            "SELECT DISTINCT issn FROM journal_categories WHERE category_id = ?",
            category_id,
        )
    }

    fn journal_ids_for_area(&self, area_id: &str) -> Result<BTreeSet<String>> {
        self.query_issns(
            "SELECT DISTINCT issn FROM journal_areas WHERE area_id = ?",
            area_id,
        )
    }
}

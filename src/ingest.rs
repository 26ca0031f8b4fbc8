// Bulk Loaders - DOAJ CSV into the graph store, Scimago JSON into SQLite
//
// The loaders are the guarantors of the identity scheme the query engine
// depends on: a journal row without an ISSN or EISSN is never persisted,
// and classification links always carry a non-empty category or area id.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use serde::Deserialize;
use tracing::warn;

use crate::relational_store::setup_classification_schema;

// ============================================================================
// DOAJ CSV -> GRAPH STORE
// ============================================================================

/// One row of the DOAJ journal export.
#[derive(Debug, Deserialize)]
struct DoajRow {
    #[serde(rename = "Journal title")]
    title: String,

    #[serde(rename = "Journal ISSN (print version)")]
    issn: String,

    #[serde(rename = "Journal EISSN (online version)")]
    eissn: String,

    #[serde(rename = "Languages in which the journal accepts manuscripts")]
    languages: String,

    #[serde(rename = "Publisher")]
    publisher: String,

    #[serde(rename = "DOAJ Seal")]
    seal: String,

    #[serde(rename = "Journal license")]
    licence: String,

    #[serde(rename = "APC")]
    apc: String,
}

impl DoajRow {
    fn languages(&self) -> Vec<&str> {
        self.languages
            .split(',')
            .map(str::trim)
            .filter(|language| !language.is_empty())
            .collect()
    }

    /// DOAJ encodes booleans as Yes/No.
    fn yes(value: &str) -> bool {
        value.trim().eq_ignore_ascii_case("yes")
    }
}

/// Loads the DOAJ CSV export into a SPARQL endpoint, one INSERT DATA
/// update per journal.
pub struct JournalCsvLoader {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl JournalCsvLoader {
    pub fn new(endpoint: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("failed to build HTTP client")?;

        Ok(JournalCsvLoader {
            endpoint: endpoint.to_string(),
            client,
        })
    }

    /// Load every journal row of `csv_path` into the graph store.
    /// Returns the number of journals uploaded; rows with neither ISSN
    /// nor EISSN are skipped, and per-journal upload failures are logged
    /// without aborting the rest of the file.
    pub fn push_data_to_db(&self, csv_path: &Path) -> Result<usize> {
        let mut rdr = csv::Reader::from_path(csv_path).context("failed to open DOAJ CSV file")?;

        let mut uploaded = 0;
        let mut skipped = 0;
        for row in rdr.deserialize() {
            let row: DoajRow = row.context("failed to deserialize DOAJ row")?;

            let Some(update) = insert_journal_update(&row) else {
                skipped += 1;
                continue;
            };

            match self.post_update(&update) {
                Ok(()) => uploaded += 1,
                Err(error) => warn!("failed to upload journal: {error:#}"),
            }
        }

        if skipped > 0 {
            warn!("skipped {skipped} journal rows without ISSN or EISSN");
        }

        Ok(uploaded)
    }

    fn post_update(&self, update: &str) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("update", update)])
            .send()
            .context("SPARQL update request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("SPARQL update failed with status {status}");
        }
        Ok(())
    }
}

/// Render one journal row as a SPARQL INSERT DATA block. `None` when the
/// row carries neither ISSN nor EISSN: such a row has no identity and is
/// never persisted.
fn insert_journal_update(row: &DoajRow) -> Option<String> {
    let issn = row.issn.trim();
    let eissn = row.eissn.trim();
    let journal_id = if !issn.is_empty() { issn } else { eissn };
    if journal_id.is_empty() {
        return None;
    }

    let journal_uri = format!("<http://doaj.org/journal/{journal_id}>");

    let mut triples = String::from("INSERT DATA {\n");
    triples.push_str(&format!("    {journal_uri} rdf:type doaj:Journal .\n"));
    triples.push_str(&format!(
        "    {journal_uri} doaj:title \"{}\" .\n",
        escape_literal(row.title.trim())
    ));
    if !issn.is_empty() {
        triples.push_str(&format!("    {journal_uri} doaj:issn \"{issn}\" .\n"));
    }
    if !eissn.is_empty() {
        triples.push_str(&format!("    {journal_uri} doaj:eissn \"{eissn}\" .\n"));
    }
    for language in row.languages() {
        triples.push_str(&format!(
            "    {journal_uri} doaj:language \"{}\" .\n",
            escape_literal(language)
        ));
    }
    let publisher = row.publisher.trim();
    if !publisher.is_empty() {
        triples.push_str(&format!(
            "    {journal_uri} doaj:publisher \"{}\" .\n",
            escape_literal(publisher)
        ));
    }
    triples.push_str(&format!(
        "    {journal_uri} doaj:hasDOAJSeal \"{}\"^^xsd:boolean .\n",
        DoajRow::yes(&row.seal)
    ));
    triples.push_str(&format!(
        "    {journal_uri} doaj:licence \"{}\" .\n",
        escape_literal(row.licence.trim())
    ));
    triples.push_str(&format!(
        "    {journal_uri} doaj:hasAPC \"{}\"^^xsd:boolean .\n",
        DoajRow::yes(&row.apc)
    ));
    triples.push('}');

    let prefixes = "PREFIX doaj: <http://doaj.org/>\n\
                    PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>\n\
                    PREFIX xsd: <http://www.w3.org/2001/XMLSchema#>\n";
    Some(format!("{prefixes}{triples}"))
}

fn escape_literal(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

// ============================================================================
// SCIMAGO JSON -> RELATIONAL STORE
// ============================================================================

/// One entry of the Scimago export: the identifiers of a journal plus its
/// category and area assignments.
#[derive(Debug, Deserialize)]
struct ScimagoEntry {
    #[serde(default)]
    identifiers: Vec<String>,

    #[serde(default)]
    categories: Vec<ScimagoCategory>,

    #[serde(default)]
    areas: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ScimagoCategory {
    id: String,

    #[serde(default)]
    quartile: Option<String>,
}

/// Loads the Scimago JSON export into the SQLite classification store.
pub struct ClassificationJsonLoader {
    db_path: PathBuf,
}

impl ClassificationJsonLoader {
    pub fn new(db_path: &Path) -> Self {
        ClassificationJsonLoader {
            db_path: db_path.to_path_buf(),
        }
    }

    /// Load every entry of `json_path`. Idempotent: link rows already
    /// present are left untouched. Returns the number of entries read.
    pub fn push_data_to_db(&self, json_path: &Path) -> Result<usize> {
        let raw = std::fs::read_to_string(json_path).context("failed to read Scimago JSON file")?;
        let entries: Vec<ScimagoEntry> =
            serde_json::from_str(&raw).context("failed to parse Scimago JSON file")?;

        let conn = Connection::open(&self.db_path).with_context(|| {
            format!(
                "failed to open classification database {}",
                self.db_path.display()
            )
        })?;
        setup_classification_schema(&conn)?;

        for entry in &entries {
            insert_entry(&conn, entry)?;
        }

        Ok(entries.len())
    }
}

fn insert_entry(conn: &Connection, entry: &ScimagoEntry) -> Result<()> {
    // Identifiers with no meaning never reach a link table.
    let identifiers: BTreeSet<&str> = entry
        .identifiers
        .iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .collect();

    for area in &entry.areas {
        let area = area.trim();
        if area.is_empty() {
            continue;
        }
        conn.execute("INSERT OR IGNORE INTO areas (id) VALUES (?1)", params![area])?;
        for issn in &identifiers {
            conn.execute(
                "INSERT OR IGNORE INTO journal_areas (issn, area_id) VALUES (?1, ?2)",
                params![issn, area],
            )?;
        }
    }

    for category in &entry.categories {
        let category_id = category.id.trim();
        if category_id.is_empty() {
            continue;
        }
        conn.execute(
            "INSERT OR IGNORE INTO categories (id, quartile) VALUES (?1, ?2)",
            params![category_id, category.quartile],
        )?;
        for issn in &identifiers {
            conn.execute(
                "INSERT OR IGNORE INTO journal_categories (issn, category_id, quartile)
                 VALUES (?1, ?2, ?3)",
                params![issn, category_id, category.quartile],
            )?;
        }
    }

    Ok(())
}

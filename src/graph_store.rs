// Graph Store Handler - journal metadata over SPARQL
//
// Talks to a Blazegraph-style endpoint: one HTTP GET per query, SPARQL
// JSON results back. Every journal attribute is OPTIONAL in the graph
// pattern, so a binding row only carries the columns the store actually
// produced - an absent column reaches the engine as an absent field,
// never as false/empty.

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::handlers::JournalStore;
use crate::records::JournalRecord;

const PREFIXES: &str = "\
PREFIX doaj: <http://doaj.org/>
PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
PREFIX xsd: <http://www.w3.org/2001/XMLSchema#>
";

const SELECT_COLUMNS: &str =
    "SELECT ?journal ?title ?issn ?eissn ?language ?publisher ?seal ?licence ?apc";

const OPTIONAL_ATTRIBUTES: &str = "\
    OPTIONAL { ?journal doaj:issn ?issn }
    OPTIONAL { ?journal doaj:eissn ?eissn }
    OPTIONAL { ?journal doaj:title ?title }
    OPTIONAL { ?journal doaj:language ?language }
    OPTIONAL { ?journal doaj:publisher ?publisher }
    OPTIONAL { ?journal doaj:hasDOAJSeal ?seal }
    OPTIONAL { ?journal doaj:licence ?licence }
    OPTIONAL { ?journal doaj:hasAPC ?apc }
";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Journal query handler backed by a SPARQL endpoint.
pub struct SparqlJournalHandler {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl SparqlJournalHandler {
    pub fn new(endpoint: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;

        Ok(SparqlJournalHandler {
            endpoint: endpoint.to_string(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn set_endpoint(&mut self, endpoint: &str) {
        self.endpoint = endpoint.to_string();
    }

    /// One blocking round trip: GET with the query text, SPARQL JSON back.
    fn execute(&self, query: &str) -> Result<Vec<JournalRecord>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("query", query), ("format", "json")])
            .send()
            .context("SPARQL request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("SPARQL query failed with status {status}");
        }

        let results: SparqlResults = response
            .json()
            .context("malformed SPARQL JSON response")?;

        Ok(results
            .results
            .bindings
            .iter()
            .map(record_from_binding)
            .collect())
    }
}

impl JournalStore for SparqlJournalHandler {
    fn journal_by_id(&self, id: &str) -> Result<Vec<JournalRecord>> {
        let mut single = BTreeSet::new();
        single.insert(id.to_string());
        self.execute(&id_set_query(&single))
    }

    fn journals_by_ids(&self, ids: &BTreeSet<String>) -> Result<Vec<JournalRecord>> {
        let cleaned: BTreeSet<String> = ids.iter().filter(|id| !id.is_empty()).cloned().collect();
        if cleaned.is_empty() {
            return Ok(Vec::new());
        }
        self.execute(&id_set_query(&cleaned))
    }

    fn all_journals(&self) -> Result<Vec<JournalRecord>> {
        self.execute(&all_journals_query())
    }

    fn journals_with_title(&self, partial_title: &str) -> Result<Vec<JournalRecord>> {
        self.execute(&title_query(partial_title))
    }

    fn journals_published_by(&self, partial_name: &str) -> Result<Vec<JournalRecord>> {
        self.execute(&publisher_query(partial_name))
    }

    fn journals_with_licences(&self, licences: &BTreeSet<String>) -> Result<Vec<JournalRecord>> {
        // Empty set: no licence filter.
        let cleaned: BTreeSet<String> =
            licences.iter().filter(|l| !l.is_empty()).cloned().collect();
        if cleaned.is_empty() {
            return self.all_journals();
        }
        self.execute(&licence_query(&cleaned))
    }

    fn journals_with_apc(&self) -> Result<Vec<JournalRecord>> {
        self.execute(&boolean_flag_query("doaj:hasAPC"))
    }

    fn journals_with_seal(&self) -> Result<Vec<JournalRecord>> {
        self.execute(&boolean_flag_query("doaj:hasDOAJSeal"))
    }
}

// ============================================================================
// QUERY TEXT
// ============================================================================

/// Escape a string for use inside a double-quoted SPARQL literal.
fn escape_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn all_journals_query() -> String {
    format!(
        "{PREFIXES}{SELECT_COLUMNS}\nWHERE {{\n    ?journal rdf:type doaj:Journal .\n{OPTIONAL_ATTRIBUTES}}}\nORDER BY ?title"
    )
}

fn id_set_query(ids: &BTreeSet<String>) -> String {
    let values: Vec<String> = ids
        .iter()
        .map(|id| format!("\"{}\"", escape_literal(id)))
        .collect();
    let values_clause = values.join(" ");
    format!(
        "{PREFIXES}{SELECT_COLUMNS}\nWHERE {{\n    VALUES ?wanted {{ {values_clause} }}\n    ?journal rdf:type doaj:Journal .\n{OPTIONAL_ATTRIBUTES}    FILTER (?issn = ?wanted || ?eissn = ?wanted)\n}}\nORDER BY ?title"
    )
}

fn title_query(partial_title: &str) -> String {
    let needle = escape_literal(partial_title);
    format!(
        "{PREFIXES}{SELECT_COLUMNS}\nWHERE {{\n    ?journal rdf:type doaj:Journal .\n    ?journal doaj:title ?title .\n    FILTER (CONTAINS(LCASE(?title), LCASE(\"{needle}\")))\n{OPTIONAL_ATTRIBUTES}}}\nORDER BY ?title"
    )
}

fn publisher_query(partial_name: &str) -> String {
    let needle = escape_literal(partial_name);
    format!(
        "{PREFIXES}{SELECT_COLUMNS}\nWHERE {{\n    ?journal rdf:type doaj:Journal .\n    ?journal doaj:publisher ?publisher .\n    FILTER (CONTAINS(LCASE(?publisher), LCASE(\"{needle}\")))\n{OPTIONAL_ATTRIBUTES}}}\nORDER BY ?title"
    )
}

fn licence_query(licences: &BTreeSet<String>) -> String {
    let alternatives: Vec<String> = licences
        .iter()
        .map(|licence| format!("?licence = \"{}\"", escape_literal(licence)))
        .collect();
    let filter = alternatives.join(" || ");
    format!(
        "{PREFIXES}{SELECT_COLUMNS}\nWHERE {{\n    ?journal rdf:type doaj:Journal .\n    ?journal doaj:licence ?licence .\n    FILTER ({filter})\n{OPTIONAL_ATTRIBUTES}}}\nORDER BY ?title"
    )
}

fn boolean_flag_query(predicate: &str) -> String {
    format!(
        "{PREFIXES}{SELECT_COLUMNS}\nWHERE {{\n    ?journal rdf:type doaj:Journal .\n    ?journal {predicate} \"true\"^^xsd:boolean .\n{OPTIONAL_ATTRIBUTES}}}\nORDER BY ?title"
    )
}

// ============================================================================
// RESPONSE PARSING
// ============================================================================

#[derive(Debug, Deserialize)]
struct SparqlResults {
    #[serde(default)]
    results: SparqlBindings,
}

#[derive(Debug, Default, Deserialize)]
struct SparqlBindings {
    #[serde(default)]
    bindings: Vec<HashMap<String, SparqlCell>>,
}

#[derive(Debug, Deserialize)]
struct SparqlCell {
    #[serde(default)]
    value: String,
}

fn record_from_binding(binding: &HashMap<String, SparqlCell>) -> JournalRecord {
    let text = |key: &str| binding.get(key).map(|cell| cell.value.clone());
    let flag = |key: &str| binding.get(key).map(|cell| parse_boolean(&cell.value));

    JournalRecord {
        issn: text("issn"),
        eissn: text("eissn"),
        title: text("title"),
        language: text("language"),
        publisher: text("publisher"),
        seal: flag("seal"),
        licence: text("licence"),
        apc: flag("apc"),
    }
}

fn parse_boolean(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

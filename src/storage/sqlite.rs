//! SQLite storage implementation

use std::collections::HashMap;
use std::path::Path;

use rusqlite::{Connection, ErrorCode, OptionalExtension, params, params_from_iter};

use super::schema;
use crate::Result;
use crate::triple::Triple;

const INSERT_TRIPLE_SQL: &str = "INSERT INTO words (lemma, token, msd) VALUES (?1, ?2, ?3)";

/// SQLite-backed store for annotation triples
pub struct AnnotationStore {
    conn: Connection,
}

impl AnnotationStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    // ========== Count Operations ==========

    /// Count all stored triples.
    ///
    /// Counts every row, not distinct tokens; the name is kept for
    /// compatibility with the consuming system.
    pub fn count_tokens(&self) -> Result<usize> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(token) FROM words", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Count distinct lemmas; an empty table yields 0
    pub fn count_lemmas(&self) -> Result<usize> {
        let count: Option<i64> = self
            .conn
            .query_row("SELECT COUNT(DISTINCT lemma) FROM words", [], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(count.unwrap_or(0) as usize)
    }

    /// Row and distinct-lemma counts in one call
    pub fn stats(&self) -> Result<StoreStats> {
        Ok(StoreStats {
            triples: self.count_tokens()?,
            lemmas: self.count_lemmas()?,
        })
    }

    // ========== Select Operations ==========

    /// Get every stored triple (storage order)
    pub fn select_all(&self) -> Result<Vec<Triple>> {
        let mut stmt = self.conn.prepare("SELECT lemma, token, msd FROM words")?;

        let triples = stmt
            .query_map([], |row| self.row_to_triple(row))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(triples)
    }

    /// Get every distinct lemma
    pub fn select_lemmas(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT DISTINCT lemma FROM words")?;

        let lemmas = stmt
            .query_map([], |row| row.get(0))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(lemmas)
    }

    /// Find triples by lemma pattern (LIKE query, `%`/`_` wildcards allowed)
    pub fn select_by_lemma(&self, lemma: &str) -> Result<Vec<Triple>> {
        let mut stmt = self
            .conn
            .prepare("SELECT lemma, token, msd FROM words WHERE lemma LIKE ?1")?;

        let triples = stmt
            .query_map([lemma], |row| self.row_to_triple(row))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(triples)
    }

    /// Find triples whose lemma is exactly one of the given values (no
    /// pattern matching), grouped by the lemma value found in each row.
    ///
    /// Every requested lemma is present as a key, mapped to an empty vec when
    /// nothing matched, so callers can iterate their input list directly.
    pub fn select_by_lemmas(&self, lemmas: &[&str]) -> Result<HashMap<String, Vec<Triple>>> {
        let mut group: HashMap<String, Vec<Triple>> = HashMap::new();
        for triple in self.select_by_lemmas_flat(lemmas)? {
            group.entry(triple.lemma.clone()).or_default().push(triple);
        }
        for lemma in lemmas {
            group.entry((*lemma).to_string()).or_default();
        }
        Ok(group)
    }

    /// Ungrouped variant of [`select_by_lemmas`](Self::select_by_lemmas)
    pub fn select_by_lemmas_flat(&self, lemmas: &[&str]) -> Result<Vec<Triple>> {
        // IN () is a syntax error in SQLite
        if lemmas.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT lemma, token, msd FROM words WHERE lemma IN ({})",
            placeholders(lemmas.len())
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let triples = stmt
            .query_map(params_from_iter(lemmas.iter()), |row| {
                self.row_to_triple(row)
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(triples)
    }

    /// Find triples by token pattern (LIKE query, `%`/`_` wildcards allowed)
    pub fn select_by_token(&self, token: &str) -> Result<Vec<Triple>> {
        let mut stmt = self
            .conn
            .prepare("SELECT lemma, token, msd FROM words WHERE token LIKE ?1")?;

        let triples = stmt
            .query_map([token], |row| self.row_to_triple(row))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(triples)
    }

    /// Find triples whose token is exactly one of the given values, compared
    /// case-insensitively, grouped by the lowercased token of each matched row.
    ///
    /// Every input token is present as a key in its lowercased form, mapped to
    /// an empty vec when nothing matched.
    pub fn select_by_tokens(&self, tokens: &[&str]) -> Result<HashMap<String, Vec<Triple>>> {
        let mut group: HashMap<String, Vec<Triple>> = HashMap::new();
        for triple in self.select_by_tokens_flat(tokens)? {
            group
                .entry(triple.token.to_lowercase())
                .or_default()
                .push(triple);
        }
        for token in tokens {
            group.entry(token.to_lowercase()).or_default();
        }
        Ok(group)
    }

    /// Ungrouped variant of [`select_by_tokens`](Self::select_by_tokens)
    pub fn select_by_tokens_flat(&self, tokens: &[&str]) -> Result<Vec<Triple>> {
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT lemma, token, msd FROM words WHERE token COLLATE NOCASE IN ({})",
            placeholders(tokens.len())
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let triples = stmt
            .query_map(params_from_iter(tokens.iter()), |row| {
                self.row_to_triple(row)
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(triples)
    }

    /// Find triples by msd prefix.
    ///
    /// Each hyphen in the input matches any single character; see
    /// [`msd_pattern`] for the exact rewrite.
    pub fn select_by_msd(&self, msd: &str) -> Result<Vec<Triple>> {
        let mut stmt = self
            .conn
            .prepare("SELECT lemma, token, msd FROM words WHERE msd LIKE ?1")?;

        let triples = stmt
            .query_map([msd_pattern(msd)], |row| self.row_to_triple(row))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(triples)
    }

    /// Find triples matching all of the provided criteria (logical AND).
    ///
    /// `lemma` and `token` are LIKE patterns used verbatim; `msd` goes through
    /// the same rewrite as [`select_by_msd`](Self::select_by_msd). Absent or
    /// empty criteria are ignored; with none given, every row is returned.
    pub fn select_any(
        &self,
        lemma: Option<&str>,
        token: Option<&str>,
        msd: Option<&str>,
    ) -> Result<Vec<Triple>> {
        let mut clauses: Vec<&str> = Vec::new();
        let mut values: Vec<String> = Vec::new();

        if let Some(lemma) = lemma.filter(|s| !s.is_empty()) {
            clauses.push("lemma LIKE ?");
            values.push(lemma.to_string());
        }
        if let Some(token) = token.filter(|s| !s.is_empty()) {
            clauses.push("token LIKE ?");
            values.push(token.to_string());
        }
        if let Some(msd) = msd.filter(|s| !s.is_empty()) {
            clauses.push("msd LIKE ?");
            values.push(msd_pattern(msd));
        }

        if clauses.is_empty() {
            return self.select_all();
        }

        let sql = format!(
            "SELECT lemma, token, msd FROM words WHERE {}",
            clauses.join(" AND ")
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let triples = stmt
            .query_map(params_from_iter(values.iter()), |row| {
                self.row_to_triple(row)
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(triples)
    }

    /// Helper to convert a row to a Triple
    fn row_to_triple(&self, row: &rusqlite::Row) -> rusqlite::Result<Triple> {
        Ok(Triple {
            lemma: row.get(0)?,
            token: row.get(1)?,
            msd: row.get(2)?,
        })
    }

    // ========== Insert Operations ==========

    /// Insert one triple and commit.
    ///
    /// A primary-key violation is not an error: the conflict is logged and
    /// reported as [`InsertOutcome::SkippedDuplicate`].
    pub fn insert_triple(&self, triple: &Triple) -> Result<InsertOutcome> {
        match self.conn.execute(
            INSERT_TRIPLE_SQL,
            params![triple.lemma, triple.token, triple.msd],
        ) {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(err) if is_duplicate(&err) => {
                tracing::warn!("Skipping duplicate triple {}: {}", triple, err);
                Ok(InsertOutcome::SkippedDuplicate)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Insert a batch of triples in one transaction.
    ///
    /// Duplicates, whether within the batch or against stored data, are logged
    /// and skipped without aborting the remaining inserts; a single commit
    /// covers everything that went through. Any other failure propagates and
    /// rolls the batch back.
    pub fn insert_triples(&mut self, triples: &[Triple]) -> Result<InsertReport> {
        let tx = self.conn.transaction()?;
        let mut report = InsertReport::default();

        for triple in triples {
            match tx.execute(
                INSERT_TRIPLE_SQL,
                params![triple.lemma, triple.token, triple.msd],
            ) {
                Ok(_) => report.inserted += 1,
                Err(err) if is_duplicate(&err) => {
                    tracing::warn!("Skipping duplicate triple {}: {}", triple, err);
                    report.skipped += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }

        tx.commit()?;
        Ok(report)
    }

    // ========== Delete Operations ==========

    /// Delete all triples with exactly the given lemma (equality, not a
    /// pattern) and commit. Deleting an absent lemma is a no-op.
    pub fn delete_by_lemma(&self, lemma: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM words WHERE lemma = ?1", [lemma])?;
        Ok(())
    }
}

/// Rewrite an msd query into the LIKE pattern used for matching.
///
/// Hyphens become `_` (any single character), surrounding `%` is stripped from
/// the input, and a trailing `%` makes the whole thing a prefix pattern.
pub fn msd_pattern(msd: &str) -> String {
    format!("{}%", msd.replace('-', "_").trim_matches('%'))
}

/// `?, ?, …` list for a dynamically-sized IN clause
fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

fn is_duplicate(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

/// Outcome of a single-triple insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The row was stored
    Inserted,
    /// An identical triple already existed; nothing was written
    SkippedDuplicate,
}

/// Tally of a batch insert
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertReport {
    pub inserted: usize,
    pub skipped: usize,
}

impl std::fmt::Display for InsertReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} inserted, {} duplicates skipped",
            self.inserted, self.skipped
        )
    }
}

/// Store statistics
#[derive(Debug, Clone)]
pub struct StoreStats {
    pub triples: usize,
    pub lemmas: usize,
}

impl std::fmt::Display for StoreStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Store Statistics:")?;
        writeln!(f, "  Triples: {}", self.triples)?;
        writeln!(f, "  Distinct lemmas: {}", self.lemmas)
    }
}

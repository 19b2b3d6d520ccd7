//! Database schema definitions
//!
//! The DDL must stay byte-identical to the original store format so existing
//! database files remain compatible.

/// SQL to create the words table; the full triple is the primary key
pub const CREATE_WORDS_TABLE: &str =
    "CREATE TABLE IF NOT EXISTS words (lemma TEXT, token TEXT, msd TEXT, PRIMARY KEY (lemma, token, msd))";

/// SQL to create the nowords table (unrecognized-token registry)
pub const CREATE_NOWORDS_TABLE: &str =
    "CREATE TABLE IF NOT EXISTS nowords (token TEXT, PRIMARY KEY (token))";

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    vec![CREATE_WORDS_TABLE, CREATE_NOWORDS_TABLE]
}

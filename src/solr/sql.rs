//! SELECT-statement decomposition and vector-filtered statement composition.
//!
//! Solr's SQL endpoint has no native vector join, so a similarity-filtered
//! query is rewritten textually: run the KNN search first, then splice the
//! resulting document IDs back into the statement as an `id IN (...)`
//! predicate before handing it to the SQL endpoint.
//!
//! Clause detection masks single-quoted string literals before keyword
//! scanning, so a literal containing the word "where" or "limit" never
//! false-positives.

use std::sync::OnceLock;

use regex::Regex;

use crate::solr::error::SolrError;

/// Limit applied when a statement carries no LIMIT clause.
pub const DEFAULT_LIMIT: u64 = 10;

/// The pieces of a SELECT statement the proxy layer needs: target
/// collection, pagination bounds, and whether a WHERE clause is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectStatement {
    pub collection: String,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub has_where: bool,
}

impl SelectStatement {
    /// Candidate count to request from the similarity search.
    ///
    /// The KNN search knows nothing about the statement's OFFSET, so it must
    /// over-fetch `limit + offset` candidates for the SQL engine's own
    /// pagination to land on the right page after the ID-set restriction.
    pub fn top_k(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_LIMIT) + self.offset.unwrap_or(0)
    }
}

fn from_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\bFROM\s+([A-Za-z0-9_][A-Za-z0-9_.\-]*)").expect("static regex")
    })
}

fn limit_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bLIMIT\b").expect("static regex"))
}

fn limit_value_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bLIMIT\s+(\d+)").expect("static regex"))
}

fn offset_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bOFFSET\s+(\d+)").expect("static regex"))
}

fn where_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bWHERE\b").expect("static regex"))
}

/// Blank out the contents of single-quoted string literals, preserving byte
/// offsets so regex match positions map back onto the original statement.
/// A doubled quote (`''`) inside a literal is the SQL escape and stays part
/// of the literal.
fn mask_literals(stmt: &str) -> String {
    let mut out = String::with_capacity(stmt.len());
    let mut chars = stmt.chars().peekable();
    let mut in_literal = false;

    while let Some(c) = chars.next() {
        if in_literal {
            if c == '\'' {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    out.push_str("  ");
                } else {
                    in_literal = false;
                    out.push('\'');
                }
            } else {
                // Preserve width for multi-byte chars
                for _ in 0..c.len_utf8() {
                    out.push(' ');
                }
            }
        } else {
            if c == '\'' {
                in_literal = true;
            }
            out.push(c);
        }
    }

    out
}

/// Decompose a SELECT statement into collection, LIMIT, OFFSET, and WHERE
/// presence. Fails with `SqlParse` when the statement is not a SELECT or
/// names no FROM collection.
pub fn parse_select(stmt: &str) -> Result<SelectStatement, SolrError> {
    let trimmed = stmt.trim();
    if trimmed.is_empty() {
        return Err(SolrError::SqlParse {
            message: "Empty SQL statement".into(),
            response_time: None,
        });
    }

    let masked = mask_literals(trimmed);

    let is_select = masked.len() >= 6 && masked.as_bytes()[..6].eq_ignore_ascii_case(b"select");
    if !is_select {
        return Err(SolrError::SqlParse {
            message: format!("Statement is not a SELECT: '{trimmed}'"),
            response_time: None,
        });
    }

    let collection = from_re()
        .captures(&masked)
        .map(|c| c[1].to_string())
        .ok_or_else(|| SolrError::SqlParse {
            message: format!("Cannot determine collection from FROM clause: '{trimmed}'"),
            response_time: None,
        })?;

    let limit = limit_value_re()
        .captures(&masked)
        .and_then(|c| c[1].parse::<u64>().ok());
    let offset = offset_re()
        .captures(&masked)
        .and_then(|c| c[1].parse::<u64>().ok());
    let has_where = where_re().is_match(&masked);

    Ok(SelectStatement {
        collection,
        limit,
        offset,
        has_where,
    })
}

/// Rewrite `stmt` so it only matches the given candidate document IDs.
///
/// Any existing LIMIT clause is detached and reattached verbatim at the end;
/// the ID predicate is AND-appended to an existing WHERE clause or introduced
/// as a fresh one. An empty candidate set splices the always-false `1=0`
/// predicate so a zero-hit similarity search deterministically returns zero
/// rows instead of falling through to an unfiltered query. ID order in the
/// emitted `IN (...)` list preserves similarity rank.
pub fn compose_filtered(stmt: &str, doc_ids: &[String]) -> Result<String, SolrError> {
    let parsed = parse_select(stmt)?;
    let trimmed = stmt.trim();
    let masked = mask_literals(trimmed);

    let (mut rewritten, limit_part) = match limit_re().find(&masked) {
        Some(m) => {
            let before = trimmed[..m.start()].trim_end().to_string();
            let after = trimmed[m.end()..].trim().to_string();
            (before, Some(after))
        }
        None => (trimmed.to_string(), None),
    };

    let connector = if parsed.has_where { "AND" } else { "WHERE" };
    if doc_ids.is_empty() {
        rewritten = format!("{rewritten} {connector} 1=0");
    } else {
        rewritten = format!("{rewritten} {connector} id IN ({})", doc_ids.join(","));
    }

    match limit_part {
        Some(part) if !part.is_empty() => Ok(format!("{rewritten} LIMIT {part}")),
        _ => Ok(format!(
            "{rewritten} LIMIT {}",
            parsed.limit.unwrap_or(DEFAULT_LIMIT)
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_extracts_collection_limit_offset() {
        let parsed = parse_select("SELECT id, title FROM docs WHERE a=1 LIMIT 5 OFFSET 20").unwrap();
        assert_eq!(parsed.collection, "docs");
        assert_eq!(parsed.limit, Some(5));
        assert_eq!(parsed.offset, Some(20));
        assert!(parsed.has_where);
    }

    #[test]
    fn top_k_is_limit_plus_offset() {
        let parsed = parse_select("SELECT * FROM docs LIMIT 5 OFFSET 20").unwrap();
        assert_eq!(parsed.top_k(), 25);
    }

    #[test]
    fn top_k_defaults_when_clauses_absent() {
        let parsed = parse_select("SELECT * FROM docs").unwrap();
        assert_eq!(parsed.limit, None);
        assert_eq!(parsed.offset, None);
        assert_eq!(parsed.top_k(), DEFAULT_LIMIT);
    }

    #[test]
    fn parse_rejects_non_select() {
        let err = parse_select("DELETE FROM docs").unwrap_err();
        assert!(matches!(err, SolrError::SqlParse { .. }));
    }

    #[test]
    fn parse_rejects_missing_from() {
        let err = parse_select("SELECT 1").unwrap_err();
        assert!(matches!(err, SolrError::SqlParse { .. }));
    }

    #[test]
    fn parse_is_case_insensitive() {
        for stmt in [
            "select * from docs where a=1 limit 3",
            "Select * From docs Where a=1 Limit 3",
            "SELECT * FROM docs WHERE a=1 LIMIT 3",
        ] {
            let parsed = parse_select(stmt).unwrap();
            assert_eq!(parsed.collection, "docs");
            assert_eq!(parsed.limit, Some(3));
            assert!(parsed.has_where, "failed on: {stmt}");
        }
    }

    #[test]
    fn keywords_inside_literals_are_ignored() {
        let parsed = parse_select("SELECT * FROM docs WHERE note = 'nowhere to limit 99'").unwrap();
        assert_eq!(parsed.limit, None);
        assert!(parsed.has_where);

        let parsed = parse_select("SELECT 'where' FROM docs").unwrap();
        assert!(!parsed.has_where);
    }

    #[test]
    fn escaped_quotes_stay_inside_literal() {
        let parsed = parse_select("SELECT * FROM docs WHERE a = 'it''s where limit 5 hides'").unwrap();
        assert_eq!(parsed.limit, None);
        assert_eq!(parsed.collection, "docs");
    }

    #[test]
    fn compose_repositions_existing_limit() {
        let stmt = compose_filtered("SELECT * FROM docs LIMIT 5", &ids(&["7", "3"])).unwrap();
        assert_eq!(stmt, "SELECT * FROM docs WHERE id IN (7,3) LIMIT 5");
    }

    #[test]
    fn compose_appends_to_existing_where() {
        let stmt =
            compose_filtered("SELECT * FROM docs WHERE status='active'", &ids(&["1"])).unwrap();
        assert_eq!(
            stmt,
            "SELECT * FROM docs WHERE status='active' AND id IN (1) LIMIT 10"
        );
    }

    #[test]
    fn compose_empty_candidates_yields_unsatisfiable_predicate() {
        let stmt = compose_filtered("SELECT * FROM docs", &[]).unwrap();
        assert_eq!(stmt, "SELECT * FROM docs WHERE 1=0 LIMIT 10");

        let stmt = compose_filtered("SELECT * FROM docs WHERE a=1", &[]).unwrap();
        assert_eq!(stmt, "SELECT * FROM docs WHERE a=1 AND 1=0 LIMIT 10");
    }

    #[test]
    fn compose_preserves_similarity_rank_order() {
        let stmt =
            compose_filtered("SELECT * FROM docs", &ids(&["9", "2", "5", "1"])).unwrap();
        assert_eq!(stmt, "SELECT * FROM docs WHERE id IN (9,2,5,1) LIMIT 10");
    }

    #[test]
    fn compose_emits_exactly_one_limit() {
        for stmt in [
            "SELECT * FROM docs",
            "SELECT * FROM docs LIMIT 7",
            "SELECT * FROM docs WHERE a=1 LIMIT 7 OFFSET 14",
        ] {
            let rewritten = compose_filtered(stmt, &ids(&["1"])).unwrap();
            let count = limit_re().find_iter(&mask_literals(&rewritten)).count();
            assert_eq!(count, 1, "statement: {rewritten}");
            assert!(rewritten.contains("LIMIT"));
        }
    }

    #[test]
    fn compose_keeps_limit_offset_tail_verbatim() {
        let stmt = compose_filtered("SELECT * FROM docs LIMIT 5 OFFSET 10", &ids(&["4"])).unwrap();
        assert_eq!(stmt, "SELECT * FROM docs WHERE id IN (4) LIMIT 5 OFFSET 10");
    }

    #[test]
    fn compose_detects_lowercase_clauses() {
        let stmt = compose_filtered("select * from docs where a=1 limit 2", &ids(&["8"])).unwrap();
        assert_eq!(stmt, "select * from docs where a=1 AND id IN (8) LIMIT 2");
    }

    #[test]
    fn compose_ignores_limit_inside_literal() {
        let stmt = compose_filtered(
            "SELECT * FROM docs WHERE note = 'no limit here'",
            &ids(&["2"]),
        )
        .unwrap();
        assert_eq!(
            stmt,
            "SELECT * FROM docs WHERE note = 'no limit here' AND id IN (2) LIMIT 10"
        );
    }

    #[test]
    fn compose_propagates_parse_failure() {
        let err = compose_filtered("UPDATE docs SET a=1", &ids(&["1"])).unwrap_err();
        assert!(matches!(err, SolrError::SqlParse { .. }));
    }
}

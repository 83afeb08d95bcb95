//! Fast codebase search and file finding.
//!
//! Both tools try the indexed path first: a query against a codebase
//! collection where files are stored with `content`, `file_name`, and
//! `file_type` fields. When the collection is unreachable or missing they
//! fall back to scanning the workspace directly, and tag the result with
//! the method used so agents know which guarantees apply.

use std::path::Path;

use regex::RegexBuilder;
use serde_json::{json, Value};
use walkdir::WalkDir;

use crate::protocol::{FastFindParams, FastSearchParams, ToolResult};
use crate::solr::SearchOptions;

use super::ToolContext;

/// Directories skipped by the local fallback scan.
const SKIP_DIRS: &[&str] = &[".git", "target", "node_modules", ".venv", "__pycache__"];

/// Files larger than this are skipped by the local content scan (1 MiB).
const MAX_SCAN_BYTES: u64 = 1024 * 1024;

pub fn tools() -> Vec<Value> {
    vec![
        json!({
            "name": "fast_codebase_search",
            "description": "Search file contents across the indexed codebase, falling back to a local workspace scan when the index is unavailable",
            "inputSchema": {
                "type": "object",
                "required": ["pattern"],
                "properties": {
                    "pattern": {
                        "type": "string",
                        "description": "Text or regular expression to search for"
                    },
                    "file_type": {
                        "type": "string",
                        "description": "Restrict to a file extension, e.g. rs, py, toml"
                    },
                    "collection": {
                        "type": "string",
                        "description": "Codebase collection to search (default 'codebase')"
                    },
                    "max_results": { "type": "integer", "minimum": 1 },
                    "use_highlighting": {
                        "type": "boolean",
                        "description": "Return highlight snippets from the index (default true)"
                    }
                }
            }
        }),
        json!({
            "name": "fast_file_find",
            "description": "Find files by name pattern across the indexed codebase, falling back to a local workspace scan when the index is unavailable",
            "inputSchema": {
                "type": "object",
                "required": ["name_pattern"],
                "properties": {
                    "name_pattern": {
                        "type": "string",
                        "description": "Substring or glob-like fragment of the file name, e.g. client or *.toml"
                    },
                    "file_type": {
                        "type": "string",
                        "description": "Restrict to a file extension"
                    },
                    "collection": {
                        "type": "string",
                        "description": "Codebase collection to search (default 'codebase')"
                    },
                    "max_results": { "type": "integer", "minimum": 1 }
                }
            }
        }),
    ]
}

pub async fn search(params: FastSearchParams, ctx: &ToolContext) -> ToolResult {
    let mut fq = Vec::new();
    if let Some(ft) = &params.file_type {
        fq.push(format!("file_type:{ft}"));
    }

    let options = SearchOptions {
        q: format!("content:({})", escape_query(&params.pattern)),
        fq,
        fl: Some("id,file_name,file_path,file_type".to_string()),
        rows: params.max_results,
        highlight_fields: if params.use_highlighting {
            vec!["content".to_string()]
        } else {
            Vec::new()
        },
        ..SearchOptions::default()
    };

    match ctx.client.execute_query(&params.collection, &options).await {
        Ok(mut result) => {
            annotate(&mut result, "solr", "served from the search index");
            ToolResult::json(&result)
        }
        Err(e) => {
            tracing::warn!(error = %e, "index search failed, scanning workspace");
            let root = ctx.config.workspace_root.clone();
            let scan = tokio::task::spawn_blocking(move || {
                scan_contents(
                    &root,
                    &params.pattern,
                    params.file_type.as_deref(),
                    params.max_results as usize,
                )
            })
            .await;

            match scan {
                Ok(Ok(mut result)) => {
                    annotate(
                        &mut result,
                        "local",
                        "index unavailable; scanned the workspace directly, which is slower and unranked",
                    );
                    ToolResult::json(&result)
                }
                Ok(Err(msg)) => ToolResult::error(msg),
                Err(e) => ToolResult::error(format!("Local scan failed: {e}")),
            }
        }
    }
}

pub async fn find(params: FastFindParams, ctx: &ToolContext) -> ToolResult {
    let mut fq = Vec::new();
    if let Some(ft) = &params.file_type {
        fq.push(format!("file_type:{ft}"));
    }

    let options = SearchOptions {
        q: format!("file_name:{}", name_query(&params.name_pattern)),
        fq,
        fl: Some("id,file_name,file_path,file_type".to_string()),
        rows: params.max_results,
        ..SearchOptions::default()
    };

    match ctx.client.execute_query(&params.collection, &options).await {
        Ok(mut result) => {
            annotate(&mut result, "solr", "served from the search index");
            ToolResult::json(&result)
        }
        Err(e) => {
            tracing::warn!(error = %e, "index lookup failed, scanning workspace");
            let root = ctx.config.workspace_root.clone();
            let scan = tokio::task::spawn_blocking(move || {
                scan_names(
                    &root,
                    &params.name_pattern,
                    params.file_type.as_deref(),
                    params.max_results as usize,
                )
            })
            .await;

            match scan {
                Ok(Ok(mut result)) => {
                    annotate(
                        &mut result,
                        "local",
                        "index unavailable; scanned the workspace directly, which is slower and unranked",
                    );
                    ToolResult::json(&result)
                }
                Ok(Err(msg)) => ToolResult::error(msg),
                Err(e) => ToolResult::error(format!("Local scan failed: {e}")),
            }
        }
    }
}

fn annotate(result: &mut Value, method: &str, note: &str) {
    if let Some(obj) = result.as_object_mut() {
        obj.insert("search_method".to_string(), json!(method));
        obj.insert("performance_note".to_string(), json!(note));
    }
}

/// Escape Lucene query syntax characters in a user-supplied pattern.
fn escape_query(pattern: &str) -> String {
    let mut escaped = String::with_capacity(pattern.len());
    for ch in pattern.chars() {
        if "+-&|!(){}[]^\"~*?:\\/".contains(ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Turn a name fragment into a wildcard query term.
fn name_query(pattern: &str) -> String {
    if pattern.contains('*') || pattern.contains('?') {
        pattern.to_string()
    } else {
        format!("*{}*", escape_query(pattern))
    }
}

fn walk(root: &Path) -> impl Iterator<Item = walkdir::DirEntry> {
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            e.file_name()
                .to_str()
                .map(|name| !SKIP_DIRS.contains(&name))
                .unwrap_or(true)
        })
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
}

fn matches_type(entry: &walkdir::DirEntry, file_type: Option<&str>) -> bool {
    match file_type {
        Some(ft) => entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(ft)),
        None => true,
    }
}

/// Content scan over the workspace. Lines matching the pattern are
/// collected per file, up to `max_results` files.
fn scan_contents(
    root: &Path,
    pattern: &str,
    file_type: Option<&str>,
    max_results: usize,
) -> Result<Value, String> {
    let re = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| format!("Invalid search pattern: {e}"))?;

    let mut hits = Vec::new();
    for entry in walk(root) {
        if hits.len() >= max_results {
            break;
        }
        if !matches_type(&entry, file_type) {
            continue;
        }
        if entry.metadata().map(|m| m.len()).unwrap_or(0) > MAX_SCAN_BYTES {
            continue;
        }
        let Ok(content) = std::fs::read_to_string(entry.path()) else {
            continue;
        };

        let matches: Vec<Value> = content
            .lines()
            .enumerate()
            .filter(|(_, line)| re.is_match(line))
            .take(5)
            .map(|(i, line)| json!({ "line": i + 1, "text": line.trim_end() }))
            .collect();

        if !matches.is_empty() {
            hits.push(json!({
                "file_path": entry.path().display().to_string(),
                "matches": matches,
            }));
        }
    }

    Ok(json!({
        "num_found": hits.len(),
        "docs": hits,
        "query": pattern,
    }))
}

/// File name scan over the workspace.
fn scan_names(
    root: &Path,
    name_pattern: &str,
    file_type: Option<&str>,
    max_results: usize,
) -> Result<Value, String> {
    let re = RegexBuilder::new(&glob_to_regex(name_pattern))
        .case_insensitive(true)
        .build()
        .map_err(|e| format!("Invalid name pattern: {e}"))?;

    let mut hits = Vec::new();
    for entry in walk(root) {
        if hits.len() >= max_results {
            break;
        }
        if !matches_type(&entry, file_type) {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if re.is_match(name) {
            hits.push(json!({
                "file_name": name,
                "file_path": entry.path().display().to_string(),
            }));
        }
    }

    Ok(json!({
        "num_found": hits.len(),
        "docs": hits,
        "query": name_pattern,
    }))
}

/// Translate a glob-like fragment into a substring-matching regex.
fn glob_to_regex(pattern: &str) -> String {
    let mut re = String::new();
    for ch in pattern.chars() {
        match ch {
            '*' => re.push_str(".*"),
            '?' => re.push('.'),
            c => re.push_str(&regex::escape(&c.to_string())),
        }
    }
    re
}

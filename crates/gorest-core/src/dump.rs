//! Request/response dump to JSONL files
//!
//! Writes every recorded exchange to per-operation JSONL files for post-hoc
//! debugging. The files are write-only diagnostics; the suite never reads
//! them back.
//!
//! ```text
//! .gorest/dumps/
//! ├── POST_users.jsonl
//! ├── DELETE_users_id.jsonl
//! └── index.json
//! ```

use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Headers that should be masked in dumps for security.
const SENSITIVE_HEADERS: &[&str] = &[
    "authorization",
    "x-api-key",
    "x-auth-token",
    "cookie",
    "set-cookie",
    "proxy-authorization",
];

/// Mask value for redacted headers.
const MASK: &str = "***";

/// One HTTP request and the response it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    /// Operation label with ids templated out, e.g. "GET /users/{id}"
    pub operation: String,
    pub method: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub request_headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<serde_json::Value>,
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_body: Option<String>,
    /// Seconds between send and full body receipt
    #[serde(default)]
    pub elapsed: f64,
}

/// Summary of a dump operation, written as `index.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpIndex {
    /// Total exchanges dumped
    pub total: u64,
    /// Per-operation file listing
    pub operations: Vec<DumpOperationEntry>,
    /// Directory where files were written
    pub dump_dir: PathBuf,
}

/// An entry in the dump index for one operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpOperationEntry {
    /// Operation label, e.g. "POST /users"
    pub operation: String,
    /// Filename within dump directory
    pub file: String,
    /// Number of exchanges in this file
    pub count: u64,
}

/// Write all exchanges to per-operation JSONL files.
///
/// # Errors
///
/// Returns error if dump directory cannot be created or files cannot be written.
pub fn write_dump(
    exchanges: &[Exchange],
    dump_dir: &Path,
    mask_headers: bool,
) -> Result<DumpIndex, DumpError> {
    std::fs::create_dir_all(dump_dir)
        .map_err(|e| DumpError::Io(format!("create {}: {e}", dump_dir.display())))?;

    let mut groups: HashMap<&str, Vec<&Exchange>> = HashMap::new();
    for exchange in exchanges {
        groups
            .entry(exchange.operation.as_str())
            .or_default()
            .push(exchange);
    }

    let mut entries = Vec::new();
    let mut total: u64 = 0;

    // Sort by operation name for deterministic output
    let mut ops: Vec<_> = groups.into_iter().collect();
    ops.sort_by(|a, b| a.0.cmp(b.0));

    for (operation, exchanges) in ops {
        let filename = sanitize_filename(operation);
        let filepath = dump_dir.join(&filename);

        let file = std::fs::File::create(&filepath)
            .map_err(|e| DumpError::Io(format!("create {}: {e}", filepath.display())))?;
        let mut writer = std::io::BufWriter::new(file);

        let count = exchanges.len() as u64;
        total += count;

        for exchange in exchanges {
            let line = if mask_headers {
                serde_json::to_string(&mask_exchange(exchange))
            } else {
                serde_json::to_string(exchange)
            }
            .map_err(|e| DumpError::Serialize(e.to_string()))?;
            writeln!(writer, "{line}")
                .map_err(|e| DumpError::Io(format!("write {}: {e}", filepath.display())))?;
        }

        writer
            .flush()
            .map_err(|e| DumpError::Io(format!("flush {}: {e}", filepath.display())))?;

        entries.push(DumpOperationEntry {
            operation: operation.to_string(),
            file: filename,
            count,
        });
    }

    let index = DumpIndex {
        total,
        operations: entries,
        dump_dir: dump_dir.to_path_buf(),
    };

    let index_path = dump_dir.join("index.json");
    let index_json =
        serde_json::to_string_pretty(&index).map_err(|e| DumpError::Serialize(e.to_string()))?;
    std::fs::write(&index_path, index_json)
        .map_err(|e| DumpError::Io(format!("write {}: {e}", index_path.display())))?;

    Ok(index)
}

/// Maximum characters kept from the operation label in the filename.
const MAX_FILENAME_LEN: usize = 200;

/// "DELETE /users/{id}" → "DELETE__users__id_.jsonl"
fn sanitize_filename(operation: &str) -> String {
    let sanitized: String = operation
        .chars()
        .take(MAX_FILENAME_LEN)
        .map(|c| match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '.' => c,
            _ => '_',
        })
        .collect();
    format!("{sanitized}.jsonl")
}

/// Returns true if the header name matches a known sensitive header (case-insensitive).
#[must_use]
pub fn is_sensitive_header(name: &str) -> bool {
    SENSITIVE_HEADERS
        .iter()
        .any(|&h| name.eq_ignore_ascii_case(h))
}

fn mask_exchange(exchange: &Exchange) -> Exchange {
    let mut masked = exchange.clone();
    for (key, value) in &mut masked.request_headers {
        if is_sensitive_header(key) {
            *value = MASK.to_string();
        }
    }
    masked
}

#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
}

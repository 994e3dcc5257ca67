use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Read documents from `path`: a single file, or every `.json`, `.jsonl` and
/// `.ndjson` file below a directory (in path order).
///
/// A `.json` file holds one document or an array of documents; the
/// line-delimited formats hold one document per non-empty line.
///
/// # Errors
///
/// Fails when `path` does not exist, a directory cannot be walked, or a file
/// is not valid JSON.
pub fn load_documents(path: &Path) -> Result<Vec<Value>> {
    if !path.exists() {
        anyhow::bail!("data path {} does not exist", path.display());
    }
    let files = if path.is_file() { vec![path.to_path_buf()] } else { list_json_files(path)? };
    let mut docs = Vec::new();
    for file in &files {
        let before = docs.len();
        read_file(file, &mut docs)?;
        debug!(file = %file.display(), documents = docs.len() - before, "loaded documents");
    }
    info!(path = %path.display(), files = files.len(), documents = docs.len(), "document load complete");
    Ok(docs)
}

fn read_file(file: &Path, docs: &mut Vec<Value>) -> Result<()> {
    let content = fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    match extension(file) {
        Some("jsonl" | "ndjson") => {
            for (n, line) in content.lines().enumerate().filter(|(_, l)| !l.trim().is_empty()) {
                let doc: Value = serde_json::from_str(line)
                    .with_context(|| format!("{}:{}: invalid JSON", file.display(), n + 1))?;
                docs.push(doc);
            }
        }
        _ => match serde_json::from_str::<Value>(&content).with_context(|| format!("{}: invalid JSON", file.display()))? {
            Value::Array(items) => docs.extend(items),
            doc => docs.push(doc),
        },
    }
    Ok(())
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|s| s.to_str())
}

fn list_json_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(root) {
        let entry = entry.with_context(|| format!("walking {}", root.display()))?;
        let path = entry.path();
        if entry.file_type().is_file() && matches!(extension(path), Some("json" | "jsonl" | "ndjson")) {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

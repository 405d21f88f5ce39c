pub mod schema;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use serde_json::Value;
use walkdir::WalkDir;

/// One page of a feed dump, in any of the shapes the upstream services return.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Page {
    /// Bare array of records
    Records(Vec<Value>),
    /// setlist.fm search page: `{"setlist": [...], "total": .., "page": ..}`
    SetlistPage { setlist: Vec<Value> },
    /// A single record (one Discogs master per file)
    Single(Value),
}

/// Parse the text of one page into its records.
pub fn parse_page(text: &str) -> Result<Vec<Value>> {
    let page: Page = serde_json::from_str(text).context("Page is not valid JSON")?;
    Ok(match page {
        Page::Records(records) => records,
        Page::SetlistPage { setlist } => setlist,
        Page::Single(record) => vec![record],
    })
}

/// Load all records from a feed path: a single JSON file, or a directory of
/// `*.json` pages read in path order.
pub fn load_records(path: &Path) -> Result<Vec<Value>> {
    if path.is_file() {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        return parse_page(&text).with_context(|| format!("Failed to parse {}", path.display()));
    }

    let pages = page_files(path)?;
    if pages.is_empty() {
        anyhow::bail!("No .json pages found in {}", path.display());
    }

    let pb = ProgressBar::new(pages.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} pages {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut records = Vec::new();
    for page in &pages {
        let text = std::fs::read_to_string(page)
            .with_context(|| format!("Failed to read {}", page.display()))?;
        let page_records =
            parse_page(&text).with_context(|| format!("Failed to parse {}", page.display()))?;
        log::debug!("{}: {} records", page.display(), page_records.len());
        records.extend(page_records);
        pb.inc(1);
    }

    pb.finish_and_clear();
    log::info!("Loaded {} records from {} pages in {}", records.len(), pages.len(), path.display());
    Ok(records)
}

/// List `*.json` files under a directory, sorted for deterministic order.
fn page_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("Feed path {} is neither a file nor a directory", dir.display());
    }

    let mut pages: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("json"))
                .unwrap_or(false)
        })
        .map(|e| e.into_path())
        .collect();
    pages.sort();
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_array() {
        let records = parse_page(r#"[{"id": "a"}, {"id": "b"}]"#).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_parse_setlist_page() {
        let text = r#"{"type": "setlists", "itemsPerPage": 20, "page": 1, "total": 2,
                       "setlist": [{"id": "a"}, {"id": "b"}]}"#;
        let records = parse_page(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["id"], "b");
    }

    #[test]
    fn test_parse_single_master() {
        let records = parse_page(r#"{"title": "Album A", "year": 2000, "tracklist": []}"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["title"], "Album A");
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_page("not json").is_err());
    }

    #[test]
    fn test_load_directory_of_pages() {
        let dir = std::env::temp_dir().join(format!("setstats-feed-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("nested")).unwrap();
        std::fs::write(dir.join("p2.json"), r#"{"setlist": [{"id": "c"}]}"#).unwrap();
        std::fs::write(dir.join("p1.json"), r#"[{"id": "a"}, {"id": "b"}]"#).unwrap();
        std::fs::write(dir.join("nested").join("p3.json"), r#"[{"id": "d"}]"#).unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let records = load_records(&dir).unwrap();
        let ids: Vec<&str> = records.iter().filter_map(|r| r["id"].as_str()).collect();
        assert_eq!(ids, vec!["d", "a", "b", "c"]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_missing_path() {
        let missing = std::env::temp_dir().join("setstats-definitely-missing");
        assert!(load_records(&missing).is_err());
    }
}

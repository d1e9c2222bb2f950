//! Offline preprocessing of item dumps: sort by date, bucket by day, write the
//! grouped JSON the grid consumes with `LayoutController::from_groups`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::grouping::{group_by_date, sort_by_date};
use crate::models::{Item, ItemGroup};

/// Sorts (optionally) and groups `items`.
pub fn groupify(mut items: Vec<Item>, sort: bool) -> Vec<ItemGroup> {
    if sort {
        sort_by_date(&mut items);
    }
    group_by_date(items)
}

pub fn read_items(path: &Path) -> Result<Vec<Item>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read items from {:?}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid item JSON in {:?}", path))
}

pub fn read_groups(path: &Path) -> Result<Vec<ItemGroup>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read groups from {:?}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid group JSON in {:?}", path))
}

pub fn write_groups(path: &Path, groups: &[ItemGroup]) -> Result<()> {
    let json = serde_json::to_string(groups).context("Failed to serialize groups")?;
    fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))
}

/// Reads `input`, groups it and writes `output`. Returns the number of groups.
pub fn groupify_file(input: &Path, output: &Path, sort: bool) -> Result<usize> {
    let items = read_items(input)?;
    let item_count = items.len();
    let groups = groupify(items, sort);
    write_groups(output, &groups)?;
    info!(
        items = item_count,
        groups = groups.len(),
        "Generated grouped JSON file {:?}",
        output
    );
    Ok(groups.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ITEMS: &str = r#"[
        {"id": "a", "url": "a.jpg", "aspectRatio": 1.5, "date": "2017-05-01T10:00:00Z"},
        {"id": "b", "url": "b.jpg", "aspectRatio": 0.667, "date": "2019-05-01T10:00:00Z", "location": "Lisbon"},
        {"id": "c", "url": "c.jpg", "aspectRatio": 1.0},
        {"id": "d", "url": "d.jpg", "aspectRatio": 1.0, "date": "2017-05-01T18:00:00Z", "dominantColor": "rgb(1,2,3)"}
    ]"#;

    fn write_input(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("items.json");
        fs::write(&path, ITEMS).unwrap();
        path
    }

    #[test]
    fn test_groupify_file_sorted() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir);
        let output = dir.path().join("grouped.json");

        assert_eq!(groupify_file(&input, &output, true).unwrap(), 3);

        let groups = read_groups(&output).unwrap();
        let labels: Vec<&str> = groups.iter().map(|g| g.date.as_str()).collect();
        assert_eq!(labels, vec!["1 May 2019", "1 May 2017", "No date"]);
        assert_eq!(groups[0].description, "Lisbon");
        assert_eq!(groups[1].items.len(), 2);
        // Same day, later time first.
        assert_eq!(groups[1].items[0].id, "d");
        assert_eq!(groups[1].items[0].dominant_color.as_deref(), Some("rgb(1,2,3)"));
    }

    #[test]
    fn test_groupify_without_sort_keeps_input_order() {
        let dir = TempDir::new().unwrap();
        let items = read_items(&write_input(&dir)).unwrap();
        let groups = groupify(items, false);
        let labels: Vec<&str> = groups.iter().map(|g| g.date.as_str()).collect();
        assert_eq!(labels, vec!["1 May 2017", "1 May 2019", "No date"]);
    }

    #[test]
    fn test_missing_input_reports_path() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.json");
        let err = groupify_file(&missing, &dir.path().join("out.json"), true).unwrap_err();
        assert!(format!("{:#}", err).contains("nope.json"));
    }

    #[test]
    fn test_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();
        assert!(read_items(&path).is_err());
    }
}

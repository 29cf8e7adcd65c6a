//! Catalog row storage — one CSV file, read fully, replaced fully.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use vitrina_core::error::{Result, VitrinaError};
use vitrina_core::traits::RowStore;
use vitrina_core::types::Row;

/// File-backed catalog store. Row 0 is the header; the column layout of
/// data rows is fixed (see [`crate::goods`]).
pub struct CsvRowStore {
    path: PathBuf,
}

impl CsvRowStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RowStore for CsvRowStore {
    async fn load(&self) -> Result<Vec<Row>> {
        if !self.path.exists() {
            return Err(VitrinaError::Storage(format!(
                "catalog file not found: {}",
                self.path.display()
            )));
        }
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| VitrinaError::Storage(format!("read {}: {e}", self.path.display())))?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record
                .map_err(|e| VitrinaError::Storage(format!("parse {}: {e}", self.path.display())))?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(rows)
    }

    async fn overwrite(&self, rows: &[Row]) -> Result<()> {
        let tmp = self.path.with_extension("csv.tmp");
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(&tmp)
            .map_err(|e| VitrinaError::Storage(format!("write {}: {e}", tmp.display())))?;
        for row in rows {
            writer
                .write_record(row)
                .map_err(|e| VitrinaError::Storage(format!("write {}: {e}", tmp.display())))?;
        }
        writer
            .flush()
            .map_err(|e| VitrinaError::Storage(format!("flush {}: {e}", tmp.display())))?;
        drop(writer);
        std::fs::rename(&tmp, &self.path)?;
        tracing::debug!("Catalog overwritten with {} rows", rows.len());
        Ok(())
    }
}

/// Download a replacement catalog into `path`.
pub async fn fetch_remote(url: &str, path: &Path) -> Result<()> {
    let client = reqwest::Client::new();
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| VitrinaError::Http(format!("download {url}: {e}")))?;
    if !response.status().is_success() {
        return Err(VitrinaError::Http(format!(
            "download {url}: HTTP {}",
            response.status()
        )));
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|e| VitrinaError::Http(format!("download {url}: {e}")))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, &bytes)?;
    tracing::info!("Catalog saved to {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store(name: &str) -> CsvRowStore {
        let dir = std::env::temp_dir().join("vitrina-test-catalog").join(name);
        std::fs::remove_dir_all(&dir).ok();
        std::fs::create_dir_all(&dir).unwrap();
        CsvRowStore::new(dir.join("goods.csv"))
    }

    fn row(fields: &[&str]) -> Row {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn load_reports_a_missing_file() {
        let store = test_store("missing");
        let err = store.load().await.unwrap_err();
        assert!(matches!(err, VitrinaError::Storage(_)));
    }

    #[tokio::test]
    async fn overwrite_then_load_round_trips() {
        let store = test_store("round-trip");
        let rows = vec![
            row(&["barcode", "title", "description", "price", "imageUrls", "options"]),
            row(&["4820000001", "Рюкзак", "міцний, 20л", "749.50", "http://a/1.jpg, http://a/2.jpg", ""]),
        ];
        store.overwrite(&rows).await.unwrap();
        assert_eq!(store.load().await.unwrap(), rows);
    }

    #[tokio::test]
    async fn quoted_fields_survive_the_overwrite() {
        let store = test_store("quoting");
        let rows = vec![
            row(&["barcode", "title"]),
            row(&["123", "Набір \"Зима\", подарунковий"]),
        ];
        store.overwrite(&rows).await.unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded[1][1], "Набір \"Зима\", подарунковий");
    }

    #[tokio::test]
    async fn ragged_rows_are_preserved() {
        let store = test_store("ragged");
        let rows = vec![row(&["a", "b", "c"]), row(&["only", "two"])];
        store.overwrite(&rows).await.unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded[1].len(), 2);
    }
}

//! Location catalog service
//!
//! Reads the set of monitored cities for an ingestion cycle and imports new
//! cities from CSV files (`name,latitude,longitude`, optional header row).

use std::io::Read;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use shared::{default_catalog, is_catalog_header, Location};
use sqlx::SqlitePool;
use validator::Validate;

use crate::error::AppResult;

/// Catalog service
#[derive(Clone)]
pub struct CatalogService {
    db: SqlitePool,
}

/// A CSV row that was rejected during import
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowError {
    pub line: u64,
    pub message: String,
}

/// Valid rows and rejected rows of one CSV file
#[derive(Debug, Default)]
pub struct ParsedCatalog {
    pub header_skipped: bool,
    pub rows: Vec<(u64, Location)>,
    pub errors: Vec<RowError>,
}

/// Outcome of one import run
#[derive(Debug, Default, Serialize)]
pub struct ImportSummary {
    pub imported: u64,
    pub duplicates: u64,
    pub errors: Vec<RowError>,
    pub total_in_database: i64,
}

/// Parse and validate catalog rows without touching the database
pub fn parse_catalog_csv<R: Read>(reader: R) -> ParsedCatalog {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut parsed = ParsedCatalog::default();
    for (index, result) in csv_reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(index as u64 + 1);
                parsed.errors.push(RowError {
                    line,
                    message: format!("Unreadable row: {}", e),
                });
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or(index as u64 + 1);

        if index == 0 && record.get(0).is_some_and(is_catalog_header) {
            parsed.header_skipped = true;
            continue;
        }

        match parse_row(&record) {
            Ok(location) => parsed.rows.push((line, location)),
            Err(message) => parsed.errors.push(RowError { line, message }),
        }
    }

    parsed
}

fn parse_row(record: &StringRecord) -> Result<Location, String> {
    if record.len() < 3 {
        let fields: Vec<&str> = record.iter().collect();
        return Err(format!("Incomplete row ({})", fields.join(", ")));
    }

    let name = record[0].to_string();
    let latitude: f64 = record[1]
        .parse()
        .map_err(|_| format!("Invalid latitude: {}", &record[1]))?;
    let longitude: f64 = record[2]
        .parse()
        .map_err(|_| format!("Invalid longitude: {}", &record[2]))?;

    let location = Location::new(name, latitude, longitude);
    location.validate().map_err(|errors| {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_values()
            .flatten()
            .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .collect();
        messages.sort();
        messages.join("; ")
    })?;

    Ok(location)
}

impl CatalogService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Imported cities in import order
    pub async fn list_locations(&self) -> AppResult<Vec<Location>> {
        let rows = sqlx::query_as::<_, (String, f64, f64)>(
            "SELECT name, latitude, longitude FROM cities ORDER BY id",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(name, latitude, longitude)| Location::new(name, latitude, longitude))
            .collect())
    }

    /// Catalog for the next ingestion cycle
    ///
    /// Falls back to the built-in catalog while no cities are imported.
    pub async fn load_catalog(&self) -> AppResult<Vec<Location>> {
        let locations = self.list_locations().await?;
        if locations.is_empty() {
            tracing::info!("No imported cities, using default catalog");
            return Ok(default_catalog());
        }
        Ok(locations)
    }

    /// Import cities from CSV; duplicates are skipped, invalid rows reported
    pub async fn import_csv<R: Read>(&self, reader: R) -> AppResult<ImportSummary> {
        let parsed = parse_catalog_csv(reader);
        if parsed.header_skipped {
            tracing::info!("Header row detected and skipped");
        }

        let mut summary = ImportSummary {
            errors: parsed.errors,
            ..ImportSummary::default()
        };

        let mut tx = self.db.begin().await?;
        for (line, location) in parsed.rows {
            let result = sqlx::query(
                "INSERT OR IGNORE INTO cities (name, latitude, longitude) VALUES (?, ?, ?)",
            )
            .bind(&location.name)
            .bind(location.latitude)
            .bind(location.longitude)
            .execute(&mut *tx)
            .await;

            match result {
                Ok(done) if done.rows_affected() > 0 => {
                    summary.imported += 1;
                    if summary.imported % 100 == 0 {
                        tracing::info!("{} cities imported...", summary.imported);
                    }
                }
                Ok(_) => summary.duplicates += 1,
                Err(e) => summary.errors.push(RowError {
                    line,
                    message: format!("Failed to insert '{}': {}", location.name, e),
                }),
            }
        }
        tx.commit().await?;

        summary.errors.sort_by_key(|e| e.line);
        summary.total_in_database = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM cities")
            .fetch_one(&self.db)
            .await?;

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::DatabaseConfig, database};

    async fn service() -> CatalogService {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            ..DatabaseConfig::default()
        };
        CatalogService::new(database::connect(&config).await.unwrap())
    }

    #[test]
    fn test_header_row_is_skipped() {
        let parsed = parse_catalog_csv("Name,Latitude,Longitude\nBerlin,52.52,13.405\n".as_bytes());
        assert!(parsed.header_skipped);
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].0, 2);
        assert_eq!(parsed.rows[0].1.name, "Berlin");
        assert!(parsed.errors.is_empty());
    }

    #[test]
    fn test_first_row_without_header_is_data() {
        let parsed = parse_catalog_csv("Berlin,52.52,13.405\nHamburg,53.5511,9.9937\n".as_bytes());
        assert!(!parsed.header_skipped);
        assert_eq!(parsed.rows.len(), 2);
    }

    #[test]
    fn test_fields_are_trimmed() {
        let parsed = parse_catalog_csv("  Köln , 50.9375 ,6.9603 \n".as_bytes());
        assert_eq!(parsed.rows[0].1, Location::new("Köln", 50.9375, 6.9603));
    }

    #[test]
    fn test_invalid_rows_are_reported_with_line_numbers() {
        let csv = "name,latitude,longitude\n\
                   Berlin,52.52,13.405\n\
                   Incomplete,12.0\n\
                   ,10.0,10.0\n\
                   North,95.0,10.0\n\
                   East,10.0,181.0\n\
                   Words,abc,10.0\n";
        let parsed = parse_catalog_csv(csv.as_bytes());

        assert_eq!(parsed.rows.len(), 1);
        let lines: Vec<u64> = parsed.errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 4, 5, 6, 7]);
        assert!(parsed.errors[0].message.starts_with("Incomplete row"));
        assert_eq!(parsed.errors[1].message, "City name is missing");
        assert_eq!(parsed.errors[2].message, "Latitude must be between -90 and 90");
        assert_eq!(parsed.errors[3].message, "Longitude must be between -180 and 180");
        assert_eq!(parsed.errors[4].message, "Invalid latitude: abc");
    }

    #[tokio::test]
    async fn test_import_skips_duplicates_and_reports_errors() {
        let service = service().await;
        let csv = "Name,Latitude,Longitude\n\
                   Berlin,52.52,13.405\n\
                   Hamburg,53.5511,9.9937\n\
                   Berlin,52.52,13.405\n\
                   Nowhere,100.0,0.0\n";

        let summary = service.import_csv(csv.as_bytes()).await.unwrap();

        assert_eq!(summary.imported, 2);
        assert_eq!(summary.duplicates, 1);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].line, 5);
        assert_eq!(summary.total_in_database, 2);

        let again = service.import_csv(csv.as_bytes()).await.unwrap();
        assert_eq!(again.imported, 0);
        assert_eq!(again.duplicates, 3);
        assert_eq!(again.total_in_database, 2);
    }

    #[tokio::test]
    async fn test_imported_cities_replace_default_catalog() {
        let service = service().await;
        assert_eq!(service.load_catalog().await.unwrap(), default_catalog());

        service
            .import_csv("Wien,48.2082,16.3738\nGraz,47.0707,15.4395\n".as_bytes())
            .await
            .unwrap();

        let catalog = service.load_catalog().await.unwrap();
        let names: Vec<&str> = catalog.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Wien", "Graz"]);
    }
}

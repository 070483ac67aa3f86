//! # Station Importer
//!
//! Offline batch job that turns a directory of raw station-definition CSV
//! files into the sqlite store's schema. This runs rarely (when the gauge
//! network changes) and never on the prediction hot path.
//!
//! Each CSV row carries the station's source data filename in its last
//! field; the station id is that file's stem with its 3-character network
//! prefix dropped. Fields 5 and 6 are latitude and longitude in degrees.
//! The four trig scalars are computed here, once, so every later
//! nearest-station scan is pure arithmetic.
//!
//! Policy: malformed or short rows are skipped and logged, unreadable
//! files are skipped entirely, and an empty or nonexistent source
//! directory still produces a valid (empty) catalog. Re-running against an
//! existing store is NOT supported — schema creation fails cleanly rather
//! than merging; point the importer at a fresh path.

use crate::store::{Station, StationStore};
use crate::EngineError;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Counts from one importer run, for operator logging.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub files: usize,
    pub rows_imported: usize,
    pub rows_skipped: usize,
}

/// Import every `*.csv` under `source_dir` into a fresh store at
/// `store_path`. Fails if the store already holds the schema.
pub async fn import_stations(
    store_path: &Path,
    source_dir: &Path,
) -> Result<ImportReport, EngineError> {
    let store = StationStore::create(store_path).await?;
    store.init_schema().await?;

    let mut report = ImportReport::default();

    let entries = match fs::read_dir(source_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("source directory {} unreadable ({e}); catalog left empty", source_dir.display());
            return Ok(report);
        }
    };

    for entry in entries {
        let path = entry?.path();
        if !path.is_file() || !has_csv_extension(&path) {
            continue;
        }

        let mut reader = match csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)
        {
            Ok(reader) => reader,
            Err(e) => {
                warn!("skipping unreadable file {}: {e}", path.display());
                continue;
            }
        };
        report.files += 1;

        for record in reader.records() {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    warn!("skipping undecodable row in {}: {e}", path.display());
                    report.rows_skipped += 1;
                    continue;
                }
            };

            match parse_station_row(&record) {
                Some(station) => {
                    store.insert_station(&station).await?;
                    report.rows_imported += 1;
                }
                None => {
                    warn!("skipping malformed row in {}", path.display());
                    report.rows_skipped += 1;
                }
            }
        }
    }

    info!(
        files = report.files,
        imported = report.rows_imported,
        skipped = report.rows_skipped,
        "station import finished"
    );
    Ok(report)
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// Extract a station from one definition row, or `None` if the row is too
/// short or any field fails to parse.
fn parse_station_row(record: &csv::StringRecord) -> Option<Station> {
    let source_file = record.iter().last()?;
    let stem = Path::new(source_file.trim()).file_stem()?.to_str()?;
    // drop the 3-character network prefix from the data filename
    let id = stem.get(3..).filter(|id| !id.is_empty())?;

    let lat: f64 = record.get(5)?.trim().parse().ok()?;
    let lon: f64 = record.get(6)?.trim().parse().ok()?;

    Some(Station::new(id, lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use std::io::Write;
    use tempfile::TempDir;

    fn station_row(lat: &str, lon: &str, file: &str) -> String {
        // real definition rows carry extra metadata fields; only 5, 6 and
        // the trailing filename matter to the importer
        format!("x,y,z,w,v,{lat},{lon},u,{file}")
    }

    async fn run_import(rows_by_file: &[(&str, Vec<String>)]) -> (TempDir, ImportReport) {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        fs::create_dir(&src).unwrap();
        for (name, rows) in rows_by_file {
            let mut f = fs::File::create(src.join(name)).unwrap();
            for row in rows {
                writeln!(f, "{row}").unwrap();
            }
        }
        let report = import_stations(&dir.path().join("out.sqlite"), &src)
            .await
            .unwrap();
        (dir, report)
    }

    #[test]
    fn parses_a_wellformed_row() {
        let row = station_row("43.65", "-70.25", "/data/raw/fdh042.csv");
        let record = csv::StringRecord::from(row.split(',').collect::<Vec<_>>());
        let station = parse_station_row(&record).unwrap();
        assert_eq!(station.id, "042");
        assert_eq!(station.lat, 43.65);
        assert_eq!(station.lon, -70.25);
        assert!((station.cos_lat - 43.65_f64.to_radians().cos()).abs() < 1e-15);
    }

    #[test]
    fn rejects_short_and_malformed_rows() {
        for row in [
            "a,b,c".to_string(),
            station_row("not-a-number", "-70.25", "/data/raw/fdh042.csv"),
            station_row("43.65", "-70.25", "/data/raw/xyz.csv"), // stem too short
        ] {
            let record = csv::StringRecord::from(row.split(',').collect::<Vec<_>>());
            assert!(parse_station_row(&record).is_none(), "accepted {row:?}");
        }
    }

    #[tokio::test]
    async fn imports_good_rows_and_skips_bad_ones() {
        let rows = vec![
            station_row("43.65", "-70.25", "/raw/fdh042.csv"),
            "too,short".to_string(),
            station_row("60.39", "5.32", "/raw/fdh017.csv"),
        ];
        let (dir, report) = run_import(&[("stations.csv", rows)]).await;
        assert_eq!(report.files, 1);
        assert_eq!(report.rows_imported, 2);
        assert_eq!(report.rows_skipped, 1);

        let store = StationStore::open(&StoreConfig {
            path: dir.path().join("out.sqlite").to_str().unwrap().to_string(),
            in_memory: false,
        })
        .await
        .unwrap();
        let stations = store.load_stations().await.unwrap();
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].id, "017");
    }

    #[tokio::test]
    async fn non_csv_files_are_ignored() {
        let rows = vec![station_row("1.0", "2.0", "/raw/fdh001.csv")];
        let (_dir, report) = run_import(&[
            ("stations.csv", rows),
            ("readme.txt", vec!["not,a,station".to_string()]),
        ])
        .await;
        assert_eq!(report.files, 1);
        assert_eq!(report.rows_imported, 1);
    }

    #[tokio::test]
    async fn missing_source_dir_yields_empty_catalog() {
        let dir = TempDir::new().unwrap();
        let report = import_stations(&dir.path().join("out.sqlite"), &dir.path().join("nope"))
            .await
            .unwrap();
        assert_eq!(report, ImportReport::default());

        let store = StationStore::open(&StoreConfig {
            path: dir.path().join("out.sqlite").to_str().unwrap().to_string(),
            in_memory: false,
        })
        .await
        .unwrap();
        assert!(store.load_stations().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reimport_into_existing_store_fails_cleanly() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        fs::create_dir(&src).unwrap();
        let out = dir.path().join("out.sqlite");
        import_stations(&out, &src).await.unwrap();
        assert!(import_stations(&out, &src).await.is_err());
    }
}

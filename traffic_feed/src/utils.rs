//! Loading and saving recorded samples
//!
//! The CSV layout matches the JSON field names:
//! timestamp,locationId,averageSpeed,totalVehicles,congestionLevel
//! 2024-03-04T08:00:00Z,city-center,31.2,412,63.5

use crate::{FeedError, Result, Sample};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// Load samples from a CSV file, sorted by timestamp
///
/// # Arguments
/// * `file_path` - Path to the CSV file
///
/// # Returns
/// * `Result<Vec<Sample>>` - Loaded samples or error
pub fn load_samples_csv<P: AsRef<Path>>(file_path: P) -> Result<Vec<Sample>> {
    let file = File::open(file_path.as_ref())?;
    let samples = read_samples_csv(file)?;
    debug!(path = %file_path.as_ref().display(), count = samples.len(), "loaded samples");
    Ok(samples)
}

/// Read samples from any CSV reader, sorted by timestamp
pub fn read_samples_csv<R: Read>(reader: R) -> Result<Vec<Sample>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut data = reader
        .deserialize::<Sample>()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    if data.is_empty() {
        return Err(FeedError::NoData("No samples found in CSV input".to_string()));
    }

    // Stable, so equal timestamps keep file order
    data.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

    Ok(data)
}

/// Write samples as CSV with a header row
pub fn write_samples_csv<W: Write>(writer: W, samples: &[Sample]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for sample in samples {
        writer.serialize(sample)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    const CSV: &str = "\
timestamp,locationId,averageSpeed,totalVehicles,congestionLevel
2024-03-04T08:10:00Z,city-center,28.5,510,71.0
2024-03-04T08:00:00Z,city-center,31.0,430,62.5
2024-03-04T08:05:00Z,city-center,29.75,480,66.0
";

    #[test]
    fn test_read_sorts_by_timestamp() {
        let samples = read_samples_csv(Cursor::new(CSV)).unwrap();

        assert_eq!(samples.len(), 3);
        assert_eq!(
            samples[0].timestamp,
            Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap()
        );
        assert_eq!(samples[0].congestion_level, 62.5);
        assert_eq!(samples[2].total_vehicles, 510);
    }

    #[test]
    fn test_header_only_is_no_data() {
        let header = "timestamp,locationId,averageSpeed,totalVehicles,congestionLevel\n";
        assert!(matches!(
            read_samples_csv(Cursor::new(header)),
            Err(FeedError::NoData(_))
        ));
    }

    #[test]
    fn test_malformed_row() {
        let bad = "timestamp,locationId,averageSpeed,totalVehicles,congestionLevel\n\
                   not-a-time,city-center,28.5,510,71.0\n";
        assert!(matches!(
            read_samples_csv(Cursor::new(bad)),
            Err(FeedError::Csv(_))
        ));
    }

    #[test]
    fn test_write_then_load_file() {
        let samples = read_samples_csv(Cursor::new(CSV)).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("samples.csv");

        write_samples_csv(File::create(&path).unwrap(), &samples).unwrap();
        let loaded = load_samples_csv(&path).unwrap();

        assert_eq!(loaded, samples);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_samples_csv("/nonexistent/samples.csv"),
            Err(FeedError::Io(_))
        ));
    }
}

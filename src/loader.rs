use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use tracing::{info, warn};

use crate::models::{Dataset, Record};
use crate::synthetic;

pub const DEFAULT_DATA_FILE: &str = "sleep_health_cleaned_for_dashboard.csv";
const FALLBACK_DIR: &str = "data";

/// Returns `path` if it exists, otherwise the same file name under
/// `fallback_dir` if that exists. When neither is present, `path` is returned
/// unchanged.
pub fn resolve_data_path(path: &Path, fallback_dir: &Path) -> PathBuf {
    if path.exists() {
        return path.to_path_buf();
    }
    if let Some(name) = path.file_name() {
        let fallback = fallback_dir.join(name);
        if fallback.exists() {
            return fallback;
        }
    }
    path.to_path_buf()
}

pub fn load(path: &Path) -> anyhow::Result<Dataset> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut records = Vec::new();

    for (idx, result) in reader.deserialize::<Record>().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        let record = result.with_context(|| format!("{}: malformed row {line}", path.display()))?;
        validate(&record).with_context(|| format!("{}: invalid row {line}", path.display()))?;
        records.push(record);
    }

    Ok(Dataset::new(records))
}

fn validate(record: &Record) -> anyhow::Result<()> {
    if !record.sleep_duration.is_finite() || !(0.0..=24.0).contains(&record.sleep_duration) {
        bail!("sleep_duration {} out of range", record.sleep_duration);
    }
    if !(1..=10).contains(&record.quality_of_sleep) {
        bail!("quality_of_sleep {} out of range 1-10", record.quality_of_sleep);
    }
    if !(1..=10).contains(&record.stress_level) {
        bail!("stress_level {} out of range 1-10", record.stress_level);
    }
    if record.physical_activity_level > 100 {
        bail!(
            "physical_activity_level {} out of range 0-100",
            record.physical_activity_level
        );
    }
    Ok(())
}

/// Loads the dataset, or generates and persists a synthetic one when no file
/// can be found at `path` or under `data/`.
pub fn load_or_generate(path: &Path, seed: u64) -> anyhow::Result<Dataset> {
    load_with_fallback(path, Path::new(FALLBACK_DIR), seed)
}

fn load_with_fallback(path: &Path, fallback_dir: &Path, seed: u64) -> anyhow::Result<Dataset> {
    let resolved = resolve_data_path(path, fallback_dir);
    if resolved.exists() {
        let dataset = load(&resolved)?;
        if dataset.is_empty() {
            warn!(path = %resolved.display(), "dataset has no rows");
        }
        info!(path = %resolved.display(), rows = dataset.len(), "dataset loaded");
        return Ok(dataset);
    }

    warn!(
        path = %path.display(),
        "data file not found, generating synthetic sample data"
    );
    let records = synthetic::generate(seed, synthetic::SAMPLE_SIZE)?;
    if let Err(err) = persist(path, &records) {
        warn!(path = %path.display(), error = %format!("{err:#}"), "failed to persist synthetic data");
    } else {
        info!(path = %path.display(), rows = records.len(), "synthetic data written");
    }
    Ok(Dataset::new(records))
}

pub fn persist(path: &Path, records: &[Record]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AgeGroup;

    const HEADER: &str = "age,gender,occupation,sleep_duration,quality_of_sleep,stress_level,\
physical_activity_level,heart_rate,daily_steps,sleep_disorder,bmi_category\n";

    #[test]
    fn loads_rows_and_derives_age_groups() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sleep.csv");
        let body = format!(
            "{HEADER}27,Male,Nurse,6.1,6,6,42,77,4200,None,Overweight\n\
             52,Female,Doctor,7.8,8,3,75,68,8000,Sleep Apnea,Normal\n"
        );
        std::fs::write(&path, body).unwrap();

        let dataset = load(&path).unwrap();
        assert_eq!(dataset.len(), 2);
        let first = &dataset.records()[0];
        assert_eq!(first.occupation, "Nurse");
        assert_eq!(first.age_group, AgeGroup::Under30);
        assert_eq!(dataset.records()[1].age_group, AgeGroup::Fifties);
        assert!(dataset.records()[1].has_disorder());
    }

    #[test]
    fn empty_disorder_reads_as_none_and_extra_columns_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sleep.csv");
        let body = "person_id,age,gender,occupation,sleep_duration,quality_of_sleep,stress_level,\
physical_activity_level,heart_rate,daily_steps,sleep_disorder,bmi_category\n\
1,33,Female,Teacher,6.4,6,5,45,70,5000,,Normal\n";
        std::fs::write(&path, body).unwrap();

        let dataset = load(&path).unwrap();
        assert_eq!(dataset.records()[0].sleep_disorder, "None");
        assert!(!dataset.records()[0].has_disorder());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sleep.csv");
        std::fs::write(
            &path,
            format!("{HEADER}27,Male,Nurse,not-a-number,6,6,42,77,4200,None,Normal\n"),
        )
        .unwrap();
        let err = load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("row 2"));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sleep.csv");
        std::fs::write(
            &path,
            format!("{HEADER}27,Male,Nurse,6.5,11,6,42,77,4200,None,Normal\n"),
        )
        .unwrap();
        assert!(load(&path).is_err());
    }

    #[test]
    fn missing_column_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sleep.csv");
        std::fs::write(&path, "age,gender\n27,Male\n").unwrap();
        assert!(load(&path).is_err());
    }

    #[test]
    fn missing_file_generates_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("sleep.csv");

        let generated = load_or_generate(&path, synthetic::DEFAULT_SEED).unwrap();
        assert_eq!(generated.len(), synthetic::SAMPLE_SIZE);
        assert!(path.exists());

        let reloaded = load_or_generate(&path, synthetic::DEFAULT_SEED).unwrap();
        assert_eq!(reloaded.records(), generated.records());
    }

    #[test]
    fn missing_primary_falls_back_to_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let fallback_dir = dir.path().join("data");
        std::fs::create_dir(&fallback_dir).unwrap();
        let fallback = fallback_dir.join("sleep.csv");
        std::fs::write(
            &fallback,
            format!("{HEADER}41,Female,Lawyer,7.2,7,4,60,65,9000,None,Normal\n"),
        )
        .unwrap();
        let primary = dir.path().join("sleep.csv");

        assert_eq!(resolve_data_path(&primary, &fallback_dir), fallback);
        let dataset =
            load_with_fallback(&primary, &fallback_dir, synthetic::DEFAULT_SEED).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records()[0].age_group, AgeGroup::Forties);
        assert!(!primary.exists());
    }

    #[test]
    fn primary_path_wins_over_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let fallback_dir = dir.path().join("data");
        std::fs::create_dir(&fallback_dir).unwrap();
        std::fs::write(fallback_dir.join("sleep.csv"), HEADER).unwrap();
        let primary = dir.path().join("sleep.csv");
        std::fs::write(&primary, HEADER).unwrap();

        assert_eq!(resolve_data_path(&primary, &fallback_dir), primary);
    }

    #[test]
    fn unwritable_target_still_serves_synthetic_rows() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let path = blocker.join("sleep.csv");

        let dataset =
            load_with_fallback(&path, &dir.path().join("data"), synthetic::DEFAULT_SEED).unwrap();
        assert_eq!(dataset.len(), synthetic::SAMPLE_SIZE);
        assert!(!path.exists());
        assert!(persist(&path, dataset.records()).is_err());
    }
}

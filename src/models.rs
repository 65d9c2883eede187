use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One individual's sleep and health observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub age: u32,
    pub gender: String,
    pub occupation: String,
    pub sleep_duration: f64,
    pub quality_of_sleep: u8,
    pub stress_level: u8,
    pub physical_activity_level: u8,
    pub heart_rate: u32,
    pub daily_steps: u32,
    #[serde(deserialize_with = "disorder_or_none")]
    pub sleep_disorder: String,
    pub bmi_category: String,
    #[serde(skip_deserializing)]
    pub age_group: AgeGroup,
}

pub const NO_DISORDER: &str = "None";

fn disorder_or_none<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(match value.as_deref().map(str::trim) {
        None | Some("") => NO_DISORDER.to_string(),
        Some(v) => v.to_string(),
    })
}

impl Record {
    pub fn has_disorder(&self) -> bool {
        self.sleep_disorder != NO_DISORDER
    }
}

/// Fixed age buckets. Bins are half-open `[lower, upper)` except the last,
/// which also takes every age from 60 upwards.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeGroup {
    #[default]
    #[serde(rename = "Under 30")]
    Under30,
    #[serde(rename = "30-40")]
    Thirties,
    #[serde(rename = "40-50")]
    Forties,
    #[serde(rename = "50-60")]
    Fifties,
    #[serde(rename = "Over 60")]
    Over60,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 5] = [
        AgeGroup::Under30,
        AgeGroup::Thirties,
        AgeGroup::Forties,
        AgeGroup::Fifties,
        AgeGroup::Over60,
    ];

    pub fn from_age(age: u32) -> Self {
        match age {
            0..=29 => AgeGroup::Under30,
            30..=39 => AgeGroup::Thirties,
            40..=49 => AgeGroup::Forties,
            50..=59 => AgeGroup::Fifties,
            _ => AgeGroup::Over60,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::Under30 => "Under 30",
            AgeGroup::Thirties => "30-40",
            AgeGroup::Forties => "40-50",
            AgeGroup::Fifties => "50-60",
            AgeGroup::Over60 => "Over 60",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AgeGroup {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgeGroup::ALL
            .into_iter()
            .find(|group| group.label() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown age group '{s}'"))
    }
}

/// The loaded dataset. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Builds the dataset and stamps every record with its age group.
    pub fn new(mut records: Vec<Record>) -> Self {
        for record in &mut records {
            record.age_group = AgeGroup::from_age(record.age);
        }
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn all(&self) -> Vec<&Record> {
        self.records.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn sample_record(
    age: u32,
    gender: &str,
    sleep_duration: f64,
    quality: u8,
    stress: u8,
    activity: u8,
    disorder: &str,
) -> Record {
    Record {
        age,
        gender: gender.to_string(),
        occupation: "Nurse".to_string(),
        sleep_duration,
        quality_of_sleep: quality,
        stress_level: stress,
        physical_activity_level: activity,
        heart_rate: 70,
        daily_steps: 6000,
        sleep_disorder: disorder.to_string(),
        bmi_category: "Normal".to_string(),
        age_group: AgeGroup::default(),
    }
}

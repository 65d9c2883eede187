use serde::{Deserialize, Serialize};

use crate::models::{AgeGroup, Dataset, Record};

pub const ALL: &str = "All";

/// Equality constraints selected from the dashboard dropdowns. `None` means
/// the field is unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSpec {
    pub gender: Option<String>,
    pub age_group: Option<AgeGroup>,
    pub occupation: Option<String>,
    pub disorder: Option<String>,
}

/// Raw dropdown values as they arrive from a query string or the CLI.
#[derive(Debug, Clone, Default, Deserialize, clap::Args)]
pub struct FilterSelection {
    #[arg(long)]
    pub gender: Option<String>,
    #[arg(long)]
    pub age_group: Option<String>,
    #[arg(long)]
    pub occupation: Option<String>,
    #[arg(long)]
    pub disorder: Option<String>,
}

fn active(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty() && *v != ALL)
}

impl FilterSpec {
    pub fn from_selection(selection: &FilterSelection) -> anyhow::Result<Self> {
        let age_group = active(selection.age_group.as_deref())
            .map(str::parse::<AgeGroup>)
            .transpose()?;
        Ok(Self {
            gender: active(selection.gender.as_deref()).map(str::to_string),
            age_group,
            occupation: active(selection.occupation.as_deref()).map(str::to_string),
            disorder: active(selection.disorder.as_deref()).map(str::to_string),
        })
    }

    pub fn is_unconstrained(&self) -> bool {
        self.gender.is_none()
            && self.age_group.is_none()
            && self.occupation.is_none()
            && self.disorder.is_none()
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.gender.as_ref().is_none_or(|g| *g == record.gender)
            && self.age_group.is_none_or(|a| a == record.age_group)
            && self.occupation.as_ref().is_none_or(|o| *o == record.occupation)
            && self.disorder.as_ref().is_none_or(|d| *d == record.sleep_disorder)
    }

    /// Rows satisfying every active constraint, in dataset order.
    pub fn apply<'a>(&self, dataset: &'a Dataset) -> Vec<&'a Record> {
        dataset.records().iter().filter(|r| self.matches(r)).collect()
    }

    pub fn describe(&self) -> String {
        if self.is_unconstrained() {
            return "all records".to_string();
        }
        let mut parts = Vec::new();
        if let Some(g) = &self.gender {
            parts.push(format!("gender={g}"));
        }
        if let Some(a) = &self.age_group {
            parts.push(format!("age_group={a}"));
        }
        if let Some(o) = &self.occupation {
            parts.push(format!("occupation={o}"));
        }
        if let Some(d) = &self.disorder {
            parts.push(format!("disorder={d}"));
        }
        parts.join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub label: String,
    pub value: String,
}

/// Dropdown contents: the "All" entry followed by distinct values in order of
/// first appearance.
#[derive(Debug, Clone, Serialize)]
pub struct FilterOptions {
    pub gender: Vec<FilterOption>,
    pub age_group: Vec<FilterOption>,
    pub occupation: Vec<FilterOption>,
    pub disorder: Vec<FilterOption>,
}

impl FilterOptions {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let records = dataset.records();
        Self {
            gender: options("All Genders", records.iter().map(|r| r.gender.as_str())),
            age_group: options("All Ages", records.iter().map(|r| r.age_group.label())),
            occupation: options("All Occupations", records.iter().map(|r| r.occupation.as_str())),
            disorder: options(ALL, records.iter().map(|r| r.sleep_disorder.as_str())),
        }
    }
}

fn options<'a>(all_label: &str, values: impl Iterator<Item = &'a str>) -> Vec<FilterOption> {
    let mut out = vec![FilterOption {
        label: all_label.to_string(),
        value: ALL.to_string(),
    }];
    for value in values {
        if !out.iter().skip(1).any(|o| o.value == value) {
            out.push(FilterOption {
                label: value.to_string(),
                value: value.to_string(),
            });
        }
    }
    out
}

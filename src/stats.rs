use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::models::{Dataset, Record};

/// A row is high-stress when its stress level is above this value.
pub const HIGH_STRESS_ABOVE: u8 = 7;
/// A row is low-activity when its activity level is below this value.
pub const LOW_ACTIVITY_BELOW: u8 = 50;
pub const HISTOGRAM_BINS: usize = 20;
pub const RECOMMENDED_SLEEP_HOURS: (f64, f64) = (7.0, 9.0);
const BMI_ORDER: [&str; 4] = ["Underweight", "Normal", "Overweight", "Obese"];

/// Aggregates over a filtered subset. Every statistic is `None` when the
/// subset is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean_sleep_duration: Option<f64>,
    pub mean_sleep_quality: Option<f64>,
    pub mean_stress_level: Option<f64>,
    pub mean_physical_activity: Option<f64>,
    pub mean_heart_rate: Option<f64>,
    pub mean_daily_steps: Option<f64>,
    pub disorder_pct: Option<f64>,
    pub high_stress_pct: Option<f64>,
    pub low_activity_pct: Option<f64>,
}

fn mean<F>(rows: &[&Record], f: F) -> Option<f64>
where
    F: Fn(&Record) -> f64,
{
    if rows.is_empty() {
        return None;
    }
    let sum: f64 = rows.iter().map(|&r| f(r)).sum();
    Some(sum / rows.len() as f64)
}

fn percent<P>(rows: &[&Record], pred: P) -> Option<f64>
where
    P: Fn(&Record) -> bool,
{
    if rows.is_empty() {
        return None;
    }
    let hits = rows.iter().filter(|&&r| pred(r)).count();
    Some(hits as f64 / rows.len() as f64 * 100.0)
}

impl Summary {
    pub fn compute(rows: &[&Record]) -> Self {
        Self {
            count: rows.len(),
            mean_sleep_duration: mean(rows, |r| r.sleep_duration),
            mean_sleep_quality: mean(rows, |r| r.quality_of_sleep as f64),
            mean_stress_level: mean(rows, |r| r.stress_level as f64),
            mean_physical_activity: mean(rows, |r| r.physical_activity_level as f64),
            mean_heart_rate: mean(rows, |r| r.heart_rate as f64),
            mean_daily_steps: mean(rows, |r| r.daily_steps as f64),
            disorder_pct: percent(rows, Record::has_disorder),
            high_stress_pct: percent(rows, |r| r.stress_level > HIGH_STRESS_ABOVE),
            low_activity_pct: percent(rows, |r| r.physical_activity_level < LOW_ACTIVITY_BELOW),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    Age,
    Occupation,
}

impl GroupBy {
    fn key(self, record: &Record) -> String {
        match self {
            GroupBy::Age => record.age.to_string(),
            GroupBy::Occupation => record.occupation.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMeans {
    pub key: String,
    pub count: usize,
    pub mean_sleep_duration: f64,
    pub mean_sleep_quality: f64,
    pub mean_stress_level: f64,
}

impl GroupMeans {
    fn from_rows(key: String, rows: &[&Record]) -> Option<Self> {
        Some(Self {
            key,
            count: rows.len(),
            mean_sleep_duration: mean(rows, |r| r.sleep_duration)?,
            mean_sleep_quality: mean(rows, |r| r.quality_of_sleep as f64)?,
            mean_stress_level: mean(rows, |r| r.stress_level as f64)?,
        })
    }
}

/// Per-group means. Ages sort ascending; occupations sort by mean quality
/// descending, ties broken by name.
pub fn group_means(rows: &[&Record], by: GroupBy) -> Vec<GroupMeans> {
    let mut buckets: HashMap<String, (u32, Vec<&Record>)> = HashMap::new();
    for &record in rows {
        let entry = buckets
            .entry(by.key(record))
            .or_insert_with(|| (record.age, Vec::new()));
        entry.1.push(record);
    }

    let mut groups: Vec<(u32, GroupMeans)> = buckets
        .into_iter()
        .filter_map(|(key, (age, members))| Some((age, GroupMeans::from_rows(key, &members)?)))
        .collect();

    match by {
        GroupBy::Age => groups.sort_by_key(|(age, _)| *age),
        GroupBy::Occupation => groups.sort_by(|(_, a), (_, b)| {
            b.mean_sleep_quality
                .partial_cmp(&a.mean_sleep_quality)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.key.cmp(&b.key))
        }),
    }
    groups.into_iter().map(|(_, g)| g).collect()
}

/// Group comparison with an explicit branch on how many distinct groups
/// survive the filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GroupComparison {
    Empty,
    SingleVsOverall {
        selected: GroupMeans,
        overall: GroupMeans,
    },
    Groups {
        groups: Vec<GroupMeans>,
    },
}

pub const OVERALL_KEY: &str = "Overall Average";

pub fn compare_groups(rows: &[&Record], dataset: &Dataset, by: GroupBy) -> GroupComparison {
    let mut groups = group_means(rows, by);
    match groups.len() {
        0 => GroupComparison::Empty,
        1 => {
            let selected = groups.remove(0);
            let all = dataset.all();
            match GroupMeans::from_rows(OVERALL_KEY.to_string(), &all) {
                Some(overall) => GroupComparison::SingleVsOverall { selected, overall },
                None => GroupComparison::Groups { groups: vec![selected] },
            }
        }
        _ => GroupComparison::Groups { groups },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Equal-width bins over `[min, max]` of sleep duration. The last bin is
/// closed on the right.
pub fn sleep_histogram(rows: &[&Record], bins: usize) -> Vec<HistogramBin> {
    let values: Vec<f64> = rows.iter().map(|r| r.sleep_duration).collect();
    let (Some(min), Some(max)) = (
        values.iter().copied().reduce(f64::min),
        values.iter().copied().reduce(f64::max),
    ) else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }
    if (max - min).abs() < f64::EPSILON {
        return vec![HistogramBin {
            start: min,
            end: max,
            count: values.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: min + width * i as f64,
            end: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();
    for v in values {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub category: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

impl BoxStats {
    fn from_values(category: String, mut values: Vec<f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        Some(Self {
            category,
            count: values.len(),
            min: values[0],
            q1: quantile(&values, 0.25),
            median: quantile(&values, 0.5),
            q3: quantile(&values, 0.75),
            max: values[values.len() - 1],
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Gender,
    BmiCategory,
    SleepDisorder,
}

impl Category {
    fn value(self, record: &Record) -> &str {
        match self {
            Category::Gender => &record.gender,
            Category::BmiCategory => &record.bmi_category,
            Category::SleepDisorder => &record.sleep_disorder,
        }
    }

    fn rank(self, value: &str) -> usize {
        match self {
            Category::BmiCategory => BMI_ORDER
                .iter()
                .position(|b| *b == value)
                .unwrap_or(BMI_ORDER.len()),
            _ => 0,
        }
    }
}

/// Sleep-duration five-number summaries per category value. BMI categories
/// follow their natural order; everything else sorts by name.
pub fn sleep_box_stats(rows: &[&Record], category: Category) -> Vec<BoxStats> {
    let mut buckets: HashMap<&str, Vec<f64>> = HashMap::new();
    for &record in rows {
        buckets
            .entry(category.value(record))
            .or_default()
            .push(record.sleep_duration);
    }
    let mut stats: Vec<BoxStats> = buckets
        .into_iter()
        .filter_map(|(name, values)| BoxStats::from_values(name.to_string(), values))
        .collect();
    stats.sort_by(|a, b| {
        category
            .rank(&a.category)
            .cmp(&category.rank(&b.category))
            .then_with(|| a.category.cmp(&b.category))
    });
    stats
}

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::filter::FilterSpec;
use crate::insights::{self, Insight, Tips};
use crate::models::Dataset;
use crate::stats::{self, BoxStats, Category, GroupBy, GroupComparison, GroupMeans, HistogramBin, Summary};

/// Presentation theme. Passed explicitly into each view.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn chart_template(self) -> &'static str {
        match self {
            Theme::Light => "plotly_white",
            Theme::Dark => "plotly_dark",
        }
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => anyhow::bail!("unknown theme '{other}'"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
    pub recommended_min: f64,
    pub recommended_max: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoxPlots {
    pub by_bmi_category: Vec<BoxStats>,
    pub by_gender: Vec<BoxStats>,
    pub by_sleep_disorder: Vec<BoxStats>,
}

/// Everything the presentation layer needs for one filter selection.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub filters: String,
    pub theme: Theme,
    pub chart_template: &'static str,
    pub generated_at: DateTime<Utc>,
    pub summary: Summary,
    pub insights: Vec<Insight>,
    pub age_trend: Vec<GroupMeans>,
    pub occupations: GroupComparison,
    pub sleep_duration_histogram: Histogram,
    pub sleep_duration_boxes: BoxPlots,
    pub tips: Tips,
}

impl DashboardView {
    pub fn build(dataset: &Dataset, filter: &FilterSpec, theme: Theme) -> Self {
        let rows = filter.apply(dataset);
        let summary = Summary::compute(&rows);
        let insights = insights::classify(&summary);
        let (recommended_min, recommended_max) = stats::RECOMMENDED_SLEEP_HOURS;

        Self {
            filters: filter.describe(),
            theme,
            chart_template: theme.chart_template(),
            generated_at: Utc::now(),
            summary,
            insights,
            age_trend: stats::group_means(&rows, GroupBy::Age),
            occupations: stats::compare_groups(&rows, dataset, GroupBy::Occupation),
            sleep_duration_histogram: Histogram {
                bins: stats::sleep_histogram(&rows, stats::HISTOGRAM_BINS),
                recommended_min,
                recommended_max,
            },
            sleep_duration_boxes: BoxPlots {
                by_bmi_category: stats::sleep_box_stats(&rows, Category::BmiCategory),
                by_gender: stats::sleep_box_stats(&rows, Category::Gender),
                by_sleep_disorder: stats::sleep_box_stats(&rows, Category::SleepDisorder),
            },
            tips: insights::tips(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::Tier;
    use crate::models::{sample_record, AgeGroup};

    #[test]
    fn themes_parse_and_map_to_templates() {
        assert_eq!("dark".parse::<Theme>().unwrap().chart_template(), "plotly_dark");
        assert_eq!(Theme::default().chart_template(), "plotly_white");
        assert!("neon".parse::<Theme>().is_err());
    }

    #[test]
    fn view_for_empty_selection_degrades_to_no_data() {
        let dataset = Dataset::new(vec![sample_record(25, "Male", 5.0, 3, 9, 20, "Insomnia")]);
        let filter = FilterSpec {
            age_group: Some(AgeGroup::Over60),
            ..FilterSpec::default()
        };
        let view = DashboardView::build(&dataset, &filter, Theme::Dark);
        assert_eq!(view.summary.count, 0);
        assert_eq!(view.insights.len(), 1);
        assert_eq!(view.insights[0].tier, Tier::NoData);
        assert!(view.age_trend.is_empty());
        assert_eq!(view.occupations, GroupComparison::Empty);
        assert!(view.sleep_duration_histogram.bins.is_empty());
        assert_eq!(view.filters, "age_group=Over 60");

        let json = serde_json::to_value(&view).unwrap();
        assert!(json["summary"]["mean_sleep_duration"].is_null());
        assert_eq!(json["occupations"]["kind"], "empty");
    }

    #[test]
    fn view_for_single_occupation_compares_with_overall() {
        let mut doctor = sample_record(40, "Female", 8.0, 8, 2, 80, "None");
        doctor.occupation = "Doctor".to_string();
        let dataset = Dataset::new(vec![
            sample_record(25, "Male", 5.0, 3, 9, 20, "Insomnia"),
            doctor,
        ]);
        let filter = FilterSpec {
            occupation: Some("Nurse".to_string()),
            ..FilterSpec::default()
        };
        let view = DashboardView::build(&dataset, &filter, Theme::Light);
        assert!(matches!(
            view.occupations,
            GroupComparison::SingleVsOverall { .. }
        ));
        assert_eq!(view.age_trend.len(), 1);
        assert_eq!(view.sleep_duration_boxes.by_gender.len(), 1);
    }
}

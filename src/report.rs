use std::fmt::Write;

use crate::dashboard::DashboardView;
use crate::stats::GroupComparison;

fn fmt_opt(value: Option<f64>, suffix: &str) -> String {
    match value {
        Some(v) => format!("{v:.1}{suffix}"),
        None => "no data".to_string(),
    }
}

pub fn build_report(view: &DashboardView) -> String {
    let summary = &view.summary;
    let mut output = String::new();

    let _ = writeln!(output, "# Sleep Health Report");
    let _ = writeln!(
        output,
        "Generated for {} ({} records) at {}",
        view.filters,
        summary.count,
        view.generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");
    let _ = writeln!(
        output,
        "- Average sleep: {}",
        fmt_opt(summary.mean_sleep_duration, " hours")
    );
    let _ = writeln!(
        output,
        "- Sleep quality: {}",
        fmt_opt(summary.mean_sleep_quality, "/10")
    );
    let _ = writeln!(
        output,
        "- Stress level: {}",
        fmt_opt(summary.mean_stress_level, "/10")
    );
    let _ = writeln!(
        output,
        "- Activity level: {}",
        fmt_opt(summary.mean_physical_activity, "")
    );
    let _ = writeln!(
        output,
        "- With a sleep disorder: {}",
        fmt_opt(summary.disorder_pct, "%")
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Insights");
    for insight in &view.insights {
        let _ = writeln!(output, "### {}", insight.title);
        let _ = writeln!(output, "{}", insight.message);
        let _ = writeln!(output);
        let _ = writeln!(output, "Recommendation: {}", insight.recommendation);
        let _ = writeln!(output);
    }

    let _ = writeln!(output, "## Sleep Quality & Stress by Occupation");
    match &view.occupations {
        GroupComparison::Empty => {
            let _ = writeln!(output, "No records match the current filters.");
        }
        GroupComparison::SingleVsOverall { selected, overall } => {
            let _ = writeln!(output, "Comparing {} with average:", selected.key);
            for group in [selected, overall] {
                let _ = writeln!(
                    output,
                    "- {}: quality {:.1}, stress {:.1}",
                    group.key, group.mean_sleep_quality, group.mean_stress_level
                );
            }
        }
        GroupComparison::Groups { groups } => {
            for group in groups {
                let _ = writeln!(
                    output,
                    "- {} ({} records): quality {:.1}, stress {:.1}, sleep {:.1} hours",
                    group.key,
                    group.count,
                    group.mean_sleep_quality,
                    group.mean_stress_level,
                    group.mean_sleep_duration
                );
            }
        }
    }

    output
}

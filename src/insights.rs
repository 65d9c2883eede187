use serde::Serialize;

use crate::stats::Summary;

pub const HIGH_STRESS_SHARE_LIMIT: f64 = 50.0;
pub const LOW_ACTIVITY_SHARE_LIMIT: f64 = 60.0;
pub const DISORDER_SHARE_LIMIT: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Alert,
    Concern,
    Healthy,
    Poor,
    Moderate,
    Good,
    HighStress,
    LowActivity,
    DisorderPrevalence,
    NoData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Caution,
    Positive,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub tier: Tier,
    pub severity: Severity,
    pub title: &'static str,
    pub message: String,
    pub recommendation: &'static str,
}

pub fn sleep_duration_tier(mean_hours: f64) -> Tier {
    if mean_hours < 6.0 {
        Tier::Alert
    } else if mean_hours < 7.0 {
        Tier::Concern
    } else {
        Tier::Healthy
    }
}

pub fn sleep_quality_tier(mean_quality: f64) -> Tier {
    if mean_quality < 5.0 {
        Tier::Poor
    } else if mean_quality < 7.0 {
        Tier::Moderate
    } else {
        Tier::Good
    }
}

fn duration_insight(hours: f64) -> Insight {
    match sleep_duration_tier(hours) {
        Tier::Alert => Insight {
            tier: Tier::Alert,
            severity: Severity::Warning,
            title: "Sleep Duration Alert",
            message: format!(
                "The average sleep duration is {hours:.1} hours, which is significantly below \
                 the recommended 7-9 hours. This can lead to increased stress, reduced cognitive \
                 function, and various health issues."
            ),
            recommendation: "Prioritize sleep by setting a consistent bedtime routine and \
                             creating a sleep-friendly environment.",
        },
        Tier::Concern => Insight {
            tier: Tier::Concern,
            severity: Severity::Caution,
            title: "Sleep Duration Concern",
            message: format!(
                "The average sleep duration is {hours:.1} hours, slightly below the recommended \
                 range of 7-9 hours."
            ),
            recommendation: "Try to add an extra 30-60 minutes to your sleep schedule, \
                             especially if you're feeling tired during the day.",
        },
        _ => Insight {
            tier: Tier::Healthy,
            severity: Severity::Positive,
            title: "Healthy Sleep Duration",
            message: format!(
                "The average sleep duration is {hours:.1} hours, which falls within the \
                 recommended 7-9 hour range."
            ),
            recommendation: "Maintain your current sleep schedule and focus on sleep quality \
                             improvements if needed.",
        },
    }
}

fn quality_insight(quality: f64) -> Insight {
    match sleep_quality_tier(quality) {
        Tier::Poor => Insight {
            tier: Tier::Poor,
            severity: Severity::Warning,
            title: "Poor Sleep Quality",
            message: format!(
                "The average sleep quality rating is {quality:.1}/10, indicating significant \
                 sleep quality issues."
            ),
            recommendation: "Evaluate your sleep environment, reduce screen time before bed, \
                             and consider consulting a healthcare provider.",
        },
        Tier::Moderate => Insight {
            tier: Tier::Moderate,
            severity: Severity::Caution,
            title: "Moderate Sleep Quality",
            message: format!(
                "The average sleep quality rating is {quality:.1}/10, indicating room for \
                 improvement."
            ),
            recommendation: "Try techniques like meditation before bed, temperature \
                             regulation, and noise reduction.",
        },
        _ => Insight {
            tier: Tier::Good,
            severity: Severity::Positive,
            title: "Good Sleep Quality",
            message: format!(
                "The average sleep quality rating is {quality:.1}/10, indicating generally \
                 good sleep quality."
            ),
            recommendation: "Continue your healthy bedtime habits and share them with others \
                             who may be struggling.",
        },
    }
}

pub fn no_data() -> Insight {
    Insight {
        tier: Tier::NoData,
        severity: Severity::Info,
        title: "No Data",
        message: "No records match the current filters.".to_string(),
        recommendation: "Broaden the filter selection to see insights.",
    }
}

/// Ordered insights for a summary: duration tier, quality tier, then the
/// stress, activity and disorder warnings whose limits are exceeded.
pub fn classify(summary: &Summary) -> Vec<Insight> {
    let (Some(hours), Some(quality)) = (summary.mean_sleep_duration, summary.mean_sleep_quality)
    else {
        return vec![no_data()];
    };

    let mut insights = vec![duration_insight(hours), quality_insight(quality)];

    if let Some(pct) = summary.high_stress_pct.filter(|p| *p > HIGH_STRESS_SHARE_LIMIT) {
        insights.push(Insight {
            tier: Tier::HighStress,
            severity: Severity::Warning,
            title: "High Stress Levels",
            message: format!(
                "{pct:.1}% of individuals in this group report high stress levels (>7/10)."
            ),
            recommendation: "Incorporate stress management techniques like deep breathing, \
                             mindfulness, and regular exercise.",
        });
    }

    if let Some(pct) = summary.low_activity_pct.filter(|p| *p > LOW_ACTIVITY_SHARE_LIMIT) {
        insights.push(Insight {
            tier: Tier::LowActivity,
            severity: Severity::Caution,
            title: "Low Physical Activity",
            message: format!(
                "{pct:.1}% of individuals in this group have lower than recommended physical \
                 activity levels."
            ),
            recommendation: "Aim for at least 30 minutes of moderate exercise daily, which has \
                             been shown to improve sleep quality.",
        });
    }

    if let Some(pct) = summary.disorder_pct.filter(|p| *p > DISORDER_SHARE_LIMIT) {
        insights.push(Insight {
            tier: Tier::DisorderPrevalence,
            severity: Severity::Warning,
            title: "Sleep Disorders Present",
            message: format!(
                "{pct:.1}% of individuals in this group have a diagnosed sleep disorder."
            ),
            recommendation: "If you experience persistent sleep problems, consider consulting \
                             a sleep specialist for proper diagnosis and treatment.",
        });
    }

    insights
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tip {
    pub title: &'static str,
    pub text: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Tips {
    pub stress: Vec<Tip>,
    pub activity: Vec<Tip>,
    pub sleep_hygiene: Vec<Tip>,
}

/// Fixed advice shown beside the factor charts.
pub fn tips() -> Tips {
    Tips {
        stress: vec![
            Tip {
                title: "Deep Breathing",
                text: "Take 5 deep breaths before bed to activate your parasympathetic nervous system.",
            },
            Tip {
                title: "Digital Detox",
                text: "Avoid screens 1 hour before bedtime to reduce stress and improve sleep quality.",
            },
            Tip {
                title: "Meditation",
                text: "Regular meditation practice can lower baseline stress levels and improve sleep.",
            },
        ],
        activity: vec![
            Tip {
                title: "Timing Matters",
                text: "Exercise earlier in the day for better sleep. Avoid vigorous activity 2-3 hours before bed.",
            },
            Tip {
                title: "Step Goal",
                text: "Aim for 7,000-10,000 steps daily for improved sleep quality and overall health.",
            },
            Tip {
                title: "Consistency",
                text: "Regular moderate exercise is better for sleep than occasional intense workouts.",
            },
        ],
        sleep_hygiene: vec![
            Tip {
                title: "Consistent Schedule",
                text: "Go to bed and wake up at the same time every day, even on weekends.",
            },
            Tip {
                title: "Sleep Environment",
                text: "Keep your bedroom dark, quiet, and cool (around 65°F or 18°C).",
            },
            Tip {
                title: "Limit Screen Time",
                text: "Avoid screens for at least one hour before bedtime.",
            },
            Tip {
                title: "Watch Diet & Exercise",
                text: "Avoid large meals, caffeine, and alcohol before bed. Exercise regularly but not too close to bedtime.",
            },
        ],
    }
}

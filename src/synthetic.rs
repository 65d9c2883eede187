use anyhow::Context;
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_distr::Normal;
use rand_pcg::Pcg32;

use crate::models::{AgeGroup, Record};

pub const DEFAULT_SEED: u64 = 42;
pub const SAMPLE_SIZE: usize = 200;

const GENDERS: [&str; 2] = ["Male", "Female"];
const OCCUPATIONS: [&str; 7] = [
    "Software Engineer",
    "Doctor",
    "Nurse",
    "Teacher",
    "Accountant",
    "Lawyer",
    "Sales Representative",
];
const DISORDERS: [(&str, f64); 3] = [("None", 0.7), ("Insomnia", 0.2), ("Sleep Apnea", 0.1)];
const BMI_CATEGORIES: [(&str, f64); 4] = [
    ("Underweight", 0.2),
    ("Normal", 0.5),
    ("Overweight", 0.2),
    ("Obese", 0.1),
];

/// Generates a plausible dataset with the loader's schema. The same seed
/// always yields the same rows.
pub fn generate(seed: u64, size: usize) -> anyhow::Result<Vec<Record>> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let sleep = Normal::<f64>::new(7.0, 1.5).context("invalid sleep duration distribution")?;
    let heart = Normal::<f64>::new(70.0, 8.0).context("invalid heart rate distribution")?;
    let disorders = WeightedIndex::new(DISORDERS.iter().map(|(_, w)| *w))
        .context("invalid sleep disorder weights")?;
    let bmi = WeightedIndex::new(BMI_CATEGORIES.iter().map(|(_, w)| *w))
        .context("invalid BMI weights")?;

    let mut records = Vec::with_capacity(size);
    for _ in 0..size {
        let age = rng.random_range(18..70);
        let gender = GENDERS.choose(&mut rng).copied().unwrap_or("Male");
        let occupation = OCCUPATIONS.choose(&mut rng).copied().unwrap_or("Nurse");
        let sleep_duration: f64 = sleep.sample(&mut rng).clamp(4.0, 10.0);
        let heart_rate: f64 = heart.sample(&mut rng).clamp(50.0, 95.0);

        records.push(Record {
            age,
            gender: gender.to_string(),
            occupation: occupation.to_string(),
            sleep_duration,
            quality_of_sleep: rng.random_range(1..=10),
            stress_level: rng.random_range(1..=10),
            physical_activity_level: rng.random_range(10..100),
            heart_rate: heart_rate as u32,
            daily_steps: rng.random_range(2000..15000),
            sleep_disorder: DISORDERS[disorders.sample(&mut rng)].0.to_string(),
            bmi_category: BMI_CATEGORIES[bmi.sample(&mut rng)].0.to_string(),
            age_group: AgeGroup::from_age(age),
        });
    }

    Ok(records)
}

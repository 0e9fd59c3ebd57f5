//! Day bucketing and summary statistics
//!
//! Samples are grouped by their location-local calendar date and each group is
//! reduced to a [`DailySummary`]. Grouping goes through a hash map, so the
//! output is explicitly sorted by date afterwards.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::{round_half_up, round_tenth, to_percent};
use crate::data::{Condition, DailySummary, ForecastSample};

/// Groups samples by local date and summarizes each day, ascending by date
pub fn summarize_days(samples: &[ForecastSample]) -> Vec<DailySummary> {
    let mut by_date: HashMap<NaiveDate, Vec<ForecastSample>> = HashMap::new();
    for sample in samples {
        by_date
            .entry(sample.time.date())
            .or_default()
            .push(sample.clone());
    }

    let mut days: Vec<DailySummary> = by_date
        .into_iter()
        .filter_map(|(date, day)| summarize_day(date, day))
        .collect();

    days.sort_by_key(|d| d.date);
    days
}

fn summarize_day(date: NaiveDate, samples: Vec<ForecastSample>) -> Option<DailySummary> {
    let condition = most_common_condition(&samples)?;
    let count = samples.len() as f64;

    let temperature_min = samples.iter().map(|s| s.temperature).min()?;
    let temperature_max = samples.iter().map(|s| s.temperature).max()?;
    let humidity = samples.iter().map(|s| f64::from(s.humidity)).sum::<f64>() / count;
    let pressure = samples.iter().map(|s| f64::from(s.pressure)).sum::<f64>() / count;
    let wind_speed = samples.iter().map(|s| s.wind_speed).sum::<f64>() / count;
    let precipitation_probability = samples
        .iter()
        .map(|s| s.precipitation_probability)
        .max()?;

    Some(DailySummary {
        date,
        temperature_min,
        temperature_max,
        humidity: to_percent(humidity),
        pressure: round_half_up(pressure) as i32,
        wind_speed: round_tenth(wind_speed),
        precipitation_probability,
        condition,
        samples,
    })
}

/// The condition whose category occurs most often
///
/// Ties go to the category seen first. The returned condition is the first
/// sample's condition of the winning category.
fn most_common_condition(samples: &[ForecastSample]) -> Option<Condition> {
    // (category, count, first sample index), in order of first appearance
    let mut counts: Vec<(&str, usize, usize)> = Vec::new();
    for (index, sample) in samples.iter().enumerate() {
        let category = sample.condition.category.as_str();
        match counts.iter_mut().find(|(c, _, _)| *c == category) {
            Some(entry) => entry.1 += 1,
            None => counts.push((category, 1, index)),
        }
    }

    let mut best: Option<(usize, usize)> = None;
    for &(_, count, index) in &counts {
        if best.map_or(true, |(best_count, _)| count > best_count) {
            best = Some((count, index));
        }
    }

    best.map(|(_, index)| samples[index].condition.clone())
}

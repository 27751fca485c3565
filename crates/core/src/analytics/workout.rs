//! Per-workout chart data: timelines, rep-range histograms and muscle counts.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::exercise::Muscle;
use crate::workout::{RepRange, SetDetail};

/// Number of sets in each rep range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RepRangeCounts {
    pub strength: u32,
    pub hypertrophy: u32,
    pub endurance: u32,
}

impl RepRangeCounts {
    pub fn record(&mut self, range: RepRange) {
        match range {
            RepRange::Strength => self.strength += 1,
            RepRange::Hypertrophy => self.hypertrophy += 1,
            RepRange::Endurance => self.endurance += 1,
        }
    }

    #[must_use]
    pub const fn total(&self) -> u32 {
        self.strength + self.hypertrophy + self.endurance
    }
}

/// Column-oriented rep-range counts keyed by exercise name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExerciseRepRanges {
    pub exercises: Vec<String>,
    pub strength: Vec<u32>,
    pub hypertrophy: Vec<u32>,
    pub endurance: Vec<u32>,
}

/// Column-oriented rep-range counts keyed by primary muscle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MuscleRepRanges {
    pub muscles: Vec<Muscle>,
    pub strength: Vec<u32>,
    pub hypertrophy: Vec<u32>,
    pub endurance: Vec<u32>,
}

/// Everything the single-workout page charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutCharts {
    pub sets: Vec<(String, u32)>,
    #[serde(rename = "rep-ranges")]
    pub rep_ranges: RepRangeCounts,
    #[serde(rename = "rep-ranges-per-exercise")]
    pub rep_ranges_per_exercise: ExerciseRepRanges,
    #[serde(rename = "rep-ranges-per-muscle")]
    pub rep_ranges_per_muscle: MuscleRepRanges,
    #[serde(rename = "muscle-groups")]
    pub muscle_groups: BTreeMap<Muscle, u32>,
}

impl WorkoutCharts {
    #[must_use]
    pub fn from_sets(sets: &[SetDetail]) -> Self {
        Self {
            sets: timeline(sets),
            rep_ranges: rep_ranges(sets),
            rep_ranges_per_exercise: rep_ranges_per_exercise(sets),
            rep_ranges_per_muscle: rep_ranges_per_muscle(sets),
            muscle_groups: muscles_targeted(sets),
        }
    }
}

/// `(exercise, reps)` in the order the sets were performed.
#[must_use]
pub fn timeline(sets: &[SetDetail]) -> Vec<(String, u32)> {
    sets.iter().map(|s| (s.exercise.clone(), s.reps)).collect()
}

#[must_use]
pub fn rep_ranges(sets: &[SetDetail]) -> RepRangeCounts {
    let mut counts = RepRangeCounts::default();
    for set in sets {
        counts.record(set.rep_range());
    }
    counts
}

fn grouped_rep_ranges<K: Ord>(
    sets: &[SetDetail],
    key: impl Fn(&SetDetail) -> K,
) -> BTreeMap<K, RepRangeCounts> {
    let mut groups: BTreeMap<K, RepRangeCounts> = BTreeMap::new();
    for set in sets {
        groups.entry(key(set)).or_default().record(set.rep_range());
    }
    groups
}

#[must_use]
pub fn rep_ranges_per_exercise(sets: &[SetDetail]) -> ExerciseRepRanges {
    let mut out = ExerciseRepRanges::default();
    for (name, counts) in grouped_rep_ranges(sets, |s| s.exercise.clone()) {
        out.exercises.push(name);
        out.strength.push(counts.strength);
        out.hypertrophy.push(counts.hypertrophy);
        out.endurance.push(counts.endurance);
    }
    out
}

#[must_use]
pub fn rep_ranges_per_muscle(sets: &[SetDetail]) -> MuscleRepRanges {
    let mut out = MuscleRepRanges::default();
    for (muscle, counts) in grouped_rep_ranges(sets, |s| s.primary) {
        out.muscles.push(muscle);
        out.strength.push(counts.strength);
        out.hypertrophy.push(counts.hypertrophy);
        out.endurance.push(counts.endurance);
    }
    out
}

/// Sets per primary muscle.
#[must_use]
pub fn muscles_targeted(sets: &[SetDetail]) -> BTreeMap<Muscle, u32> {
    let mut counts = BTreeMap::new();
    for set in sets {
        *counts.entry(set.primary).or_insert(0) += 1;
    }
    counts
}

/// Workouts per calendar month (index 0 is January) among `dates` that fall
/// within `history_days` before `today`, inclusive.
#[must_use]
pub fn workouts_per_month(dates: &[NaiveDate], today: NaiveDate, history_days: i64) -> [u32; 12] {
    let start = today - Duration::days(history_days);
    let mut months = [0_u32; 12];
    for date in dates.iter().filter(|d| **d >= start && **d <= today) {
        if let Some(slot) = months.get_mut(date.month0() as usize) {
            *slot += 1;
        }
    }
    months
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test code")]
mod tests {
    use super::*;

    fn set(exercise: &str, primary: Muscle, reps: u32) -> SetDetail {
        SetDetail {
            set_id: 0,
            workout_id: 1,
            user_id: 1,
            username: "danny".to_owned(),
            date: NaiveDate::from_ymd_opt(2014, 7, 1).unwrap(),
            exercise: exercise.to_owned(),
            clean_name: exercise.to_lowercase(),
            primary,
            weight: 100.0,
            reps,
        }
    }

    fn sample() -> Vec<SetDetail> {
        vec![
            set("Squat", Muscle::Quads, 5),
            set("Squat", Muscle::Quads, 12),
            set("Bench", Muscle::Chest, 8),
            set("Squat", Muscle::Quads, 13),
        ]
    }

    #[test]
    fn twelve_reps_counted_once() {
        let counts = rep_ranges(&sample());
        assert_eq!(counts, RepRangeCounts { strength: 1, hypertrophy: 2, endurance: 1 });
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn per_exercise_columns_align() {
        let out = rep_ranges_per_exercise(&sample());
        assert_eq!(out.exercises, ["Bench", "Squat"]);
        assert_eq!(out.strength, [0, 1]);
        assert_eq!(out.hypertrophy, [1, 1]);
        assert_eq!(out.endurance, [0, 1]);
    }

    #[test]
    fn chart_json_uses_hyphenated_keys() {
        let charts = WorkoutCharts::from_sets(&sample());
        let json = serde_json::to_value(&charts).unwrap();
        assert_eq!(json["muscle-groups"]["Quads"], 3);
        assert_eq!(json["rep-ranges"]["hypertrophy"], 2);
        assert_eq!(json["rep-ranges-per-muscle"]["muscles"][0], "Quads");
        assert_eq!(json["sets"][0][0], "Squat");
    }

    #[test]
    fn workouts_bucketed_by_month_within_window() {
        let today = NaiveDate::from_ymd_opt(2014, 7, 15).unwrap();
        let dates = [
            NaiveDate::from_ymd_opt(2014, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2014, 7, 3).unwrap(),
            NaiveDate::from_ymd_opt(2014, 1, 20).unwrap(),
            NaiveDate::from_ymd_opt(2013, 6, 1).unwrap(),
        ];
        let months = workouts_per_month(&dates, today, 365);
        assert_eq!(months[6], 2);
        assert_eq!(months[0], 1);
        assert_eq!(months[5], 0);
    }
}

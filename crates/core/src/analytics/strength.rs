//! Records, progression and powerlifting totals computed over set rows.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::constants::RECORD_REP_RANGE;
use crate::exercise::BIG_THREE;
use crate::workout::SetDetail;

/// `(weight, username)`; `(0, None)` when nobody has lifted at that rep count.
pub type RecordEntry = (f64, Option<String>);

/// Personal and site-wide records for one exercise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseRecords {
    pub personal_records: BTreeMap<u32, RecordEntry>,
    pub site_records: BTreeMap<u32, RecordEntry>,
}

/// Heaviest set per rep count. The first set wins a tie.
#[must_use]
pub fn records(sets: &[SetDetail]) -> BTreeMap<u32, &SetDetail> {
    let mut best: BTreeMap<u32, &SetDetail> = BTreeMap::new();
    for set in sets {
        best.entry(set.reps)
            .and_modify(|current| {
                if set.weight > current.weight {
                    *current = set;
                }
            })
            .or_insert(set);
    }
    best
}

/// Records table for 1 to 10 reps.
#[must_use]
pub fn format_records(sets: &[SetDetail]) -> BTreeMap<u32, RecordEntry> {
    let best = records(sets);
    RECORD_REP_RANGE
        .map(|reps| {
            let entry = best
                .get(&reps)
                .map_or((0.0, None), |s| (s.weight, Some(s.username.clone())));
            (reps, entry)
        })
        .collect()
}

/// Build both records tables. `user_sets` must already be restricted to the
/// viewing user.
#[must_use]
pub fn exercise_records(user_sets: &[SetDetail], all_sets: &[SetDetail]) -> ExerciseRecords {
    ExerciseRecords {
        personal_records: format_records(user_sets),
        site_records: format_records(all_sets),
    }
}

/// Heaviest weight per workout date.
#[must_use]
pub fn max_weight_per_date(sets: &[SetDetail]) -> BTreeMap<NaiveDate, f64> {
    let mut history: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for set in sets {
        history
            .entry(set.date)
            .and_modify(|w| *w = w.max(set.weight))
            .or_insert(set.weight);
    }
    history
}

/// Heaviest weight per date among sets performed for exactly `reps`.
#[must_use]
pub fn progression(sets: &[SetDetail], reps: u32) -> BTreeMap<NaiveDate, f64> {
    let matching: Vec<SetDetail> = sets.iter().filter(|s| s.reps == reps).cloned().collect();
    max_weight_per_date(&matching)
}

/// Date to heaviest weight for each of squat, deadlift and bench.
#[must_use]
pub fn big_three_progress(
    sets: &[SetDetail],
) -> BTreeMap<&'static str, BTreeMap<NaiveDate, f64>> {
    BIG_THREE
        .iter()
        .map(|lift| {
            let lift_sets: Vec<SetDetail> =
                sets.iter().filter(|s| s.clean_name == *lift).cloned().collect();
            (*lift, max_weight_per_date(&lift_sets))
        })
        .collect()
}

/// Best squat, deadlift and bench for one lifter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrengthTotal {
    pub user_id: i64,
    pub username: String,
    pub total: f64,
    pub squat: f64,
    pub deadlift: f64,
    pub bench: f64,
}

/// Group big-three sets by user, take the heaviest lift per exercise and
/// rank by the sum, heaviest first. Ties are ordered by username.
#[must_use]
pub fn biggest_totals(sets: &[SetDetail]) -> Vec<StrengthTotal> {
    let mut per_user: BTreeMap<i64, StrengthTotal> = BTreeMap::new();
    for set in sets {
        let entry = per_user.entry(set.user_id).or_insert_with(|| StrengthTotal {
            user_id: set.user_id,
            username: set.username.clone(),
            total: 0.0,
            squat: 0.0,
            deadlift: 0.0,
            bench: 0.0,
        });
        let slot = match set.clean_name.as_str() {
            "squat" => &mut entry.squat,
            "deadlift" => &mut entry.deadlift,
            "bench" => &mut entry.bench,
            _ => continue,
        };
        *slot = slot.max(set.weight);
    }

    let mut totals: Vec<StrengthTotal> = per_user
        .into_values()
        .filter(|t| t.squat > 0.0 || t.deadlift > 0.0 || t.bench > 0.0)
        .map(|mut t| {
            t.total = t.squat + t.deadlift + t.bench;
            t
        })
        .collect();
    totals.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.username.cmp(&b.username))
    });
    totals
}

//! Pure aggregations behind the chart endpoints and leaderboards.
//!
//! Everything here works on rows already loaded by storage, so it can be
//! unit tested without a database.

mod nutrition;
mod strength;
mod workout;

pub use nutrition::{
    DayKind, MacroBreakdown, MacroTotals, NutritionSummary, average_calories, nutrition_summary,
};
pub use strength::{
    ExerciseRecords, RecordEntry, StrengthTotal, big_three_progress, biggest_totals,
    exercise_records, format_records, max_weight_per_date, progression, records,
};
pub use workout::{
    ExerciseRepRanges, MuscleRepRanges, RepRangeCounts, WorkoutCharts, muscles_targeted,
    rep_ranges, rep_ranges_per_exercise, rep_ranges_per_muscle, timeline, workouts_per_month,
};

//! Activity feed entries built from workouts, meals and weigh-ins.

use chrono::NaiveDate;
use serde::Serialize;

use crate::nutrition::{BodyWeight, DailyNutrition};
use crate::workout::Workout;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Workout,
    Nutrition,
    Bodyweight,
}

impl ActivityKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::Workout => "workout",
            Self::Nutrition => "nutrition",
            Self::Bodyweight => "bodyweight",
        }
    }
}

/// One line of a newsfeed.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Activity {
    pub kind: ActivityKind,
    pub date: NaiveDate,
    pub username: String,
    pub message: String,
    pub link: String,
}

impl Activity {
    #[must_use]
    pub fn from_workout(workout: &Workout, username: &str) -> Self {
        let message = if workout.description.is_empty() {
            "Recorded a workout".to_owned()
        } else {
            workout.description.clone()
        };
        Self {
            kind: ActivityKind::Workout,
            date: workout.date,
            username: username.to_owned(),
            message,
            link: workout.path(),
        }
    }

    #[must_use]
    pub fn from_nutrition(record: &DailyNutrition, username: &str) -> Self {
        Self {
            kind: ActivityKind::Nutrition,
            date: record.date,
            username: username.to_owned(),
            message: format!("Consumed {} calories", record.calories),
            link: record.path(),
        }
    }

    #[must_use]
    pub fn from_bodyweight(record: &BodyWeight, username: &str) -> Self {
        Self {
            kind: ActivityKind::Bodyweight,
            date: record.date,
            username: username.to_owned(),
            message: format!("Weighed {} kg", record.weight),
            link: format!("/users/{username}/"),
        }
    }
}

/// Merge the three activity sources, newest first, keeping at most `limit`.
///
/// Each input pairs a record with its owner's username. Entries on the same
/// date keep workout, nutrition, bodyweight order.
#[must_use]
pub fn build_feed(
    workouts: &[(Workout, String)],
    nutrition: &[(DailyNutrition, String)],
    bodyweights: &[(BodyWeight, String)],
    limit: usize,
) -> Vec<Activity> {
    let mut feed: Vec<Activity> = workouts
        .iter()
        .map(|(w, u)| Activity::from_workout(w, u))
        .chain(nutrition.iter().map(|(n, u)| Activity::from_nutrition(n, u)))
        .chain(bodyweights.iter().map(|(b, u)| Activity::from_bodyweight(b, u)))
        .collect();
    feed.sort_by(|a, b| b.date.cmp(&a.date));
    feed.truncate(limit);
    feed
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test code")]
mod tests {
    use chrono::Utc;

    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2014, 7, d).unwrap()
    }

    #[test]
    fn feed_is_newest_first_and_truncated() {
        let workouts = vec![(
            Workout {
                id: 3,
                user_id: 1,
                date: day(2),
                description: "Legs".to_owned(),
                comments: String::new(),
            },
            "danny".to_owned(),
        )];
        let nutrition = vec![(
            DailyNutrition {
                id: 9,
                user_id: 1,
                date: day(5),
                calories: 2800,
                protein: 180,
                carbs: 300,
                fats: 80,
                created_on: Utc::now(),
            },
            "danny".to_owned(),
        )];
        let bodyweights = vec![
            (BodyWeight { id: 1, user_id: 2, date: day(1), weight: 80 }, "steve".to_owned()),
            (BodyWeight { id: 2, user_id: 2, date: day(4), weight: 81 }, "steve".to_owned()),
        ];

        let feed = build_feed(&workouts, &nutrition, &bodyweights, 3);
        assert_eq!(feed.len(), 3);
        assert_eq!(feed[0].message, "Consumed 2800 calories");
        assert_eq!(feed[0].link, "/nutrition/9");
        assert_eq!(feed[1].message, "Weighed 81 kg");
        assert_eq!(feed[1].link, "/users/steve/");
        assert_eq!(feed[2].kind, ActivityKind::Workout);
    }
}

//! Shared constants for stronger.

/// Maximum number of rows any list query returns.
pub const MAX_QUERY_LIMIT: usize = 1000;

/// Default page size when a caller does not pass a limit.
pub const DEFAULT_QUERY_LIMIT: usize = 20;

/// Entries shown in activity feeds.
pub const FEED_LENGTH: usize = 10;

/// Rows shown in "most frequent users" leaderboards.
pub const MOST_FREQUENT_USERS: usize = 10;

/// Rows returned by the popular exercises endpoint.
pub const POPULAR_EXERCISES: usize = 5;

/// Recent history rows shown on the workouts and nutrition pages.
pub const HISTORY_ROWS: usize = 10;

/// Rep counts covered by the records table (1RM through 10RM).
pub const RECORD_REP_RANGE: std::ops::RangeInclusive<u32> = 1..=10;

/// Default rep count for exercise progression charts.
pub const DEFAULT_PROGRESSION_REPS: u32 = 5;

/// Default look-back for the workouts summary chart, in days.
pub const DEFAULT_WORKOUT_DAYS_BACK: i64 = 7;

/// Default look-back for the nutrition summary chart, in days.
pub const DEFAULT_NUTRITION_DAYS_BACK: i64 = 14;

/// Window used for the workouts-per-month chart, in days.
pub const WORKOUT_HISTORY_DAYS: i64 = 365;

/// Upper bound for chart look-back windows, in days.
pub const MAX_DAYS_BACK: i64 = 3650;

/// Maximum set rows accepted by one record-workout submission.
pub const MAX_SETS_PER_WORKOUT: usize = 100;

/// Avatar assigned to new accounts.
pub const DEFAULT_AVATAR_URL: &str =
    "http://findicons.com/files/icons/1072/face_avatars/300/k04.png";

/// Background image assigned to new groups.
pub const DEFAULT_GROUP_BACKGROUND_URL: &str =
    "http://uxrepo.com/static/icon-sets/elusive/svg/group.svg";

/// Cookie carrying the web session id.
pub const SESSION_COOKIE: &str = "stronger_session";

/// Default project link on the about page.
pub const DEFAULT_GITHUB_URL: &str = "https://github.com/stronger-app/stronger";

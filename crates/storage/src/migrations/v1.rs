//! Migration v1: users, training log, nutrition and social tables

pub(super) const SQL: &str = "
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    gym TEXT NOT NULL DEFAULT '',
    goal TEXT,
    about TEXT NOT NULL DEFAULT '',
    height INTEGER,
    avatar_url TEXT NOT NULL,
    date_joined TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS exercises (
    name TEXT PRIMARY KEY,
    clean_name TEXT NOT NULL UNIQUE,
    primary_muscle TEXT NOT NULL,
    secondary_muscle TEXT NOT NULL,
    added_by INTEGER REFERENCES users(id) ON DELETE SET NULL,
    added_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS workouts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    date TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    comments TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS sets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    workout_id INTEGER NOT NULL REFERENCES workouts(id) ON DELETE CASCADE,
    exercise TEXT NOT NULL REFERENCES exercises(name) ON UPDATE CASCADE ON DELETE CASCADE,
    weight REAL NOT NULL CHECK (weight >= 0),
    reps INTEGER NOT NULL CHECK (reps >= 1)
);

CREATE TABLE IF NOT EXISTS bodyweights (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    date TEXT NOT NULL,
    weight INTEGER NOT NULL,
    UNIQUE (user_id, date)
);

CREATE TABLE IF NOT EXISTS daily_nutrition (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    date TEXT NOT NULL,
    calories INTEGER NOT NULL,
    protein INTEGER NOT NULL,
    carbs INTEGER NOT NULL,
    fats INTEGER NOT NULL,
    created_on TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS friends (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    friend_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    since TEXT NOT NULL,
    UNIQUE (user_id, friend_id),
    CHECK (user_id <> friend_id)
);

CREATE TABLE IF NOT EXISTS user_groups (
    name TEXT PRIMARY KEY,
    about TEXT NOT NULL DEFAULT '',
    created TEXT NOT NULL,
    background_url TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS group_members (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    group_name TEXT NOT NULL REFERENCES user_groups(name) ON UPDATE CASCADE ON DELETE CASCADE,
    joined TEXT NOT NULL,
    approved INTEGER NOT NULL DEFAULT 0,
    admin INTEGER NOT NULL DEFAULT 0,
    UNIQUE (user_id, group_name)
);

CREATE TABLE IF NOT EXISTS goals (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    exercise TEXT NOT NULL REFERENCES exercises(name) ON UPDATE CASCADE ON DELETE CASCADE,
    weight REAL NOT NULL,
    reps INTEGER NOT NULL,
    objective_date TEXT NOT NULL,
    completed_date TEXT
);

CREATE INDEX IF NOT EXISTS idx_workouts_user_date ON workouts(user_id, date);
CREATE INDEX IF NOT EXISTS idx_sets_workout ON sets(workout_id);
CREATE INDEX IF NOT EXISTS idx_sets_exercise ON sets(exercise);
CREATE INDEX IF NOT EXISTS idx_nutrition_user_date ON daily_nutrition(user_id, date);
CREATE INDEX IF NOT EXISTS idx_friends_friend ON friends(friend_id);
CREATE INDEX IF NOT EXISTS idx_group_members_group ON group_members(group_name);
CREATE INDEX IF NOT EXISTS idx_goals_user ON goals(user_id);
";

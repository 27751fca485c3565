//! Page shell and small HTML fragments shared by every page.

use std::borrow::Cow;
use std::fmt::Write as _;

use axum::response::Html;
use stronger_core::{Activity, User, ValidationErrors};

/// Escape text for an element body.
pub fn esc(s: &str) -> Cow<'_, str> {
    html_escape::encode_text(s)
}

/// Escape text for a double-quoted attribute value.
pub fn attr(s: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(s)
}

/// Wrap a page body in the site shell. The navigation depends on whether
/// someone is logged in.
pub fn page(title: &str, user: Option<&User>, body: &str) -> Html<String> {
    let nav = match user {
        Some(u) => format!(
            r#"<a href="/dashboard">Dashboard</a>
<a href="/workouts">Workouts</a>
<a href="/record-workout">Record workout</a>
<a href="/exercises">Exercises</a>
<a href="/nutrition">Nutrition</a>
<a href="/groups">Groups</a>
<a href="/users/">Users</a>
<a href="{profile}">{name}</a>
<a href="/settings">Settings</a>
<a href="/logout">Log out</a>"#,
            profile = attr(&u.profile_path()),
            name = esc(&u.username),
        ),
        None => r#"<a href="/about">About</a>
<a href="/login">Log in</a>
<a href="/signup">Sign up</a>"#
            .to_owned(),
    };
    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title} | Stronger</title>
</head>
<body>
<nav><a href="/">Stronger</a>
{nav}
</nav>
<main>
<h1>{title}</h1>
{body}
</main>
</body>
</html>
"#,
        title = esc(title),
    ))
}

/// Every validation message as a list, or nothing when there are none.
pub fn error_list(errors: &ValidationErrors) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let mut html = String::from(r#"<ul class="errors">"#);
    for e in errors.iter() {
        let _ = write!(html, "<li>{}: {}</li>", esc(&e.field), esc(&e.message));
    }
    html.push_str("</ul>");
    html
}

/// Labelled `<input>` pre-filled with `value`.
pub fn input(name: &str, label: &str, kind: &str, value: &str) -> String {
    format!(
        r#"<label>{label} <input type="{kind}" name="{name}" value="{value}"></label>"#,
        label = esc(label),
        kind = attr(kind),
        name = attr(name),
        value = attr(value),
    )
}

/// `<select>` over `(value, label)` options with `selected` pre-chosen.
pub fn select<'a>(
    name: &str,
    label: &str,
    options: impl IntoIterator<Item = (&'a str, &'a str)>,
    selected: &str,
) -> String {
    let mut html = format!(r#"<label>{} <select name="{}">"#, esc(label), attr(name));
    for (value, text) in options {
        let marker = if value == selected { " selected" } else { "" };
        let _ = write!(html, r#"<option value="{}"{marker}>{}</option>"#, attr(value), esc(text));
    }
    html.push_str("</select></label>");
    html
}

/// Newsfeed entries, newest first.
pub fn feed(items: &[Activity]) -> String {
    if items.is_empty() {
        return "<p>Nothing to show yet.</p>".to_owned();
    }
    let mut html = String::from(r#"<ul class="feed">"#);
    for item in items {
        let _ = write!(
            html,
            r#"<li class="{kind}">{date} <a href="/users/{user}/">{user_text}</a>: <a href="{link}">{message}</a></li>"#,
            kind = item.kind.as_str(),
            date = item.date,
            user = attr(&item.username),
            user_text = esc(&item.username),
            link = attr(&item.link),
            message = esc(&item.message),
        );
    }
    html.push_str("</ul>");
    html
}

/// Links to user profiles.
pub fn user_links(users: &[User]) -> String {
    if users.is_empty() {
        return "<p>Nobody yet.</p>".to_owned();
    }
    let mut html = String::from("<ul>");
    for u in users {
        let _ = write!(html, r#"<li><a href="{}">{}</a></li>"#, attr(&u.profile_path()), esc(&u.username));
    }
    html.push_str("</ul>");
    html
}

/// `(username, count)` leaderboard rows.
pub fn leaderboard<'a>(rows: impl IntoIterator<Item = (&'a str, u64)>) -> String {
    let mut html = String::from("<table><tr><th>User</th><th>Count</th></tr>");
    for (username, count) in rows {
        let _ = write!(
            html,
            r#"<tr><td><a href="/users/{}/">{}</a></td><td>{count}</td></tr>"#,
            attr(username),
            esc(username),
        );
    }
    html.push_str("</table>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_text_is_escaped() {
        assert_eq!(esc("<b>"), "&lt;b&gt;");
        let html = input("gym", "Gym", "text", r#""><script>"#);
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn error_list_empty_without_errors() {
        assert!(error_list(&ValidationErrors::new()).is_empty());
        let html = error_list(&ValidationErrors::single("date", "Enter a valid date."));
        assert!(html.contains("Enter a valid date."));
    }
}

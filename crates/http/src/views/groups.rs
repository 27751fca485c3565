use std::fmt::Write as _;

use stronger_core::{Group, MemberSummary, User, ValidationErrors};
use stronger_service::GroupDetail;

use super::layout::{attr, error_list, esc, input};

fn group_form(action: &str, button: &str, name: &str, about: &str, errors: &ValidationErrors) -> String {
    format!(
        r#"{errors}<form method="post" action="{action}">
{name}
<label for="about">About</label><textarea id="about" name="about">{about}</textarea>
<button type="submit">{button}</button>
</form>"#,
        errors = error_list(errors),
        action = attr(action),
        name = input("name", "Name", "text", name),
        about = esc(about),
    )
}

fn member_list(members: &[MemberSummary]) -> String {
    if members.is_empty() {
        return "<p>Nobody yet.</p>".to_owned();
    }
    let mut html = String::from("<ul>");
    for m in members {
        let _ = write!(
            html,
            r#"<li><a href="/users/{}/">{}</a></li>"#,
            attr(&m.username),
            esc(&m.username),
        );
    }
    html.push_str("</ul>");
    html
}

pub fn groups(mine: &[Group], name: &str, about: &str, errors: &ValidationErrors) -> String {
    let mut list = String::from("<ul>");
    for g in mine {
        let _ = write!(list, r#"<li><a href="{}">{}</a></li>"#, attr(&g.path()), esc(&g.name));
    }
    list.push_str("</ul>");
    if mine.is_empty() {
        list = "<p>You are not in any groups yet.</p>".to_owned();
    }
    format!(
        "<section><h2>Your groups</h2>{list}</section>\n<section><h2>Start a group</h2>{form}</section>",
        form = group_form("/groups", "Create", name, about, errors),
    )
}

pub struct GroupPage<'a> {
    pub detail: &'a GroupDetail,
    pub viewer: &'a User,
    pub edit_values: (&'a str, &'a str),
    pub errors: &'a ValidationErrors,
}

pub fn group(data: &GroupPage<'_>) -> String {
    let g = &data.detail.group;
    let is_admin = data.detail.admins.iter().any(|m| m.user_id == data.viewer.id);
    let is_member = is_admin || data.detail.members.iter().any(|m| m.user_id == data.viewer.id);
    let mut html = format!(
        r#"<div class="group" style="background-image:url('{bg}')"><p>{about}</p><p>Since {created}</p></div>
<section><h2>Members</h2>{members}</section>
<section><h2>Admins</h2>{admins}</section>"#,
        bg = attr(&g.background_url),
        about = esc(&g.about),
        created = g.created.date_naive(),
        members = member_list(&data.detail.members),
        admins = member_list(&data.detail.admins),
    );
    if !is_member {
        let _ = write!(
            html,
            r#"<form method="post" action="{}/join"><button type="submit">Join</button></form>"#,
            attr(&g.path()),
        );
    }
    if is_admin {
        let _ = write!(
            html,
            "<section><h2>Pending</h2>{pending}</section>\n<section><h2>Edit</h2>{form}</section>",
            pending = member_list(&data.detail.pending),
            form = group_form(&g.path(), "Save", data.edit_values.0, data.edit_values.1, data.errors),
        );
    }
    html
}

//! Server-rendered HTML for the board. Small enough that a template engine
//! would be overhead; pages are assembled from `format!` with escaping for
//! user-entered text.

use axum::response::Html;

use service::domain::Update;

/// Escape text destined for HTML body or attribute positions.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(app_name: &str, title: &str, flash: Option<&str>, body: &str) -> Html<String> {
    let notice = match flash {
        Some(msg) => format!("<p class=\"notice\">{}</p>", escape(msg)),
        None => String::new(),
    };
    Html(format!(
        "<!doctype html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title} - {name}</title></head>\n<body>\n<h1>{name}</h1>\n{notice}\n{body}\n</body>\n</html>\n",
        title = escape(title),
        name = escape(app_name),
        notice = notice,
        body = body,
    ))
}

pub fn home(app_name: &str, flash: Option<&str>) -> Html<String> {
    let body = format!(
        "<p>Welcome to {}: short updates from the team.</p>\n<p><a href=\"/updates\">See updates</a> | <a href=\"/post\">Post an update</a></p>",
        escape(app_name)
    );
    page(app_name, "Home", flash, &body)
}

pub fn list(
    app_name: &str,
    flash: Option<&str>,
    updates: &[Update],
    current_user: Option<&str>,
) -> Html<String> {
    let mut body = String::from("<ul class=\"updates\">\n");
    for u in updates {
        let owned = current_user.is_some_and(|c| c == u.name);
        let controls = if owned {
            format!(
                "<a href=\"/edit/{id}\">Edit</a> \
                 <form method=\"post\" action=\"/delete/{id}\" style=\"display:inline\"><button type=\"submit\">Delete</button></form>",
                id = escape(&u.id)
            )
        } else {
            String::new()
        };
        body.push_str(&format!(
            "<li><strong>{name}</strong> <em>{ts}</em><br>{message} {controls}</li>\n",
            name = escape(&u.name),
            ts = u.timestamp.format("%d/%m/%Y, %H:%M:%S UTC"),
            message = escape(&u.message),
            controls = controls,
        ));
    }
    body.push_str("</ul>\n<p><a href=\"/post\">Post an update</a></p>");
    if updates.is_empty() {
        body = format!("<p>No updates yet.</p>\n{}", body);
    }
    page(app_name, "Updates", flash, &body)
}

pub fn post_form(
    app_name: &str,
    flash: Option<&str>,
    authorized_posters: &[String],
    current_user: Option<&str>,
) -> Html<String> {
    let mut options = String::new();
    for name in authorized_posters {
        let selected = if current_user == Some(name.as_str()) { " selected" } else { "" };
        options.push_str(&format!(
            "<option value=\"{n}\"{selected}>{n}</option>",
            n = escape(name),
            selected = selected,
        ));
    }
    let body = format!(
        "<form method=\"post\" action=\"/post\">\n\
         <label>Name <select name=\"name\">{options}</select></label><br>\n\
         <label>Message <textarea name=\"message\"></textarea></label><br>\n\
         <button type=\"submit\">Post</button>\n\
         </form>\n<p><a href=\"/updates\">Back to updates</a></p>",
        options = options,
    );
    page(app_name, "Post", flash, &body)
}

pub fn edit_form(app_name: &str, flash: Option<&str>, update: &Update) -> Html<String> {
    let body = format!(
        "<form method=\"post\" action=\"/edit/{id}\">\n\
         <p>Editing as <strong>{name}</strong></p>\n\
         <label>Message <textarea name=\"message\">{message}</textarea></label><br>\n\
         <button type=\"submit\">Save</button>\n\
         </form>\n<p><a href=\"/updates\">Back to updates</a></p>",
        id = escape(&update.id),
        name = escape(&update.name),
        message = escape(&update.message),
    );
    page(app_name, "Edit", flash, &body)
}

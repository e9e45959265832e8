//! Server-rendered admin view.

use axum::response::Html;

use crate::auth::AdminSession;
use crate::security::escape_html;

const PAGE_TITLE: &str = "Census Application";

/// Admin landing page for the participants section.
pub async fn admin_index(session: AdminSession) -> Html<String> {
    Html(render_index(PAGE_TITLE, &session.username))
}

fn render_index(title: &str, username: &str) -> String {
    let title = escape_html(title);
    let username = escape_html(username);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title}</title>
</head>
<body>
  <h1>{title}</h1>
  <p>Signed in as <strong>{username}</strong></p>
</body>
</html>
"#
    )
}

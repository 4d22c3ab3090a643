//! Page handlers
//!
//! Every handler renders a full HTML page; failures re-render the form
//! with an inline message or return the 404 page. Nothing here panics on
//! bad input.

use axum::extract::{Host, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use serde::Deserialize;
use tracing::error;

use crate::api::render::{html_escape, render};
use crate::error::ServiceError;
use crate::format::{display_label, order_platforms, platform_display};
use crate::models::LinkRecord;
use crate::service::{share_url, CreateRequest};
use crate::AppState;

const INDEX_HTML: &str = include_str!("../../ui/index.html");
const LINK_HTML: &str = include_str!("../../ui/link.html");
const LIST_HTML: &str = include_str!("../../ui/list.html");
const NOT_FOUND_HTML: &str = include_str!("../../ui/404.html");

/// GET /
pub async fn index() -> Html<String> {
    Html(render(INDEX_HTML, &[("alert", "")]))
}

/// POST /create form body. The `title` field carries the desired custom
/// path; the field name is kept for form compatibility.
#[derive(Debug, Deserialize)]
pub struct CreateForm {
    #[serde(rename = "musicUrl")]
    pub music_url: String,
    pub title: String,
}

/// POST /create
pub async fn create_link(
    State(state): State<AppState>,
    Host(host): Host,
    headers: HeaderMap,
    Form(form): Form<CreateForm>,
) -> Html<String> {
    let request = CreateRequest {
        music_url: form.music_url,
        custom_path: form.title,
        requester_ip: requester_ip(&headers),
        user_agent: header_value(&headers, "user-agent"),
    };

    let alert = match state.service.create_link(request).await {
        Ok(record) => {
            let host = state.public_host.as_deref().unwrap_or(&host);
            let url = html_escape(&share_url(host, &record.custom_path));
            format!(
                "<div class=\"alert-success\">Success! Your link is ready: \
                 <a href=\"{url}\">{url}</a></div>"
            )
        }
        Err(e) => format!(
            "<div class=\"alert-error\">{}</div>",
            html_escape(&e.user_message())
        ),
    };

    Html(render(INDEX_HTML, &[("alert", &alert)]))
}

/// GET /list
pub async fn list_links(State(state): State<AppState>) -> Response {
    let records = match state.service.list().await {
        Ok(records) => records,
        Err(e) => return internal_error(e),
    };

    let mut rows = String::new();
    for record in &records {
        let path = html_escape(&record.custom_path);
        rows.push_str(&format!(
            "    <tr><td><a href=\"/{path}\">{path}</a></td><td>{}</td><td>{}</td></tr>\n",
            html_escape(&record.display_title),
            record.platform_links.len(),
        ));
    }

    Html(render(LIST_HTML, &[("rows", &rows)])).into_response()
}

/// GET /:custom_path
pub async fn landing_page(
    State(state): State<AppState>,
    Path(custom_path): Path<String>,
) -> Response {
    match state.service.view(&custom_path).await {
        Ok(record) => Html(render_landing(&record)).into_response(),
        Err(ServiceError::NotFound(_)) => {
            (StatusCode::NOT_FOUND, Html(NOT_FOUND_HTML)).into_response()
        }
        Err(e) => internal_error(e),
    }
}

fn render_landing(record: &LinkRecord) -> String {
    let mut items = String::new();
    for entry in order_platforms(&record.platform_links) {
        let icon = match platform_display(&entry.platform) {
            Some(info) => format!(
                "<img src=\"https://cdn.simpleicons.org/{}\" alt=\"\">",
                info.icon_slug
            ),
            None => String::new(),
        };
        items.push_str(&format!(
            "    <li><a href=\"{}\" rel=\"noopener\">{}{}</a></li>\n",
            html_escape(&entry.url),
            icon,
            html_escape(&display_label(&entry.platform)),
        ));
    }

    render(
        LINK_HTML,
        &[
            ("title", &html_escape(&record.display_title)),
            ("thumbnail_url", &html_escape(&record.thumbnail_url)),
            ("platform_items", &items),
        ],
    )
}

fn internal_error(e: ServiceError) -> Response {
    error!(error = %e, "request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html("<p>An unexpected error occurred.</p>".to_string()),
    )
        .into_response()
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

/// Client IP, taken from the first X-Forwarded-For hop when present.
fn requester_ip(headers: &HeaderMap) -> Option<String> {
    header_value(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next().map(|ip| ip.trim().to_string()))
        .filter(|ip| !ip.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_requester_ip_takes_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        assert_eq!(requester_ip(&headers).as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn test_requester_ip_absent() {
        assert_eq!(requester_ip(&HeaderMap::new()), None);
    }
}

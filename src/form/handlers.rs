use crate::form::INDEX_PAGE;
use axum::response::Html;

#[axum::debug_handler]
pub async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

use std::path::Path;

use crate::{AppState, auth::page_guard};
use axum::{Router, middleware};
use tower_http::services::{ServeDir, ServeFile};

/// Admin UI Router Module
///
/// Serves the prebuilt admin UI from `admin_ui_dir` under `/admin`. Paths without
/// a matching file fall back to `index.html` so client-side routes resolve.
///
/// Access Control:
/// `page_guard` runs before the file service and redirects anonymous visitors of
/// the admin sections to `/admin/login?from=...`.
pub fn admin_routes(state: AppState) -> Router<AppState> {
    let dir = Path::new(&state.config.admin_ui_dir);
    let files = ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")));

    Router::new()
        .nest_service("/admin", files)
        .layer(middleware::from_fn_with_state(state, page_guard))
}

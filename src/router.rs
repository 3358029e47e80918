use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::AppState;

/// Build the application router with all routes
pub fn build(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::connect::page).post(handlers::connect::submit),
        )
        .route(
            "/vlans",
            get(handlers::vlans::page).post(handlers::vlans::submit),
        )
        .route(
            "/vnics",
            get(handlers::vnics::page).post(handlers::vnics::submit),
        )
        .route("/healthz", get(handlers::healthcheck))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Build the template set. Templates are compiled into the binary so the
/// tool runs from any working directory.
pub fn build_templates() -> tera::Result<tera::Tera> {
    let mut tera = tera::Tera::default();
    tera.add_raw_template("index.html", include_str!("../templates/index.html"))?;
    tera.add_raw_template("vlans.html", include_str!("../templates/vlans.html"))?;
    tera.add_raw_template("vnics.html", include_str!("../templates/vnics.html"))?;
    Ok(tera)
}

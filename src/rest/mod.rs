use std::{net::SocketAddr, time::SystemTime};

use anyhow::Context;

use axum::{
    http::HeaderMap,
    routing::{get, post, put},
    Router,
};

use crate::{
    admin::{AdminError, AdminResult, AdminService},
    storage::Store,
};

mod auth;
mod handlers;
mod models;

pub use models::ErrorResponse;

use handlers::{
    create_association, create_keyword, create_link, delete_association, delete_keyword,
    delete_link, health, list_associations, list_keywords, list_links, not_found, search_links,
    update_keyword, update_link,
};

#[derive(Clone)]
pub struct AppState<S: Store> {
    pub admin: AdminService<S>,
    pub admin_token: Option<String>,
    pub started_at: SystemTime,
}

impl<S: Store> AppState<S> {
    pub fn new(admin: AdminService<S>, admin_token: Option<String>) -> Self {
        Self {
            admin,
            admin_token,
            started_at: SystemTime::now(),
        }
    }

    fn authorize(&self, headers: &HeaderMap) -> AdminResult<()> {
        if auth::is_authorized(headers, self.admin_token.as_deref()) {
            return Ok(());
        }
        log::warn!("Rejected unauthenticated admin request");
        Err(AdminError::Unauthorized)
    }
}

pub fn router<S: Store>(state: AppState<S>) -> Router {
    let mut app = Router::new().route("/health", get(health::<S>));

    for base in ["/links", "/links/"] {
        app = app.route(base, get(list_links::<S>).post(create_link::<S>));
    }
    for base in ["/keywords", "/keywords/"] {
        app = app.route(base, get(list_keywords::<S>).post(create_keyword::<S>));
    }
    for base in ["/links-keywords", "/links-keywords/"] {
        app = app.route(
            base,
            get(list_associations::<S>)
                .post(create_association::<S>)
                .delete(delete_association::<S>),
        );
    }
    for base in ["/search-links", "/search-links/"] {
        app = app.route(base, post(search_links::<S>));
    }

    app.route(
        "/links/:id",
        put(update_link::<S>)
            .patch(update_link::<S>)
            .delete(delete_link::<S>),
    )
    .route(
        "/keywords/:id",
        put(update_keyword::<S>)
            .patch(update_keyword::<S>)
            .delete(delete_keyword::<S>),
    )
    .fallback(not_found)
    .with_state(state)
}

pub async fn serve<S: Store>(
    addr: SocketAddr,
    state: AppState<S>,
    shutdown: tokio_util::sync::CancellationToken,
) -> anyhow::Result<()> {
    log::info!("🌐 REST service on http://{}", addr);
    if state.admin_token.is_none() {
        log::warn!("⚠️ No admin token configured; admin routes are open");
    }

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding REST listener on {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            log::info!("🛑 REST shutdown requested");
        })
        .await?;
    log::info!("👋 REST server exited");
    Ok(())
}

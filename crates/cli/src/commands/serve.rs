use std::sync::Arc;

use anyhow::Result;
use stronger_core::constants::DEFAULT_GITHUB_URL;
use stronger_core::env_string;
use stronger_http::{create_router, AppState};

use crate::open_services;

pub(crate) async fn run(port: u16, host: String) -> Result<()> {
    let services = open_services()?;
    let github_url = env_string("STRONGER_GITHUB_URL").unwrap_or_else(|| DEFAULT_GITHUB_URL.to_owned());
    let state = Arc::new(AppState { services, github_url });

    let router = create_router(state);
    let addr = format!("{host}:{port}");
    tracing::info!("Starting HTTP server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

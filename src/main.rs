use crate::app::App;
use crate::config::Config;
use crate::db::init_db;
use crate::router::handle;
use anyhow::Context;
use astra::Server;
use std::net::SocketAddr;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app;
mod auth;
mod config;
mod db;
mod domain;
mod errors;
mod handlers;
mod map;
mod requests;
mod responses;
mod router;
mod templates;
mod uploads;


fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load()?;
    let app = App::new(config);

    app.uploads
        .ensure_dirs()
        .with_context(|| format!("creating upload dirs under {}", app.config.upload_dir.display()))?;

    init_db(&app.db, &app.config.schema_path).context("database initialization failed")?;

    let addr: SocketAddr = app
        .config
        .bind_addr()
        .parse()
        .with_context(|| format!("invalid bind address {}", app.config.bind_addr()))?;
    info!(%addr, workers = app.config.max_workers, "starting server");

    let server = Server::bind(&addr).max_workers(app.config.max_workers);

    server
        .serve(move |req: astra::Request, _info| {
            let started = Instant::now();
            let method = req.method().clone();
            let path = req.uri().path().to_string();

            let resp = handle(req, &app);

            info!(
                %method,
                path = %path,
                status = resp.status().as_u16(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "request"
            );
            resp
        })
        .context("server ended with error")?;

    info!("server shut down cleanly");
    Ok(())
}

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![doc = include_str!("../README.md")]

use anyhow::Result;
use chrono::Utc;
use tracing_subscriber::prelude::*;

use crate::config::Config;
use crate::controller::Controller;
use crate::endpoint::HttpEndpoint;
use crate::page::Page;
use crate::terminal::Terminal;

mod bounds;
mod config;
mod controller;
mod endpoint;
mod graceful_shutdown;
mod links;
mod page;
mod presenter;
mod terminal;
#[cfg(test)]
mod tests;

const DEFAULT_RUST_LOG: &str = "linkform=debug";

/// One page load: a single UI thread, like the browser it stands in for
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    setup_environment();
    setup_tracing();

    let config = Config::from_env()?;

    let page = Page::load(
        config.base_url.clone(),
        Terminal::stdout(),
        Utc::now().naive_utc(),
    )?;
    let endpoint = HttpEndpoint::new(&config.base_url)?;

    tracing::info!("Creating links at {}", endpoint.url());

    let controller = Controller::new(&page, endpoint);

    let mut lines = terminal::stdin_lines();
    let mut out = tokio::io::stdout();

    terminal::run(
        &page,
        &controller,
        &mut lines,
        &mut out,
        graceful_shutdown::handler(),
    )
    .await
}

fn setup_environment() {
    dotenvy::dotenv().ok();
}

/// Logs go to stderr, stdout belongs to the form
fn setup_tracing() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::registry;

    registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_RUST_LOG.into()),
        ))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

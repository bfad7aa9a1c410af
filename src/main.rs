mod admin;
mod app;
mod cli;
mod commands;
mod context;
mod permalink;
mod repository;
mod resolver;
mod rest;
mod storage;
mod tracing;
mod types;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    crate::tracing::init();
    app::run().await
}

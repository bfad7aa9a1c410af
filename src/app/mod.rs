mod wiring;

use crate::{admin::AdminService, cli, context, rest, storage::SqliteStore};
use anyhow::{Context as AnyhowContext, Result};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Handles shared by the daemon and the one-shot commands.
#[derive(Clone)]
pub struct Services {
    pub store: SqliteStore,
    pub admin: AdminService<SqliteStore>,
}

pub struct App {
    ctx: context::Context,
    services: Services,
    shutdown: CancellationToken,
}

impl App {
    pub fn from_cli() -> Result<(Self, cli::Cli)> {
        let cli = crate::cli::parse();
        let ctx = context::Context::from_cli(&cli);

        crate::tracing::set_log_file(ctx.log_file.as_deref())
            .context("opening log file")?;
        log_startup_info(&ctx);

        Ok((Self::new(ctx)?, cli))
    }

    fn new(ctx: context::Context) -> Result<Self> {
        let store = wiring::init_storage(&ctx.data_dir, &ctx.db_path(), ctx.reset)?;
        let admin = wiring::build_admin(store.clone(), ctx.site_url.clone());

        Ok(Self {
            ctx,
            services: Services { store, admin },
            shutdown: CancellationToken::new(),
        })
    }

    pub async fn run_daemon(&self) -> Result<()> {
        log::info!("🌐 REST API: http://{}", self.ctx.api_listen);
        if let Some(path) = self.ctx.log_file.as_deref() {
            log::info!("📝 Log file: {}", path.to_string_lossy());
        }

        let mut rest_handle = self.spawn_rest_server();
        self.wait_for_shutdown(&mut rest_handle).await
    }

    fn spawn_rest_server(&self) -> JoinHandle<Result<()>> {
        let addr = self.ctx.api_listen;
        let state = rest::AppState::new(
            self.services.admin.clone(),
            self.ctx.admin_token.clone(),
        );
        let token = self.shutdown.clone();

        tokio::spawn(async move { rest::serve(addr, state, token).await })
    }

    async fn wait_for_shutdown(&self, rest_task: &mut JoinHandle<Result<()>>) -> Result<()> {
        let early_exit = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                log::info!("🧨 Ctrl-C received, shutting down...");
                None
            }
            res = &mut *rest_task => {
                log::error!("REST task exited unexpectedly");
                Some(res)
            }
        };

        self.shutdown.cancel();

        // Polling a completed JoinHandle again panics.
        let rest_result = match early_exit {
            Some(res) => res.map(|served| {
                served.and_then(|()| Err(anyhow::anyhow!("REST server stopped on its own")))
            }),
            None => rest_task.await,
        };

        match rest_result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                log::error!("REST server error: {:#}", e);
                return Err(e);
            }
            Err(e) => {
                log::error!("REST task failed: {}", e);
                return Err(anyhow::Error::new(e).context("REST task failed"));
            }
        }

        log::info!("✅ Shutdown complete");
        Ok(())
    }
}

fn log_startup_info(ctx: &context::Context) {
    log::info!("🚀 Starting letmehelp");
    log::info!("📂 Data dir: {}", ctx.data_dir.to_string_lossy());
    log::info!("🔗 Site URL: {}", ctx.site_url);
}

pub async fn run() -> Result<()> {
    let (app, cli) = App::from_cli()?;

    if let Some(cmd) = &cli.cmd {
        return cmd.run(&app.services);
    }

    app.run_daemon().await
}

use tokio::net::TcpListener;

use avconf_store::Session;

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::router::build_router;
use crate::state::{AppState, SharedState};

/// avconf HTTP server.
pub struct AvconfServer {
    config: ServerConfig,
    state: SharedState,
}

impl AvconfServer {
    /// Build a server over a YAML session, selecting `config.store.root` if set.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let mut session = Session::new(config.store.clone());
        if let Some(root) = &config.store.root {
            session.set_root(root)?;
        }
        Ok(Self::with_session(config, session))
    }

    pub fn with_session(config: ServerConfig, session: Session) -> Self {
        Self {
            config,
            state: AppState::new(session),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone())
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            master = %self.state.session().master_store().location(),
            "avconf server listening on {}",
            self.config.bind_addr
        );
        axum::serve(listener, app).await?;
        Ok(())
    }
}

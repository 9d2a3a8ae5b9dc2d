use std::net::SocketAddr;
use std::sync::Arc;

use referral_recruitment::{
    auth::{AuthProvider, IdentityEvent, MemoryAuthProvider, PgAuthProvider},
    config::{get_config, init_config},
    database::pool::{create_pool, run_migrations},
    routes,
    store::{memory::MemoryDocumentStore, postgres::PgDocumentStore, DocumentStore},
    AppState,
};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(log_format: Option<&str>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match log_format {
        Some("json") => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        _ => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_config()?;
    let config = get_config();
    init_tracing(config.log_format.as_deref());

    let (store, auth, backend): (Arc<dyn DocumentStore>, Arc<dyn AuthProvider>, &'static str) =
        match config.database_url.as_deref() {
            Some(url) => {
                let pool = create_pool(url).await?;
                run_migrations(&pool).await?;
                let store: Arc<dyn DocumentStore> = Arc::new(PgDocumentStore::new(pool.clone()));
                let auth: Arc<dyn AuthProvider> = Arc::new(PgAuthProvider::new(pool));
                (store, auth, "postgres")
            }
            None => {
                warn!("DATABASE_URL is not set, records will not survive a restart");
                let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
                let auth: Arc<dyn AuthProvider> = Arc::new(MemoryAuthProvider::new());
                (store, auth, "memory")
            }
        };

    let app_state = AppState::new(config, store, auth, backend);

    {
        let mut events = app_state.sessions.on_identity_change();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(IdentityEvent::SignedIn { uid, role }) => {
                        info!(%uid, role = role.as_str(), "identity signed in")
                    }
                    Ok(IdentityEvent::SessionRestored { uid, role }) => {
                        info!(%uid, role = role.as_str(), "session restored")
                    }
                    Ok(IdentityEvent::SignedOut { uid }) => info!(%uid, "identity signed out"),
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "identity listener lagged")
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }

    let app = routes::router(app_state);

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {} ({} store)", addr, backend);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

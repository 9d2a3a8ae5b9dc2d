use std::sync::Arc;

use clap::Parser;
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use referral_recruitment::{
    auth::PgAuthProvider,
    database::pool::{create_pool, run_migrations},
    models::reference::{Reference, REFERENCE_KIND},
    services::reference_service::ReferenceService,
    store::PgDocumentStore,
    utils::token::generate_uid,
};

#[derive(Parser, Debug)]
#[command(name = "provision-reference")]
#[command(about = "Create a reference partner account and its directory entry")]
struct Args {
    /// Display name shown in the application form
    #[arg(long)]
    name: String,

    /// Sign-in email
    #[arg(long)]
    email: String,

    /// Initial password (at least 6 characters)
    #[arg(long)]
    password: String,

    #[arg(long, default_value = "")]
    phone: String,

    /// Monthly registration target
    #[arg(long)]
    target: Option<f64>,

    /// Postgres connection string, defaults to DATABASE_URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let pool = create_pool(&args.database_url).await?;
    run_migrations(&pool).await?;

    let uid = generate_uid();
    let auth = PgAuthProvider::new(pool.clone());
    let identity = auth.insert_account(&uid, &args.email, &args.password).await?;
    info!(uid = %identity.uid, email = %identity.email, "account created");

    let references = ReferenceService::new(Arc::new(PgDocumentStore::new(pool)));
    references
        .put_reference(&Reference {
            id: identity.uid.clone(),
            name: args.name,
            email: identity.email,
            phone: args.phone,
            target: args.target,
            kind: REFERENCE_KIND.to_string(),
        })
        .await?;

    println!("{}", identity.uid);
    Ok(())
}

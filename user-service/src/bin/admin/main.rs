use std::sync::Arc;

use auth::Authenticator;
use clap::Parser;
use clap::Subcommand;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use user_service::config::Config;
use user_service::domain::user::models::EmailAddress;
use user_service::domain::user::models::FullName;
use user_service::domain::user::models::Password;
use user_service::domain::user::models::ProvisionAdminCommand;
use user_service::domain::user::ports::UserServicePort;
use user_service::domain::user::service::UserService;
use user_service::outbound::repositories::PostgresUserRepository;

/// Database maintenance for the user service.
#[derive(Debug, Parser)]
#[command(name = "user-service-admin", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply pending schema migrations
    Migrate,
    /// Create the administrator account if it does not exist yet
    Seed {
        #[arg(long)]
        email: String,
        #[arg(long, env = "SEED_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, default_value = "Administrator")]
        full_name: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "user_service=info,user_service_admin=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;

    let result = match cli.command {
        Command::Migrate => migrate(&pg_pool).await,
        Command::Seed {
            email,
            password,
            full_name,
        } => {
            migrate(&pg_pool).await?;
            seed(&config, pg_pool.clone(), email, password, full_name).await
        }
    };

    pg_pool.close().await;
    result
}

async fn migrate(pool: &PgPool) -> Result<(), anyhow::Error> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");
    Ok(())
}

async fn seed(
    config: &Config,
    pool: PgPool,
    email: String,
    password: String,
    full_name: String,
) -> Result<(), anyhow::Error> {
    let command = ProvisionAdminCommand {
        email: EmailAddress::new(email)?,
        password: Password::new(password)?,
        full_name: FullName::new(full_name)?,
    };

    let authenticator = Arc::new(Authenticator::new(config.authenticator_settings()?)?);
    let repository = Arc::new(PostgresUserRepository::new(pool));
    let service = UserService::new(repository, authenticator);

    match service.provision_admin(command).await? {
        Some(admin) => tracing::info!(
            user_id = %admin.id,
            email = %admin.email,
            "Administrator account created"
        ),
        None => tracing::info!("Administrator account already exists, skipping"),
    }

    Ok(())
}

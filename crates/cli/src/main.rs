use clap::{Parser, Subcommand};
use std::path::PathBuf;
use techmed_core::config::{
    bool_from_env_value, database_url_from_env_value, kdf_params_from_env_values,
};
use techmed_core::repositories::users;
use techmed_core::{
    seed, CoreConfig, CredentialService, Database, EnrolmentService, PasswordPolicy,
};
use techmed_types::Pesel;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "techmed")]
#[command(about = "TechMed appointment system admin CLI")]
struct Cli {
    /// Database to operate on (defaults to DATABASE_URL, then sqlite://techmed.db)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create missing tables and lookup rows
    Migrate {
        /// Drop every table first
        #[arg(long)]
        reset: bool,
    },
    /// Insert mock data into an empty database
    Seed,
    /// Print the Argon2 digest of a password
    HashPassword {
        password: String,
    },
    /// Check a PESEL number's format and checksum
    CheckPesel {
        pesel: String,
    },
    /// Create an administrator account
    CreateAdmin {
        email: String,
        password: String,
    },
    /// List all accounts
    ListUsers,
}

fn core_config(database_url: Option<String>) -> anyhow::Result<CoreConfig> {
    let env = |name: &str| std::env::var(name).ok();
    let database_url =
        database_url_from_env_value(database_url.or_else(|| env("DATABASE_URL")));
    let kdf = kdf_params_from_env_values(
        env("TECHMED_ARGON2_MEMORY_KIB"),
        env("TECHMED_ARGON2_TIME_COST"),
        env("TECHMED_ARGON2_PARALLELISM"),
    )?;
    let dev_mode = bool_from_env_value("TECHMED_DEV_MODE", env("TECHMED_DEV_MODE"), false)?;
    let weak_passwords = env("TECHMED_WEAK_PASSWORDS_FILE")
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from);
    Ok(CoreConfig::new(database_url, kdf, weak_passwords, dev_mode)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("techmed_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("Use 'techmed --help' for commands");
        return Ok(());
    };

    let cfg = core_config(cli.database_url)?;

    match command {
        Commands::HashPassword { password } => {
            let credentials = CredentialService::new(cfg.kdf())?;
            println!("{}", credentials.hash(&password)?);
        }
        Commands::CheckPesel { pesel } => match Pesel::new(&pesel) {
            Ok(_) => println!("{pesel} is a valid PESEL"),
            Err(e) => anyhow::bail!("{pesel}: {e}"),
        },
        Commands::Migrate { reset } => {
            let db = Database::connect(cfg.database_url()).await?;
            if reset {
                db.reset().await?;
                println!("Dropped and recreated schema in {}", cfg.database_url());
            } else {
                db.migrate().await?;
                println!("Migrated {}", cfg.database_url());
            }
        }
        Commands::Seed => {
            let db = Database::connect(cfg.database_url()).await?;
            db.migrate().await?;
            if !db.is_empty().await? {
                anyhow::bail!("refusing to seed: {} already has users", cfg.database_url());
            }
            let credentials = CredentialService::new(cfg.kdf())?;
            let today = chrono::Local::now().date_naive();
            let summary = seed::insert_mock_data(&db, &credentials, today).await?;
            println!(
                "Seeded {} users, {} patients, {} doctors, {} appointments (password: {})",
                summary.users,
                summary.patients,
                summary.doctors,
                summary.appointments,
                seed::MOCK_PASSWORD
            );
        }
        Commands::CreateAdmin { email, password } => {
            let db = Database::connect(cfg.database_url()).await?;
            db.migrate().await?;
            let policy = PasswordPolicy::load(cfg.weak_passwords_file())?;
            let enrolment = EnrolmentService::new(db, CredentialService::new(cfg.kdf())?);
            let id = enrolment.create_admin(&policy, &email, &password).await?;
            println!("Created admin {email} with id {id}");
        }
        Commands::ListUsers => {
            let db = Database::connect(cfg.database_url()).await?;
            let accounts = users::list(db.pool()).await?;
            if accounts.is_empty() {
                println!("No users found.");
            } else {
                for user in accounts {
                    println!("ID: {}, Email: {}, Type: {}", user.id, user.email, user.type_name);
                }
            }
        }
    }

    Ok(())
}

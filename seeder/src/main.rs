use clap::{Parser, Subcommand};
use colored::*;
use migration::{Migrator, MigratorTrait};
use seeder::error::SeedError;
use seeder::orchestrator::{Orchestrator, Registry};
use seeder::report::Reporter;
use seeder::seeds;
use seeder::settings::SeedSettings;
use seeder::tenant::TenantContext;
use std::error::Error;
use std::process::ExitCode;
use util::config::{self, AppConfig};

/// Populates the school database with bilingual demo data.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    /// School domain to seed (overrides SCHOOL_DOMAIN)
    #[arg(long, global = true)]
    domain: Option<String>,
    /// SQLite path or DSN (overrides DATABASE_PATH)
    #[arg(long, global = true)]
    database: Option<String>,
    /// Content RNG seed (overrides SEED_RNG_SEED)
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Log level for this run (overrides LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Echo log records to stdout
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run every phase in dependency order (the default)
    All,
    /// Run a single phase against what is already stored
    Run {
        /// Phase name, see `run --list`
        #[arg(required_unless_present = "list")]
        phase: Option<String>,
        /// List registered phases and exit
        #[arg(long, conflicts_with = "phase")]
        list: bool,
    },
    /// List registered phases and exit
    List,
}

fn print_listing(registry: &Registry) {
    let width = registry
        .listing()
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0);
    for (name, description) in registry.listing() {
        println!("{:<width$}  {}", name.bold(), description);
    }
}

fn apply_overrides(cli: &Cli) {
    if let Some(domain) = &cli.domain {
        AppConfig::set_school_domain(domain.clone());
    }
    if let Some(database) = &cli.database {
        AppConfig::set_database_path(database.clone());
    }
    if let Some(seed) = cli.seed {
        AppConfig::set_rng_seed(seed);
    }
    if let Some(level) = &cli.log_level {
        AppConfig::set_log_level(level.clone());
    }
    if cli.verbose {
        AppConfig::set_log_to_stdout(true);
    }
}

async fn seed(registry: &Registry, phase: Option<&str>) -> Result<Reporter, SeedError> {
    let (tenant, settings) = {
        let cfg = AppConfig::global();
        (TenantContext::from_config(&cfg), SeedSettings::from_config(&cfg))
    };

    let db = db::connect().await?;
    let result = async {
        Migrator::up(&db, None).await?;
        let orchestrator = Orchestrator::new(&db, &tenant, &settings, registry);
        let mut reporter = Reporter::new();
        match phase {
            Some(name) => orchestrator.run_single(name, &mut reporter).await?,
            None => orchestrator.run_all(&mut reporter).await?,
        };
        Ok::<_, SeedError>(reporter)
    }
    .await;

    if let Err(err) = db.close().await {
        log::warn!("Closing the database failed: {err}");
    }
    result
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    apply_overrides(&cli);

    if let Err(err) = common::logger::init_logger(
        &config::log_level(),
        &config::log_file(),
        config::log_to_stdout(),
    ) {
        eprintln!("Logging disabled: {err}");
    }

    let registry = match seeds::registry() {
        Ok(registry) => registry,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            return ExitCode::FAILURE;
        }
    };

    let phase = match cli.command {
        Some(Command::List) | Some(Command::Run { list: true, .. }) => {
            print_listing(&registry);
            return ExitCode::SUCCESS;
        }
        Some(Command::Run { phase, .. }) => phase,
        Some(Command::All) | None => None,
    };

    // Reject unknown names before a database is opened.
    if let Some(name) = &phase {
        if registry.get(name).is_none() {
            let err = SeedError::UnknownPhase(name.clone());
            eprintln!("{} {err}", "error:".red().bold());
            return ExitCode::FAILURE;
        }
    }

    log::info!("{} starting", config::project_name());
    match seed(&registry, phase.as_deref()).await {
        Ok(reporter) => {
            println!("\n{}", reporter.summarize());
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("Seeding failed: {err}");
            let mut source = err.source();
            while let Some(cause) = source {
                log::error!("  caused by: {cause}");
                source = cause.source();
            }
            eprintln!("{} {err}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

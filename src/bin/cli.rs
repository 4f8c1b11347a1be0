//! FoodLens CLI
//!
//! Command-line front-end for the FoodLens services:
//! - Log in, register, log out
//! - Analyze a meal photo
//! - List, filter and remove logged meals
//! - Generate a config file

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use foodlens::config::{generate_default_config, LoggingConfig};
use foodlens::flows::auth::authenticate;
use foodlens::{
    AuthForm, Config, Dashboard, FileSessionStore, FilterState, FoodLogEntry, HttpFoodApi,
    ImageUpload, RecognitionFlow, RecognitionOutcome, RecognitionResult, RefreshOutcome,
    SessionStore, WeightFilter,
};

#[derive(Parser)]
#[command(name = "foodlens")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Snap a meal, get its nutrition, keep a food log")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Service URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: ~/.config/foodlens/config.toml or ./foodlens.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and remember the session
    Login { username: String, password: String },

    /// Create an account and remember the session
    Register { username: String, password: String },

    /// Forget the stored session
    Logout,

    /// Show the stored session id
    Whoami,

    /// Recognize the dish in a photo and log it
    Analyze {
        /// Path to the image
        image: PathBuf,
        /// Portion weight in grams (default from config)
        #[arg(short, long)]
        weight: Option<u32>,
    },

    /// List logged meals
    Logs {
        /// Only dishes whose name contains this text
        #[arg(short, long, default_value = "")]
        search: String,
        /// Exact portion weight in grams, or "all"
        #[arg(short, long, default_value = "all")]
        weight: WeightFilter,
    },

    /// Remove a logged meal
    Remove {
        /// Entry id as shown by `foodlens logs`
        id: i64,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    init_logging(&config.logging);

    let api = HttpFoodApi::new(config.api.client_config())?;
    let store = FileSessionStore::new(&config.session.file);

    match cli.command {
        Commands::Login { username, password } => {
            login(&api, &store, AuthForm::new(), &username, &password).await?;
        }

        Commands::Register { username, password } => {
            let mut form = AuthForm::new();
            form.toggle();
            login(&api, &store, form, &username, &password).await?;
        }

        Commands::Logout => {
            match Dashboard::open(&store)? {
                Some(dashboard) => {
                    dashboard.logout(&store)?;
                    println!("Logged out");
                }
                None => println!("Not logged in"),
            }
        }

        Commands::Whoami => match store.load()? {
            Some(session) => println!("{}", session),
            None => {
                eprintln!("Not logged in");
                std::process::exit(1);
            }
        },

        Commands::Analyze { image, weight } => {
            let mut dashboard = open_dashboard(&store)?
                .with_recognition(RecognitionFlow::with_banner_display(config.banner_display()));
            dashboard.set_weight_grams(weight.unwrap_or(config.dashboard.default_weight));

            if !image.exists() {
                eprintln!("File not found: {:?}", image);
                std::process::exit(1);
            }
            let file_name = image
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "image".to_string());
            let bytes = std::fs::read(&image)?;
            let upload = ImageUpload::new(file_name.clone(), ImageUpload::mime_for(&file_name), bytes);

            println!("Tasting {} ({}g)...", file_name, dashboard.weight_grams());

            match dashboard.analyze(&api, Some(upload)).await {
                Ok(RecognitionOutcome::Recognized(result)) => {
                    print_result(&result);
                    println!();
                    print_logs(&dashboard, &cli.format)?;
                }
                Ok(_) | Err(_) => {
                    let message = dashboard
                        .recognition()
                        .banner()
                        .map(|b| b.message.clone())
                        .unwrap_or_else(|| "Analysis failed!".to_string());
                    eprintln!("{}", message);
                    std::process::exit(1);
                }
            }
        }

        Commands::Logs { search, weight } => {
            let mut dashboard = open_dashboard(&store)?;
            let outcome = match dashboard
                .apply_filter(&api, FilterState::new(search, weight))
                .await
            {
                Some(outcome) => outcome,
                None => dashboard.load(&api).await,
            };

            if let RefreshOutcome::Failed { message } = outcome {
                eprintln!("Could not load logs: {}", message);
                eprintln!("Make sure the FoodLens service is running at {}", config.api.base_url);
                std::process::exit(1);
            }
            print_logs(&dashboard, &cli.format)?;
        }

        Commands::Remove { id } => {
            let mut dashboard = open_dashboard(&store)?;
            match dashboard.remove(&api, id).await {
                Ok(_) => {
                    println!("Removed entry {}", id);
                    println!();
                    print_logs(&dashboard, &cli.format)?;
                }
                Err(e) => {
                    eprintln!("Remove failed: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("foodlens={}", logging.level)));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn login(
    api: &HttpFoodApi,
    store: &FileSessionStore,
    mut form: AuthForm,
    username: &str,
    password: &str,
) -> anyhow::Result<()> {
    match authenticate(&mut form, api, store, username, password).await {
        Ok(Some(session)) => {
            println!("Welcome aboard! Session {} saved to {:?}", session, store.path());
            Ok(())
        }
        Ok(None) | Err(_) => {
            eprintln!("{}", form.error().unwrap_or("Cosmic error detected!"));
            std::process::exit(1);
        }
    }
}

fn open_dashboard(store: &FileSessionStore) -> anyhow::Result<Dashboard> {
    match Dashboard::open(store)? {
        Some(dashboard) => Ok(dashboard),
        None => {
            eprintln!("Not logged in.");
            eprintln!();
            eprintln!("Log in first with:");
            eprintln!("  foodlens login <username> <password>");
            std::process::exit(1);
        }
    }
}

fn print_result(result: &RecognitionResult) {
    println!("{}", result.display_name());
    println!("Confidence: {}", result.confidence_label());
    println!("Nutrition:  {}", result.nutrition);
    if !result.summary.is_empty() {
        println!();
        println!("{}", result.summary_heading());
        println!("{}", result.summary);
    }
}

fn print_logs(dashboard: &Dashboard, format: &str) -> anyhow::Result<()> {
    let visible = dashboard.logs().visible();

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&visible)?);
        return Ok(());
    }

    if visible.is_empty() {
        if dashboard.logs().entries().is_empty() {
            println!("No meals logged yet.");
            println!();
            println!("Log your first one with:");
            println!("  foodlens analyze dinner.jpg --weight 200");
        } else {
            println!("No meals match the current filter");
        }
        return Ok(());
    }

    print_table(&visible);
    Ok(())
}

fn print_table(entries: &[&FoodLogEntry]) {
    println!(
        "{:<6} {:<24} {:<10} {:<7} {:<52} {}",
        "ID", "Dish", "Conf.", "Weight", "Nutrition", "Logged"
    );
    println!("{}", "-".repeat(120));

    for entry in entries {
        let logged = entry
            .timestamp
            .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:<6} {:<24} {:<10} {:<7} {:<52} {}",
            entry.id,
            entry.display_name(),
            entry.confidence_label(),
            entry.weight_label(),
            entry.nutrition.to_string(),
            logged
        );
    }
}

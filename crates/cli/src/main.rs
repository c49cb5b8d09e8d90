use anyhow::Context as _;
use clap::{Parser, Subcommand};
use jasper_core::validation::validate_profile;
use jasper_core::{
    BriefGenerator, CompletionClient, ContentRequest, CoreConfig, ProfileStore,
    DEFAULT_PROFILES_DIR,
};
use jasper_llm::{OpenAiClient, OpenAiConfig};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "jasper")]
#[command(about = "Jasper client profile and content brief CLI")]
struct Cli {
    /// Directory of client profile JSON files
    #[arg(long, global = true, env = "CLIENT_PROFILES_DIR", default_value = DEFAULT_PROFILES_DIR)]
    profiles_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all client profiles
    List,
    /// Print a stored client profile
    Show {
        /// Client id
        client_id: String,
    },
    /// Print the context block generated for a client
    Context {
        /// Client id
        client_id: String,
    },
    /// Print profile statistics
    Stats,
    /// Check a profile file without saving it
    Validate {
        /// Path to a profile JSON file
        file: PathBuf,
    },
    /// Validate a profile file and add it to the profile directory
    Add {
        /// Path to a profile JSON file
        file: PathBuf,
    },
    /// Generate a content brief and print it as JSON
    Generate {
        /// Blog topic
        topic: String,
        /// Client id whose stored profile should inform the brief
        #[arg(long)]
        client: Option<String>,
        /// Practice name when no stored profile is used
        #[arg(long, default_value = "")]
        name: String,
        /// Specialty when no stored profile is used
        #[arg(long, default_value = "")]
        specialty: String,
        /// Location when no stored profile is used
        #[arg(long, default_value = "")]
        location: String,
    },
}

fn open_store(profiles_dir: &Path) -> anyhow::Result<ProfileStore> {
    let cfg = CoreConfig::new(profiles_dir.to_path_buf())?;
    Ok(ProfileStore::open(&cfg)?)
}

fn read_json_file(path: &Path) -> anyhow::Result<Value> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("{} is not valid JSON", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("jasper=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::List) => {
            let store = open_store(&cli.profiles_dir)?;
            let clients = store.snapshot().summaries();
            if clients.is_empty() {
                println!("No client profiles found in {}.", cli.profiles_dir.display());
            } else {
                for client in clients {
                    println!(
                        "ID: {}, Name: {}, Specialty: {}, Location: {}",
                        client.id, client.name, client.specialty, client.location
                    );
                }
            }
        }
        Some(Commands::Show { client_id }) => {
            let store = open_store(&cli.profiles_dir)?;
            let snapshot = store.snapshot();
            let Some(profile) = snapshot.get(&client_id) else {
                anyhow::bail!("Client '{}' not found", client_id);
            };
            println!("{}", serde_json::to_string_pretty(profile.raw())?);
        }
        Some(Commands::Context { client_id }) => {
            let store = open_store(&cli.profiles_dir)?;
            let context = store.snapshot().client_context(&client_id);
            if context.is_empty() {
                println!("No context available for '{}'.", client_id);
            } else {
                println!("{}", context);
            }
        }
        Some(Commands::Stats) => {
            let store = open_store(&cli.profiles_dir)?;
            println!("{}", serde_json::to_string_pretty(&store.snapshot().stats())?);
        }
        Some(Commands::Validate { file }) => {
            let value = read_json_file(&file)?;
            let issues = validate_profile(&value);
            if !issues.is_empty() {
                for issue in &issues {
                    eprintln!("- {}", issue);
                }
                anyhow::bail!("{} has {} issue(s)", file.display(), issues.len());
            }
            println!("{} is a valid client profile.", file.display());
        }
        Some(Commands::Add { file }) => {
            let value = read_json_file(&file)?;
            let store = open_store(&cli.profiles_dir)?;
            let profile = store.add(value)?;
            println!(
                "Added client '{}' to {}",
                profile.id,
                store.dir().display()
            );
        }
        Some(Commands::Generate {
            topic,
            client,
            name,
            specialty,
            location,
        }) => {
            let openai = OpenAiConfig::from_env_values(
                std::env::var("OPENAI_API_KEY").ok(),
                std::env::var("OPENAI_BASE_URL").ok(),
                std::env::var("OPENAI_MODEL").ok(),
            )
            .context("OPENAI_API_KEY is not set")?;
            let completion: Arc<dyn CompletionClient> = Arc::new(OpenAiClient::new(openai)?);

            let store = Arc::new(open_store(&cli.profiles_dir)?);
            let generator = BriefGenerator::new(store, Some(completion));
            let outcome = generator
                .generate(&ContentRequest {
                    blog_topic: topic,
                    client_id: client,
                    client_name: name,
                    specialty,
                    location,
                })
                .await;

            match outcome.content {
                Some(brief) if outcome.success => {
                    if let Some(message) = outcome.message {
                        eprintln!("{}", message);
                    }
                    println!("{}", serde_json::to_string_pretty(&brief)?);
                }
                _ => anyhow::bail!(
                    "{}",
                    outcome.error.unwrap_or_else(|| "generation failed".into())
                ),
            }
        }
        None => {
            println!("Use 'jasper --help' for commands");
        }
    }

    Ok(())
}

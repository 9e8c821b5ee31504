//! aimo-plugin CLI
//!
//! Exercise the plugin outside a host runtime: check wallet configuration,
//! inspect resolved models and run one-off generations.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

use aimo_plugin::config::{
    BASE_URL_KEY, CHAIN_ID_KEY, PRIVATE_KEY_KEY, WALLET_TYPE_KEY,
};
use aimo_plugin::{
    build_signer, generate_object, generate_text, ConfigResolver, GenerateObjectParams,
    GenerateTextParams, MapSettings, ModelTier, ProviderError,
};

/// aimo-plugin: AiMo network model provider
#[derive(Parser)]
#[command(name = "aimo-plugin")]
#[command(about = "Wallet-authenticated access to the AiMo inference network", long_about = None)]
struct Cli {
    /// Runtime setting override (repeatable), e.g. --set AIMO_CHAIN_ID=devnet
    #[arg(long = "set", value_name = "KEY=VALUE", global = true)]
    settings: Vec<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate wallet configuration and show the signer
    Check,

    /// Show resolved model names and endpoint
    Models,

    /// Generate text
    Generate {
        /// Prompt text
        #[arg(value_name = "PROMPT")]
        prompt: String,

        /// Model tier
        #[arg(short, long, default_value = "small")]
        tier: ModelTier,

        /// System prompt
        #[arg(short, long)]
        system: Option<String>,

        /// Maximum output tokens
        #[arg(long)]
        max_tokens: Option<u32>,
    },

    /// Generate a JSON object
    Object {
        /// Prompt text
        #[arg(value_name = "PROMPT")]
        prompt: String,

        /// Model tier
        #[arg(short, long, default_value = "small")]
        tier: ModelTier,

        /// JSON schema the output must follow
        #[arg(long)]
        schema: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Failed to install log subscriber");
    }

    let mut settings = MapSettings::new();
    for assignment in &cli.settings {
        if let Err(e) = settings.set_assignment(assignment) {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    }

    let result = match cli.command {
        Commands::Check => check(&settings),
        Commands::Models => {
            models(&settings);
            Ok(())
        }
        Commands::Generate {
            prompt,
            tier,
            system,
            max_tokens,
        } => {
            let params = GenerateTextParams {
                system,
                max_tokens,
                ..GenerateTextParams::new(prompt)
            };
            generate_text(&settings, tier, &params)
                .await
                .map(|text| println!("{}", text))
        }
        Commands::Object {
            prompt,
            tier,
            schema,
        } => run_object(&settings, tier, prompt, schema).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn check(settings: &MapSettings) -> Result<(), ProviderError> {
    let resolver = ConfigResolver::new(settings);
    let signer = build_signer(&resolver.require_signer_config()?)?;

    println!("┌─────────────────────────────────────────────────────────────┐");
    println!("│  AIMO WALLET                                                │");
    println!("├─────────────────────────────────────────────────────────────┤");
    println!("│  Wallet type: {}", signer.wallet_type());
    println!("│  Address:     {}", signer.address());
    println!("│  Chain:       {}", signer.chain());
    println!("│  Endpoint:    {}", resolver.base_url());
    println!("└─────────────────────────────────────────────────────────────┘");
    Ok(())
}

fn models(settings: &MapSettings) {
    let resolver = ConfigResolver::new(settings);
    let show = |key: &str| resolver.resolve_setting(key, None).unwrap_or_else(|| "-".into());

    println!("┌─────────────────────────────────────────────────────────────┐");
    println!("│  AIMO CONFIGURATION                                         │");
    println!("├─────────────────────────────────────────────────────────────┤");
    println!("│  Small model: {}", resolver.model_name(ModelTier::Small));
    println!("│  Large model: {}", resolver.model_name(ModelTier::Large));
    println!("│  Endpoint:    {}", resolver.base_url());
    println!("│  {}: {}", WALLET_TYPE_KEY, show(WALLET_TYPE_KEY));
    println!(
        "│  {}: {}",
        PRIVATE_KEY_KEY,
        if resolver.private_key().is_some() { "[set]" } else { "-" }
    );
    println!("│  {}: {}", CHAIN_ID_KEY, show(CHAIN_ID_KEY));
    println!("│  {}: {}", BASE_URL_KEY, show(BASE_URL_KEY));
    println!("└─────────────────────────────────────────────────────────────┘");
}

async fn run_object(
    settings: &MapSettings,
    tier: ModelTier,
    prompt: String,
    schema: Option<String>,
) -> Result<(), ProviderError> {
    let schema = schema
        .map(|raw| serde_json::from_str(&raw))
        .transpose()
        .map_err(|e| ProviderError::InvalidRequest(format!("Invalid --schema: {}", e)))?;

    let params = GenerateObjectParams {
        schema,
        ..GenerateObjectParams::new(prompt)
    };
    let value = generate_object(settings, tier, &params).await?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

//! Lead intake bot binary.
//!
//! Start the bot with:
//! ```bash
//! BOT_TOKEN=xxx ADMIN_CHAT_ID=-100xxx cargo run -p leadbot-telegram
//! ```

use clap::Parser;
use leadbot_telegram::config::{DEFAULT_HEALTH_PORT, DEFAULT_SESSION_TTL_SECS};
use leadbot_telegram::{health, BotConfig, LeadBot};
use tracing_subscriber::EnvFilter;

/// Lead intake bot - books trial lessons over Telegram
#[derive(Parser, Debug)]
#[command(name = "leadbot-telegram")]
#[command(about = "Telegram bot collecting trial lesson requests")]
struct Args {
    /// Health probe port
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_HEALTH_PORT)]
    port: u16,

    /// Do not start the health probe listener
    #[arg(long)]
    no_health: bool,

    /// Idle session lifetime in seconds (0 keeps sessions forever)
    #[arg(long, env = "SESSION_TTL_SECS", default_value_t = DEFAULT_SESSION_TTL_SECS)]
    session_ttl: u64,

    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env.local or .env before clap reads env-backed arguments
    let _ = dotenvy::from_filename(".env.local").or_else(|_| dotenvy::dotenv());

    let args = Args::parse();

    // Initialize logging based on verbosity
    let filter = match args.verbose {
        0 => "leadbot_telegram=info,leadbot_core=info,teloxide=warn",
        1 => "leadbot_telegram=debug,leadbot_core=debug,teloxide=info",
        2 => "leadbot_telegram=trace,leadbot_core=trace,teloxide=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = BotConfig::from_env()?
        .with_health_port(args.port)
        .with_session_ttl_secs(args.session_ttl);

    let bot = LeadBot::new(&config);

    match bot.get_me().await {
        Ok(username) => {
            tracing::info!(
                username = %username,
                admin_chat_id = ?config.admin_chat_id.map(|c| c.0),
                "Bot initialized successfully"
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to get bot info");
            return Err(e.into());
        }
    }

    if !args.no_health {
        let addr = config.health_address();
        tokio::spawn(async move {
            if let Err(e) = health::serve(&addr).await {
                tracing::error!(error = %e, addr = %addr, "Health probe stopped");
            }
        });
    }

    bot.start_polling().await?;

    Ok(())
}

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::Instrument;
use tracing_subscriber::EnvFilter;

use walls_battle::{Hook, HookEvent, HookRegistry};
use walls_bot::{AccountConfig, Bot, BotConfig, BotContext, HealOnLowHealth};
use walls_client::{API_URL, Credentials, GameClient, HttpTransport};

#[derive(Parser, Debug)]
#[command(name = "walls-bot", about = "Run War of Walls bots from a TOML config")]
struct Cli {
    /// Path to the bot configuration
    #[arg(short, long, env = "WALLS_CONFIG", default_value = "bots.toml")]
    config: PathBuf,

    /// Only start the named accounts (repeatable)
    #[arg(long = "only", value_name = "NAME")]
    only: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = BotConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    tracing::info!("War of Walls Bot starting");

    let base_url = config.base_url.as_deref().unwrap_or(API_URL);
    let timing = config.timing.to_timing();
    let mut started = 0;

    for account in config
        .accounts
        .iter()
        .filter(|a| cli.only.is_empty() || cli.only.iter().any(|n| n == a.display_name()))
    {
        let span = tracing::info_span!("bot", account = %account.display_name());

        let bot = match build_bot(account, base_url, timing).instrument(span.clone()).await {
            Ok(bot) => bot,
            Err(e) => {
                let _guard = span.enter();
                tracing::error!(error = %e, "Failed to start bot");
                continue;
            }
        };

        tokio::spawn(bot.run_forever().instrument(span));
        started += 1;
    }

    if started == 0 {
        bail!("no bot could be started");
    }

    shutdown_signal().await;
    tracing::warn!("Shutting down bots...");

    // bots hold no state worth flushing
    std::process::exit(0)
}

async fn build_bot(
    account: &AccountConfig,
    base_url: &str,
    timing: walls_battle::CombatTiming,
) -> Result<Bot<GameClient>> {
    let transport = HttpTransport::new(base_url);

    let client = match (&account.token, &account.password) {
        (Some(token), password) => {
            let credentials = password
                .as_ref()
                .map(|password| Credentials::new(&account.username, password));
            GameClient::with_transport(transport, token.clone(), credentials)
        }
        (None, Some(password)) => {
            tracing::info!(username = %account.username, "Logging in...");
            GameClient::login_with_transport(transport, &account.username, password).await?
        }
        (None, None) => bail!("account has neither a token nor a password"),
    };
    let api = Arc::new(client);

    let mut hooks = HookRegistry::new();
    if let Some(item) = &account.heal_item {
        let heal: Arc<dyn Hook> = Arc::new(HealOnLowHealth::new(
            api.clone(),
            item.clone(),
            account.heal_below_percent(),
        ));
        hooks.register_shared(HookEvent::CycleStarted, heal.clone());
        hooks.register_shared(HookEvent::AfterAttack, heal);
    }

    let strategy = account.strategy.build::<GameClient>()?;
    let ctx = BotContext::new(api, hooks, timing);

    Ok(Bot::from_boxed(ctx, strategy))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }
}

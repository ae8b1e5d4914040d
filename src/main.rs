use clap::{Args, Parser, Subcommand};
use std::sync::Arc;
use tgbot_api::{
    bot::{ChatAction, ChatActionConfig, MessageConfig},
    Bot, Poller, PollerState,
};
use tgbot_core::{config, config::PollConfig, types::Update};
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "tgbot",
    version,
    about = "Telegram Bot API client with a long-polling update stream"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Bot token, overrides `[bot].token`.
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the identity of the bot behind the token.
    Me,
    /// Print every incoming update as one JSON line.
    Listen(PollArgs),
    /// Echo every text message back to the chat it came from.
    Echo(PollArgs),
}

#[derive(Args)]
struct PollArgs {
    /// Resume from this update id (overrides `[polling].offset`).
    #[arg(long)]
    offset: Option<i64>,
    /// Long-poll timeout in seconds (overrides `[polling].timeout_secs`).
    #[arg(long)]
    timeout: Option<u64>,
}

impl PollArgs {
    fn apply(&self, mut config: PollConfig) -> PollConfig {
        if let Some(offset) = self.offset {
            config.offset = offset;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut cfg = config::load(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.bot.log_level)),
        )
        .init();

    if let Some(token) = cli.token {
        cfg.bot.token = token;
    }
    if cfg.bot.token.is_empty() {
        anyhow::bail!(
            "bot token is empty. Set [bot].token in {} or the TELEGRAM_BOT_TOKEN env var.",
            cli.config
        );
    }

    let bot = Bot::from_config(&cfg.bot);

    match cli.command {
        Commands::Me => {
            let me = bot.get_me().await?;
            println!("{} (id {})", me.display_name(), me.id);
        }
        Commands::Listen(args) => {
            listen(bot, args.apply(cfg.polling)).await?;
        }
        Commands::Echo(args) => {
            echo(Arc::new(bot), args.apply(cfg.polling)).await?;
        }
    }

    Ok(())
}

/// Next update, stopping the poller on Ctrl-C and draining what it already
/// published. `None` once the stream has ended.
async fn next_update(
    poller: &Poller<Bot>,
    updates: &mut mpsc::Receiver<Update>,
) -> Option<Update> {
    loop {
        tokio::select! {
            update = updates.recv() => return update,
            _ = tokio::signal::ctrl_c(), if poller.state() == PollerState::Running => {
                info!("Received shutdown signal");
                poller.stop();
            }
        }
    }
}

async fn listen(bot: Bot, config: PollConfig) -> anyhow::Result<()> {
    let mut poller = Poller::new(Arc::new(bot));
    let mut updates = poller.start(config)?;

    while let Some(update) = next_update(&poller, &mut updates).await {
        println!("{}", serde_json::to_string(&update)?);
    }

    poller.wait().await;
    eprintln!("resume with --offset {}", poller.cursor());
    Ok(())
}

async fn echo(bot: Arc<Bot>, config: PollConfig) -> anyhow::Result<()> {
    let me = bot.get_me().await?;
    info!("echoing as {}", me.display_name());

    let mut poller = Poller::new(bot.clone());
    let mut updates = poller.start(config)?;

    while let Some(update) = next_update(&poller, &mut updates).await {
        let Some(msg) = update.message else {
            continue;
        };
        let Some(text) = msg.text.as_deref() else {
            continue;
        };
        let chat_id = msg.chat.id;
        info!(chat_id, "echoing message {}", msg.message_id);

        if let Err(e) = bot
            .send_chat_action(&ChatActionConfig::new(chat_id, ChatAction::Typing))
            .await
        {
            warn!("sendChatAction failed: {e}");
        }
        let reply = MessageConfig::new(chat_id, text).reply_to(msg.message_id);
        if let Err(e) = bot.send_message(&reply).await {
            warn!("echo to {chat_id} failed: {e}");
        }
    }

    poller.wait().await;
    eprintln!("resume with --offset {}", poller.cursor());
    Ok(())
}

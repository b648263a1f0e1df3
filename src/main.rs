use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use pasta_bot::application::errors::BotError;
use pasta_bot::application::messaging::{run_message_loop, LoopExit, MessageDispatcher};
use pasta_bot::application::services::{CommandService, GlobalCooldown};
use pasta_bot::domain::traits::Transport;
use pasta_bot::infrastructure::adapters::{ConsoleTransport, TwitchConfig, TwitchTransport};
use pasta_bot::infrastructure::config::{self, CommandFile, LogConfig, Settings};
use pasta_bot::infrastructure::logging;

#[derive(Parser)]
#[command(name = "pasta-bot")]
#[command(about = "Canned-reply auto-responder for Twitch chat", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Command file path (overrides COMMANDS_FILE)
    #[arg(short, long, global = true)]
    commands: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run {
        /// Read chat from stdin instead of connecting to Twitch
        #[arg(long)]
        console: bool,
    },
    /// Validate the command file and print the command list
    Check,
    /// Print a sample command file
    InitConfig,
    /// Show version
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { console } => run(cli.commands, console),
        Commands::Check => check(cli.commands),
        Commands::InitConfig => init_config(),
        Commands::Version => {
            println!("pasta-bot v{}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
    }
}

fn run(commands_override: Option<PathBuf>, console: bool) -> ExitCode {
    let dotenv = dotenvy::dotenv();

    let _log_guard = logging::init(&LogConfig::from_lookup(|key| std::env::var(key).ok()));
    if let Err(e) = dotenv {
        tracing::warn!("Could not load .env file: {}", e);
    }

    let mut settings = match Settings::load_env() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(path) = commands_override {
        settings.commands_file = path;
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run_bot(settings, console)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_bot(settings: Settings, console: bool) -> Result<(), BotError> {
    let table = Arc::new(CommandService::load(&settings.commands_file)?);
    let identity = settings.identity();
    let cooldown = Arc::new(GlobalCooldown::new(identity.cooldown));
    let dispatcher = Arc::new(MessageDispatcher::new(table, cooldown, identity.clone()));

    let transport: Arc<dyn Transport> = if console {
        Arc::new(ConsoleTransport::stdin(&identity.channel))
    } else {
        let twitch = TwitchConfig::new(&settings.bot_name, settings.require_token()?);
        Arc::new(TwitchTransport::connect(&twitch).await?)
    };

    transport.join(&identity.channel).await?;

    tracing::info!(
        channel = %identity.channel,
        bot_username = %identity.bot_name,
        mention_only = identity.mention_only,
        cooldown_seconds = settings.cooldown_seconds,
        platform = transport.platform_name(),
        "Bot started"
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    match run_message_loop(dispatcher, Arc::clone(&transport), shutdown).await {
        LoopExit::Shutdown => {
            tracing::info!("Shutting down");
            Ok(())
        }
        LoopExit::InputClosed if console => {
            tracing::info!("Console input closed, stopping");
            Ok(())
        }
        LoopExit::InputClosed => Err(BotError::Connection(format!(
            "{} connection closed",
            transport.platform_name()
        ))),
    }
}

fn check(commands_override: Option<PathBuf>) -> ExitCode {
    dotenvy::dotenv().ok();
    let path = commands_override
        .unwrap_or_else(|| config::commands_file_from_lookup(|key| std::env::var(key).ok()));

    match CommandService::load(&path) {
        Ok(table) => {
            println!("{}: {} commands", path.display(), table.len());
            println!("{}", table.list_all());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_config() -> ExitCode {
    match CommandFile::sample().to_yaml() {
        Ok(yaml) => {
            println!("{}", yaml);
            println!("# Save this to {} and adjust as needed.", config::DEFAULT_COMMANDS_FILE);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

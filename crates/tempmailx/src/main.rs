//! `TempMailX` - disposable email addresses from the terminal.

mod clipboard;
mod i18n;
mod notifier;
mod render;
mod settings;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tempmailx_api::{ApiClient, Provider};
use tempmailx_core::{
    FileSessionStore, KeyringSessionStore, MemorySessionStore, SessionConfig, SessionController,
    SessionState, SessionStore,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use i18n::{Labels, Language};
use notifier::DesktopNotifier;

const DEFAULT_FILTER: &str = "tempmailx=info,tempmailx_core=info,tempmailx_api=warn";

type Controller = SessionController<ApiClient, Box<dyn SessionStore>>;

#[derive(Parser)]
#[command(name = "tempmailx", version)]
#[command(about = "Disposable email addresses from the terminal", long_about = None)]
struct Cli {
    /// Provider base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Seconds between inbox polls
    #[arg(long, global = true)]
    poll_secs: Option<u64>,

    /// Where the session is kept between runs
    #[arg(long, value_enum, default_value_t = StoreKind::File, global = true)]
    store: StoreKind,

    /// Display language for this run
    #[arg(long, value_enum, global = true)]
    lang: Option<Language>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show the address and print new mail as it arrives (default)
    Watch,
    /// Print the current address, creating one if needed
    Address {
        /// Also copy the address to the clipboard
        #[arg(long)]
        copy: bool,
    },
    /// Discard the current address and create a new one
    New {
        /// Also copy the new address to the clipboard
        #[arg(long)]
        copy: bool,
    },
    /// Fetch and list the inbox once
    Inbox,
    /// Print a full message
    Read {
        /// Message id as shown by `inbox`
        id: String,
    },
    /// Save the display language
    Lang {
        #[arg(value_enum)]
        language: Language,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StoreKind {
    /// JSON files in the user data directory
    File,
    /// System keyring
    Keyring,
    /// Nothing survives the process
    Memory,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut settings = settings::load().await.unwrap_or_else(|e| {
        warn!("Ignoring unreadable settings: {e}");
        settings::AppSettings::default()
    });

    if let Some(Command::Lang { language }) = cli.command {
        settings.language = language;
        settings::save(&settings).await?;
        println!("{}", language.labels().language_saved);
        return Ok(());
    }

    let labels = cli.lang.unwrap_or(settings.language).labels();
    let controller = Arc::new(build_controller(&cli, &settings, labels)?);

    match cli.command.unwrap_or(Command::Watch) {
        Command::Watch => watch(&controller, labels).await,
        Command::Address { copy } => {
            ensure_session(&controller, labels).await?;
            print_address(&controller, labels);
            if copy && let Some(account) = controller.account() {
                copy_address(&account.address, labels)?;
            }
            Ok(())
        }
        Command::New { copy } => {
            println!("{}", labels.loading_email);
            let account = controller
                .new_address()
                .await
                .with_context(|| labels.retry_hint)?;
            print!("{}", render::new_address(labels, &account.address));
            if copy {
                copy_address(&account.address, labels)?;
            }
            Ok(())
        }
        Command::Inbox => {
            ensure_session(&controller, labels).await?;
            controller.refresh().await?;
            print!("{}", render::inbox(labels, &controller.messages()));
            Ok(())
        }
        Command::Read { id } => {
            ensure_session(&controller, labels).await?;
            let message = controller.fetch_message(&id).await?;
            print!("{}", render::message(labels, &message));
            Ok(())
        }
        Command::Lang { .. } => Ok(()),
    }
}

fn build_controller(
    cli: &Cli,
    settings: &settings::AppSettings,
    labels: &Labels,
) -> anyhow::Result<Controller> {
    let base_url = cli.api_url.as_deref().unwrap_or(&settings.api_base_url);
    let provider = Provider::new("mail.tm", base_url)
        .with_context(|| format!("Invalid provider URL {base_url}"))?;

    let poll_secs = cli.poll_secs.unwrap_or(settings.poll_interval_secs);
    let config = SessionConfig::new().with_poll_interval(Duration::from_secs(poll_secs));

    let controller = SessionController::new(
        ApiClient::new(provider),
        open_store(cli.store),
        Box::new(DesktopNotifier::new(labels.app_name)),
        config,
    )?;
    Ok(controller)
}

fn open_store(kind: StoreKind) -> Box<dyn SessionStore> {
    match kind {
        StoreKind::File => {
            let dir = dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("tempmailx");
            Box::new(FileSessionStore::new(dir))
        }
        StoreKind::Keyring => Box::new(KeyringSessionStore::default()),
        StoreKind::Memory => Box::new(MemorySessionStore::new()),
    }
}

async fn ensure_session(controller: &Controller, labels: &Labels) -> anyhow::Result<()> {
    if controller.state() == SessionState::Uninitialized {
        println!("{}", labels.loading_email);
    }
    controller.start().await.with_context(|| labels.retry_hint)?;
    Ok(())
}

fn print_address(controller: &Controller, labels: &Labels) {
    if let Some(account) = controller.account() {
        println!("{}: {}", labels.your_temp_email, account.address);
    }
}

fn copy_address(address: &str, labels: &Labels) -> anyhow::Result<()> {
    clipboard::copy(address).context("Failed to copy to clipboard")?;
    println!("{}", labels.copied);
    Ok(())
}

async fn watch(controller: &Arc<Controller>, labels: &Labels) -> anyhow::Result<()> {
    println!("{} - {}", labels.app_name, labels.tagline);
    ensure_session(controller, labels).await?;

    let mut updates = controller.subscribe();
    let mut shown = updates.borrow_and_update().clone();
    print_address(controller, labels);

    let poller = controller.spawn_polling();
    info!("Watching inbox, press Ctrl-C to stop");

    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result.context("Failed to listen for Ctrl-C")?;
                break;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let latest = updates.borrow_and_update().clone();
                if let Some(out) = render::changes(labels, &shown, &latest) {
                    print!("{out}");
                }
                shown = latest;
            }
        }
    }

    controller.shutdown();
    poller.await.context("Poll task panicked")?;
    Ok(())
}

//! menukit — Demo CLI
//!
//! Loads a TOML menu document and drives simulated players through it
//! against a console display backend.
//!
//! Usage:
//!   cargo run -p demo -- walkthrough
//!   cargo run -p demo -- walkthrough --menu demo/menus/shop.toml --settings demo/settings.toml
//!   cargo run -p demo -- show --player Alex --json

mod console;

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use menukit_contracts::{
    error::{MenuError, MenuResult},
    lifecycle::OpenOutcome,
    settings::PluginSettings,
};
use menukit_core::{events::EventBus, host::HostServices, BasicExpressionEngine};
use menukit_menu::SimpleMenu;

use console::{ConsoleBackend, ConsoleHost, FrameFormat};

// ── CLI definition ────────────────────────────────────────────────────────────

/// menukit — configuration-driven menu sessions.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "menukit menu session demo",
    long_about = "Loads a menu document and plays simulated players through it,\n\
                  printing every frame, chat message, and close decision."
)]
struct Cli {
    /// Menu document to load. The file stem is the menu name.
    #[arg(long, global = true, default_value = "demo/menus/shop.toml")]
    menu: PathBuf,

    /// Plugin settings (TOML). Defaults apply when omitted.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Print frames as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scripted session: denied open, paid open, cursor moves, refresh,
    /// vetoed close, forced close, and shutdown.
    Walkthrough,
    /// Open the menu once for one player, bypassing every gate, and print
    /// the frame.
    Show {
        #[arg(long, default_value = "Steve")]
        player: String,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let format = if cli.json { FrameFormat::Json } else { FrameFormat::Text };

    let result = match load_settings(cli.settings.as_deref()) {
        Ok(settings) => match cli.command {
            Command::Walkthrough => walkthrough(&cli.menu, settings, format).await,
            Command::Show { player } => show(&cli.menu, settings, format, &player),
        },
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => println!("Done."),
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Wiring ────────────────────────────────────────────────────────────────────

fn load_settings(path: Option<&Path>) -> MenuResult<PluginSettings> {
    match path {
        Some(path) => PluginSettings::from_toml_str(&read(path)?),
        None => Ok(PluginSettings::default()),
    }
}

fn read(path: &Path) -> MenuResult<String> {
    std::fs::read_to_string(path).map_err(|e| MenuError::ConfigError {
        reason: format!("cannot read {}: {}", path.display(), e),
    })
}

struct World {
    host: Arc<ConsoleHost>,
    backend: Arc<ConsoleBackend>,
    menu: Arc<SimpleMenu>,
    _bus: Arc<EventBus>,
}

fn build_world(path: &Path, settings: PluginSettings, format: FrameFormat) -> MenuResult<World> {
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| MenuError::ConfigError {
            reason: format!("cannot derive a menu name from {}", path.display()),
        })?
        .to_string();

    let host = Arc::new(ConsoleHost::default());
    let bus = Arc::new(EventBus::new());
    let backend = Arc::new(ConsoleBackend::new(&name, host.clone(), &bus, format));
    let services = HostServices {
        settings: Arc::new(settings),
        variables: host.clone(),
        expressions: Arc::new(BasicExpressionEngine),
        messenger: host.clone(),
        permissions: host.clone(),
        commands: host.clone(),
        economy: host.clone(),
        runtime: HostServices::current_runtime()?,
    };

    let menu = Arc::new(SimpleMenu::new(name, backend.clone(), services));
    menu.load_toml(&read(path)?)?;
    menu.register_handlers(&bus);
    Ok(World { host, backend, menu, _bus: bus })
}

fn step(title: &str) {
    println!();
    println!("── {} ", title);
}

fn report(outcome: &OpenOutcome) {
    match outcome {
        OpenOutcome::Opened => println!("  => opened"),
        OpenOutcome::NoPermission { permission } => println!("  => refused: missing {}", permission),
        OpenOutcome::RequirementFailed => println!("  => refused: requirements not met"),
    }
}

/// Let action pipelines and refresh ticks run.
async fn pause(millis: u64) {
    tokio::time::sleep(Duration::from_millis(millis)).await;
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

fn show(path: &Path, settings: PluginSettings, format: FrameFormat, player: &str) -> MenuResult<()> {
    let world = build_world(path, settings, format)?;
    let player = world.host.join(player);
    report(&world.menu.attempt_open(player, true)?);
    world.menu.close_all();
    Ok(())
}

async fn walkthrough(path: &Path, settings: PluginSettings, format: FrameFormat) -> MenuResult<()> {
    let world = build_world(path, settings, format)?;
    let (host, menu) = (&world.host, &world.menu);
    let permission = menu.definition().permission.clone();

    let alex = host.join("Alex");
    host.set_hour(12);

    step("Alex opens the menu without permission");
    report(&menu.attempt_open(alex, false)?);

    step("Alex has permission but no coins");
    host.grant(alex, &permission);
    report(&menu.attempt_open(alex, false)?);
    pause(50).await;

    step("Alex earns 12 coins and opens the menu");
    host.deposit(alex, 12.0);
    report(&menu.attempt_open(alex, false)?);
    pause(50).await;

    step("Alex browses the catalog");
    for _ in 0..2 {
        for slot in menu.layout().occupied_slots() {
            if menu.advance_slot(&alex, slot, 1) {
                println!("  slot {} shows the next item", slot);
            }
        }
    }

    step("The menu refreshes on its own");
    pause(1100).await;

    step("Alex tries to leave without a receipt");
    let closed = world.backend.player_closes(alex);
    println!("  => closed: {}", closed);
    pause(50).await;

    step("Alex takes the receipt and leaves");
    host.grant(alex, "bazaar.receipt");
    let closed = world.backend.player_closes(alex);
    println!("  => closed: {}", closed);
    pause(1200).await;

    step("Alex comes back, the list cursor is kept");
    report(&menu.attempt_open(alex, false)?);

    step("The server closes Alex's menu, skipping the close requirements");
    menu.force_close(alex);
    println!("  => state: {:?}", menu.state(&alex));

    step("Night falls; the menu refuses new visitors");
    host.deposit(alex, 10.0);
    host.set_hour(23);
    report(&menu.attempt_open(alex, false)?);
    pause(50).await;

    step("An operator opens it anyway and the server shuts down");
    report(&menu.attempt_open(alex, true)?);
    menu.close_all();
    Ok(())
}

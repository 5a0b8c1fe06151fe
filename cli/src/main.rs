use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use respawn_cli::app::App;
use respawn_cli::commands;
use respawn_cli::readline;
use respawn_cli::sandbox::DEFAULT_WORLD;
use respawn_core::config::default_config_path;
use tracing_subscriber::EnvFilter;

/// Process arguments
#[derive(Parser)]
#[command(version, about = "Sandbox server for the respawn gate")]
struct Options {
    /// Configuration file, created with defaults if missing
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_logging();

    let options = Options::parse();
    let path = options
        .config
        .or_else(default_config_path)
        .ok_or("error: No configuration directory available")?;
    let app = App::open(path)?;

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &app) {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                writeln!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    // If RESPAWN_LOG_PATH is set, append to that file instead of stderr
    if let Ok(path) = std::env::var("RESPAWN_LOG_PATH") {
        if let Ok(file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
        {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(file)
                .init();
            return;
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Parser)]
#[command(version, about = "respawn sandbox")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Bring a player online
    Join {
        name: String,
        #[arg(short, long, default_value = DEFAULT_WORLD)]
        world: String,
    },
    Grant {
        name: String,
        permission: String,
    },
    Revoke {
        name: String,
        permission: String,
    },
    /// Teleport a player
    Move {
        name: String,
        world: String,
        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
        x: i64,
        #[arg(short, long, default_value_t = 64, allow_negative_numbers = true)]
        y: i64,
        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
        z: i64,
    },
    /// Type a command as a player
    Run {
        name: String,
        label: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Type a command on the console
    Console {
        label: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    Players,
    Active,
    Config,
    Exit,
}

fn respond(line: &str, app: &App) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "respawn".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match &cli.command {
        Some(Commands::Join { name, world }) => commands::join(app, name, world)?,
        Some(Commands::Grant { name, permission }) => {
            commands::set_permission(app, name, permission, true)?
        }
        Some(Commands::Revoke { name, permission }) => {
            commands::set_permission(app, name, permission, false)?
        }
        Some(Commands::Move {
            name,
            world,
            x,
            y,
            z,
        }) => commands::move_player(app, name, world, *x, *y, *z)?,
        Some(Commands::Run { name, label, args }) => commands::run_as(app, name, label, args)?,
        Some(Commands::Console { label, args }) => commands::run_console(app, label, args)?,
        Some(Commands::Players) => commands::list_players(app),
        Some(Commands::Active) => commands::show_active(app),
        Some(Commands::Config) => commands::show_settings(app),
        Some(Commands::Exit) => {
            commands::exit();
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}

//! REPL command implementations. Each prints its own output.

use respawn_core::{AdmissionResult, BlockLocation, Caller, SubjectId};

use crate::app::App;

pub fn join(app: &App, name: &str, world: &str) -> Result<(), String> {
    let subject = app.sandbox.join(name, world)?;
    println!("{} joined {} ({})", subject.name, world, subject.id);
    Ok(())
}

pub fn set_permission(app: &App, name: &str, key: &str, granted: bool) -> Result<(), String> {
    let subject = app.sandbox.find(name).ok_or_else(|| unknown_player(name))?;
    app.sandbox.set_permission(subject.id, key, granted);
    let verb = if granted { "granted" } else { "revoked" };
    println!("{} {} for {}", key, verb, subject.name);
    Ok(())
}

pub fn move_player(app: &App, name: &str, world: &str, x: i64, y: i64, z: i64) -> Result<(), String> {
    let subject = app.sandbox.find(name).ok_or_else(|| unknown_player(name))?;
    app.sandbox
        .teleport(subject.id, BlockLocation::new(world, x, y, z));
    println!("{} moved to {} ({}, {}, {})", subject.name, world, x, y, z);
    Ok(())
}

/// Type `/label args...` as the named player
pub fn run_as(app: &App, name: &str, label: &str, args: &[String]) -> Result<(), String> {
    let subject = app.sandbox.find(name).ok_or_else(|| unknown_player(name))?;
    run(app, &Caller::Player(subject), label, args)
}

/// Type `label args...` on the server console
pub fn run_console(app: &App, label: &str, args: &[String]) -> Result<(), String> {
    run(app, &Caller::Console, label, args)
}

fn run(app: &App, caller: &Caller, label: &str, args: &[String]) -> Result<(), String> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match app.dispatch(caller, label, &args)? {
        AdmissionResult::Accepted => println!("=> accepted"),
        AdmissionResult::Reloaded => println!("=> reloaded"),
        AdmissionResult::Rejected(rejection) => println!("=> rejected: {}", rejection),
    }
    Ok(())
}

pub fn list_players(app: &App) {
    let players = app.sandbox.players();
    if players.is_empty() {
        println!("No players online");
        return;
    }

    for player in players {
        let mut permissions: Vec<_> = player.permissions.iter().map(String::as_str).collect();
        permissions.sort_unstable();
        println!(
            "  {:<16} {} ({}, {}, {})  [{}]",
            player.subject.name,
            player.location.world,
            player.location.x,
            player.location.y,
            player.location.z,
            permissions.join(", ")
        );
    }
}

/// Subjects with an unhandled protected action, and armed cooldowns
pub fn show_active(app: &App) {
    let controller = app.controller();
    let name_of = |id: SubjectId| {
        app.sandbox
            .player(id)
            .map(|p| p.subject.name)
            .unwrap_or_else(|| id.to_string())
    };

    let active = controller.active_subjects().snapshot();
    println!("Active: {}", active.len());
    for id in active {
        println!("  {}", name_of(id));
    }

    println!("Cooldowns armed: {}", controller.cooldowns().len());
}

pub fn show_settings(app: &App) {
    let config = app.config().current_snapshot();
    println!("Labels: {}", app.labels().join(", "));
    println!(
        "Disabled worlds: {}",
        if config.disabled_worlds.is_empty() {
            "none".to_string()
        } else {
            config.disabled_worlds.join(", ")
        }
    );
    println!(
        "Cooldown: {} ({}s)",
        on_off(config.cooldown.enabled),
        config.cooldown.timer_secs
    );
    println!(
        "Broadcast: {} ({} templates)",
        on_off(config.broadcast.enabled),
        config.broadcast.messages.len()
    );
    println!("Message: {}", on_off(config.message));
    println!(
        "Firework: {} ({})",
        on_off(config.firework.enabled),
        config.firework.kind
    );
    println!("Coords: {}", on_off(config.coords));
    println!(
        "Sound: {} ({}, {:?} naming)",
        on_off(config.sound.enabled),
        config.sound.sound,
        config.sound.naming
    );
}

pub fn exit() {
    println!("Bye");
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

fn unknown_player(name: &str) -> String {
    format!("error: No player named {name}")
}

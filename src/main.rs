//! Wave Rider entry point
//!
//! The simulation core has no renderer or audio; natively this runs a
//! headless autopilot session and prints the final state as JSON.
//!
//! Usage: `wave-rider [tuning.json]`

use wave_rider::sim::{DirectionInput, EntityKind, GameEvent, GamePhase, SessionState};
use wave_rider::{Command, Game, Tuning};

/// Simulated play time
const SESSION_SECONDS: f64 = 180.0;
const FRAME_MS: f64 = 1000.0 / 60.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    log::info!("Wave Rider (native, headless) starting...");

    let tuning = match std::env::args().nth(1) {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let mut game = Game::new(seed, tuning);
    game.command(Command::Start);

    let mut t = 0.0;
    while t < SESSION_SECONDS * 1000.0 {
        game.set_direction(autopilot(game.state()));
        if game.state().zone.active && !game.state().zone.has_tricked_this_activation {
            game.request_trick();
        }
        game.frame(t);
        t += FRAME_MS;

        for event in game.drain_events() {
            report(&event);
        }

        match game.phase() {
            GamePhase::Over => break,
            // Skip the level summary countdown
            GamePhase::Paused => game.command(Command::Resume),
            _ => {}
        }
    }

    println!("{}", serde_json::to_string_pretty(&game.snapshot())?);
    Ok(())
}

/// Chase the nearest fish, sidestep hazards, and climb into the trick zone
/// whenever the trick cooldown allows
fn autopilot(state: &SessionState) -> DirectionInput {
    let player = state.player.hitbox(&state.tuning.player);
    let center = player.pos + player.size * 0.5;

    let threat = state.entities.iter().find(|e| {
        e.kind == EntityKind::Hazard
            && !e.is_deflected()
            && e.pos.x > center.x - 40.0
            && e.pos.x - center.x < 160.0
            && (e.pos.y + e.size.y * 0.5 - center.y).abs() < 60.0
    });

    let target_y = if let Some(hazard) = threat {
        // Dodge toward whichever side has more room
        if hazard.pos.y > center.y {
            center.y - 100.0
        } else {
            center.y + 100.0
        }
    } else if !state.trick.in_progress && state.trick.last_trick_at.is_none_or(|t| state.now_ms - t > 4000.0) {
        0.0
    } else {
        state
            .entities
            .iter()
            .filter(|e| e.kind.is_collectible() || e.kind == EntityKind::PowerUp)
            .min_by(|a, b| a.pos.x.partial_cmp(&b.pos.x).unwrap_or(std::cmp::Ordering::Equal))
            .map(|e| e.pos.y + e.size.y * 0.5)
            .unwrap_or(state.tuning.viewport.height * 0.6)
    };

    DirectionInput {
        left: center.x > state.tuning.viewport.width * 0.3,
        right: center.x < state.tuning.viewport.width * 0.2,
        up: target_y < center.y - 8.0,
        down: target_y > center.y + 8.0,
    }
}

fn report(event: &GameEvent) {
    match event {
        GameEvent::TrickPerformed { kind, points } => {
            log::info!("🏄 {} +{}", kind.as_str(), points)
        }
        GameEvent::LevelSummary {
            level,
            score,
            collected,
            tricks,
        } => log::info!(
            "Level {} complete: score {}, {} fish, {} tricks",
            level,
            score,
            collected,
            tricks
        ),
        GameEvent::GameOver { score, level } => {
            log::info!("Game over at level {} with {} points", level, score)
        }
        other => log::debug!("{:?}", other),
    }
}

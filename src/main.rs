//! Headless demo runner
//!
//! Drives the simulation with a scripted pilot so a whole run can be
//! watched from the log output. Useful for eyeballing balance changes and
//! for checking that two runs with the same seed agree.
//!
//! Usage: `tilestorm [seed] [ticks] [tuning.json]`

use std::env;
use std::error::Error;
use std::fs;

use tilestorm::sim::{tick, GameEvent, GameState, TickInput, WavePhase};
use tilestorm::Tuning;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed: u64 = args.get(1).map(|s| s.parse()).transpose()?.unwrap_or(0);
    let ticks: u64 = args.get(2).map(|s| s.parse()).transpose()?.unwrap_or(3600);
    let tuning = match args.get(3) {
        Some(path) => Tuning::from_json(&fs::read_to_string(path)?)?,
        None => Tuning::default(),
    };

    log::info!("starting run: seed {seed}, {ticks} ticks");
    let mut state = GameState::new(seed, tuning);

    for i in 0..ticks {
        let input = pilot(&state, i);
        tick(&mut state, &input);

        for event in state.drain_events() {
            match event {
                GameEvent::WaveStarted { wave } => log::info!("wave {wave} started"),
                GameEvent::WaveCompleted { wave } => {
                    log::info!("wave {wave} cleared, score {}", state.score)
                }
                GameEvent::ArenaRegenerated { level } => log::info!("arena rerolled, level {level}"),
                GameEvent::PickupCollected { kind } => log::info!("picked up {kind:?}"),
                GameEvent::EnemyDestroyed { id } => log::debug!("enemy {id} destroyed"),
                GameEvent::PlayerDied => log::info!("player died at tick {}", state.time_ticks),
            }
        }
        if state.game_over {
            break;
        }
    }

    println!(
        "seed {seed}: survived {} ticks, reached wave {}, score {}",
        state.time_ticks, state.wave.wave, state.score
    );
    Ok(())
}

/// Scripted inputs: start each wave immediately, circle the arena center,
/// fire on a fixed cadence, and use whatever was collected.
fn pilot(state: &GameState, i: u64) -> TickInput {
    let leg = (i / 40) % 4;
    TickInput {
        move_up: leg == 0,
        move_right: leg == 1,
        move_down: leg == 2,
        move_left: leg == 3,
        fire: i % 6 == 0,
        activate_power_up: !state.player.inventory.is_empty(),
        use_heal: state.player.heal_charges > 0 && state.player.health <= 2,
        start_wave: state.wave.phase == WavePhase::Idle,
    }
}

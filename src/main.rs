//! Arcade Hub entry point
//!
//! Natively this is a headless attract mode: every catalog game is played by
//! a simple autopilot on a simulated clock and its final snapshot is printed
//! as JSON. Usage: `arcade-hub [config.json]`

#[cfg(not(target_arch = "wasm32"))]
mod attract {
    use std::error::Error;
    use std::path::Path;

    use arcade_hub::games::View;
    use arcade_hub::sim::{Direction, Lifecycle};
    use arcade_hub::{Cabinet, GameConfig, ProfileForm, Snapshot};

    /// Simulated frame length
    const FRAME_MS: u64 = 16;
    /// Longest a single game is played
    const GAME_MS: u64 = 120_000;

    const CELL_KEYS: [&str; 9] = ["1", "2", "3", "4", "5", "6", "7", "8", "9"];

    pub fn run() -> Result<(), Box<dyn Error>> {
        let config = match std::env::args().nth(1) {
            Some(path) => GameConfig::load(Path::new(&path))?,
            None => GameConfig::default(),
        };

        let mut cabinet = Cabinet::new(config);
        cabinet
            .identity_mut()
            .login(&mut ProfileForm::new("attract", "attract@localhost", ""));

        let mut now = 0;
        for entry in cabinet.catalog() {
            cabinet.select(entry.id);
            cabinet.key_down("Enter");

            let deadline = now + GAME_MS;
            let mut frame = 0u64;
            while now < deadline {
                now += FRAME_MS;
                frame += 1;
                cabinet.advance_to(now);
                let Some(snapshot) = cabinet.snapshot() else {
                    break;
                };
                if snapshot.lifecycle == Lifecycle::GameOver {
                    break;
                }
                if let Some(key) = autopilot(&snapshot, frame) {
                    cabinet.key_down(key);
                }
            }

            if let Some(snapshot) = cabinet.snapshot() {
                log::info!(
                    "{}: score {} after {}s, {:?}",
                    entry.name,
                    snapshot.score,
                    frame * FRAME_MS / 1000,
                    snapshot.outcome
                );
                println!("{}", serde_json::to_string(&snapshot)?);
            }
        }
        cabinet.back_to_catalog();
        Ok(())
    }

    /// One key per frame at most, chosen from the visible state only
    fn autopilot(snapshot: &Snapshot, frame: u64) -> Option<&'static str> {
        match &snapshot.view {
            View::Snake(view) => {
                let head = view.body.first()?;
                let want = if view.food.col > head.col {
                    Direction::Right
                } else if view.food.col < head.col {
                    Direction::Left
                } else if view.food.row > head.row {
                    Direction::Down
                } else {
                    Direction::Up
                };
                if want == view.heading || want.reverses(view.heading) {
                    return None;
                }
                Some(arrow(want))
            }
            View::TicTacToe(view) => {
                if view.ai_thinking {
                    return None;
                }
                let free = view.cells.iter().position(Option::is_none)?;
                Some(CELL_KEYS[free])
            }
            View::Tetris(_) => {
                // wander, then drop
                match frame % 90 {
                    15 => Some("ArrowLeft"),
                    30 => Some("ArrowUp"),
                    45 | 60 => Some("ArrowRight"),
                    75 => Some(" "),
                    _ => None,
                }
            }
            View::Pong(view) => {
                let paddle = view.player.center().y;
                let ball = view.ball.pos.y + view.ball.size / 2.0;
                if ball < paddle - 20.0 {
                    Some("ArrowUp")
                } else if ball > paddle + 20.0 {
                    Some("ArrowDown")
                } else {
                    None
                }
            }
            View::Breakout(view) => {
                let paddle = view.paddle.center().x;
                let ball = view.ball.pos.x + view.ball.size / 2.0;
                if ball < paddle - 20.0 {
                    Some("ArrowLeft")
                } else if ball > paddle + 20.0 {
                    Some("ArrowRight")
                } else {
                    None
                }
            }
        }
    }

    fn arrow(dir: Direction) -> &'static str {
        match dir {
            Direction::Up => "ArrowUp",
            Direction::Down => "ArrowDown",
            Direction::Left => "ArrowLeft",
            Direction::Right => "ArrowRight",
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Arcade Hub (native attract mode) starting...");
    if let Err(err) = attract::run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `wasm_init` in the library
}

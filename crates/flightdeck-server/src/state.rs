//! Served game state: fixture loading and the simulated clock.
//!
//! Without a host simulation attached, the server serves a state loaded
//! from a YAML fixture. When clock advance is enabled, a background task
//! moves universal time and every vessel's mission time forward once per
//! tick so pollers see the data change.

use std::path::Path;
use std::time::Duration;

use flightdeck_types::{GameState, SharedState};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::AppError;

/// How often the simulated clock advances.
pub const CLOCK_TICK: Duration = Duration::from_secs(1);

/// Load a game state from a YAML fixture file.
pub fn load_fixture(path: &Path) -> Result<GameState, AppError> {
    let contents = std::fs::read_to_string(path).map_err(|e| AppError::Fixture {
        path: path.to_path_buf(),
        message: format!("failed to read fixture: {e}"),
    })?;
    serde_yml::from_str(&contents).map_err(|e| AppError::Fixture {
        path: path.to_path_buf(),
        message: format!("failed to parse fixture YAML: {e}"),
    })
}

/// Move the simulated clock forward by `seconds`.
pub fn advance(state: &mut GameState, seconds: f64) {
    if let Some(run) = state.run.as_mut() {
        run.universal_time += seconds;
    }
    if let Some(flight) = state.flight.as_mut() {
        for vessel in &mut flight.vessels {
            vessel.mission_time += seconds;
        }
    }
}

/// Advance `shared` by one `tick` every `tick` until the task is aborted.
pub fn spawn_clock(shared: SharedState, tick: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick);
        // The first tick completes immediately.
        interval.tick().await;
        loop {
            interval.tick().await;
            shared.update(|state| advance(state, tick.as_secs_f64()));
            debug!("simulated clock advanced");
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use flightdeck_types::StateProvider;

    use super::*;

    const FIXTURE: &str = include_str!("../../../fixtures/kerbin-orbit.yaml");

    fn fixture() -> GameState {
        serde_yml::from_str(FIXTURE).unwrap()
    }

    #[test]
    fn fixture_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.yaml");
        std::fs::write(&path, FIXTURE).unwrap();

        let state = load_fixture(&path).unwrap();
        assert_eq!(state, fixture());
        assert!(state.in_flight().is_some());
    }

    #[test]
    fn missing_and_malformed_fixtures_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_fixture(&dir.path().join("absent.yaml")),
            Err(AppError::Fixture { .. })
        ));

        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "scene_code: [not, a, number]").unwrap();
        assert!(matches!(load_fixture(&path), Err(AppError::Fixture { .. })));
    }

    #[test]
    fn advance_moves_universal_and_mission_time() {
        let mut state = fixture();
        let before = state.clone();

        advance(&mut state, 1.0);

        let ut = |s: &GameState| s.run.as_ref().unwrap().universal_time;
        assert_eq!(ut(&state), ut(&before) + 1.0);
        let flight = state.flight.as_ref().unwrap();
        let earlier = before.flight.as_ref().unwrap();
        for (now, then) in flight.vessels.iter().zip(&earlier.vessels) {
            assert_eq!(now.mission_time, then.mission_time + 1.0);
        }
    }

    #[test]
    fn advance_without_a_run_is_a_no_op() {
        let mut state = GameState {
            scene_code: 2,
            ..GameState::default()
        };
        advance(&mut state, 5.0);
        assert_eq!(state, GameState {
            scene_code: 2,
            ..GameState::default()
        });
    }

    #[tokio::test(start_paused = true)]
    async fn clock_task_ticks_once_per_period() {
        let shared = SharedState::new(fixture());
        let start = shared.capture().run.unwrap().universal_time;

        let clock = spawn_clock(shared.clone(), CLOCK_TICK);
        tokio::time::sleep(Duration::from_millis(3500)).await;
        clock.abort();

        let now = shared.capture().run.unwrap().universal_time;
        assert!((now - start - 3.0).abs() < 1e-9, "{start} -> {now}");
    }
}

use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::info;

use crate::StartupError;

use super::scene::{SceneCommand, SceneError, SceneKey, SceneMachine};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub target_tps: u32,
    /// Stop after this many frames even if no scene asked to quit.
    pub max_frames: Option<u64>,
    /// Sleep between frames so the simulation runs at `target_tps` in wall time.
    pub realtime: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            target_tps: 60,
            max_frames: None,
            realtime: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error("failed to load weapon configs: {0}")]
    Weapons(#[from] crate::content::WeaponLoadError),
    #[error("scene failed: {0}")]
    Scene(#[from] SceneError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopStop {
    QuitRequested,
    FrameLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSummary {
    pub frames: u64,
    pub stop: LoopStop,
    pub final_scene: SceneKey,
}

pub fn run_scenes(config: &LoopConfig, scenes: &mut SceneMachine) -> Result<LoopSummary, AppError> {
    let target_tps = config.target_tps.max(1);
    let fixed_dt = Duration::from_secs_f64(1.0 / target_tps as f64);
    let fixed_dt_seconds = fixed_dt.as_secs_f32();
    info!(
        target_tps,
        max_frames = ?config.max_frames,
        realtime = config.realtime,
        "loop_config"
    );

    scenes.load_active()?;
    let started = Instant::now();
    let mut frames = 0u64;
    let stop = loop {
        if config.max_frames.is_some_and(|limit| frames >= limit) {
            break LoopStop::FrameLimit;
        }
        let frame_started = Instant::now();
        let command = scenes.update_active(fixed_dt_seconds);
        frames = frames.saturating_add(1);

        match command {
            SceneCommand::None => {}
            SceneCommand::SwitchTo(next_scene) => {
                if scenes.switch_to(next_scene)? {
                    info!(
                        frame = frames,
                        scene = ?scenes.active_scene(),
                        entity_count = scenes.active_registry().len(),
                        "scene_switched"
                    );
                }
            }
            SceneCommand::Quit => break LoopStop::QuitRequested,
        }

        if config.realtime {
            let pacing = compute_pacing_sleep(frame_started.elapsed(), fixed_dt);
            if pacing > Duration::ZERO {
                thread::sleep(pacing);
            }
        }
    };

    let final_scene = scenes.active_scene();
    scenes.shutdown_all();
    info!(
        frames,
        stop = ?stop,
        scene = ?final_scene,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "loop_finished"
    );
    Ok(LoopSummary {
        frames,
        stop,
        final_scene,
    })
}

fn compute_pacing_sleep(elapsed: Duration, frame_target: Duration) -> Duration {
    frame_target.saturating_sub(elapsed)
}

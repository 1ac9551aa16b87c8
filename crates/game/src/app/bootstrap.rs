use std::env;

use engine::{load_weapon_library, resolve_app_paths, AppError, LoopConfig, SceneKey, SceneMachine};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::game_over::GameOverScene;
use super::overworld::{OverworldScene, SceneOptions};

const MULTIPLAYER_ENV_VAR: &str = "SWEEPER_MULTIPLAYER";
const DEBUG_ENV_VAR: &str = "SWEEPER_DEBUG";
const MAX_FRAMES_ENV_VAR: &str = "SWEEPER_MAX_FRAMES";
const REALTIME_ENV_VAR: &str = "SWEEPER_REALTIME";
/// One minute of simulation at the default tick rate.
const DEFAULT_MAX_FRAMES: u64 = 3600;
const GAME_OVER_LINGER_FRAMES: u32 = 120;

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scenes: SceneMachine,
}

pub(crate) fn build_app() -> Result<AppWiring, AppError> {
    init_tracing();
    info!("=== Sweeper Startup ===");

    let paths = resolve_app_paths()?;
    info!(
        root = %paths.root.display(),
        weapons_dir = %paths.weapons_dir.display(),
        "app_paths_resolved"
    );
    let weapons = load_weapon_library(&paths.weapons_dir)?;

    let options = SceneOptions {
        multiplayer: flag_from_env(MULTIPLAYER_ENV_VAR),
        debug: flag_from_env(DEBUG_ENV_VAR),
    };
    let config = LoopConfig {
        max_frames: max_frames_from_env(),
        realtime: flag_from_env(REALTIME_ENV_VAR),
        ..LoopConfig::default()
    };

    let scenes = SceneMachine::new(
        Box::new(OverworldScene::new(options, weapons)),
        Box::new(GameOverScene::new(GAME_OVER_LINGER_FRAMES)),
        SceneKey::Overworld,
    );
    Ok(AppWiring { config, scenes })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn flag_from_env(var: &'static str) -> bool {
    match env::var(var) {
        Ok(raw) => parse_flag(&raw).unwrap_or_else(|| {
            warn!(var, value = %raw, "invalid_flag_ignored");
            false
        }),
        Err(_) => false,
    }
}

fn max_frames_from_env() -> Option<u64> {
    match env::var(MAX_FRAMES_ENV_VAR) {
        Ok(raw) => parse_max_frames(&raw).unwrap_or_else(|| {
            warn!(
                var = MAX_FRAMES_ENV_VAR,
                value = %raw,
                default = DEFAULT_MAX_FRAMES,
                "invalid_max_frames_ignored"
            );
            Some(DEFAULT_MAX_FRAMES)
        }),
        Err(_) => Some(DEFAULT_MAX_FRAMES),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// `0` runs without a frame limit.
fn parse_max_frames(raw: &str) -> Option<Option<u64>> {
    match raw.trim().parse::<u64>().ok()? {
        0 => Some(None),
        limit => Some(Some(limit)),
    }
}

use std::process::ExitCode;

use engine::run_scenes;
use tracing::{error, info};

use super::bootstrap::AppWiring;

pub(crate) fn run(mut app: AppWiring) -> ExitCode {
    match run_scenes(&app.config, &mut app.scenes) {
        Ok(summary) => {
            info!(
                frames = summary.frames,
                stop = ?summary.stop,
                scene = ?summary.final_scene,
                "session_finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "session_failed");
            ExitCode::FAILURE
        }
    }
}

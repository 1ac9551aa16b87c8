use engine::{EntityRegistry, Scene, SceneCommand, SceneError, SceneKey, WorldBounds};
use tracing::info;

const GAME_OVER_BOUNDS: WorldBounds = WorldBounds {
    width: 800.0,
    height: 600.0,
};

/// Shown after the overworld loses its primary player. Holds for a few
/// frames, then asks the loop to quit.
pub(crate) struct GameOverScene {
    linger_frames: u32,
    frames_shown: u32,
}

impl GameOverScene {
    pub(crate) fn new(linger_frames: u32) -> Self {
        Self {
            linger_frames,
            frames_shown: 0,
        }
    }
}

impl Scene for GameOverScene {
    fn key(&self) -> SceneKey {
        SceneKey::GameOver
    }

    fn bounds(&self) -> WorldBounds {
        GAME_OVER_BOUNDS
    }

    fn load(&mut self, _registry: &mut EntityRegistry) -> Result<(), SceneError> {
        self.frames_shown = 0;
        info!(linger_frames = self.linger_frames, "game_over_shown");
        Ok(())
    }

    fn update(&mut self, _fixed_dt_seconds: f32, _registry: &mut EntityRegistry) -> SceneCommand {
        if self.frames_shown >= self.linger_frames {
            return SceneCommand::Quit;
        }
        self.frames_shown += 1;
        SceneCommand::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quits_after_lingering() {
        let mut scene = GameOverScene::new(2);
        let mut registry = EntityRegistry::default();
        scene.load(&mut registry).expect("load");

        let commands: Vec<SceneCommand> = (0..3)
            .map(|_| scene.update(1.0 / 60.0, &mut registry))
            .collect();
        assert_eq!(
            commands,
            vec![SceneCommand::None, SceneCommand::None, SceneCommand::Quit]
        );
    }
}

use thiserror::Error;
use tracing::info;

use super::registry::{EntityRegistry, RegistryConfig, RegistryError, RegistrySignal};
use crate::content::{AssetManifest, OffsetCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKey {
    Overworld,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    SwitchTo(SceneKey),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminateReason {
    PrimaryLost,
}

impl From<RegistrySignal> for TerminateReason {
    fn from(signal: RegistrySignal) -> Self {
        match signal {
            RegistrySignal::PrimaryLost { .. } => TerminateReason::PrimaryLost,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u64);

#[derive(Debug, Default)]
pub struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset_px(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx as f32,
            y: self.y + dy as f32,
        }
    }

    pub fn distance(self, other: Vec2) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Playable area of a room, with the origin in the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

impl WorldBounds {
    pub fn clamp(&self, position: Vec2) -> Vec2 {
        Vec2 {
            x: position.x.clamp(0.0, self.width.max(0.0)),
            y: position.y.clamp(0.0, self.height.max(0.0)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn offset_category(self) -> OffsetCategory {
        match self {
            Direction::Up => OffsetCategory::Up,
            Direction::Down => OffsetCategory::Down,
            Direction::Left | Direction::Right => OffsetCategory::Side,
        }
    }

    /// Side art is authored facing right; facing left draws it flipped.
    pub fn is_mirrored(self) -> bool {
        match self {
            Direction::Left => true,
            Direction::Up | Direction::Down | Direction::Right => false,
        }
    }

    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// Logical render state handed to the renderer. Owned by exactly one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub texture: String,
    pub frame: u32,
    pub position: Vec2,
    pub depth: i32,
    pub flip_x: bool,
}

impl Sprite {
    pub fn new(texture: impl Into<String>) -> Self {
        Self {
            texture: texture.into(),
            frame: 0,
            position: Vec2::default(),
            depth: 0,
            flip_x: false,
        }
    }
}

/// Area an attacking entity damages, evaluated by the owning scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike {
    pub origin: Vec2,
    pub reach: f32,
    pub damage: u32,
}

/// Damage delivered to an entity this frame by the scene's gameplay rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub target: EntityId,
    pub amount: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub entity: EntityId,
    pub frame: u64,
    pub fixed_dt_seconds: f32,
    /// Primary entity position at the start of the frame.
    pub primary_position: Option<Vec2>,
    pub hits: &'a [Hit],
}

impl FrameContext<'_> {
    pub fn damage_taken(&self) -> u32 {
        self.hits
            .iter()
            .filter(|hit| hit.target == self.entity)
            .fold(0u32, |total, hit| total.saturating_add(hit.amount))
    }
}

pub trait Entity {
    fn name(&self) -> &str;
    fn preload(&mut self, _assets: &mut AssetManifest) {}
    fn create(&mut self, _bounds: &WorldBounds) {}
    fn update(&mut self, ctx: &FrameContext<'_>);
    fn is_dead(&self) -> bool;
    fn sprite(&self) -> &Sprite;
    fn strike(&self) -> Option<Strike> {
        None
    }
    fn as_carrier(&self) -> Option<&dyn Carrier> {
        None
    }
}

/// Entity state a carried weapon follows.
pub trait Carrier {
    fn direction(&self) -> Direction;
    /// Index into the active animation, in `[0, frame_count - 1]`.
    fn animation_frame(&self) -> usize;
    fn position(&self) -> Vec2;
    fn depth(&self) -> i32;
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene {scene:?} references unknown weapon '{weapon}'")]
    UnknownWeapon { scene: SceneKey, weapon: String },
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

pub trait Scene {
    fn key(&self) -> SceneKey;
    fn bounds(&self) -> WorldBounds;
    fn registry_config(&self) -> RegistryConfig {
        RegistryConfig::default()
    }
    fn load(&mut self, registry: &mut EntityRegistry) -> Result<(), SceneError>;
    fn update(&mut self, fixed_dt_seconds: f32, registry: &mut EntityRegistry) -> SceneCommand;
    fn unload(&mut self, _registry: &mut EntityRegistry) {}
}

struct SceneRuntime {
    scene: Box<dyn Scene>,
    registry: EntityRegistry,
    assets: AssetManifest,
    is_loaded: bool,
}

impl SceneRuntime {
    fn new(scene: Box<dyn Scene>) -> Self {
        let registry = EntityRegistry::new(scene.registry_config());
        Self {
            scene,
            registry,
            assets: AssetManifest::default(),
            is_loaded: false,
        }
    }

    fn load(&mut self) -> Result<(), SceneError> {
        if self.is_loaded {
            return Ok(());
        }
        self.registry = EntityRegistry::new(self.scene.registry_config());
        self.assets = AssetManifest::default();
        self.scene.load(&mut self.registry)?;
        self.registry.preload_all(&mut self.assets)?;
        let bounds = self.scene.bounds();
        self.registry.create_all(&bounds)?;
        self.is_loaded = true;
        Ok(())
    }

    fn unload(&mut self) {
        if !self.is_loaded {
            return;
        }
        self.scene.unload(&mut self.registry);
        self.registry = EntityRegistry::new(self.scene.registry_config());
        self.is_loaded = false;
    }
}

pub struct SceneMachine {
    overworld: SceneRuntime,
    game_over: SceneRuntime,
    active_scene: SceneKey,
}

impl SceneMachine {
    pub fn new(overworld: Box<dyn Scene>, game_over: Box<dyn Scene>, active_scene: SceneKey) -> Self {
        Self {
            overworld: SceneRuntime::new(overworld),
            game_over: SceneRuntime::new(game_over),
            active_scene,
        }
    }

    pub fn active_scene(&self) -> SceneKey {
        self.active_scene
    }

    pub fn load_active(&mut self) -> Result<(), SceneError> {
        let runtime = self.active_runtime_mut();
        runtime.load()?;
        info!(
            scene = ?runtime.scene.key(),
            entity_count = runtime.registry.len(),
            spritesheet_count = runtime.assets.len(),
            "scene_loaded"
        );
        Ok(())
    }

    pub fn update_active(&mut self, fixed_dt_seconds: f32) -> SceneCommand {
        let runtime = self.active_runtime_mut();
        runtime.scene.update(fixed_dt_seconds, &mut runtime.registry)
    }

    pub fn active_registry(&self) -> &EntityRegistry {
        &self.active_runtime_ref().registry
    }

    pub fn active_assets(&self) -> &AssetManifest {
        &self.active_runtime_ref().assets
    }

    /// Stops the active scene and starts `next_scene` fresh.
    pub fn switch_to(&mut self, next_scene: SceneKey) -> Result<bool, SceneError> {
        if self.active_scene == next_scene {
            return Ok(false);
        }
        self.active_runtime_mut().unload();
        self.active_scene = next_scene;
        self.load_active()?;
        Ok(true)
    }

    pub fn shutdown_all(&mut self) {
        for runtime in [&mut self.overworld, &mut self.game_over] {
            runtime.unload();
        }
    }

    fn active_runtime_mut(&mut self) -> &mut SceneRuntime {
        self.runtime_mut(self.active_scene)
    }

    fn active_runtime_ref(&self) -> &SceneRuntime {
        self.runtime_ref(self.active_scene)
    }

    fn runtime_mut(&mut self, key: SceneKey) -> &mut SceneRuntime {
        match key {
            SceneKey::Overworld => &mut self.overworld,
            SceneKey::GameOver => &mut self.game_over,
        }
    }

    fn runtime_ref(&self, key: SceneKey) -> &SceneRuntime {
        match key {
            SceneKey::Overworld => &self.overworld,
            SceneKey::GameOver => &self.game_over,
        }
    }
}

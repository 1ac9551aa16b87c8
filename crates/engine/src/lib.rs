pub mod app;
pub mod content;
mod paths;
mod sprite_keys;

pub use app::{
    resolve_position, run_scenes, weapon_depth, AppError, Carrier, Direction, Entity, EntityId,
    EntityRegistry, FrameContext, Hit, LoopConfig, LoopStop, LoopSummary, RegistryConfig,
    RegistryError, RegistryPhase, RegistrySignal, ResolvedOffset, Scene, SceneCommand,
    SceneError, SceneKey, SceneMachine, Sprite, Strike, TerminateReason, Vec2, WeaponAttachment,
    WorldBounds,
};
pub use content::{
    load_weapon_library, normalize, AnimationSet, AssetManifest, ConfigError, OffsetCategory,
    OffsetSeries, OffsetTable, RawWeaponConfig, SpritesheetRequest, WeaponConfig, WeaponLibrary,
    WeaponLoadError,
};
pub use paths::{resolve_app_paths, AppPaths, StartupError, ROOT_ENV_VAR};
pub use sprite_keys::SpritePathError;

mod attachment;
mod loop_runner;
mod registry;
mod scene;

pub use attachment::{resolve_position, weapon_depth, ResolvedOffset, WeaponAttachment};
pub use loop_runner::{run_scenes, AppError, LoopConfig, LoopStop, LoopSummary};
pub use registry::{EntityRegistry, RegistryConfig, RegistryError, RegistryPhase, RegistrySignal};
pub use scene::{
    Carrier, Direction, Entity, EntityId, EntityIdAllocator, FrameContext, Hit, Scene,
    SceneCommand, SceneError, SceneKey, SceneMachine, Sprite, Strike, TerminateReason, Vec2,
    WorldBounds,
};

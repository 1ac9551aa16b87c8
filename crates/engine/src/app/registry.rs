use thiserror::Error;
use tracing::{debug, info};

use super::scene::{
    Entity, EntityId, EntityIdAllocator, FrameContext, Hit, Sprite, Vec2, WorldBounds,
};
use crate::content::AssetManifest;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Emit a debug event for every entity update.
    pub trace_updates: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrySignal {
    PrimaryLost { primary: EntityId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("entities can only be set up before the first frame (already at frame {frame})")]
    AlreadyRunning { frame: u64 },
    #[error("registry is terminated after losing its primary entity")]
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryPhase {
    Setup,
    Running,
    Terminated,
}

struct RegisteredEntity {
    id: EntityId,
    entity: Box<dyn Entity>,
}

/// Ordered set of live entities for one scene.
///
/// The first entity ever registered is the primary entity. Once it has been
/// removed the registry reports [`RegistrySignal::PrimaryLost`] a single time
/// and ignores every later tick.
pub struct EntityRegistry {
    config: RegistryConfig,
    allocator: EntityIdAllocator,
    entries: Vec<RegisteredEntity>,
    primary: Option<EntityId>,
    phase: RegistryPhase,
    frame: u64,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl EntityRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            allocator: EntityIdAllocator::default(),
            entries: Vec::new(),
            primary: None,
            phase: RegistryPhase::Setup,
            frame: 0,
        }
    }

    pub fn register(&mut self, entity: Box<dyn Entity>) -> Result<EntityId, RegistryError> {
        self.ensure_setup()?;
        let id = self.allocator.allocate();
        if self.primary.is_none() {
            self.primary = Some(id);
        }
        debug!(
            entity_id = id.0,
            name = entity.name(),
            primary = self.primary == Some(id),
            "entity_registered"
        );
        self.entries.push(RegisteredEntity { id, entity });
        Ok(id)
    }

    pub fn preload_all(&mut self, assets: &mut AssetManifest) -> Result<(), RegistryError> {
        self.ensure_setup()?;
        for entry in &mut self.entries {
            entry.entity.preload(assets);
        }
        Ok(())
    }

    pub fn create_all(&mut self, bounds: &WorldBounds) -> Result<(), RegistryError> {
        self.ensure_setup()?;
        for entry in &mut self.entries {
            entry.entity.create(bounds);
        }
        Ok(())
    }

    /// Runs one frame: updates every entity in registration order, then drops
    /// the dead ones and checks that the primary entity survived.
    pub fn tick(&mut self, fixed_dt_seconds: f32, hits: &[Hit]) -> Option<RegistrySignal> {
        if self.phase == RegistryPhase::Terminated || self.entries.is_empty() {
            return None;
        }
        self.phase = RegistryPhase::Running;
        let frame = self.frame;
        self.frame = self.frame.saturating_add(1);

        let primary_position = self.primary_position();
        let snapshot_len = self.entries.len();
        for entry in &mut self.entries[..snapshot_len] {
            let ctx = FrameContext {
                entity: entry.id,
                frame,
                fixed_dt_seconds,
                primary_position,
                hits,
            };
            entry.entity.update(&ctx);
            if self.config.trace_updates {
                debug!(
                    frame,
                    entity_id = entry.id.0,
                    name = entry.entity.name(),
                    dead = entry.entity.is_dead(),
                    "entity_updated"
                );
            }
        }

        self.entries.retain(|entry| {
            if !entry.entity.is_dead() {
                return true;
            }
            info!(
                frame,
                entity_id = entry.id.0,
                name = entry.entity.name(),
                "entity_removed"
            );
            false
        });

        let primary = self.primary?;
        if self.contains(primary) {
            return None;
        }
        self.phase = RegistryPhase::Terminated;
        info!(
            frame,
            primary = primary.0,
            survivors = self.entries.len(),
            "primary_lost"
        );
        Some(RegistrySignal::PrimaryLost { primary })
    }

    pub fn phase(&self) -> RegistryPhase {
        self.phase
    }

    pub fn is_terminated(&self) -> bool {
        self.phase == RegistryPhase::Terminated
    }

    /// Number of frames processed so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn primary(&self) -> Option<EntityId> {
        self.primary
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entries.iter().map(|entry| entry.id)
    }

    pub fn get(&self, id: EntityId) -> Option<&dyn Entity> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.entity.as_ref())
    }

    /// Sprites of all live entities, in registration order, for the collision collaborator.
    pub fn sprites(&self) -> impl Iterator<Item = (EntityId, &Sprite)> + '_ {
        self.entries
            .iter()
            .map(|entry| (entry.id, entry.entity.sprite()))
    }

    fn primary_position(&self) -> Option<Vec2> {
        self.primary
            .and_then(|id| self.get(id))
            .map(|entity| entity.sprite().position)
    }

    fn ensure_setup(&self) -> Result<(), RegistryError> {
        match self.phase {
            RegistryPhase::Setup => Ok(()),
            RegistryPhase::Running => Err(RegistryError::AlreadyRunning { frame: self.frame }),
            RegistryPhase::Terminated => Err(RegistryError::Terminated),
        }
    }
}

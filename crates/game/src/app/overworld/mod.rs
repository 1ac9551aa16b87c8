use std::collections::HashMap;
use std::sync::Arc;

use engine::{
    Direction, Entity, EntityId, EntityRegistry, Hit, RegistryConfig, Scene, SceneCommand,
    SceneError, SceneKey, TerminateReason, Vec2, WeaponConfig, WeaponLibrary, WorldBounds,
};
use tracing::{debug, info, warn};

mod animation;
mod npc;
mod patrol;
mod player;

use npc::{Dummy, Enemy};
use patrol::{Patrol, PatrolLeg};
use player::{Player, PlayerSpec};

pub(crate) const OVERWORLD_BOUNDS: WorldBounds = WorldBounds {
    width: 1024.0,
    height: 2048.0,
};
pub(crate) const PLAYER_ONE_WEAPON: &str = "weapon1";
pub(crate) const PLAYER_TWO_WEAPON: &str = "weapon2";
const PLAYER_ONE_SPAWN: Vec2 = Vec2::new(384.0, 1576.0);
const PLAYER_TWO_SPAWN: Vec2 = Vec2::new(384.0, 1704.0);
const DUMMY_SPAWN: Vec2 = Vec2::new(496.0, 1576.0);
const ENEMY_SPAWN: Vec2 = Vec2::new(384.0, 1400.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SceneOptions {
    pub(crate) multiplayer: bool,
    pub(crate) debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Player,
    Dummy,
    Enemy,
}

impl Role {
    fn can_damage(self, target: Role) -> bool {
        match (self, target) {
            (Role::Player, Role::Dummy | Role::Enemy) => true,
            (Role::Enemy, Role::Player) => true,
            _ => false,
        }
    }
}

/// The playable room. Losing the first player ends the session.
pub(crate) struct OverworldScene {
    options: SceneOptions,
    weapons: WeaponLibrary,
    roles: HashMap<EntityId, Role>,
    terminated: Option<TerminateReason>,
}

impl OverworldScene {
    pub(crate) fn new(options: SceneOptions, weapons: WeaponLibrary) -> Self {
        Self {
            options,
            weapons,
            roles: HashMap::new(),
            terminated: None,
        }
    }

    fn weapon(&self, name: &str) -> Result<Arc<WeaponConfig>, SceneError> {
        self.weapons.get(name).ok_or_else(|| SceneError::UnknownWeapon {
            scene: SceneKey::Overworld,
            weapon: name.to_string(),
        })
    }

    fn spawn(
        &mut self,
        registry: &mut EntityRegistry,
        role: Role,
        entity: Box<dyn Entity>,
    ) -> Result<EntityId, SceneError> {
        let name = entity.name().to_string();
        let id = registry.register(entity)?;
        self.roles.insert(id, role);
        debug!(entity = %name, id = id.0, role = ?role, "entity_spawned");
        Ok(id)
    }

    /// Resolves every strike raised last frame against the entities its role may damage.
    fn collect_hits(&self, registry: &EntityRegistry) -> Vec<Hit> {
        let mut hits = Vec::new();
        for attacker in registry.ids() {
            let (Some(attacker_role), Some(strike)) = (
                self.roles.get(&attacker),
                registry.get(attacker).and_then(|entity| entity.strike()),
            ) else {
                continue;
            };
            for (target, sprite) in registry.sprites() {
                if target == attacker {
                    continue;
                }
                let Some(target_role) = self.roles.get(&target) else {
                    continue;
                };
                if attacker_role.can_damage(*target_role)
                    && strike.origin.distance(sprite.position) <= strike.reach
                {
                    hits.push(Hit {
                        target,
                        amount: strike.damage,
                    });
                }
            }
        }
        hits
    }

    fn terminate(&mut self, reason: TerminateReason) -> SceneCommand {
        if self.terminated.replace(reason).is_none() {
            info!(reason = ?reason, "overworld_terminated");
        }
        SceneCommand::SwitchTo(SceneKey::GameOver)
    }
}

fn player_one_patrol() -> Patrol {
    Patrol::new(vec![
        PatrolLeg::walk(Direction::Right, 60),
        PatrolLeg::face(Direction::Right, 90),
        PatrolLeg::walk(Direction::Up, 30),
        PatrolLeg::face(Direction::Up, 120),
        PatrolLeg::walk(Direction::Down, 30),
        PatrolLeg::walk(Direction::Left, 60),
        PatrolLeg::face(Direction::Left, 30),
    ])
}

fn player_two_patrol() -> Patrol {
    Patrol::new(vec![
        PatrolLeg::walk(Direction::Up, 40),
        PatrolLeg::face(Direction::Left, 60),
        PatrolLeg::walk(Direction::Down, 40),
        PatrolLeg::face(Direction::Right, 60),
    ])
}

impl Scene for OverworldScene {
    fn key(&self) -> SceneKey {
        SceneKey::Overworld
    }

    fn bounds(&self) -> WorldBounds {
        OVERWORLD_BOUNDS
    }

    fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            trace_updates: self.options.debug,
        }
    }

    fn load(&mut self, registry: &mut EntityRegistry) -> Result<(), SceneError> {
        self.roles.clear();
        self.terminated = None;

        let player_one = Player::new(PlayerSpec {
            name: "player1".to_string(),
            weapon: self.weapon(PLAYER_ONE_WEAPON)?,
            spawn: PLAYER_ONE_SPAWN,
            facing: Direction::Right,
            patrol: player_one_patrol(),
        });
        self.spawn(registry, Role::Player, Box::new(player_one))?;

        if self.options.multiplayer {
            let player_two = Player::new(PlayerSpec {
                name: "player2".to_string(),
                weapon: self.weapon(PLAYER_TWO_WEAPON)?,
                spawn: PLAYER_TWO_SPAWN,
                facing: Direction::Up,
                patrol: player_two_patrol(),
            });
            self.spawn(registry, Role::Player, Box::new(player_two))?;
        }

        self.spawn(registry, Role::Dummy, Box::new(Dummy::new("dummy", DUMMY_SPAWN)))?;
        self.spawn(registry, Role::Enemy, Box::new(Enemy::new("enemy", ENEMY_SPAWN)))?;

        info!(
            multiplayer = self.options.multiplayer,
            debug = self.options.debug,
            entity_count = registry.len(),
            "overworld_populated"
        );
        Ok(())
    }

    fn update(&mut self, fixed_dt_seconds: f32, registry: &mut EntityRegistry) -> SceneCommand {
        if let Some(reason) = self.terminated {
            warn!(reason = ?reason, "overworld_update_after_termination");
            return SceneCommand::SwitchTo(SceneKey::GameOver);
        }

        let hits = self.collect_hits(registry);
        let signal = registry.tick(fixed_dt_seconds, &hits);
        self.roles.retain(|id, _| registry.contains(*id));
        match signal {
            Some(signal) => self.terminate(signal.into()),
            None => SceneCommand::None,
        }
    }

    fn unload(&mut self, _registry: &mut EntityRegistry) {
        self.roles.clear();
        info!("overworld_unloaded");
    }
}

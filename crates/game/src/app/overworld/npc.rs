use engine::{
    AssetManifest, Entity, FrameContext, Sprite, SpritesheetRequest, Strike, Vec2, WorldBounds,
};
use tracing::{debug, info};

const NPC_FRAME_SIZE_PX: u32 = 32;

pub(crate) const DUMMY_MAX_HEALTH: u32 = 30;
pub(crate) const ENEMY_MAX_HEALTH: u32 = 400;
const ENEMY_SPEED_PX_PER_SECOND: f32 = 48.0;
pub(crate) const ENEMY_REACH_PX: f32 = 28.0;
/// Distance the enemy closes to before it stops walking.
const ENEMY_STANDOFF_PX: f32 = 20.0;
pub(crate) const ENEMY_STRIKE_DAMAGE: u32 = 10;
pub(crate) const ENEMY_STRIKE_COOLDOWN_FRAMES: u32 = 45;

fn queue_npc_sheet(assets: &mut AssetManifest, key: &str) {
    assets.queue_spritesheet(SpritesheetRequest {
        key: key.to_string(),
        path: format!("{key}.png"),
        frame_width: NPC_FRAME_SIZE_PX,
        frame_height: NPC_FRAME_SIZE_PX,
    });
}

/// Stationary target that only soaks damage.
pub(crate) struct Dummy {
    name: String,
    spawn: Vec2,
    sprite: Sprite,
    health: u32,
}

impl Dummy {
    pub(crate) fn new(name: impl Into<String>, spawn: Vec2) -> Self {
        Self {
            name: name.into(),
            spawn,
            sprite: Sprite::new("dummy"),
            health: DUMMY_MAX_HEALTH,
        }
    }
}

impl Entity for Dummy {
    fn name(&self) -> &str {
        &self.name
    }

    fn preload(&mut self, assets: &mut AssetManifest) {
        queue_npc_sheet(assets, &self.sprite.texture);
    }

    fn create(&mut self, bounds: &WorldBounds) {
        self.sprite.position = bounds.clamp(self.spawn);
        self.sprite.depth = self.sprite.position.y.round() as i32;
    }

    fn update(&mut self, ctx: &FrameContext<'_>) {
        let damage = ctx.damage_taken();
        if damage == 0 {
            return;
        }
        self.health = self.health.saturating_sub(damage);
        debug!(entity = %self.name, damage, health = self.health, "dummy_hit");
        if self.health == 0 {
            info!(entity = %self.name, frame = ctx.frame, "dummy_destroyed");
        }
    }

    fn is_dead(&self) -> bool {
        self.health == 0
    }

    fn sprite(&self) -> &Sprite {
        &self.sprite
    }
}

/// Walks toward the primary player and strikes it on a cooldown.
pub(crate) struct Enemy {
    name: String,
    spawn: Vec2,
    bounds: Option<WorldBounds>,
    sprite: Sprite,
    health: u32,
    cooldown_frames: u32,
    striking: bool,
}

impl Enemy {
    pub(crate) fn new(name: impl Into<String>, spawn: Vec2) -> Self {
        Self {
            name: name.into(),
            spawn,
            bounds: None,
            sprite: Sprite::new("enemy"),
            health: ENEMY_MAX_HEALTH,
            cooldown_frames: 0,
            striking: false,
        }
    }

    fn approach(&mut self, target: Vec2, fixed_dt_seconds: f32) -> f32 {
        let position = self.sprite.position;
        let distance = position.distance(target);
        if distance <= ENEMY_STANDOFF_PX {
            return distance;
        }
        let step = (ENEMY_SPEED_PX_PER_SECOND * fixed_dt_seconds).min(distance - ENEMY_STANDOFF_PX);
        let next = Vec2::new(
            position.x + (target.x - position.x) / distance * step,
            position.y + (target.y - position.y) / distance * step,
        );
        self.sprite.flip_x = target.x < position.x;
        self.sprite.position = match self.bounds {
            Some(bounds) => bounds.clamp(next),
            None => next,
        };
        self.sprite.position.distance(target)
    }
}

impl Entity for Enemy {
    fn name(&self) -> &str {
        &self.name
    }

    fn preload(&mut self, assets: &mut AssetManifest) {
        queue_npc_sheet(assets, &self.sprite.texture);
    }

    fn create(&mut self, bounds: &WorldBounds) {
        self.bounds = Some(*bounds);
        self.sprite.position = bounds.clamp(self.spawn);
        self.sprite.depth = self.sprite.position.y.round() as i32;
    }

    fn update(&mut self, ctx: &FrameContext<'_>) {
        self.striking = false;
        let damage = ctx.damage_taken();
        if damage > 0 {
            self.health = self.health.saturating_sub(damage);
            debug!(entity = %self.name, damage, health = self.health, "enemy_hit");
            if self.health == 0 {
                info!(entity = %self.name, frame = ctx.frame, "enemy_defeated");
                return;
            }
        }

        self.cooldown_frames = self.cooldown_frames.saturating_sub(1);
        let Some(target) = ctx.primary_position else {
            return;
        };
        let distance = self.approach(target, ctx.fixed_dt_seconds);
        self.sprite.depth = self.sprite.position.y.round() as i32;

        if self.cooldown_frames == 0 && distance <= ENEMY_REACH_PX {
            self.striking = true;
            self.cooldown_frames = ENEMY_STRIKE_COOLDOWN_FRAMES;
        }
    }

    fn is_dead(&self) -> bool {
        self.health == 0
    }

    fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    fn strike(&self) -> Option<Strike> {
        self.striking.then(|| Strike {
            origin: self.sprite.position,
            reach: ENEMY_REACH_PX,
            damage: ENEMY_STRIKE_DAMAGE,
        })
    }
}

use std::sync::Arc;

use engine::{
    AnimationSet, AssetManifest, Carrier, Direction, Entity, FrameContext, Sprite,
    SpritesheetRequest, Strike, Vec2, WeaponAttachment, WeaponConfig, WorldBounds,
};
use tracing::{debug, info};

use super::animation::AnimationClock;
use super::patrol::Patrol;

pub(crate) const PLAYER_SPRITESHEET_KEY: &str = "player";
const PLAYER_SPRITESHEET_PATH: &str = "player.png";
const PLAYER_FRAME_SIZE_PX: u32 = 32;
const PLAYER_FRAME_RATE: u32 = 8;
const PLAYER_SPEED_PX_PER_SECOND: f32 = 96.0;
pub(crate) const PLAYER_MAX_HEALTH: u32 = 100;
pub(crate) const PLAYER_SWING_PERIOD_FRAMES: u64 = 20;
pub(crate) const PLAYER_SWING_REACH_PX: f32 = 24.0;
pub(crate) const PLAYER_SWING_DAMAGE: u32 = 5;

/// Spritesheet frames of the walk cycle, three per facing.
pub(crate) fn player_walk_animation() -> AnimationSet {
    AnimationSet {
        up: vec![0, 1, 2],
        down: vec![3, 4, 5],
        side: vec![6, 7, 8],
    }
}

pub(crate) struct PlayerSpec {
    pub(crate) name: String,
    pub(crate) weapon: Arc<WeaponConfig>,
    pub(crate) spawn: Vec2,
    pub(crate) facing: Direction,
    pub(crate) patrol: Patrol,
}

/// The part of a player its weapon follows.
#[derive(Debug, Clone)]
struct PlayerBody {
    sprite: Sprite,
    direction: Direction,
    animation: AnimationClock,
    walk: AnimationSet,
}

impl PlayerBody {
    fn face(&mut self, direction: Direction) {
        if self.direction != direction {
            self.direction = direction;
            self.animation.reset();
        }
    }

    fn frame_count(&self) -> usize {
        self.walk.frames(self.direction.offset_category()).len()
    }

    fn sync_sprite(&mut self) {
        let frames = self.walk.frames(self.direction.offset_category());
        self.sprite.frame = frames.get(self.animation.frame()).copied().unwrap_or(0);
        self.sprite.flip_x = self.direction.is_mirrored();
        // Lower on screen draws on top.
        self.sprite.depth = self.sprite.position.y.round() as i32;
    }
}

impl Carrier for PlayerBody {
    fn direction(&self) -> Direction {
        self.direction
    }

    fn animation_frame(&self) -> usize {
        self.animation.frame()
    }

    fn position(&self) -> Vec2 {
        self.sprite.position
    }

    fn depth(&self) -> i32 {
        self.sprite.depth
    }
}

pub(crate) struct Player {
    name: String,
    spawn: Vec2,
    bounds: Option<WorldBounds>,
    body: PlayerBody,
    weapon: WeaponAttachment,
    health: u32,
    patrol: Patrol,
    swinging: bool,
}

impl Player {
    pub(crate) fn new(spec: PlayerSpec) -> Self {
        Self {
            name: spec.name,
            spawn: spec.spawn,
            bounds: None,
            body: PlayerBody {
                sprite: Sprite::new(PLAYER_SPRITESHEET_KEY),
                direction: spec.facing,
                animation: AnimationClock::new(PLAYER_FRAME_RATE),
                walk: player_walk_animation(),
            },
            weapon: WeaponAttachment::attach(spec.weapon),
            health: PLAYER_MAX_HEALTH,
            patrol: spec.patrol,
            swinging: false,
        }
    }

    pub(crate) fn health(&self) -> u32 {
        self.health
    }

    pub(crate) fn weapon(&self) -> &WeaponAttachment {
        &self.weapon
    }

    fn take_damage(&mut self, amount: u32) {
        if amount == 0 {
            return;
        }
        self.health = self.health.saturating_sub(amount);
        debug!(player = %self.name, amount, health = self.health, "player_damaged");
        if self.health == 0 {
            info!(player = %self.name, "player_defeated");
        }
    }

    fn walk(&mut self, fixed_dt_seconds: f32) {
        let step = self.body.direction.unit();
        let distance = PLAYER_SPEED_PX_PER_SECOND * fixed_dt_seconds;
        let position = Vec2::new(
            self.body.sprite.position.x + step.x * distance,
            self.body.sprite.position.y + step.y * distance,
        );
        self.body.sprite.position = match self.bounds {
            Some(bounds) => bounds.clamp(position),
            None => position,
        };
    }
}

impl Entity for Player {
    fn name(&self) -> &str {
        &self.name
    }

    fn preload(&mut self, assets: &mut AssetManifest) {
        assets.queue_spritesheet(SpritesheetRequest {
            key: PLAYER_SPRITESHEET_KEY.to_string(),
            path: PLAYER_SPRITESHEET_PATH.to_string(),
            frame_width: PLAYER_FRAME_SIZE_PX,
            frame_height: PLAYER_FRAME_SIZE_PX,
        });
        self.weapon.preload(assets);
    }

    fn create(&mut self, bounds: &WorldBounds) {
        self.bounds = Some(*bounds);
        self.body.sprite.position = bounds.clamp(self.spawn);
        self.body.sync_sprite();
        self.weapon.update(&self.body);
    }

    fn update(&mut self, ctx: &FrameContext<'_>) {
        self.swinging = false;
        self.take_damage(ctx.damage_taken());
        if self.is_dead() {
            return;
        }

        let moving = match self.patrol.advance() {
            Some(leg) => {
                self.body.face(leg.direction);
                leg.moving
            }
            None => false,
        };
        if moving {
            self.walk(ctx.fixed_dt_seconds);
            let frame_count = self.body.frame_count();
            self.body.animation.advance(ctx.fixed_dt_seconds, frame_count);
        } else {
            self.body.animation.reset();
        }
        self.body.sync_sprite();
        self.weapon.update(&self.body);

        self.swinging = ctx.frame % PLAYER_SWING_PERIOD_FRAMES == 0;
    }

    fn is_dead(&self) -> bool {
        self.health == 0
    }

    fn sprite(&self) -> &Sprite {
        &self.body.sprite
    }

    fn strike(&self) -> Option<Strike> {
        self.swinging.then(|| Strike {
            origin: self.weapon.sprite().position,
            reach: PLAYER_SWING_REACH_PX,
            damage: PLAYER_SWING_DAMAGE,
        })
    }

    fn as_carrier(&self) -> Option<&dyn Carrier> {
        Some(&self.body)
    }
}

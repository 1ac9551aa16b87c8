use std::sync::Arc;

use tracing::{debug, warn};

use super::scene::{Carrier, Direction, Sprite};
use crate::content::{AssetManifest, OffsetTable, SpritesheetRequest, WeaponConfig};

/// Weapon displacement for one carrier pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedOffset {
    pub dx: i32,
    pub dy: i32,
    pub mirrored: bool,
    /// Table index actually read, after clamping.
    pub frame_index: usize,
    pub clamped: bool,
}

/// Looks up the weapon offset for a carrier facing `direction` on `animation_frame`.
///
/// Frames past the end of the table read the last entry.
pub fn resolve_position(
    direction: Direction,
    animation_frame: usize,
    table: &OffsetTable,
) -> ResolvedOffset {
    let series = table.series(direction.offset_category());
    let last = series.x.len().min(series.y.len()).saturating_sub(1);
    let frame_index = animation_frame.min(last);
    let x = series.x.get(frame_index).copied().unwrap_or(0);
    let y = series.y.get(frame_index).copied().unwrap_or(0);
    let mirrored = direction.is_mirrored();

    ResolvedOffset {
        dx: if mirrored { x.saturating_neg() } else { x },
        dy: y,
        mirrored,
        frame_index,
        clamped: animation_frame > last,
    }
}

/// Mirrored weapons are drawn behind the carrier, all others in front.
pub fn weapon_depth(carrier_depth: i32, mirrored: bool) -> i32 {
    if mirrored {
        carrier_depth.saturating_sub(1)
    } else {
        carrier_depth.saturating_add(1)
    }
}

/// Visual state of a weapon that follows its carrier.
///
/// The carrier is not stored; it is passed to [`WeaponAttachment::update`]
/// every frame and only read.
#[derive(Debug, Clone)]
pub struct WeaponAttachment {
    config: Arc<WeaponConfig>,
    sprite: Sprite,
    frame_overflows: u64,
}

impl WeaponAttachment {
    pub fn attach(config: Arc<WeaponConfig>) -> Self {
        let sprite = Sprite::new(config.name());
        Self {
            config,
            sprite,
            frame_overflows: 0,
        }
    }

    pub fn config(&self) -> &WeaponConfig {
        &self.config
    }

    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    /// Times a carrier frame ran past the offset table and was clamped.
    pub fn frame_overflows(&self) -> u64 {
        self.frame_overflows
    }

    pub fn preload(&self, assets: &mut AssetManifest) {
        assets.queue_spritesheet(SpritesheetRequest::for_weapon(&self.config));
    }

    pub fn update<C: Carrier + ?Sized>(&mut self, carrier: &C) -> ResolvedOffset {
        let direction = carrier.direction();
        let requested_frame = carrier.animation_frame();
        let resolved = resolve_position(direction, requested_frame, self.config.offset());

        if resolved.clamped {
            self.frame_overflows = self.frame_overflows.saturating_add(1);
            if self.frame_overflows == 1 {
                warn!(
                    weapon = self.config.name(),
                    category = %direction.offset_category(),
                    requested_frame,
                    used_frame = resolved.frame_index,
                    "weapon_frame_overflow"
                );
            } else {
                debug!(
                    weapon = self.config.name(),
                    requested_frame,
                    used_frame = resolved.frame_index,
                    "weapon_frame_overflow"
                );
            }
        }

        let frames = self.config.animations().frames(direction.offset_category());
        self.sprite.frame = frames.get(resolved.frame_index).copied().unwrap_or(0);
        self.sprite.flip_x = resolved.mirrored;
        self.sprite.depth = weapon_depth(carrier.depth(), resolved.mirrored);
        self.sprite.position = carrier.position().offset_px(resolved.dx, resolved.dy);
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Vec2;
    use crate::content::{normalize, AnimationSet, OffsetSeries, RawWeaponConfig};

    struct StubCarrier {
        direction: Direction,
        frame: usize,
        position: Vec2,
        depth: i32,
    }

    impl Carrier for StubCarrier {
        fn direction(&self) -> Direction {
            self.direction
        }

        fn animation_frame(&self) -> usize {
            self.frame
        }

        fn position(&self) -> Vec2 {
            self.position
        }

        fn depth(&self) -> i32 {
            self.depth
        }
    }

    fn carrier(direction: Direction, frame: usize) -> StubCarrier {
        StubCarrier {
            direction,
            frame,
            position: Vec2::new(100.0, 50.0),
            depth: 10,
        }
    }

    fn sword_table() -> OffsetTable {
        OffsetTable {
            up: OffsetSeries {
                x: vec![3, 4],
                y: vec![-8, -9],
            },
            down: OffsetSeries {
                x: vec![-2, -3, -4],
                y: vec![7, 8, 9],
            },
            side: OffsetSeries {
                x: vec![0, 10, 20],
                y: vec![5, 6, 7],
            },
        }
    }

    fn sword() -> Arc<WeaponConfig> {
        let config = normalize(
            RawWeaponConfig::new("sword", "sword.png", 32, 32, 8)
                .with_animations(AnimationSet {
                    up: vec![6, 7],
                    down: vec![0, 1, 2],
                    side: vec![3, 4, 5],
                })
                .with_offset(sword_table()),
        )
        .expect("sword");
        Arc::new(config)
    }

    #[test]
    fn left_mirrors_side_offset_and_right_does_not() {
        let table = sword_table();
        for frame in 0..table.side.x.len() {
            let left = resolve_position(Direction::Left, frame, &table);
            let right = resolve_position(Direction::Right, frame, &table);

            assert_eq!((left.dx, left.dy, left.mirrored), (-table.side.x[frame], table.side.y[frame], true));
            assert_eq!((right.dx, right.dy, right.mirrored), (table.side.x[frame], table.side.y[frame], false));
            assert!(!left.clamped && !right.clamped);
        }
    }

    #[test]
    fn left_on_second_frame_negates_ten() {
        let resolved = resolve_position(Direction::Left, 1, &sword_table());
        assert_eq!(resolved.dx, -10);
        assert_eq!(resolved.dy, 6);
    }

    #[test]
    fn up_and_down_read_their_own_tables_unmirrored() {
        let table = sword_table();
        let up = resolve_position(Direction::Up, 1, &table);
        assert_eq!((up.dx, up.dy, up.mirrored), (4, -9, false));

        let down = resolve_position(Direction::Down, 2, &table);
        assert_eq!((down.dx, down.dy, down.mirrored), (-4, 9, false));
    }

    #[test]
    fn frame_past_table_end_clamps_to_last_entry() {
        let table = sword_table();
        let resolved = resolve_position(Direction::Up, 7, &table);
        assert_eq!(resolved.frame_index, 1);
        assert!(resolved.clamped);
        assert_eq!((resolved.dx, resolved.dy), (4, -9));

        let left = resolve_position(Direction::Left, 3, &table);
        assert_eq!(left.dx, -20);
        assert!(left.clamped);
    }

    #[test]
    fn default_table_resolves_to_zero_for_any_frame() {
        let table = OffsetTable::zero();
        for direction in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            let resolved = resolve_position(direction, 4, &table);
            assert_eq!((resolved.dx, resolved.dy), (0, 0), "{direction:?}");
        }
    }

    #[test]
    fn depth_is_behind_when_mirrored_and_in_front_otherwise() {
        for carrier_depth in [-100, -1, 0, 1, 42] {
            assert_eq!(weapon_depth(carrier_depth, true), carrier_depth - 1);
            assert_eq!(weapon_depth(carrier_depth, false), carrier_depth + 1);
        }
        assert_eq!(weapon_depth(i32::MIN, true), i32::MIN);
    }

    #[test]
    fn update_places_weapon_sprite_relative_to_carrier() {
        let mut weapon = WeaponAttachment::attach(sword());

        let facing_left = carrier(Direction::Left, 2);
        weapon.update(&facing_left);
        let sprite = weapon.sprite();
        assert_eq!(sprite.position, Vec2::new(80.0, 57.0));
        assert!(sprite.flip_x);
        assert_eq!(sprite.depth, 9);
        assert_eq!(sprite.frame, 5);
        assert_eq!(sprite.texture, "sword");

        let facing_down = StubCarrier {
            depth: -3,
            ..carrier(Direction::Down, 0)
        };
        weapon.update(&facing_down);
        let sprite = weapon.sprite();
        assert_eq!(sprite.position, Vec2::new(98.0, 57.0));
        assert!(!sprite.flip_x);
        assert_eq!(sprite.depth, -2);
        assert_eq!(sprite.frame, 0);
    }

    #[test]
    fn update_counts_overflows_and_keeps_running() {
        let mut weapon = WeaponAttachment::attach(sword());

        for _ in 0..3 {
            let resolved = weapon.update(&carrier(Direction::Right, 9));
            assert_eq!(resolved.frame_index, 2);
        }
        weapon.update(&carrier(Direction::Right, 1));

        assert_eq!(weapon.frame_overflows(), 3);
        assert_eq!(weapon.sprite().position, Vec2::new(110.0, 56.0));
    }

    #[test]
    fn preload_queues_weapon_spritesheet() {
        let weapon = WeaponAttachment::attach(sword());
        let mut assets = AssetManifest::default();
        weapon.preload(&mut assets);

        assert_eq!(assets.spritesheets()[0].key, "sword");
        assert_eq!(assets.spritesheets()[0].path, "sword.png");
    }
}

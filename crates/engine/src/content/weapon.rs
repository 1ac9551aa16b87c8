use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sprite_keys::{validate_sprite_path, SpritePathError};

/// Offset/animation bucket a facing direction reads from. Left and right share `Side`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OffsetCategory {
    Up,
    Down,
    Side,
}

impl OffsetCategory {
    pub const ALL: [OffsetCategory; 3] = [Self::Up, Self::Down, Self::Side];

    pub fn as_token(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Side => "side",
        }
    }
}

impl fmt::Display for OffsetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Y => f.write_str("y"),
        }
    }
}

/// Spritesheet frame numbers played per category, one entry per carrier animation frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnimationSet {
    pub up: Vec<u32>,
    pub down: Vec<u32>,
    pub side: Vec<u32>,
}

impl AnimationSet {
    pub fn single_frame() -> Self {
        Self {
            up: vec![0],
            down: vec![0],
            side: vec![0],
        }
    }

    pub fn frames(&self, category: OffsetCategory) -> &[u32] {
        match category {
            OffsetCategory::Up => &self.up,
            OffsetCategory::Down => &self.down,
            OffsetCategory::Side => &self.side,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OffsetSeries {
    pub x: Vec<i32>,
    pub y: Vec<i32>,
}

impl OffsetSeries {
    pub fn zero() -> Self {
        Self {
            x: vec![0],
            y: vec![0],
        }
    }

    pub fn axis(&self, axis: Axis) -> &[i32] {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }
}

/// Pixel displacement of the weapon from its carrier, per category and carrier frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OffsetTable {
    pub up: OffsetSeries,
    pub down: OffsetSeries,
    pub side: OffsetSeries,
}

impl OffsetTable {
    pub fn zero() -> Self {
        Self {
            up: OffsetSeries::zero(),
            down: OffsetSeries::zero(),
            side: OffsetSeries::zero(),
        }
    }

    pub fn series(&self, category: OffsetCategory) -> &OffsetSeries {
        match category {
            OffsetCategory::Up => &self.up,
            OffsetCategory::Down => &self.down,
            OffsetCategory::Side => &self.side,
        }
    }
}

/// Weapon definition as authored, before defaults are applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawWeaponConfig {
    pub name: String,
    pub path: String,
    pub frame_width: u32,
    pub frame_height: u32,
    pub frame_rate: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animations: Option<AnimationSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<OffsetTable>,
}

impl RawWeaponConfig {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        frame_width: u32,
        frame_height: u32,
        frame_rate: u32,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            frame_width,
            frame_height,
            frame_rate,
            animations: None,
            offset: None,
        }
    }

    pub fn with_animations(mut self, animations: AnimationSet) -> Self {
        self.animations = Some(animations);
        self
    }

    pub fn with_offset(mut self, offset: OffsetTable) -> Self {
        self.offset = Some(offset);
        self
    }
}

impl From<&WeaponConfig> for RawWeaponConfig {
    fn from(config: &WeaponConfig) -> Self {
        Self {
            name: config.name.clone(),
            path: config.path.clone(),
            frame_width: config.frame_width,
            frame_height: config.frame_height,
            frame_rate: config.frame_rate,
            animations: Some(config.animations.clone()),
            offset: Some(config.offset.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("weapon name must not be empty")]
    EmptyName,
    #[error("weapon '{weapon}' has an invalid sprite path: {source}")]
    InvalidPath {
        weapon: String,
        #[source]
        source: SpritePathError,
    },
    #[error("weapon '{weapon}' field {field} must be a positive integer")]
    NonPositive { weapon: String, field: &'static str },
    #[error("weapon '{weapon}' animation '{category}' has no frames")]
    EmptyAnimation {
        weapon: String,
        category: OffsetCategory,
    },
    #[error(
        "weapon '{weapon}' offset.{category}.{axis} has {actual} entries but animation '{category}' has {expected} frames"
    )]
    OffsetLengthMismatch {
        weapon: String,
        category: OffsetCategory,
        axis: Axis,
        expected: usize,
        actual: usize,
    },
}

/// Fully populated weapon definition. Built only through [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeaponConfig {
    name: String,
    path: String,
    frame_width: u32,
    frame_height: u32,
    frame_rate: u32,
    animations: AnimationSet,
    offset: OffsetTable,
}

impl WeaponConfig {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn frame_width(&self) -> u32 {
        self.frame_width
    }

    pub fn frame_height(&self) -> u32 {
        self.frame_height
    }

    pub fn frame_rate(&self) -> u32 {
        self.frame_rate
    }

    pub fn animations(&self) -> &AnimationSet {
        &self.animations
    }

    pub fn offset(&self) -> &OffsetTable {
        &self.offset
    }

    /// Number of carrier animation frames the tables cover for `category`. Always at least 1.
    pub fn frame_count(&self, category: OffsetCategory) -> usize {
        self.animations.frames(category).len()
    }
}

/// Fills in absent animations and offsets, then checks every table against its animation.
///
/// Present sections are kept as authored, so normalizing the raw form of an
/// already normalized config yields the same config.
pub fn normalize(raw: RawWeaponConfig) -> Result<WeaponConfig, ConfigError> {
    let RawWeaponConfig {
        name,
        path,
        frame_width,
        frame_height,
        frame_rate,
        animations,
        offset,
    } = raw;

    let config = WeaponConfig {
        animations: animations.unwrap_or_else(AnimationSet::single_frame),
        offset: offset.unwrap_or_else(OffsetTable::zero),
        name,
        path,
        frame_width,
        frame_height,
        frame_rate,
    };
    validate(&config)?;
    Ok(config)
}

fn validate(config: &WeaponConfig) -> Result<(), ConfigError> {
    if config.name.trim().is_empty() {
        return Err(ConfigError::EmptyName);
    }
    validate_sprite_path(&config.path).map_err(|source| ConfigError::InvalidPath {
        weapon: config.name.clone(),
        source,
    })?;
    for (field, value) in [
        ("frameWidth", config.frame_width),
        ("frameHeight", config.frame_height),
        ("frameRate", config.frame_rate),
    ] {
        if value == 0 {
            return Err(ConfigError::NonPositive {
                weapon: config.name.clone(),
                field,
            });
        }
    }

    for category in OffsetCategory::ALL {
        let expected = config.animations.frames(category).len();
        if expected == 0 {
            return Err(ConfigError::EmptyAnimation {
                weapon: config.name.clone(),
                category,
            });
        }
        let series = config.offset.series(category);
        for axis in [Axis::X, Axis::Y] {
            let actual = series.axis(axis).len();
            if actual != expected {
                return Err(ConfigError::OffsetLengthMismatch {
                    weapon: config.name.clone(),
                    category,
                    axis,
                    expected,
                    actual,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare(name: &str) -> RawWeaponConfig {
        RawWeaponConfig::new(name, "weapon1.png", 32, 32, 8)
    }

    fn three_frame_side() -> (AnimationSet, OffsetTable) {
        let animations = AnimationSet {
            up: vec![0],
            down: vec![1],
            side: vec![2, 3, 4],
        };
        let offset = OffsetTable {
            up: OffsetSeries { x: vec![0], y: vec![-4] },
            down: OffsetSeries { x: vec![2], y: vec![6] },
            side: OffsetSeries {
                x: vec![0, 10, 20],
                y: vec![1, 2, 3],
            },
        };
        (animations, offset)
    }

    #[test]
    fn missing_sections_get_single_frame_defaults() {
        let config = normalize(bare("weapon1")).expect("normalize");

        assert_eq!(config.animations(), &AnimationSet::single_frame());
        for category in OffsetCategory::ALL {
            assert_eq!(config.animations().frames(category), &[0]);
            assert_eq!(config.offset().series(category), &OffsetSeries::zero());
            assert_eq!(config.frame_count(category), 1);
        }
    }

    #[test]
    fn authored_sections_are_kept() {
        let (animations, offset) = three_frame_side();
        let config = normalize(
            bare("weapon1")
                .with_animations(animations.clone())
                .with_offset(offset.clone()),
        )
        .expect("normalize");

        assert_eq!(config.animations(), &animations);
        assert_eq!(config.offset(), &offset);
        assert_eq!(config.frame_count(OffsetCategory::Side), 3);
    }

    #[test]
    fn normalizing_twice_is_a_no_op() {
        let (animations, offset) = three_frame_side();
        for raw in [
            bare("plain"),
            bare("authored").with_animations(animations).with_offset(offset),
        ] {
            let once = normalize(raw).expect("first pass");
            let twice = normalize(RawWeaponConfig::from(&once)).expect("second pass");
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn offset_without_animations_is_rejected() {
        let (_, offset) = three_frame_side();
        let err = normalize(bare("weapon1").with_offset(offset)).expect_err("mismatch");
        assert_eq!(
            err,
            ConfigError::OffsetLengthMismatch {
                weapon: "weapon1".to_string(),
                category: OffsetCategory::Side,
                axis: Axis::X,
                expected: 1,
                actual: 3,
            }
        );
    }

    #[test]
    fn y_series_shorter_than_animation_is_rejected() {
        let (animations, mut offset) = three_frame_side();
        offset.side.y.pop();
        let err = normalize(bare("weapon1").with_animations(animations).with_offset(offset))
            .expect_err("mismatch");
        assert!(matches!(
            err,
            ConfigError::OffsetLengthMismatch {
                category: OffsetCategory::Side,
                axis: Axis::Y,
                expected: 3,
                actual: 2,
                ..
            }
        ));
    }

    #[test]
    fn animations_without_offset_are_rejected_when_longer_than_one_frame() {
        let (animations, _) = three_frame_side();
        let err = normalize(bare("weapon1").with_animations(animations)).expect_err("mismatch");
        assert!(matches!(
            err,
            ConfigError::OffsetLengthMismatch {
                category: OffsetCategory::Side,
                expected: 3,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn empty_animation_is_rejected() {
        let animations = AnimationSet {
            up: Vec::new(),
            down: vec![0],
            side: vec![0],
        };
        let offset = OffsetTable {
            up: OffsetSeries {
                x: Vec::new(),
                y: Vec::new(),
            },
            ..OffsetTable::zero()
        };
        let err = normalize(bare("weapon1").with_animations(animations).with_offset(offset))
            .expect_err("empty");
        assert!(matches!(
            err,
            ConfigError::EmptyAnimation {
                category: OffsetCategory::Up,
                ..
            }
        ));
    }

    #[test]
    fn zero_geometry_and_bad_identity_are_rejected() {
        assert_eq!(
            normalize(RawWeaponConfig::new("w", "w.png", 0, 32, 8)),
            Err(ConfigError::NonPositive {
                weapon: "w".to_string(),
                field: "frameWidth",
            })
        );
        assert_eq!(
            normalize(RawWeaponConfig::new("w", "w.png", 32, 32, 0)),
            Err(ConfigError::NonPositive {
                weapon: "w".to_string(),
                field: "frameRate",
            })
        );
        assert_eq!(normalize(bare("  ")), Err(ConfigError::EmptyName));
        assert!(matches!(
            normalize(RawWeaponConfig::new("w", "../w.png", 32, 32, 8)),
            Err(ConfigError::InvalidPath {
                source: SpritePathError::ParentTraversal,
                ..
            })
        ));
    }

    #[test]
    fn raw_config_parses_camel_case_json_without_optional_sections() {
        let raw: RawWeaponConfig = serde_json::from_value(serde_json::json!({
            "name": "weapon1",
            "path": "weapon1.png",
            "frameWidth": 48,
            "frameHeight": 24,
            "frameRate": 10
        }))
        .expect("parse");

        assert_eq!(raw, RawWeaponConfig::new("weapon1", "weapon1.png", 48, 24, 10));
    }

    #[test]
    fn raw_config_rejects_unknown_keys() {
        let result = serde_json::from_value::<RawWeaponConfig>(serde_json::json!({
            "name": "weapon1",
            "path": "weapon1.png",
            "frameWidth": 48,
            "frameHeight": 24,
            "frameRate": 10,
            "damage": 3
        }));
        assert!(result.is_err());
    }
}

mod assets;
mod library;
mod weapon;

pub use assets::{AssetManifest, SpritesheetRequest};
pub use library::{load_weapon_library, WeaponLibrary, WeaponLoadError};
pub use weapon::{
    normalize, AnimationSet, Axis, ConfigError, OffsetCategory, OffsetSeries, OffsetTable,
    RawWeaponConfig, WeaponConfig,
};

use super::weapon::WeaponConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpritesheetRequest {
    pub key: String,
    pub path: String,
    pub frame_width: u32,
    pub frame_height: u32,
}

impl SpritesheetRequest {
    pub fn for_weapon(config: &WeaponConfig) -> Self {
        Self {
            key: config.name().to_string(),
            path: config.path().to_string(),
            frame_width: config.frame_width(),
            frame_height: config.frame_height(),
        }
    }
}

/// Spritesheets queued during preload, handed to the asset loader before `create`.
#[derive(Debug, Default, Clone)]
pub struct AssetManifest {
    spritesheets: Vec<SpritesheetRequest>,
}

impl AssetManifest {
    /// Queues `request` unless its key is already queued. Returns whether it was added.
    pub fn queue_spritesheet(&mut self, request: SpritesheetRequest) -> bool {
        if self
            .spritesheets
            .iter()
            .any(|queued| queued.key == request.key)
        {
            return false;
        }
        self.spritesheets.push(request);
        true
    }

    pub fn spritesheets(&self) -> &[SpritesheetRequest] {
        &self.spritesheets
    }

    pub fn len(&self) -> usize {
        self.spritesheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spritesheets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::weapon::{normalize, RawWeaponConfig};

    #[test]
    fn duplicate_keys_are_queued_once() {
        let config = normalize(RawWeaponConfig::new("sword", "sword.png", 32, 16, 8)).expect("sword");
        let mut manifest = AssetManifest::default();

        assert!(manifest.queue_spritesheet(SpritesheetRequest::for_weapon(&config)));
        assert!(!manifest.queue_spritesheet(SpritesheetRequest::for_weapon(&config)));

        assert_eq!(manifest.len(), 1);
        assert_eq!(
            manifest.spritesheets()[0],
            SpritesheetRequest {
                key: "sword".to_string(),
                path: "sword.png".to_string(),
                frame_width: 32,
                frame_height: 16,
            }
        );
    }
}

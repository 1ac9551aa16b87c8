use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpritePathError {
    #[error("sprite path must not be empty")]
    Empty,
    #[error("sprite path must be relative to the sprites directory")]
    LeadingSlash,
    #[error("sprite path must not contain '\\\\'")]
    Backslash,
    #[error("sprite path must not contain '..'")]
    ParentTraversal,
    #[error("sprite path must name a file, got a trailing '/'")]
    TrailingSlash,
    #[error("sprite path contains invalid character '{character}'")]
    InvalidCharacter { character: char },
}

/// Checks a spritesheet locator relative to `assets/sprites`.
pub(crate) fn validate_sprite_path(path: &str) -> Result<(), SpritePathError> {
    if path.is_empty() {
        return Err(SpritePathError::Empty);
    }
    if path.starts_with('/') {
        return Err(SpritePathError::LeadingSlash);
    }
    if path.ends_with('/') {
        return Err(SpritePathError::TrailingSlash);
    }
    if path.contains('\\') {
        return Err(SpritePathError::Backslash);
    }
    if path.contains("..") {
        return Err(SpritePathError::ParentTraversal);
    }
    for ch in path.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '_' | '/' | '-' | '.') {
            continue;
        }
        return Err(SpritePathError::InvalidCharacter { character: ch });
    }
    Ok(())
}

//! rlg-save: Save/restore plumbing for the dungeon layout
//!
//! The byte format lives in `rlg_core::world::layout`; this crate only moves
//! records between memory and disk.

use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;

use rlg_core::dungeon::{Level, Position};
use rlg_core::world::{SaveFormatError, SavedDungeon, decode, encode};
use rlg_core::{DUNGEON_X, DUNGEON_Y};

/// Directory under the home directory holding saves
pub const SAVE_DIR: &str = ".rlg327";

/// File name of the default save
pub const SAVE_FILE: &str = "dungeon";

/// Save/restore errors
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt save: {0}")]
    Format(#[from] SaveFormatError),

    #[error("Save file not found")]
    NotFound,
}

/// `$HOME/.rlg327/dungeon`, or relative to the working directory without a home
pub fn default_save_path() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(SAVE_DIR);
    path.push(SAVE_FILE);
    path
}

/// Write a level and the player's position, creating parent directories
pub fn save_dungeon(
    path: impl AsRef<Path>,
    level: &Level,
    player: Position,
) -> Result<(), SaveError> {
    let path = path.as_ref();
    let bytes = encode(level, player)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&bytes)?;
    writer.flush()?;
    info!("saved {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Load a standard-size dungeon
pub fn load_dungeon(path: impl AsRef<Path>) -> Result<SavedDungeon, SaveError> {
    load_dungeon_sized(path, DUNGEON_X, DUNGEON_Y)
}

/// Load a dungeon of the given dimensions
pub fn load_dungeon_sized(
    path: impl AsRef<Path>,
    width: usize,
    height: usize,
) -> Result<SavedDungeon, SaveError> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => SaveError::NotFound,
        _ => SaveError::Io(err),
    })?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    debug!("read {} bytes from {}", bytes.len(), path.display());
    Ok(decode(&bytes, width, height)?)
}

/// Check if a save file exists
pub fn save_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().exists()
}

/// Delete a save file
pub fn delete_save(path: impl AsRef<Path>) -> Result<(), SaveError> {
    fs::remove_file(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rlg_core::GameRng;
    use rlg_core::dungeon::generate_level;
    use rlg_core::world::GenerationConfig;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("rlg_save_test_{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("roundtrip");
        let level = generate_level(&GenerationConfig::default(), &mut GameRng::new(7)).unwrap();
        let player = level.rooms()[0].origin();

        save_dungeon(&path, &level, player).unwrap();
        assert!(save_exists(&path));

        let loaded = load_dungeon(&path).unwrap();
        assert_eq!(loaded.player, player);
        assert_eq!(loaded.level.rooms(), level.rooms());
        assert_eq!(loaded.level.hardness_map(), level.hardness_map());

        delete_save(&path).unwrap();
        assert!(!save_exists(&path));
    }

    #[test]
    fn test_corrupt_file() {
        let path = temp_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"not a dungeon at all").unwrap();
        let result = load_dungeon(&path);
        assert!(matches!(result, Err(SaveError::Format(SaveFormatError::BadTag))));
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_nonexistent() {
        let result = load_dungeon("/nonexistent/path/dungeon");
        assert!(matches!(result, Err(SaveError::NotFound)));
    }

    #[test]
    fn test_default_path_layout() {
        let path = default_save_path();
        assert!(path.ends_with(Path::new(SAVE_DIR).join(SAVE_FILE)));
    }
}

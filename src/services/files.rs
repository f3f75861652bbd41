use std::{fs, path::Path};

use anyhow::Context;
use tracing::debug;

fn create_dir_if_nonexistent(directory_path: &Path) -> anyhow::Result<()> {
    if !directory_path.exists() {
        fs::create_dir_all(directory_path)
            .with_context(|| format!("Couldn't create folder at {:?}", directory_path))?;
        debug!("Folder created at: {:?}", directory_path);
    } else {
        debug!("Folder already exists at: {:?}.", directory_path);
    }
    Ok(())
}

pub fn create_necessary_directories(cache_dir: &Path) -> anyhow::Result<()> {
    create_dir_if_nonexistent(cache_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_nested_cache_directory_once() {
        let dir = tempfile::tempdir().unwrap();
        let cache_dir = dir.path().join("a").join("cache");

        create_necessary_directories(&cache_dir).unwrap();
        create_necessary_directories(&cache_dir).unwrap();

        assert!(cache_dir.is_dir());
    }
}

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::constants::{NODE_CONFIG_FILENAME, NODE_CONFIG_SUBDIR};

/// Path of the config the testnet writes for its single node.
#[must_use]
pub fn node_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(NODE_CONFIG_SUBDIR).join(NODE_CONFIG_FILENAME)
}

/// Ensure the directory holding `file` exists so it can be created.
pub fn ensure_parent_dir(file: &Path) -> io::Result<()> {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_config_lives_under_first_node_dir() {
        assert_eq!(
            node_config_path(Path::new("/tmp/testnet")),
            PathBuf::from("/tmp/testnet/0/node.yaml")
        );
    }

    #[test]
    fn ensure_parent_dir_creates_missing_dirs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("logs").join("nested").join("stdout.log");

        ensure_parent_dir(&file).expect("create parents");

        assert!(file.parent().is_some_and(Path::is_dir));
        ensure_parent_dir(Path::new("bare.log")).expect("no parent is fine");
    }
}

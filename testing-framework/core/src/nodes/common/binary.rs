use std::{
    env,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

pub struct BinaryConfig {
    pub env_override: Option<PathBuf>,
    pub binary_name: &'static str,
    pub fallback_path: &'static str,
}

pub struct BinaryResolver;

impl BinaryResolver {
    pub fn resolve_path(config: &BinaryConfig) -> PathBuf {
        if let Some(resolved) = config.env_override.clone() {
            info!(
                binary = config.binary_name,
                path = %resolved.display(),
                "resolved binary from env override"
            );
            return resolved;
        }
        if let Some(path) = Self::which_on_path(config.binary_name) {
            info!(
                binary = config.binary_name,
                path = %path.display(),
                "resolved binary from PATH"
            );
            return path;
        }
        let fallback = PathBuf::from(config.fallback_path);

        debug!(
            binary = config.binary_name,
            path = %fallback.display(),
            "falling back to binary path"
        );
        fallback
    }

    fn which_on_path(bin: &str) -> Option<PathBuf> {
        let path_env = env::var_os("PATH")?;
        Self::find_in_dirs(env::split_paths(&path_env), bin)
    }

    fn find_in_dirs<I, P>(dirs: I, bin: &str) -> Option<PathBuf>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        dirs.into_iter()
            .map(|dir| dir.as_ref().join(bin))
            .find(|candidate| candidate.is_file())
    }
}

use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "rollcall";

/// Concrete on-disk locations derived from the application data root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub data_root: PathBuf,
    pub config_path: PathBuf,
    pub store_path: PathBuf,
    pub logs_dir: PathBuf,
}

impl AppPaths {
    pub fn from_data_root(data_root: impl AsRef<Path>) -> Self {
        let data_root = data_root.as_ref().to_path_buf();
        Self {
            config_path: data_root.join("config.toml"),
            store_path: data_root.join("store.json"),
            logs_dir: data_root.join("logs"),
            data_root,
        }
    }

    /// Paths under the platform's local data directory.
    pub fn resolve() -> anyhow::Result<Self> {
        let base = dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("local data directory unavailable"))?;
        Ok(Self::from_data_root(base.join(APP_DIR_NAME)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_locations_from_data_root() {
        let paths = AppPaths::from_data_root("/tmp/rollcall");

        assert_eq!(paths.config_path, PathBuf::from("/tmp/rollcall/config.toml"));
        assert_eq!(paths.store_path, PathBuf::from("/tmp/rollcall/store.json"));
        assert_eq!(paths.logs_dir, PathBuf::from("/tmp/rollcall/logs"));
    }
}

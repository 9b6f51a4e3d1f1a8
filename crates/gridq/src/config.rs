use gridq_core::{db::Db, error::Error};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

///
/// StoreConfig
///
/// Deployment-side settings for opening a store, deserialized from the
/// host application's configuration. Choosing between environments
/// (dev/prod paths) stays with the host; the engine only needs the result.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database file; in-memory when unset.
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    pub fn open(&self) -> Result<Db, Error> {
        match &self.path {
            Some(path) => Db::open(path),
            None => Db::open_in_memory(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_path_opens_in_memory() {
        let config: StoreConfig = serde_json::from_str("{}").unwrap();
        assert!(config.path.is_none());
        assert!(config.open().is_ok());
    }
}

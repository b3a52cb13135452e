use std::{path::Path, str};

use anyhow::{Context, Result};
use rocksdb::{Options, DB};

use super::KeyValueStore;

pub struct RocksStore {
    db: DB,
}

impl RocksStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create store dir at {}", parent.display()))?;
        }

        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path)
            .with_context(|| format!("Failed to open vote store at {}", path.display()))?;
        Ok(Self { db })
    }
}

impl KeyValueStore for RocksStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self.db.get(key)? {
            Some(raw) => Ok(Some(str::from_utf8(&raw)?.to_string())),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db.put(key, value.as_bytes())?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.db.delete(key)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("votes");

        {
            let store = RocksStore::open(&path).unwrap();
            store.set("voted:abc:1", r#"{"type":"support"}"#).unwrap();
            store.set("voted:abc:2", r#"{"type":"oppose"}"#).unwrap();
            store.remove("voted:abc:2").unwrap();
        }

        let store = RocksStore::open(&path).unwrap();
        assert_eq!(
            store.get("voted:abc:1").unwrap().as_deref(),
            Some(r#"{"type":"support"}"#)
        );
        assert!(store.get("voted:abc:2").unwrap().is_none());
    }
}

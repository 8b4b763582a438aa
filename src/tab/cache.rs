//! An explicit table cache keyed by path and modification time. Each source
//! file is loaded at most once per run; a file that changed on disk since it
//! was cached is reloaded.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::debug;
use snafu::prelude::*;

use survey_pipeline::RawTable;

use crate::tab::{ReadingMetadataSnafu, TabResult};

struct CachedTable {
    modified: SystemTime,
    table: RawTable,
}

#[derive(Default)]
pub struct TableCache {
    entries: HashMap<PathBuf, CachedTable>,
}

impl TableCache {
    pub fn new() -> TableCache {
        TableCache {
            entries: HashMap::new(),
        }
    }

    /// The table for `path`, loading it with `loader` on a miss or when the
    /// file changed on disk since it was cached.
    pub fn load_with<F>(&mut self, path: &Path, loader: F) -> TabResult<&RawTable>
    where
        F: FnOnce(&Path) -> TabResult<RawTable>,
    {
        let modified = fs_modified(path)?;
        match self.entries.entry(path.to_path_buf()) {
            Entry::Occupied(mut e) => {
                if e.get().modified != modified {
                    debug!("load_with: {:?} changed on disk, reloading", path);
                    let table = loader(path)?;
                    e.insert(CachedTable { modified, table });
                } else {
                    debug!("load_with: cache hit for {:?}", path);
                }
                Ok(&e.into_mut().table)
            }
            Entry::Vacant(e) => {
                let table = loader(path)?;
                Ok(&e.insert(CachedTable { modified, table }).table)
            }
        }
    }

    pub fn invalidate(&mut self, path: &Path) {
        self.entries.remove(path);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn fs_modified(path: &Path) -> TabResult<SystemTime> {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .context(ReadingMetadataSnafu {
            path: path.display().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tab::io_csv::read_csv_table;
    use std::cell::Cell;
    use std::fs;

    #[test]
    fn second_load_is_a_cache_hit() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("t.csv");
        fs::write(&p, "a,b\n1,2\n").unwrap();
        let loads = Cell::new(0);
        let mut cache = TableCache::new();

        let t1 = cache
            .load_with(&p, |path| {
                loads.set(loads.get() + 1);
                read_csv_table(path, 1)
            })
            .unwrap()
            .clone();
        assert_eq!(loads.get(), 1);

        let t2 = cache
            .load_with(&p, |path| {
                loads.set(loads.get() + 1);
                read_csv_table(path, 1)
            })
            .unwrap()
            .clone();
        assert_eq!(loads.get(), 1);
        assert_eq!(t1, t2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn invalidation_forces_a_reload() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("t.csv");
        fs::write(&p, "a,b\n1,2\n").unwrap();
        let loads = Cell::new(0);
        let mut cache = TableCache::new();

        cache
            .load_with(&p, |path| {
                loads.set(loads.get() + 1);
                read_csv_table(path, 1)
            })
            .unwrap();
        fs::write(&p, "a,b\n3,4\n").unwrap();
        cache.invalidate(&p);

        let t = cache
            .load_with(&p, |path| {
                loads.set(loads.get() + 1);
                read_csv_table(path, 1)
            })
            .unwrap();
        assert_eq!(loads.get(), 2);
        assert_eq!(t.rows[0][0], "3");

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut cache = TableCache::new();
        let res = cache.load_with(Path::new("/nonexistent/t.csv"), |path| {
            read_csv_table(path, 1)
        });
        assert!(res.is_err());
    }
}

//! 按首字母分文件的词典目录：`dir/a.json` … `dir/z.json`。
//!
//! 每个文件是一个 JSON 对象 `{"音节": ["词", ...]}`，词表顺序即偏好顺序；
//! 音节按文件中的出现顺序保存，前缀联想的同长度候选沿用这个顺序。

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use ime_core::dictionary::Partition;
use ime_core::error::LoadError;
use ime_core::input::PartitionKey;
use ime_core::store::PartitionSource;
use indexmap::IndexMap;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct JsonDirSource {
    dir: PathBuf,
}

impl JsonDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: PartitionKey) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl PartitionSource for JsonDirSource {
    fn fetch(&self, key: PartitionKey) -> Result<Partition, LoadError> {
        let path = self.path_for(key);
        debug!(path = %path.display(), "读取分区文件");
        let bytes = match fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(LoadError::NotFound(key)),
            Err(e) => return Err(e.into()),
        };
        let entries: IndexMap<String, Vec<String>> = serde_json::from_slice(&bytes)
            .map_err(|e| LoadError::Malformed(format!("{}: {e}", path.display())))?;
        Ok(Partition::from_entries(key, entries))
    }

    /// 只列出实际存在文件的字母。
    fn available(&self) -> Vec<PartitionKey> {
        PartitionKey::all()
            .filter(|k| self.path_for(*k).is_file())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(c: char) -> PartitionKey {
        PartitionKey::new(c).unwrap()
    }

    #[test]
    fn reads_partition_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("d.json"),
            r#"{"da": ["大", "达"], "dan": ["但"], "de": []}"#,
        )
        .unwrap();
        fs::write(dir.path().join("n.json"), "not json").unwrap();

        let source = JsonDirSource::new(dir.path());
        assert_eq!(source.available(), vec![key('d'), key('n')]);

        let p = source.fetch(key('d')).unwrap();
        assert_eq!(p.get("da").unwrap(), ["大", "达"]);
        // 空词表被丢弃
        assert!(p.get("de").is_none());

        assert!(matches!(source.fetch(key('n')), Err(LoadError::Malformed(_))));
        assert!(matches!(source.fetch(key('z')), Err(LoadError::NotFound(_))));
    }
}

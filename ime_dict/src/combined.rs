//! 单文件合并词典：`{"a": {"a": ["啊", ...], ...}, "b": {...}}`。
//!
//! 整个文件在第一次 fetch 时读入并解析（读取过程汇报进度），之后各分区从内存中取出。
//! 解析失败会被记住，之后每个分区都以同样的错误失败。

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ime_core::dictionary::Partition;
use ime_core::error::LoadError;
use ime_core::input::PartitionKey;
use ime_core::store::PartitionSource;
use indexmap::IndexMap;
use tracing::{debug, info, warn};

/// 读取进度（字节）。`total` 为 0 表示大小未知。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProgress {
    pub read: u64,
    pub total: u64,
}

impl LoadProgress {
    /// 0..=100；大小未知时为 None。
    pub fn percent(&self) -> Option<u8> {
        if self.total == 0 {
            return None;
        }
        Some(((self.read.min(self.total) * 100) / self.total) as u8)
    }
}

type ProgressFn = Box<dyn Fn(LoadProgress) + Send + Sync>;

type RawPartitions = HashMap<PartitionKey, IndexMap<String, Vec<String>>>;

#[derive(Debug, Clone)]
enum BlobFailure {
    Io(io::ErrorKind, String),
    Parse(String),
}

impl BlobFailure {
    fn to_load_error(&self) -> LoadError {
        match self {
            BlobFailure::Io(kind, msg) => LoadError::Io(io::Error::new(*kind, msg.clone())),
            BlobFailure::Parse(msg) => LoadError::Malformed(msg.clone()),
        }
    }
}

pub struct CombinedJsonSource {
    path: PathBuf,
    progress: Option<ProgressFn>,
    blob: Mutex<Option<Result<RawPartitions, BlobFailure>>>,
}

impl CombinedJsonSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            progress: None,
            blob: Mutex::new(None),
        }
    }

    /// 读取文件时回调进度（例如驱动进度条）。
    pub fn with_progress(mut self, f: impl Fn(LoadProgress) + Send + Sync + 'static) -> Self {
        self.progress = Some(Box::new(f));
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_blob(&self) -> Result<RawPartitions, BlobFailure> {
        let io_failure = |e: io::Error| BlobFailure::Io(e.kind(), format!("{}: {e}", self.path.display()));
        let file = File::open(&self.path).map_err(io_failure)?;
        let total = file.metadata().map(|m| m.len()).unwrap_or(0);
        let reader = BufReader::new(ProgressReader {
            inner: file,
            read: 0,
            total,
            callback: self.progress.as_deref(),
            last_percent: None,
        });
        let raw: HashMap<String, IndexMap<String, Vec<String>>> = serde_json::from_reader(reader)
            .map_err(|e| {
                if e.is_io() {
                    BlobFailure::Io(io::ErrorKind::Other, e.to_string())
                } else {
                    BlobFailure::Parse(format!("{}: {e}", self.path.display()))
                }
            })?;

        let mut out = RawPartitions::new();
        for (letter, entries) in raw {
            let mut chars = letter.chars();
            match (chars.next().map(PartitionKey::new), chars.next()) {
                (Some(Ok(key)), None) => {
                    out.insert(key, entries);
                }
                _ => warn!(%letter, "忽略非法的分区名"),
            }
        }
        info!(path = %self.path.display(), partitions = out.len(), bytes = total, "合并词典解析完成");
        Ok(out)
    }
}

impl PartitionSource for CombinedJsonSource {
    fn fetch(&self, key: PartitionKey) -> Result<Partition, LoadError> {
        let mut guard = self
            .blob
            .lock()
            .map_err(|_| LoadError::Malformed("词典缓存锁已损坏".to_string()))?;
        let blob = guard.get_or_insert_with(|| self.read_blob());
        match blob {
            // store 对每个字母只 fetch 一次，直接移出，避免保留两份数据
            Ok(partitions) => partitions
                .remove(&key)
                .map(|entries| Partition::from_entries(key, entries))
                .ok_or(LoadError::NotFound(key)),
            Err(failure) => Err(failure.to_load_error()),
        }
    }

    fn available(&self) -> Vec<PartitionKey> {
        let Ok(mut guard) = self.blob.lock() else {
            return Vec::new();
        };
        match guard.get_or_insert_with(|| self.read_blob()) {
            Ok(partitions) => {
                let mut keys: Vec<PartitionKey> = partitions.keys().copied().collect();
                keys.sort();
                keys
            }
            Err(_) => PartitionKey::all().collect(),
        }
    }
}

struct ProgressReader<'a, R> {
    inner: R,
    read: u64,
    total: u64,
    callback: Option<&'a (dyn Fn(LoadProgress) + Send + Sync)>,
    last_percent: Option<u8>,
}

impl<R: Read> Read for ProgressReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n == 0 {
            return Ok(0);
        }
        self.read += n as u64;
        let progress = LoadProgress {
            read: self.read,
            total: self.total,
        };
        if let Some(cb) = self.callback {
            cb(progress);
        }
        let percent = progress.percent();
        if percent.is_some() && percent.map(|p| p / 10) != self.last_percent.map(|p| p / 10) {
            debug!(read = self.read, total = self.total, percent, "读取合并词典");
            self.last_percent = percent;
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;

    fn key(c: char) -> PartitionKey {
        PartitionKey::new(c).unwrap()
    }

    const BLOB: &str = r#"{
        "d": {"da": ["大", "达"], "dan": ["但"], "dang": ["当"]},
        "n": {"ni": ["你"]},
        "zz": {"zz": ["x"]}
    }"#;

    #[test]
    fn splits_blob_into_partitions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dict.json");
        fs::write(&path, BLOB).unwrap();

        let last_read = Arc::new(AtomicU64::new(0));
        let seen = Arc::clone(&last_read);
        let source = CombinedJsonSource::new(&path).with_progress(move |p| {
            seen.store(p.read, Ordering::SeqCst);
        });

        assert_eq!(source.available(), vec![key('d'), key('n')]);
        let p = source.fetch(key('d')).unwrap();
        assert_eq!(p.top_word("dang"), Some("当"));
        assert_eq!(last_read.load(Ordering::SeqCst), BLOB.len() as u64);
        assert!(matches!(source.fetch(key('q')), Err(LoadError::NotFound(_))));
    }

    #[test]
    fn missing_file_fails_every_partition() {
        let dir = tempfile::tempdir().unwrap();
        let source = CombinedJsonSource::new(dir.path().join("missing.json"));
        assert!(matches!(source.fetch(key('a')), Err(LoadError::Io(_))));
        assert!(matches!(source.fetch(key('b')), Err(LoadError::Io(_))));
    }

    #[test]
    fn malformed_blob_is_remembered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dict.json");
        fs::write(&path, "{\"a\": [1, 2]}").unwrap();
        let source = CombinedJsonSource::new(&path);
        assert!(matches!(source.fetch(key('a')), Err(LoadError::Malformed(_))));
        // 修复文件也不会重新解析
        fs::write(&path, "{\"a\": {\"a\": [\"啊\"]}}").unwrap();
        assert!(matches!(source.fetch(key('a')), Err(LoadError::Malformed(_))));
    }

    #[test]
    fn progress_percent() {
        assert_eq!(LoadProgress { read: 50, total: 200 }.percent(), Some(25));
        assert_eq!(LoadProgress { read: 300, total: 200 }.percent(), Some(100));
        assert_eq!(LoadProgress { read: 3, total: 0 }.percent(), None);
    }
}

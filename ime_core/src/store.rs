//! `DictionaryStore`：按首字母分区、惰性加载的词典缓存。
//!
//! 约定：
//! - 每个分区只会经历一次 NotRequested -> Loading -> {Loaded | Failed}
//! - 同一分区的并发请求共享同一次加载（`OnceLock` 单次赋值），不会重复 fetch
//! - 失败结果永久缓存，不重试；查询层把失败分区当作“空分区”
//! - store 初始化为空，分区单调填充，进程退出前不销毁

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};
use std::{io, thread};

use tracing::{debug, info, warn};

use crate::dictionary::{Dictionary, Partition};
use crate::error::LoadError;
use crate::input::PartitionKey;

/// Loader 接口：按首字母提供分区数据。
///
/// store 保证对同一个 key 最多调用一次 `fetch`。
pub trait PartitionSource: Send + Sync {
    fn fetch(&self, key: PartitionKey) -> Result<Partition, LoadError>;

    /// 数据源实际包含的分区（预加载用）；默认全部 26 个字母。
    fn available(&self) -> Vec<PartitionKey> {
        PartitionKey::all().collect()
    }
}

impl<T: PartitionSource + ?Sized> PartitionSource for Box<T> {
    fn fetch(&self, key: PartitionKey) -> Result<Partition, LoadError> {
        (**self).fetch(key)
    }

    fn available(&self) -> Vec<PartitionKey> {
        (**self).available()
    }
}

/// 分区加载状态（只给状态查询使用，不与数据混在一起）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionStatus {
    NotRequested,
    Loading,
    Loaded,
    Failed,
}

impl PartitionStatus {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Loading,
            2 => Self::Loaded,
            3 => Self::Failed,
            _ => Self::NotRequested,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            Self::NotRequested => 0,
            Self::Loading => 1,
            Self::Loaded => 2,
            Self::Failed => 3,
        }
    }
}

pub type LoadOutcome = Result<Arc<Partition>, Arc<LoadError>>;

#[derive(Default)]
struct Slot {
    cell: OnceLock<LoadOutcome>,
    status: AtomicU8,
}

impl Slot {
    fn set_status(&self, status: PartitionStatus) {
        self.status.store(status.as_u8(), Ordering::SeqCst);
    }

    fn status(&self) -> PartitionStatus {
        PartitionStatus::from_u8(self.status.load(Ordering::SeqCst))
    }
}

pub struct DictionaryStore<S> {
    source: S,
    slots: Vec<Slot>,
}

impl<S: PartitionSource> DictionaryStore<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            slots: (0..PartitionKey::COUNT).map(|_| Slot::default()).collect(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// 确保分区已加载。已加载时立即返回；加载中时阻塞等待同一结果；否则由本调用发起加载。
    pub fn ensure_loaded(&self, key: PartitionKey) -> LoadOutcome {
        let slot = &self.slots[key.index()];
        slot.cell
            .get_or_init(|| {
                slot.set_status(PartitionStatus::Loading);
                debug!(partition = %key, "开始加载分区");
                let fetched = panic::catch_unwind(AssertUnwindSafe(|| self.source.fetch(key)))
                    .unwrap_or(Err(LoadError::Panicked(key)));
                match fetched {
                    Ok(partition) => {
                        info!(partition = %key, keys = partition.len(), "分区加载完成");
                        slot.set_status(PartitionStatus::Loaded);
                        Ok(Arc::new(partition))
                    }
                    Err(e) => {
                        warn!(partition = %key, error = %e, "分区加载失败");
                        slot.set_status(PartitionStatus::Failed);
                        Err(Arc::new(e))
                    }
                }
            })
            .clone()
    }

    /// 按音节取分区；音节不合法或加载失败时为 None。
    fn partition_for(&self, syllable: &str) -> Option<Arc<Partition>> {
        let key = PartitionKey::of(syllable).ok()?;
        self.ensure_loaded(key).ok()
    }

    pub fn status(&self, key: PartitionKey) -> PartitionStatus {
        self.slots[key.index()].status()
    }

    /// 已失败的分区及原因（供 UI 展示状态，不影响候选生成）。
    pub fn failed_partitions(&self) -> Vec<(PartitionKey, Arc<LoadError>)> {
        PartitionKey::all()
            .filter_map(|key| match self.slots[key.index()].cell.get() {
                Some(Err(e)) => Some((key, Arc::clone(e))),
                _ => None,
            })
            .collect()
    }

    /// 同步加载数据源提供的所有分区。
    pub fn load_all(&self) {
        for key in self.source.available() {
            let _ = self.ensure_loaded(key);
        }
    }
}

impl<S: PartitionSource + 'static> DictionaryStore<S> {
    /// 后台线程预加载所有分区；不阻塞调用方，与打字期间的查询共享同一次加载。
    pub fn prewarm(self: &Arc<Self>) -> io::Result<thread::JoinHandle<()>> {
        let store = Arc::clone(self);
        thread::Builder::new()
            .name("ime-dict-prewarm".into())
            .spawn(move || {
                store.load_all();
                debug!(failed = store.failed_partitions().len(), "预加载结束");
            })
    }
}

impl<S: PartitionSource> Dictionary for DictionaryStore<S> {
    fn is_valid_syllable(&self, syllable: &str) -> bool {
        self.partition_for(syllable)
            .is_some_and(|p| p.get(syllable).is_some_and(|ws| !ws.is_empty()))
    }

    fn top_word(&self, syllable: &str) -> Option<String> {
        self.partition_for(syllable)?
            .top_word(syllable)
            .map(str::to_owned)
    }

    fn exact_matches(&self, syllable: &str) -> Vec<String> {
        self.partition_for(syllable)
            .and_then(|p| p.get(syllable).map(<[String]>::to_vec))
            .unwrap_or_default()
    }

    fn prefix_matches(&self, prefix: &str) -> Vec<(String, Vec<String>)> {
        let Some(p) = self.partition_for(prefix) else {
            return Vec::new();
        };
        p.with_prefix(prefix)
            .map(|(k, ws)| (k.to_owned(), ws.to_vec()))
            .collect()
    }
}

//! 词典数据源（loader）与词表编译。
//!
//! 三种布局共用 `PartitionSource` 接口，由配置 `[dictionary] layout` 选择：
//! - `per_letter`：`JsonDirSource`，按需读取 `dir/<字母>.json`
//! - `combined`：`CombinedJsonSource`，单个 JSON 文件，首次访问时整体解析
//! - `tsv`：`CompiledDict`，启动时把 rime 风格词表编译到内存

use std::io;
use std::path::Path;

use ime_core::dictionary::Partition;
use ime_core::error::LoadError;
use ime_core::input::PartitionKey;
use ime_core::settings::{DictLayout, DictionarySettings};
use ime_core::store::PartitionSource;

pub mod combined;
pub mod compile;
pub mod dir;

pub use combined::{CombinedJsonSource, LoadProgress};
pub use compile::{BuildStats, CompiledDict, DictCompiler};
pub use dir::JsonDirSource;

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// 按配置选出的数据源。
pub enum DictSource {
    PerLetter(JsonDirSource),
    Combined(CombinedJsonSource),
    Compiled(CompiledDict),
}

impl DictSource {
    /// 根据布局打开数据源。`tsv` 布局会立即读取并编译词表，其余布局惰性加载。
    pub fn open(layout: DictLayout, path: impl AsRef<Path>) -> Result<Self, BuildError> {
        let path = path.as_ref();
        Ok(match layout {
            DictLayout::PerLetter => Self::PerLetter(JsonDirSource::new(path)),
            DictLayout::Combined => Self::Combined(CombinedJsonSource::new(path)),
            DictLayout::Tsv => Self::Compiled(CompiledDict::from_paths(&[path])?),
        })
    }

    pub fn from_settings(settings: &DictionarySettings) -> Result<Self, BuildError> {
        Self::open(settings.layout, &settings.path)
    }

    /// 仅对合并布局生效：读取时回调进度。
    pub fn with_progress(self, f: impl Fn(LoadProgress) + Send + Sync + 'static) -> Self {
        match self {
            Self::Combined(s) => Self::Combined(s.with_progress(f)),
            other => other,
        }
    }
}

impl PartitionSource for DictSource {
    fn fetch(&self, key: PartitionKey) -> Result<Partition, LoadError> {
        match self {
            Self::PerLetter(s) => s.fetch(key),
            Self::Combined(s) => s.fetch(key),
            Self::Compiled(s) => s.fetch(key),
        }
    }

    fn available(&self) -> Vec<PartitionKey> {
        match self {
            Self::PerLetter(s) => s.available(),
            Self::Combined(s) => s.available(),
            Self::Compiled(s) => s.available(),
        }
    }
}

//! 内存数据源：直接由 (音节, 词表) 构造分区，主要用于嵌入小词典与测试。

use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::dictionary::Partition;
use crate::error::LoadError;
use crate::input::PartitionKey;
use crate::store::PartitionSource;

#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    partitions: BTreeMap<PartitionKey, IndexMap<String, Vec<String>>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加一个 key；首字母不合法的 key 被忽略。同一 key 多次添加时词表追加在后。
    /// key 按第一次添加的顺序保存。
    pub fn insert<I, W>(&mut self, syllable: &str, words: I) -> &mut Self
    where
        I: IntoIterator<Item = W>,
        W: Into<String>,
    {
        if let Ok(key) = PartitionKey::of(syllable) {
            self.partitions
                .entry(key)
                .or_default()
                .entry(syllable.to_owned())
                .or_default()
                .extend(words.into_iter().map(Into::into));
        }
        self
    }

    pub fn from_pairs(pairs: &[(&str, &[&str])]) -> Self {
        let mut source = Self::new();
        for (syllable, words) in pairs {
            source.insert(syllable, words.iter().copied());
        }
        source
    }
}

impl PartitionSource for MemorySource {
    fn fetch(&self, key: PartitionKey) -> Result<Partition, LoadError> {
        self.partitions
            .get(&key)
            .map(|entries| Partition::from_entries(key, entries.clone()))
            .ok_or(LoadError::NotFound(key))
    }

    fn available(&self) -> Vec<PartitionKey> {
        self.partitions.keys().copied().collect()
    }
}

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::warn;

use crate::input::PartitionKey;

/// 词典查询抽象：core 不关心词典来自文件/内存/网络。
///
/// 约定：
/// - key 是完整音节串（例如 `"da"`、`"dang"`），每个 key 的词表按偏好排序，下标 0 为首选
/// - 分区加载失败、key 不合法都按“没有数据”处理，不向调用方报错
pub trait Dictionary: Send + Sync {
    /// `syllable` 是否为词典中存在且词表非空的 key。
    fn is_valid_syllable(&self, syllable: &str) -> bool {
        self.top_word(syllable).is_some()
    }

    /// key 的首选词。
    fn top_word(&self, syllable: &str) -> Option<String>;

    /// key 的完整词表（不存在时为空）。
    fn exact_matches(&self, syllable: &str) -> Vec<String>;

    /// 所有以 `prefix` 开头且不等于 `prefix` 的 key 及其词表，按 key 在词典中的存储顺序。
    fn prefix_matches(&self, prefix: &str) -> Vec<(String, Vec<String>)>;
}

impl<T: Dictionary + ?Sized> Dictionary for Arc<T> {
    fn is_valid_syllable(&self, syllable: &str) -> bool {
        (**self).is_valid_syllable(syllable)
    }

    fn top_word(&self, syllable: &str) -> Option<String> {
        (**self).top_word(syllable)
    }

    fn exact_matches(&self, syllable: &str) -> Vec<String> {
        (**self).exact_matches(syllable)
    }

    fn prefix_matches(&self, prefix: &str) -> Vec<(String, Vec<String>)> {
        (**self).prefix_matches(prefix)
    }
}

/// 一个首字母分区：音节 -> 有序词表。key 保持词典文件中的出现顺序。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    entries: IndexMap<String, Vec<String>>,
}

impl Partition {
    /// 构造分区并保证不变量：词表非空，key 以分区字母开头且全为小写字母。
    pub fn from_entries<I>(key: PartitionKey, entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let mut kept = IndexMap::new();
        for (syllable, words) in entries {
            if words.is_empty() {
                warn!(partition = %key, %syllable, "丢弃空词表");
                continue;
            }
            if PartitionKey::of(&syllable).ok() != Some(key)
                || !syllable.bytes().all(|b| b.is_ascii_lowercase())
            {
                warn!(partition = %key, %syllable, "丢弃不属于该分区的 key");
                continue;
            }
            kept.insert(syllable, words);
        }
        Self { entries: kept }
    }

    pub fn get(&self, syllable: &str) -> Option<&[String]> {
        self.entries.get(syllable).map(Vec::as_slice)
    }

    pub fn top_word(&self, syllable: &str) -> Option<&str> {
        self.get(syllable)?.first().map(String::as_str)
    }

    /// 以 `prefix` 开头、但不等于 `prefix` 的所有 key（存储顺序）。
    pub fn with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a [String])> + 'a {
        self.entries
            .iter()
            .filter(move |(k, _)| k.len() > prefix.len() && k.starts_with(prefix))
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(c: char) -> PartitionKey {
        PartitionKey::new(c).unwrap()
    }

    fn words(ws: &[&str]) -> Vec<String> {
        ws.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn from_entries_drops_invalid_keys() {
        let entries = vec![
            ("da".to_string(), words(&["大", "达"])),
            ("de".to_string(), Vec::new()),
            ("ni".to_string(), words(&["你"])),
            ("dA".to_string(), words(&["?"])),
        ];
        let p = Partition::from_entries(key('d'), entries);
        assert_eq!(p.len(), 1);
        assert_eq!(p.top_word("da"), Some("大"));
        assert_eq!(p.get("de"), None);
        assert_eq!(p.get("ni"), None);
    }

    #[test]
    fn prefix_scan_excludes_self() {
        let entries = ["da", "dan", "dang", "dao", "de", "d"]
            .into_iter()
            .map(|k| (k.to_string(), words(&["x"])));
        let p = Partition::from_entries(key('d'), entries);
        let keys: Vec<&str> = p.with_prefix("da").map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["dan", "dang", "dao"]);
        let keys: Vec<&str> = p.with_prefix("dang").map(|(k, _)| k).collect();
        assert!(keys.is_empty());
    }

    #[test]
    fn prefix_scan_keeps_stored_key_order() {
        let entries = ["dao", "da", "dang", "dan"]
            .into_iter()
            .map(|k| (k.to_string(), words(&["x"])));
        let p = Partition::from_entries(key('d'), entries);
        let keys: Vec<&str> = p.with_prefix("da").map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["dao", "dang", "dan"]);
        let all: Vec<&str> = p.iter().map(|(k, _)| k).collect();
        assert_eq!(all, vec!["dao", "da", "dang", "dan"]);
    }
}

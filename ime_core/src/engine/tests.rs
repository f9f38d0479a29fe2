use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::dictionary::Partition;
use crate::error::LoadError;
use crate::input::PartitionKey;
use crate::memory::MemorySource;
use crate::store::{DictionaryStore, PartitionSource, PartitionStatus};

/// 预设切分表的 segmenter，隔离 engine 的合并逻辑。
struct TableSegmenter(HashMap<&'static str, Vec<&'static str>>);

impl Segmenter for TableSegmenter {
    fn segment(&self, _dict: &dyn Dictionary, input: &str) -> Analysis {
        let segment: Vec<String> = self
            .0
            .get(input)
            .map(|v| v.iter().map(|s| s.to_string()).collect())
            .unwrap_or_default();
        Analysis {
            preedit: segment.join(" "),
            segment,
        }
    }
}

fn engine() -> Engine<Arc<DictionaryStore<MemorySource>>, TableSegmenter> {
    let store = Arc::new(DictionaryStore::new(MemorySource::from_pairs(&[
        ("ni", &["你", "尼"]),
        ("nihao", &["你好"]),
        ("hao", &["好", "号"]),
        ("da", &["大", "达"]),
        ("dan", &["但"]),
        ("dang", &["当"]),
        ("a", &["啊", "阿"]),
        ("ai", &["爱", "哎"]),
    ])));
    let table = HashMap::from([
        ("nihao", vec!["ni", "hao"]),
        ("da", vec!["da"]),
        ("a", vec!["a"]),
    ]);
    Engine::new(store, TableSegmenter(table))
}

#[test]
fn empty_input_is_empty() {
    assert!(engine().resolve("").unwrap().is_empty());
}

/// 记录 fetch 次数的数据源。
struct CountingSource {
    inner: MemorySource,
    fetches: AtomicUsize,
}

impl PartitionSource for CountingSource {
    fn fetch(&self, key: PartitionKey) -> Result<Partition, LoadError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch(key)
    }
}

#[test]
fn empty_input_never_touches_store() {
    let store = Arc::new(DictionaryStore::new(CountingSource {
        inner: MemorySource::from_pairs(&[("a", &["啊"]), ("da", &["大"])]),
        fetches: AtomicUsize::new(0),
    }));
    let e = Engine::new(Arc::clone(&store), TableSegmenter(HashMap::new()));

    assert!(e.resolve("").unwrap().is_empty());
    assert!(e.compose("").candidate_list.is_empty());

    assert_eq!(store.source().fetches.load(Ordering::SeqCst), 0);
    for key in PartitionKey::all() {
        assert_eq!(store.status(key), PartitionStatus::NotRequested);
    }

    // 对照：非空输入会加载分区
    e.resolve("da").unwrap();
    assert_eq!(store.source().fetches.load(Ordering::SeqCst), 1);
}

#[test]
fn invalid_input_rejected() {
    let e = engine();
    assert!(matches!(e.resolve("ni hao"), Err(InputError::InvalidChar { .. })));
    assert!(matches!(
        e.resolve(&"a".repeat(21)),
        Err(InputError::TooLong { len: 21, max: 20 })
    ));
}

#[test]
fn sentence_then_exact() {
    let words = engine().resolve_words("nihao").unwrap();
    // 整句与精确匹配同为“你好”，去重后只保留整句位置
    assert_eq!(words, vec!["你好"]);
    let cands = engine().resolve("nihao").unwrap();
    assert_eq!(cands[0].source, CandidateSource::Sentence);
}

#[test]
fn single_segment_has_no_sentence() {
    let cands = engine().resolve("a").unwrap();
    assert!(cands.iter().all(|c| c.source != CandidateSource::Sentence));
    let words: Vec<&str> = cands.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(words, vec!["啊", "阿", "爱", "哎"]);
}

#[test]
fn exact_then_prefix() {
    assert_eq!(engine().resolve_words("da").unwrap(), vec!["大", "达", "但", "当"]);
}

#[test]
fn fallback_to_raw_input() {
    let cands = engine().resolve("xyz").unwrap();
    assert_eq!(cands, vec![Candidate::new("xyz", CandidateSource::Raw)]);
}

#[test]
fn limits_are_applied() {
    let e = engine().prefix_limit(1);
    assert_eq!(e.resolve_words("da").unwrap(), vec!["大", "达", "但"]);
    let e = engine().max_results(2);
    assert_eq!(e.resolve_words("da").unwrap(), vec!["大", "达"]);
    let e = engine().max_input_len(3);
    assert!(e.resolve("nihao").is_err());
}

#[test]
fn compose_fills_ui_state() {
    let ui = engine().compose("nihao");
    assert_eq!(ui.raw_input, "nihao");
    assert_eq!(ui.preedit, "ni hao");
    assert_eq!(ui.segment, vec!["ni", "hao"]);
    assert_eq!(ui.candidate_list[0].text, "你好");

    let ui = engine().compose("");
    assert!(ui.candidate_list.is_empty());
}

#[test]
fn resolve_is_idempotent() {
    let e = engine();
    assert_eq!(e.resolve("da").unwrap(), e.resolve("da").unwrap());
}

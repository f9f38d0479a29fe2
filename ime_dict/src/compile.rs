//! 词表编译：把 rime 风格的词表合并成按首字母分区的 JSON 词典。
//!
//! 输入格式（简化版）：
//!
//! - `text<TAB>pin yin<TAB>weight`
//! - 拼音中的空格会被去掉（`ni hao` -> `nihao`）
//! - weight 可省略，默认 1；weight 不是整数的行跳过并计数
//! - 没有 TAB 的行（yaml 头部、空行）和 `#` 开头的注释行跳过
//!
//! 多个文件按添加顺序处理，同一 (词, 拼音) 只保留第一次出现的条目，
//! 所以高质量的单字表应当先加。每个拼音的词表按 (字数升序, 权重降序) 稳定排序，
//! 拼音本身按第一次出现的顺序输出。

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use ime_core::dictionary::Partition;
use ime_core::error::LoadError;
use ime_core::input::PartitionKey;
use ime_core::store::PartitionSource;
use indexmap::IndexMap;
use tracing::{info, warn};

use crate::BuildError;

const DEFAULT_WEIGHT: i64 = 1;

#[derive(Debug, Clone)]
struct Entry {
    text: String,
    weight: i64,
}

/// 编译过程统计。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// 新增条目
    pub added: usize,
    /// 重复的 (词, 拼音)
    pub duplicates: usize,
    /// 格式错误：权重不是整数，或拼音含 a-z 以外的字符（如 `lü`）。
    /// 后一条是编译期新增的过滤，这类条目引擎无法输入，不写入词典。
    pub malformed: usize,
}

#[derive(Default)]
pub struct DictCompiler {
    map: IndexMap<String, Vec<Entry>>,
    seen: HashSet<(String, String)>,
    stats: BuildStats,
}

impl DictCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_path(&mut self, path: impl AsRef<Path>) -> Result<BuildStats, BuildError> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)?;
        let stats = self.add_str(&s);
        info!(path = %path.display(), added = stats.added, "词表处理完成");
        Ok(stats)
    }

    /// 处理一份词表文本，返回本次的统计。
    pub fn add_str(&mut self, s: &str) -> BuildStats {
        let before = self.stats;
        for (idx, line) in s.lines().enumerate() {
            if line.trim().is_empty() || !line.contains('\t') || line.starts_with('#') {
                continue;
            }
            let mut it = line.split('\t');
            let text = it.next().unwrap_or("").trim();
            let pinyin: String = it.next().unwrap_or("").chars().filter(|c| *c != ' ').collect();
            if text.is_empty() || pinyin.is_empty() {
                continue;
            }
            if !pinyin.bytes().all(|b| b.is_ascii_lowercase()) {
                self.malformed(idx, line);
                continue;
            }
            let weight = match it.next().map(str::trim).filter(|x| !x.is_empty()) {
                None => DEFAULT_WEIGHT,
                Some(w) => match w.parse::<i64>() {
                    Ok(w) => w,
                    Err(_) => {
                        self.malformed(idx, line);
                        continue;
                    }
                },
            };
            if !self.seen.insert((text.to_string(), pinyin.clone())) {
                self.stats.duplicates += 1;
                continue;
            }
            self.map.entry(pinyin).or_default().push(Entry {
                text: text.to_string(),
                weight,
            });
            self.stats.added += 1;
        }
        BuildStats {
            added: self.stats.added - before.added,
            duplicates: self.stats.duplicates - before.duplicates,
            malformed: self.stats.malformed - before.malformed,
        }
    }

    fn malformed(&mut self, idx: usize, line: &str) {
        // 只打印前几条，避免刷屏
        if self.stats.malformed < 5 {
            warn!(line_no = idx + 1, line, "跳过格式错误的词条");
        }
        self.stats.malformed += 1;
    }

    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    /// 排序并按首字母分区。
    pub fn finish(self) -> CompiledDict {
        let mut partitions: BTreeMap<PartitionKey, IndexMap<String, Vec<String>>> = BTreeMap::new();
        for (pinyin, mut entries) in self.map {
            let Ok(key) = PartitionKey::of(&pinyin) else {
                continue;
            };
            entries.sort_by(|a, b| {
                a.text
                    .chars()
                    .count()
                    .cmp(&b.text.chars().count())
                    .then_with(|| b.weight.cmp(&a.weight))
            });
            partitions
                .entry(key)
                .or_default()
                .insert(pinyin, entries.into_iter().map(|e| e.text).collect());
        }
        CompiledDict {
            partitions,
            stats: self.stats,
        }
    }
}

/// 编译结果：首字母 -> (拼音 -> 有序词表)。
#[derive(Debug, Clone, Default)]
pub struct CompiledDict {
    partitions: BTreeMap<PartitionKey, IndexMap<String, Vec<String>>>,
    stats: BuildStats,
}

impl CompiledDict {
    /// 按顺序编译多个词表文件（rime `*.dict.yaml` 或 TSV）。
    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self, BuildError> {
        let mut compiler = DictCompiler::new();
        for p in paths {
            compiler.add_path(p)?;
        }
        Ok(compiler.finish())
    }

    pub fn from_tsv_str(s: &str) -> Self {
        let mut compiler = DictCompiler::new();
        compiler.add_str(s);
        compiler.finish()
    }

    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    pub fn get(&self, key: PartitionKey) -> Option<&IndexMap<String, Vec<String>>> {
        self.partitions.get(&key)
    }

    /// 写成单个合并文件：`{"a": {...}, "b": {...}}`。
    pub fn write_combined(&self, path: impl AsRef<Path>) -> Result<(), BuildError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let blob: BTreeMap<String, &IndexMap<String, Vec<String>>> = self
            .partitions
            .iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        fs::write(path, serde_json::to_vec(&blob)?)?;
        info!(path = %path.display(), partitions = blob.len(), "合并词典已写出");
        Ok(())
    }

    /// 写成目录下每个首字母一个文件：`a.json`、`b.json`……
    pub fn write_per_letter(&self, dir: impl AsRef<Path>) -> Result<(), BuildError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        for (key, entries) in &self.partitions {
            fs::write(dir.join(format!("{key}.json")), serde_json::to_vec(entries)?)?;
        }
        info!(dir = %dir.display(), partitions = self.partitions.len(), "分区词典已写出");
        Ok(())
    }
}

impl PartitionSource for CompiledDict {
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

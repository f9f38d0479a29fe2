//! 全拼（quanpin）切分：贪心最长匹配，不回溯。
//!
//! 从左到右，每个位置先试最长的候选音节（默认 6 个字母），逐个缩短直到词典里存在；
//! 某个位置一个都匹配不上时立即停止，返回已切出的前缀部分。

use ime_core::dictionary::Dictionary;
use ime_core::input::MAX_SYLLABLE_LEN;
use ime_core::segmenter::{Analysis, Segmenter};
use ime_core::settings::Settings;
use tracing::debug;

pub struct LongestMatchSegmenter {
    max_syllable_len: usize,
}

impl Default for LongestMatchSegmenter {
    fn default() -> Self {
        Self {
            max_syllable_len: MAX_SYLLABLE_LEN,
        }
    }
}

impl LongestMatchSegmenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 限制单个音节的最大长度（1..=6，超出范围时截到边界）。
    pub fn with_max_syllable_len(len: usize) -> Self {
        Self {
            max_syllable_len: len.clamp(1, MAX_SYLLABLE_LEN),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_max_syllable_len(settings.segmenter.max_syllable_len)
    }

    /// 切分出音节序列；可能只覆盖输入的前缀。
    pub fn split(&self, dict: &dyn Dictionary, input: &str) -> Vec<String> {
        if !input.is_ascii() {
            return Vec::new();
        }
        let mut out = Vec::new();
        let mut cursor = 0;
        while cursor < input.len() {
            let longest = self.max_syllable_len.min(input.len() - cursor);
            // 纯 ASCII：字节下标即字符边界
            let found = (1..=longest)
                .rev()
                .map(|len| &input[cursor..cursor + len])
                .find(|sub| dict.is_valid_syllable(sub));
            let Some(sub) = found else {
                debug!(input, cursor, "切分在此位置中止");
                break;
            };
            out.push(sub.to_string());
            cursor += sub.len();
        }
        out
    }
}

impl Segmenter for LongestMatchSegmenter {
    fn segment(&self, dict: &dyn Dictionary, input: &str) -> Analysis {
        let segment = self.split(dict, input);
        let consumed: usize = segment.iter().map(String::len).sum();
        let mut preedit = segment.join(" ");
        // 未切分的尾巴原样附在 preedit 后面
        if let Some(rest) = input.get(consumed..).filter(|r| !r.is_empty()) {
            if !preedit.is_empty() {
                preedit.push(' ');
            }
            preedit.push_str(rest);
        }
        Analysis { segment, preedit }
    }
}

#[cfg(test)]
mod tests {
    use ime_core::DictionaryStore;
    use ime_core::memory::MemorySource;

    use super::*;

    fn store() -> DictionaryStore<MemorySource> {
        DictionaryStore::new(MemorySource::from_pairs(&[
            ("ni", &["你"]),
            ("hao", &["好"]),
            ("xi", &["西"]),
            ("xian", &["先"]),
            ("zhuang", &["装"]),
            ("zhu", &["猪"]),
            ("a", &["啊"]),
            ("n", &["嗯"]),
        ]))
    }

    #[test]
    fn greedy_nihao() {
        let s = LongestMatchSegmenter::new();
        let a = s.segment(&store(), "nihao");
        assert_eq!(a.segment, vec!["ni", "hao"]);
        assert_eq!(a.preedit, "ni hao");
    }

    #[test]
    fn abandons_at_first_unmatched_position() {
        let s = LongestMatchSegmenter::new();
        let a = s.segment(&store(), "nixyz");
        assert_eq!(a.segment, vec!["ni"]);
        assert_eq!(a.preedit, "ni xyz");
        assert_eq!(a.consumed(), 2);
    }

    #[test]
    fn longest_match_wins_without_backtracking() {
        let s = LongestMatchSegmenter::new();
        // xian 优先于 xi + an，即使这样会在后面卡住
        assert_eq!(s.split(&store(), "xian"), vec!["xian"]);
        assert_eq!(s.split(&store(), "zhuangzhu"), vec!["zhuang", "zhu"]);
        assert_eq!(s.split(&store(), "xiann"), vec!["xian", "n"]);
    }

    #[test]
    fn max_len_limits_lookahead() {
        let s = LongestMatchSegmenter::with_max_syllable_len(3);
        assert_eq!(s.split(&store(), "zhuang"), vec!["zhu", "a", "n"]);
        assert_eq!(LongestMatchSegmenter::with_max_syllable_len(0).max_syllable_len, 1);
    }

    #[test]
    fn empty_and_unknown_input() {
        let s = LongestMatchSegmenter::new();
        assert!(s.split(&store(), "").is_empty());
        let a = s.segment(&store(), "qqq");
        assert!(a.segment.is_empty());
        assert_eq!(a.preedit, "qqq");
        assert!(s.split(&store(), "你好").is_empty());
    }
}

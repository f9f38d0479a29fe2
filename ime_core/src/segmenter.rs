//! `segmenter`：切分输入为音节段（segment）。
//!
//! core 只定义接口；全拼的贪心切分在 `ime_pinyin::LongestMatchSegmenter`。

use crate::dictionary::Dictionary;

/// 切分结果（segment + preedit）。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    /// 切分后的音节段（例如 `["ni","hao"]`）；可能只覆盖输入的前缀
    pub segment: Vec<String>,
    /// 展示用 preedit（例如 `"ni hao"`）
    pub preedit: String,
}

impl Analysis {
    /// 音节段覆盖的输入字节数。
    pub fn consumed(&self) -> usize {
        self.segment.iter().map(String::len).sum()
    }
}

/// Segmenter：借助词典判断音节合法性，把输入解析为音节段。
pub trait Segmenter: Send + Sync {
    fn segment(&self, dict: &dyn Dictionary, input: &str) -> Analysis;
}

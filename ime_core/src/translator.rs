//! `translator`：把输入翻译成候选（组句、直查、前缀联想）。
//!
//! 三个阶段按固定顺序追加，去重交给 filter：
//! - A 整句：切分出 ≥2 个音节且每个音节都有首选字时，拼接首选字
//! - B 精确：整段输入作为 key 的完整词表
//! - C 前缀：以整段输入为前缀的其他 key 的词，去重后按字数升序（稳定），截断到 `prefix_limit`
//!
//! 字数按 Unicode 标量值计：扩展区汉字（如 `𠀀`）算一个字。

use std::collections::HashSet;

use tracing::debug;

use crate::{
    dictionary::Dictionary,
    model::{Candidate, CandidateSource},
    segmenter::Analysis,
};

/// 前缀候选默认上限。
pub const DEFAULT_PREFIX_LIMIT: usize = 40;

/// Translator：把输入与其切分结果转成候选。
pub trait Translator: Send + Sync {
    fn translate(&self, input: &str, analysis: &Analysis) -> Vec<Candidate>;
}

/// 词典翻译器。
pub struct DictTranslator<'a, D: ?Sized> {
    /// 词典引用（查词发生在这里）
    pub dict: &'a D,
    /// 前缀联想最多保留多少个词
    pub prefix_limit: usize,
}

impl<'a, D> DictTranslator<'a, D>
where
    D: Dictionary + ?Sized,
{
    /// 整句候选：只取每段首选字，不做多候选组合。
    pub fn sentence_candidate(&self, analysis: &Analysis) -> Option<Candidate> {
        if analysis.segment.len() < 2 {
            return None;
        }
        let mut text = String::new();
        for syllable in &analysis.segment {
            text.push_str(&self.dict.top_word(syllable)?);
        }
        Some(Candidate::new(text, CandidateSource::Sentence).with_comment(analysis.preedit.clone()))
    }

    pub fn exact_candidates(&self, input: &str) -> Vec<Candidate> {
        self.dict
            .exact_matches(input)
            .into_iter()
            .map(|w| Candidate::new(w, CandidateSource::Exact))
            .collect()
    }

    pub fn prefix_candidates(&self, input: &str) -> Vec<Candidate> {
        if input.is_empty() || self.prefix_limit == 0 {
            return Vec::new();
        }
        let mut seen: HashSet<String> = HashSet::new();
        let mut out: Vec<Candidate> = Vec::new();
        for (key, words) in self.dict.prefix_matches(input) {
            for w in words {
                if seen.insert(w.clone()) {
                    out.push(Candidate::new(w, CandidateSource::Prefix).with_comment(key.clone()));
                }
            }
        }
        // 稳定排序：同字数保持 key 的存储顺序 + 词表内顺序
        out.sort_by_key(|c| c.text.chars().count());
        out.truncate(self.prefix_limit);
        out
    }
}

impl<'a, D> Translator for DictTranslator<'a, D>
where
    D: Dictionary + ?Sized,
{
    fn translate(&self, input: &str, analysis: &Analysis) -> Vec<Candidate> {
        let mut out: Vec<Candidate> = Vec::new();

        if let Some(sentence) = self.sentence_candidate(analysis) {
            out.push(sentence);
        }
        let sentence_count = out.len();

        let mut exact = self.exact_candidates(input);
        let exact_count = exact.len();
        out.append(&mut exact);

        let mut prefix = self.prefix_candidates(input);
        let prefix_count = prefix.len();
        out.append(&mut prefix);

        debug!(input, sentence_count, exact_count, prefix_count);
        out
    }
}

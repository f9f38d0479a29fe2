use tracing::debug_span;

use crate::dictionary::Dictionary;
use crate::error::InputError;
use crate::filter::{DedupTruncate, Filter};
use crate::input::{DEFAULT_MAX_INPUT_LEN, validate_input};
use crate::model::{Candidate, CandidateSource, UiState};
use crate::segmenter::{Analysis, Segmenter};
use crate::settings::Settings;
use crate::translator::{DEFAULT_PREFIX_LIMIT, DictTranslator, Translator};

/// 最终候选列表默认上限。
pub const DEFAULT_MAX_RESULTS: usize = 100;

/// 引擎：把当前输入串转成有序、去重的候选列表。
///
/// 流水线：
/// - engine（编排） -> segmenter（切分） -> translator（组句/直查/联想） -> filter（去重/截断） -> 回退
///
/// 引擎自身无状态，结果只取决于 (输入, 词典快照)。
pub struct Engine<D, S> {
    /// 词典（通常是 `Arc<DictionaryStore<_>>`）
    dictionary: D,
    /// 切分器
    segmenter: S,
    /// 前缀联想上限（合并前截断）
    prefix_limit: usize,
    /// 最终候选上限
    max_results: usize,
    /// 输入串长度上限
    max_input_len: usize,
}

impl<D, S> Engine<D, S>
where
    D: Dictionary,
    S: Segmenter,
{
    pub fn new(dictionary: D, segmenter: S) -> Self {
        Self {
            dictionary,
            segmenter,
            prefix_limit: DEFAULT_PREFIX_LIMIT,
            max_results: DEFAULT_MAX_RESULTS,
            max_input_len: DEFAULT_MAX_INPUT_LEN,
        }
    }

    /// 按配置设置各项上限。
    pub fn with_settings(self, settings: &Settings) -> Self {
        self.prefix_limit(settings.candidates.prefix_limit)
            .max_results(settings.candidates.max_results)
            .max_input_len(settings.input.max_len)
    }

    pub fn prefix_limit(mut self, limit: usize) -> Self {
        self.prefix_limit = limit;
        self
    }

    /// 最终候选上限；0 会被提升为 1。
    pub fn max_results(mut self, limit: usize) -> Self {
        self.max_results = limit.max(1);
        self
    }

    pub fn max_input_len(mut self, len: usize) -> Self {
        self.max_input_len = len;
        self
    }

    pub fn dictionary(&self) -> &D {
        &self.dictionary
    }

    pub fn max_len(&self) -> usize {
        self.max_input_len
    }

    /// 将 raw_input 切分成 segment + preedit（不包含候选生成）。
    pub fn analyze(&self, raw_input: &str) -> Analysis {
        if raw_input.is_empty() {
            return Analysis::default();
        }
        self.segmenter.segment(&self.dictionary, raw_input)
    }

    /// 生成候选。空输入返回空列表且不查询词典；无任何匹配时返回 `[input]`。
    pub fn resolve(&self, input: &str) -> Result<Vec<Candidate>, InputError> {
        validate_input(input, self.max_input_len)?;
        if input.is_empty() {
            return Ok(Vec::new());
        }
        let analysis = self.analyze(input);
        Ok(self.resolve_analyzed(input, &analysis))
    }

    /// 只取候选文本。
    pub fn resolve_words(&self, input: &str) -> Result<Vec<String>, InputError> {
        Ok(self.resolve(input)?.into_iter().map(|c| c.text).collect())
    }

    fn resolve_analyzed(&self, input: &str, analysis: &Analysis) -> Vec<Candidate> {
        let _span = debug_span!("resolve", input).entered();
        // translator：负责组句与查词
        let translator = DictTranslator {
            dict: &self.dictionary,
            prefix_limit: self.prefix_limit,
        };
        let out = translator.translate(input, analysis);
        // filter：负责去重/截断
        let out = DedupTruncate {
            limit: self.max_results,
        }
        .apply(out);
        if out.is_empty() {
            return vec![Candidate::new(input, CandidateSource::Raw)];
        }
        out
    }

    /// 面向 Session：从 raw_input 生成 `UiState`。不合法的输入没有候选。
    pub fn compose(&self, raw_input: &str) -> UiState {
        if raw_input.is_empty() || validate_input(raw_input, self.max_input_len).is_err() {
            return UiState {
                raw_input: raw_input.to_owned(),
                preedit: raw_input.to_owned(),
                ..UiState::default()
            };
        }
        let analysis = self.analyze(raw_input);
        let candidate_list = self.resolve_analyzed(raw_input, &analysis);
        UiState {
            raw_input: raw_input.to_owned(),
            preedit: analysis.preedit,
            segment: analysis.segment,
            candidate_list,
        }
    }
}

impl<D, S> crate::processor::EngineFacade for Engine<D, S>
where
    D: Dictionary,
    S: Segmenter,
{
    fn compose(&self, raw_input: &str) -> UiState {
        Engine::<D, S>::compose(self, raw_input)
    }

    fn max_input_len(&self) -> usize {
        self.max_input_len
    }
}

#[cfg(test)]
mod tests;

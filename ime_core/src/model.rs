use serde::Serialize;

/// 候选来源（决定合并顺序：整句 -> 精确 -> 前缀）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    /// 由各音节首选字拼接而成的整句
    Sentence,
    /// 与整段输入完全相同的 key
    Exact,
    /// 以整段输入为前缀的其他 key
    Prefix,
    /// 无任何匹配时回退的原始输入
    Raw,
}

/// 候选词（可被 UI 展示与用户选择）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// 候选展示文本（提交文本）
    pub text: String,
    pub source: CandidateSource,
    /// 备注：前缀候选的来源 key，或整句候选的切分
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Candidate {
    pub fn new(text: impl Into<String>, source: CandidateSource) -> Self {
        Self {
            text: text.into(),
            source,
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// 引擎给 UI 的“快照视图”。
///
/// UI 层只读 `UiState`，不直接读写 `Context`。
#[derive(Debug, Clone, Default, Serialize)]
pub struct UiState {
    /// 原始输入字符串（未上屏的拼音）
    pub raw_input: String,
    /// preedit 展示（例如 "ni hao"）
    pub preedit: String,
    /// 音节段切分结果
    pub segment: Vec<String>,
    /// 当前可选候选列表
    pub candidate_list: Vec<Candidate>,
}

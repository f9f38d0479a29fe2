//! `Context`：processor 链共享的唯一状态容器。
//!
//! 只保存输入缓冲；候选总是由引擎根据当前缓冲现算。
use tracing::debug;

use crate::{input::InputBuffer, key_event::Action, model::UiState, processor::EngineFacade};

/// 输入会话上下文：processor 链共享的唯一状态。
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// 原始输入（未上屏）
    pub buffer: InputBuffer,
}

impl Context {
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            buffer: InputBuffer::with_max_len(max_len),
        }
    }

    /// 清空会话状态（等价于重新开始一次输入）。
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// 追加字母；非字母或超长时忽略，返回是否改变了缓冲。
    pub fn push(&mut self, ch: char) -> bool {
        match self.buffer.push(ch) {
            Ok(()) => true,
            Err(e) => {
                debug!(error = %e, "忽略输入字符");
                false
            }
        }
    }

    /// 生成 UI 层只读快照。
    pub fn ui_state(&self, engine: &dyn EngineFacade) -> UiState {
        engine.compose(self.buffer.as_str())
    }

    /// Enter 的默认行为：提交原始输入。
    pub fn commit_on_enter(&mut self) -> Vec<Action> {
        if self.buffer.is_empty() {
            return Vec::new();
        }
        let text = self.buffer.as_str().to_owned();
        self.reset();
        vec![Action::Commit(text)]
    }

    /// 选词：提交候选文本并清空输入。
    pub fn select_candidate(&mut self, engine: &dyn EngineFacade, index: usize) -> Vec<Action> {
        if self.buffer.is_empty() {
            return Vec::new();
        }
        let ui = self.ui_state(engine);
        let Some(cand) = ui.candidate_list.into_iter().nth(index) else {
            return Vec::new();
        };
        self.reset();
        vec![Action::Commit(cand.text)]
    }
}

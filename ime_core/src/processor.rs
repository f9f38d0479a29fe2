//! `processor`：输入事件处理链。
//!
//! 按顺序处理 `InputEvent`，对 `Context` 做状态变更，并可产生 `Action`（例如 Commit）。
//!
//! 当前链路（`Session::new` 默认组装）：
//! - `EditingProcessor`：编辑输入（Char/Backspace/Clear）
//! - `SelectionProcessor`：选词（Space/Select(n)），上屏并清空输入
//! - `EnterCommitProcessor`：回车提交原始输入

use crate::{
    context::Context,
    key_event::{Action, InputEvent},
    model::UiState,
};

/// 给 processors 的对象安全引擎接口（避免在 processors 层引入泛型爆炸）。
pub trait EngineFacade {
    /// 根据原始输入生成 UiState（切分 + 候选）
    fn compose(&self, raw_input: &str) -> UiState;
    /// 输入缓冲长度上限
    fn max_input_len(&self) -> usize;
}

/// Processor 执行结果：是否“消费”了本次事件。
///
/// - `Consume`：本 processor 已处理该事件，后续 processor 不再执行
/// - `Continue`：本 processor 不处理该事件，交给下一个 processor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    Consume,
    Continue,
}

/// Processor：处理输入事件并改变 Context；必要时产生输出动作（Commit 等）。
pub trait Processor: Send + Sync {
    fn process(
        &mut self,
        engine: &dyn EngineFacade,
        context: &mut Context,
        input_event: &InputEvent,
    ) -> (ProcessStatus, Vec<Action>);
}

/// 编辑输入的 processor（插入/退格/清空）。
pub struct EditingProcessor;

impl Processor for EditingProcessor {
    fn process(
        &mut self,
        _engine: &dyn EngineFacade,
        context: &mut Context,
        input_event: &InputEvent,
    ) -> (ProcessStatus, Vec<Action>) {
        match *input_event {
            InputEvent::Char(ch) => {
                context.push(ch);
                (ProcessStatus::Consume, Vec::new())
            }
            InputEvent::Backspace => {
                context.buffer.pop();
                (ProcessStatus::Consume, Vec::new())
            }
            InputEvent::Clear => {
                context.reset();
                (ProcessStatus::Consume, Vec::new())
            }
            _ => (ProcessStatus::Continue, Vec::new()),
        }
    }
}

pub struct SelectionProcessor;

impl Processor for SelectionProcessor {
    fn process(
        &mut self,
        engine: &dyn EngineFacade,
        context: &mut Context,
        input_event: &InputEvent,
    ) -> (ProcessStatus, Vec<Action>) {
        match *input_event {
            // 空格：有输入时选第一个候选，否则直接上屏空格
            InputEvent::Space => {
                if context.buffer.is_empty() {
                    return (ProcessStatus::Consume, vec![Action::Commit(" ".to_string())]);
                }
                (ProcessStatus::Consume, context.select_candidate(engine, 0))
            }
            InputEvent::Select(i) => (ProcessStatus::Consume, context.select_candidate(engine, i)),
            _ => (ProcessStatus::Continue, Vec::new()),
        }
    }
}

pub struct EnterCommitProcessor;

impl Processor for EnterCommitProcessor {
    fn process(
        &mut self,
        _engine: &dyn EngineFacade,
        context: &mut Context,
        input_event: &InputEvent,
    ) -> (ProcessStatus, Vec<Action>) {
        match *input_event {
            InputEvent::Enter => (ProcessStatus::Consume, context.commit_on_enter()),
            _ => (ProcessStatus::Continue, Vec::new()),
        }
    }
}

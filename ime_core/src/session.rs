//! `Session`：对上层（CLI/GUI）提供的会话对象。
//!
//! `Session` 自身不做业务逻辑判断，而是：
//! - 持有 `Context`（状态）
//! - 持有 processors 链（可插拔）
//! - 把每次 `InputEvent` 依次交给 processors，直到被消费
//! - 最后输出 `UiState` + `Action`

use crate::{
    context::Context,
    dictionary::Dictionary,
    engine::Engine,
    key_event::{Action, InputEvent},
    model::UiState,
    processor::{EditingProcessor, EngineFacade, EnterCommitProcessor, ProcessStatus, Processor, SelectionProcessor},
    segmenter::Segmenter,
};

/// 输入法会话（一次输入过程的状态机容器）。
pub struct Session<D, S> {
    /// 引擎（包含词典、segmenter、translator/filter 编排）
    engine: Engine<D, S>,
    /// 会话上下文（processors 共享）
    ctx: Context,
    /// processors 链（可配置/可扩展）
    processors: Vec<Box<dyn Processor>>,
}

impl<D, S> Session<D, S>
where
    D: Dictionary,
    S: Segmenter,
{
    /// 创建会话，并组装默认 processors 链。
    pub fn new(engine: Engine<D, S>) -> Self {
        let ctx = Context::with_max_len(EngineFacade::max_input_len(&engine));
        Self {
            engine,
            ctx,
            processors: vec![
                Box::new(EditingProcessor),
                Box::new(SelectionProcessor),
                Box::new(EnterCommitProcessor),
            ],
        }
    }

    pub fn engine(&self) -> &Engine<D, S> {
        &self.engine
    }

    /// 当前输入串。
    pub fn raw_input(&self) -> &str {
        self.ctx.buffer.as_str()
    }

    /// 获取当前 UI 快照（只读）。
    pub fn ui_state(&self) -> UiState {
        self.ctx.ui_state(&self.engine)
    }

    /// 处理一个输入事件，返回最新 UI 快照与动作列表。
    pub fn handle(&mut self, ev: InputEvent) -> (UiState, Vec<Action>) {
        let mut actions = Vec::new();
        for p in &mut self.processors {
            let (status, mut a) = p.process(&self.engine, &mut self.ctx, &ev);
            actions.append(&mut a);
            if status == ProcessStatus::Consume {
                break;
            }
        }
        (self.ctx.ui_state(&self.engine), actions)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::memory::MemorySource;
    use crate::segmenter::Analysis;
    use crate::store::DictionaryStore;

    /// 整串当作一个音节；会话测试不关心切分。
    struct WholeSegmenter;

    impl Segmenter for WholeSegmenter {
        fn segment(&self, dict: &dyn Dictionary, input: &str) -> Analysis {
            if dict.is_valid_syllable(input) {
                Analysis {
                    segment: vec![input.to_string()],
                    preedit: input.to_string(),
                }
            } else {
                Analysis {
                    segment: Vec::new(),
                    preedit: input.to_string(),
                }
            }
        }
    }

    fn session() -> Session<Arc<DictionaryStore<MemorySource>>, WholeSegmenter> {
        let store = Arc::new(DictionaryStore::new(MemorySource::from_pairs(&[
            ("da", &["大", "达"]),
            ("dan", &["但"]),
        ])));
        Session::new(Engine::new(store, WholeSegmenter).max_input_len(4))
    }

    fn type_str(s: &mut Session<Arc<DictionaryStore<MemorySource>>, WholeSegmenter>, text: &str) -> UiState {
        let mut ui = s.ui_state();
        for ch in text.chars() {
            ui = s.handle(InputEvent::Char(ch)).0;
        }
        ui
    }

    #[test]
    fn typing_updates_candidates() {
        let mut s = session();
        let ui = type_str(&mut s, "Da");
        assert_eq!(ui.raw_input, "da");
        let texts: Vec<&str> = ui.candidate_list.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["大", "达", "但"]);
    }

    #[test]
    fn non_letters_and_overflow_are_ignored() {
        let mut s = session();
        type_str(&mut s, "d1a'nxx");
        assert_eq!(s.raw_input(), "danx");
    }

    #[test]
    fn backspace_and_clear() {
        let mut s = session();
        type_str(&mut s, "dan");
        let (ui, actions) = s.handle(InputEvent::Backspace);
        assert!(actions.is_empty());
        assert_eq!(ui.raw_input, "da");
        let (ui, _) = s.handle(InputEvent::Clear);
        assert!(ui.raw_input.is_empty());
        assert!(ui.candidate_list.is_empty());
    }

    #[test]
    fn select_commits_and_clears() {
        let mut s = session();
        type_str(&mut s, "da");
        let (ui, actions) = s.handle(InputEvent::Select(1));
        assert_eq!(actions, vec![Action::Commit("达".to_string())]);
        assert!(ui.raw_input.is_empty());

        type_str(&mut s, "da");
        let (_, actions) = s.handle(InputEvent::Select(9));
        assert!(actions.is_empty());
        assert_eq!(s.raw_input(), "da");
    }

    #[test]
    fn space_selects_first_or_commits_space() {
        let mut s = session();
        let (_, actions) = s.handle(InputEvent::Space);
        assert_eq!(actions, vec![Action::Commit(" ".to_string())]);
        type_str(&mut s, "da");
        let (_, actions) = s.handle(InputEvent::Space);
        assert_eq!(actions, vec![Action::Commit("大".to_string())]);
    }

    #[test]
    fn unmatched_input_offers_itself() {
        let mut s = session();
        type_str(&mut s, "xq");
        let (_, actions) = s.handle(InputEvent::Space);
        assert_eq!(actions, vec![Action::Commit("xq".to_string())]);
    }

    #[test]
    fn enter_commits_raw() {
        let mut s = session();
        let (_, actions) = s.handle(InputEvent::Enter);
        assert!(actions.is_empty());
        type_str(&mut s, "dan");
        let (ui, actions) = s.handle(InputEvent::Enter);
        assert_eq!(actions, vec![Action::Commit("dan".to_string())]);
        assert!(ui.raw_input.is_empty());
    }
}

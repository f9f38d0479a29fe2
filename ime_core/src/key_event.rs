/// 输入事件（逻辑键盘事件）。
///
/// 说明：
/// - `Session`/processor 只关心“语义事件”，不关心具体平台键值。
/// - CLI/GUI 层负责把系统按键转换成这些事件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// 输入一个字符（只接受 a-z，大写折叠为小写）
    Char(char),
    /// 删除最后一个字母
    Backspace,
    /// 空格：选择第一个候选；输入为空时提交一个空格
    Space,
    /// 回车：提交原始输入
    Enter,
    /// 清空当前输入（类似 Esc）
    Clear,
    /// 选择第 n 个候选（从 0 开始）
    Select(usize),
}

/// 引擎输出动作（对 UI/宿主的“副作用”请求）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// 提交文本（上屏）
    Commit(String),
}

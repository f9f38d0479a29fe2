//! `ime_core`：拼音候选引擎的纯逻辑层。
//!
//! 设计目标：
//! - **核心可复用**：CLI/GUI/服务端都能复用同一套逻辑
//! - **分层清晰**：store（分区词典） -> segmenter（切分） -> translator（组句/直查/联想） -> filter（去重/截断） -> 输出（`UiState`）
//! - **数据源可替换**：词典的磁盘格式由 `PartitionSource` 实现决定，core 只依赖按首字母分区的查询接口
pub mod context;
pub mod dictionary;
pub mod engine;
pub mod error;
pub mod filter;
pub mod input;
pub mod key_event;
pub mod memory;
pub mod model;
pub mod processor;
pub mod segmenter;
pub mod session;
pub mod settings;
pub mod store;
pub mod translator;
pub mod worker;

pub use dictionary::{Dictionary, Partition};
pub use engine::Engine;
pub use error::{InputError, LoadError};
pub use input::{InputBuffer, PartitionKey};
pub use model::{Candidate, CandidateSource, UiState};
pub use segmenter::{Analysis, Segmenter};
pub use store::{DictionaryStore, PartitionSource, PartitionStatus};

//! 错误类型。
//!
//! - `InputError`：输入串（音节 / 输入缓冲）不合法，边界处直接拒绝
//! - `LoadError`：词典分区加载失败；store 内部缓存该结果，查询层只看到“无数据”

use std::io;

use crate::input::PartitionKey;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("输入为空")]
    Empty,

    #[error("第 {index} 个字符 {ch:?} 不是小写字母 a-z")]
    InvalidChar { ch: char, index: usize },

    #[error("输入长度 {len} 超过上限 {max}")]
    TooLong { len: usize, max: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("分区 '{0}' 不存在")]
    NotFound(PartitionKey),

    #[error("词典数据格式错误: {0}")]
    Malformed(String),

    #[error("加载分区 '{0}' 时发生 panic")]
    Panicked(PartitionKey),
}

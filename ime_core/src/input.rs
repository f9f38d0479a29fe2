//! 输入侧的基础类型：分区键（首字母）与输入缓冲。

use std::fmt;

use crate::error::InputError;

/// 最长的全拼音节（例如 `zhuang`）。
pub const MAX_SYLLABLE_LEN: usize = 6;

/// 输入缓冲默认长度上限。
pub const DEFAULT_MAX_INPUT_LEN: usize = 20;

/// 分区键：音节首字母（a-z）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartitionKey(u8);

impl PartitionKey {
    pub const COUNT: usize = 26;

    pub fn new(ch: char) -> Result<Self, InputError> {
        if ch.is_ascii_lowercase() {
            Ok(Self(ch as u8))
        } else {
            Err(InputError::InvalidChar { ch, index: 0 })
        }
    }

    /// 取音节的分区键；空串或首字符不是小写字母时失败。
    pub fn of(syllable: &str) -> Result<Self, InputError> {
        let ch = syllable.chars().next().ok_or(InputError::Empty)?;
        Self::new(ch)
    }

    pub fn all() -> impl Iterator<Item = PartitionKey> {
        (b'a'..=b'z').map(PartitionKey)
    }

    pub fn as_char(self) -> char {
        char::from(self.0)
    }

    /// 0..26，用作 store 槽位下标。
    pub fn index(self) -> usize {
        usize::from(self.0 - b'a')
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// 校验整段输入：只允许 a-z，长度不超过 `max_len`。空串合法。
pub fn validate_input(input: &str, max_len: usize) -> Result<(), InputError> {
    if let Some((index, ch)) = input.chars().enumerate().find(|(_, c)| !c.is_ascii_lowercase()) {
        return Err(InputError::InvalidChar { ch, index });
    }
    if input.len() > max_len {
        return Err(InputError::TooLong {
            len: input.len(),
            max: max_len,
        });
    }
    Ok(())
}

/// 用户尚未上屏的拼音串。
#[derive(Debug, Clone)]
pub struct InputBuffer {
    raw: String,
    max_len: usize,
}

impl Default for InputBuffer {
    fn default() -> Self {
        Self::with_max_len(DEFAULT_MAX_INPUT_LEN)
    }
}

impl InputBuffer {
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            raw: String::new(),
            max_len,
        }
    }

    /// 追加一个字母；大写会被折叠成小写。
    pub fn push(&mut self, ch: char) -> Result<(), InputError> {
        let ch = ch.to_ascii_lowercase();
        if !ch.is_ascii_lowercase() {
            return Err(InputError::InvalidChar {
                ch,
                index: self.raw.len(),
            });
        }
        if self.raw.len() >= self.max_len {
            return Err(InputError::TooLong {
                len: self.raw.len() + 1,
                max: self.max_len,
            });
        }
        self.raw.push(ch);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<char> {
        self.raw.pop()
    }

    pub fn clear(&mut self) {
        self.raw.clear();
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

//! 引擎配置：TOML 格式，默认值通过 `include_str!("default_settings.toml")` 内嵌。
//!
//! - `Settings::default_settings()` 返回内嵌默认配置
//! - `parse_settings_toml(toml_str)` 解析并校验自定义配置
//! - 缺省的段/字段回落到默认值

use std::path::PathBuf;

use serde::Deserialize;

use crate::engine::DEFAULT_MAX_RESULTS;
use crate::input::{DEFAULT_MAX_INPUT_LEN, MAX_SYLLABLE_LEN};
use crate::translator::DEFAULT_PREFIX_LIMIT;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

/// 输入缓冲长度的硬上限（配置校验用）。
const MAX_INPUT_LEN_LIMIT: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub candidates: CandidateSettings,
    pub segmenter: SegmenterSettings,
    pub input: InputSettings,
    pub dictionary: DictionarySettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CandidateSettings {
    pub prefix_limit: usize,
    pub max_results: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SegmenterSettings {
    pub max_syllable_len: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    pub max_len: usize,
}

/// 词典在磁盘上的布局，决定使用哪种 loader。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DictLayout {
    /// 目录下每个首字母一个 JSON 文件
    PerLetter,
    /// 单个合并 JSON 文件
    Combined,
    /// rime 风格词表（`词<TAB>拼 音<TAB>权重`），启动时在内存中编译
    Tsv,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DictionarySettings {
    pub layout: DictLayout,
    pub path: PathBuf,
    pub prewarm: bool,
}

impl Default for CandidateSettings {
    fn default() -> Self {
        Self {
            prefix_limit: DEFAULT_PREFIX_LIMIT,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl Default for SegmenterSettings {
    fn default() -> Self {
        Self {
            max_syllable_len: MAX_SYLLABLE_LEN,
        }
    }
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            max_len: DEFAULT_MAX_INPUT_LEN,
        }
    }
}

impl Default for DictionarySettings {
    fn default() -> Self {
        Self {
            layout: DictLayout::PerLetter,
            path: PathBuf::from("dict"),
            prewarm: true,
        }
    }
}

impl Settings {
    pub fn default_settings() -> Result<Self, SettingsError> {
        parse_settings_toml(DEFAULT_SETTINGS_TOML)
    }
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn invalid(field: &str, reason: &str) -> SettingsError {
    SettingsError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    if s.candidates.prefix_limit == 0 {
        return Err(invalid("candidates.prefix_limit", "must be >= 1"));
    }
    if s.candidates.max_results == 0 {
        return Err(invalid("candidates.max_results", "must be >= 1"));
    }
    if !(1..=MAX_SYLLABLE_LEN).contains(&s.segmenter.max_syllable_len) {
        return Err(invalid("segmenter.max_syllable_len", "must be in 1..=6"));
    }
    if !(1..=MAX_INPUT_LEN_LIMIT).contains(&s.input.max_len) {
        return Err(invalid("input.max_len", "must be in 1..=64"));
    }
    Ok(())
}

use thiserror::Error;

use crate::model::ValidationError;

#[derive(Error, Debug)]
pub enum JmxForgeError {
    #[error("解析错误: {0}")]
    ParseError(String),

    #[error("无效的测试: {0}")]
    InvalidTest(String),

    #[error("校验失败: {0}")]
    Validation(#[from] ValidationError),

    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("XML 生成错误: {0}")]
    XmlError(String),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON 解析错误: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("URL 解析错误: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for JmxForgeError {
    fn from(err: anyhow::Error) -> Self {
        JmxForgeError::Other(err.to_string())
    }
}

impl From<toml::de::Error> for JmxForgeError {
    fn from(err: toml::de::Error) -> Self {
        JmxForgeError::ConfigError(err.to_string())
    }
}

/// Result type for jmxforge crate
pub type Result<T> = std::result::Result<T, JmxForgeError>;

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// 校验失败原因，值为消息目录中的 key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationCode {
    SelectProject,
    InputName,
    ConfigureEnvironment,
    InputPath,
    InputUrl,
    UrlInvalid,
    DubboInputInterface,
    DubboInputMethod,
    DubboInputConfigCenter,
    DubboInputRegistryCenter,
    DubboInputConsumerService,
}

impl ValidationCode {
    pub const ALL: [ValidationCode; 11] = [
        Self::SelectProject,
        Self::InputName,
        Self::ConfigureEnvironment,
        Self::InputPath,
        Self::InputUrl,
        Self::UrlInvalid,
        Self::DubboInputInterface,
        Self::DubboInputMethod,
        Self::DubboInputConfigCenter,
        Self::DubboInputRegistryCenter,
        Self::DubboInputConsumerService,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::SelectProject => "api_test.select_project",
            Self::InputName => "api_test.input_name",
            Self::ConfigureEnvironment => {
                "api_test.request.please_configure_environment_in_scenario"
            }
            Self::InputPath => "api_test.request.input_path",
            Self::InputUrl => "api_test.request.input_url",
            Self::UrlInvalid => "api_test.request.url_invalid",
            Self::DubboInputInterface => "api_test.request.dubbo.input_interface",
            Self::DubboInputMethod => "api_test.request.dubbo.input_method",
            Self::DubboInputConfigCenter => "api_test.request.dubbo.input_config_center",
            Self::DubboInputRegistryCenter => "api_test.request.dubbo.input_registry_center",
            Self::DubboInputConsumerService => "api_test.request.dubbo.input_consumer_service",
        }
    }
}

impl fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

fn path_suffix(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" ({})", path)
    }
}

/// 校验错误：稳定的错误码 + 出错实体的路径
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}{}", .code, path_suffix(.path))]
pub struct ValidationError {
    pub code: ValidationCode,

    /// 例如 `scenarioDefinition[0].requests[2]`
    pub path: String,
}

impl ValidationError {
    pub fn new(code: ValidationCode) -> Self {
        Self {
            code,
            path: String::new(),
        }
    }

    /// 在路径前追加一段父级路径
    pub fn within(mut self, segment: impl fmt::Display) -> Self {
        self.path = if self.path.is_empty() {
            segment.to_string()
        } else {
            format!("{}.{}", segment, self.path)
        };
        self
    }

    /// 消息目录 key
    pub fn info(&self) -> &'static str {
        self.code.key()
    }
}

pub type Validation = std::result::Result<(), ValidationError>;

/// 面向编辑器的校验结果形状 `{isValid, info}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<&'static str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl From<&Validation> for ValidationReport {
    fn from(result: &Validation) -> Self {
        match result {
            Ok(()) => Self {
                is_valid: true,
                info: None,
                path: None,
            },
            Err(err) => Self {
                is_valid: false,
                info: Some(err.info()),
                path: Some(err.path.clone()),
            },
        }
    }
}

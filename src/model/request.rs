use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::Result;
use crate::environment::Environment;
use crate::model::assertion::Assertions;
use crate::model::dubbo::{ConfigCenter, ConsumerAndService, RegistryCenter};
use crate::model::extract::Extract;
use crate::model::merge::Configurable;
use crate::model::types::{Body, KeyValue, de, or_default, present};
use crate::model::validation::{Validation, ValidationCode, ValidationError};

/// 请求类型判别字段 `type` 的取值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestType {
    #[default]
    Http,
    Dubbo,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Http => "HTTP",
            RequestType::Dubbo => "DUBBO",
        }
    }

    /// 未知或缺失的判别值按 HTTP 处理
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("DUBBO") => RequestType::Dubbo,
            _ => RequestType::Http,
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 没有 http:// 或 https:// 前缀时补上 http://
pub(crate) fn with_default_scheme(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}

fn method_or_get<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(de::opt_string(deserializer)?
        .filter(|m| !m.is_empty())
        .unwrap_or_else(default_method))
}

fn default_method() -> String {
    "GET".to_string()
}

/// HTTP 请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HttpRequest {
    #[serde(deserialize_with = "de::opt_string")]
    pub name: Option<String>,

    #[serde(deserialize_with = "de::opt_string")]
    pub url: Option<String>,

    /// 使用环境时的相对路径
    #[serde(deserialize_with = "de::opt_string")]
    pub path: Option<String>,

    #[serde(deserialize_with = "method_or_get")]
    pub method: String,

    #[serde(deserialize_with = "or_default")]
    pub parameters: Vec<KeyValue>,

    #[serde(deserialize_with = "or_default")]
    pub headers: Vec<KeyValue>,

    #[serde(deserialize_with = "or_default")]
    pub body: Body,

    #[serde(deserialize_with = "or_default")]
    pub assertions: Assertions,

    #[serde(deserialize_with = "or_default")]
    pub extract: Extract,

    #[serde(deserialize_with = "de::flag")]
    pub use_environment: bool,

    /// 编辑器保存的环境快照，生成时以场景上的环境为准
    pub environment: Option<Environment>,
}

impl Default for HttpRequest {
    fn default() -> Self {
        Self {
            name: None,
            url: None,
            path: None,
            method: default_method(),
            parameters: Vec::new(),
            headers: Vec::new(),
            body: Body::default(),
            assertions: Assertions::default(),
            extract: Extract::default(),
            use_environment: false,
            environment: None,
        }
    }
}

impl HttpRequest {
    pub fn new(method: &str, url: &str) -> Self {
        Self {
            method: method.to_string(),
            url: Some(url.to_string()),
            ..Self::default()
        }
    }

    /// 基于环境的请求，只填写 path
    pub fn with_environment_path(method: &str, path: &str) -> Self {
        Self {
            method: method.to_string(),
            path: Some(path.to_string()),
            use_environment: true,
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    pub fn add_parameter(&mut self, kv: KeyValue) {
        self.parameters.push(kv);
    }

    pub fn add_header(&mut self, kv: KeyValue) {
        self.headers.push(kv);
    }

    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }

    pub fn show_method(&self) -> String {
        self.method.to_uppercase()
    }

    pub fn validate(&self, environment_id: Option<&str>) -> Validation {
        if self.use_environment {
            if environment_id.is_none_or(str::is_empty) {
                return Err(ValidationError::new(ValidationCode::ConfigureEnvironment));
            }
            if !present(&self.path) {
                return Err(ValidationError::new(ValidationCode::InputPath));
            }
        } else {
            let Some(url) = self.url.as_deref().filter(|u| !u.is_empty()) else {
                return Err(ValidationError::new(ValidationCode::InputUrl));
            };
            let parsed = url::Url::parse(&with_default_scheme(url));
            if parsed.is_err() {
                return Err(ValidationError::new(ValidationCode::UrlInvalid));
            }
        }
        Ok(())
    }
}

impl Configurable for HttpRequest {}

fn default_protocol() -> String {
    DubboRequest::PROTOCOL_DUBBO.to_string()
}

fn protocol_or_dubbo<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(de::opt_string(deserializer)?
        .filter(|p| !p.is_empty())
        .unwrap_or_else(default_protocol))
}

/// Dubbo / RMI 调用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DubboRequest {
    #[serde(deserialize_with = "de::opt_string")]
    pub name: Option<String>,

    #[serde(deserialize_with = "protocol_or_dubbo")]
    pub protocol: String,

    #[serde(deserialize_with = "de::opt_string")]
    pub interface: Option<String>,

    #[serde(deserialize_with = "de::opt_string")]
    pub method: Option<String>,

    #[serde(deserialize_with = "or_default")]
    pub config_center: ConfigCenter,

    #[serde(deserialize_with = "or_default")]
    pub registry_center: RegistryCenter,

    #[serde(deserialize_with = "or_default")]
    pub consumer_and_service: ConsumerAndService,

    #[serde(deserialize_with = "or_default")]
    pub args: Vec<KeyValue>,

    #[serde(deserialize_with = "or_default")]
    pub attachment_args: Vec<KeyValue>,

    #[serde(deserialize_with = "or_default")]
    pub assertions: Assertions,

    #[serde(deserialize_with = "or_default")]
    pub extract: Extract,
}

impl Default for DubboRequest {
    fn default() -> Self {
        Self {
            name: None,
            protocol: default_protocol(),
            interface: None,
            method: None,
            config_center: ConfigCenter::default(),
            registry_center: RegistryCenter::default(),
            consumer_and_service: ConsumerAndService::default(),
            args: Vec::new(),
            attachment_args: Vec::new(),
            assertions: Assertions::default(),
            extract: Extract::default(),
        }
    }
}

impl DubboRequest {
    pub const PROTOCOL_DUBBO: &'static str = "dubbo://";
    pub const PROTOCOL_RMI: &'static str = "rmi://";

    pub fn new(interface: &str, method: &str) -> Self {
        Self {
            interface: Some(interface.to_string()),
            method: Some(method.to_string()),
            ..Self::default()
        }
    }

    pub fn add_arg(&mut self, kv: KeyValue) {
        self.args.push(kv);
    }

    pub fn add_attachment_arg(&mut self, kv: KeyValue) {
        self.attachment_args.push(kv);
    }

    /// `dubbo://` -> `DUBBO`
    pub fn show_method(&self) -> String {
        self.protocol.trim_end_matches("://").to_uppercase()
    }

    pub fn validate(&self) -> Validation {
        if !present(&self.interface) {
            return Err(ValidationError::new(ValidationCode::DubboInputInterface));
        }
        if !present(&self.method) {
            return Err(ValidationError::new(ValidationCode::DubboInputMethod));
        }
        if !self.config_center.is_valid() {
            return Err(ValidationError::new(ValidationCode::DubboInputConfigCenter));
        }
        if !self.registry_center.is_valid() {
            return Err(ValidationError::new(ValidationCode::DubboInputRegistryCenter));
        }
        if !self.consumer_and_service.is_valid() {
            return Err(ValidationError::new(
                ValidationCode::DubboInputConsumerService,
            ));
        }
        Ok(())
    }
}

impl Configurable for DubboRequest {}

/// 场景中的一个请求，封闭的变体集合
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Request {
    #[serde(rename = "HTTP")]
    Http(HttpRequest),
    #[serde(rename = "DUBBO")]
    Dubbo(DubboRequest),
}

impl Default for Request {
    fn default() -> Self {
        Request::Http(HttpRequest::default())
    }
}

impl Request {
    /// 唯一的变体选择入口：按 `type` 判别字段构造具体请求
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(Self::dispatch(value)?)
    }

    fn dispatch(mut value: Value) -> serde_json::Result<Self> {
        if value.is_null() {
            value = Value::Object(Default::default());
        }
        let kind = RequestType::from_tag(value.get("type").and_then(Value::as_str));
        if let Value::Object(fields) = &mut value {
            fields.remove("type");
        }
        Ok(match kind {
            RequestType::Http => Request::Http(serde_json::from_value(value)?),
            RequestType::Dubbo => Request::Dubbo(serde_json::from_value(value)?),
        })
    }

    pub fn kind(&self) -> RequestType {
        match self {
            Request::Http(_) => RequestType::Http,
            Request::Dubbo(_) => RequestType::Dubbo,
        }
    }

    /// 列表中展示的类型
    pub fn show_type(&self) -> &'static str {
        match self {
            Request::Http(_) => "HTTP",
            Request::Dubbo(_) => "RPC",
        }
    }

    pub fn show_method(&self) -> String {
        match self {
            Request::Http(http) => http.show_method(),
            Request::Dubbo(dubbo) => dubbo.show_method(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Request::Http(http) => http.name.as_deref(),
            Request::Dubbo(dubbo) => dubbo.name.as_deref(),
        }
    }

    pub fn assertions(&self) -> &Assertions {
        match self {
            Request::Http(http) => &http.assertions,
            Request::Dubbo(dubbo) => &dubbo.assertions,
        }
    }

    pub fn extract(&self) -> &Extract {
        match self {
            Request::Http(http) => &http.extract,
            Request::Dubbo(dubbo) => &dubbo.extract,
        }
    }

    /// RPC 请求不依赖场景环境
    pub fn validate(&self, environment_id: Option<&str>) -> Validation {
        match self {
            Request::Http(http) => http.validate(environment_id),
            Request::Dubbo(dubbo) => dubbo.validate(),
        }
    }

    pub fn is_valid(&self, environment_id: Option<&str>) -> bool {
        self.validate(environment_id).is_ok()
    }
}

impl From<HttpRequest> for Request {
    fn from(request: HttpRequest) -> Self {
        Request::Http(request)
    }
}

impl From<DubboRequest> for Request {
    fn from(request: DubboRequest) -> Self {
        Request::Dubbo(request)
    }
}

impl<'de> Deserialize<'de> for Request {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Request::dispatch(value).map_err(D::Error::custom)
    }
}

impl Configurable for Request {
    const FROZEN: &'static [&'static str] = &["type"];
}

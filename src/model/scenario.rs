use serde::{Deserialize, Deserializer, Serialize};

use crate::environment::Environment;
use crate::model::dubbo::DubboConfig;
use crate::model::merge::Configurable;
use crate::model::request::Request;
use crate::model::types::{KeyValue, de, or_default};
use crate::model::validation::Validation;

fn default_requests() -> Vec<Request> {
    vec![Request::default()]
}

/// 缺省时带一个默认 HTTP 请求；显式的空数组保持为空
fn requests_or_default<'de, D>(deserializer: D) -> Result<Vec<Request>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Request>>::deserialize(deserializer)?.unwrap_or_else(default_requests))
}

/// 场景：有序的请求列表以及场景级变量、请求头和 Dubbo 共享配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Scenario {
    #[serde(deserialize_with = "de::opt_string")]
    pub name: Option<String>,

    #[serde(deserialize_with = "de::opt_string")]
    pub url: Option<String>,

    #[serde(deserialize_with = "or_default")]
    pub variables: Vec<KeyValue>,

    #[serde(deserialize_with = "or_default")]
    pub headers: Vec<KeyValue>,

    #[serde(deserialize_with = "requests_or_default")]
    pub requests: Vec<Request>,

    #[serde(deserialize_with = "de::opt_string")]
    pub environment_id: Option<String>,

    pub environment: Option<Environment>,

    #[serde(deserialize_with = "or_default")]
    pub dubbo_config: DubboConfig,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: None,
            url: None,
            variables: Vec::new(),
            headers: Vec::new(),
            requests: default_requests(),
            environment_id: None,
            environment: None,
            dubbo_config: DubboConfig::default(),
        }
    }
}

impl Scenario {
    /// 新建场景，带一个默认 HTTP 请求
    pub fn new() -> Self {
        Self::default()
    }

    /// 不带任何请求的场景
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            requests: Vec::new(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn add_request(&mut self, request: impl Into<Request>) {
        self.requests.push(request.into());
    }

    pub fn add_variable(&mut self, kv: KeyValue) {
        self.variables.push(kv);
    }

    pub fn add_header(&mut self, kv: KeyValue) {
        self.headers.push(kv);
    }

    /// 按顺序校验请求，返回第一个失败
    pub fn validate(&self) -> Validation {
        let environment_id = self.environment_id.as_deref();
        for (i, request) in self.requests.iter().enumerate() {
            request
                .validate(environment_id)
                .map_err(|e| e.within(format_args!("requests[{}]", i)))?;
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

impl Configurable for Scenario {}

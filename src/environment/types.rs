use std::collections::HashMap;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::KeyValue;
use crate::model::types::{de, or_default, present};

/// 环境下发的变量 / 请求头，可能是结构化列表，也可能是 JSON 编码后的字符串
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KvPayload {
    List(Vec<KeyValue>),
    Encoded(String),
}

impl Default for KvPayload {
    fn default() -> Self {
        KvPayload::List(Vec::new())
    }
}

impl KvPayload {
    /// 归一化为列表；无法解析的字符串视为没有数据
    pub fn entries(&self) -> Vec<KeyValue> {
        match self {
            KvPayload::List(list) => list.clone(),
            KvPayload::Encoded(raw) if raw.trim().is_empty() => Vec::new(),
            KvPayload::Encoded(raw) => match serde_json::from_str::<Vec<KeyValue>>(raw) {
                Ok(list) => list,
                Err(e) => {
                    tracing::warn!("Ignoring malformed environment payload: {}", e);
                    Vec::new()
                }
            },
        }
    }
}

/// 外部环境：连接默认值（协议 / 域名 / 端口）以及默认变量和请求头
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    #[serde(deserialize_with = "de::opt_string")]
    pub id: Option<String>,

    #[serde(deserialize_with = "de::opt_string")]
    pub name: Option<String>,

    #[serde(deserialize_with = "de::opt_string")]
    pub protocol: Option<String>,

    #[serde(deserialize_with = "de::opt_string")]
    pub domain: Option<String>,

    #[serde(deserialize_with = "de::opt_string")]
    pub port: Option<String>,

    #[serde(deserialize_with = "or_default")]
    pub variables: KvPayload,

    #[serde(deserialize_with = "or_default")]
    pub headers: KvPayload,
}

impl Environment {
    pub fn new(protocol: &str, domain: &str, port: &str) -> Self {
        Self {
            protocol: Some(protocol.to_string()),
            domain: Some(domain.to_string()),
            port: Some(port.to_string()),
            ..Self::default()
        }
    }
}

/// 左偏合并：环境条目只有在 name 非空且本地没有同名条目时才追加
pub fn merge_missing(target: &mut Vec<KeyValue>, entries: Vec<KeyValue>) {
    let keys: HashSet<String> = target
        .iter()
        .filter_map(|kv| kv.name.clone())
        .collect();

    for entry in entries {
        if present(&entry.name) && !keys.contains(entry.name()) {
            target.push(entry);
        }
    }
}

/// 配置文件中的全部环境，key 为环境 id
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(default)]
    pub environments: HashMap<String, Environment>,
}

impl EnvironmentConfig {
    pub fn get_environment(&self, id: &str) -> Option<&Environment> {
        self.environments.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_is_left_biased_by_name() {
        let mut variables = vec![KeyValue::new("a", "1")];
        merge_missing(
            &mut variables,
            vec![KeyValue::new("a", "2"), KeyValue::new("b", "3")],
        );
        assert_eq!(variables, vec![KeyValue::new("a", "1"), KeyValue::new("b", "3")]);
    }

    #[test]
    fn test_merge_skips_unnamed_entries() {
        let mut headers = Vec::new();
        merge_missing(
            &mut headers,
            vec![
                KeyValue {
                    name: None,
                    value: Some("x".to_string()),
                },
                KeyValue::new("X-Env", "dev"),
            ],
        );
        assert_eq!(headers, vec![KeyValue::new("X-Env", "dev")]);
    }

    #[test]
    fn test_payload_accepts_list_and_string() {
        let env: Environment = serde_json::from_str(
            r#"{
                "protocol": "https",
                "domain": "api.example.com",
                "port": 443,
                "variables": [{"name": "a", "value": "1"}],
                "headers": "[{\"name\": \"X-Env\", \"value\": \"dev\"}]"
            }"#,
        )
        .unwrap();
        assert_eq!(env.port.as_deref(), Some("443"));
        assert_eq!(env.variables.entries(), vec![KeyValue::new("a", "1")]);
        assert_eq!(env.headers.entries(), vec![KeyValue::new("X-Env", "dev")]);
    }

    #[test]
    fn test_malformed_payload_is_empty() {
        let payload = KvPayload::Encoded("not json".to_string());
        assert!(payload.entries().is_empty());
        assert!(KvPayload::Encoded(String::new()).entries().is_empty());
    }

    #[test]
    fn test_environment_config_parse() {
        let toml_str = r#"
[environments.dev]
name = "Development"
protocol = "http"
domain = "localhost"
port = "8080"
variables = [{ name = "token", value = "dev-token" }]

[environments.prod]
protocol = "https"
domain = "api.example.com"
headers = '[{"name": "X-Env", "value": "prod"}]'
"#;

        let config: EnvironmentConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.environments.len(), 2);

        let dev = config.get_environment("dev").unwrap();
        assert_eq!(dev.domain.as_deref(), Some("localhost"));
        assert_eq!(dev.variables.entries(), vec![KeyValue::new("token", "dev-token")]);

        let prod = config.get_environment("prod").unwrap();
        assert_eq!(prod.headers.entries(), vec![KeyValue::new("X-Env", "prod")]);
    }
}

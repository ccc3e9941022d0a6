use serde::{Deserialize, Serialize};

use crate::model::merge::Configurable;
use crate::model::types::{de, present};

/// 目标字段未设置且来源字段存在时才继承
fn inherit(target: &mut Option<String>, source: &Option<String>) {
    if source.is_some() && !present(target) {
        *target = source.clone();
    }
}

/// Dubbo 配置中心
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigCenter {
    #[serde(deserialize_with = "de::opt_string")]
    pub protocol: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub group: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub namespace: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub username: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub address: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub password: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub timeout: Option<String>,
}

impl ConfigCenter {
    pub const PROTOCOLS: [&'static str; 3] = ["zookeeper", "nacos", "apollo"];

    /// 只检查是否填写了任意字段
    pub fn is_valid(&self) -> bool {
        [
            &self.protocol,
            &self.group,
            &self.namespace,
            &self.username,
            &self.address,
            &self.password,
            &self.timeout,
        ]
        .into_iter()
        .any(present)
    }

    pub fn inherit_from(&mut self, source: &ConfigCenter) {
        inherit(&mut self.protocol, &source.protocol);
        inherit(&mut self.group, &source.group);
        inherit(&mut self.namespace, &source.namespace);
        inherit(&mut self.username, &source.username);
        inherit(&mut self.address, &source.address);
        inherit(&mut self.password, &source.password);
        inherit(&mut self.timeout, &source.timeout);
    }
}

impl Configurable for ConfigCenter {}

/// Dubbo 注册中心
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryCenter {
    #[serde(deserialize_with = "de::opt_string")]
    pub protocol: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub group: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub username: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub address: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub password: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub timeout: Option<String>,
}

impl RegistryCenter {
    pub const PROTOCOLS: [&'static str; 7] = [
        "none",
        "zookeeper",
        "nacos",
        "apollo",
        "multicast",
        "redis",
        "simple",
    ];

    pub fn is_valid(&self) -> bool {
        [
            &self.protocol,
            &self.group,
            &self.username,
            &self.address,
            &self.password,
            &self.timeout,
        ]
        .into_iter()
        .any(present)
    }

    pub fn inherit_from(&mut self, source: &RegistryCenter) {
        inherit(&mut self.protocol, &source.protocol);
        inherit(&mut self.group, &source.group);
        inherit(&mut self.username, &source.username);
        inherit(&mut self.address, &source.address);
        inherit(&mut self.password, &source.password);
        inherit(&mut self.timeout, &source.timeout);
    }
}

impl Configurable for RegistryCenter {}

/// 消费者与服务调优参数
///
/// 请求级默认值: timeout=1000, version=1.0, retries=0, cluster=failfast,
/// connections=100, async=sync, loadBalance=random
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConsumerAndService {
    #[serde(deserialize_with = "de::opt_string")]
    pub timeout: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub version: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub retries: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub cluster: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub group: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub connections: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub r#async: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub load_balance: Option<String>,
}

impl Default for ConsumerAndService {
    fn default() -> Self {
        Self {
            timeout: Some("1000".to_string()),
            version: Some("1.0".to_string()),
            retries: Some("0".to_string()),
            cluster: Some("failfast".to_string()),
            group: None,
            connections: Some("100".to_string()),
            r#async: Some("sync".to_string()),
            load_balance: Some("random".to_string()),
        }
    }
}

impl ConsumerAndService {
    pub const ASYNC_OPTIONS: [&'static str; 2] = ["sync", "async"];
    pub const LOAD_BALANCE_OPTIONS: [&'static str; 4] =
        ["random", "roundrobin", "leastactive", "consistenthash"];

    /// 所有字段均未设置，用于场景级共享配置
    pub fn unset() -> Self {
        Self {
            timeout: None,
            version: None,
            retries: None,
            cluster: None,
            group: None,
            connections: None,
            r#async: None,
            load_balance: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        [
            &self.timeout,
            &self.version,
            &self.retries,
            &self.cluster,
            &self.group,
            &self.connections,
            &self.r#async,
            &self.load_balance,
        ]
        .into_iter()
        .any(present)
    }

    pub fn inherit_from(&mut self, source: &ConsumerAndService) {
        inherit(&mut self.timeout, &source.timeout);
        inherit(&mut self.version, &source.version);
        inherit(&mut self.retries, &source.retries);
        inherit(&mut self.cluster, &source.cluster);
        inherit(&mut self.group, &source.group);
        inherit(&mut self.connections, &source.connections);
        inherit(&mut self.r#async, &source.r#async);
        inherit(&mut self.load_balance, &source.load_balance);
    }
}

impl Configurable for ConsumerAndService {}

fn unset_consumer_and_service() -> ConsumerAndService {
    ConsumerAndService::unset()
}

fn consumer_and_service_or_unset<'de, D>(deserializer: D) -> Result<ConsumerAndService, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<ConsumerAndService>::deserialize(deserializer)?
        .unwrap_or_else(ConsumerAndService::unset))
}

/// 场景级共享的 Dubbo 连接配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DubboConfig {
    pub config_center: ConfigCenter,
    pub registry_center: RegistryCenter,

    #[serde(
        default = "unset_consumer_and_service",
        deserialize_with = "consumer_and_service_or_unset"
    )]
    pub consumer_and_service: ConsumerAndService,
}

impl Default for DubboConfig {
    fn default() -> Self {
        Self {
            config_center: ConfigCenter::default(),
            registry_center: RegistryCenter::default(),
            consumer_and_service: ConsumerAndService::unset(),
        }
    }
}

impl Configurable for DubboConfig {}

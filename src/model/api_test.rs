use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::Result;
use crate::model::merge::Configurable;
use crate::model::scenario::Scenario;
use crate::model::types::{de, present};
use crate::model::validation::{Validation, ValidationCode, ValidationError};

fn default_type() -> String {
    Test::TYPE.to_string()
}

fn default_version() -> String {
    Test::VERSION.to_string()
}

fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn id_or_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(de::opt_string(deserializer)?.unwrap_or_default())
}

fn default_scenarios() -> Vec<Scenario> {
    vec![Scenario::default()]
}

fn scenarios_or_default<'de, D>(deserializer: D) -> std::result::Result<Vec<Scenario>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Scenario>>::deserialize(deserializer)?.unwrap_or_else(default_scenarios))
}

fn empty_schedule() -> Value {
    Value::Object(Default::default())
}

/// 接口测试：根聚合，拥有全部场景
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Test {
    #[serde(rename = "type")]
    pub kind: String,

    pub version: String,

    /// 为空表示没有身份，无法生成 JMX
    #[serde(deserialize_with = "id_or_empty")]
    pub id: String,

    #[serde(deserialize_with = "de::opt_string")]
    pub name: Option<String>,

    #[serde(deserialize_with = "de::opt_string")]
    pub project_id: Option<String>,

    #[serde(deserialize_with = "scenarios_or_default")]
    pub scenario_definition: Vec<Scenario>,

    /// 定时配置，由调度系统解释
    pub schedule: Value,
}

impl Default for Test {
    fn default() -> Self {
        Self {
            kind: default_type(),
            version: default_version(),
            id: generate_id(),
            name: None,
            project_id: None,
            scenario_definition: default_scenarios(),
            schedule: empty_schedule(),
        }
    }
}

/// 导出格式 `{type, version, scenarios}`
#[derive(Debug, Serialize)]
struct ExportedConfig<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    version: &'a str,
    scenarios: &'a [Scenario],
}

impl Test {
    pub const TYPE: &'static str = "MS API CONFIG";
    pub const VERSION: &'static str = "1.1.0";

    /// 新建测试：生成 id，带一个默认场景和默认请求
    pub fn new() -> Self {
        Self::default()
    }

    /// 不带任何场景的测试
    pub fn named(name: &str, project_id: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            project_id: Some(project_id.to_string()),
            scenario_definition: Vec::new(),
            ..Self::default()
        }
    }

    /// 从持久化的 JSON 恢复
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn add_scenario(&mut self, scenario: Scenario) {
        self.scenario_definition.push(scenario);
    }

    /// 先校验场景，再校验项目和名称
    pub fn validate(&self) -> Validation {
        for (i, scenario) in self.scenario_definition.iter().enumerate() {
            scenario
                .validate()
                .map_err(|e| e.within(format_args!("scenarioDefinition[{}]", i)))?;
        }
        if !present(&self.project_id) {
            return Err(ValidationError::new(ValidationCode::SelectProject));
        }
        if !present(&self.name) {
            return Err(ValidationError::new(ValidationCode::InputName));
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// 导出为用于传输的 JSON，不包含 id / projectId / schedule
    pub fn export(&self) -> Result<String> {
        let exported = ExportedConfig {
            kind: &self.kind,
            version: &self.version,
            scenarios: &self.scenario_definition,
        };
        Ok(serde_json::to_string(&exported)?)
    }
}

impl Configurable for Test {
    const FROZEN: &'static [&'static str] = &["type"];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::request::HttpRequest;
    use serde_json::json;

    fn valid_scenario() -> Scenario {
        let mut scenario = Scenario::named("S1");
        scenario.add_request(HttpRequest::new("GET", "http://example.com"));
        scenario
    }

    #[test]
    fn test_new_test_defaults() {
        let test = Test::new();
        assert_eq!(test.kind, "MS API CONFIG");
        assert_eq!(test.version, "1.1.0");
        assert!(uuid::Uuid::parse_str(&test.id).is_ok());
        assert_eq!(test.scenario_definition.len(), 1);
        assert_eq!(test.scenario_definition[0].requests.len(), 1);
        assert_eq!(test.schedule, json!({}));
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(Test::new().id, Test::new().id);
    }

    #[test]
    fn test_missing_project_reported_after_scenarios() {
        let mut test = Test::named("T", "");
        test.project_id = None;
        test.add_scenario(valid_scenario());

        let err = test.validate().unwrap_err();
        assert_eq!(err.info(), "api_test.select_project");
    }

    #[test]
    fn test_scenario_failure_takes_priority() {
        let mut test = Test::named("", "");
        let mut scenario = valid_scenario();
        scenario.add_request(HttpRequest::default());
        test.add_scenario(scenario);

        let err = test.validate().unwrap_err();
        assert_eq!(err.code, ValidationCode::InputUrl);
        assert_eq!(err.path, "scenarioDefinition[0].requests[1]");
    }

    #[test]
    fn test_missing_name() {
        let mut test = Test::named("", "p1");
        test.add_scenario(valid_scenario());
        assert_eq!(test.validate().unwrap_err().code, ValidationCode::InputName);

        test.name = Some("T".to_string());
        assert!(test.is_valid());
    }

    #[test]
    fn test_from_json_keeps_identity() {
        let test = Test::from_json(
            r#"{
                "type": "MS API CONFIG",
                "version": "1.1.0",
                "id": "abc",
                "name": "Smoke",
                "projectId": "p1",
                "scenarioDefinition": [{"name": "S1", "requests": [{"url": "http://a.com"}]}],
                "schedule": {"enable": false}
            }"#,
        )
        .unwrap();
        assert_eq!(test.id, "abc");
        assert_eq!(test.scenario_definition[0].name(), "S1");
        assert_eq!(test.schedule["enable"], false);
        assert!(test.is_valid());
    }

    #[test]
    fn test_export_drops_identity() {
        let mut test = Test::named("T", "p1");
        test.add_scenario(valid_scenario());

        let exported: Value = serde_json::from_str(&test.export().unwrap()).unwrap();
        assert_eq!(exported["type"], "MS API CONFIG");
        assert_eq!(exported["version"], "1.1.0");
        assert_eq!(exported["scenarios"][0]["name"], "S1");
        assert_eq!(exported["scenarios"][0]["requests"][0]["type"], "HTTP");
        assert!(exported.get("id").is_none());
        assert!(exported.get("projectId").is_none());
    }

    #[test]
    fn test_set_merges_scalars() {
        let mut test = Test::named("T", "p1");
        let id = test.id.clone();
        test.set(&json!({"name": "Renamed", "scenarioDefinition": [{}]}))
            .unwrap();
        assert_eq!(test.name.as_deref(), Some("Renamed"));
        assert_eq!(test.id, id);
        assert!(test.scenario_definition.is_empty());
    }
}

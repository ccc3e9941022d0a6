use std::fs;

use jmxforge::Test;
use jmxforge::environment::ConfigLoader;
use jmxforge::jmx::{Component, JmxGenerator};
use tempfile::TempDir;

const SMOKE: &str = r#"{
    "type": "MS API CONFIG",
    "version": "1.1.0",
    "id": "6c1f7a52-2b9f-4c44-9a36-1a8f1f1c0d11",
    "name": "Smoke",
    "projectId": "p1",
    "scenarioDefinition": [
        {
            "name": "Users",
            "environmentId": "dev",
            "variables": [{"name": "token", "value": "local"}],
            "headers": [],
            "requests": [
                {
                    "type": "HTTP",
                    "name": "list",
                    "useEnvironment": true,
                    "path": "/users",
                    "method": "GET",
                    "parameters": [{"name": "page", "value": "1"}, {"name": "", "value": ""}],
                    "assertions": {
                        "regex": [{"subject": "Response Code", "expression": "200", "description": "ok"}],
                        "duration": {"value": 300}
                    },
                    "extract": {
                        "json": [{"variable": "first", "expression": "$.data[0].id"}]
                    }
                },
                {
                    "type": "HTTP",
                    "name": "create",
                    "url": "api.example.com/users",
                    "method": "POST",
                    "headers": [{"name": "Content-Type", "value": "text/plain"}],
                    "body": {"type": "Raw", "raw": "{\"name\":\"a\"}", "format": "json"}
                },
                {
                    "type": "HTTP",
                    "name": "broken",
                    "url": ""
                }
            ]
        },
        {
            "name": "RPC",
            "dubboConfig": {
                "registryCenter": {"protocol": "zookeeper", "address": "127.0.0.1:2181"}
            },
            "requests": [
                {
                    "type": "DUBBO",
                    "name": "getUser",
                    "interface": "com.example.UserService",
                    "method": "getUser",
                    "configCenter": {"protocol": "nacos"},
                    "registryCenter": {"protocol": "zookeeper"},
                    "args": [{"name": "java.lang.Long", "value": 1}, {}]
                }
            ]
        }
    ],
    "schedule": {}
}"#;

const CONFIG: &str = r#"
[environments.dev]
protocol = "https"
domain = "api.example.com"
port = "8443"
variables = '[{"name": "token", "value": "env"}, {"name": "tenant", "value": "t1"}]'
headers = [{ name = "X-Env", value = "dev" }]
"#;

fn load_smoke(dir: &TempDir) -> Test {
    let config_path = dir.path().join("jmxforge.toml");
    fs::write(&config_path, CONFIG).unwrap();
    let config = ConfigLoader::load_from_path(&config_path).unwrap();

    let mut test = Test::from_json(SMOKE).unwrap();
    assert_eq!(ConfigLoader::attach(&config, &mut test), 1);
    test
}

#[test]
fn test_compile_document_structure() {
    let dir = TempDir::new().unwrap();
    let test = load_smoke(&dir);

    let document = JmxGenerator::compile(&test).unwrap();
    assert_eq!(document.plan.name, "Smoke");

    let groups: Vec<_> = document.thread_groups().collect();
    assert_eq!(groups.len(), 2);

    let users = groups[0];
    let names: Vec<_> = users.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Users Variables", "Users Headers", "list", "create"]);

    let Component::Arguments(variables) = &users.children[0].component else {
        panic!("Expected arguments");
    };
    let pairs: Vec<_> = variables.iter().map(|kv| (kv.name(), kv.value())).collect();
    assert_eq!(pairs, vec![("token", "local"), ("tenant", "t1")]);

    let rpc = groups[1].samplers().next().unwrap();
    let Component::DubboSampler(request) = &rpc.component else {
        panic!("Expected Dubbo sampler");
    };
    assert_eq!(request.args.len(), 1);
    assert_eq!(request.config_center.protocol.as_deref(), Some("nacos"));
    assert_eq!(request.registry_center.address.as_deref(), Some("127.0.0.1:2181"));
}

#[test]
fn test_compile_markup() {
    let dir = TempDir::new().unwrap();
    let test = load_smoke(&dir);

    let file = test.to_jmx().unwrap();
    assert_eq!(file.name, "Smoke.jmx");

    let xml = &file.xml;
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
    assert!(xml.contains(r#"<ThreadGroup guiclass="ThreadGroupGui" testclass="ThreadGroup" testname="Users" enabled="true">"#));

    // 基于环境的 GET 请求
    assert!(xml.contains(r#"<stringProp name="HTTPSampler.domain">api.example.com</stringProp>"#));
    assert!(xml.contains(r#"<stringProp name="HTTPSampler.port">8443</stringProp>"#));
    assert!(xml.contains(r#"<stringProp name="HTTPSampler.path">/users</stringProp>"#));
    assert!(xml.contains(r#"<stringProp name="Argument.name">page</stringProp>"#));

    // Raw JSON 请求体
    assert!(xml.contains(r#"<boolProp name="HTTPSampler.postBodyRaw">true</boolProp>"#));
    assert!(xml.contains(r#"<stringProp name="HTTPSampler.path">/users?</stringProp>"#));
    assert!(xml.contains(r#"<stringProp name="Header.value">application/json</stringProp>"#));
    assert!(!xml.contains("text/plain"));

    // 断言和提取器
    assert!(xml.contains(r#"testname="Response In Time: 300""#));
    assert!(xml.contains(r#"<stringProp name="DurationAssertion.duration">300</stringProp>"#));
    assert!(xml.contains(r#"testname="first JSONExtractor""#));
    assert!(xml.contains(r#"<stringProp name="JSONPostProcessor.jsonPathExprs">$.data[0].id</stringProp>"#));

    // 无效请求不出现在文档中
    assert!(!xml.contains(r#"testname="broken""#));

    assert!(xml.contains(r#"<stringProp name="FIELD_DUBBO_ADDRESS">127.0.0.1:2181</stringProp>"#));
}

#[test]
fn test_validation_and_export() {
    let test = Test::from_json(SMOKE).unwrap();
    let err = test.validate().unwrap_err();
    assert_eq!(err.info(), "api_test.request.input_url");
    assert_eq!(err.path, "scenarioDefinition[0].requests[2]");

    let exported: serde_json::Value = serde_json::from_str(&test.export().unwrap()).unwrap();
    assert_eq!(exported["type"], "MS API CONFIG");
    assert_eq!(exported["scenarios"].as_array().unwrap().len(), 2);
    assert_eq!(exported["scenarios"][1]["requests"][0]["type"], "DUBBO");
}

#[test]
fn test_compile_leaves_model_untouched() {
    let dir = TempDir::new().unwrap();
    let test = load_smoke(&dir);
    let before = test.clone();

    let first = test.to_jmx().unwrap();
    let second = test.to_jmx().unwrap();
    assert_eq!(first.xml, second.xml);
    assert_eq!(test, before);
}

#[test]
fn test_blank_enum_fields_do_not_reject_test() {
    let json = r#"{
        "id": "t1",
        "name": "Blank",
        "projectId": "p1",
        "scenarioDefinition": [{
            "name": "S",
            "requests": [{
                "type": "HTTP",
                "name": "post",
                "url": "http://example.com/a",
                "method": "POST",
                "body": {"type": "", "raw": "x", "format": ""},
                "assertions": {"regex": [{"subject": "", "expression": ""}]},
                "extract": {"xpath": [{"type": "", "variable": "v", "expression": "//v"}]}
            }]
        }]
    }"#;
    let test = Test::from_json(json).unwrap();
    assert!(test.is_valid());

    let xml = test.to_jmx().unwrap().xml;
    assert!(xml.contains(r#"testname="post""#));
    assert!(xml.contains(r#"testname="v XPath2Evaluator""#));
    assert!(!xml.contains("RegexExtractor"));
}

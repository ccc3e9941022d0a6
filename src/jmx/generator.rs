use crate::environment::{Environment, merge_missing};
use crate::jmx::dubbo;
use crate::jmx::element::{Component, JmxDocument, JmxFile, TestElement};
use crate::jmx::http::{HttpArgument, HttpSampler};
use crate::model::{
    AssertionCondition, Assertions, BodyFormat, ExtractType, Extract, HttpRequest, KeyValue,
    Request, Scenario, Test, filter_valid,
};
use crate::{JmxForgeError, Result};

/// 把测试编译为 JMeter 文档树
///
/// 每个场景对应一个线程组，每个有效请求对应一个取样器；
/// 无效的请求、参数、断言和提取器直接丢弃，不会中断编译。
pub struct JmxGenerator;

impl JmxGenerator {
    pub fn compile(test: &Test) -> Result<JmxDocument> {
        if test.id.is_empty() {
            return Err(JmxForgeError::InvalidTest("测试缺少 id".to_string()));
        }
        let name = test
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| JmxForgeError::InvalidTest("测试缺少名称".to_string()))?;

        let mut plan = TestElement::new(name, Component::TestPlan);
        for scenario in &test.scenario_definition {
            plan.put(Self::thread_group(scenario)?);
        }

        tracing::debug!(
            "Compiled test '{}' with {} thread group(s)",
            name,
            plan.children.len()
        );
        Ok(JmxDocument::new(plan))
    }

    fn thread_group(source: &Scenario) -> Result<TestElement> {
        // 在副本上合并环境数据，原场景保持不变
        let mut scenario = source.clone();
        let name = scenario.name().to_string();
        let mut group = TestElement::new(name.as_str(), Component::ThreadGroup);

        if let Some(env) = &scenario.environment {
            merge_missing(&mut scenario.variables, env.variables.entries());
            merge_missing(&mut scenario.headers, env.headers.entries());
        }

        let variables = filter_valid(&scenario.variables);
        if !variables.is_empty() {
            group.put(TestElement::new(
                format!("{} Variables", name),
                Component::Arguments(variables),
            ));
        }

        let headers = filter_valid(&scenario.headers);
        if !headers.is_empty() {
            group.put(TestElement::new(
                format!("{} Headers", name),
                Component::HeaderManager(headers),
            ));
        }

        let environment_id = scenario.environment_id.as_deref();
        for (i, request) in scenario.requests.iter().enumerate() {
            if let Err(e) = request.validate(environment_id) {
                tracing::debug!("Skipping request #{} in '{}': {}", i, name, e);
                continue;
            }

            let mut sampler = match request {
                Request::Dubbo(rpc) => TestElement::new(
                    rpc.name.as_deref().unwrap_or_default(),
                    Component::DubboSampler(dubbo::prepare(rpc, &scenario.dubbo_config)),
                ),
                Request::Http(http) => Self::http_sampler(http, scenario.environment.as_ref())?,
            };

            Self::add_assertions(&mut sampler, request.assertions());
            Self::add_extractors(&mut sampler, request.extract());

            tracing::debug!("Added {} sampler '{}'", request.show_type(), sampler.name);
            group.put(sampler);
        }

        Ok(group)
    }

    fn http_sampler(source: &HttpRequest, environment: Option<&Environment>) -> Result<TestElement> {
        let mut request = source.clone();
        let mut sampler = HttpSampler::resolve(&request, environment)?;
        let name = request.name.clone().unwrap_or_default();
        let mut children = Vec::new();

        inject_content_type(&mut request.headers, request.body.format);
        let headers = filter_valid(&request.headers);
        if !headers.is_empty() {
            children.push(TestElement::new(
                format!("{} Headers", name),
                Component::HeaderManager(headers),
            ));
        }

        if request.is_get() {
            let params = filter_valid(&request.parameters);
            if !params.is_empty() {
                sampler.add_arguments(params.iter().map(HttpArgument::encoded).collect());
            }
        } else if request.body.is_kv() {
            let kvs = filter_valid(&request.body.kvs);
            sampler.add_arguments(kvs.iter().map(HttpArgument::encoded).collect());
        } else {
            sampler.set_post_body_raw(true);
            let raw = request.body.raw.as_deref().unwrap_or_default();
            sampler.add_arguments(vec![HttpArgument::raw(raw)]);
        }

        let mut element = TestElement::new(name, Component::HttpSampler(sampler));
        element.children = children;
        Ok(element)
    }

    fn add_assertions(sampler: &mut TestElement, assertions: &Assertions) {
        for regex in assertions.valid_regex() {
            let Some(subject) = regex.subject else {
                continue;
            };
            // 匹配方式固定为 contains，表达式本身即为正则
            sampler.put(TestElement::new(
                regex.description.clone().unwrap_or_default(),
                Component::ResponseAssertion {
                    subject,
                    condition: AssertionCondition::Contains,
                    value: regex.expression.clone().unwrap_or_default(),
                },
            ));
        }

        if assertions.duration.is_valid() {
            let duration = assertions.duration.value.clone().unwrap_or_default();
            sampler.put(TestElement::new(
                format!("Response In Time: {}", duration),
                Component::DurationAssertion { duration },
            ));
        }
    }

    fn add_extractors(sampler: &mut TestElement, extract: &Extract) {
        for extractor in extract.valid() {
            let variable = extractor.variable.clone().unwrap_or_default();
            let expression = extractor.expression.clone().unwrap_or_default();
            let name = format!("{} {}", variable, extractor.kind.label());

            let component = match extractor.kind {
                ExtractType::Regex => Component::RegexExtractor {
                    variable,
                    expression,
                    use_headers: extractor
                        .use_headers
                        .clone()
                        .unwrap_or_else(|| "false".to_string()),
                },
                ExtractType::JsonPath => Component::JsonExtractor {
                    variable,
                    expression,
                },
                ExtractType::XPath => Component::XPathExtractor {
                    variable,
                    expression,
                },
            };
            sampler.put(TestElement::new(name, component));
        }
    }
}

/// 按 Body 格式注入 Content-Type，先移除第一个已有的 Content-Type
fn inject_content_type(headers: &mut Vec<KeyValue>, format: Option<BodyFormat>) {
    let Some(content_type) = format.and_then(|f| f.content_type()) else {
        return;
    };
    if let Some(index) = headers
        .iter()
        .position(|h| h.name().eq_ignore_ascii_case("Content-Type"))
    {
        headers.remove(index);
    }
    headers.push(KeyValue::new("Content-Type", content_type));
}

impl Test {
    /// 编译并序列化为 `<测试名>.jmx`
    pub fn to_jmx(&self) -> Result<JmxFile> {
        let document = JmxGenerator::compile(self)?;
        Ok(JmxFile {
            name: format!("{}.jmx", document.plan.name),
            xml: document.to_xml()?,
        })
    }
}

use crate::Result;
use crate::jmx::http::HttpSampler;
use crate::jmx::node::{
    XmlNode, bool_prop, collection_prop, element_prop, int_prop, string_prop,
};
use crate::model::{AssertionCondition, DubboRequest, KeyValue, RegexSubject};

pub const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// JMeter 测试元素的具体种类及其字段
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    TestPlan,
    ThreadGroup,
    Arguments(Vec<KeyValue>),
    HeaderManager(Vec<KeyValue>),
    HttpSampler(HttpSampler),
    DubboSampler(DubboRequest),
    ResponseAssertion {
        subject: RegexSubject,
        condition: AssertionCondition,
        value: String,
    },
    DurationAssertion {
        duration: String,
    },
    RegexExtractor {
        variable: String,
        expression: String,
        use_headers: String,
    },
    JsonExtractor {
        variable: String,
        expression: String,
    },
    XPathExtractor {
        variable: String,
        expression: String,
    },
}

impl Component {
    /// (元素标签, guiclass)，testclass 与标签相同
    fn classes(&self) -> (&'static str, &'static str) {
        match self {
            Component::TestPlan => ("TestPlan", "TestPlanGui"),
            Component::ThreadGroup => ("ThreadGroup", "ThreadGroupGui"),
            Component::Arguments(_) => ("Arguments", "ArgumentsPanel"),
            Component::HeaderManager(_) => ("HeaderManager", "HeaderPanel"),
            Component::HttpSampler(_) => ("HTTPSamplerProxy", "HttpTestSampleGui"),
            Component::DubboSampler(_) => (
                "io.github.ningyu.jmeter.plugin.dubbo.sample.DubboSample",
                "io.github.ningyu.jmeter.plugin.dubbo.gui.DubboSampleGui",
            ),
            Component::ResponseAssertion { .. } => ("ResponseAssertion", "AssertionGui"),
            Component::DurationAssertion { .. } => ("DurationAssertion", "DurationAssertionGui"),
            Component::RegexExtractor { .. } => ("RegexExtractor", "RegexExtractorGui"),
            Component::JsonExtractor { .. } => ("JSONPostProcessor", "JSONPostProcessorGui"),
            Component::XPathExtractor { .. } => ("XPath2Extractor", "XPath2ExtractorGui"),
        }
    }

    fn props(&self) -> Vec<XmlNode> {
        match self {
            Component::TestPlan => vec![
                string_prop("TestPlan.comments", ""),
                bool_prop("TestPlan.functional_mode", false),
                bool_prop("TestPlan.tearDown_on_shutdown", true),
                bool_prop("TestPlan.serialize_threadgroups", false),
                arguments_panel("TestPlan.user_defined_variables", "ArgumentsPanel", []),
                string_prop("TestPlan.user_define_classpath", ""),
            ],
            Component::ThreadGroup => vec![
                string_prop("ThreadGroup.on_sample_error", "continue"),
                element_prop("ThreadGroup.main_controller", "LoopController")
                    .attr("guiclass", "LoopControlPanel")
                    .attr("testclass", "LoopController")
                    .attr("testname", "Loop Controller")
                    .attr("enabled", "true")
                    .child(bool_prop("LoopController.continue_forever", false))
                    .child(string_prop("LoopController.loops", "1")),
                string_prop("ThreadGroup.num_threads", "1"),
                string_prop("ThreadGroup.ramp_time", "1"),
                bool_prop("ThreadGroup.scheduler", false),
                string_prop("ThreadGroup.duration", ""),
                string_prop("ThreadGroup.delay", ""),
            ],
            Component::Arguments(args) => vec![collection_prop(
                "Arguments.arguments",
                args.iter().map(argument),
            )],
            Component::HeaderManager(headers) => vec![collection_prop(
                "HeaderManager.headers",
                headers.iter().map(|kv| {
                    element_prop("", "Header")
                        .child(string_prop("Header.name", kv.name()))
                        .child(string_prop("Header.value", kv.value()))
                }),
            )],
            Component::HttpSampler(sampler) => sampler.props(),
            Component::DubboSampler(request) => crate::jmx::dubbo::props(request),
            Component::ResponseAssertion {
                subject,
                condition,
                value,
            } => vec![
                collection_prop(
                    "Asserion.test_strings",
                    [string_prop(&java_hash_code(value).to_string(), value.as_str())],
                ),
                string_prop("Assertion.custom_message", ""),
                string_prop("Assertion.test_field", test_field(*subject)),
                bool_prop("Assertion.assume_success", false),
                int_prop("Assertion.test_type", i64::from(condition.bits())),
            ],
            Component::DurationAssertion { duration } => {
                vec![string_prop("DurationAssertion.duration", duration.as_str())]
            }
            Component::RegexExtractor {
                variable,
                expression,
                use_headers,
            } => vec![
                string_prop("RegexExtractor.useHeaders", use_headers.as_str()),
                string_prop("RegexExtractor.refname", variable.as_str()),
                string_prop("RegexExtractor.regex", expression.as_str()),
                string_prop("RegexExtractor.template", "$1$"),
                string_prop("RegexExtractor.default", ""),
                string_prop("RegexExtractor.match_number", ""),
            ],
            Component::JsonExtractor {
                variable,
                expression,
            } => vec![
                string_prop("JSONPostProcessor.referenceNames", variable.as_str()),
                string_prop("JSONPostProcessor.jsonPathExprs", expression.as_str()),
                string_prop("JSONPostProcessor.match_numbers", ""),
            ],
            Component::XPathExtractor {
                variable,
                expression,
            } => vec![
                string_prop("XPathExtractor2.default", ""),
                string_prop("XPathExtractor2.refname", variable.as_str()),
                string_prop("XPathExtractor2.matchNumber", "-1"),
                string_prop("XPathExtractor2.xpathQuery", expression.as_str()),
                string_prop("XPathExtractor2.namespaces", ""),
            ],
        }
    }
}

fn argument(kv: &KeyValue) -> XmlNode {
    element_prop(kv.name(), "Argument")
        .child(string_prop("Argument.name", kv.name()))
        .child(string_prop("Argument.value", kv.value()))
        .child(string_prop("Argument.metadata", "="))
}

/// `elementProp` 形式的参数面板（测试计划和 HTTP 取样器共用）
pub(crate) fn arguments_panel(
    name: &str,
    gui: &str,
    items: impl IntoIterator<Item = XmlNode>,
) -> XmlNode {
    element_prop(name, "Arguments")
        .attr("guiclass", gui)
        .attr("testclass", "Arguments")
        .attr("testname", "User Defined Variables")
        .attr("enabled", "true")
        .child(collection_prop("Arguments.arguments", items))
}

fn test_field(subject: RegexSubject) -> &'static str {
    match subject {
        RegexSubject::ResponseCode => "Assertion.response_code",
        RegexSubject::ResponseHeaders => "Assertion.response_headers",
        RegexSubject::ResponseData => "Assertion.response_data",
    }
}

/// JMeter 以字符串的 Java hashCode 作为断言模式的属性名
fn java_hash_code(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// 一个带名字的测试元素及其子元素
#[derive(Debug, Clone, PartialEq)]
pub struct TestElement {
    pub name: String,
    pub component: Component,
    pub children: Vec<TestElement>,
}

impl TestElement {
    pub fn new(name: impl Into<String>, component: Component) -> Self {
        Self {
            name: name.into(),
            component,
            children: Vec::new(),
        }
    }

    pub fn put(&mut self, child: TestElement) {
        self.children.push(child);
    }

    /// 深度优先查找第一个满足条件的子孙元素
    pub fn find(&self, predicate: &dyn Fn(&TestElement) -> bool) -> Option<&TestElement> {
        self.children.iter().find_map(|child| {
            if predicate(child) {
                Some(child)
            } else {
                child.find(predicate)
            }
        })
    }

    pub fn find_named(&self, name: &str) -> Option<&TestElement> {
        self.find(&|e: &TestElement| e.name == name)
    }

    pub fn samplers(&self) -> impl Iterator<Item = &TestElement> {
        self.children.iter().filter(|child| {
            matches!(
                child.component,
                Component::HttpSampler(_) | Component::DubboSampler(_)
            )
        })
    }

    /// 元素节点以及紧随其后的 hashTree
    fn to_nodes(&self) -> [XmlNode; 2] {
        let (tag, gui) = self.component.classes();
        let element = XmlNode::new(tag)
            .attr("guiclass", gui)
            .attr("testclass", tag)
            .attr("testname", self.name.as_str())
            .attr("enabled", "true")
            .children(self.component.props());

        let tree = XmlNode::new("hashTree")
            .children(self.children.iter().flat_map(TestElement::to_nodes));

        [element, tree]
    }
}

/// 编译结果：以测试计划为根的文档树
#[derive(Debug, Clone, PartialEq)]
pub struct JmxDocument {
    pub plan: TestElement,
}

impl JmxDocument {
    pub fn new(plan: TestElement) -> Self {
        Self { plan }
    }

    pub fn thread_groups(&self) -> impl Iterator<Item = &TestElement> {
        self.plan
            .children
            .iter()
            .filter(|child| matches!(child.component, Component::ThreadGroup))
    }

    pub fn to_xml(&self) -> Result<String> {
        let root = XmlNode::new("jmeterTestPlan")
            .attr("version", "1.2")
            .attr("properties", "5.0")
            .attr("jmeter", "5.2.1")
            .child(XmlNode::new("hashTree").children(self.plan.to_nodes()));

        Ok(format!("{}\n{}", XML_HEADER, root.to_xml()?))
    }
}

/// 导出的 JMX 文件：`<测试名>.jmx`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JmxFile {
    pub name: String,
    pub xml: String,
}

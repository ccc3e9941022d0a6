use serde::{Deserialize, Serialize};

use crate::model::merge::Configurable;
use crate::model::types::{de, present, or_default};

/// 断言种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssertionType {
    Text,
    Regex,
    Duration,
}

/// 正则断言的匹配对象
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegexSubject {
    #[serde(rename = "Response Code")]
    ResponseCode,
    #[serde(rename = "Response Headers")]
    ResponseHeaders,
    #[serde(rename = "Response Data")]
    ResponseData,
}

/// JMeter ResponseAssertion 的 test_type 位标志
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssertionCondition {
    Match,
    Contains,
    Not,
    Equals,
    Substring,
    Or,
}

impl AssertionCondition {
    pub fn bits(&self) -> u32 {
        match self {
            Self::Match => 1,
            Self::Contains => 1 << 1,
            Self::Not => 1 << 2,
            Self::Equals => 1 << 3,
            Self::Substring => 1 << 4,
            Self::Or => 1 << 5,
        }
    }
}

fn text_type() -> AssertionType {
    AssertionType::Text
}

fn regex_type() -> AssertionType {
    AssertionType::Regex
}

fn duration_type() -> AssertionType {
    AssertionType::Duration
}

/// 文本断言，仅保存在模型中，不参与 JMX 生成
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextAssertion {
    #[serde(rename = "type", skip_deserializing, default = "text_type")]
    pub kind: AssertionType,

    #[serde(deserialize_with = "de::opt_string")]
    pub subject: Option<String>,

    #[serde(deserialize_with = "de::opt_string")]
    pub condition: Option<String>,

    #[serde(deserialize_with = "de::opt_string")]
    pub value: Option<String>,
}

impl Default for TextAssertion {
    fn default() -> Self {
        Self {
            kind: AssertionType::Text,
            subject: None,
            condition: None,
            value: None,
        }
    }
}

impl Configurable for TextAssertion {
    const FROZEN: &'static [&'static str] = &["type"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegexAssertion {
    #[serde(rename = "type", skip_deserializing, default = "regex_type")]
    pub kind: AssertionType,

    #[serde(deserialize_with = "de::lenient")]
    pub subject: Option<RegexSubject>,

    #[serde(deserialize_with = "de::opt_string")]
    pub expression: Option<String>,

    #[serde(deserialize_with = "de::opt_string")]
    pub description: Option<String>,
}

impl Default for RegexAssertion {
    fn default() -> Self {
        Self {
            kind: AssertionType::Regex,
            subject: None,
            expression: None,
            description: None,
        }
    }
}

impl RegexAssertion {
    pub fn new(subject: RegexSubject, expression: impl Into<String>) -> Self {
        Self {
            subject: Some(subject),
            expression: Some(expression.into()),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_valid(&self) -> bool {
        self.subject.is_some() && present(&self.expression)
    }
}

impl Configurable for RegexAssertion {
    const FROZEN: &'static [&'static str] = &["type"];
}

/// 响应时间断言，value 为毫秒数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationAssertion {
    #[serde(rename = "type", skip_deserializing, default = "duration_type")]
    pub kind: AssertionType,

    #[serde(deserialize_with = "de::opt_string")]
    pub value: Option<String>,
}

impl Default for DurationAssertion {
    fn default() -> Self {
        Self {
            kind: AssertionType::Duration,
            value: None,
        }
    }
}

impl DurationAssertion {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn is_valid(&self) -> bool {
        present(&self.value)
    }
}

impl Configurable for DurationAssertion {
    const FROZEN: &'static [&'static str] = &["type"];
}

/// 请求上挂载的全部断言
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assertions {
    #[serde(deserialize_with = "or_default")]
    pub text: Vec<TextAssertion>,

    #[serde(deserialize_with = "or_default")]
    pub regex: Vec<RegexAssertion>,

    #[serde(deserialize_with = "or_default")]
    pub duration: DurationAssertion,
}

impl Assertions {
    pub fn add_text(&mut self, assertion: TextAssertion) {
        self.text.push(assertion);
    }

    pub fn add_regex(&mut self, assertion: RegexAssertion) {
        self.regex.push(assertion);
    }

    /// 有效的正则断言，保持声明顺序
    pub fn valid_regex(&self) -> impl Iterator<Item = &RegexAssertion> {
        self.regex.iter().filter(|r| r.is_valid())
    }
}

impl Configurable for Assertions {}

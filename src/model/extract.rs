use serde::{Deserialize, Deserializer, Serialize};

use crate::model::merge::Configurable;
use crate::model::types::{de, present};

/// 提取器种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExtractType {
    #[default]
    Regex,
    #[serde(rename = "JSONPath")]
    JsonPath,
    #[serde(rename = "XPath")]
    XPath,
}

impl ExtractType {
    /// 生成 JMX 节点名时使用的后缀
    pub fn label(&self) -> &'static str {
        match self {
            ExtractType::Regex => "RegexExtractor",
            ExtractType::JsonPath => "JSONExtractor",
            ExtractType::XPath => "XPath2Evaluator",
        }
    }
}

fn kind_or_default<'de, D>(deserializer: D) -> Result<ExtractType, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(de::lenient(deserializer)?.unwrap_or_default())
}

/// 从响应中提取值写入变量
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Extractor {
    #[serde(rename = "type", deserialize_with = "kind_or_default")]
    pub kind: ExtractType,

    #[serde(deserialize_with = "de::opt_string")]
    pub variable: Option<String>,

    /// 正则提取的来源：`true` 为响应头，否则为响应体
    #[serde(deserialize_with = "de::opt_string")]
    pub use_headers: Option<String>,

    /// 引用形式 `${variable}`，由编辑器维护
    #[serde(deserialize_with = "de::opt_string")]
    pub value: Option<String>,

    #[serde(deserialize_with = "de::opt_string")]
    pub expression: Option<String>,

    #[serde(deserialize_with = "de::opt_string")]
    pub description: Option<String>,
}

impl Extractor {
    pub fn new(kind: ExtractType, variable: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            kind,
            variable: Some(variable.into()),
            expression: Some(expression.into()),
            ..Self::default()
        }
    }

    pub fn with_use_headers(mut self, use_headers: bool) -> Self {
        self.use_headers = Some(use_headers.to_string());
        self
    }

    pub fn is_valid(&self) -> bool {
        present(&self.variable) && present(&self.expression)
    }
}

impl Configurable for Extractor {
    const FROZEN: &'static [&'static str] = &["type"];
}

fn tagged<'de, D>(deserializer: D, kind: ExtractType) -> Result<Vec<Extractor>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut list = Option::<Vec<Extractor>>::deserialize(deserializer)?.unwrap_or_default();
    for extractor in &mut list {
        extractor.kind = kind;
    }
    Ok(list)
}

fn regex_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Extractor>, D::Error> {
    tagged(d, ExtractType::Regex)
}

fn json_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Extractor>, D::Error> {
    tagged(d, ExtractType::JsonPath)
}

fn xpath_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Extractor>, D::Error> {
    tagged(d, ExtractType::XPath)
}

/// 请求上挂载的全部提取器，种类由所在列表决定
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Extract {
    #[serde(deserialize_with = "regex_list")]
    pub regex: Vec<Extractor>,

    #[serde(deserialize_with = "json_list")]
    pub json: Vec<Extractor>,

    #[serde(deserialize_with = "xpath_list")]
    pub xpath: Vec<Extractor>,
}

impl Extract {
    /// 按种类追加到对应列表
    pub fn add(&mut self, extractor: Extractor) {
        match extractor.kind {
            ExtractType::Regex => self.regex.push(extractor),
            ExtractType::JsonPath => self.json.push(extractor),
            ExtractType::XPath => self.xpath.push(extractor),
        }
    }

    /// 有效的提取器：先 regex，再 json，最后 xpath
    pub fn valid(&self) -> impl Iterator<Item = &Extractor> {
        self.regex
            .iter()
            .chain(&self.json)
            .chain(&self.xpath)
            .filter(|e| e.is_valid())
    }
}

impl Configurable for Extract {}

use serde::{Deserialize, Deserializer, Serialize};

use crate::model::merge::Configurable;

/// 字段是否“有值”：存在且非空字符串
pub(crate) fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

/// 宽松的反序列化辅助函数
///
/// 编辑器保存的 JSON 中同一字段可能是字符串、数字或布尔值
pub(crate) mod de {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// null / 字符串 / 数字 / 布尔 -> Option<String>
    pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(Value::Bool(b)) => Some(b.to_string()),
            Some(other) => Some(other.to_string()),
        })
    }

    /// 枚举取值：空字符串或未知取值视为未设置
    pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(opt_string(deserializer)?
            .filter(|s| !s.is_empty())
            .and_then(|s| serde_json::from_value(Value::String(s)).ok()))
    }

    /// null / 布尔 / "true" 字符串 -> bool
    pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Bool(b)) => b,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            Some(Value::Number(n)) => n.as_i64().is_some_and(|n| n != 0),
            _ => false,
        })
    }
}

/// 键值对，用于变量、请求头、参数、Body 字段和 RPC 参数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyValue {
    #[serde(deserialize_with = "de::opt_string")]
    pub name: Option<String>,

    #[serde(deserialize_with = "de::opt_string")]
    pub value: Option<String>,
}

impl KeyValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: Some(value.into()),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }

    /// name 与 value 至少有一个非空
    pub fn is_valid(&self) -> bool {
        present(&self.name) || present(&self.value)
    }
}

impl Configurable for KeyValue {}

/// 只保留有效的键值对，保持原有顺序
pub fn filter_valid(kvs: &[KeyValue]) -> Vec<KeyValue> {
    kvs.iter().filter(|kv| kv.is_valid()).cloned().collect()
}

/// 请求体类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyType {
    #[serde(rename = "KeyValue")]
    KeyValue,
    #[serde(rename = "Form Data")]
    FormData,
    #[serde(rename = "Raw")]
    Raw,
}

/// Raw 请求体的内容格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyFormat {
    Text,
    Json,
    Xml,
    Html,
}

impl BodyFormat {
    /// 对应的 Content-Type，纯文本不注入
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            BodyFormat::Json => Some("application/json"),
            BodyFormat::Html => Some("text/html"),
            BodyFormat::Xml => Some("text/xml"),
            BodyFormat::Text => None,
        }
    }
}

/// HTTP 请求体
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Body {
    #[serde(rename = "type", deserialize_with = "de::lenient")]
    pub body_type: Option<BodyType>,

    #[serde(deserialize_with = "de::opt_string")]
    pub raw: Option<String>,

    #[serde(deserialize_with = "or_default")]
    pub kvs: Vec<KeyValue>,

    #[serde(deserialize_with = "de::lenient")]
    pub format: Option<BodyFormat>,
}

impl Body {
    pub fn key_values(kvs: Vec<KeyValue>) -> Self {
        Self {
            body_type: Some(BodyType::KeyValue),
            kvs,
            ..Self::default()
        }
    }

    pub fn raw(raw: impl Into<String>, format: BodyFormat) -> Self {
        Self {
            body_type: Some(BodyType::Raw),
            raw: Some(raw.into()),
            format: Some(format),
            ..Self::default()
        }
    }

    pub fn is_kv(&self) -> bool {
        self.body_type == Some(BodyType::KeyValue)
    }

    pub fn add_kv(&mut self, kv: KeyValue) {
        self.kvs.push(kv);
    }

    pub fn is_valid(&self) -> bool {
        if self.is_kv() {
            self.kvs.iter().any(KeyValue::is_valid)
        } else {
            present(&self.raw)
        }
    }
}

impl Configurable for Body {}

/// null 视为缺省值
pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_value_validity() {
        assert!(KeyValue::new("a", "").is_valid());
        assert!(KeyValue::new("", "1").is_valid());
        assert!(!KeyValue::new("", "").is_valid());
        assert!(!KeyValue::default().is_valid());
    }

    #[test]
    fn test_key_value_lenient_value() {
        let kv: KeyValue = serde_json::from_str(r#"{"name": "port", "value": 8080}"#).unwrap();
        assert_eq!(kv.value(), "8080");

        let kv: KeyValue = serde_json::from_str("{}").unwrap();
        assert_eq!(kv, KeyValue::default());
    }

    #[test]
    fn test_filter_valid_keeps_order() {
        let kvs = vec![
            KeyValue::new("b", "2"),
            KeyValue::default(),
            KeyValue::new("a", "1"),
        ];
        let filtered = filter_valid(&kvs);
        assert_eq!(filtered, vec![KeyValue::new("b", "2"), KeyValue::new("a", "1")]);
    }

    #[test]
    fn test_body_validity() {
        let mut body = Body::key_values(vec![KeyValue::default()]);
        assert!(!body.is_valid());
        body.add_kv(KeyValue::new("id", "1"));
        assert!(body.is_valid());

        assert!(Body::raw("{}", BodyFormat::Json).is_valid());
        assert!(!Body::raw("", BodyFormat::Json).is_valid());
        assert!(!Body::default().is_valid());
    }

    #[test]
    fn test_body_type_names() {
        let body: Body =
            serde_json::from_str(r#"{"type": "Form Data", "raw": "a=1", "format": "text"}"#)
                .unwrap();
        assert_eq!(body.body_type, Some(BodyType::FormData));
        assert!(!body.is_kv());
        assert_eq!(body.format, Some(BodyFormat::Text));
    }

    #[test]
    fn test_body_format_content_type() {
        assert_eq!(BodyFormat::Json.content_type(), Some("application/json"));
        assert_eq!(BodyFormat::Html.content_type(), Some("text/html"));
        assert_eq!(BodyFormat::Xml.content_type(), Some("text/xml"));
        assert_eq!(BodyFormat::Text.content_type(), None);
    }

    #[test]
    fn test_body_tolerates_empty_and_unknown_enums() {
        let body: Body =
            serde_json::from_str(r#"{"type": "Raw", "raw": "x", "format": ""}"#).unwrap();
        assert_eq!(body.body_type, Some(BodyType::Raw));
        assert_eq!(body.format, None);

        let body: Body =
            serde_json::from_str(r#"{"type": "", "raw": "x", "format": "yaml"}"#).unwrap();
        assert_eq!(body.body_type, None);
        assert_eq!(body.format, None);
        assert!(!body.is_kv());
        assert!(body.is_valid());
    }
}

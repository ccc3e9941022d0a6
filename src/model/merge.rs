use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::Result;

/// 字段级合并约定
///
/// - 只覆盖 options 中显式出现的字段，未出现的字段保持原值
/// - 集合字段（JSON 数组）永不整体替换，只能通过各实体的 `add_*` 方法追加
/// - options 为空或不是对象时什么也不做
pub trait Configurable: Serialize + DeserializeOwned {
    /// 不允许通过 `set` 修改的字段（例如变体标签）
    const FROZEN: &'static [&'static str] = &[];

    fn set(&mut self, options: &Value) -> Result<()> {
        let Some(options) = options.as_object() else {
            return Ok(());
        };

        let mut current = serde_json::to_value(&*self)?;
        if let Value::Object(fields) = &mut current {
            for (name, value) in options {
                if Self::FROZEN.contains(&name.as_str()) {
                    continue;
                }
                if matches!(fields.get(name), Some(Value::Array(_))) {
                    continue;
                }
                fields.insert(name.clone(), value.clone());
            }
        }

        *self = serde_json::from_value(current)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Body, BodyType, KeyValue};
    use serde_json::json;

    #[test]
    fn test_set_overwrites_present_scalars_only() {
        let mut kv = KeyValue::new("a", "1");
        kv.set(&json!({"value": "2"})).unwrap();
        assert_eq!(kv, KeyValue::new("a", "2"));
    }

    #[test]
    fn test_set_never_replaces_collections() {
        let mut body = Body::key_values(vec![KeyValue::new("a", "1")]);
        body.set(&json!({"type": "Raw", "kvs": [{"name": "b"}]}))
            .unwrap();
        assert_eq!(body.body_type, Some(BodyType::Raw));
        assert_eq!(body.kvs, vec![KeyValue::new("a", "1")]);
    }

    #[test]
    fn test_set_tolerates_empty_options() {
        let mut kv = KeyValue::new("a", "1");
        kv.set(&Value::Null).unwrap();
        kv.set(&json!({})).unwrap();
        assert_eq!(kv, KeyValue::new("a", "1"));
    }

    #[test]
    fn test_set_ignores_unknown_fields() {
        let mut kv = KeyValue::new("a", "1");
        kv.set(&json!({"enable": true})).unwrap();
        assert_eq!(kv, KeyValue::new("a", "1"));
    }
}

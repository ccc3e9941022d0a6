use std::collections::HashMap;
use std::str::FromStr;

use once_cell::sync::Lazy;

use crate::JmxForgeError;
use crate::model::ValidationCode;

/// 消息目录支持的语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl FromStr for Locale {
    type Err = JmxForgeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "en_us" | "en-us" => Ok(Locale::En),
            "zh" | "zh_cn" | "zh-cn" => Ok(Locale::Zh),
            _ => Err(JmxForgeError::ParseError(format!("Unsupported locale: {}", s))),
        }
    }
}

static CATALOG: Lazy<HashMap<(Locale, &'static str), &'static str>> = Lazy::new(|| {
    let entries: [(&str, &str, &str); 11] = [
        (
            "api_test.select_project",
            "Please select a project",
            "请选择项目",
        ),
        ("api_test.input_name", "Please enter the test name", "请输入名称"),
        (
            "api_test.request.please_configure_environment_in_scenario",
            "Please configure an environment in the scenario",
            "请在场景中配置环境",
        ),
        ("api_test.request.input_path", "Please enter the path", "请输入路径"),
        ("api_test.request.input_url", "Please enter the URL", "请输入请求地址"),
        ("api_test.request.url_invalid", "The URL is invalid", "URL 无效"),
        (
            "api_test.request.dubbo.input_interface",
            "Please enter the interface",
            "请输入接口",
        ),
        (
            "api_test.request.dubbo.input_method",
            "Please enter the method",
            "请输入方法",
        ),
        (
            "api_test.request.dubbo.input_config_center",
            "Please configure the config center",
            "请配置配置中心",
        ),
        (
            "api_test.request.dubbo.input_registry_center",
            "Please configure the registry center",
            "请配置注册中心",
        ),
        (
            "api_test.request.dubbo.input_consumer_service",
            "Please configure the consumer and service",
            "请配置消费者与服务",
        ),
    ];

    let mut catalog = HashMap::new();
    for (key, en, zh) in entries {
        catalog.insert((Locale::En, key), en);
        catalog.insert((Locale::Zh, key), zh);
    }
    catalog
});

/// 按 key 查找本地化文本
pub fn lookup(key: &str, locale: Locale) -> Option<&'static str> {
    CATALOG.get(&(locale, key)).copied()
}

/// 校验错误码对应的文本，找不到时回退为 key 本身
pub fn message(code: ValidationCode, locale: Locale) -> &'static str {
    lookup(code.key(), locale).unwrap_or(code.key())
}

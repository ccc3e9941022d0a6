use std::borrow::Cow;

use crate::Result;
use crate::environment::Environment;
use crate::jmx::element::arguments_panel;
use crate::jmx::node::{XmlNode, bool_prop, element_prop, string_prop};
use crate::model::request::with_default_scheme;
use crate::model::types::present;
use crate::model::{HttpRequest, KeyValue};

fn decode(s: &str) -> String {
    urlencoding::decode(s)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| s.to_string())
}

/// HTTP 取样器参数（查询参数、表单字段或 Raw 请求体）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpArgument {
    pub name: String,
    pub value: String,
    pub always_encode: bool,
}

impl HttpArgument {
    pub fn encoded(kv: &KeyValue) -> Self {
        Self {
            name: kv.name().to_string(),
            value: kv.value().to_string(),
            always_encode: true,
        }
    }

    /// 没有名字的 Raw 请求体
    pub fn raw(value: &str) -> Self {
        Self {
            name: String::new(),
            value: value.to_string(),
            always_encode: false,
        }
    }

    fn to_node(&self) -> XmlNode {
        element_prop(&self.name, "HTTPArgument")
            .child(bool_prop("HTTPArgument.always_encode", self.always_encode))
            .child(string_prop("Argument.value", self.value.as_str()))
            .child(string_prop("Argument.metadata", "="))
            .child(bool_prop("HTTPArgument.use_equals", true))
            .child(string_prop("Argument.name", self.name.as_str()))
    }
}

/// 解析后的 HTTP 取样器地址与参数
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HttpSampler {
    pub method: String,
    pub use_environment: bool,
    pub domain: String,
    pub port: String,
    pub protocol: String,
    pub path: String,
    pub arguments: Option<Vec<HttpArgument>>,
    pub post_body_raw: bool,
}

impl HttpSampler {
    /// 解析请求地址
    ///
    /// 不使用环境时从 url 中取 host / port / scheme / path；
    /// 使用环境时 host / port / scheme 取自环境，path 取自请求。
    /// 非 GET 请求会把有效参数拼到 path 的查询串上。
    pub fn resolve(request: &HttpRequest, environment: Option<&Environment>) -> Result<Self> {
        let mut sampler = HttpSampler {
            method: request.method.clone(),
            use_environment: request.use_environment,
            ..Self::default()
        };

        if !request.use_environment {
            let raw = request.url.as_deref().unwrap_or_default();
            let url = url::Url::parse(&with_default_scheme(raw))?;

            sampler.domain = decode(url.host_str().unwrap_or_default());
            sampler.port = url.port().map(|p| p.to_string()).unwrap_or_default();
            sampler.protocol = url.scheme().to_string();
            sampler.path = query_path(request, decode(url.path()));
        } else {
            if let Some(env) = environment {
                sampler.port = env.port.clone().unwrap_or_default();
                sampler.protocol = env.protocol.clone().unwrap_or_default();
                sampler.domain = env.domain.clone().unwrap_or_default();
            }
            sampler.path = query_path(request, decode(request.path.as_deref().unwrap_or_default()));
        }

        Ok(sampler)
    }

    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }

    pub fn add_arguments(&mut self, arguments: Vec<HttpArgument>) {
        self.arguments = Some(arguments);
    }

    pub fn set_post_body_raw(&mut self, raw: bool) {
        self.post_body_raw = raw;
    }

    /// HTTPSamplerProxy 的属性列表
    pub(crate) fn props(&self) -> Vec<XmlNode> {
        let arguments = self
            .arguments
            .iter()
            .flatten()
            .map(HttpArgument::to_node);

        let mut props = Vec::new();
        if self.post_body_raw {
            props.push(bool_prop("HTTPSampler.postBodyRaw", true));
        }
        props.extend([
            arguments_panel("HTTPsampler.Arguments", "HTTPArgumentsPanel", arguments),
            string_prop("HTTPSampler.domain", self.domain.as_str()),
            string_prop("HTTPSampler.port", self.port.as_str()),
            string_prop("HTTPSampler.protocol", self.protocol.as_str()),
            string_prop("HTTPSampler.contentEncoding", "UTF-8"),
            string_prop("HTTPSampler.path", self.path.as_str()),
            string_prop("HTTPSampler.method", self.method.to_uppercase()),
            bool_prop("HTTPSampler.follow_redirects", true),
            bool_prop("HTTPSampler.auto_redirects", false),
            bool_prop("HTTPSampler.use_keepalive", true),
            bool_prop("HTTPSampler.DO_MULTIPART_POST", false),
            string_prop("HTTPSampler.embedded_url_re", ""),
            string_prop("HTTPSampler.connect_timeout", ""),
            string_prop("HTTPSampler.response_timeout", ""),
        ]);
        props
    }

    /// 实际请求目标：GET 的参数以查询串形式追加在 path 之后
    pub fn request_target(&self) -> String {
        match &self.arguments {
            Some(args) if self.is_get() && !args.is_empty() => {
                format!("{}?{}", self.path, encode_pairs(args.iter().map(|a| (&*a.name, &*a.value))))
            }
            _ => self.path.clone(),
        }
    }
}

/// 与 encodeURIComponent 一致：`!*'()` 保持原样
fn encode_component(s: &str) -> String {
    urlencoding::encode(s)
        .replace("%21", "!")
        .replace("%2A", "*")
        .replace("%27", "'")
        .replace("%28", "(")
        .replace("%29", ")")
}

fn encode_pairs<'a>(pairs: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    pairs
        .map(|(name, value)| {
            format!(
                "{}={}",
                encode_component(name),
                encode_component(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// 非 GET 请求：path + '?' + name=value&...（只取 name 和 value 都非空的参数）
fn query_path(request: &HttpRequest, path: String) -> String {
    if request.is_get() {
        return path;
    }

    let pairs = request
        .parameters
        .iter()
        .filter(|p| present(&p.name) && present(&p.value))
        .map(|p| (p.name(), p.value()));

    format!("{}?{}", path, encode_pairs(pairs))
}

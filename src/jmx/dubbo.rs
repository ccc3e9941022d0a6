use crate::jmx::node::{XmlNode, string_prop};
use crate::model::{DubboConfig, DubboRequest, KeyValue};

/// 生成取样器用的工作副本
///
/// 丢弃无效的参数和附件参数，然后从场景级共享配置中补齐请求未设置的字段。
/// 原请求不会被修改。
pub fn prepare(request: &DubboRequest, shared: &DubboConfig) -> DubboRequest {
    let mut prepared = request.clone();
    prepared.args.retain(KeyValue::is_valid);
    prepared.attachment_args.retain(KeyValue::is_valid);

    prepared.config_center.inherit_from(&shared.config_center);
    prepared.registry_center.inherit_from(&shared.registry_center);
    prepared
        .consumer_and_service
        .inherit_from(&shared.consumer_and_service);
    prepared
}

fn field(name: &str, value: &Option<String>) -> XmlNode {
    string_prop(name, value.as_deref().unwrap_or_default())
}

/// DubboSample 插件的属性列表
pub(crate) fn props(request: &DubboRequest) -> Vec<XmlNode> {
    let config = &request.config_center;
    let registry = &request.registry_center;
    let cas = &request.consumer_and_service;

    let mut props = vec![
        field("FIELD_DUBBO_CONFIG_CENTER_PROTOCOL", &config.protocol),
        field("FIELD_DUBBO_CONFIG_CENTER_GROUP", &config.group),
        field("FIELD_DUBBO_CONFIG_CENTER_NAMESPACE", &config.namespace),
        field("FIELD_DUBBO_CONFIG_CENTER_USER_NAME", &config.username),
        field("FIELD_DUBBO_CONFIG_CENTER_PASSWORD", &config.password),
        field("FIELD_DUBBO_CONFIG_CENTER_ADDRESS", &config.address),
        field("FIELD_DUBBO_CONFIG_CENTER_TIMEOUT", &config.timeout),
        field("FIELD_DUBBO_REGISTRY_PROTOCOL", &registry.protocol),
        field("FIELD_DUBBO_REGISTRY_GROUP", &registry.group),
        field("FIELD_DUBBO_REGISTRY_USER_NAME", &registry.username),
        field("FIELD_DUBBO_REGISTRY_PASSWORD", &registry.password),
        field("FIELD_DUBBO_ADDRESS", &registry.address),
        field("FIELD_DUBBO_REGISTRY_TIMEOUT", &registry.timeout),
        string_prop("FIELD_DUBBO_RPC_PROTOCOL", request.protocol.as_str()),
        field("FIELD_DUBBO_TIMEOUT", &cas.timeout),
        field("FIELD_DUBBO_VERSION", &cas.version),
        field("FIELD_DUBBO_RETRIES", &cas.retries),
        field("FIELD_DUBBO_GROUP", &cas.group),
        field("FIELD_DUBBO_CONNECTIONS", &cas.connections),
        field("FIELD_DUBBO_LOADBALANCE", &cas.load_balance),
        field("FIELD_DUBBO_ASYNC", &cas.r#async),
        field("FIELD_DUBBO_CLUSTER", &cas.cluster),
        field("FIELD_DUBBO_INTERFACE", &request.interface),
        field("FIELD_DUBBO_METHOD", &request.method),
        string_prop(
            "FIELD_DUBBO_METHOD_ARGS_SIZE",
            request.args.len().to_string(),
        ),
    ];

    // 参数名为 Java 类型，参数值为实参
    for (i, arg) in request.args.iter().enumerate() {
        let n = i + 1;
        props.push(string_prop(
            &format!("FIELD_DUBBO_METHOD_ARGS_PARAM_TYPE{}", n),
            arg.name(),
        ));
        props.push(string_prop(
            &format!("FIELD_DUBBO_METHOD_ARGS_PARAM_VALUE{}", n),
            arg.value(),
        ));
    }

    props.push(string_prop(
        "FIELD_DUBBO_ATTACHMENT_ARGS_SIZE",
        request.attachment_args.len().to_string(),
    ));
    for (i, arg) in request.attachment_args.iter().enumerate() {
        let n = i + 1;
        props.push(string_prop(
            &format!("FIELD_DUBBO_ATTACHMENT_ARGS_KEY{}", n),
            arg.name(),
        ));
        props.push(string_prop(
            &format!("FIELD_DUBBO_ATTACHMENT_ARGS_VALUE{}", n),
            arg.value(),
        ));
    }

    props
}

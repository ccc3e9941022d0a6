/// JMeter 测试计划：文档元素、HTTP / Dubbo 取样器和编译器
pub mod dubbo;
pub mod element;
pub mod generator;
pub mod http;
pub mod node;

pub use element::{Component, JmxDocument, JmxFile, TestElement};
pub use generator::JmxGenerator;
pub use http::{HttpArgument, HttpSampler};
pub use node::XmlNode;

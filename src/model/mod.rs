/// 测试模型：配置值对象、请求、场景和测试聚合
pub mod api_test;
pub mod assertion;
pub mod dubbo;
pub mod extract;
pub mod merge;
pub mod messages;
pub mod request;
pub mod scenario;
pub mod types;
pub mod validation;

pub use api_test::Test;
pub use assertion::{
    AssertionCondition, AssertionType, Assertions, DurationAssertion, RegexAssertion, RegexSubject,
    TextAssertion,
};
pub use dubbo::{ConfigCenter, ConsumerAndService, DubboConfig, RegistryCenter};
pub use extract::{ExtractType, Extract, Extractor};
pub use merge::Configurable;
pub use messages::Locale;
pub use request::{DubboRequest, HttpRequest, Request, RequestType};
pub use scenario::Scenario;
pub use types::{Body, BodyFormat, BodyType, KeyValue, filter_valid};
pub use validation::{Validation, ValidationCode, ValidationError, ValidationReport};

pub mod environment;
pub mod error;
pub mod jmx;
pub mod logger;
pub mod model;

// Re-export commonly used types
pub use error::{JmxForgeError, Result};
pub use jmx::{JmxDocument, JmxFile, JmxGenerator};
pub use model::Test;

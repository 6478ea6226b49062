pub mod logging;

pub use logging::{init_dev_logging, init_logging, LogConfig, LogFormat, LogOutput};

// Infrastructure for the call-trace navigator: engine output decoding,
// configuration and timer backends.

pub mod config;
pub mod engine_output;
pub mod scheduler;

pub use config::{ConfigError, NavigatorConfig};
pub use engine_output::{parse_callees, parse_callers, parse_find, parse_trace, EngineOutputError};
pub use scheduler::{TokioScheduler, VirtualScheduler};

mod init;
mod macros;
mod trace_id;

pub use init::{init_logger, init_logger_json};
pub use macros::{run_span, stage_span};
pub use trace_id::RunId;

//! Library side of the survey analysis runner: logging setup and the
//! staged pipeline.

pub mod logging;
pub mod pipeline;

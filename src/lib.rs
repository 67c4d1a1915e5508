// Sukashi watermark preview library

pub mod config;
pub mod constants;
pub mod job;
pub mod logging;
pub mod watermark;

pub mod accounting;
pub mod cli_args;
pub mod cli_dispatch;
pub mod code_blocks;
pub mod config;
pub mod errors;
pub mod logging;
pub mod markers;
pub mod pipeline;
pub mod providers;
pub mod repetition;
pub mod spinner;
pub mod style;
pub mod thinking;
pub mod truncation;
pub mod types;
pub mod wrap;

//! sheetchat library: streaming block parser and progressive renderer
//!
//! The model answers a prompt with one JSON document of typed UI blocks.
//! `parser` turns any partial snapshot of that document into the blocks that
//! can be shown so far; `tui` renders them progressively as more arrive.

pub mod block;
pub mod buffer;
pub mod config;
pub mod export;
pub mod logging;
pub mod parser;
pub mod registry;
pub mod replay;
pub mod storage;
pub mod tui;
pub mod util;

pub use block::Block;
pub use buffer::ResponseBuffer;
pub use parser::{parse_response, ParseResult, ResponseError};

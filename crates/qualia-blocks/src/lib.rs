//! Qualified block processing for qualia.
//!
//! A qualified block is a run of lines fenced by a pair of delimiter lines
//! carrying the same comment prefix and quality:
//!
//! ```text
//! # BEGIN laptop
//! export PATH="$HOME/bin:$PATH"
//! # END laptop
//! ```
//!
//! Given a set of qualities, [`qualify`] uncomments the blocks whose quality
//! is in the set and comments out all others. Both directions are
//! idempotent, so a file can be run through qualia repeatedly with
//! different qualities and only the last run takes effect.
//!
//! The crate is split into three layers:
//!
//! - [`commenter`]: comments or uncomments a group of lines for a marker.
//! - [`parser`]: recognizes `BEGIN`/`END` delimiter lines and scans text
//!   for closed blocks.
//! - [`qualifier`]: the line-at-a-time state machine driving the two.

pub mod commenter;
pub mod error;
pub mod parser;
pub mod qualifier;

pub use commenter::Commenter;
pub use error::{Error, Result};
pub use parser::{Block, BlockAttrs, BlockState, find_block_start, parse_blocks};
pub use qualifier::{Qualifier, Qualities, qualify};

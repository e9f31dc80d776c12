//! Shareable build links.
//!
//! A *build* is the sparse, URL-safe form of a selection. This module turns
//! a [`SelectionState`](crate::selection::SelectionState) into query
//! parameters and back, keeps a live link patched as the shopper edits, and
//! copies the result to a clipboard.
//!
//! # Architecture
//!
//! - **Codec**: `encode` writes only picked fields; `decode` resolves every
//!   field against the product and skips the ones that no longer exist
//! - **Hydration**: defaults first, then the link overlay in one pass
//! - **Live link**: per-key patches, foreign parameters preserved
//! - **Clipboard**: bounded, non-retrying writes reported as a result
//!
//! # Example
//!
//! ```ignore
//! use ringbuilder::build::{Build, encode};
//! use ringbuilder::selection::SelectionState;
//!
//! let build = Build::from_query("metal=Platinum&carat=2ct");
//! let hydration = SelectionState::hydrate(product, &build);
//!
//! for skipped in &hydration.skipped {
//!     println!("ignored {}={}", skipped.key, skipped.value);
//! }
//!
//! let query = encode(product, &hydration.state).to_query();
//! ```

mod clipboard;
mod codec;
mod link;

pub use clipboard::{write_with_timeout, Clipboard, ClipboardTool, MemoryClipboard, SystemClipboard};
pub use codec::{decode, encode, Build, Decoded, Hydration, LinkField, SkipReason, SkippedField};
pub(crate) use codec::flag_value;
pub use link::LiveLink;

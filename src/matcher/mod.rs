//! Target matching for encoded public keys.
//!
//! A target matches when the encoded key (scheme prefix removed):
//! - starts with it, or
//! - ends with it, when trailing matches are enabled

mod target;

pub use target::{TargetKind, TargetSet};

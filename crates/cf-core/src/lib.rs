//! # cf-core
//!
//! Shared building blocks for the random C program finder.
//!
//! | Module | Provides |
//! |--------|----------|
//! | `charset` | Character classes candidates are drawn from |
//! | `template` | The fixed C program a candidate is embedded into |
//! | `space` | Search-space size and time estimates |
//!
//! Nothing here touches the filesystem or spawns processes; that lives in
//! `cf-finder`.

pub mod charset;
pub mod error;
pub mod space;
pub mod template;

pub use charset::{Charset, CharsetOptions};
pub use error::CoreError;
pub use space::{combinations, format_large_number, format_time_estimate};
pub use template::{embed, extract, C_TEMPLATE_PREFIX, C_TEMPLATE_SUFFIX};

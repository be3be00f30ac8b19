//! Redirect resolution subsystem.
//!
//! # Data Flow
//! ```text
//! Request path ("/team/eng")
//!     → matcher.rs (normalize, split, wildcard candidates)
//!     → router.rs (exact probe, then wildcard probes, one snapshot)
//!     → template.rs (fill the destination's wildcard slot)
//!     → Return: Redirect or NotFound
//! ```
//!
//! # Design Decisions
//! - Exact keys always win over wildcard keys
//! - Leftmost wildcard position wins among wildcard keys
//! - One wildcard token per key, one substitution per destination
//! - Read-only: the resolver never writes to the store

pub mod matcher;
pub mod router;
pub mod template;

pub use matcher::{trim_trailing_slash, PathSegments, WildcardKey, WILDCARD_TOKEN};
pub use router::{Redirect, Resolution, Resolver, WildcardMatch};
pub use template::DestinationTemplate;

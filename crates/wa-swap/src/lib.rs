//! Per-request widget area swapping.
//!
//! This crate provides:
//! - [`SwapCoordinator`]: Request-scoped memoization, content list rewriting
//!   and preview-mode presence masking
//! - [`RequestHost`] / [`AreaRegistry`]: The host collaborators it consumes
//! - [`MemoryHost`]: In-memory host (behind the `memory` feature flag)
//!
//! # Request flow
//!
//! The host creates one coordinator per render request and calls its hooks
//! in the host's callback order:
//!
//! 1. [`SwapCoordinator::swap_widgets`] from the content list pipeline
//! 2. [`SwapCoordinator::hide_on_presence`] / [`SwapCoordinator::restore_on_presence`]
//!    around presence queries while an editor is active
//! 3. [`SwapCoordinator::prepare_for_editor`] before the response is emitted
//!
//! Nothing here fails. An area without a decision keeps its default content.

mod coordinator;
mod host;
#[cfg(any(test, feature = "memory"))]
mod memory;

pub use coordinator::{AreaState, PresenceQuery, RenderSurface, SwapCoordinator, SwapOptions};
pub use host::{AreaRegistry, ContentLists, RegistryEntry, RequestHost, SwapMap, TargetArea};
#[cfg(any(test, feature = "memory"))]
pub use memory::MemoryHost;

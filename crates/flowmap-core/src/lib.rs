//! flowmap core: an interactive decision-tree map.
//!
//! Navigation over a branching content graph, order-only node layout, and a
//! pan/zoom viewport driven by pointer, wheel and pinch gestures. Nothing in
//! here touches a display; hosts render the [`Scene`] produced by
//! [`FlowMap::render`].

// Re-exports from flowmap-types (foundation types).
pub use flowmap_types::config;
pub use flowmap_types::error;
pub use flowmap_types::geometry;
pub use flowmap_types::input;
pub use flowmap_types::text;

pub mod gesture;
pub mod graph;
pub mod layout;
pub mod nav;
pub mod route;
pub mod scene;
pub mod session;
pub mod strings;
pub mod viewport;

#[cfg(test)]
pub(crate) mod test_utils;

pub use graph::{ContentGraph, FlowGraph, NodeId};
pub use nav::{Choice, NavError, Navigator};
pub use scene::Scene;
pub use session::FlowMap;
pub use strings::{Strings, TextKey};
pub use viewport::{View, Viewport, ViewportAction};

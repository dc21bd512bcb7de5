//! Flutter-facing bindings for the farm visit survey core.

pub mod api;

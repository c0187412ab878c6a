//! Provide skeletal asset data for the animation pipeline.
//!
//! This library provides a flat node table structured upon GLTF, together
//! with skins and keyframed animations referencing it by index, and a GLTF
//! loader extracting exactly those tables. Everything here is loaded once and
//! treated as read-only afterwards.
//!
pub mod animation;
/// Model loaders
pub mod loader;
pub mod model;
pub mod node;
pub mod scene;
pub mod skin;

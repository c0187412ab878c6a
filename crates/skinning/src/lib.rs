//! Skeletal animation pipeline.
//!
//! Turns a [`ModelAsset`](skinning_asset::model::ModelAsset) and a render time
//! into one joint matrix per skin joint, ready to be uploaded as a shader
//! uniform array. The stages run in order on every update: the clock maps
//! render time to animation time, the evaluator samples channels into local
//! transforms, the resolver accumulates global transforms down the node tree,
//! and the joint builder multiplies them with the inverse bind matrices.
//!
//! [`Animator`](animator::Animator) wires the stages together.
pub mod animation;
pub mod animator;
pub mod clock;
pub mod error;
pub mod interpolate;
pub mod joint;
pub mod keyframe;
pub mod transform;
pub mod uniform;

pub use skinning_asset as asset;

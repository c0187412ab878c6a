use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use skinning_asset::model::ModelError;

use crate::clock::ClockError;

/// Failure of a single animation update. These mean the asset does not match
/// what the pipeline was set up with, and the update is aborted.
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// animation, animation count
    AnimationNotFound(usize, usize),
    /// skin, skin count
    SkinNotFound(usize, usize),
    /// channel, target node, node count
    ChannelTargetOutOfRange(usize, usize, usize),
    /// channel, sampler, sampler count
    ChannelSamplerOutOfRange(usize, usize, usize),
    /// joint, node, node count
    JointOutOfRange(usize, usize, usize),
    /// joints, inverse bind matrices
    JointCountMismatch(usize, usize),
    /// joints, limit
    TooManyJoints(usize, usize),
}

impl Display for AnimationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AnimationError::AnimationNotFound(index, count) => write!(
                f,
                "Animation #{} not found, model has {} animations",
                index, count
            ),
            AnimationError::SkinNotFound(index, count) => {
                write!(f, "Skin #{} not found, model has {} skins", index, count)
            }
            AnimationError::ChannelTargetOutOfRange(channel, target, count) => write!(
                f,
                "Channel #{} targets node #{}, but there are only {} nodes",
                channel, target, count
            ),
            AnimationError::ChannelSamplerOutOfRange(channel, sampler, count) => write!(
                f,
                "Channel #{} uses sampler #{}, but there are only {} samplers",
                channel, sampler, count
            ),
            AnimationError::JointOutOfRange(joint, node, count) => write!(
                f,
                "Joint #{} is node #{}, but there are only {} nodes",
                joint, node, count
            ),
            AnimationError::JointCountMismatch(joints, matrices) => write!(
                f,
                "{} joints but {} inverse bind matrices",
                joints, matrices
            ),
            AnimationError::TooManyJoints(joints, limit) => {
                write!(f, "{} joints exceed the limit of {}", joints, limit)
            }
        }
    }
}

impl Error for AnimationError {}

/// Failure to set up an [`Animator`](crate::animator::Animator).
#[derive(Debug, Clone, PartialEq)]
pub enum AnimatorError {
    Model(ModelError),
    Clock(ClockError),
    Animation(AnimationError),
}

impl Display for AnimatorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AnimatorError::Model(error) => write!(f, "Bad model: {}", error),
            AnimatorError::Clock(error) => write!(f, "Bad clock config: {}", error),
            AnimatorError::Animation(error) => write!(f, "Bad bind pose: {}", error),
        }
    }
}

impl Error for AnimatorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AnimatorError::Model(error) => Some(error),
            AnimatorError::Clock(error) => Some(error),
            AnimatorError::Animation(error) => Some(error),
        }
    }
}

impl From<ModelError> for AnimatorError {
    fn from(value: ModelError) -> Self {
        Self::Model(value)
    }
}

impl From<ClockError> for AnimatorError {
    fn from(value: ClockError) -> Self {
        Self::Clock(value)
    }
}

impl From<AnimationError> for AnimatorError {
    fn from(value: AnimationError) -> Self {
        Self::Animation(value)
    }
}

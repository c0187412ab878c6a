use std::fmt::{self, Display, Formatter};

use glam::{Vec3, Vec4};

/// Node property driven by an animation channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnimationProperty {
    Translation,
    Rotation,
    Scale,
}

impl AnimationProperty {
    /// Number of components a keyframe value of this property has.
    pub fn components(&self) -> usize {
        match self {
            AnimationProperty::Translation | AnimationProperty::Scale => 3,
            AnimationProperty::Rotation => 4,
        }
    }
}

impl Display for AnimationProperty {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AnimationProperty::Translation => write!(f, "translation"),
            AnimationProperty::Rotation => write!(f, "rotation"),
            AnimationProperty::Scale => write!(f, "scale"),
        }
    }
}

/// How a sampler blends between keyframes.
///
/// Linear samplers lerp vectors and slerp rotations, step samplers hold the
/// earlier keyframe. Cubic spline samplers store three values per keyframe,
/// in-tangent, value and out-tangent, in the sampler output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Interpolation {
    #[default]
    Linear,
    Step,
    CubicSpline,
}

impl Interpolation {
    /// Number of output values stored for each keyframe.
    pub fn values_per_keyframe(&self) -> usize {
        match self {
            Interpolation::Linear | Interpolation::Step => 1,
            Interpolation::CubicSpline => 3,
        }
    }
}

/// Keyframe values of a sampler.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SamplerOutput {
    Vec3(Vec<Vec3>),
    /// Rotations, stored as `x, y, z, w`.
    Vec4(Vec<Vec4>),
    /// Values of a shape the evaluator cannot apply. Channels using such a
    /// sampler contribute no motion.
    Unsupported { components: usize, count: usize },
}

impl SamplerOutput {
    pub fn len(&self) -> usize {
        match self {
            SamplerOutput::Vec3(values) => values.len(),
            SamplerOutput::Vec4(values) => values.len(),
            SamplerOutput::Unsupported { count, .. } => *count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn components(&self) -> usize {
        match self {
            SamplerOutput::Vec3(_) => 3,
            SamplerOutput::Vec4(_) => 4,
            SamplerOutput::Unsupported { components, .. } => *components,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationSamplerAsset {
    /// Keyframe timestamps in seconds, non-decreasing.
    pub times: Vec<f32>,
    pub output: SamplerOutput,
    pub interpolation: Interpolation,
}

impl AnimationSamplerAsset {
    pub fn vec3(times: Vec<f32>, values: Vec<Vec3>) -> Self {
        Self {
            times,
            output: SamplerOutput::Vec3(values),
            interpolation: Interpolation::Linear,
        }
    }

    pub fn vec4(times: Vec<f32>, values: Vec<Vec4>) -> Self {
        Self {
            times,
            output: SamplerOutput::Vec4(values),
            interpolation: Interpolation::Linear,
        }
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Number of keyframes the output holds values for.
    pub fn keyframe_count(&self) -> usize {
        self.output.len() / self.interpolation.values_per_keyframe()
    }

    /// Timestamp of the last keyframe, or zero without keyframes.
    pub fn duration(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationChannelAsset {
    /// Index of the animated node.
    pub target: usize,
    pub property: AnimationProperty,
    /// Index into [`AnimationAsset::samplers`].
    pub sampler: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationAsset {
    pub name: Option<String>,
    pub samplers: Vec<AnimationSamplerAsset>,
    pub channels: Vec<AnimationChannelAsset>,
}

impl AnimationAsset {
    /// Length of the longest sampler in seconds.
    pub fn duration(&self) -> f32 {
        self.samplers
            .iter()
            .map(AnimationSamplerAsset::duration)
            .fold(0.0, f32::max)
    }

    pub fn sampler(&self, channel: &AnimationChannelAsset) -> Option<&AnimationSamplerAsset> {
        self.samplers.get(channel.sampler)
    }
}

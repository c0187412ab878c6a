use glam::{Mat4, Quat};
use log::{trace, warn};
use skinning_asset::{
    animation::{
        AnimationAsset, AnimationProperty, AnimationSamplerAsset, Interpolation, SamplerOutput,
    },
    model::ModelAsset,
    node::DecomposedTransform,
};

use crate::{
    error::AnimationError,
    interpolate::Interpolate,
    keyframe::{find_keyframe, wrap_time},
    transform::compute_local_transforms,
};

/// Sample `values` at `time`, wrapping by the sampler's own duration.
///
/// Cubic spline samplers store in-tangent, value and out-tangent for each
/// keyframe, the other modes store one value.
fn sample<V: Copy, T: Interpolate>(
    times: &[f32],
    values: &[V],
    interpolation: Interpolation,
    time: f32,
    mapper: impl Fn(V) -> T,
) -> Option<T> {
    let duration = times.last().copied().unwrap_or(0.0);
    let time = wrap_time(time, duration);
    let keyframe = match find_keyframe(times, time) {
        Some(keyframe) => keyframe,
        // A single keyframe holds its value
        None => {
            let value = match interpolation {
                Interpolation::CubicSpline => values.get(1),
                _ => values.first(),
            };
            return value.copied().map(mapper);
        }
    };
    match interpolation {
        Interpolation::Linear => {
            let current = mapper(*values.get(keyframe.index)?);
            let next = mapper(*values.get(keyframe.next)?);
            Some(T::interpolate(current, next, keyframe.factor))
        }
        Interpolation::Step => {
            let index = if keyframe.factor >= 1.0 {
                keyframe.next
            } else {
                keyframe.index
            };
            values.get(index).copied().map(mapper)
        }
        Interpolation::CubicSpline => {
            let (index, next) = (keyframe.index * 3, keyframe.next * 3);
            let value = mapper(*values.get(index + 1)?);
            let out_tangent = mapper(*values.get(index + 2)?);
            let next_in_tangent = mapper(*values.get(next)?);
            let next_value = mapper(*values.get(next + 1)?);
            let delta = times[keyframe.next] - times[keyframe.index];
            Some(T::cubic_spline(
                value,
                out_tangent,
                next_value,
                next_in_tangent,
                keyframe.factor,
                delta,
            ))
        }
    }
}

fn output_matches(property: AnimationProperty, output: &SamplerOutput) -> bool {
    matches!(
        (property, output),
        (AnimationProperty::Translation, SamplerOutput::Vec3(_))
            | (AnimationProperty::Scale, SamplerOutput::Vec3(_))
            | (AnimationProperty::Rotation, SamplerOutput::Vec4(_))
    )
}

/// Channels of `animation` whose sampler output can't drive their property.
///
/// Channels with an out of range sampler are left to [`AnimationEvaluator::evaluate`].
pub fn unsupported_channels(animation: &AnimationAsset) -> Vec<usize> {
    animation
        .channels
        .iter()
        .enumerate()
        .filter(|(_, channel)| {
            animation
                .sampler(channel)
                .is_some_and(|sampler| !output_matches(channel.property, &sampler.output))
        })
        .map(|(index, _)| index)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChannelOutcome {
    Applied,
    NoKeyframes,
    Unsupported,
}

/// Computes animated local transforms for every node of a model.
///
/// Owns the per-node decomposed pose and the local transform buffer. Both are
/// rebuilt from the rest pose on every call, so evaluating the same time twice
/// yields the same matrices.
#[derive(Debug, Clone)]
pub struct AnimationEvaluator {
    rest_pose: Vec<DecomposedTransform>,
    rest_locals: Vec<Mat4>,
    pose: Vec<DecomposedTransform>,
    animated: Vec<bool>,
    locals: Vec<Mat4>,
}

impl AnimationEvaluator {
    pub fn new(model: &ModelAsset) -> Self {
        let rest_pose: Vec<DecomposedTransform> =
            model.nodes.iter().map(|node| node.decomposed()).collect();
        let mut rest_locals = Vec::with_capacity(model.nodes.len());
        compute_local_transforms(&model.nodes, &mut rest_locals);
        for (animation_index, animation) in model.animations.iter().enumerate() {
            for channel_index in unsupported_channels(animation) {
                let channel = &animation.channels[channel_index];
                let components = animation
                    .sampler(channel)
                    .map_or(0, |sampler| sampler.output.components());
                warn!(
                    "Animation #{} channel #{} ({} of node #{}) has {}-component output, skipped",
                    animation_index, channel_index, channel.property, channel.target, components
                );
            }
        }
        Self {
            pose: rest_pose.clone(),
            animated: vec![false; rest_pose.len()],
            locals: rest_locals.clone(),
            rest_pose,
            rest_locals,
        }
    }

    /// Local transforms of the last evaluation, or the rest pose before any.
    pub fn locals(&self) -> &[Mat4] {
        &self.locals
    }

    pub fn rest_locals(&self) -> &[Mat4] {
        &self.rest_locals
    }

    /// Evaluate animation `animation_index` of `model` at `time` seconds.
    ///
    /// Nodes driven by at least one channel get `T * R * S` rebuilt from their
    /// animated components. Every other node keeps its rest-pose local
    /// transform unchanged.
    pub fn evaluate(
        &mut self,
        model: &ModelAsset,
        animation_index: usize,
        time: f32,
    ) -> Result<&[Mat4], AnimationError> {
        let animation = model.animations.get(animation_index).ok_or(
            AnimationError::AnimationNotFound(animation_index, model.animations.len()),
        )?;
        trace!("Evaluate animation #{} at {:#.03}s", animation_index, time);
        self.apply(animation, time)?;
        Ok(&self.locals)
    }

    fn apply(&mut self, animation: &AnimationAsset, time: f32) -> Result<(), AnimationError> {
        let node_count = self.rest_pose.len();
        self.pose.clone_from(&self.rest_pose);
        self.animated.iter_mut().for_each(|animated| *animated = false);

        for (channel_index, channel) in animation.channels.iter().enumerate() {
            if channel.target >= node_count {
                return Err(AnimationError::ChannelTargetOutOfRange(
                    channel_index,
                    channel.target,
                    node_count,
                ));
            }
            let sampler = animation.sampler(channel).ok_or(
                AnimationError::ChannelSamplerOutOfRange(
                    channel_index,
                    channel.sampler,
                    animation.samplers.len(),
                ),
            )?;
            match Self::apply_channel(
                &mut self.pose[channel.target],
                channel.property,
                sampler,
                time,
            ) {
                ChannelOutcome::Applied => self.animated[channel.target] = true,
                ChannelOutcome::NoKeyframes => (),
                ChannelOutcome::Unsupported => {
                    trace!("Skip channel #{}", channel_index)
                }
            }
        }

        for (index, local) in self.locals.iter_mut().enumerate() {
            *local = if self.animated[index] {
                self.pose[index].matrix()
            } else {
                self.rest_locals[index]
            };
        }
        Ok(())
    }

    /// Apply one channel to `pose`, overwriting the property it drives.
    fn apply_channel(
        pose: &mut DecomposedTransform,
        property: AnimationProperty,
        sampler: &AnimationSamplerAsset,
        time: f32,
    ) -> ChannelOutcome {
        let times = sampler.times.as_slice();
        let interpolation = sampler.interpolation;
        let applied = match (property, &sampler.output) {
            (AnimationProperty::Translation, SamplerOutput::Vec3(values)) => {
                sample(times, values, interpolation, time, |value| value)
                    .map(|value| pose.translation = value)
            }
            (AnimationProperty::Scale, SamplerOutput::Vec3(values)) => {
                sample(times, values, interpolation, time, |value| value)
                    .map(|value| pose.scale = value)
            }
            // Vec4 keeps x, y, z, w, the same layout as Quat
            (AnimationProperty::Rotation, SamplerOutput::Vec4(values)) => {
                sample(times, values, interpolation, time, Quat::from_vec4)
                    .map(|value| pose.rotation = value)
            }
            _ => return ChannelOutcome::Unsupported,
        };
        match applied {
            Some(()) => ChannelOutcome::Applied,
            None => ChannelOutcome::NoKeyframes,
        }
    }
}

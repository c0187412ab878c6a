use std::sync::Arc;

use glam::Mat4;
use log::{debug, trace};
use skinning_asset::model::ModelAsset;

use crate::{
    animation::AnimationEvaluator,
    clock::{AnimationClock, LoopWindow, DEFAULT_LOOP_END, DEFAULT_LOOP_START},
    error::{AnimationError, AnimatorError},
    joint::JointPalette,
    transform::compute_global_transforms,
};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct AnimatorConfig {
    pub loop_start: f32,
    pub loop_end: f32,
    pub looping: bool,
    pub playback_speed: f32,
    /// Index of the animation to play
    pub animation: usize,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            loop_start: DEFAULT_LOOP_START,
            loop_end: DEFAULT_LOOP_END,
            looping: true,
            playback_speed: 1.0,
            animation: 0,
        }
    }
}

/// Drives one model through the animation pipeline.
///
/// Each [`update`](Animator::update) maps the render time through the clock,
/// evaluates the selected animation into local transforms, resolves global
/// transforms from the roots of the default scene (every parentless node when
/// the model has none) and rebuilds the joint matrices of every skin. Buffers
/// are kept between updates and overwritten wholesale.
#[derive(Debug)]
pub struct Animator {
    model: Arc<ModelAsset>,
    clock: AnimationClock,
    evaluator: AnimationEvaluator,
    animation: usize,
    roots: Vec<usize>,
    globals: Vec<Mat4>,
    palette: JointPalette,
}

impl Animator {
    pub fn new(model: Arc<ModelAsset>, config: &AnimatorConfig) -> Result<Self, AnimatorError> {
        model.validate()?;

        let mut clock = AnimationClock::bounded(LoopWindow::new(
            config.loop_start,
            config.loop_end,
        )?);
        clock.enable_looping(config.looping);
        clock.set_playback_speed(config.playback_speed)?;

        if !model.animations.is_empty() && config.animation >= model.animations.len() {
            return Err(AnimationError::AnimationNotFound(
                config.animation,
                model.animations.len(),
            )
            .into());
        }

        let evaluator = AnimationEvaluator::new(&model);
        let roots = model.scene_roots();
        let mut globals = Vec::with_capacity(model.nodes.len());
        compute_global_transforms(
            &model.nodes,
            &roots,
            Mat4::IDENTITY,
            evaluator.rest_locals(),
            &mut globals,
        );
        let mut palette = JointPalette::new(model.skins.len());
        palette.update(&model.skins, &globals)?;

        debug!(
            "Animator ready: {} nodes, {} roots, {} skins, {} animations",
            model.nodes.len(),
            roots.len(),
            model.skins.len(),
            model.animations.len()
        );

        Ok(Self {
            model,
            clock,
            evaluator,
            animation: config.animation,
            roots,
            globals,
            palette,
        })
    }

    /// Advance the pipeline to render time `time` in seconds.
    ///
    /// Models without animations keep their bind-pose palette.
    pub fn update(&mut self, time: f32) -> Result<(), AnimationError> {
        if self.model.animations.is_empty() {
            return Ok(());
        }
        let animation_time = self.clock.sample_time(time);
        trace!("Render time {:#.03}s -> animation time {:#.03}s", time, animation_time);

        let locals = self
            .evaluator
            .evaluate(&self.model, self.animation, animation_time)?;
        compute_global_transforms(
            &self.model.nodes,
            &self.roots,
            Mat4::IDENTITY,
            locals,
            &mut self.globals,
        );
        self.palette.update(&self.model.skins, &self.globals)
    }

    pub fn model(&self) -> &Arc<ModelAsset> {
        &self.model
    }

    pub fn joint_matrices(&self, skin: usize) -> Result<&[Mat4], AnimationError> {
        self.palette
            .joints(skin)
            .ok_or(AnimationError::SkinNotFound(skin, self.palette.skin_count()))
    }

    pub fn palette(&self) -> &JointPalette {
        &self.palette
    }

    pub fn global_transforms(&self) -> &[Mat4] {
        &self.globals
    }

    pub fn local_transforms(&self) -> &[Mat4] {
        self.evaluator.locals()
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut AnimationClock {
        &mut self.clock
    }

    pub fn animation(&self) -> usize {
        self.animation
    }

    /// Select the animation played from the next update on.
    pub fn set_animation(&mut self, index: usize) -> Result<(), AnimationError> {
        if index >= self.model.animations.len() {
            return Err(AnimationError::AnimationNotFound(
                index,
                self.model.animations.len(),
            ));
        }
        self.animation = index;
        Ok(())
    }

    /// Duration of the selected animation, `None` for models without animations.
    pub fn animation_duration(&self) -> Option<f32> {
        self.model
            .animations
            .get(self.animation)
            .map(|animation| animation.duration())
    }
}

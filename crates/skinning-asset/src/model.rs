use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use crate::{
    animation::{AnimationAsset, SamplerOutput},
    node::NodeAsset,
    scene::SceneAsset,
    skin::SkinAsset,
};

#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// node, child, node count
    BadChildIndex(usize, usize, usize),
    /// child, first parent, second parent
    MultipleParents(usize, usize, usize),
    /// skin, joints, inverse bind matrices
    SkinJointCountMismatch(usize, usize, usize),
    /// skin, joint, node count
    BadJointIndex(usize, usize, usize),
    /// skin, skeleton, node count
    BadSkeletonIndex(usize, usize, usize),
    /// node, skin, skin count
    BadNodeSkinIndex(usize, usize, usize),
    /// animation, channel, target, node count
    BadChannelTarget(usize, usize, usize, usize),
    /// animation, channel, sampler, sampler count
    BadChannelSampler(usize, usize, usize, usize),
    /// animation, sampler, keyframe
    DecreasingKeyframeTime(usize, usize, usize),
    /// animation, sampler, times, outputs
    KeyframeCountMismatch(usize, usize, usize, usize),
    /// scene, root, node count
    BadSceneRoot(usize, usize, usize),
    /// scene, root, parent
    SceneRootHasParent(usize, usize, usize),
    /// default scene, scene count
    BadDefaultScene(usize, usize),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::BadChildIndex(node, child, count) => write!(
                f,
                "Node #{} references child #{}, but there are only {} nodes",
                node, child, count
            ),
            ModelError::MultipleParents(child, first, second) => write!(
                f,
                "Node #{} has more than one parent: #{} and #{}",
                child, first, second
            ),
            ModelError::SkinJointCountMismatch(skin, joints, matrices) => write!(
                f,
                "Skin #{} has {} joints but {} inverse bind matrices",
                skin, joints, matrices
            ),
            ModelError::BadJointIndex(skin, joint, count) => write!(
                f,
                "Skin #{} references joint node #{}, but there are only {} nodes",
                skin, joint, count
            ),
            ModelError::BadSkeletonIndex(skin, skeleton, count) => write!(
                f,
                "Skin #{} references skeleton node #{}, but there are only {} nodes",
                skin, skeleton, count
            ),
            ModelError::BadNodeSkinIndex(node, skin, count) => write!(
                f,
                "Node #{} references skin #{}, but there are only {} skins",
                node, skin, count
            ),
            ModelError::BadChannelTarget(animation, channel, target, count) => write!(
                f,
                "Channel #{} of animation #{} targets node #{}, but there are only {} nodes",
                channel, animation, target, count
            ),
            ModelError::BadChannelSampler(animation, channel, sampler, count) => write!(
                f,
                "Channel #{} of animation #{} uses sampler #{}, but there are only {} samplers",
                channel, animation, sampler, count
            ),
            ModelError::DecreasingKeyframeTime(animation, sampler, keyframe) => write!(
                f,
                "Sampler #{} of animation #{} has decreasing time at keyframe #{}",
                sampler, animation, keyframe
            ),
            ModelError::KeyframeCountMismatch(animation, sampler, times, outputs) => write!(
                f,
                "Sampler #{} of animation #{} has {} timestamps but {} values",
                sampler, animation, times, outputs
            ),
            ModelError::BadSceneRoot(scene, root, count) => write!(
                f,
                "Scene #{} references root node #{}, but there are only {} nodes",
                scene, root, count
            ),
            ModelError::SceneRootHasParent(scene, root, parent) => write!(
                f,
                "Scene #{} uses node #{} as root, but it is a child of node #{}",
                scene, root, parent
            ),
            ModelError::BadDefaultScene(scene, count) => write!(
                f,
                "Default scene is #{}, but there are only {} scenes",
                scene, count
            ),
        }
    }
}

impl Error for ModelError {}

/// The node, skin and animation tables of a loaded model.
///
/// Loaded once and read-only afterwards. Every cross reference is an index
/// into one of the tables, see [`ModelAsset::validate`].
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelAsset {
    pub nodes: Vec<NodeAsset>,
    pub skins: Vec<SkinAsset>,
    pub animations: Vec<AnimationAsset>,
    pub scenes: Vec<SceneAsset>,
    pub default_scene: Option<usize>,
}

impl ModelAsset {
    /// Check every structural invariant the animation pipeline relies on.
    pub fn validate(&self) -> Result<(), ModelError> {
        let node_count = self.nodes.len();

        let mut parents: Vec<Option<usize>> = vec![None; node_count];
        for (index, node) in self.nodes.iter().enumerate() {
            for &child in &node.children {
                let Some(parent) = parents.get_mut(child) else {
                    return Err(ModelError::BadChildIndex(index, child, node_count));
                };
                if let Some(first) = parent {
                    return Err(ModelError::MultipleParents(child, *first, index));
                }
                *parent = Some(index);
            }
            if let Some(skin) = node.skin {
                if skin >= self.skins.len() {
                    return Err(ModelError::BadNodeSkinIndex(index, skin, self.skins.len()));
                }
            }
        }

        for (index, skin) in self.skins.iter().enumerate() {
            if skin.joints.len() != skin.inverse_bind_matrices.len() {
                return Err(ModelError::SkinJointCountMismatch(
                    index,
                    skin.joints.len(),
                    skin.inverse_bind_matrices.len(),
                ));
            }
            if let Some(&joint) = skin.joints.iter().find(|&&joint| joint >= node_count) {
                return Err(ModelError::BadJointIndex(index, joint, node_count));
            }
            if let Some(skeleton) = skin.skeleton.filter(|&skeleton| skeleton >= node_count) {
                return Err(ModelError::BadSkeletonIndex(index, skeleton, node_count));
            }
        }

        for (animation_index, animation) in self.animations.iter().enumerate() {
            for (channel_index, channel) in animation.channels.iter().enumerate() {
                if channel.target >= node_count {
                    return Err(ModelError::BadChannelTarget(
                        animation_index,
                        channel_index,
                        channel.target,
                        node_count,
                    ));
                }
                if channel.sampler >= animation.samplers.len() {
                    return Err(ModelError::BadChannelSampler(
                        animation_index,
                        channel_index,
                        channel.sampler,
                        animation.samplers.len(),
                    ));
                }
            }
            for (sampler_index, sampler) in animation.samplers.iter().enumerate() {
                if let Some(keyframe) = sampler
                    .times
                    .windows(2)
                    .position(|pair| pair[1] < pair[0])
                {
                    return Err(ModelError::DecreasingKeyframeTime(
                        animation_index,
                        sampler_index,
                        keyframe + 1,
                    ));
                }
                let supported = !matches!(sampler.output, SamplerOutput::Unsupported { .. });
                let expected = sampler.times.len() * sampler.interpolation.values_per_keyframe();
                if supported && expected != sampler.output.len() {
                    return Err(ModelError::KeyframeCountMismatch(
                        animation_index,
                        sampler_index,
                        sampler.times.len(),
                        sampler.output.len(),
                    ));
                }
            }
        }

        for (scene_index, scene) in self.scenes.iter().enumerate() {
            if let Some(&root) = scene.roots.iter().find(|&&root| root >= node_count) {
                return Err(ModelError::BadSceneRoot(scene_index, root, node_count));
            }
            if let Some((root, parent)) = scene
                .roots
                .iter()
                .find_map(|&root| parents[root].map(|parent| (root, parent)))
            {
                return Err(ModelError::SceneRootHasParent(scene_index, root, parent));
            }
        }
        if let Some(scene) = self.default_scene.filter(|&scene| scene >= self.scenes.len()) {
            return Err(ModelError::BadDefaultScene(scene, self.scenes.len()));
        }

        Ok(())
    }

    /// Parent of every node. Assumes child indices are in range.
    pub fn parents(&self) -> Vec<Option<usize>> {
        let mut parents = vec![None; self.nodes.len()];
        for (index, node) in self.nodes.iter().enumerate() {
            for &child in &node.children {
                if let Some(parent) = parents.get_mut(child) {
                    *parent = Some(index);
                }
            }
        }
        parents
    }

    /// Nodes without a parent, in table order.
    pub fn roots(&self) -> Vec<usize> {
        self.parents()
            .into_iter()
            .enumerate()
            .filter(|(_, parent)| parent.is_none())
            .map(|(index, _)| index)
            .collect()
    }

    /// Roots of the default scene, or every parentless node for models
    /// without one.
    pub fn scene_roots(&self) -> Vec<usize> {
        match self.default_scene.and_then(|scene| self.scenes.get(scene)) {
            Some(scene) => scene.roots.clone(),
            None => self.roots(),
        }
    }
}

#[cfg(test)]
mod test {
    use glam::{Mat4, Vec3};

    use crate::{
        animation::{
            AnimationAsset, AnimationChannelAsset, AnimationProperty, AnimationSamplerAsset,
            Interpolation,
        },
        node::NodeAsset,
        scene::SceneAsset,
        skin::SkinAsset,
    };

    use super::{ModelAsset, ModelError};

    fn chain() -> ModelAsset {
        ModelAsset {
            nodes: vec![
                NodeAsset::default().with_children([1]),
                NodeAsset::default().with_children([2]),
                NodeAsset::default(),
                NodeAsset::default(),
            ],
            skins: vec![SkinAsset::with_identity_bind(vec![0, 1, 2])],
            ..Default::default()
        }
    }

    fn translation_animation(target: usize, sampler: usize) -> AnimationAsset {
        AnimationAsset {
            name: None,
            samplers: vec![AnimationSamplerAsset::vec3(
                vec![0.0, 1.0],
                vec![Vec3::ZERO, Vec3::X],
            )],
            channels: vec![AnimationChannelAsset {
                target,
                property: AnimationProperty::Translation,
                sampler,
            }],
        }
    }

    #[test]
    fn test_valid_model() {
        let mut model = chain();
        model.animations.push(translation_animation(2, 0));
        assert_eq!(model.validate(), Ok(()));
        assert_eq!(model.roots(), vec![0, 3]);
        assert_eq!(model.parents(), vec![None, Some(0), Some(1), None]);
    }

    #[test]
    fn test_dangling_child() {
        let mut model = chain();
        model.nodes[2].children.push(9);
        assert_eq!(model.validate(), Err(ModelError::BadChildIndex(2, 9, 4)));
    }

    #[test]
    fn test_shared_child() {
        let mut model = chain();
        model.nodes[3].children.push(2);
        assert_eq!(model.validate(), Err(ModelError::MultipleParents(2, 1, 3)));
    }

    #[test]
    fn test_skin_count_mismatch() {
        let mut model = chain();
        model.skins[0].inverse_bind_matrices.push(Mat4::IDENTITY);
        assert_eq!(
            model.validate(),
            Err(ModelError::SkinJointCountMismatch(0, 3, 4))
        );
    }

    #[test]
    fn test_bad_joint() {
        let mut model = chain();
        model.skins[0] = SkinAsset::with_identity_bind(vec![0, 7]);
        assert_eq!(model.validate(), Err(ModelError::BadJointIndex(0, 7, 4)));
    }

    #[test]
    fn test_bad_channel() {
        let mut model = chain();
        model.animations.push(translation_animation(4, 0));
        assert_eq!(
            model.validate(),
            Err(ModelError::BadChannelTarget(0, 0, 4, 4))
        );

        let mut model = chain();
        model.animations.push(translation_animation(0, 1));
        assert_eq!(
            model.validate(),
            Err(ModelError::BadChannelSampler(0, 0, 1, 1))
        );
    }

    #[test]
    fn test_decreasing_time() {
        let mut model = chain();
        let mut animation = translation_animation(0, 0);
        animation.samplers[0].times = vec![1.0, 0.5];
        model.animations.push(animation);
        assert_eq!(
            model.validate(),
            Err(ModelError::DecreasingKeyframeTime(0, 0, 1))
        );
    }

    #[test]
    fn test_keyframe_count_mismatch() {
        let mut model = chain();
        let mut animation = translation_animation(0, 0);
        animation.samplers[0].times.push(2.0);
        model.animations.push(animation);
        assert_eq!(
            model.validate(),
            Err(ModelError::KeyframeCountMismatch(0, 0, 3, 2))
        );
    }

    #[test]
    fn test_cubic_spline_stores_three_values_per_keyframe() {
        let mut model = chain();
        let mut animation = translation_animation(0, 0);
        animation.samplers[0] = AnimationSamplerAsset::vec3(vec![0.0, 1.0], vec![Vec3::ZERO; 6])
            .with_interpolation(Interpolation::CubicSpline);
        model.animations.push(animation);
        assert_eq!(model.validate(), Ok(()));

        model.animations[0].samplers[0].interpolation = Interpolation::Linear;
        assert_eq!(
            model.validate(),
            Err(ModelError::KeyframeCountMismatch(0, 0, 2, 6))
        );
    }

    #[test]
    fn test_scene_roots() {
        let mut model = chain();
        assert_eq!(model.scene_roots(), vec![0, 3]);

        model.scenes.push(SceneAsset {
            name: None,
            roots: vec![3],
        });
        model.default_scene = Some(0);
        assert_eq!(model.validate(), Ok(()));
        assert_eq!(model.scene_roots(), vec![3]);

        model.scenes[0].roots.push(2);
        assert_eq!(
            model.validate(),
            Err(ModelError::SceneRootHasParent(0, 2, 1))
        );

        model.scenes[0].roots.pop();
        model.default_scene = Some(1);
        assert_eq!(model.validate(), Err(ModelError::BadDefaultScene(1, 1)));
    }
}

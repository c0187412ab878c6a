use glam::Mat4;
use log::trace;
use skinning_asset::skin::SkinAsset;

use crate::error::AnimationError;

/// Write the skinning matrix of every joint of `skin` into `joints`.
///
/// `joints[j] = globals[skin.joints[j]] * skin.inverse_bind_matrices[j]`, in
/// the joint order of the skin. The shader indexes this array with the joint
/// attribute of each vertex, so the order must not change.
pub fn build_joint_matrices(
    skin: &SkinAsset,
    globals: &[Mat4],
    joints: &mut Vec<Mat4>,
) -> Result<(), AnimationError> {
    if skin.joints.len() != skin.inverse_bind_matrices.len() {
        return Err(AnimationError::JointCountMismatch(
            skin.joints.len(),
            skin.inverse_bind_matrices.len(),
        ));
    }

    joints.clear();
    for (joint_index, (&node, inverse_bind)) in skin
        .joints
        .iter()
        .zip(&skin.inverse_bind_matrices)
        .enumerate()
    {
        let global = globals.get(node).ok_or(AnimationError::JointOutOfRange(
            joint_index,
            node,
            globals.len(),
        ))?;
        joints.push(*global * *inverse_bind);
    }
    Ok(())
}

/// Joint matrices of every skin of a model.
#[derive(Debug, Clone, Default)]
pub struct JointPalette {
    skins: Vec<Vec<Mat4>>,
}

impl JointPalette {
    pub fn new(skin_count: usize) -> Self {
        Self {
            skins: vec![Vec::new(); skin_count],
        }
    }

    /// Rebuild every skin's matrices from `globals`.
    pub fn update(&mut self, skins: &[SkinAsset], globals: &[Mat4]) -> Result<(), AnimationError> {
        self.skins.resize_with(skins.len(), Vec::new);
        for (index, (skin, joints)) in skins.iter().zip(&mut self.skins).enumerate() {
            build_joint_matrices(skin, globals, joints)?;
            trace!("Skin #{}: {} joint matrices", index, joints.len());
        }
        Ok(())
    }

    pub fn skin_count(&self) -> usize {
        self.skins.len()
    }

    pub fn joints(&self, skin: usize) -> Option<&[Mat4]> {
        self.skins.get(skin).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[Mat4]> {
        self.skins.iter().map(Vec::as_slice)
    }
}

#[cfg(test)]
mod test {
    use glam::{Mat4, Vec3};
    use skinning_asset::skin::SkinAsset;

    use crate::error::AnimationError;

    use super::{build_joint_matrices, JointPalette};

    #[test]
    fn test_identity_joint() {
        let skin = SkinAsset::with_identity_bind(vec![0]);
        let mut joints = Vec::new();
        build_joint_matrices(&skin, &[Mat4::IDENTITY], &mut joints).unwrap();
        assert_eq!(joints, vec![Mat4::IDENTITY]);
    }

    #[test]
    fn test_joint_order_follows_skin() {
        let globals = [
            Mat4::from_translation(Vec3::X),
            Mat4::from_translation(Vec3::Y),
            Mat4::from_translation(Vec3::Z),
        ];
        let skin = SkinAsset {
            joints: vec![2, 0],
            inverse_bind_matrices: vec![
                Mat4::from_translation(-Vec3::Z),
                Mat4::from_translation(-Vec3::X),
            ],
            ..Default::default()
        };
        let mut joints = Vec::new();
        build_joint_matrices(&skin, &globals, &mut joints).unwrap();
        // at rest, each global undoes its own inverse bind
        assert_eq!(joints, vec![Mat4::IDENTITY, Mat4::IDENTITY]);

        let mut palette = JointPalette::new(1);
        palette
            .update(&[skin], &[globals[1], globals[1], globals[0]])
            .unwrap();
        let joints = palette.joints(0).unwrap();
        assert_eq!(
            joints[0].transform_point3(Vec3::ZERO),
            Vec3::new(1.0, 0.0, -1.0)
        );
        assert_eq!(
            joints[1].transform_point3(Vec3::ZERO),
            Vec3::new(-1.0, 1.0, 0.0)
        );
        assert_eq!(palette.joints(1), None);
    }

    #[test]
    fn test_bad_skin() {
        let mut skin = SkinAsset::with_identity_bind(vec![0, 3]);
        let mut joints = Vec::new();
        assert_eq!(
            build_joint_matrices(&skin, &[Mat4::IDENTITY; 2], &mut joints),
            Err(AnimationError::JointOutOfRange(1, 3, 2))
        );
        skin.inverse_bind_matrices.pop();
        assert_eq!(
            build_joint_matrices(&skin, &[Mat4::IDENTITY; 4], &mut joints),
            Err(AnimationError::JointCountMismatch(2, 1))
        );
    }
}

use std::iter;

use bytemuck::cast_slice;
use glam::Mat4;

use crate::error::AnimationError;

pub const MAX_JOINTS: usize = 1024;

/// Joint matrices laid out for a fixed-size shader uniform array.
///
/// Matrices are stored column-major and padded with identity up to
/// [`MAX_JOINTS`], so vertices referencing unused slots stay in place.
#[derive(Debug, Clone)]
pub struct JointsUniformData {
    joint_count: usize,
    items: Vec<[f32; 16]>,
}

impl Default for JointsUniformData {
    fn default() -> Self {
        Self {
            joint_count: 0,
            items: vec![Mat4::IDENTITY.to_cols_array(); MAX_JOINTS],
        }
    }
}

impl JointsUniformData {
    pub fn pack(joints: &[Mat4]) -> Result<Self, AnimationError> {
        let mut data = Self::default();
        data.update(joints)?;
        Ok(data)
    }

    /// Overwrite the packed matrices with `joints`.
    pub fn update(&mut self, joints: &[Mat4]) -> Result<(), AnimationError> {
        if joints.len() > MAX_JOINTS {
            return Err(AnimationError::TooManyJoints(joints.len(), MAX_JOINTS));
        }
        self.items.clear();
        self.items.extend(
            joints
                .iter()
                .map(Mat4::to_cols_array)
                .chain(iter::repeat(Mat4::IDENTITY.to_cols_array()))
                .take(MAX_JOINTS),
        );
        self.joint_count = joints.len();
        Ok(())
    }

    /// Number of joints written by the last update, excluding padding.
    pub fn joint_count(&self) -> usize {
        self.joint_count
    }

    pub fn items(&self) -> &[[f32; 16]] {
        &self.items
    }

    pub fn as_bytes(&self) -> &[u8] {
        cast_slice(&self.items)
    }
}

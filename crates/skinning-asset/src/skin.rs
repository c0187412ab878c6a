use glam::Mat4;

/// Binding between a mesh and a set of joints.
///
/// `joints` and `inverse_bind_matrices` are index-aligned: matrix `j` brings a
/// bind-space vertex into the local space of node `joints[j]`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkinAsset {
    pub name: Option<String>,
    pub joints: Vec<usize>,
    pub inverse_bind_matrices: Vec<Mat4>,
    pub skeleton: Option<usize>,
}

impl SkinAsset {
    /// Create a skin whose inverse bind matrices are all identity.
    pub fn with_identity_bind(joints: Vec<usize>) -> Self {
        let inverse_bind_matrices = vec![Mat4::IDENTITY; joints.len()];
        Self {
            name: None,
            joints,
            inverse_bind_matrices,
            skeleton: None,
        }
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }
}

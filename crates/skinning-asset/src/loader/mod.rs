use glam::{Mat4, Vec3, Vec4};

/// GLTF loader with `gltf` crate.
#[cfg(feature = "gltf")]
pub mod gltf;

#[inline]
fn chunk_vec3(data: &[f32]) -> Vec<Vec3> {
    data.chunks_exact(3).map(Vec3::from_slice).collect()
}

#[inline]
fn chunk_vec4(data: &[f32]) -> Vec<Vec4> {
    data.chunks_exact(4).map(Vec4::from_slice).collect()
}

#[inline]
fn chunk_mat4(data: &[f32]) -> Vec<Mat4> {
    data.chunks_exact(16).map(Mat4::from_cols_slice).collect()
}

#[cfg(test)]
mod test {
    use glam::{Mat4, Vec3, Vec4};

    use super::{chunk_mat4, chunk_vec3, chunk_vec4};

    #[test]
    fn test_chunks() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        assert_eq!(
            chunk_vec3(&data),
            vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)]
        );
        assert_eq!(chunk_mat4(&Mat4::IDENTITY.to_cols_array()), vec![Mat4::IDENTITY]);
        assert_eq!(chunk_vec4(&data), vec![Vec4::new(1.0, 2.0, 3.0, 4.0)]);
    }
}

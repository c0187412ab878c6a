use std::ops::{Add, Mul};

use glam::{Quat, Vec3, Vec4};

/// Interpolation between two keyframe values.
pub trait Interpolate: Copy {
    fn interpolate(a: Self, b: Self, t: f32) -> Self;

    /// Cubic Hermite spline between value `vk` with out-tangent `bk` and value
    /// `vk_1` with in-tangent `ak_1`. `td` is the keyframe delta in seconds.
    fn cubic_spline(vk: Self, bk: Self, vk_1: Self, ak_1: Self, t: f32, td: f32) -> Self;
}

fn hermite<V>(vk: V, bk: V, vk_1: V, ak_1: V, t: f32, td: f32) -> V
where
    V: Copy + Add<Output = V> + Mul<f32, Output = V>,
{
    let t2 = t * t;
    let t3 = t2 * t;
    vk * (2.0 * t3 - 3.0 * t2 + 1.0)
        + bk * (td * (t3 - 2.0 * t2 + t))
        + vk_1 * (-2.0 * t3 + 3.0 * t2)
        + ak_1 * (td * (t3 - t2))
}

impl Interpolate for Vec3 {
    #[inline]
    fn interpolate(a: Self, b: Self, t: f32) -> Self {
        a.lerp(b, t)
    }

    fn cubic_spline(vk: Self, bk: Self, vk_1: Self, ak_1: Self, t: f32, td: f32) -> Self {
        hermite(vk, bk, vk_1, ak_1, t, td)
    }
}

impl Interpolate for Quat {
    /// Spherical interpolation along the shorter arc.
    fn interpolate(a: Self, b: Self, t: f32) -> Self {
        let b = if a.dot(b) < 0.0 { -b } else { b };
        a.slerp(b, t).normalize()
    }

    fn cubic_spline(vk: Self, bk: Self, vk_1: Self, ak_1: Self, t: f32, td: f32) -> Self {
        let value = hermite(
            Vec4::from(vk),
            Vec4::from(bk),
            Vec4::from(vk_1),
            Vec4::from(ak_1),
            t,
            td,
        );
        Quat::from_vec4(value).normalize()
    }
}

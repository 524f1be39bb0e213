/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Unit quaternion used for agent and camera orientation.
pub type UnitQuaternion = nalgebra::UnitQuaternion<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Moves `current` a fraction `alpha` of the way toward `target`.
///
/// With `alpha` in `(0, 1)` repeated application converges on `target`
/// without overshooting it.
#[must_use]
pub fn lerp_point(current: &Point3, target: &Point3, alpha: f64) -> Point3 {
    current + (target - current) * alpha
}

/// Look rotation whose local `-Z` axis points along `forward`, with `+Y`
/// kept as close to world up as possible.
///
/// Falls back to world `+Z` as the up hint when `forward` is vertical.
#[must_use]
pub fn look_rotation(forward: &Vector3) -> UnitQuaternion {
    let up = if forward.cross(&Vector3::y()).norm() < 1e-6 {
        Vector3::z()
    } else {
        Vector3::y()
    };
    // face_towards maps local +Z onto the given direction.
    UnitQuaternion::face_towards(&-forward, &up)
}

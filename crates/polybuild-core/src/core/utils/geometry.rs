use nalgebra::{Isometry3, Point3, Rotation3, Translation3, Unit, UnitQuaternion, Vector3};

/// Returns a unit vector perpendicular to `v`.
///
/// The helper axis is `x` unless `v` is already close to it, in which case `y`
/// is used instead.
pub fn perpendicular(v: &Unit<Vector3<f64>>) -> Unit<Vector3<f64>> {
    let helper = if v.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    Unit::new_normalize(helper - v.into_inner() * v.dot(&helper))
}

/// The rotation taking direction `from` onto direction `to`.
///
/// Unlike [`Rotation3::rotation_between`] this is total: antiparallel inputs
/// produce a half turn about an axis perpendicular to `from`.
pub fn rotation_to_align(from: &Unit<Vector3<f64>>, to: &Unit<Vector3<f64>>) -> Rotation3<f64> {
    Rotation3::rotation_between(&from.into_inner(), &to.into_inner())
        .unwrap_or_else(|| Rotation3::from_axis_angle(&perpendicular(from), std::f64::consts::PI))
}

/// Computes the rigid transform that brings a moving attachment point onto a
/// stationary one.
///
/// After the transform the moving point coincides with `stationary_position`
/// and the moving direction is antiparallel to `stationary_direction`.
pub fn alignment_transform(
    moving_position: &Point3<f64>,
    moving_direction: &Unit<Vector3<f64>>,
    stationary_position: &Point3<f64>,
    stationary_direction: &Unit<Vector3<f64>>,
) -> Isometry3<f64> {
    let target = Unit::new_unchecked(-stationary_direction.into_inner());
    let rotation = UnitQuaternion::from_rotation_matrix(&rotation_to_align(moving_direction, &target));
    let translation = stationary_position.coords - rotation * moving_position.coords;
    Isometry3::from_parts(Translation3::from(translation), rotation)
}

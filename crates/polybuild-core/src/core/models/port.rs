use super::ids::NodeId;
use nalgebra::{Isometry3, Point3, Unit, Vector3};

/// A named, oriented attachment point on a compound.
///
/// A port is not an atom: it never appears in a finished structure. It records
/// the atom a future bond will start from (`anchor`), where the partner's port
/// must sit (`position`) and the outward direction along which a partner must
/// approach (`orientation`). Two ports fuse when their positions coincide and
/// their orientations are antiparallel.
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    pub anchor: NodeId,
    pub position: Point3<f64>,
    pub orientation: Unit<Vector3<f64>>,
}

impl Port {
    /// Creates a port `separation` Angstroms away from `anchor_position` along
    /// `direction`.
    ///
    /// Returns `None` when `direction` has zero length.
    pub fn new(
        anchor: NodeId,
        anchor_position: &Point3<f64>,
        direction: &Vector3<f64>,
        separation: f64,
    ) -> Option<Self> {
        let orientation = Unit::try_new(*direction, f64::EPSILON)?;
        Some(Self {
            anchor,
            position: anchor_position + orientation.into_inner() * separation,
            orientation,
        })
    }

    /// Distance between the port and its anchor.
    pub fn separation(&self, anchor_position: &Point3<f64>) -> f64 {
        (self.position - anchor_position).norm()
    }

    pub(crate) fn transform(&mut self, isometry: &Isometry3<f64>) {
        self.position = isometry * self.position;
        self.orientation = Unit::new_unchecked(isometry.rotation * self.orientation.into_inner());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Translation3, UnitQuaternion};
    use slotmap::KeyData;

    fn dummy_node_id(n: u64) -> NodeId {
        NodeId::from(KeyData::from_ffi(n))
    }

    #[test]
    fn new_port_is_placed_along_direction() {
        let anchor = Point3::new(1.0, 0.0, 0.0);
        let port = Port::new(dummy_node_id(1), &anchor, &Vector3::new(0.0, 2.0, 0.0), 0.5).unwrap();

        assert_eq!(port.anchor, dummy_node_id(1));
        assert!((port.position - Point3::new(1.0, 0.5, 0.0)).norm() < 1e-12);
        assert!((port.orientation.into_inner() - Vector3::y()).norm() < 1e-12);
        assert!((port.separation(&anchor) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn zero_direction_is_rejected() {
        assert!(Port::new(dummy_node_id(1), &Point3::origin(), &Vector3::zeros(), 1.0).is_none());
    }

    #[test]
    fn transform_moves_position_and_rotates_orientation() {
        let mut port = Port::new(dummy_node_id(1), &Point3::origin(), &Vector3::x(), 1.0).unwrap();
        let isometry = Isometry3::from_parts(
            Translation3::new(0.0, 0.0, 5.0),
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), std::f64::consts::FRAC_PI_2),
        );

        port.transform(&isometry);

        assert!((port.position - Point3::new(0.0, 1.0, 5.0)).norm() < 1e-12);
        assert!((port.orientation.into_inner() - Vector3::y()).norm() < 1e-12);
    }
}

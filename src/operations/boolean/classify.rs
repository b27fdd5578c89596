use crate::error::{BooleanError, Result};
use crate::geometry::curve::{Curve, Line};
use crate::geometry::surface::{Containment, FaceSurface, Plane, Surface};
use crate::math::intersect_3d::{plane_plane_intersect, PlanePairRelation};
use crate::math::{
    angle_relative_normal, is_parallel, is_zero, normalize_angle, points_coincide, Point3,
    Vector3, PROBE_OFFSET, TOLERANCE,
};
use crate::topology::{EdgeData, EdgeId, FaceData, FaceId, SolidId, TopologyStore};

/// Side of a solid that a direction leaving one of its edges points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideClass {
    Inside,
    Outside,
    /// Along a boundary face whose normal agrees with the reference normal.
    CoplanarSame,
    /// Along a boundary face whose normal opposes the reference normal.
    CoplanarOpposite,
}

/// Result of [`SideClassifier::classify_cone`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConeClass {
    Inside,
    Outside,
    AlongEdgeOrPlane,
}

/// Classification of a point relative to a solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointClassification {
    Inside,
    Outside,
    OnBoundary,
}

/// Answers "which side of the solid does this direction point to" at
/// edges and vertices of one solid, and point membership by ray casting.
///
/// Holds a read-only view of the solid; it can be shared across threads.
#[derive(Debug)]
pub struct SideClassifier<'a> {
    store: &'a TopologyStore,
    faces: Vec<(FaceId, &'a FaceData)>,
    infinite_volume: bool,
}

impl<'a> SideClassifier<'a> {
    /// Creates a classifier for `solid`.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid or one of its faces is missing.
    pub fn new(store: &'a TopologyStore, solid: SolidId) -> Result<Self> {
        let data = store.solid(solid)?;
        let faces = data
            .faces
            .iter()
            .map(|&id| Ok((id, store.face(id)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            store,
            faces,
            infinite_volume: data.infinite_volume,
        })
    }

    /// Classifies `test_dir`, leaving `edge` perpendicular to it, against the solid.
    ///
    /// Every face of the solid holding a co-edge of `edge` is ranked by the
    /// angle, around the edge, from `test_dir` to the face's in-face inward
    /// vector. The nearest face decides: zero angle means `test_dir` runs
    /// along that face (coplanar, split by `reference_normal`), otherwise the
    /// face's edge direction relative to `edge` tells inside from outside.
    ///
    /// # Errors
    ///
    /// Returns [`BooleanError::Precondition`] if no face of the solid holds
    /// the edge.
    pub fn classify(
        &self,
        edge: &EdgeData,
        test_dir: &Vector3,
        reference_normal: &Vector3,
    ) -> Result<SideClass> {
        let axis = edge.direction();
        let mut nearest: Option<(f64, Vector3, Vector3)> = None;

        for (_, face) in &self.faces {
            for id in face.all_edges() {
                let face_edge = self.store.edge(id)?;
                if !face_edge.is_co_edge(edge) {
                    continue;
                }
                let normal = face.surface.normal_at(&face_edge.a);
                let outward = face_edge.direction().cross(&normal);
                let angle = normalize_angle(angle_relative_normal(test_dir, &-outward, &axis));
                if nearest.as_ref().map_or(true, |(best, _, _)| angle < *best) {
                    nearest = Some((angle, face_edge.direction(), normal));
                }
            }
        }

        let Some((angle, face_dir, normal)) = nearest else {
            return Err(BooleanError::Precondition(format!(
                "no face holds the edge ({:?} -> {:?})",
                edge.a, edge.b
            ))
            .into());
        };

        Ok(if is_zero(angle) {
            if normal.dot(reference_normal) > 0.0 {
                SideClass::CoplanarSame
            } else {
                SideClass::CoplanarOpposite
            }
        } else if face_dir.dot(&axis) > 0.0 {
            SideClass::Inside
        } else {
            SideClass::Outside
        })
    }

    /// Classifies a direction leaving a vertex of the solid.
    ///
    /// Cuts every face touching `point` with a test plane through `point`
    /// containing `direction`, and ranks the resulting in-face rays by
    /// their angle from `direction` around the test plane normal.
    ///
    /// # Errors
    ///
    /// Returns [`BooleanError::Precondition`] if no face touches `point`, and
    /// [`BooleanError::UnsupportedSurfacePair`] for non-planar faces.
    pub fn classify_cone(&self, point: &Point3, direction: &Vector3) -> Result<ConeClass> {
        let dir = direction.normalize();
        let test_normal = any_perpendicular(&dir);
        let test_plane = Plane::from_normal(*point, test_normal)?;
        let mut rays: Vec<(f64, bool)> = Vec::new();

        for (_, face) in &self.faces {
            let touches = face
                .all_edges()
                .map(|id| self.store.edge(id).map(|e| points_coincide(&e.a, point)))
                .collect::<std::result::Result<Vec<_>, _>>()?
                .into_iter()
                .any(|t| t);
            if !touches {
                continue;
            }
            let Some(plane) = face.surface.as_plane() else {
                return Err(BooleanError::UnsupportedSurfacePair {
                    first: "plane",
                    second: face.surface.kind_name(),
                }
                .into());
            };
            let PlanePairRelation::Crossing(line) = plane_plane_intersect(&test_plane, plane) else {
                return Ok(ConeClass::AlongEdgeOrPlane);
            };
            for ray in [*line.direction(), -line.direction()] {
                let probe = point + ray * PROBE_OFFSET;
                if face.contains_point(self.store, &probe)? == Containment::Outside {
                    continue;
                }
                let angle = normalize_angle(angle_relative_normal(&dir, &ray, &test_normal));
                // the sector just before this ray lies on the face's normal side
                let out = test_normal.cross(&ray).dot(plane.plane_normal()) < 0.0;
                rays.push((angle, out));
            }
        }

        rays.sort_by(|a, b| a.0.total_cmp(&b.0));
        let Some(&(angle, out)) = rays.first() else {
            return Err(BooleanError::Precondition(format!(
                "no face touches point {point:?}"
            ))
            .into());
        };
        Ok(if is_zero(angle) {
            ConeClass::AlongEdgeOrPlane
        } else if out {
            ConeClass::Outside
        } else {
            ConeClass::Inside
        })
    }

    /// Classifies a point as inside, outside, or on the boundary of the solid.
    ///
    /// Shoots rays in a few skewed directions and counts boundary crossings;
    /// a ray grazing an edge or lying in a face is discarded and the next
    /// direction is tried. Complemented solids invert the result.
    ///
    /// # Errors
    ///
    /// Returns [`BooleanError::ToleranceAmbiguity`] if every ray is degenerate.
    pub fn classify_point(&self, point: &Point3) -> Result<PointClassification> {
        for dir in RAY_DIRECTIONS {
            let ray = Line::new(*point, Vector3::new(dir[0], dir[1], dir[2]))?;
            if let RayCastResult::Clear(class) = self.ray_cast(point, &ray)? {
                return Ok(match (class, self.infinite_volume) {
                    (PointClassification::Inside, true) => PointClassification::Outside,
                    (PointClassification::Outside, true) => PointClassification::Inside,
                    (class, _) => class,
                });
            }
        }
        Err(BooleanError::ToleranceAmbiguity(format!(
            "every ray from {point:?} grazes the boundary"
        ))
        .into())
    }

    fn ray_cast(&self, point: &Point3, ray: &Line) -> Result<RayCastResult> {
        let mut crossings = 0u32;
        let ahead = ray.at(1.0);

        for (_, face) in &self.faces {
            let surface: &FaceSurface = &face.surface;
            if surface.contains_point(point) {
                if face.contains_point(self.store, point)? != Containment::Outside {
                    return Ok(RayCastResult::Clear(PointClassification::OnBoundary));
                }
                if surface.contains_point(&ahead) {
                    // ray lies in the face's surface
                    return Ok(RayCastResult::Degenerate);
                }
            }

            for t in ray.ts_with_surface(surface) {
                if t <= TOLERANCE {
                    continue;
                }
                match face.contains_point(self.store, &ray.at(t))? {
                    Containment::Inside => crossings += 1,
                    Containment::OnEdge => return Ok(RayCastResult::Degenerate),
                    Containment::Outside => {}
                }
            }
        }

        Ok(RayCastResult::Clear(if crossings % 2 == 1 {
            PointClassification::Inside
        } else {
            PointClassification::Outside
        }))
    }

    /// The store the solid lives in.
    #[must_use]
    pub fn store(&self) -> &'a TopologyStore {
        self.store
    }

    /// Faces of the solid, in solid order.
    #[must_use]
    pub fn faces(&self) -> &[(FaceId, &'a FaceData)] {
        &self.faces
    }

    /// `true` if the classified solid is complemented.
    #[must_use]
    pub fn infinite_volume(&self) -> bool {
        self.infinite_volume
    }

    /// Faces holding a co-edge of `edge`, other than `owner`.
    ///
    /// # Errors
    ///
    /// Returns an error if an edge is missing from the store.
    pub fn faces_sharing(&self, edge: &EdgeData, owner: FaceId) -> Result<Vec<(FaceId, EdgeId)>> {
        let mut out = Vec::new();
        for &(face_id, face) in &self.faces {
            if face_id == owner {
                continue;
            }
            for id in face.all_edges() {
                if self.store.edge(id)?.is_co_edge(edge) {
                    out.push((face_id, id));
                }
            }
        }
        Ok(out)
    }
}

/// Classifies a point as inside, outside, or on the boundary of a solid.
///
/// # Errors
///
/// Returns an error if the solid cannot be read or every ray is degenerate.
pub fn classify_point_in_solid(
    point: &Point3,
    solid_id: SolidId,
    store: &TopologyStore,
) -> Result<PointClassification> {
    SideClassifier::new(store, solid_id)?.classify_point(point)
}

/// Skewed so axis-aligned models rarely graze an edge.
const RAY_DIRECTIONS: [[f64; 3]; 5] = [
    [1.0, 0.312_7, 0.178_9],
    [-0.231_1, 1.0, 0.412_7],
    [0.371_9, -0.193_1, 1.0],
    [-1.0, -0.618_0, 0.271_8],
    [0.141_4, 0.707_1, -1.0],
];

enum RayCastResult {
    Clear(PointClassification),
    Degenerate,
}

/// A unit vector perpendicular to `v`, chosen away from the coordinate axes.
fn any_perpendicular(v: &Vector3) -> Vector3 {
    let skew = Vector3::new(0.312_7, 0.721_1, 0.618_0);
    let reference = if is_parallel(v, &skew) {
        Vector3::new(0.618_0, -0.312_7, 0.721_1)
    } else {
        skew
    };
    v.cross(&reference).normalize()
}

/// Which input of an intersection a face comes from.
///
/// Regions where the two boundaries overlap are kept from one side only:
/// an `A` region along a same-facing `B` face survives, everything else
/// coplanar is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    A,
    B,
}

impl Operand {
    /// Returns `true` if a face region of this operand classified as
    /// `class` against the other solid belongs to the result.
    #[must_use]
    pub fn keeps(self, class: SideClass) -> bool {
        matches!(
            (self, class),
            (_, SideClass::Inside) | (Operand::A, SideClass::CoplanarSame)
        )
    }

    /// Point-probe form of [`Operand::keeps`] for a face region next to
    /// `on_face`, which lies on a face with outward `normal`; `inward`
    /// points into the region along the face (zero if `on_face` is already
    /// interior).
    ///
    /// # Errors
    ///
    /// Returns an error if a probe cannot be classified.
    pub fn keeps_point(
        self,
        other: &SideClassifier<'_>,
        on_face: &Point3,
        inward: &Vector3,
        normal: &Vector3,
    ) -> Result<bool> {
        let base = on_face + inward * PROBE_OFFSET;
        let inside = |q: Point3| -> Result<bool> {
            Ok(other.classify_point(&q)? == PointClassification::Inside)
        };
        match self {
            Operand::A => inside(base - normal * PROBE_OFFSET),
            Operand::B => {
                Ok(inside(base - normal * PROBE_OFFSET)? && inside(base + normal * PROBE_OFFSET)?)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::creation::MakeBox;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn unit_box(store: &mut TopologyStore) -> SolidId {
        MakeBox::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0)).execute(store).unwrap()
    }

    fn bottom_front_edge() -> EdgeData {
        // along +x at y = 0, z = 0
        EdgeData::new(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)).unwrap()
    }

    #[test]
    fn direction_into_box_is_inside() {
        let mut store = TopologyStore::new();
        let solid = unit_box(&mut store);
        let classifier = SideClassifier::new(&store, solid).unwrap();
        let d = Vector3::new(0.0, 1.0, 1.0).normalize();
        let n = Vector3::z();
        assert_eq!(classifier.classify(&bottom_front_edge(), &d, &n).unwrap(), SideClass::Inside);
        assert_eq!(classifier.classify(&bottom_front_edge(), &-d, &n).unwrap(), SideClass::Outside);
        // edge orientation does not matter
        let flipped = bottom_front_edge().flipped();
        assert_eq!(classifier.classify(&flipped, &d, &n).unwrap(), SideClass::Inside);
    }

    // `d` and `-d` are complementary only when `d` lies in the plane of the
    // face being classified, i.e. that face cuts the wedge around the edge in
    // two. Here `d` sweeps a full turn, so at the convex edge both `d` and
    // `-d` may leave the box, and (Outside, Outside) is allowed.
    #[test]
    fn opposite_directions_are_never_both_inside() {
        let mut store = TopologyStore::new();
        let solid = unit_box(&mut store);
        let classifier = SideClassifier::new(&store, solid).unwrap();
        let edge = bottom_front_edge();
        for k in 0..16 {
            let angle = 0.1 + f64::from(k) * std::f64::consts::TAU / 16.0;
            let d = Vector3::new(0.0, angle.cos(), angle.sin());
            let a = classifier.classify(&edge, &d, &Vector3::z()).unwrap();
            let b = classifier.classify(&edge, &-d, &Vector3::z()).unwrap();
            match (a, b) {
                (SideClass::Inside, SideClass::Outside)
                | (SideClass::Outside, SideClass::Inside)
                | (SideClass::Outside, SideClass::Outside) => {}
                other => panic!("direction {d:?} gave {other:?}"),
            }
        }
    }

    #[test]
    fn opposite_in_plane_directions_are_complementary() {
        let mut store = TopologyStore::new();
        let solid = unit_box(&mut store);
        let classifier = SideClassifier::new(&store, solid).unwrap();
        let edge = bottom_front_edge();
        // a plane through the edge, tilted between the two box faces
        let normal = Vector3::new(0.0, -1.0, 1.0).normalize();
        let d = normal.cross(&edge.direction());
        assert_eq!(classifier.classify(&edge, &d, &normal).unwrap(), SideClass::Inside);
        assert_eq!(classifier.classify(&edge, &-d, &normal).unwrap(), SideClass::Outside);
    }

    #[test]
    fn direction_along_face_is_coplanar() {
        let mut store = TopologyStore::new();
        let solid = unit_box(&mut store);
        let classifier = SideClassifier::new(&store, solid).unwrap();
        let edge = bottom_front_edge();
        // +y runs along the bottom face, whose normal is -z
        assert_eq!(
            classifier.classify(&edge, &Vector3::y(), &-Vector3::z()).unwrap(),
            SideClass::CoplanarSame
        );
        assert_eq!(
            classifier.classify(&edge, &Vector3::y(), &Vector3::z()).unwrap(),
            SideClass::CoplanarOpposite
        );
    }

    #[test]
    fn foreign_edge_is_a_precondition_error() {
        let mut store = TopologyStore::new();
        let solid = unit_box(&mut store);
        let classifier = SideClassifier::new(&store, solid).unwrap();
        let edge = EdgeData::new(p(0.2, 0.2, 0.2), p(0.8, 0.2, 0.2)).unwrap();
        assert!(matches!(
            classifier.classify(&edge, &Vector3::y(), &Vector3::z()),
            Err(crate::error::BrepError::Boolean(BooleanError::Precondition(_)))
        ));
    }

    #[test]
    fn cone_at_corner() {
        let mut store = TopologyStore::new();
        let solid = unit_box(&mut store);
        let classifier = SideClassifier::new(&store, solid).unwrap();
        let corner = p(0.0, 0.0, 0.0);
        assert_eq!(
            classifier.classify_cone(&corner, &Vector3::new(1.0, 1.0, 1.0)).unwrap(),
            ConeClass::Inside
        );
        assert_eq!(
            classifier.classify_cone(&corner, &Vector3::new(-1.0, 0.5, 0.5)).unwrap(),
            ConeClass::Outside
        );
        assert_eq!(
            classifier.classify_cone(&corner, &Vector3::x()).unwrap(),
            ConeClass::AlongEdgeOrPlane
        );
    }

    #[test]
    fn ray_casting_inside_outside_boundary() {
        let mut store = TopologyStore::new();
        let solid = unit_box(&mut store);
        let classify = |q: Point3| classify_point_in_solid(&q, solid, &store).unwrap();
        assert_eq!(classify(p(0.5, 0.5, 0.5)), PointClassification::Inside);
        assert_eq!(classify(p(0.001, 0.001, 0.001)), PointClassification::Inside);
        assert_eq!(classify(p(5.0, 5.0, 5.0)), PointClassification::Outside);
        assert_eq!(classify(p(0.5, 0.5, -1.0)), PointClassification::Outside);
        assert_eq!(classify(p(0.5, 0.5, 0.0)), PointClassification::OnBoundary);
    }

    #[test]
    fn faces_sharing_finds_neighbour() {
        let mut store = TopologyStore::new();
        let solid = unit_box(&mut store);
        let classifier = SideClassifier::new(&store, solid).unwrap();
        let (owner, _) = classifier.faces[0];
        let first_edge = classifier.faces[0].1.contour[0];
        let edge = store.edge(first_edge).unwrap().clone();
        let shared = classifier.faces_sharing(&edge, owner).unwrap();
        assert_eq!(shared.len(), 1, "a box edge joins exactly two faces");
    }

    #[test]
    fn operand_policy_on_coplanar_regions() {
        assert!(Operand::A.keeps(SideClass::CoplanarSame));
        assert!(!Operand::B.keeps(SideClass::CoplanarSame));
        assert!(!Operand::A.keeps(SideClass::CoplanarOpposite));
        assert!(!Operand::B.keeps(SideClass::CoplanarOpposite));
        assert!(Operand::B.keeps(SideClass::Inside));
    }

    #[test]
    fn operand_point_probes_follow_policy() {
        let mut store = TopologyStore::new();
        let solid = unit_box(&mut store);
        let other = SideClassifier::new(&store, solid).unwrap();
        // a region on the box's top face plane, facing up like the top face
        let on_top = p(0.5, 0.5, 1.0);
        let up = Vector3::z();
        let none = Vector3::zeros();
        assert!(Operand::A.keeps_point(&other, &on_top, &none, &up).unwrap());
        assert!(!Operand::B.keeps_point(&other, &on_top, &none, &up).unwrap());
        // strictly inside, any orientation
        let centre = p(0.5, 0.5, 0.5);
        assert!(Operand::B.keeps_point(&other, &centre, &none, &up).unwrap());
    }
}

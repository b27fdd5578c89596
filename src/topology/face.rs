use crate::error::{GeometryError, Result, TopologyError};
use crate::geometry::surface::{Containment, FaceSurface, Surface};
use crate::math::{points_coincide, Point3, PROBE_OFFSET};

use super::edge::EdgeId;
use super::TopologyStore;

slotmap::new_key_type! {
    /// Unique identifier for a face in the topology store.
    pub struct FaceId;
}

/// Data associated with a topological face.
///
/// A bounded region on a surface: one contour loop, counterclockwise around
/// the surface normal, and any number of clockwise hole loops inside it.
/// The material side of the face is opposite the normal.
#[derive(Debug, Clone)]
pub struct FaceData {
    /// The geometric surface on which this face lies.
    pub surface: FaceSurface,
    /// Outer boundary loop.
    pub contour: Vec<EdgeId>,
    /// Hole loops.
    pub holes: Vec<Vec<EdgeId>>,
}

impl FaceData {
    /// Creates a face without holes.
    #[must_use]
    pub fn new(surface: FaceSurface, contour: Vec<EdgeId>) -> Self {
        Self {
            surface,
            contour,
            holes: Vec::new(),
        }
    }

    /// Contour followed by every hole.
    pub fn loops(&self) -> impl Iterator<Item = &[EdgeId]> {
        std::iter::once(self.contour.as_slice()).chain(self.holes.iter().map(Vec::as_slice))
    }

    /// Every boundary edge, contour first.
    pub fn all_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.loops().flat_map(|l| l.iter().copied())
    }

    /// Checks that every loop is closed: `edges[i].b ≈ edges[i+1].a` cyclically.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::LoopNotClosed`] with the index of the first
    /// edge whose end does not meet its successor.
    pub fn validate(&self, store: &TopologyStore) -> Result<()> {
        for edges in self.loops() {
            if edges.is_empty() {
                return Err(TopologyError::InvalidTopology("empty loop".into()).into());
            }
            for (i, &id) in edges.iter().enumerate() {
                let next = edges[(i + 1) % edges.len()];
                if !points_coincide(&store.edge(id)?.b, &store.edge(next)?.a) {
                    return Err(TopologyError::LoopNotClosed { index: i }.into());
                }
            }
        }
        Ok(())
    }

    /// Classifies a point on the face's surface against the face region.
    ///
    /// # Errors
    ///
    /// Returns an error if a boundary edge is missing from the store.
    pub fn contains_point(&self, store: &TopologyStore, point: &Point3) -> Result<Containment> {
        let contour = store.loop_points(&self.contour)?;
        match self.surface.loop_contains_point(&contour, point) {
            Containment::Inside => {}
            other => return Ok(other),
        }
        for hole in &self.holes {
            let pts = store.loop_points(hole)?;
            match self.surface.loop_contains_point(&pts, point) {
                Containment::Outside => {}
                Containment::Inside => return Ok(Containment::Outside),
                Containment::OnEdge => return Ok(Containment::OnEdge),
            }
        }
        Ok(Containment::Inside)
    }

    /// A point strictly inside the face, just off one of its contour edges.
    ///
    /// # Errors
    ///
    /// Returns an error if no contour edge offers an interior sample.
    pub fn interior_sample(&self, store: &TopologyStore) -> Result<Point3> {
        for &id in &self.contour {
            let edge = store.edge(id)?;
            let mid = edge.midpoint();
            let inward = self.surface.normal_at(&mid).cross(&edge.direction());
            let candidate = mid + inward * PROBE_OFFSET;
            if self.contains_point(store, &candidate)? == Containment::Inside {
                return Ok(candidate);
            }
        }
        Err(GeometryError::Degenerate("face has no interior sample point".into()).into())
    }

    /// Geometric equality: same oriented surface and the same loops up to
    /// cyclic rotation of their edges.
    ///
    /// # Errors
    ///
    /// Returns an error if a boundary edge is missing from the store.
    pub fn like_face(&self, other: &FaceData, store: &TopologyStore) -> Result<bool> {
        if self.holes.len() != other.holes.len() || !self.surface.is_coplanar_to(&other.surface) {
            return Ok(false);
        }
        let contour = store.loop_points(&self.contour)?;
        let Some(first) = contour.first() else {
            return Ok(false);
        };
        let same_side = self.surface.normal_at(first).dot(&other.surface.normal_at(first)) > 0.0;
        if !same_side || !loops_match(&contour, &store.loop_points(&other.contour)?) {
            return Ok(false);
        }
        let theirs = other
            .holes
            .iter()
            .map(|h| store.loop_points(h))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        for hole in &self.holes {
            let mine = store.loop_points(hole)?;
            if !theirs.iter().any(|t| loops_match(&mine, t)) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Two point cycles are equal up to rotation.
fn loops_match(a: &[Point3], b: &[Point3]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let n = a.len();
    (0..n).any(|shift| (0..n).all(|i| points_coincide(&a[i], &b[(i + shift) % n])))
}

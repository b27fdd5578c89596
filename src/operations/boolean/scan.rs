use std::cmp::Ordering;

use crate::error::Result;
use crate::geometry::curve::{Curve, Line};
use crate::geometry::surface::{FaceSurface, Surface};
use crate::math::{approx_eq, Point3, Vector3, TOLERANCE};
use crate::topology::{EdgeData, EdgeId, FaceData, TopologyStore};

/// Where a face's boundary meets an intersection curve.
#[derive(Debug, Clone)]
pub struct CrossingPoint {
    /// Position in space.
    pub p: Point3,
    /// Parameter along the intersection curve.
    pub t: f64,
    /// Boundary edge of the owning face carrying the point.
    pub edge: EdgeId,
    /// Line parameter of `p` on `edge`.
    pub edge_t: f64,
    /// Tangent to the curve, pointing from outside into the owning face.
    pub inside_dir: Vector3,
    /// `true` if `edge` runs along the curve.
    pub colinear: bool,
    /// Points from `p` into the part of `edge` that survives.
    /// Zero until the point is registered.
    pub keep_dir: Vector3,
    /// Consumed together with an event of the other face.
    pub used: bool,
}

impl CrossingPoint {
    /// Creates a crossing at `p`, locating it on `curve`.
    ///
    /// # Errors
    ///
    /// Returns an error if `p` is not on `curve`.
    pub fn on_curve(
        curve: &Line,
        p: Point3,
        edge: EdgeId,
        edge_t: f64,
        inside_dir: Vector3,
        colinear: bool,
    ) -> Result<Self> {
        Ok(Self {
            t: curve.point_parameter(&p)?,
            p,
            edge,
            edge_t,
            inside_dir,
            colinear,
            keep_dir: Vector3::zeros(),
            used: false,
        })
    }

    /// The same point with its retention direction set.
    #[must_use]
    pub fn with_keep_dir(mut self, keep_dir: Vector3) -> Self {
        self.keep_dir = keep_dir;
        self
    }
}

/// Total order on crossings along a curve with unit `tangent`.
///
/// Points closer than [`TOLERANCE`] share a position; among those, points
/// whose `inside_dir` runs against the tangent (closing an interval) come
/// before points opening one. Equal means simultaneous.
#[must_use]
pub fn crossing_order(a: &CrossingPoint, b: &CrossingPoint, tangent: &Vector3) -> Ordering {
    if (a.t - b.t).abs() >= TOLERANCE {
        return a.t.total_cmp(&b.t);
    }
    let da = a.inside_dir.dot(tangent);
    let db = b.inside_dir.dot(tangent);
    if approx_eq(da, db) {
        Ordering::Equal
    } else {
        da.total_cmp(&db)
    }
}

/// Sorts crossings along the curve, snapping clustered parameters together.
pub fn sort_crossings(points: &mut [CrossingPoint], tangent: &Vector3) {
    points.sort_by(|a, b| a.t.total_cmp(&b.t));
    let mut anchor: Option<f64> = None;
    for point in points.iter_mut() {
        match anchor {
            Some(t0) if (point.t - t0).abs() < TOLERANCE => point.t = t0,
            _ => anchor = Some(point.t),
        }
    }
    points.sort_by(|a, b| crossing_order(a, b, tangent));
}

/// Finds every place where the boundary of `face` crosses `curve`.
///
/// `curve` must lie on the face's surface; `other` is the surface that
/// produced it. The result is sorted by [`sort_crossings`], and between
/// consecutive opening and closing points the curve runs through the face
/// (closed: runs along the face's own edges count as inside).
///
/// # Errors
///
/// Returns an error if an edge is missing or a crossing falls off the curve.
pub fn scan(
    store: &TopologyStore,
    face: &FaceData,
    curve: &Line,
    other: &FaceSurface,
) -> Result<Vec<CrossingPoint>> {
    let u = curve.direction();
    let mut points = Vec::new();

    for loop_ids in face.loops() {
        let edges = loop_ids
            .iter()
            .map(|&id| Ok((id, store.edge(id)?)))
            .collect::<Result<Vec<(EdgeId, &EdgeData)>>>()?;
        let count = edges.len();

        for (i, &(id, edge)) in edges.iter().enumerate() {
            let (prev_id, prev) = edges[(i + count - 1) % count];
            let (next_id, next) = edges[(i + 1) % count];
            let normal = face.surface.normal_at(&edge.a);
            let dir = edge.direction();

            if edge.colinear_to(curve) {
                points.push(CrossingPoint::on_curve(curve, edge.a, id, edge.a_t, dir, true)?);
                points.push(CrossingPoint::on_curve(curve, edge.b, id, edge.b_t, -dir, true)?);

                // the face also extends along the curve beyond an endpoint
                // when the neighbouring edge lies on the outer side
                let outer = dir.cross(&normal);
                if !prev.colinear_to(curve) && prev.direction().dot(&outer) < 0.0 {
                    points.push(CrossingPoint::on_curve(
                        curve, edge.a, prev_id, prev.b_t, -dir, false,
                    )?);
                }
                if !next.colinear_to(curve) && next.direction().dot(&outer) > 0.0 {
                    points.push(CrossingPoint::on_curve(
                        curve, edge.b, next_id, next.a_t, dir, false,
                    )?);
                }
                continue;
            }

            let inside_dir = if u.dot(&normal.cross(&dir)) > 0.0 { *u } else { -u };
            let perp = u.cross(&normal);
            for edge_t in edge.intersection_parameters_with_surface(other) {
                if approx_eq(edge_t, edge.b_t) {
                    // vertex: a crossing only if the boundary passes to the other side
                    let passes = perp.dot(&dir) * perp.dot(&next.direction()) > 0.0;
                    if passes && !next.colinear_to(curve) {
                        points.push(CrossingPoint::on_curve(
                            curve, edge.b, id, edge.b_t, inside_dir, false,
                        )?);
                    }
                } else if !approx_eq(edge_t, edge.a_t) {
                    let p = edge.line.at(edge_t);
                    points.push(CrossingPoint::on_curve(curve, p, id, edge_t, inside_dir, false)?);
                }
            }
        }
    }

    sort_crossings(&mut points, u);
    Ok(points)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::surface::Plane;
    use crate::operations::creation::MakeFace;
    use crate::topology::FaceId;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn event(t: f64, inside: f64) -> CrossingPoint {
        CrossingPoint {
            p: p(t, 0.0, 0.0),
            t,
            edge: EdgeId::default(),
            edge_t: 0.0,
            inside_dir: Vector3::new(inside, 0.0, 0.0),
            colinear: false,
            keep_dir: Vector3::zeros(),
            used: false,
        }
    }

    fn face(store: &mut TopologyStore, pts: Vec<Point3>) -> FaceId {
        MakeFace::new(pts, vec![]).execute(store).unwrap()
    }

    fn x_axis() -> Line {
        Line::new(p(0.0, 0.0, 0.0), Vector3::x()).unwrap()
    }

    /// The plane cutting the xy plane along the x axis.
    fn xz() -> FaceSurface {
        FaceSurface::Plane(Plane::from_normal(p(0.0, 0.0, 0.0), Vector3::y()).unwrap())
    }

    #[test]
    fn order_is_by_parameter_then_closing_first() {
        let x = Vector3::x();
        assert_eq!(crossing_order(&event(1.0, 1.0), &event(2.0, -1.0), &x), Ordering::Less);
        assert_eq!(crossing_order(&event(1.0, 1.0), &event(1.0, -1.0), &x), Ordering::Greater);
        assert_eq!(
            crossing_order(&event(1.0, 1.0), &event(1.0 + TOLERANCE / 4.0, 1.0), &x),
            Ordering::Equal
        );
    }

    #[test]
    fn sort_snaps_clusters() {
        let mut events = vec![
            event(1.0 + TOLERANCE / 2.0, 1.0),
            event(0.0, 1.0),
            event(1.0, -1.0),
        ];
        sort_crossings(&mut events, &Vector3::x());
        assert!((events[0].t).abs() < TOLERANCE);
        assert!((events[1].inside_dir.x + 1.0).abs() < TOLERANCE, "closing point first");
        assert!((events[1].t - events[2].t).abs() < f64::EPSILON, "cluster snapped");
    }

    #[test]
    fn square_crossed_through_interior() {
        let mut store = TopologyStore::new();
        let id = face(
            &mut store,
            vec![p(-1.0, -1.0, 0.0), p(1.0, -1.0, 0.0), p(1.0, 1.0, 0.0), p(-1.0, 1.0, 0.0)],
        );
        let data = store.face(id).unwrap().clone();
        let events = scan(&store, &data, &x_axis(), &xz()).unwrap();
        assert_eq!(events.len(), 2);
        assert!((events[0].t + 1.0).abs() < TOLERANCE && events[0].inside_dir.x > 0.0);
        assert!((events[1].t - 1.0).abs() < TOLERANCE && events[1].inside_dir.x < 0.0);
        assert!(events.iter().all(|e| !e.colinear));
    }

    #[test]
    fn vertex_touch_is_not_a_crossing() {
        let mut store = TopologyStore::new();
        // diamond touching the x axis with its bottom vertex only
        let id = face(
            &mut store,
            vec![p(0.0, 0.0, 0.0), p(1.0, 1.0, 0.0), p(0.0, 2.0, 0.0), p(-1.0, 1.0, 0.0)],
        );
        let data = store.face(id).unwrap().clone();
        assert!(scan(&store, &data, &x_axis(), &xz()).unwrap().is_empty());
    }

    #[test]
    fn vertex_pass_through_is_one_crossing() {
        let mut store = TopologyStore::new();
        // diamond centred on the axis: left and right vertices lie on it
        let id = face(
            &mut store,
            vec![p(0.0, -1.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0), p(-1.0, 0.0, 0.0)],
        );
        let data = store.face(id).unwrap().clone();
        let events = scan(&store, &data, &x_axis(), &xz()).unwrap();
        assert_eq!(events.len(), 2, "events: {events:?}");
        assert!((events[0].t + 1.0).abs() < TOLERANCE);
        assert!((events[1].t - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn colinear_edge_bounds_the_run() {
        let mut store = TopologyStore::new();
        // square sitting on the x axis
        let id = face(
            &mut store,
            vec![p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0), p(2.0, 1.0, 0.0), p(0.0, 1.0, 0.0)],
        );
        let data = store.face(id).unwrap().clone();
        let events = scan(&store, &data, &x_axis(), &xz()).unwrap();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.colinear));
        assert!(events[0].t.abs() < TOLERANCE && events[0].inside_dir.x > 0.0);
    }

    #[test]
    fn colinear_edge_on_notch_continues_the_run() {
        let mut store = TopologyStore::new();
        // L shape; the edge from (1,0) to (2,0) is on the axis and the face
        // continues below the axis left of x = 1
        let id = face(
            &mut store,
            vec![
                p(0.0, -1.0, 0.0),
                p(1.0, -1.0, 0.0),
                p(1.0, 0.0, 0.0),
                p(2.0, 0.0, 0.0),
                p(2.0, 1.0, 0.0),
                p(0.0, 1.0, 0.0),
            ],
        );
        let data = store.face(id).unwrap().clone();
        let events = scan(&store, &data, &x_axis(), &xz()).unwrap();
        // open at 0, then at x = 1 the interior run closes and the colinear run opens
        assert_eq!(events.len(), 4, "events: {events:?}");
        assert!(events[0].t.abs() < TOLERANCE && events[0].inside_dir.x > 0.0);
        assert!((events[1].t - 1.0).abs() < TOLERANCE && events[1].inside_dir.x < 0.0);
        assert!(!events[1].colinear);
        assert!((events[2].t - 1.0).abs() < TOLERANCE && events[2].colinear);
        assert!((events[3].t - 2.0).abs() < TOLERANCE && events[3].inside_dir.x < 0.0);
    }
}

use std::cmp::Ordering;

use crate::error::{BooleanError, Result};
use crate::geometry::curve::Line;
use crate::math::{Point3, TOLERANCE};
use crate::topology::EdgeId;

use super::scan::{crossing_order, CrossingPoint};

/// A stretch of an intersection curve lying inside both faces.
#[derive(Debug, Clone)]
pub struct SweepSpan {
    pub start: Point3,
    pub start_t: f64,
    pub end: Point3,
    pub end_t: f64,
    /// Per face: the boundary edge the span runs along, if any.
    pub colinear: [Option<EdgeId>; 2],
    /// Per face: index of the crossing that opened the span, if that face
    /// entered at the span start.
    pub opened_by: [Option<usize>; 2],
    /// Per face: index of the crossing that closed the span, if that face
    /// left at the span end.
    pub closed_by: [Option<usize>; 2],
}

/// Walks the crossings of two faces along a shared curve and returns the
/// spans where the curve is inside both.
///
/// `inside` holds the state of each face at the start of the curve.
/// Crossings comparing equal are consumed together and marked `used`.
///
/// # Errors
///
/// Returns [`BooleanError::UnbalancedSweep`] if the curve ends inside a face.
pub fn merge(
    first: &mut [CrossingPoint],
    second: &mut [CrossingPoint],
    inside: [bool; 2],
    curve: &Line,
) -> Result<Vec<SweepSpan>> {
    let tangent = curve.direction();
    let mut inside = inside;
    let mut colinear: [Option<EdgeId>; 2] = [None, None];
    let mut entered: [Option<usize>; 2] = [None, None];
    let mut open: Option<(Point3, f64, [Option<usize>; 2])> = None;
    let mut spans = Vec::new();
    let (mut i, mut j) = (0, 0);

    if inside[0] && inside[1] {
        if let Some(cp) = first.first().or(second.first()) {
            open = Some((cp.p, cp.t, [None, None]));
        }
    }

    while i < first.len() || j < second.len() {
        let order = match (first.get(i), second.get(j)) {
            (Some(a), Some(b)) => crossing_order(a, b, tangent),
            (Some(_), None) => Ordering::Less,
            _ => Ordering::Greater,
        };
        let was_inside = inside[0] && inside[1];
        let mut stepped: [Option<usize>; 2] = [None, None];

        if order != Ordering::Greater {
            stepped[0] = Some(i);
            i += 1;
        }
        if order != Ordering::Less {
            stepped[1] = Some(j);
            j += 1;
        }

        let mut at = (Point3::origin(), 0.0);
        for (side, step) in stepped.iter().enumerate() {
            let Some(k) = *step else { continue };
            let cp = if side == 0 { &mut first[k] } else { &mut second[k] };
            if order == Ordering::Equal {
                cp.used = true;
            }
            inside[side] = !inside[side];
            if inside[side] {
                colinear[side] = cp.colinear.then_some(cp.edge);
                entered[side] = Some(k);
            }
            at = (cp.p, cp.t);
        }
        if let (Some(k), Some(_)) = (stepped[0], stepped[1]) {
            at = (first[k].p, first[k].t);
        }

        let now_inside = inside[0] && inside[1];
        if !was_inside && now_inside {
            let opened_by = [0, 1].map(|side| stepped[side].filter(|_| inside[side]));
            open = Some((at.0, at.1, opened_by));
        } else if was_inside && !now_inside {
            if let Some((start, start_t, opened_by)) = open.take() {
                if (at.1 - start_t).abs() >= TOLERANCE {
                    spans.push(SweepSpan {
                        start,
                        start_t,
                        end: at.0,
                        end_t: at.1,
                        colinear,
                        opened_by: [0, 1].map(|side| {
                            opened_by[side].or(entered[side].filter(|&k| {
                                let t = if side == 0 { first[k].t } else { second[k].t };
                                (t - start_t).abs() < TOLERANCE
                            }))
                        }),
                        closed_by: [0, 1].map(|side| stepped[side].filter(|_| !inside[side])),
                    });
                }
            }
        }
    }

    if inside[0] || inside[1] {
        return Err(BooleanError::UnbalancedSweep {
            in_a: inside[0],
            in_b: inside[1],
        }
        .into());
    }
    Ok(spans)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Vector3;

    fn event(t: f64, opening: bool) -> CrossingPoint {
        CrossingPoint {
            p: Point3::new(t, 0.0, 0.0),
            t,
            edge: EdgeId::default(),
            edge_t: t,
            inside_dir: Vector3::new(if opening { 1.0 } else { -1.0 }, 0.0, 0.0),
            colinear: false,
            keep_dir: Vector3::zeros(),
            used: false,
        }
    }

    fn axis() -> Line {
        Line::new(Point3::origin(), Vector3::x()).unwrap()
    }

    #[test]
    fn overlap_of_two_intervals() {
        let mut a = vec![event(0.0, true), event(2.0, false)];
        let mut b = vec![event(1.0, true), event(3.0, false)];
        let spans = merge(&mut a, &mut b, [false, false], &axis()).unwrap();
        assert_eq!(spans.len(), 1);
        assert!((spans[0].start_t - 1.0).abs() < TOLERANCE);
        assert!((spans[0].end_t - 2.0).abs() < TOLERANCE);
        assert_eq!(spans[0].opened_by, [None, Some(0)], "only the second face enters at t = 1");
        assert_eq!(spans[0].closed_by, [Some(1), None]);
    }

    #[test]
    fn simultaneous_events_are_used() {
        let mut a = vec![event(0.0, true), event(1.0, false)];
        let mut b = vec![event(0.0, true), event(1.0, false)];
        let spans = merge(&mut a, &mut b, [false, false], &axis()).unwrap();
        assert_eq!(spans.len(), 1);
        assert!(a.iter().chain(b.iter()).all(|e| e.used));
        assert_eq!(spans[0].closed_by, [Some(1), Some(1)]);
    }

    #[test]
    fn touching_intervals_give_no_span() {
        let mut a = vec![event(0.0, true), event(1.0, false)];
        let mut b = vec![event(1.0, true), event(2.0, false)];
        let spans = merge(&mut a, &mut b, [false, false], &axis()).unwrap();
        assert!(spans.is_empty(), "closing sorts before opening: {spans:?}");
    }

    #[test]
    fn disjoint_intervals_give_no_span() {
        let mut a = vec![event(0.0, true), event(1.0, false)];
        let mut b = vec![event(2.0, true), event(3.0, false)];
        assert!(merge(&mut a, &mut b, [false, false], &axis()).unwrap().is_empty());
    }

    #[test]
    fn open_interval_is_unbalanced() {
        let mut a = vec![event(0.0, true)];
        let mut b = vec![event(0.5, true), event(2.0, false)];
        let err = merge(&mut a, &mut b, [false, false], &axis()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::BrepError::Boolean(BooleanError::UnbalancedSweep { in_a: true, in_b: false })
        ));
    }
}

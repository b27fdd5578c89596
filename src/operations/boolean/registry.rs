use slotmap::SecondaryMap;

use crate::error::Result;
use crate::math::{points_coincide, TOLERANCE};
use crate::topology::{EdgeData, EdgeId, FaceData, FaceId};

use super::scan::CrossingPoint;

/// Everything the pair pass learned about one solid's boundary: where its
/// edges are cut and which side of each cut survives, which stretches of
/// its edges lie along the other solid, and the new edges each face gains.
#[derive(Debug, Default)]
pub struct CrossingRegistry {
    cuts: SecondaryMap<EdgeId, Vec<CrossingPoint>>,
    ranges: SecondaryMap<EdgeId, Vec<(CrossingPoint, CrossingPoint)>>,
    generated: SecondaryMap<FaceId, Vec<EdgeData>>,
}

/// A piece of an original edge between consecutive cuts.
#[derive(Debug, Clone)]
pub struct SubEdge {
    pub edge: EdgeData,
    /// `None` when no recorded cut or range decides the piece.
    pub retained: Option<bool>,
    /// `true` if the piece is the whole original edge.
    pub whole: bool,
}

impl CrossingRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a cut on `cp.edge`; `cp.keep_dir` points into the surviving side.
    pub fn record(&mut self, cp: CrossingPoint) {
        if let Some(entry) = self.cuts.entry(cp.edge) {
            entry.or_default().push(cp);
        }
    }

    /// Records a stretch of `start.edge` lying along the other solid.
    /// `start.keep_dir` points into the stretch if it survives, away otherwise.
    pub fn record_range(&mut self, start: CrossingPoint, end: CrossingPoint) {
        if let Some(entry) = self.ranges.entry(start.edge) {
            entry.or_default().push((start, end));
        }
    }

    /// Adds a new boundary edge to `face` unless an identical one is present.
    pub fn record_generated(&mut self, face: FaceId, edge: EdgeData) {
        let Some(entry) = self.generated.entry(face) else {
            return;
        };
        let edges = entry.or_default();
        let duplicate = edges
            .iter()
            .any(|e| points_coincide(&e.a, &edge.a) && points_coincide(&e.b, &edge.b));
        if !duplicate {
            edges.push(edge);
        }
    }

    /// New edges of `face`.
    #[must_use]
    pub fn generated(&self, face: FaceId) -> &[EdgeData] {
        self.generated.get(face).map_or(&[], Vec::as_slice)
    }

    /// Returns `true` if the edge carries cuts or ranges.
    #[must_use]
    pub fn is_touched(&self, edge: EdgeId) -> bool {
        self.cuts.get(edge).is_some_and(|c| !c.is_empty())
            || self.ranges.get(edge).is_some_and(|r| !r.is_empty())
    }

    /// Returns `true` if the face must be rebuilt from pieces.
    #[must_use]
    pub fn is_part(&self, id: FaceId, face: &FaceData) -> bool {
        !self.generated(id).is_empty() || face.all_edges().any(|e| self.is_touched(e))
    }

    /// Splits an original edge at its recorded cuts and range bounds, and
    /// decides which pieces survive.
    ///
    /// A piece inside a recorded range takes the range's verdict. Otherwise
    /// the cuts at its ends vote; a piece with no vote, or with
    /// conflicting verdicts, is left undecided.
    ///
    /// # Errors
    ///
    /// Returns an error if a piece degenerates.
    pub fn split_edge(&self, id: EdgeId, edge: &EdgeData) -> Result<Vec<SubEdge>> {
        let cuts = self.cuts.get(id).map_or(&[][..], Vec::as_slice);
        let ranges = self.ranges.get(id).map_or(&[][..], Vec::as_slice);
        let tol = TOLERANCE / edge.length();
        let dir = edge.direction();

        // traversal fractions of each range, ordered, with its verdict
        let spans: Vec<(f64, f64, bool)> = ranges
            .iter()
            .map(|(s, e)| {
                let (fs, fe) = (edge.fraction(s.edge_t), edge.fraction(e.edge_t));
                let retained = s.keep_dir.dot(&(e.p - s.p)) > 0.0;
                (fs.min(fe), fs.max(fe), retained)
            })
            .collect();

        let mut bounds: Vec<f64> = cuts
            .iter()
            .map(|c| edge.fraction(c.edge_t))
            .chain(spans.iter().flat_map(|&(lo, hi, _)| [lo, hi]))
            .filter(|f| *f > tol && *f < 1.0 - tol)
            .collect();
        bounds.sort_by(f64::total_cmp);
        bounds.dedup_by(|b, a| (*b - *a).abs() < tol);
        bounds.insert(0, 0.0);
        bounds.push(1.0);

        let whole = bounds.len() == 2;
        let at = |f: f64| edge.a_t + f * (edge.b_t - edge.a_t);
        let mut pieces = Vec::with_capacity(bounds.len() - 1);

        for w in bounds.windows(2) {
            let (f0, f1) = (w[0], w[1]);
            let covering: Vec<bool> = spans
                .iter()
                .filter(|&&(lo, hi, _)| lo - tol <= f0 && f1 <= hi + tol)
                .map(|&(_, _, r)| r)
                .collect();

            let retained = if covering.is_empty() {
                let votes = cuts.iter().filter_map(|c| {
                    let f = edge.fraction(c.edge_t);
                    let along = c.keep_dir.dot(&dir);
                    if (f - f0).abs() < tol {
                        Some(along > 0.0)
                    } else if (f - f1).abs() < tol {
                        Some(along < 0.0)
                    } else {
                        None
                    }
                });
                unanimous(votes)
            } else {
                unanimous(covering.into_iter())
            };

            pieces.push(SubEdge {
                edge: if whole {
                    edge.clone()
                } else {
                    edge.sub_edge(at(f0), at(f1))?
                },
                retained,
                whole,
            });
        }
        Ok(pieces)
    }
}

/// The common verdict, if there is at least one and no disagreement.
fn unanimous(mut votes: impl Iterator<Item = bool>) -> Option<bool> {
    let first = votes.next()?;
    votes.all(|v| v == first).then_some(first)
}

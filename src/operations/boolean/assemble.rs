use std::collections::VecDeque;

use slotmap::SecondaryMap;
use tracing::debug;

use crate::error::{BooleanError, Result, TopologyError};
use crate::geometry::surface::{Containment, FaceSurface, Surface};
use crate::math::polygon_3d::signed_area_3d;
use crate::math::{angle_relative_normal, normalize_angle, points_coincide, Point3, Vector3};
use crate::topology::{EdgeData, EdgeId, FaceData, FaceId};

use super::classify::{Operand, SideClassifier};
use super::registry::CrossingRegistry;

/// A face rebuilt from retained pieces, not yet inserted in the store.
#[derive(Debug, Clone)]
pub struct RebuiltFace {
    pub surface: FaceSurface,
    pub contour: Vec<EdgeData>,
    pub holes: Vec<Vec<EdgeData>>,
}

/// Result of rebuilding one original face.
#[derive(Debug, Default)]
pub struct FaceRebuild {
    pub faces: Vec<RebuiltFace>,
    /// Whole original edges lying on closed loops and clear of the other
    /// solid; flood fill starts here.
    pub seeds: Vec<EdgeId>,
}

/// State of an original face once the pair pass is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceStatus {
    /// Not touched by any intersection; decided later.
    Undecided,
    /// Cut by the other solid; rebuilt from pieces.
    Part,
    /// Entirely in the result; reused as is.
    Inside,
}

struct Candidate {
    edge: EdgeData,
    origin: Option<EdgeId>,
    whole: bool,
}

/// Rebuilds the faces of one operand from the pieces the pair pass kept.
pub struct LoopAssembler<'a> {
    registry: &'a CrossingRegistry,
    operand: Operand,
    own: &'a SideClassifier<'a>,
    other: &'a SideClassifier<'a>,
}

impl<'a> LoopAssembler<'a> {
    #[must_use]
    pub fn new(
        registry: &'a CrossingRegistry,
        operand: Operand,
        own: &'a SideClassifier<'a>,
        other: &'a SideClassifier<'a>,
    ) -> Self {
        Self {
            registry,
            operand,
            own,
            other,
        }
    }

    /// Initial status of every face of the operand.
    #[must_use]
    pub fn initial_status(&self) -> SecondaryMap<FaceId, FaceStatus> {
        self.own
            .faces()
            .iter()
            .map(|&(id, face)| {
                let status = if self.registry.is_part(id, face) {
                    FaceStatus::Part
                } else {
                    FaceStatus::Undecided
                };
                (id, status)
            })
            .collect()
    }

    /// Rebuilds a cut face: gathers retained pieces and generated edges,
    /// walks them into closed loops and nests the loops into faces.
    ///
    /// # Errors
    ///
    /// Returns [`BooleanError::UnclosedLoop`] if a walk runs away, and
    /// [`TopologyError::InvalidTopology`] if loop nesting contradicts
    /// loop orientation.
    pub fn rebuild_face(&self, id: FaceId, face: &FaceData) -> Result<FaceRebuild> {
        let pool = self.candidates(id, face)?;
        let loops = trace_loops(id, face, &pool)?;

        let seeds = loops
            .iter()
            .flatten()
            .filter_map(|&i| pool[i].origin.filter(|_| pool[i].whole))
            .filter(|&edge| !self.registry.is_touched(edge))
            .collect();
        let edge_loops = loops
            .into_iter()
            .map(|l| l.into_iter().map(|i| pool[i].edge.clone()).collect())
            .collect();

        Ok(FaceRebuild {
            faces: nest_loops(&face.surface, edge_loops)?,
            seeds,
        })
    }

    fn candidates(&self, id: FaceId, face: &FaceData) -> Result<Vec<Candidate>> {
        let mut pool: Vec<Candidate> = self
            .registry
            .generated(id)
            .iter()
            .map(|e| Candidate {
                edge: e.clone(),
                origin: None,
                whole: false,
            })
            .collect();

        for edge_id in face.all_edges() {
            let original = self.own.store().edge(edge_id)?;
            for piece in self.registry.split_edge(edge_id, original)? {
                let retained = match piece.retained {
                    Some(r) => r,
                    None => {
                        let mid = piece.edge.midpoint();
                        let normal = face.surface.normal_at(&mid);
                        let inward = normal.cross(&piece.edge.direction());
                        self.operand.keeps_point(self.other, &mid, &inward, &normal)?
                    }
                };
                if retained {
                    pool.push(Candidate {
                        edge: piece.edge,
                        origin: Some(edge_id),
                        whole: piece.whole,
                    });
                }
            }
        }
        Ok(pool)
    }

    /// Marks every undecided face reachable from `seeds` across shared
    /// edges as inside.
    ///
    /// Edges that carry cuts or ranges on either side lie on the other
    /// solid's boundary, so the fill never crosses them.
    ///
    /// # Errors
    ///
    /// Returns an error if an edge is missing from the store.
    pub fn flood_fill(
        &self,
        status: &mut SecondaryMap<FaceId, FaceStatus>,
        seeds: Vec<(FaceId, EdgeId)>,
    ) -> Result<()> {
        let store = self.own.store();
        let mut queue: VecDeque<(FaceId, EdgeId)> = seeds.into();
        while let Some((owner, edge_id)) = queue.pop_front() {
            if self.registry.is_touched(edge_id) {
                continue;
            }
            let edge = store.edge(edge_id)?;
            for (neighbour, shared) in self.own.faces_sharing(edge, owner)? {
                if status.get(neighbour) != Some(&FaceStatus::Undecided)
                    || self.registry.is_touched(shared)
                {
                    continue;
                }
                status.insert(neighbour, FaceStatus::Inside);
                let face = store.face(neighbour)?;
                queue.extend(face.all_edges().map(|e| (neighbour, e)));
            }
        }
        Ok(())
    }

    /// Decides the faces the flood fill left undecided.
    ///
    /// Undecided faces are grouped through shared edges into connected
    /// groups; one interior point of each group is probed against the other
    /// solid and the verdict applies to the whole group.
    ///
    /// # Errors
    ///
    /// Returns an error if a probe cannot be classified.
    pub fn resolve_undecided(&self, status: &mut SecondaryMap<FaceId, FaceStatus>) -> Result<()> {
        let store = self.own.store();
        let mut seen: SecondaryMap<FaceId, ()> = SecondaryMap::new();

        for &(start, _) in self.own.faces() {
            if seen.contains_key(start) || status.get(start) != Some(&FaceStatus::Undecided) {
                continue;
            }
            let mut component = Vec::new();
            let mut queue = VecDeque::from([start]);
            seen.insert(start, ());
            while let Some(id) = queue.pop_front() {
                component.push(id);
                let face = store.face(id)?;
                for edge_id in face.all_edges() {
                    for (neighbour, _) in self.own.faces_sharing(store.edge(edge_id)?, id)? {
                        if status.get(neighbour) == Some(&FaceStatus::Undecided)
                            && seen.insert(neighbour, ()).is_none()
                        {
                            queue.push_back(neighbour);
                        }
                    }
                }
            }

            let face = store.face(start)?;
            let sample = face.interior_sample(store)?;
            let normal = face.surface.normal_at(&sample);
            let keep = self.operand.keeps_point(self.other, &sample, &Vector3::zeros(), &normal)?;
            debug!(faces = component.len(), keep, "probed undecided group");
            if keep {
                for id in component {
                    status.insert(id, FaceStatus::Inside);
                }
            }
        }
        Ok(())
    }
}

/// Walks the candidate pool into closed loops, turning as far left as
/// possible at each vertex.
///
/// Walks that dead-end are discarded. Whole original edges may be left
/// over that way; a cut piece or generated edge left over means the
/// boundary cannot be closed and fails with [`BooleanError::UnclosedLoop`].
fn trace_loops(id: FaceId, face: &FaceData, pool: &[Candidate]) -> Result<Vec<Vec<usize>>> {
    let mut used = vec![false; pool.len()];
    let mut loops: Vec<Vec<usize>> = Vec::new();

    for start in 0..pool.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let mut walk = vec![start];
        let mut closed = false;

        while let Some(&last) = walk.last() {
            let current = &pool[last].edge;
            let end = current.b;
            let back = -current.b_dir;
            let normal = face.surface.normal_at(&end);

            let next = (0..pool.len())
                .filter(|&k| (!used[k] || k == start) && points_coincide(&pool[k].edge.a, &end))
                .map(|k| {
                    let turn = normalize_angle(angle_relative_normal(&back, &pool[k].edge.a_dir, &normal));
                    (k, turn)
                })
                .max_by(|a, b| a.1.total_cmp(&b.1));

            match next {
                Some((k, _)) if k == start => {
                    closed = true;
                    break;
                }
                Some((k, _)) if !revisits(pool, &walk, &end) => {
                    used[k] = true;
                    walk.push(k);
                }
                _ => break,
            }
        }

        if closed {
            loops.push(walk);
        } else {
            debug!(face = ?id, start = ?pool[start].edge.a, "discarding open walk");
            for &k in &walk {
                used[k] = false;
            }
        }
    }

    let mut on_loop = vec![false; pool.len()];
    for &k in loops.iter().flatten() {
        on_loop[k] = true;
    }
    let stray: Vec<usize> = (0..pool.len())
        .filter(|&k| !on_loop[k] && !pool[k].whole)
        .collect();
    if !stray.is_empty() {
        return Err(BooleanError::UnclosedLoop {
            face: format!("{id:?}"),
            points: stray
                .iter()
                .flat_map(|&k| [pool[k].edge.a, pool[k].edge.b])
                .collect(),
        }
        .into());
    }
    Ok(loops)
}

/// `true` if `end` is the start of an edge already walked, other than the first.
fn revisits(pool: &[Candidate], walk: &[usize], end: &Point3) -> bool {
    walk.iter().skip(1).any(|&i| points_coincide(&pool[i].edge.a, end))
}

/// Groups closed loops into faces.
///
/// Loops are placed from largest to smallest area; each one's parent is
/// the smallest loop already placed that contains it. Counterclockwise
/// loops must sit at even depth and become contours, clockwise loops at
/// odd depth become holes of their parent.
fn nest_loops(surface: &FaceSurface, loops: Vec<Vec<EdgeData>>) -> Result<Vec<RebuiltFace>> {
    struct Node {
        edges: Vec<EdgeData>,
        points: Vec<Point3>,
        parent: Option<usize>,
        depth: usize,
    }

    let mut nodes: Vec<Node> = loops
        .into_iter()
        .map(|edges| Node {
            points: edges.iter().map(|e| e.a).collect(),
            edges,
            parent: None,
            depth: 0,
        })
        .collect();
    let area = |pts: &[Point3]| match pts.first() {
        Some(first) => signed_area_3d(pts, &surface.normal_at(first)).abs(),
        None => 0.0,
    };
    let mut order: Vec<usize> = (0..nodes.len()).collect();
    order.sort_by(|&a, &b| area(&nodes[b].points).total_cmp(&area(&nodes[a].points)));

    let mut placed: Vec<usize> = Vec::with_capacity(nodes.len());
    for &i in &order {
        let parent = placed
            .iter()
            .rev()
            .copied()
            .find(|&j| loop_inside(surface, &nodes[i].points, &nodes[j].points));
        let depth = parent.map_or(0, |j| nodes[j].depth + 1);
        let ccw = surface.edge_loop_ccw(&nodes[i].points);
        if ccw != (depth % 2 == 0) {
            return Err(TopologyError::InvalidTopology(format!(
                "{} loop at nesting depth {depth}",
                if ccw { "counterclockwise" } else { "clockwise" }
            ))
            .into());
        }
        nodes[i].parent = parent;
        nodes[i].depth = depth;
        placed.push(i);
    }

    let mut faces = Vec::new();
    for i in 0..nodes.len() {
        if nodes[i].depth % 2 != 0 {
            continue;
        }
        let holes = (0..nodes.len())
            .filter(|&k| nodes[k].parent == Some(i))
            .map(|k| nodes[k].edges.clone())
            .collect();
        faces.push(RebuiltFace {
            surface: surface.clone(),
            contour: nodes[i].edges.clone(),
            holes,
        });
    }
    Ok(faces)
}

/// `true` if the first vertex of `inner` not lying on `outer` is inside it.
fn loop_inside(surface: &FaceSurface, inner: &[Point3], outer: &[Point3]) -> bool {
    inner
        .iter()
        .map(|p| surface.loop_contains_point(outer, p))
        .find(|c| *c != Containment::OnEdge)
        .is_some_and(|c| c == Containment::Inside)
}

use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::geometry::curve::Line;
use crate::geometry::surface::Surface;
use crate::math::{Point3, Vector3};
use crate::operations::query::Aabb;
use crate::topology::{EdgeData, FaceData, FaceId, SolidData, SolidId, TopologyStore};

use super::assemble::{FaceStatus, LoopAssembler, RebuiltFace};
use super::classify::{Operand, SideClass, SideClassifier};
use super::registry::CrossingRegistry;
use super::scan::{scan, CrossingPoint};
use super::sweep::{merge, SweepSpan};

/// What one face pair contributes to each operand's registry.
#[derive(Debug, Default)]
struct PairRecords {
    cuts: [Vec<CrossingPoint>; 2],
    ranges: [Vec<(CrossingPoint, CrossingPoint)>; 2],
    generated: [Vec<(FaceId, EdgeData)>; 2],
}

impl PairRecords {
    fn absorb_into(self, registries: &mut [CrossingRegistry; 2]) {
        for (side, registry) in registries.iter_mut().enumerate() {
            for cp in self.cuts[side].iter().cloned() {
                registry.record(cp);
            }
            for (start, end) in self.ranges[side].iter().cloned() {
                registry.record_range(start, end);
            }
            for (face, edge) in self.generated[side].iter().cloned() {
                registry.record_generated(face, edge);
            }
        }
    }
}

/// Faces of the result before they are written to the store.
#[derive(Debug, Default)]
struct Selection {
    reused: Vec<FaceId>,
    rebuilt: Vec<RebuiltFace>,
}

/// Intersects two solids, inserting the result into the store.
///
/// `keep` selects which operands contribute faces to the result. Inputs are
/// not modified. Returns `None` when the result has no faces.
///
/// # Errors
///
/// Fails as a whole, with no partial result, on any unresolvable situation:
/// see [`crate::error::BooleanError`].
#[instrument(skip(store))]
pub fn boolean_intersect(
    store: &mut TopologyStore,
    solid_a: SolidId,
    solid_b: SolidId,
    keep: [bool; 2],
) -> Result<Option<SolidId>> {
    let (selection, infinite_volume) = {
        let shared: &TopologyStore = store;
        let classifiers = [
            SideClassifier::new(shared, solid_a)?,
            SideClassifier::new(shared, solid_b)?,
        ];
        let registries = collect_crossings(shared, &classifiers)?;

        let mut selection = Selection::default();
        for (side, operand) in [Operand::A, Operand::B].into_iter().enumerate() {
            if keep[side] {
                select_faces(
                    &registries[side],
                    operand,
                    &classifiers[side],
                    &classifiers[1 - side],
                    &mut selection,
                )?;
            }
        }
        let infinite = classifiers[0].infinite_volume() && classifiers[1].infinite_volume();
        (selection, infinite)
    };

    info!(
        reused = selection.reused.len(),
        rebuilt = selection.rebuilt.len(),
        "boolean intersection assembled"
    );
    if selection.reused.is_empty() && selection.rebuilt.is_empty() {
        return Ok(None);
    }

    let mut faces = selection.reused;
    for rebuilt in selection.rebuilt {
        faces.push(insert_face(store, rebuilt));
    }
    Ok(Some(store.add_solid(SolidData {
        faces,
        infinite_volume,
    })))
}

/// Runs every face pair in parallel and merges what they record.
fn collect_crossings(
    store: &TopologyStore,
    classifiers: &[SideClassifier<'_>; 2],
) -> Result<[CrossingRegistry; 2]> {
    let faces_a = classifiers[0].faces();
    let faces_b = classifiers[1].faces();
    let boxes = |faces: &[(FaceId, &FaceData)]| {
        faces
            .iter()
            .map(|(_, face)| planar_bounds(store, face))
            .collect::<Result<Vec<_>>>()
    };
    let (boxes_a, boxes_b) = (boxes(faces_a)?, boxes(faces_b)?);

    let pairs: Vec<(usize, usize)> = (0..faces_a.len())
        .flat_map(|i| (0..faces_b.len()).map(move |j| (i, j)))
        .filter(|&(i, j)| match (&boxes_a[i], &boxes_b[j]) {
            (Some(a), Some(b)) => a.overlaps(b),
            _ => true,
        })
        .collect();
    info!(pairs = pairs.len(), "intersecting face pairs");

    let records = pairs
        .par_iter()
        .map(|&(i, j)| process_pair(store, classifiers, [faces_a[i], faces_b[j]]))
        .collect::<Result<Vec<_>>>()?;

    let mut registries = [CrossingRegistry::new(), CrossingRegistry::new()];
    for record in records {
        record.absorb_into(&mut registries);
    }
    Ok(registries)
}

/// Bounding box of a planar face; curved faces are never skipped.
fn planar_bounds(store: &TopologyStore, face: &FaceData) -> Result<Option<Aabb>> {
    if face.surface.as_plane().is_none() {
        return Ok(None);
    }
    Ok(Aabb::from_points(&store.loop_points(&face.contour)?))
}

/// Intersects one face of A with one face of B.
fn process_pair(
    store: &TopologyStore,
    classifiers: &[SideClassifier<'_>; 2],
    faces: [(FaceId, &FaceData); 2],
) -> Result<PairRecords> {
    let mut records = PairRecords::default();
    let [(_, face_a), (_, face_b)] = faces;
    if face_a.surface.is_coplanar_to(&face_b.surface) {
        return Ok(records);
    }

    for curve in face_a.surface.intersection_curves(&face_b.surface)? {
        let mut events_a = scan(store, face_a, &curve, &face_b.surface)?;
        let mut events_b = scan(store, face_b, &curve, &face_a.surface)?;
        if events_a.is_empty() || events_b.is_empty() {
            continue;
        }
        let spans = merge(&mut events_a, &mut events_b, [false, false], &curve)?;
        debug!(
            face_a = ?faces[0].0,
            face_b = ?faces[1].0,
            spans = spans.len(),
            "merged crossings"
        );
        for span in &spans {
            resolve_span(
                store,
                classifiers,
                faces,
                [&events_a, &events_b],
                &curve,
                span,
                &mut records,
            )?;
        }
    }
    Ok(records)
}

/// Turns one shared span into cuts, ranges and new edges on both faces.
///
/// The curve runs along `n_a × n_b`; seen from face B it is traversed the
/// other way so that "left of the curve" keeps meaning "inside the face".
fn resolve_span(
    store: &TopologyStore,
    classifiers: &[SideClassifier<'_>; 2],
    faces: [(FaceId, &FaceData); 2],
    events: [&[CrossingPoint]; 2],
    curve: &Line,
    span: &SweepSpan,
    records: &mut PairRecords,
) -> Result<()> {
    let u = *curve.direction();
    let normals = faces.map(|(_, face)| face.surface.normal_at(&span.start));

    for (side, operand) in [Operand::A, Operand::B].into_iter().enumerate() {
        let other = 1 - side;
        let normal = normals[side];
        let along = if side == 0 { u } else { -u };
        let across = normal.cross(&along);

        let kept = |dir: &Vector3| -> Result<bool> {
            let class = match span.colinear[other] {
                Some(edge) => classifiers[other].classify(store.edge(edge)?, dir, &normal)?,
                None if dir.dot(&normals[other]) < 0.0 => SideClass::Inside,
                None => SideClass::Outside,
            };
            Ok(operand.keeps(class))
        };

        match span.colinear[side] {
            None => {
                let keep_left = kept(&across)?;
                if keep_left == kept(&-across)? {
                    continue;
                }
                let (dir, keep_side) = if keep_left {
                    (along, across)
                } else {
                    (-along, -across)
                };
                let (from, to) = if dir.dot(&u) > 0.0 {
                    (span.start_t, span.end_t)
                } else {
                    (span.end_t, span.start_t)
                };
                records.generated[side].push((faces[side].0, EdgeData::on_line(curve.clone(), from, to)?));

                for index in [span.opened_by[side], span.closed_by[side]].into_iter().flatten() {
                    let cp = &events[side][index];
                    if !cp.colinear {
                        records.cuts[side].push(cp.clone().with_keep_dir(keep_side));
                    }
                }
            }
            Some(edge_id) => {
                let edge = store.edge(edge_id)?;
                let retained = kept(&normal.cross(&edge.direction()))?;
                let into = (span.end - span.start).normalize();
                let keep = if retained { into } else { -into };
                let bound = |p: Point3| {
                    CrossingPoint::on_curve(curve, p, edge_id, edge.param_of(&p), into, true)
                };
                records.ranges[side].push((
                    bound(span.start)?.with_keep_dir(keep),
                    bound(span.end)?.with_keep_dir(-keep),
                ));
            }
        }
    }
    Ok(())
}

/// Decides every face of one operand and adds the survivors to `selection`.
fn select_faces(
    registry: &CrossingRegistry,
    operand: Operand,
    own: &SideClassifier<'_>,
    other: &SideClassifier<'_>,
    selection: &mut Selection,
) -> Result<()> {
    let assembler = LoopAssembler::new(registry, operand, own, other);
    let mut status = assembler.initial_status();

    let parts: Vec<(FaceId, &FaceData)> = own
        .faces()
        .iter()
        .copied()
        .filter(|&(id, _)| status.get(id) == Some(&FaceStatus::Part))
        .collect();
    let rebuilds = parts
        .par_iter()
        .map(|&(id, face)| Ok((id, assembler.rebuild_face(id, face)?)))
        .collect::<Result<Vec<_>>>()?;

    let seeds = rebuilds
        .iter()
        .flat_map(|(id, rebuild)| rebuild.seeds.iter().map(move |&edge| (*id, edge)))
        .collect();
    assembler.flood_fill(&mut status, seeds)?;
    assembler.resolve_undecided(&mut status)?;

    debug!(
        ?operand,
        parts = parts.len(),
        inside = status.values().filter(|s| **s == FaceStatus::Inside).count(),
        "faces classified"
    );
    selection.reused.extend(
        own.faces()
            .iter()
            .filter(|&&(id, _)| status.get(id) == Some(&FaceStatus::Inside))
            .map(|&(id, _)| id),
    );
    selection
        .rebuilt
        .extend(rebuilds.into_iter().flat_map(|(_, rebuild)| rebuild.faces));
    Ok(())
}

fn insert_face(store: &mut TopologyStore, face: RebuiltFace) -> FaceId {
    let contour = face.contour.into_iter().map(|e| store.add_edge(e)).collect();
    let holes = face
        .holes
        .into_iter()
        .map(|hole| hole.into_iter().map(|e| store.add_edge(e)).collect())
        .collect();
    store.add_face(FaceData {
        surface: face.surface,
        contour,
        holes,
    })
}

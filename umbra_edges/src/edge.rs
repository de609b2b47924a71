// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`Edge`] segment primitive: construction, orientation, intersection
//! identification, and proximity thresholds.

use alloc::vec::Vec;
use core::cmp::Ordering;

use kurbo::{Point, Rect};
use smallvec::SmallVec;

use crate::types::{Channel, EdgeId, EdgeKind, ObjectId, Sense, Side, Threshold};

/// A point where two edges cross, with the parametric position along each.
///
/// `t0` is the position along the owning edge's `a -> b` span and `t1` the
/// position along the partner's; both lie in `[0, 1]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Intersection {
    /// The crossing point.
    pub point: Point,
    /// Parametric position along the owning edge.
    pub t0: f64,
    /// Parametric position along the partner edge.
    pub t1: f64,
}

/// A recorded crossing with another edge.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeIntersection {
    /// Id of the partner edge.
    pub edge: EdgeId,
    /// Where and how the two edges cross.
    pub intersection: Intersection,
}

/// Optional configuration for [`Edge::new`].
///
/// Every field has a non-restricting default: senses are [`Sense::None`],
/// the direction blocks both sides, and there is no threshold.
#[derive(Clone, Debug, Default)]
pub struct EdgeOptions {
    /// Edge kind tag. Defaults to [`EdgeKind::Wall`].
    pub kind: EdgeKind,
    /// Non-owning handle to the owning domain object.
    pub object: Option<ObjectId>,
    /// Restriction for the light channel.
    pub light: Sense,
    /// Restriction for the movement channel.
    pub movement: Sense,
    /// Restriction for the sight channel.
    pub sight: Sense,
    /// Restriction for the sound channel.
    pub sound: Sense,
    /// Which approach sides the edge blocks.
    pub direction: Side,
    /// Optional per-channel threshold distances.
    pub threshold: Option<Threshold>,
    /// Tie-break / significance value for consumers.
    pub priority: i32,
}

/// A blocking line segment with per-channel restriction semantics.
///
/// Endpoints are fixed at construction: geometry changes are expressed by
/// building a replacement edge, never by mutating one in place, so the
/// canonical corners and `bounds` can never go stale under a spatial index.
#[derive(Clone, Debug)]
pub struct Edge {
    /// Stable identifier; the map key in [`CanvasEdges`](crate::CanvasEdges).
    pub id: EdgeId,
    /// Edge kind tag.
    pub kind: EdgeKind,
    /// Non-owning handle to the owning domain object.
    pub object: Option<ObjectId>,
    /// Restriction for the light channel.
    pub light: Sense,
    /// Restriction for the movement channel.
    pub movement: Sense,
    /// Restriction for the sight channel.
    pub sight: Sense,
    /// Restriction for the sound channel.
    pub sound: Sense,
    /// Which approach sides the edge blocks.
    pub direction: Side,
    /// Optional per-channel threshold distances.
    pub threshold: Option<Threshold>,
    /// Tie-break / significance value for consumers.
    pub priority: i32,
    /// Consumer-owned cache slot for derived state at endpoint `a`.
    ///
    /// Typically an arena key assigned by a sweep algorithm. The edge never
    /// interprets or mutates it; [`Clone`] preserves it.
    pub vertex_a: Option<u64>,
    /// Consumer-owned cache slot for derived state at endpoint `b`.
    pub vertex_b: Option<u64>,
    a: Point,
    b: Point,
    nw: Point,
    se: Point,
    bounds: Rect,
    intersections: SmallVec<[EdgeIntersection; 4]>,
}

impl Edge {
    /// Create an edge between `a` and `b`.
    ///
    /// The supplied endpoint order is kept in [`a`](Self::a)/[`b`](Self::b);
    /// the canonical corners [`nw`](Self::nw)/[`se`](Self::se) reorder them
    /// so that `nw.x <= se.x`, with `nw.y <= se.y` on a vertical tie.
    pub fn new(a: Point, b: Point, id: EdgeId, options: EdgeOptions) -> Self {
        let b_is_se = b.x > a.x || (b.x == a.x && b.y > a.y);
        let (nw, se) = if b_is_se { (a, b) } else { (b, a) };
        Self {
            id,
            kind: options.kind,
            object: options.object,
            light: options.light,
            movement: options.movement,
            sight: options.sight,
            sound: options.sound,
            direction: options.direction,
            threshold: options.threshold,
            priority: options.priority,
            vertex_a: None,
            vertex_b: None,
            a,
            b,
            nw,
            se,
            bounds: Rect::from_points(a, b),
            intersections: SmallVec::new(),
        }
    }

    /// First endpoint, in the order originally supplied.
    pub fn a(&self) -> Point {
        self.a
    }

    /// Second endpoint, in the order originally supplied.
    pub fn b(&self) -> Point {
        self.b
    }

    /// The top-left-most endpoint under the canonical ordering.
    pub fn nw(&self) -> Point {
        self.nw
    }

    /// The bottom-right-most endpoint under the canonical ordering.
    pub fn se(&self) -> Point {
        self.se
    }

    /// Axis-aligned bounding rectangle of the segment, with non-negative
    /// extents.
    ///
    /// Degenerate for horizontal or vertical edges; spatial indexing treats
    /// zero-extent rectangles as first-class.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// The restriction configured for `channel`.
    pub fn sense(&self, channel: Channel) -> Sense {
        match channel {
            Channel::Light => self.light,
            Channel::Movement => self.movement,
            Channel::Sight => self.sight,
            Channel::Sound => self.sound,
        }
    }

    /// True iff the channel's restriction is exactly [`Sense::Limited`].
    pub fn is_limited(&self, channel: Channel) -> bool {
        self.sense(channel) == Sense::Limited
    }

    /// Crossings recorded by the most recent identification pass.
    pub fn intersections(&self) -> &[EdgeIntersection] {
        &self.intersections
    }

    /// Which side of the directed segment `a -> b` a point lies on.
    ///
    /// Collinear points report [`Side::BOTH`].
    pub fn orient_point(&self, point: Point) -> Side {
        let cross = (self.b - self.a).cross(point - self.a);
        if cross > 0.0 {
            Side::LEFT
        } else if cross < 0.0 {
            Side::RIGHT
        } else {
            Side::BOTH
        }
    }

    /// Compute the crossing between this edge and `other`, if any.
    ///
    /// Self-comparison, edges sharing an endpoint (exact equality), and
    /// collinear pairs all resolve to `None`. A cheap orientation test
    /// rejects non-crossing pairs before the exact solve; on large edge
    /// sets nearly every candidate pair exits there.
    pub fn intersection(&self, other: &Self) -> Option<Intersection> {
        if self.id == other.id {
            return None;
        }
        // Shared endpoints are meeting points, not crossings.
        if self.a == other.a || self.a == other.b || self.b == other.a || self.b == other.b {
            return None;
        }
        if !segments_straddle(self.a, self.b, other.a, other.b) {
            return None;
        }
        let r = self.b - self.a;
        let s = other.b - other.a;
        let denom = r.cross(s);
        if denom == 0.0 {
            // Collinear overlap has no single well-defined point.
            return None;
        }
        let qp = other.a - self.a;
        let t0 = qp.cross(s) / denom;
        let t1 = qp.cross(r) / denom;
        Some(Intersection {
            point: self.a + t0 * r,
            t0,
            t1,
        })
    }

    /// Decide whether a threshold condition excludes this edge from blocking
    /// `channel` for a source at `origin`.
    ///
    /// Returns false when no threshold distance is configured for the
    /// channel or its sense is below [`Sense::Proximity`]. Otherwise the
    /// distance from `origin` to the closest point on the segment decides:
    /// a [`Sense::Proximity`] edge stops blocking while
    /// `max(distance - external_radius, 0) < threshold`, a
    /// [`Sense::Distance`] edge while `distance + external_radius > threshold`.
    pub fn apply_threshold(&self, channel: Channel, origin: Point, external_radius: f64) -> bool {
        let Some(threshold) = self.threshold else {
            return false;
        };
        let Some(distance) = threshold.distance(channel) else {
            return false;
        };
        if distance == 0.0 {
            return false;
        }
        let sense = self.sense(channel);
        if sense < Sense::Proximity {
            return false;
        }
        let source_distance = (origin - self.closest_point(origin)).hypot();
        if sense == Sense::Proximity {
            (source_distance - external_radius).max(0.0) < distance
        } else {
            source_distance + external_radius > distance
        }
    }

    /// Compute the crossing with `other` and record it on both edges.
    ///
    /// Records are symmetric: the partner receives the same point with the
    /// parametric roles swapped.
    pub fn record_intersections(&mut self, other: &mut Self) {
        let Some(ix) = self.intersection(other) else {
            return;
        };
        self.intersections.push(EdgeIntersection {
            edge: other.id.clone(),
            intersection: ix,
        });
        other.intersections.push(EdgeIntersection {
            edge: self.id.clone(),
            intersection: Intersection {
                point: ix.point,
                t0: ix.t1,
                t1: ix.t0,
            },
        });
    }

    /// Drop any recorded crossings with the edge identified by `id`.
    pub fn remove_intersection_with(&mut self, id: &EdgeId) {
        self.intersections.retain(|rec| &rec.edge != id);
    }

    /// Drop all recorded crossings.
    pub fn clear_intersections(&mut self) {
        self.intersections.clear();
    }

    /// Recompute every edge's intersection records from scratch.
    ///
    /// Edges are sorted by `(nw.x, se.x)` and swept with two indices; the
    /// inner scan stops as soon as a candidate starts strictly to the right
    /// of the current edge's rightmost extent, which bounds the pairwise
    /// work by actual x-axis overlap instead of n².
    pub fn identify_edge_intersections<'a, I>(edges: I)
    where
        I: IntoIterator<Item = &'a mut Self>,
    {
        let mut edges: Vec<&'a mut Self> = edges.into_iter().collect();
        for edge in &mut edges {
            edge.clear_intersections();
        }
        edges.sort_by(|x, y| sweep_order(x, y));
        for i in 0..edges.len() {
            for j in (i + 1)..edges.len() {
                if edges[j].nw.x > edges[i].se.x {
                    break;
                }
                let (head, tail) = edges.split_at_mut(j);
                let lhs: &mut Self = &mut *head[i];
                let rhs: &mut Self = &mut *tail[0];
                lhs.record_intersections(rhs);
            }
        }
    }

    /// Closest point to `p` on the segment `[a, b]`.
    fn closest_point(&self, p: Point) -> Point {
        let ab = self.b - self.a;
        let len2 = ab.hypot2();
        if len2 == 0.0 {
            return self.a;
        }
        let t = ((p - self.a).dot(ab) / len2).clamp(0.0, 1.0);
        self.a + t * ab
    }
}

/// Sweep ordering: ascending `nw.x`, ties broken by ascending `se.x`.
fn sweep_order(x: &Edge, y: &Edge) -> Ordering {
    x.nw
        .x
        .partial_cmp(&y.nw.x)
        .unwrap_or(Ordering::Equal)
        .then(x.se.x.partial_cmp(&y.se.x).unwrap_or(Ordering::Equal))
}

/// Orientation fast-reject: the segments can only cross if each straddles
/// the other's supporting line (endpoint orientations do not share a sign).
fn segments_straddle(a: Point, b: Point, c: Point, d: Point) -> bool {
    let ab = b - a;
    let cd = d - c;
    let o1 = ab.cross(c - a);
    let o2 = ab.cross(d - a);
    let o3 = cd.cross(a - c);
    let o4 = cd.cross(b - c);
    o1 * o2 <= 0.0 && o3 * o4 <= 0.0
}

// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`CanvasEdges`]: the keyed edge collection that keeps a quadtree
//! synchronized with every mutation and carries the scene boundary edges.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use kurbo::{Point, Rect};
use umbra_quadtree::{Key as QuadKey, Quadtree};

use crate::edge::{Edge, EdgeOptions};
use crate::types::{EdgeId, EdgeKind, Sense};

/// Outer canvas rectangle and inner (padding-inset) scene rectangle.
///
/// When the two rectangles are equal the scene has no padding and the inner
/// boundary aliases the outer one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SceneDimensions {
    /// The full canvas rectangle, including padding.
    pub bounds: Rect,
    /// The scene rectangle proper.
    pub scene_rect: Rect,
}

impl SceneDimensions {
    /// Dimensions without padding: the scene fills the canvas.
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            scene_rect: bounds,
        }
    }

    /// Dimensions for a scene rectangle surrounded by `padding` on each side.
    pub fn with_padding(scene_rect: Rect, padding: f64) -> Self {
        Self {
            bounds: scene_rect.inflate(padding, padding),
            scene_rect,
        }
    }

    /// True when the inner scene rectangle differs from the canvas bounds.
    pub fn has_padding(&self) -> bool {
        self.scene_rect != self.bounds
    }
}

/// A contributor of edges during [`CanvasEdges::initialize`].
///
/// Wall-like domain objects, darkness-emitting sources, and out-of-tree
/// plugins all enter through this one seam; providers are invoked in the
/// order the caller lists them.
pub trait EdgeProvider {
    /// Register this provider's edges via [`CanvasEdges::set`].
    fn register_edges(&self, edges: &mut CanvasEdges);
}

/// Options for [`CanvasEdges::get_edges`].
///
/// Boundary edges never live in the spatial index, so a pure range query
/// cannot return them; the two `include_*` flags union them into the result
/// unconditionally. The collision test applies to indexed candidates only.
#[derive(Clone, Copy)]
pub struct EdgeQuery<'a> {
    /// Union the four outer boundary edges into the result.
    pub include_outer_bounds: bool,
    /// Union the four inner boundary edges into the result.
    pub include_inner_bounds: bool,
    /// Domain-specific rejection test for indexed candidates, for example
    /// "does this edge restrict the sight channel at all".
    pub collision_test: Option<&'a dyn Fn(&Edge) -> bool>,
}

/// Outer bounds included, inner bounds not, no collision test.
impl Default for EdgeQuery<'_> {
    fn default() -> Self {
        Self {
            include_outer_bounds: true,
            include_inner_bounds: false,
            collision_test: None,
        }
    }
}

impl fmt::Debug for EdgeQuery<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdgeQuery")
            .field("include_outer_bounds", &self.include_outer_bounds)
            .field("include_inner_bounds", &self.include_inner_bounds)
            .field("collision_test", &self.collision_test.map(|_| "..."))
            .finish()
    }
}

#[derive(Clone, Debug)]
struct Slot {
    edge: Edge,
    quad_key: Option<QuadKey>,
}

/// The edge collection for one scene: a map keyed by [`EdgeId`] paired with
/// a quadtree over non-boundary edge bounds.
///
/// Invariant: at every observable point, every non-boundary edge in the map
/// is present in the quadtree under its (normalized) bounds, and no
/// boundary edge ever is. Mutations uphold this within a single call.
///
/// One instance exists per active scene, owned by whatever orchestrates
/// scene lifecycle; [`initialize`](Self::initialize) and
/// [`clear`](Self::clear) bind to scene load and unload.
pub struct CanvasEdges {
    slots: Vec<Option<Slot>>,
    free_list: Vec<usize>,
    by_id: HashMap<EdgeId, usize>,
    index: Quadtree<usize>,
    outer_bounds: Vec<EdgeId>,
    inner_bounds: Vec<EdgeId>,
}

impl CanvasEdges {
    /// Create an empty collection whose spatial index spans `bounds`.
    pub fn new(bounds: Rect) -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            by_id: HashMap::new(),
            index: Quadtree::new(bounds),
            outer_bounds: Vec::new(),
            inner_bounds: Vec::new(),
        }
    }

    /// Full rebuild for a (re)loaded scene.
    ///
    /// Clears all state, re-centers the spatial index on
    /// `dimensions.bounds`, invokes every provider in order, then registers
    /// the boundary edges: four `outerBounds.*` edges for the canvas
    /// rectangle and, only when padding makes the scene rectangle distinct,
    /// four `innerBounds.*` edges — otherwise the inner boundary aliases
    /// the outer edges without duplicating them.
    ///
    /// Does not compute intersections; call [`refresh`](Self::refresh) once
    /// all edges for the scene are present.
    pub fn initialize<'a, I>(&mut self, dimensions: &SceneDimensions, providers: I)
    where
        I: IntoIterator<Item = &'a dyn EdgeProvider>,
    {
        self.clear();
        self.index = Quadtree::new(dimensions.bounds);
        for provider in providers {
            provider.register_edges(self);
        }
        self.outer_bounds = self.register_boundary(dimensions.bounds, EdgeKind::OuterBounds);
        self.inner_bounds = if dimensions.has_padding() {
            self.register_boundary(dimensions.scene_rect, EdgeKind::InnerBounds)
        } else {
            self.outer_bounds.clone()
        };
    }

    /// Insert or replace the edge stored under `id`.
    ///
    /// Any previous edge at that key leaves the spatial index first, so the
    /// index never holds two entries for one key. Non-boundary edges are
    /// indexed under their bounds. Returns the collection for chaining.
    ///
    /// The key should equal `edge.id`; intersection bookkeeping resolves
    /// partners through the map by the edge's own id.
    pub fn set(&mut self, id: EdgeId, edge: Edge) -> &mut Self {
        debug_assert_eq!(id, edge.id, "map key must match the edge id");
        let bounds = edge.bounds();
        let indexed = !edge.kind.is_boundary();
        match self.by_id.get(&id).copied() {
            Some(slot_idx) => {
                let slot = self.slots[slot_idx].as_mut().expect("dangling edge slot");
                slot.edge = edge;
                let previous = slot.quad_key.take();
                if let Some(key) = previous {
                    self.index.remove(key);
                }
                if indexed {
                    let key = self.index.insert(bounds, slot_idx);
                    self.slots[slot_idx]
                        .as_mut()
                        .expect("dangling edge slot")
                        .quad_key = Some(key);
                }
            }
            None => {
                let slot_idx = if let Some(idx) = self.free_list.pop() {
                    idx
                } else {
                    self.slots.push(None);
                    self.slots.len() - 1
                };
                let quad_key = indexed.then(|| self.index.insert(bounds, slot_idx));
                self.slots[slot_idx] = Some(Slot { edge, quad_key });
                self.by_id.insert(id, slot_idx);
            }
        }
        self
    }

    /// Remove the edge stored under `id`.
    ///
    /// The spatial index entry and the map entry go together, and any
    /// reciprocal intersection records on partner edges are purged so no
    /// dangling references to the removed edge remain. Returns whether a
    /// removal occurred; unknown ids are a safe no-op.
    pub fn delete(&mut self, id: &EdgeId) -> bool {
        let Some(slot_idx) = self.by_id.remove(id) else {
            return false;
        };
        let Some(slot) = self.slots[slot_idx].take() else {
            return false;
        };
        self.free_list.push(slot_idx);
        if let Some(key) = slot.quad_key {
            self.index.remove(key);
        }
        for record in slot.edge.intersections() {
            if let Some(&partner_idx) = self.by_id.get(&record.edge)
                && let Some(partner) = self.slots[partner_idx].as_mut()
            {
                partner.edge.remove_intersection_with(id);
            }
        }
        self.outer_bounds.retain(|bid| bid != id);
        self.inner_bounds.retain(|bid| bid != id);
        true
    }

    /// Empty the map, the spatial index, and both boundary lists together.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
        self.by_id.clear();
        self.index.clear();
        self.outer_bounds.clear();
        self.inner_bounds.clear();
    }

    /// Recompute every edge's intersection records from scratch.
    ///
    /// A full pass over all current values, boundary edges included. Must
    /// be called explicitly after a batch of mutations and before relying
    /// on per-edge [`intersections`](Edge::intersections); individual
    /// `set`/`delete` calls never trigger it implicitly.
    pub fn refresh(&mut self) {
        Edge::identify_edge_intersections(
            self.slots
                .iter_mut()
                .filter_map(|slot| slot.as_mut())
                .map(|slot| &mut slot.edge),
        );
    }

    /// The edge stored under `id`, if any.
    pub fn get(&self, id: &EdgeId) -> Option<&Edge> {
        let &slot_idx = self.by_id.get(id)?;
        self.slots[slot_idx].as_ref().map(|slot| &slot.edge)
    }

    /// Whether an edge is stored under `id`.
    pub fn contains(&self, id: &EdgeId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Number of stored edges, boundary edges included.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// True when no edges are stored.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Iterate all stored edges in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Edge> {
        self.slots
            .iter()
            .filter_map(|slot| slot.as_ref())
            .map(|slot| &slot.edge)
    }

    /// The four outer boundary edges (aliased by the inner boundary when
    /// the scene has no padding).
    pub fn outer_bounds(&self) -> impl Iterator<Item = &Edge> {
        self.outer_bounds.iter().filter_map(|id| self.get(id))
    }

    /// The four inner boundary edges.
    pub fn inner_bounds(&self) -> impl Iterator<Item = &Edge> {
        self.inner_bounds.iter().filter_map(|id| self.get(id))
    }

    /// Candidate edges overlapping `rect`.
    ///
    /// Runs a spatial range query, filtered through the query's collision
    /// test when present, then unions in the boundary edges the query asks
    /// for. Each edge appears at most once even when the inner boundary
    /// aliases the outer one.
    pub fn get_edges(&self, rect: Rect, query: &EdgeQuery<'_>) -> Vec<&Edge> {
        let mut seen: BTreeSet<usize> = BTreeSet::new();
        let mut out = Vec::new();
        self.index.visit_rect(rect, |_, slot_idx| {
            if !seen.insert(slot_idx) {
                return;
            }
            let Some(slot) = self.slots.get(slot_idx).and_then(|s| s.as_ref()) else {
                return;
            };
            if query.collision_test.is_none_or(|test| test(&slot.edge)) {
                out.push(&slot.edge);
            }
        });
        if query.include_outer_bounds {
            self.push_boundary(&self.outer_bounds, &mut seen, &mut out);
        }
        if query.include_inner_bounds {
            self.push_boundary(&self.inner_bounds, &mut seen, &mut out);
        }
        out
    }

    fn push_boundary<'s>(
        &'s self,
        ids: &'s [EdgeId],
        seen: &mut BTreeSet<usize>,
        out: &mut Vec<&'s Edge>,
    ) {
        for id in ids {
            let Some(&slot_idx) = self.by_id.get(id) else {
                continue;
            };
            if !seen.insert(slot_idx) {
                continue;
            }
            if let Some(slot) = self.slots[slot_idx].as_ref() {
                out.push(&slot.edge);
            }
        }
    }

    /// Register the four edges of a boundary rectangle and return their ids.
    fn register_boundary(&mut self, rect: Rect, kind: EdgeKind) -> Vec<EdgeId> {
        let scope = match kind {
            EdgeKind::InnerBounds => "innerBounds",
            _ => "outerBounds",
        };
        let corners = [
            Point::new(rect.x0, rect.y0),
            Point::new(rect.x1, rect.y0),
            Point::new(rect.x1, rect.y1),
            Point::new(rect.x0, rect.y1),
        ];
        let sides = ["top", "right", "bottom", "left"];
        let mut ids = Vec::with_capacity(4);
        for (i, side) in sides.iter().enumerate() {
            let id = EdgeId::scoped(scope, side);
            let edge = Edge::new(
                corners[i],
                corners[(i + 1) % 4],
                id.clone(),
                EdgeOptions {
                    kind,
                    light: Sense::Normal,
                    movement: Sense::Normal,
                    sight: Sense::Normal,
                    sound: Sense::Normal,
                    ..EdgeOptions::default()
                },
            );
            self.set(id.clone(), edge);
            ids.push(id);
        }
        ids
    }
}

impl fmt::Debug for CanvasEdges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasEdges")
            .field("edges", &self.by_id.len())
            .field("free_list", &self.free_list.len())
            .field("index", &self.index)
            .field("outer_bounds", &self.outer_bounds.len())
            .field("inner_bounds", &self.inner_bounds.len())
            .finish_non_exhaustive()
    }
}

// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadtree structure, mutation, and range queries.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use kurbo::Rect;

/// Default maximum entries a node holds before subdividing.
pub const DEFAULT_MAX_OBJECTS: usize = 20;

/// Default maximum subdivision depth (the root is depth 0).
pub const DEFAULT_MAX_DEPTH: usize = 4;

/// Generational handle for quadtree entries.
///
/// A `Key` stays valid until its entry is removed. Reuse of the underlying
/// slot bumps the generation, so stale keys never alias a live entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Key(u32, u32);

impl Key {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Quadtree keys are intentionally 32-bit; higher bits are truncated by design."
    )]
    const fn new(idx: usize, generation: u32) -> Self {
        Self(idx as u32, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
struct Entry<P> {
    generation: u32,
    rect: Rect,
    payload: P,
}

#[derive(Clone, Debug)]
struct Node {
    bounds: Rect,
    depth: usize,
    slots: Vec<usize>,
    children: Option<Box<[Node; 4]>>,
}

impl Node {
    fn new(bounds: Rect, depth: usize) -> Self {
        Self {
            bounds,
            depth,
            slots: Vec::new(),
            children: None,
        }
    }
}

/// A quadtree over axis-aligned rectangles with `Copy` payloads.
///
/// Mutations apply immediately; there is no commit step. See the crate docs
/// for placement and subdivision rules.
pub struct Quadtree<P: Copy + Debug> {
    max_objects: usize,
    max_depth: usize,
    entries: Vec<Option<Entry<P>>>,
    generations: Vec<u32>, // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    root: Node,
}

impl<P: Copy + Debug> Quadtree<P> {
    /// Create a quadtree spanning `bounds` with default configuration.
    pub fn new(bounds: Rect) -> Self {
        Self::with_config(bounds, DEFAULT_MAX_OBJECTS, DEFAULT_MAX_DEPTH)
    }

    /// Create a quadtree with explicit node capacity and depth bounds.
    ///
    /// `max_objects` is the entry count a node may hold before subdividing;
    /// `max_depth` caps subdivision (the root is depth 0). A `max_depth` of 0
    /// makes the tree a flat list.
    pub fn with_config(bounds: Rect, max_objects: usize, max_depth: usize) -> Self {
        Self {
            max_objects: max_objects.max(1),
            max_depth,
            entries: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: Node::new(bounds, 0),
        }
    }

    /// The root bounds this tree was constructed with.
    pub fn bounds(&self) -> Rect {
        self.root.bounds
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    /// True if the tree holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|e| e.is_none())
    }

    /// Insert a rectangle with its payload. Returns a stable handle.
    pub fn insert(&mut self, rect: Rect, payload: P) -> Key {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.entries[idx] = Some(Entry {
                generation,
                rect,
                payload,
            });
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.entries.push(Some(Entry {
                generation,
                rect,
                payload,
            }));
            self.generations.push(generation);
            (self.entries.len() - 1, generation)
        };
        place(
            &mut self.root,
            idx,
            rect,
            self.max_objects,
            self.max_depth,
            &self.entries,
        );
        Key::new(idx, generation)
    }

    /// Remove an entry. Returns false for stale or unknown keys.
    pub fn remove(&mut self, key: Key) -> bool {
        let Some(rect) = self.rect_of(key) else {
            return false;
        };
        let found = remove_slot(&mut self.root, key.idx(), rect);
        debug_assert!(found, "live entry missing from node storage");
        self.entries[key.idx()] = None;
        self.free_list.push(key.idx());
        found
    }

    /// Move an entry to a new rectangle, keeping its key and payload.
    ///
    /// Returns false (and does nothing) for stale keys.
    pub fn update(&mut self, key: Key, rect: Rect) -> bool {
        let Some(old) = self.rect_of(key) else {
            return false;
        };
        let found = remove_slot(&mut self.root, key.idx(), old);
        debug_assert!(found, "live entry missing from node storage");
        if let Some(e) = self.entry_mut(key) {
            e.rect = rect;
        }
        place(
            &mut self.root,
            key.idx(),
            rect,
            self.max_objects,
            self.max_depth,
            &self.entries,
        );
        true
    }

    /// Remove every entry, keeping the root bounds and configuration.
    ///
    /// Keys minted before the call stay stale: slot generations persist, so
    /// reuse after a `clear` still mints fresh keys.
    pub fn clear(&mut self) {
        for (idx, entry) in self.entries.iter_mut().enumerate() {
            if entry.take().is_some() {
                self.free_list.push(idx);
            }
        }
        self.root.slots.clear();
        self.root.children = None;
    }

    /// The rectangle currently stored for `key`, if the key is live.
    pub fn rect_of(&self, key: Key) -> Option<Rect> {
        self.entry(key).map(|e| e.rect)
    }

    /// The payload stored for `key`, if the key is live.
    pub fn get(&self, key: Key) -> Option<P> {
        self.entry(key).map(|e| e.payload)
    }

    /// Visit every entry whose rectangle overlaps `rect`.
    ///
    /// Each entry is visited exactly once; order is unspecified.
    pub fn visit_rect<F: FnMut(Key, P)>(&self, rect: Rect, mut f: F) {
        visit_node(&self.root, rect, &self.entries, &mut |k, p| f(k, p));
    }

    /// Visit entries overlapping `rect` that also pass `pred`.
    ///
    /// The predicate runs before the visitor and can cheaply reject
    /// candidates without a second scan.
    pub fn visit_rect_filtered<Q, F>(&self, rect: Rect, mut pred: Q, mut f: F)
    where
        Q: FnMut(Key, P) -> bool,
        F: FnMut(Key, P),
    {
        visit_node(&self.root, rect, &self.entries, &mut |k, p| {
            if pred(k, p) {
                f(k, p);
            }
        });
    }

    /// Query for entries whose rectangle overlaps `rect`.
    pub fn query_rect(&self, rect: Rect) -> impl Iterator<Item = (Key, P)> + '_ {
        let mut out = Vec::new();
        self.visit_rect(rect, |k, p| out.push((k, p)));
        out.into_iter()
    }

    fn entry(&self, key: Key) -> Option<&Entry<P>> {
        let e = self.entries.get(key.idx())?.as_ref()?;
        if e.generation != key.1 {
            return None;
        }
        Some(e)
    }

    fn entry_mut(&mut self, key: Key) -> Option<&mut Entry<P>> {
        let e = self.entries.get_mut(key.idx())?.as_mut()?;
        if e.generation != key.1 {
            return None;
        }
        Some(e)
    }
}

impl<P: Copy + Debug> Debug for Quadtree<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.entries.len();
        let alive = self.entries.iter().filter(|e| e.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("Quadtree")
            .field("bounds", &self.root.bounds)
            .field("max_objects", &self.max_objects)
            .field("max_depth", &self.max_depth)
            .field("slots_total", &total)
            .field("alive", &alive)
            .field("free_list", &free)
            .finish_non_exhaustive()
    }
}

/// Overlap test with inclusive boundaries, so degenerate (zero-width or
/// zero-height) rectangles still match queries that touch them.
#[inline]
fn rects_overlap(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

#[inline]
fn contains_rect(outer: Rect, inner: Rect) -> bool {
    outer.x0 <= inner.x0 && outer.y0 <= inner.y0 && inner.x1 <= outer.x1 && inner.y1 <= outer.y1
}

fn quadrants(r: Rect) -> [Rect; 4] {
    let mx = 0.5 * (r.x0 + r.x1);
    let my = 0.5 * (r.y0 + r.y1);
    [
        Rect::new(r.x0, r.y0, mx, my),
        Rect::new(mx, r.y0, r.x1, my),
        Rect::new(r.x0, my, mx, r.y1),
        Rect::new(mx, my, r.x1, r.y1),
    ]
}

fn place<P: Copy + Debug>(
    node: &mut Node,
    slot: usize,
    rect: Rect,
    max_objects: usize,
    max_depth: usize,
    entries: &[Option<Entry<P>>],
) {
    if let Some(children) = node.children.as_mut() {
        if let Some(child) = children.iter_mut().find(|c| contains_rect(c.bounds, rect)) {
            place(child, slot, rect, max_objects, max_depth, entries);
            return;
        }
        // Straddles the split lines (or lies outside): stays at this node.
        node.slots.push(slot);
        return;
    }
    node.slots.push(slot);
    if node.slots.len() > max_objects && node.depth < max_depth {
        subdivide(node, max_objects, max_depth, entries);
    }
}

fn subdivide<P: Copy + Debug>(
    node: &mut Node,
    max_objects: usize,
    max_depth: usize,
    entries: &[Option<Entry<P>>],
) {
    let depth = node.depth + 1;
    let quads = quadrants(node.bounds);
    node.children = Some(Box::new([
        Node::new(quads[0], depth),
        Node::new(quads[1], depth),
        Node::new(quads[2], depth),
        Node::new(quads[3], depth),
    ]));
    let retained = core::mem::take(&mut node.slots);
    for slot in retained {
        let Some(entry) = entries.get(slot).and_then(|e| e.as_ref()) else {
            continue;
        };
        place(node, slot, entry.rect, max_objects, max_depth, entries);
    }
}

fn remove_slot(node: &mut Node, slot: usize, rect: Rect) -> bool {
    if let Some(pos) = node.slots.iter().position(|&s| s == slot) {
        node.slots.swap_remove(pos);
        return true;
    }
    if let Some(children) = node.children.as_mut()
        && let Some(child) = children.iter_mut().find(|c| contains_rect(c.bounds, rect))
    {
        return remove_slot(child, slot, rect);
    }
    false
}

fn visit_node<P: Copy + Debug, F: FnMut(Key, P)>(
    node: &Node,
    rect: Rect,
    entries: &[Option<Entry<P>>],
    f: &mut F,
) {
    for &slot in &node.slots {
        if let Some(Some(e)) = entries.get(slot)
            && rects_overlap(e.rect, rect)
        {
            f(Key::new(slot, e.generation), e.payload);
        }
    }
    if let Some(children) = &node.children {
        for child in children.iter() {
            if rects_overlap(child.bounds, rect) {
                visit_node(child, rect, entries, f);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn tree() -> Quadtree<u32> {
        Quadtree::new(Rect::new(0.0, 0.0, 100.0, 100.0))
    }

    #[test]
    fn insert_and_query() {
        let mut qt = tree();
        let a = qt.insert(Rect::new(10.0, 10.0, 20.0, 20.0), 1);
        let b = qt.insert(Rect::new(80.0, 80.0, 90.0, 90.0), 2);

        let hits: Vec<_> = qt.query_rect(Rect::new(0.0, 0.0, 50.0, 50.0)).collect();
        assert_eq!(hits, [(a, 1)]);

        let all: Vec<_> = qt.query_rect(Rect::new(0.0, 0.0, 100.0, 100.0)).collect();
        assert_eq!(all.len(), 2);
        assert!(all.contains(&(b, 2)));
    }

    #[test]
    fn remove_is_immediate_and_stale_keys_are_noops() {
        let mut qt = tree();
        let k = qt.insert(Rect::new(10.0, 10.0, 20.0, 20.0), 7);
        assert_eq!(qt.len(), 1);
        assert!(qt.remove(k));
        assert_eq!(qt.query_rect(Rect::new(0.0, 0.0, 100.0, 100.0)).count(), 0);
        assert!(!qt.remove(k));
        assert!(qt.get(k).is_none());
    }

    #[test]
    fn slot_reuse_bumps_generation() {
        let mut qt = tree();
        let a = qt.insert(Rect::new(0.0, 0.0, 1.0, 1.0), 1);
        qt.remove(a);
        let b = qt.insert(Rect::new(0.0, 0.0, 1.0, 1.0), 2);
        assert_ne!(a, b, "reused slot must carry a new generation");
        assert_eq!(qt.get(b), Some(2));
        assert_eq!(qt.get(a), None);
    }

    #[test]
    fn update_moves_entry() {
        let mut qt = tree();
        let k = qt.insert(Rect::new(10.0, 10.0, 20.0, 20.0), 1);
        assert!(qt.update(k, Rect::new(70.0, 70.0, 80.0, 80.0)));

        assert_eq!(qt.query_rect(Rect::new(0.0, 0.0, 30.0, 30.0)).count(), 0);
        let hits: Vec<_> = qt.query_rect(Rect::new(60.0, 60.0, 100.0, 100.0)).collect();
        assert_eq!(hits, [(k, 1)]);
    }

    #[test]
    fn subdivision_preserves_entries() {
        let mut qt = Quadtree::with_config(Rect::new(0.0, 0.0, 64.0, 64.0), 2, 4);
        let mut keys = Vec::new();
        for i in 0..16 {
            let x = f64::from(i % 4) * 16.0;
            let y = f64::from(i / 4) * 16.0;
            keys.push(qt.insert(Rect::new(x, y, x + 4.0, y + 4.0), i as u32));
        }
        assert_eq!(qt.len(), 16);
        let all: Vec<_> = qt.query_rect(Rect::new(0.0, 0.0, 64.0, 64.0)).collect();
        assert_eq!(all.len(), 16, "no entry may be lost to subdivision");
        for (i, &k) in keys.iter().enumerate() {
            assert_eq!(qt.get(k), Some(i as u32));
        }
    }

    #[test]
    fn straddling_entries_remain_queryable() {
        let mut qt = Quadtree::with_config(Rect::new(0.0, 0.0, 100.0, 100.0), 1, 4);
        // Crosses the root split lines; must stay at the root after subdivision.
        let big = qt.insert(Rect::new(40.0, 40.0, 60.0, 60.0), 99);
        for i in 0..8 {
            let x = f64::from(i) * 5.0;
            qt.insert(Rect::new(x, 0.0, x + 2.0, 2.0), i as u32);
        }
        let hits: Vec<_> = qt.query_rect(Rect::new(49.0, 49.0, 51.0, 51.0)).collect();
        assert_eq!(hits, [(big, 99)]);
        assert!(qt.remove(big));
    }

    #[test]
    fn out_of_bounds_rects_are_retained() {
        let mut qt = tree();
        let k = qt.insert(Rect::new(-50.0, -50.0, -40.0, -40.0), 1);
        let hits: Vec<_> = qt.query_rect(Rect::new(-45.0, -45.0, -44.0, -44.0)).collect();
        assert_eq!(hits, [(k, 1)]);
    }

    #[test]
    fn degenerate_rects_match_touching_queries() {
        let mut qt = tree();
        // A horizontal segment's bounds have zero height.
        let k = qt.insert(Rect::new(10.0, 50.0, 90.0, 50.0), 1);
        let hits: Vec<_> = qt.query_rect(Rect::new(0.0, 0.0, 100.0, 50.0)).collect();
        assert_eq!(hits, [(k, 1)]);
    }

    #[test]
    fn filtered_visit_rejects_candidates() {
        let mut qt = tree();
        let _a = qt.insert(Rect::new(0.0, 0.0, 10.0, 10.0), 1);
        let b = qt.insert(Rect::new(5.0, 5.0, 15.0, 15.0), 2);
        let mut hits = Vec::new();
        qt.visit_rect_filtered(
            Rect::new(0.0, 0.0, 20.0, 20.0),
            |_, p| p % 2 == 0,
            |k, p| hits.push((k, p)),
        );
        assert_eq!(hits, [(b, 2)]);
    }

    #[test]
    fn keys_from_before_clear_stay_stale() {
        let mut qt = tree();
        let k = qt.insert(Rect::new(0.0, 0.0, 1.0, 1.0), 1);
        qt.clear();
        let k2 = qt.insert(Rect::new(0.0, 0.0, 1.0, 1.0), 2);
        assert_ne!(k, k2, "slot reuse across clear must mint a fresh key");
        assert!(qt.get(k).is_none());
        assert!(!qt.remove(k));
        assert_eq!(qt.get(k2), Some(2));
    }

    #[test]
    fn clear_resets_structure() {
        let mut qt = Quadtree::with_config(Rect::new(0.0, 0.0, 100.0, 100.0), 1, 4);
        for i in 0..10 {
            qt.insert(Rect::new(0.0, 0.0, 1.0, 1.0), i);
        }
        qt.clear();
        assert!(qt.is_empty());
        assert_eq!(qt.query_rect(Rect::new(0.0, 0.0, 100.0, 100.0)).count(), 0);
        let k = qt.insert(Rect::new(0.0, 0.0, 1.0, 1.0), 5);
        assert_eq!(qt.get(k), Some(5));
    }
}

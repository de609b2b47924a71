// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Umbra Quadtree: a Kurbo-native quadtree for rectangle-bounded entries.
//!
//! Umbra Quadtree is the spatial acceleration structure behind the edge
//! graph in `umbra_edges`, and a reusable building block on its own.
//!
//! - Insert, update, and remove axis-aligned rectangles with `Copy` payloads.
//! - Query by intersecting rectangle, optionally filtered by a per-entry
//!   predicate, with both allocating and visitor-style APIs.
//! - Entries are addressed by generational [`Key`]s; stale keys are
//!   harmless no-ops.
//!
//! Unlike a batched index, every mutation takes effect immediately. Callers
//! that interleave mutations and queries always observe a structure that is
//! consistent with the mutations issued so far.
//!
//! Each entry lives at the deepest node whose bounds fully contain its
//! rectangle. A node splits into four quadrants once it holds more than
//! `max_objects` entries and is above `max_depth`. Rectangles that extend
//! outside the root bounds are retained at the root, so the tree degrades
//! to a linear scan rather than dropping entries.
//!
//! # Example
//!
//! ```rust
//! use kurbo::Rect;
//! use umbra_quadtree::Quadtree;
//!
//! let mut qt: Quadtree<u32> = Quadtree::new(Rect::new(0.0, 0.0, 100.0, 100.0));
//! let k1 = qt.insert(Rect::new(10.0, 10.0, 20.0, 20.0), 1);
//! let _k2 = qt.insert(Rect::new(60.0, 60.0, 80.0, 80.0), 2);
//!
//! let hits: Vec<_> = qt.query_rect(Rect::new(0.0, 0.0, 30.0, 30.0)).collect();
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0], (k1, 1));
//!
//! assert!(qt.remove(k1));
//! assert!(!qt.remove(k1), "stale keys are no-ops");
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod tree;

pub use tree::{Key, Quadtree};

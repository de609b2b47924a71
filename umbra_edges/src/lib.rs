// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Perception edge graph for a 2D scene.
//!
//! An [`Edge`] is a line segment that restricts the propagation of light,
//! movement, sight, and sound independently per channel, with optional
//! one-sided blocking and proximity thresholds. [`CanvasEdges`] is the
//! per-scene collection of edges, keyed by [`EdgeId`] and mirrored into a
//! quadtree so that geometric candidate queries stay sublinear; the four
//! canvas boundary edges live in the collection but outside the index.
//!
//! Intersection bookkeeping is explicit: after a batch of mutations, a call
//! to [`CanvasEdges::refresh`] runs an x-sweep over all edges and records
//! every proper pairwise crossing on both participants.
//!
//! ## Example
//!
//! ```
//! use kurbo::{Point, Rect};
//! use umbra_edges::{
//!     CanvasEdges, Edge, EdgeId, EdgeOptions, EdgeQuery, SceneDimensions, Sense,
//! };
//!
//! let mut edges = CanvasEdges::new(Rect::new(0.0, 0.0, 100.0, 100.0));
//! edges.initialize(&SceneDimensions::new(Rect::new(0.0, 0.0, 100.0, 100.0)), []);
//!
//! let id = EdgeId::scoped("wall", "w1");
//! let wall = Edge::new(
//!     Point::new(10.0, 10.0),
//!     Point::new(40.0, 10.0),
//!     id.clone(),
//!     EdgeOptions {
//!         sight: Sense::Normal,
//!         ..EdgeOptions::default()
//!     },
//! );
//! edges.set(id, wall);
//! edges.refresh();
//!
//! let hits = edges.get_edges(
//!     Rect::new(0.0, 0.0, 50.0, 50.0),
//!     &EdgeQuery::default(),
//! );
//! // The wall plus the four outer boundary edges.
//! assert_eq!(hits.len(), 5);
//! ```
//!
//! ## Features
//!
//! - `std` (enabled by default): use the Rust standard library.
//! - `libm`: use [libm](https://crates.io/crates/libm) for floating point
//!   math in `no_std` builds. One of `std` or `libm` must be enabled.
#![no_std]

extern crate alloc;

pub mod canvas;
pub mod edge;
pub mod types;

pub use canvas::{CanvasEdges, EdgeProvider, EdgeQuery, SceneDimensions};
pub use edge::{Edge, EdgeIntersection, EdgeOptions, Intersection};
pub use types::{Channel, EdgeId, EdgeKind, ObjectId, Sense, Side, Threshold};

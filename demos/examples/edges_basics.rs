// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Edge graph basics.
//!
//! Initialize a scene, register walls through a provider, refresh
//! intersections, and run candidate queries.
//!
//! Run:
//! - `cargo run -p umbra_demos --example edges_basics`

use kurbo::{Point, Rect};
use umbra_edges::{
    CanvasEdges, Edge, EdgeId, EdgeOptions, EdgeProvider, EdgeQuery, SceneDimensions, Sense,
};

struct DemoWalls;

impl EdgeProvider for DemoWalls {
    fn register_edges(&self, edges: &mut CanvasEdges) {
        let walls = [
            ("north", Point::new(100.0, 100.0), Point::new(400.0, 100.0)),
            ("cross", Point::new(250.0, 0.0), Point::new(250.0, 300.0)),
            ("south", Point::new(100.0, 400.0), Point::new(400.0, 400.0)),
        ];
        for (name, a, b) in walls {
            let id = EdgeId::scoped("wall", name);
            let edge = Edge::new(
                a,
                b,
                id.clone(),
                EdgeOptions {
                    sight: Sense::Normal,
                    movement: Sense::Normal,
                    ..EdgeOptions::default()
                },
            );
            edges.set(id, edge);
        }
    }
}

fn main() {
    let dims = SceneDimensions::with_padding(Rect::new(0.0, 0.0, 500.0, 500.0), 50.0);
    let mut edges = CanvasEdges::new(dims.bounds);

    let walls = DemoWalls;
    let providers: Vec<&dyn EdgeProvider> = vec![&walls];
    edges.initialize(&dims, providers);
    println!("edges after initialize: {}", edges.len());

    edges.refresh();
    let north = edges.get(&EdgeId::scoped("wall", "north")).unwrap();
    println!(
        "wall.north crosses {} other edge(s)",
        north.intersections().len()
    );
    for rec in north.intersections() {
        println!("  with {} at {:?}", rec.edge, rec.intersection.point);
    }

    // Candidate query around the wall crossing; outer bounds come along by
    // default, inner bounds only on request.
    let window = Rect::new(200.0, 50.0, 300.0, 150.0);
    let hits = edges.get_edges(window, &EdgeQuery::default());
    println!("candidates in {window:?}:");
    for edge in &hits {
        println!("  {} ({:?})", edge.id, edge.kind);
    }

    // Deleting a wall also purges its partner's intersection records.
    edges.delete(&EdgeId::scoped("wall", "cross"));
    let north = edges.get(&EdgeId::scoped("wall", "north")).unwrap();
    assert!(north.intersections().is_empty());
    println!("after delete, wall.north crosses nothing");
}

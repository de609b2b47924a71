// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Directional and threshold-modulated edges.
//!
//! Shows one-sided blocking via `orient_point` and proximity thresholds via
//! `apply_threshold`.
//!
//! Run:
//! - `cargo run -p umbra_demos --example edge_thresholds`

use kurbo::Point;
use umbra_edges::{Channel, Edge, EdgeId, EdgeOptions, Sense, Side, Threshold};

fn main() {
    // A one-way wall: only blocks approaches from its left side.
    let one_way = Edge::new(
        Point::new(0.0, 0.0),
        Point::new(100.0, 0.0),
        EdgeId::scoped("wall", "oneWay"),
        EdgeOptions {
            sight: Sense::Normal,
            direction: Side::LEFT,
            ..EdgeOptions::default()
        },
    );
    for p in [Point::new(50.0, 40.0), Point::new(50.0, -40.0)] {
        let side = one_way.orient_point(p);
        let blocked = one_way.direction.intersects(side);
        println!("source at {p:?} is on {side:?}; blocked: {blocked}");
    }

    // A proximity door: transparent to sight for sources within 30 units.
    let door = Edge::new(
        Point::new(0.0, 50.0),
        Point::new(100.0, 50.0),
        EdgeId::scoped("wall", "proximityDoor"),
        EdgeOptions {
            sight: Sense::Proximity,
            threshold: Some(Threshold {
                sight: Some(30.0),
                ..Threshold::default()
            }),
            ..EdgeOptions::default()
        },
    );
    for p in [Point::new(50.0, 60.0), Point::new(50.0, 120.0)] {
        let sees_through = door.apply_threshold(Channel::Sight, p, 0.0);
        println!("source at {p:?} sees through the door: {sees_through}");
    }
}

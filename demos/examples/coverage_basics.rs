// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadtree cover basics.
//!
//! Build the default scene with an exclude circle, print the statistics, and draw the accepted
//! squares as an ASCII raster: `#` is covered, `+` is inside the region but not covered at this
//! depth, and blank is outside the region.
//!
//! Run:
//! - `cargo run -p understory_demos --example coverage_basics`

use kurbo::Point;
use understory_quadtree::{Handle, Scene, SceneConfig};

const RESOLUTION: usize = 32;

fn main() {
    env_logger::init();

    let mut scene = Scene::new(SceneConfig::default());
    scene.set_include_diameter(0.45);
    scene.set_exclude_diameter(0.15);
    scene
        .set_position(Handle::Exclude, Point::new(1.5, -1.0))
        .expect("finite position");

    let frame = scene.recompute();
    println!(
        "accepted: {} (classified {}, split {}, depth-limited {}) in {:?}",
        frame.stats.accepted,
        frame.stats.classified,
        frame.stats.split,
        frame.stats.depth_limited,
        frame.elapsed
    );

    let root = scene.root_square();
    let region = scene.region();
    let cell = root.size / RESOLUTION as f64;
    for row in 0..RESOLUTION {
        let mut line = String::with_capacity(2 * RESOLUTION);
        for col in 0..RESOLUTION {
            let p = Point::new(
                root.position.x + (col as f64 + 0.5) * cell,
                root.position.y + (row as f64 + 0.5) * cell,
            );
            let covered = scene.accepted().iter().any(|n| n.rect().contains(p));
            let ch = if covered {
                '#'
            } else if region.contains_point(p) {
                '+'
            } else {
                ' '
            };
            line.push(ch);
            line.push(ch);
        }
        println!("{line}");
    }
}

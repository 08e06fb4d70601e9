// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame recomputation.
//!
//! Drag the exclude circle across the area the way a pointer would, recompute every frame,
//! and log the accepted count, build time, and the buffer slots that went stale.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example coverage_frames`

use kurbo::Point;
use understory_quadtree::{Handle, Scene, SceneConfig};

const FRAMES: usize = 40;

fn main() {
    env_logger::init();

    // A small node cap so some frames hit it.
    let config = SceneConfig {
        max_nodes: 256,
        max_depth: 6,
        move_speed: 0.15,
        ..SceneConfig::default()
    };
    let mut scene = Scene::new(config);
    scene.set_include_diameter(0.6);
    scene.set_exclude_diameter(0.2);
    scene
        .set_position(Handle::Exclude, Point::new(-6.0, -6.0))
        .expect("finite position");

    let target = Point::new(6.0, 6.0);
    let mut shown = 0;
    for frame_no in 0..FRAMES {
        scene
            .move_toward(Handle::Exclude, target)
            .expect("finite target");
        let frame = scene.recompute();

        // A renderer would hide the retired slots and reposition the active ones.
        let hidden = frame.retired.len();
        shown = frame.stats.accepted;
        log::info!(
            "frame {frame_no:>2}: exclude at ({:.2}, {:.2}) accepted {:>3} hidden {:>3}{} in {:?}",
            scene.position(Handle::Exclude).x,
            scene.position(Handle::Exclude).y,
            frame.stats.accepted,
            hidden,
            if frame.stats.truncated { " (capped)" } else { "" },
            frame.elapsed,
        );
    }
    println!("final frame shows {shown} squares");
}

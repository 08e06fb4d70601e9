// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_quadtree --heading-base-level=0

//! Understory Quadtree: a Kurbo-native quadtree cover of a circular region.
//!
//! Given a root square, an *include* circle and an *exclude* circle, this crate computes the set
//! of axis-aligned squares that lie entirely inside "include minus exclude", refining near the
//! circle boundaries down to a maximum depth. It is meant to be recomputed every frame from live
//! input, so the traversal state and the output are reusable allocations.
//!
//! - [`Builder`]: breadth-first classify-and-split traversal. Owns the transient tree and queue.
//! - [`NodeBuffer`]: fixed-capacity output with an explicit active length. Its capacity is the
//!   node cap of a build.
//! - [`classify()`]: the square-versus-region classification ([`Coverage`]).
//! - [`Scene`]: slider-style parameters, reusable state, and per-frame statistics.
//!
//! ## Traversal
//!
//! Each dequeued square is classified against the exclude circle first and the include circle
//! second. Inside squares are copied into the buffer; unsure squares are split into quadrants
//! (top-left, top-right, bottom-left, bottom-right) while the depth allows; outside squares are
//! dropped. Once the buffer is full, the next inside square stops the traversal outright.
//!
//! Coordinates use Kurbo's y-down convention: a [`Square`]'s `position` is its top-left corner.
//! Degenerate inputs (zero or negative sizes and radii, a zero node cap) are valid and produce
//! empty or partial output rather than errors.
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Circle, Point};
//! use understory_quadtree::{Builder, NodeBuffer, Region, Square};
//!
//! let root = Square::from_center(Point::ORIGIN, 8.0);
//! let region = Region::new(
//!     Circle::new(Point::ORIGIN, 3.5),
//!     Circle::new(Point::new(1.0, 1.0), 0.75),
//! );
//!
//! let mut builder = Builder::new();
//! let mut out = NodeBuffer::new(4096);
//! let stats = builder.build(root, &region, 4, &mut out);
//!
//! assert_eq!(stats.accepted, out.len());
//! for node in out.iter() {
//!     assert!(region.contains_point(node.anchor()));
//! }
//! ```
//!
//! With a [`Scene`], parameters come from clamped slider values and each recompute reports
//! which previously shown slots became stale:
//!
//! ```rust
//! use understory_quadtree::{Scene, SceneConfig};
//!
//! let mut scene = Scene::new(SceneConfig::default());
//! let first = scene.recompute();
//!
//! scene.set_include_diameter(0.1);
//! let second = scene.recompute();
//! assert_eq!(second.retired, second.stats.accepted..first.stats.accepted);
//! ```
//!
//! This crate is `no_std` and uses `alloc`. The default `std` feature adds wall-clock timing to
//! [`Frame`].

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod buffer;
pub mod builder;
pub mod classify;
pub mod scene;
pub mod types;

pub use buffer::{DEFAULT_MAX_NODES, NodeBuffer};
pub use builder::{BuildStats, Builder, NodeIdx, TreeNode, build};
pub use classify::{classify, inside_circle, nearest_point_within};
pub use scene::{Frame, Handle, Scene, SceneConfig, SceneError};
pub use types::{AcceptedNode, Coverage, Region, Square};

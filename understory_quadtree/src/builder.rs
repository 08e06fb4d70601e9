// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Breadth-first classify-and-split traversal.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::buffer::NodeBuffer;
use crate::classify::classify;
use crate::types::{AcceptedNode, Coverage, Region, Square};

/// Index of a node in the builder's traversal arena.
///
/// Only valid until the next call to [`Builder::build`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeIdx(usize);

impl NodeIdx {
    /// Position of the node in [`Builder::nodes`].
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A square in the traversal tree of the last build.
#[derive(Clone, Debug)]
pub struct TreeNode {
    /// Geometry of the node.
    pub square: Square,
    /// Classification, or `None` if the node was still queued when the traversal stopped.
    pub coverage: Option<Coverage>,
    children: Option<[NodeIdx; 4]>,
}

impl TreeNode {
    fn leaf(square: Square) -> Self {
        Self {
            square,
            coverage: None,
            children: None,
        }
    }

    /// Children in top-left, top-right, bottom-left, bottom-right order, if the node was split.
    pub fn children(&self) -> Option<[NodeIdx; 4]> {
        self.children
    }

    /// True if the node was never split.
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// Counters describing one traversal.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BuildStats {
    /// Squares written to the output buffer.
    pub accepted: usize,
    /// Squares dequeued and classified.
    pub classified: usize,
    /// Unsure squares that were split.
    pub split: usize,
    /// Unsure squares dropped because their children would reach the size cutoff.
    pub depth_limited: usize,
    /// Squares still queued when the node cap stopped the traversal.
    pub unvisited: usize,
    /// Whether the node cap stopped the traversal.
    pub truncated: bool,
    /// Size cutoff derived from the root size and maximum depth.
    pub min_leaf_size: f64,
}

/// Reusable breadth-first builder.
///
/// Owns the transient traversal tree and queue. Both are cleared (keeping their allocations)
/// at the start of every [`build`](Self::build), so a single builder can be driven every frame.
#[derive(Debug, Default)]
pub struct Builder {
    nodes: Vec<TreeNode>,
    queue: VecDeque<NodeIdx>,
}

impl Builder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cover `region` inside `root` and write the accepted squares into `out`.
    ///
    /// Squares are visited breadth-first. Each split enqueues its quadrants top-left,
    /// top-right, bottom-left, bottom-right, and accepted squares are written in visiting
    /// order. The node cap is `out.capacity()`: the first inside square found once the buffer
    /// is full stops the traversal immediately, and everything still queued is dropped
    /// unvisited.
    ///
    /// An unsure square is split only while its quadrants stay strictly larger than
    /// `root.size * 0.5^(max_depth + 1)`, so no square smaller than `root.size * 0.5^max_depth`
    /// is ever produced and `max_depth == 0` never splits the root.
    ///
    /// On return `out.len()` is the accepted count; slots past it are left untouched.
    pub fn build(
        &mut self,
        root: Square,
        region: &Region,
        max_depth: u32,
        out: &mut NodeBuffer,
    ) -> BuildStats {
        self.nodes.clear();
        self.queue.clear();

        let max_nodes = out.capacity();
        let min_leaf_size = min_leaf_size(root.size, max_depth);
        let mut stats = BuildStats {
            min_leaf_size,
            ..BuildStats::default()
        };

        let root_idx = self.push(root);
        self.queue.push_back(root_idx);

        while let Some(idx) = self.queue.pop_front() {
            let square = self.nodes[idx.0].square;
            let coverage = classify(&square, region);
            self.nodes[idx.0].coverage = Some(coverage);
            stats.classified += 1;

            match coverage {
                Coverage::Inside => {
                    if stats.accepted < max_nodes {
                        out.write(stats.accepted, AcceptedNode::new(square, coverage));
                        stats.accepted += 1;
                    } else {
                        stats.truncated = true;
                        stats.unvisited = self.queue.len();
                        break;
                    }
                }
                Coverage::Unsure => {
                    if can_split(square.size, min_leaf_size) {
                        let children = self.split(idx);
                        self.queue.extend(children);
                        stats.split += 1;
                    } else {
                        stats.depth_limited += 1;
                    }
                }
                Coverage::Outside => {}
            }
        }
        self.queue.clear();
        out.set_len(stats.accepted);

        if stats.truncated {
            log::debug!(
                "quadtree build hit the {max_nodes} node cap; {} squares left unvisited",
                stats.unvisited
            );
        }
        log::trace!(
            "quadtree build: accepted={} classified={} split={} depth_limited={}",
            stats.accepted,
            stats.classified,
            stats.split,
            stats.depth_limited
        );
        stats
    }

    /// Nodes of the last traversal tree, in creation order (the root first).
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Node by index.
    pub fn node(&self, idx: NodeIdx) -> Option<&TreeNode> {
        self.nodes.get(idx.0)
    }

    /// Root of the last traversal tree, if a build has run.
    pub fn root(&self) -> Option<NodeIdx> {
        (!self.nodes.is_empty()).then_some(NodeIdx(0))
    }

    fn push(&mut self, square: Square) -> NodeIdx {
        self.nodes.push(TreeNode::leaf(square));
        NodeIdx(self.nodes.len() - 1)
    }

    fn split(&mut self, idx: NodeIdx) -> [NodeIdx; 4] {
        debug_assert!(self.nodes[idx.0].is_leaf(), "node split twice");
        let [tl, tr, bl, br] = self.nodes[idx.0].square.split();
        let children = [self.push(tl), self.push(tr), self.push(bl), self.push(br)];
        self.nodes[idx.0].children = Some(children);
        children
    }
}

/// One-shot build into a fresh buffer of `max_nodes` slots.
///
/// Prefer a long-lived [`Builder`] and [`NodeBuffer`] when recomputing repeatedly.
pub fn build(root: Square, region: &Region, max_depth: u32, max_nodes: usize) -> NodeBuffer {
    let mut out = NodeBuffer::new(max_nodes);
    Builder::new().build(root, region, max_depth, &mut out);
    out
}

/// `root_size * 0.5^(max_depth + 1)` by repeated halving.
fn min_leaf_size(root_size: f64, max_depth: u32) -> f64 {
    let mut size = root_size;
    for _ in 0..=max_depth {
        size *= 0.5;
        // Nothing changes past underflow (or for non-finite input).
        if size == 0.0 || !size.is_finite() {
            break;
        }
    }
    size
}

/// Whether a square of `size` may be split: its quadrants must stay above the cutoff.
fn can_split(size: f64, min_leaf_size: f64) -> bool {
    size > 0.0 && 0.5 * size > min_leaf_size
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use kurbo::{Circle, Point};

    fn sample_points(square: &Square, steps: usize) -> Vec<Point> {
        let mut out = Vec::with_capacity((steps + 1) * (steps + 1));
        for j in 0..=steps {
            for i in 0..=steps {
                let fx = i as f64 / steps as f64;
                let fy = j as f64 / steps as f64;
                out.push(Point::new(
                    square.position.x + fx * square.size,
                    square.position.y + fy * square.size,
                ));
            }
        }
        out
    }

    fn cut_region() -> Region {
        Region::new(
            Circle::new(Point::new(1.0, 0.5), 3.5),
            Circle::new(Point::new(2.0, 2.0), 1.25),
        )
    }

    fn root8() -> Square {
        Square::from_center(Point::ORIGIN, 8.0)
    }

    #[test]
    fn depth_zero_accepts_root_when_fully_inside() {
        let region = Region::include_only(Circle::new(Point::ORIGIN, 10.0));
        let out = build(root8(), &region, 0, 4096);
        assert_eq!(out.len(), 1);
        let only = out.active()[0];
        assert_eq!(only.square(), root8());
        assert_eq!(only.coverage, Coverage::Inside);
    }

    #[test]
    fn depth_zero_never_splits() {
        let region = Region::include_only(Circle::new(Point::ORIGIN, 3.0));
        let mut builder = Builder::new();
        let mut out = NodeBuffer::new(16);
        let stats = builder.build(root8(), &region, 0, &mut out);
        assert_eq!(stats.classified, 1);
        assert_eq!(stats.split, 0);
        assert_eq!(stats.depth_limited, 1);
        assert!(out.is_empty());
        assert_eq!(builder.nodes().len(), 1);
    }

    #[test]
    fn cut_region_at_depth_three() {
        let region = cut_region();
        let root = root8();
        let mut builder = Builder::new();
        let mut out = NodeBuffer::new(4096);
        let stats = builder.build(root, &region, 3, &mut out);

        assert!(out.len() > 1, "expected several accepted squares");
        assert!(!stats.truncated);
        assert_eq!(stats.min_leaf_size, 0.5);

        let depth_bound = root.size * 0.125;
        for node in out.iter() {
            assert!(node.size < root.size, "root itself cannot be inside");
            assert!(node.size >= depth_bound, "accepted square below depth bound");
            for p in sample_points(&node.square(), 8) {
                assert!(region.contains_point(p), "inside square leaks at {p:?}");
            }
        }
        for node in builder.nodes() {
            if node.children().is_some() {
                assert!(node.square.size >= depth_bound * 2.0, "split below depth bound");
            }
        }
    }

    #[test]
    fn outside_squares_contain_no_region_points() {
        let region = cut_region();
        let mut builder = Builder::new();
        let mut out = NodeBuffer::new(4096);
        builder.build(root8(), &region, 4, &mut out);

        let mut outside = 0;
        for node in builder.nodes() {
            if node.coverage == Some(Coverage::Outside) {
                outside += 1;
                for p in sample_points(&node.square, 8) {
                    assert!(!region.contains_point(p), "outside square has region point {p:?}");
                }
            }
        }
        assert!(outside > 0, "expected some outside squares");
    }

    #[test]
    fn split_nodes_tile_their_parent() {
        let mut builder = Builder::new();
        let mut out = NodeBuffer::new(4096);
        builder.build(root8(), &cut_region(), 3, &mut out);

        let mut splits = 0;
        for node in builder.nodes() {
            let Some(children) = node.children() else {
                continue;
            };
            splits += 1;
            let parent = node.square;
            let kids: Vec<Square> = children
                .iter()
                .map(|&c| builder.node(c).unwrap().square)
                .collect();
            assert_eq!(kids, parent.split().to_vec());
            let r = parent.rect();
            assert_eq!(kids[0].rect().origin(), r.origin());
            assert_eq!(kids[1].rect().x1, r.x1);
            assert_eq!(kids[2].rect().y1, r.y1);
            assert_eq!(
                (kids[3].rect().x1, kids[3].rect().y1),
                (r.x1, r.y1),
                "bottom-right child must reach the parent's far corner"
            );
            assert_eq!(kids[0].rect().x1, kids[1].rect().x0);
            assert_eq!(kids[0].rect().y1, kids[2].rect().y0);
        }
        assert!(splits > 0, "expected at least one split");
    }

    #[test]
    fn root_is_the_first_split_node() {
        let mut builder = Builder::new();
        assert_eq!(builder.root(), None);

        let mut out = NodeBuffer::new(4096);
        builder.build(root8(), &cut_region(), 3, &mut out);
        let root = builder.root().unwrap();
        assert_eq!(root.index(), 0);

        let root_node = builder.node(root).unwrap();
        assert_eq!(root_node.square, root8());
        assert_eq!(root_node.coverage, Some(Coverage::Unsure));
        let first_split = builder
            .nodes()
            .iter()
            .position(|n| !n.is_leaf())
            .unwrap();
        assert_eq!(first_split, root.index());

        // Children are created right after their parent, in quadrant order.
        let children = root_node.children().unwrap();
        let indices: Vec<usize> = children.iter().map(|c| c.index()).collect();
        assert_eq!(indices, [1, 2, 3, 4]);
    }

    #[test]
    fn cap_keeps_exact_breadth_first_prefix() {
        let region = cut_region();
        let full = build(root8(), &region, 5, 4096);
        assert!(full.len() > 6, "need enough squares to truncate");

        for cap in [1, 2, 5, full.len() - 1] {
            let capped = build(root8(), &region, 5, cap);
            assert_eq!(capped.len(), cap);
            assert_eq!(capped.active(), &full.active()[..cap]);
        }

        let exact = build(root8(), &region, 5, full.len());
        assert_eq!(exact.active(), full.active());
    }

    #[test]
    fn single_slot_cap_halts_traversal() {
        // The exclude circle only touches the top-left quadrant; the other three are inside.
        let root = Square::new(Point::ORIGIN, 8.0);
        let region = Region::new(
            Circle::new(Point::new(4.0, 4.0), 100.0),
            Circle::new(Point::new(1.0, 1.0), 0.5),
        );

        let full = build(root, &region, 3, 4096);
        assert!(full.len() >= 4);

        let mut builder = Builder::new();
        let mut out = NodeBuffer::new(1);
        let sentinel = AcceptedNode::new(
            Square::new(Point::new(-1.0, -1.0), 42.0),
            Coverage::Unsure,
        );
        out.write(0, sentinel);

        let stats = builder.build(root, &region, 3, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(
            out.active()[0],
            AcceptedNode::new(Square::new(Point::new(4.0, 0.0), 4.0), Coverage::Inside)
        );
        assert!(stats.truncated);
        // Root, top-left, top-right (accepted), bottom-left (triggers the cap).
        assert_eq!(stats.classified, 4);
        // Bottom-right plus the four quadrants of the top-left square.
        assert_eq!(stats.unvisited, 5);
        let unclassified = builder
            .nodes()
            .iter()
            .filter(|n| n.coverage.is_none())
            .count();
        assert_eq!(unclassified, 5);
    }

    #[test]
    fn zero_cap_truncates_on_first_inside() {
        let region = Region::include_only(Circle::new(Point::ORIGIN, 10.0));
        let mut out = NodeBuffer::new(0);
        let stats = Builder::new().build(root8(), &region, 3, &mut out);
        assert!(stats.truncated);
        assert_eq!(stats.accepted, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn slots_past_count_are_left_untouched() {
        let region = cut_region();
        let mut builder = Builder::new();
        let mut out = NodeBuffer::new(4096);
        builder.build(root8(), &region, 4, &mut out);
        let before = out.slots().to_vec();
        let prev_len = out.len();

        // A tiny include circle accepts far fewer squares.
        let small = Region::include_only(Circle::new(Point::new(1.0, 0.5), 1.0));
        builder.build(root8(), &small, 4, &mut out);
        assert!(out.len() < prev_len);
        assert_eq!(&out.slots()[out.len()..], &before[out.len()..]);
        assert_eq!(out.retire_range(prev_len), out.len()..prev_len);
    }

    #[test]
    fn rebuilding_is_idempotent() {
        let region = cut_region();
        let mut builder = Builder::new();
        let mut out = NodeBuffer::new(4096);
        let a = builder.build(root8(), &region, 5, &mut out);
        let first = out.active().to_vec();
        let b = builder.build(root8(), &region, 5, &mut out);
        assert_eq!(a, b);
        assert_eq!(out.active(), first.as_slice());
    }

    #[test]
    fn degenerate_unsure_roots_are_not_split() {
        // For these sizes the box clamp lands inside the circle while not every corner does,
        // so both roots classify as unsure.
        let unsure = Region::include_only(Circle::new(Point::new(0.5, 0.0), 1.0));
        for size in [-8.0, f64::NAN] {
            let mut builder = Builder::new();
            let mut out = NodeBuffer::new(8);
            let stats = builder.build(Square::new(Point::ORIGIN, size), &unsure, 6, &mut out);
            assert_eq!(builder.nodes()[0].coverage, Some(Coverage::Unsure));
            assert_eq!(stats.split, 0);
            assert_eq!(stats.depth_limited, 1);
            assert_eq!(builder.nodes().len(), 1);
        }
    }

    #[test]
    fn zero_size_squares_never_split() {
        // A zero-size square is inside a circle exactly when its nearest point is, so it is
        // never classified unsure; the size guard still holds on its own.
        assert!(!can_split(0.0, 0.0));
        assert!(!can_split(0.0, -1.0));
        assert!(!can_split(-8.0, -0.5));
        assert!(!can_split(f64::NAN, 0.0));
        assert!(can_split(8.0, 0.5));
        assert!(!can_split(1.0, 0.5));
    }

    #[test]
    fn zero_size_root_inside_is_accepted() {
        let region = Region::include_only(Circle::new(Point::ORIGIN, 1.0));
        let out = build(Square::new(Point::ORIGIN, 0.0), &region, 3, 4);
        assert_eq!(out.len(), 1);
        assert_eq!(out.active()[0].size, 0.0);
    }

    #[test]
    fn huge_depth_terminates() {
        assert_eq!(min_leaf_size(8.0, u32::MAX), 0.0);
        assert_eq!(min_leaf_size(8.0, 0), 4.0);
        assert_eq!(min_leaf_size(8.0, 2), 1.0);
    }

    #[test]
    fn far_exclude_circle_is_a_no_op() {
        // With the exclude circle far away the result matches an include-only region.
        let include = Circle::new(Point::new(1.0, 0.5), 3.5);
        let far = Region::new(include, Circle::new(Point::new(100.0, 100.0), 2.0));
        let a = build(root8(), &far, 4, 4096);
        let b = build(root8(), &Region::include_only(include), 4, 4096);
        assert_eq!(a.active(), b.active());
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interactive scene: the live parameters an editor or demo manipulates, plus a reusable
//! builder and output buffer.
//!
//! ## Overview
//!
//! A [`Scene`] sits between input handling and the core [`Builder`]. Slider-style setters take a
//! fraction in `[0, 1]` and scale it by [`SceneConfig::max_size`], and the depth is capped at
//! [`SceneConfig::max_depth_limit`], so the builder only ever sees clamped, finite numbers.
//! [`Scene::recompute`] runs one build and reports a [`Frame`] with the statistics a UI would
//! display and the buffer slots it should hide.

use core::fmt;
use core::ops::Range;

use kurbo::{Circle, Point};

use crate::buffer::{DEFAULT_MAX_NODES, NodeBuffer};
use crate::builder::{BuildStats, Builder};
use crate::types::{AcceptedNode, Region, Square};

/// Tunables for a [`Scene`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SceneConfig {
    /// Largest square edge or circle diameter a slider can produce.
    pub max_size: f64,
    /// Output buffer capacity.
    pub max_nodes: usize,
    /// Initial square edge length.
    pub square_size: f64,
    /// Initial include circle diameter.
    pub include_diameter: f64,
    /// Initial exclude circle diameter.
    pub exclude_diameter: f64,
    /// Initial maximum depth.
    pub max_depth: u32,
    /// Largest depth [`Scene::set_max_depth`] accepts.
    ///
    /// Squares the exclude circle keeps unsure split at every level without ever reaching the
    /// node cap, so the traversal grows as `4^depth` near its boundary.
    pub max_depth_limit: u32,
    /// Fraction of the remaining distance covered by each [`Scene::move_toward`] call.
    pub move_speed: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            max_size: 16.0,
            max_nodes: DEFAULT_MAX_NODES,
            square_size: 8.0,
            include_diameter: 8.0,
            exclude_diameter: 0.0,
            max_depth: 5,
            max_depth_limit: 10,
            move_speed: 0.1,
        }
    }
}

/// Which part of the scene [`Scene::move_toward`] moves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Handle {
    /// The center of the square area.
    Area,
    /// The center of the include circle.
    Include,
    /// The center of the exclude circle.
    Exclude,
}

/// Error returned when a scene input cannot be fed to the builder.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SceneError {
    /// A point with a NaN or infinite coordinate.
    NonFinite {
        /// The handle the point was meant for.
        handle: Handle,
        /// The rejected point.
        point: Point,
    },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite { handle, point } => write!(
                f,
                "cannot move {handle:?} to non-finite point ({}, {})",
                point.x, point.y
            ),
        }
    }
}

impl core::error::Error for SceneError {}

/// Result of one [`Scene::recompute`].
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Traversal counters; `stats.accepted` is the active node count.
    pub stats: BuildStats,
    /// Buffer indices shown by the previous frame that are stale now and should be hidden.
    pub retired: Range<usize>,
    /// Wall-clock duration of the build.
    #[cfg(feature = "std")]
    pub elapsed: std::time::Duration,
}

/// Live scene parameters with a reusable builder and output buffer.
#[derive(Debug)]
pub struct Scene {
    config: SceneConfig,
    area_center: Point,
    square_size: f64,
    include: Circle,
    exclude: Circle,
    max_depth: u32,
    builder: Builder,
    buffer: NodeBuffer,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

impl Scene {
    /// Create a scene centered on the origin with everything at its configured initial value.
    pub fn new(config: SceneConfig) -> Self {
        Self {
            config,
            area_center: Point::ORIGIN,
            square_size: config.square_size,
            include: Circle::new(Point::ORIGIN, 0.5 * config.include_diameter),
            exclude: Circle::new(Point::ORIGIN, 0.5 * config.exclude_diameter),
            max_depth: config.max_depth.min(config.max_depth_limit),
            builder: Builder::new(),
            buffer: NodeBuffer::new(config.max_nodes),
        }
    }

    /// The configuration this scene was created with.
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Set the square edge length from a slider fraction in `[0, 1]`.
    pub fn set_square_size(&mut self, t: f64) {
        self.square_size = self.slider(t);
    }

    /// Set the include circle diameter from a slider fraction in `[0, 1]`.
    pub fn set_include_diameter(&mut self, t: f64) {
        self.include.radius = 0.5 * self.slider(t);
    }

    /// Set the exclude circle diameter from a slider fraction in `[0, 1]`.
    pub fn set_exclude_diameter(&mut self, t: f64) {
        self.exclude.radius = 0.5 * self.slider(t);
    }

    /// Set the maximum subdivision depth, capped at [`SceneConfig::max_depth_limit`].
    pub fn set_max_depth(&mut self, max_depth: u32) {
        self.max_depth = max_depth.min(self.config.max_depth_limit);
    }

    /// Place a handle exactly at `point`.
    pub fn set_position(&mut self, handle: Handle, point: Point) -> Result<(), SceneError> {
        if !point.is_finite() {
            return Err(SceneError::NonFinite { handle, point });
        }
        *self.handle_mut(handle) = point;
        Ok(())
    }

    /// Move a handle [`SceneConfig::move_speed`] of the way toward `target`.
    pub fn move_toward(&mut self, handle: Handle, target: Point) -> Result<(), SceneError> {
        if !target.is_finite() {
            return Err(SceneError::NonFinite {
                handle,
                point: target,
            });
        }
        let speed = self.config.move_speed;
        let p = self.handle_mut(handle);
        *p = p.lerp(target, speed);
        Ok(())
    }

    /// Current position of a handle.
    pub fn position(&self, handle: Handle) -> Point {
        match handle {
            Handle::Area => self.area_center,
            Handle::Include => self.include.center,
            Handle::Exclude => self.exclude.center,
        }
    }

    /// Current square edge length.
    pub fn square_size(&self) -> f64 {
        self.square_size
    }

    /// Current maximum depth.
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Include and exclude circles as a region.
    pub fn region(&self) -> Region {
        Region::new(self.include, self.exclude)
    }

    /// Root square centered on the area handle.
    pub fn root_square(&self) -> Square {
        Square::from_center(self.area_center, self.square_size)
    }

    /// Rebuild the cover into the scene's buffer.
    pub fn recompute(&mut self) -> Frame {
        let previous_len = self.buffer.len();
        let root = self.root_square();
        let region = self.region();

        #[cfg(feature = "std")]
        let start = std::time::Instant::now();
        let stats = self
            .builder
            .build(root, &region, self.max_depth, &mut self.buffer);
        #[cfg(feature = "std")]
        let elapsed = start.elapsed();

        Frame {
            stats,
            retired: self.buffer.retire_range(previous_len),
            #[cfg(feature = "std")]
            elapsed,
        }
    }

    /// Squares accepted by the last [`recompute`](Self::recompute).
    pub fn accepted(&self) -> &[AcceptedNode] {
        self.buffer.active()
    }

    /// The output buffer, including stale slots.
    pub fn buffer(&self) -> &NodeBuffer {
        &self.buffer
    }

    /// The builder, for inspecting the last traversal tree.
    pub fn builder(&self) -> &Builder {
        &self.builder
    }

    fn slider(&self, t: f64) -> f64 {
        // `max`/`min` rather than `clamp` so NaN maps to 0 instead of propagating.
        t.max(0.0).min(1.0) * self.config.max_size
    }

    fn handle_mut(&mut self, handle: Handle) -> &mut Point {
        match handle {
            Handle::Area => &mut self.area_center,
            Handle::Include => &mut self.include.center,
            Handle::Exclude => &mut self.exclude.center,
        }
    }
}

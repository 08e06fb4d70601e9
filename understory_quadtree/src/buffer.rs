// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-capacity output buffer of accepted nodes.

use alloc::vec;
use alloc::vec::Vec;
use core::ops::Range;

use crate::types::AcceptedNode;

/// Capacity used by [`NodeBuffer::with_default_capacity`].
pub const DEFAULT_MAX_NODES: usize = 4096;

/// Pre-allocated array of accepted-node slots with an explicit active length.
///
/// The physical capacity is fixed at construction and never grows. Each build overwrites
/// slots `[0, len)`; slots at or past `len` keep whatever a previous build left there and
/// must be treated as inactive.
#[derive(Clone)]
pub struct NodeBuffer {
    slots: Vec<AcceptedNode>,
    len: usize,
}

impl core::fmt::Debug for NodeBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NodeBuffer")
            .field("capacity", &self.slots.len())
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

impl Default for NodeBuffer {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

impl NodeBuffer {
    /// Allocate `capacity` default-initialized slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![AcceptedNode::default(); capacity],
            len: 0,
        }
    }

    /// Allocate [`DEFAULT_MAX_NODES`] slots.
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_MAX_NODES)
    }

    /// Number of slots; the most nodes a single build can accept.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of active entries written by the last build.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the last build accepted nothing.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Overwrite slot `index` unconditionally. Does not change the active length.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.capacity()`; the buffer never grows.
    pub fn write(&mut self, index: usize, node: AcceptedNode) {
        self.slots[index] = node;
    }

    /// Active entries `[0, len)`.
    pub fn active(&self) -> &[AcceptedNode] {
        &self.slots[..self.len]
    }

    /// Iterate active entries in traversal order.
    pub fn iter(&self) -> impl Iterator<Item = &AcceptedNode> + '_ {
        self.active().iter()
    }

    /// Active entry at `index`, or `None` past the active length.
    pub fn get(&self, index: usize) -> Option<&AcceptedNode> {
        self.active().get(index)
    }

    /// Every slot, including stale entries past the active length.
    pub fn slots(&self) -> &[AcceptedNode] {
        &self.slots
    }

    /// Indices that were active with `previous_len` and are stale now.
    ///
    /// Empty when the active length did not shrink.
    pub fn retire_range(&self, previous_len: usize) -> Range<usize> {
        self.len..previous_len.max(self.len)
    }

    pub(crate) fn set_len(&mut self, len: usize) {
        debug_assert!(len <= self.slots.len(), "active length exceeds capacity");
        self.len = len.min(self.slots.len());
    }
}

impl<'a> IntoIterator for &'a NodeBuffer {
    type Item = &'a AcceptedNode;
    type IntoIter = core::slice::Iter<'a, AcceptedNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.active().iter()
    }
}

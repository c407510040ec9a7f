//! Body storage for the simulation
//!
//! `BodyStore` is a structure-of-arrays arena. Slots `0..bh_count` hold the
//! massive bodies ("black holes") and slots `bh_count..` hold the massless
//! test particles, so every per-slot array is already laid out massive-first
//! for a renderer that uploads a single buffer.

use super::vecmath::{Frame, NVec3};

/// RGBA, each channel in [0, 1]
pub type Rgba = [f32; 4];

/// Initial state of one slot, produced by the galaxy initializer
#[derive(Debug, Clone, Copy)]
pub struct BodyInit {
    pub x: NVec3, // position
    pub v: NVec3, // velocity
    pub color: Rgba,
    pub point_size: f32,
}

/// Contiguous f32 copies of the store, ready for a GPU upload
#[derive(Debug, Clone, Default)]
pub struct RenderBuffers {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<Rgba>,
    pub point_sizes: Vec<f32>,
    pub indices: Vec<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct BodyStore {
    bh_count: usize,
    x: Vec<NVec3>,         // positions, massive then test
    v: Vec<NVec3>,         // velocities, same layout
    color: Vec<Rgba>,
    point_size: Vec<f32>,
    index: Vec<u32>,       // stable index == slot
    orientation: Vec<Frame>, // one per massive body
    host: Vec<usize>,      // one per test particle
}

impl BodyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bh_count(&self) -> usize {
        self.bh_count
    }

    pub fn particle_count(&self) -> usize {
        self.x.len() - self.bh_count
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    // ------------------------------------------------------------------
    // read-only views
    // ------------------------------------------------------------------

    pub fn positions(&self) -> &[NVec3] {
        &self.x
    }

    pub fn velocities(&self) -> &[NVec3] {
        &self.v
    }

    pub fn colors(&self) -> &[Rgba] {
        &self.color
    }

    pub fn point_sizes(&self) -> &[f32] {
        &self.point_size
    }

    pub fn indices(&self) -> &[u32] {
        &self.index
    }

    pub fn body_positions(&self) -> &[NVec3] {
        &self.x[..self.bh_count]
    }

    pub fn body_velocities(&self) -> &[NVec3] {
        &self.v[..self.bh_count]
    }

    pub fn particle_positions(&self) -> &[NVec3] {
        &self.x[self.bh_count..]
    }

    pub fn particle_velocities(&self) -> &[NVec3] {
        &self.v[self.bh_count..]
    }

    pub fn orientations(&self) -> &[Frame] {
        &self.orientation
    }

    /// Host body of particle `n`, if that body still exists
    pub fn particle_host(&self, n: usize) -> Option<usize> {
        self.host.get(n).copied().filter(|&h| h < self.bh_count)
    }

    /// Color of massive body `i`, if it exists
    pub fn body_color(&self, i: usize) -> Option<Rgba> {
        self.color[..self.bh_count].get(i).copied()
    }

    pub fn render_buffers(&self) -> RenderBuffers {
        RenderBuffers {
            positions: self
                .x
                .iter()
                .map(|p| [p.x as f32, p.y as f32, p.z as f32])
                .collect(),
            colors: self.color.clone(),
            point_sizes: self.point_size.clone(),
            indices: self.index.clone(),
        }
    }

    // ------------------------------------------------------------------
    // mutation (core only)
    // ------------------------------------------------------------------

    /// Split into (bodies, particles) for positions and velocities at once
    pub(crate) fn split_mut(&mut self) -> (SlotsMut<'_>, SlotsMut<'_>) {
        let (bx, px) = self.x.split_at_mut(self.bh_count);
        let (bv, pv) = self.v.split_at_mut(self.bh_count);
        (SlotsMut { x: bx, v: bv }, SlotsMut { x: px, v: pv })
    }

    /// Drop everything and start over with no slots
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    /// Add a massive body at the end of the massive partition
    ///
    /// Particles already stored shift up one slot and every index is
    /// recomputed, so bodies stay first whatever the call order.
    pub fn push_body(&mut self, init: BodyInit, orientation: Frame) {
        let slot = self.bh_count;
        let shifted = slot < self.x.len();
        self.x.insert(slot, init.x);
        self.v.insert(slot, init.v);
        self.color.insert(slot, init.color);
        self.point_size.insert(slot, init.point_size);
        self.orientation.push(orientation);
        self.bh_count += 1;
        if shifted {
            self.reindex();
        } else {
            self.index.push(slot as u32);
        }
    }

    /// Append a test particle orbiting body `host`
    pub fn push_particle(&mut self, init: BodyInit, host: usize) {
        self.index.push(self.x.len() as u32);
        self.x.push(init.x);
        self.v.push(init.v);
        self.color.push(init.color);
        self.point_size.push(init.point_size);
        self.host.push(host);
    }

    /// Shrink the massive set to `n` bodies, keeping the particles
    pub(crate) fn truncate_bodies(&mut self, n: usize) {
        if n >= self.bh_count {
            return;
        }
        let gone = n..self.bh_count;
        self.x.drain(gone.clone());
        self.v.drain(gone.clone());
        self.color.drain(gone.clone());
        self.point_size.drain(gone);
        self.orientation.truncate(n);
        self.bh_count = n;
        self.reindex();
    }

    /// Shrink the particle set to `n` particles
    pub(crate) fn truncate_particles(&mut self, n: usize) {
        let len = self.bh_count + n;
        if len >= self.x.len() {
            return;
        }
        self.x.truncate(len);
        self.v.truncate(len);
        self.color.truncate(len);
        self.point_size.truncate(len);
        self.index.truncate(len);
        self.host.truncate(n);
    }

    fn reindex(&mut self) {
        self.index.clear();
        self.index.extend(0..self.x.len() as u32);
    }
}

/// Mutable position/velocity slices for one partition of the store
pub(crate) struct SlotsMut<'a> {
    pub x: &'a mut [NVec3],
    pub v: &'a mut [NVec3],
}

//! Acceleration contributors for the galaxy engine
//!
//! Massive bodies attract each other and the test particles; particles
//! attract nothing. Each term adds its contribution for both partitions of
//! the [`BodyStore`].

use super::states::BodyStore;
use super::vecmath::NVec3;

/// Trait for acceleration sources operating on a [`BodyStore`]
/// Implementations add their contribution into `out[i]`
pub trait Acceleration {
    /// Acceleration of every test particle, `out.len() == particle_count`
    fn particle_accels(&self, store: &BodyStore, out: &mut [NVec3]);

    /// Acceleration of every massive body, `out.len() == bh_count`
    fn body_accels(&self, store: &BodyStore, out: &mut [NVec3]);
}

/// Collection of acceleration terms whose contributions are summed
pub struct AccelSet {
    terms: Vec<Box<dyn Acceleration + Send + Sync>>,
}

impl Default for AccelSet {
    fn default() -> Self {
        Self::new()
    }
}

impl AccelSet {
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add an acceleration term
    pub fn with(mut self, term: impl Acceleration + Send + Sync + 'static) -> Self {
        self.terms.push(Box::new(term));
        self
    }

    pub fn accumulate_particle_accels(&self, store: &BodyStore, out: &mut [NVec3]) {
        out.fill(NVec3::zeros());
        for term in &self.terms {
            term.particle_accels(store, out);
        }
    }

    pub fn accumulate_body_accels(&self, store: &BodyStore, out: &mut [NVec3]) {
        out.fill(NVec3::zeros());
        for term in &self.terms {
            term.body_accels(store, out);
        }
    }
}

/// Newtonian gravity with a hard floor on the squared separation
///
/// Below `r_min` the inverse-cube factor is held at its value for
/// `r^2 == r_min`, so the pull fades linearly to zero instead of diverging.
/// Every source has the same mass `m_bh`.
#[derive(Debug, Clone, Copy)]
pub struct SoftenedGravity {
    pub g: f64,
    pub m_bh: f64,
    pub r_min: f64,
}

impl SoftenedGravity {
    /// `1 / max(r_min, r^2)^(3/2)`
    #[inline]
    pub fn inv_r3(&self, r2: f64) -> f64 {
        self.r_min.max(r2).powf(-1.5)
    }

    /// Acceleration at `at` from every source except index `skip`
    pub fn accel_at(&self, at: &NVec3, sources: &[NVec3], skip: Option<usize>) -> NVec3 {
        let mut sum = NVec3::zeros();
        for (j, src) in sources.iter().enumerate() {
            if skip == Some(j) {
                continue;
            }
            let d = src - at;
            sum += d * self.inv_r3(d.norm_squared());
        }
        sum * (self.g * self.m_bh)
    }

    /// Acceleration magnitude at separation `r`
    pub fn magnitude_at(&self, r: f64) -> f64 {
        self.g * self.m_bh * r * self.inv_r3(r * r)
    }
}

impl Acceleration for SoftenedGravity {
    fn particle_accels(&self, store: &BodyStore, out: &mut [NVec3]) {
        let sources = store.body_positions();
        for (a, p) in out.iter_mut().zip(store.particle_positions()) {
            *a += self.accel_at(p, sources, None);
        }
    }

    fn body_accels(&self, store: &BodyStore, out: &mut [NVec3]) {
        let sources = store.body_positions();
        for (i, (a, p)) in out.iter_mut().zip(sources).enumerate() {
            *a += self.accel_at(p, sources, Some(i));
        }
    }
}

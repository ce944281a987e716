//! Bag module - 7-bag shape generation
//!
//! Each bag holds one of every shape in a uniformly shuffled order. Shapes
//! are handed out front to back; an empty bag is refilled with a fresh
//! permutation. Across any aligned window of seven draws every shape
//! appears exactly once.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::queue::ShapeSource;
use crate::types::{Shape, BAG_SIZE};

#[derive(Debug, Clone)]
pub struct BagRandomizer {
    bag: [Shape; BAG_SIZE],
    /// Next position to hand out; `BAG_SIZE` means the bag is empty.
    bag_index: usize,
    rng: StdRng,
}

impl BagRandomizer {
    /// Deterministic sequence for a given seed.
    pub fn new(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            bag: Shape::ALL,
            bag_index: BAG_SIZE,
            rng,
        }
    }

    fn refill(&mut self) {
        self.bag = Shape::ALL;
        self.bag.shuffle(&mut self.rng);
        self.bag_index = 0;
    }

    pub fn next_shape(&mut self) -> Shape {
        if self.bag_index >= BAG_SIZE {
            self.refill();
        }
        let shape = self.bag[self.bag_index];
        self.bag_index += 1;
        shape
    }

    /// Shapes still waiting in the current bag.
    pub fn remaining(&self) -> &[Shape] {
        &self.bag[self.bag_index.min(BAG_SIZE)..]
    }

    /// One uniformly random shape, outside the bag order.
    pub fn random_shape(&mut self) -> Shape {
        Shape::ALL[self.rng.gen_range(0..BAG_SIZE)]
    }
}

impl ShapeSource for BagRandomizer {
    fn take(&mut self) -> Option<Shape> {
        Some(self.next_shape())
    }
}

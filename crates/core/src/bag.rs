//! Bag randomizer - 7-bag shape generation
//!
//! Shapes are drawn from whole shuffled bags, one of each shape per bag,
//! appended to a queue that always stays at least one draw ahead of the
//! preview window. A hold swap is delivered out-of-band: the stashed shape
//! short-circuits the next draw without consuming the queue, so the
//! preview window does not shift.
//!
//! Randomness comes from a small LCG, which keeps the whole engine
//! deterministic under a fixed seed.

use std::collections::VecDeque;

use arrayvec::ArrayVec;
use tetrion_types::{Shape, BAG_SIZE, PREVIEW_MAX, PREVIEW_MIN};

/// Simple LCG (Linear Congruential Generator) RNG.
/// Uses constants from Numerical Recipes.
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed. A zero seed is bumped to 1.
    pub fn new(seed: u32) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate the next random u32.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate a random value in range [0, max).
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Shuffle a slice using Fisher-Yates.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// Shape source for one round: queued bags, the preview window, and the
/// out-of-band hold delivery.
#[derive(Debug, Clone)]
pub struct Bag {
    rng: SimpleRng,
    queue: VecDeque<Shape>,
    current: Option<Shape>,
    stashed: Option<Shape>,
    preview_count: usize,
}

impl Bag {
    /// Create a bag with its first seven shapes queued.
    ///
    /// # Panics
    ///
    /// Panics when `preview_count` is outside 1-6.
    pub fn new(seed: u32, preview_count: usize) -> Self {
        assert!(
            (PREVIEW_MIN..=PREVIEW_MAX).contains(&preview_count),
            "preview window outside {PREVIEW_MIN}-{PREVIEW_MAX}: {preview_count}"
        );
        let mut bag = Self {
            rng: SimpleRng::new(seed),
            queue: VecDeque::with_capacity(2 * BAG_SIZE),
            current: None,
            stashed: None,
            preview_count,
        };
        bag.generate();
        bag
    }

    /// Append one shuffled bag holding every shape once.
    fn generate(&mut self) {
        let mut shapes = Shape::ALL;
        self.rng.shuffle(&mut shapes);
        self.queue.extend(shapes);
    }

    /// Draw the shape to spawn next.
    ///
    /// A stashed hold shape takes priority and bypasses the queue entirely,
    /// leaving the preview window as it was. Otherwise the queue is topped
    /// up whenever a draw would leave the preview short, and the front
    /// shape is taken.
    pub fn next(&mut self) -> Shape {
        if let Some(shape) = self.stashed.take() {
            self.current = Some(shape);
            return shape;
        }
        if self.queue.len() <= self.preview_count {
            self.generate();
        }
        let shape = self
            .queue
            .pop_front()
            .expect("bag queue stays ahead of the preview window");
        self.current = Some(shape);
        shape
    }

    /// Stash a shape for delivery on the very next draw. `None` means the
    /// hold slot was empty and nothing gets scheduled.
    pub fn set_hold(&mut self, shape: Option<Shape>) {
        if shape.is_some() {
            self.stashed = shape;
        }
    }

    /// The shape most recently returned by [`Bag::next`].
    pub fn current(&self) -> Option<Shape> {
        self.current
    }

    /// The upcoming shapes, soonest first, always exactly the configured
    /// preview length.
    pub fn preview(&self) -> ArrayVec<Shape, PREVIEW_MAX> {
        self.queue.iter().take(self.preview_count).copied().collect()
    }

    pub fn preview_count(&self) -> usize {
        self.preview_count
    }

    /// Drop queue, stash and current shape, then refill for a new round.
    /// The rng keeps its stream position, so consecutive rounds differ.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.current = None;
        self.stashed = None;
        self.generate();
    }
}

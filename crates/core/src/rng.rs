//! RNG module - 7-bag random piece generation
//!
//! Implements the "7-bag" randomization algorithm: each bag contains one of
//! each piece (I, O, T, S, Z, J, L), shuffled with Fisher-Yates. Bags are
//! appended whole to a lookahead queue, so previewing upcoming pieces never
//! touches the RNG out of order and `draw()` output is the same whether or
//! not `peek()` was called.
//!
//! Also provides a simple LCG so that a given seed yields the same sequence
//! on every platform.

use std::collections::VecDeque;

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // A zero state would make the stream degenerate
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // (a * state + c) mod 2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// 7-bag piece generator with an explicit lookahead queue
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    /// Upcoming pieces, always made of whole bags appended in RNG order
    queue: VecDeque<PieceKind>,
    rng: SimpleRng,
    seed: u32,
}

impl PieceGenerator {
    /// Create a new generator with the given seed
    pub fn new(seed: u32) -> Self {
        Self {
            queue: VecDeque::with_capacity(14),
            rng: SimpleRng::new(seed),
            seed,
        }
    }

    /// Append one freshly shuffled bag to the queue
    fn refill_bag(&mut self) {
        let mut bag = PieceKind::ALL;
        self.rng.shuffle(&mut bag);
        self.queue.extend(bag);
    }

    fn ensure(&mut self, count: usize) {
        while self.queue.len() < count {
            self.refill_bag();
        }
    }

    /// Draw the next piece
    pub fn draw(&mut self) -> PieceKind {
        loop {
            if let Some(kind) = self.queue.pop_front() {
                return kind;
            }
            self.refill_bag();
        }
    }

    /// Peek at the next `count` pieces without consuming them
    pub fn peek(&mut self, count: usize) -> Vec<PieceKind> {
        self.ensure(count);
        self.queue.iter().take(count).copied().collect()
    }

    /// Fill `out` with the upcoming pieces without consuming them.
    ///
    /// Does not allocate once the queue has grown to cover `out`.
    pub fn peek_into(&mut self, out: &mut [PieceKind]) {
        self.ensure(out.len());
        for (slot, kind) in out.iter_mut().zip(self.queue.iter()) {
            *slot = *kind;
        }
    }

    /// Seed this generator was created with
    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl Iterator for PieceGenerator {
    type Item = PieceKind;

    fn next(&mut self) -> Option<PieceKind> {
        Some(self.draw())
    }
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new(1)
    }
}

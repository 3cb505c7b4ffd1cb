//! RNG module - shelf shuffling
//!
//! Every level starts from a uniformly shuffled shelf of books `1..=12`.
//! Shuffling is a textbook Fisher-Yates pass driven by a small seeded LCG, so a
//! given seed always produces the same sequence of puzzles.

use crate::puzzle::Puzzle;
use crate::types::SHELF_SIZE;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of an LCG cycle with short periods.
    pub fn next_range(&mut self, max: u32) -> u32 {
        debug_assert!(max > 0);
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Roll against a probability expressed in parts per thousand
    pub fn chance_per_mille(&mut self, per_mille: u32) -> bool {
        self.next_range(1000) < per_mille
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Current internal state
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Shelf generator
#[derive(Debug, Clone)]
pub struct PuzzleGenerator {
    rng: SimpleRng,
}

impl PuzzleGenerator {
    /// Create a new generator with the given seed
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
        }
    }

    /// Produce a fresh shuffled shelf.
    ///
    /// A shuffle that comes out already sorted is rolled again so no level starts complete.
    pub fn next_puzzle(&mut self) -> Puzzle {
        let mut books = Puzzle::SORTED_BOOKS;
        loop {
            self.rng.shuffle(&mut books);
            let puzzle = Puzzle::from_books(books);
            if !puzzle.is_sorted() {
                return puzzle;
            }
        }
    }

    /// Access the underlying RNG (lamp rolls share the generator stream)
    pub fn rng_mut(&mut self) -> &mut SimpleRng {
        &mut self.rng
    }

    /// Get the current RNG state (for restarting the game with a continuing sequence)
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}

impl Default for PuzzleGenerator {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Shelf of books `1..=SHELF_SIZE` in order.
pub(crate) const fn sorted_books() -> [u8; SHELF_SIZE] {
    let mut out = [0u8; SHELF_SIZE];
    let mut i = 0;
    while i < SHELF_SIZE {
        out[i] = (i + 1) as u8;
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        // Same seed should produce same sequence
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(54321);

        assert_ne!(rng1.next_u32(), rng2.next_u32());
    }

    #[test]
    fn test_zero_seed_is_remapped() {
        let mut zero = SimpleRng::new(0);
        let mut one = SimpleRng::new(1);
        assert_eq!(zero.next_u32(), one.next_u32());
    }

    #[test]
    fn test_next_range_stays_in_bounds() {
        let mut rng = SimpleRng::new(7);
        for max in 1..50 {
            for _ in 0..20 {
                assert!(rng.next_range(max) < max);
            }
        }
    }

    #[test]
    fn test_puzzle_is_permutation() {
        let mut generator = PuzzleGenerator::new(99);
        for _ in 0..200 {
            let puzzle = generator.next_puzzle();
            let mut books = *puzzle.books();
            books.sort_unstable();
            assert_eq!(books, sorted_books());
            assert!(!puzzle.is_sorted());
        }
    }

    #[test]
    fn test_generator_deterministic_per_seed() {
        let mut a = PuzzleGenerator::new(42);
        let mut b = PuzzleGenerator::new(42);
        for _ in 0..10 {
            assert_eq!(a.next_puzzle(), b.next_puzzle());
        }

        // A generator resumed from the exposed seed continues the same sequence
        let mut resumed = PuzzleGenerator::new(a.seed());
        assert_eq!(a.seed(), a.rng_mut().state());
        assert_eq!(resumed.next_puzzle(), a.next_puzzle());
    }

    #[test]
    fn test_shuffle_reaches_every_slot() {
        // Book 1 should land in every slot at least once over many shuffles.
        let mut generator = PuzzleGenerator::new(3);
        let mut seen = [false; SHELF_SIZE];
        for _ in 0..2000 {
            let puzzle = generator.next_puzzle();
            let slot = puzzle.position_of(1).unwrap();
            seen[slot] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}

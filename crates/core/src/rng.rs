//! RNG module - bag-based piece supply
//!
//! Generalises the "7-bag" randomiser to a library of any size: the queue is
//! seeded with one shuffled copy of the whole library and topped up with a
//! freshly shuffled copy whenever fewer than [`QUEUE_REFILL_BELOW`] pieces
//! remain. Every batch contains each library piece exactly once.
//!
//! Also provides a simple LCG so a whole game is reproducible from its seed.

use std::collections::VecDeque;

use crate::library::PieceLibrary;
use crate::mino::Mino;
use crate::types::QUEUE_REFILL_BELOW;

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
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // High bits of an LCG are far better mixed than the low ones.
        ((u64::from(self.next_u32()) * u64::from(max)) >> 32) as u32
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Current state (for restarting a game with the same sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Upcoming pieces, refilled one shuffled library at a time
#[derive(Debug, Clone)]
pub struct PieceQueue {
    library: PieceLibrary,
    queue: VecDeque<Mino>,
    rng: SimpleRng,
}

impl PieceQueue {
    /// Create a queue holding one shuffled bag
    pub fn new(library: PieceLibrary, seed: u32) -> Self {
        let mut queue = Self {
            library,
            queue: VecDeque::new(),
            rng: SimpleRng::new(seed),
        };
        let bag = queue.new_bag();
        queue.queue.extend(bag);
        queue
    }

    /// A uniformly shuffled copy of the whole library
    pub fn new_bag(&mut self) -> Vec<Mino> {
        let mut bag = self.library.minos().to_vec();
        self.rng.shuffle(&mut bag);
        bag
    }

    /// Take the next piece, topping the queue up when it runs low.
    pub fn draw(&mut self) -> Mino {
        if self.queue.is_empty() {
            let bag = self.new_bag();
            self.queue.extend(bag);
        }

        let Some(mino) = self.queue.pop_front() else {
            unreachable!("a piece library is never empty");
        };

        if self.queue.len() < QUEUE_REFILL_BELOW {
            let bag = self.new_bag();
            self.queue.extend(bag);
        }
        mino
    }

    /// Up to `n` upcoming pieces without consuming them
    pub fn peek(&self, n: usize) -> impl Iterator<Item = &Mino> {
        self.queue.iter().take(n)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn library(&self) -> &PieceLibrary {
        &self.library
    }

    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted_names<'a>(minos: impl IntoIterator<Item = &'a Mino>) -> Vec<String> {
        let mut names: Vec<String> = minos.into_iter().map(|m| m.name().to_string()).collect();
        names.sort();
        names
    }

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_zero_seed_is_usable() {
        let mut rng = SimpleRng::new(0);
        assert_ne!(rng.next_u32(), rng.next_u32());
    }

    #[test]
    fn test_next_range_stays_in_bounds() {
        let mut rng = SimpleRng::new(7);
        for max in 1..50 {
            assert!(rng.next_range(max) < max);
        }
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut rng = SimpleRng::new(99);
        let mut values: Vec<u32> = (0..20).collect();
        rng.shuffle(&mut values);
        let mut sorted = values.clone();
        sorted.sort();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_new_bag_holds_each_piece_once() {
        let library = PieceLibrary::standard();
        let mut queue = PieceQueue::new(library.clone(), 3);
        for _ in 0..5 {
            let bag = queue.new_bag();
            assert_eq!(sorted_names(&bag), sorted_names(library.minos()));
        }
    }

    #[test]
    fn test_first_draws_cover_the_library() {
        let library = PieceLibrary::standard();
        let mut queue = PieceQueue::new(library.clone(), 1);

        let drawn: Vec<Mino> = (0..library.len()).map(|_| queue.draw()).collect();
        assert_eq!(sorted_names(&drawn), sorted_names(library.minos()));
    }

    #[test]
    fn test_queue_refills_below_six() {
        let mut queue = PieceQueue::new(PieceLibrary::standard(), 1);
        assert_eq!(queue.len(), 7);

        queue.draw();
        assert_eq!(queue.len(), 6);
        queue.draw();
        // Dropped to 5: a new bag of 7 was appended.
        assert_eq!(queue.len(), 12);
    }

    #[test]
    fn test_single_piece_library_never_runs_dry() {
        let library = PieceLibrary::from_json_str(
            r#"[{"name": "dot", "color": [1, 1, 1], "blocks": [[0, 0, 1]]}]"#,
        )
        .unwrap();
        let mut queue = PieceQueue::new(library, 5);
        for _ in 0..20 {
            assert_eq!(queue.draw().name(), "dot");
            assert!(!queue.is_empty());
        }
    }

    #[test]
    fn test_peek_matches_draw_order() {
        let mut queue = PieceQueue::new(PieceLibrary::standard(), 42);
        let peeked: Vec<String> = queue.peek(5).map(|m| m.name().to_string()).collect();
        assert_eq!(peeked.len(), 5);
        for name in peeked {
            assert_eq!(queue.draw().name(), name);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = PieceQueue::new(PieceLibrary::standard(), 2024);
        let mut b = PieceQueue::new(PieceLibrary::standard(), 2024);
        for _ in 0..30 {
            assert_eq!(a.draw().name(), b.draw().name());
        }
    }
}

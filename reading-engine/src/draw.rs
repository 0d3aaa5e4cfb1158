//! Random card selection.

use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom, thread_rng};

use crate::cards::Card;

/// Draws `count` distinct cards uniformly at random.
///
/// When the pool holds fewer than `count` cards the whole pool is returned
/// (shuffled). Never fails.
pub fn draw_cards<R>(pool: &[Card], count: usize, rng: &mut R) -> Vec<Card>
where
    R: rand::Rng + ?Sized,
{
    pool.choose_multiple(rng, count).cloned().collect()
}

/// Where a request's randomness comes from.
///
/// `Entropy` uses the thread-local generator; `Seeded` rebuilds a `StdRng`
/// from the same seed for every draw, so every reading sees the same cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawSource {
    #[default]
    Entropy,
    Seeded(u64),
}

impl DrawSource {
    pub fn draw(&self, pool: &[Card], count: usize) -> Vec<Card> {
        match *self {
            DrawSource::Entropy => draw_cards(pool, count, &mut thread_rng()),
            DrawSource::Seeded(seed) => draw_cards(pool, count, &mut StdRng::seed_from_u64(seed)),
        }
    }
}

//! Random source capability.
//!
//! Every simulation call takes an explicit `RandomSource`; there is no global
//! generator. Any `rand::Rng` is a random source, so seeded
//! `rand_chacha::ChaCha8Rng` streams give reproducible, independent trials.

use rand::Rng;

pub trait RandomSource {
    /// Index drawn with probability proportional to `probabilities[i]`.
    fn draw_categorical(&mut self, probabilities: &[f64]) -> usize;

    /// Index drawn uniformly from `0..count`. Returns 0 when `count <= 1`.
    fn draw_uniform_index(&mut self, count: usize) -> usize;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn draw_categorical(&mut self, probabilities: &[f64]) -> usize {
        weighted_choice_index(probabilities, self)
    }

    fn draw_uniform_index(&mut self, count: usize) -> usize {
        if count <= 1 {
            return 0;
        }
        self.gen_range(0..count)
    }
}

/// 가중치 기반 랜덤 선택. weights 배열의 인덱스 반환.
///
/// Negative weights count as zero and a zero-weight entry is never returned
/// while some weight is positive. Consumes exactly one `f64` draw.
#[inline]
pub fn weighted_choice_index<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> usize {
    let total: f64 = weights.iter().map(|w| w.max(0.0)).sum();
    let mut r = rng.gen::<f64>() * total;
    if total <= 0.0 {
        return 0;
    }

    for (i, &w) in weights.iter().enumerate() {
        let w = w.max(0.0);
        if w > 0.0 && r < w {
            return i;
        }
        r -= w;
    }
    // rounding left r just past the last bucket
    weights.iter().rposition(|&w| w > 0.0).unwrap_or(0)
}

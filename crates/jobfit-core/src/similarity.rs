/// Cosine similarity of two vectors, clamped to `[-1, 1]`.
///
/// Empty, mismatched or zero-norm inputs score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let mut dot = 0.0_f32;
    let mut norm_a = 0.0_f32;
    let mut norm_b = 0.0_f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < 1e-12 {
        return 0.0;
    }
    (dot / denom).clamp(-1.0, 1.0)
}

/// Index and value of the first maximum. Later equal values never displace an
/// earlier one, so ties resolve to list order.
pub fn first_argmax<I>(scores: I) -> Option<(usize, f32)>
where
    I: IntoIterator<Item = f32>,
{
    let mut best: Option<(usize, f32)> = None;
    for (i, s) in scores.into_iter().enumerate() {
        match best {
            Some((_, b)) if s <= b => {}
            _ if s.is_nan() => {}
            _ => best = Some((i, s)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_direction_is_one() {
        let v = [0.3, 0.4, 0.5];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
        assert!((cosine_similarity(&v, &[0.6, 0.8, 1.0]) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn orthogonal_and_degenerate_are_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn argmax_prefers_first_of_equal_maxima() {
        assert_eq!(first_argmax([0.2, 0.9, 0.9, 0.1]), Some((1, 0.9)));
        assert_eq!(first_argmax(std::iter::empty()), None);
        assert_eq!(first_argmax([f32::NAN, 0.5]), Some((1, 0.5)));
    }
}

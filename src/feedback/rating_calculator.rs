/// Mean of all feedback ratings, or None when there are none.
///
/// The coach aggregate is always recomputed from the full rating set rather
/// than nudged incrementally, so it cannot drift.
pub fn mean_rating(ratings: &[i16]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let sum: i32 = ratings.iter().map(|&r| r as i32).sum();
    Some(sum as f64 / ratings.len() as f64)
}

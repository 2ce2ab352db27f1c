//! Running mean of submitted ratings

/// Fold one more submission into the mean. Returns `(rating, num_ratings)`.
pub fn add_rating(current: f64, count: u32, submitted: f64) -> (f64, u32) {
    let updated_count = count + 1;
    let updated = (current * f64::from(count) + submitted) / f64::from(updated_count);
    (updated, updated_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_rating() {
        assert_eq!(add_rating(0.0, 0, 4.0), (4.0, 1));
    }

    #[test]
    fn test_mean_of_sequence() {
        let submissions = [4.0, 5.0, 3.0, 2.5, 5.0];
        let (rating, count) = submissions
            .iter()
            .fold((0.0, 0), |(r, n), s| add_rating(r, n, *s));

        let mean = submissions.iter().sum::<f64>() / submissions.len() as f64;
        assert_eq!(count, 5);
        assert!((rating - mean).abs() < 1e-9);
    }

    #[test]
    fn test_two_ratings() {
        let (r, n) = add_rating(4.0, 1, 5.0);
        assert_eq!(n, 2);
        assert!((r - 4.5).abs() < 1e-12);
    }
}

//! Listing limits and in-process ranking

use restaurant_types::Restaurant;
use std::cmp::Ordering;

pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 100;

/// Resolve the requested `limit` into `1..=MAX_LIMIT`
pub fn clamp_limit(requested: Option<i64>) -> usize {
    match requested {
        None => DEFAULT_LIMIT,
        Some(n) if n < 1 => 1,
        Some(n) => (n as u64).min(MAX_LIMIT as u64) as usize,
    }
}

/// Sort by rating descending and keep the first `limit` rows
pub fn top_rated(mut restaurants: Vec<Restaurant>, limit: usize) -> Vec<Restaurant> {
    restaurants.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal));
    restaurants.truncate(limit);
    restaurants
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rated(name: &str, rating: f64) -> Restaurant {
        let mut r = Restaurant::new(name.into(), "Italian".into(), "North".into());
        r.rating = rating;
        r
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None), 10);
        assert_eq!(clamp_limit(Some(25)), 25);
        assert_eq!(clamp_limit(Some(100)), 100);
        assert_eq!(clamp_limit(Some(500)), 100);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(-3)), 1);
    }

    #[test]
    fn test_top_rated_orders_and_truncates() {
        let rows = vec![rated("a", 2.0), rated("b", 4.5), rated("c", 3.0), rated("d", 1.0)];
        let top = top_rated(rows, 3);

        let names: Vec<_> = top.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_top_rated_short_input() {
        let top = top_rated(vec![rated("a", 1.0)], 10);
        assert_eq!(top.len(), 1);
    }
}

//! Restaurant types

use serde::{Deserialize, Serialize};

/// Stored restaurant record, keyed by `name`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub name: String,
    pub cuisine: String,
    pub region: String,
    /// Arithmetic mean of every submitted rating, 0 until the first one
    pub rating: f64,
    pub num_ratings: u32,
}

impl Restaurant {
    /// A freshly created record has no ratings yet
    pub fn new(name: String, cuisine: String, region: String) -> Self {
        Self {
            name,
            cuisine,
            region,
            rating: 0.0,
            num_ratings: 0,
        }
    }

    /// Public projection served to clients and stored in the cache
    pub fn view(&self) -> RestaurantView {
        RestaurantView {
            name: self.name.clone(),
            cuisine: self.cuisine.clone(),
            rating: self.rating,
            region: self.region.clone(),
        }
    }
}

/// Restaurant as returned by the HTTP API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantView {
    pub name: String,
    pub cuisine: String,
    pub rating: f64,
    pub region: String,
}

impl From<Restaurant> for RestaurantView {
    fn from(r: Restaurant) -> Self {
        RestaurantView {
            name: r.name,
            cuisine: r.cuisine,
            rating: r.rating,
            region: r.region,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_restaurant_is_unrated() {
        let r = Restaurant::new("R1".into(), "Italian".into(), "North".into());
        assert_eq!(r.rating, 0.0);
        assert_eq!(r.num_ratings, 0);
    }

    #[test]
    fn test_view_shape() {
        let r = Restaurant::new("R1".into(), "Italian".into(), "North".into());
        let json = serde_json::to_value(r.view()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "name": "R1",
                "cuisine": "Italian",
                "rating": 0.0,
                "region": "North"
            })
        );
    }
}

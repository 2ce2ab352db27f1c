//! Cache key derivation, one shape per query
//!
//! Values are escaped so `_` only ever appears as a separator; otherwise a
//! region named `North_cuisine_Italian` would share a key with the
//! North/Italian listing.

use std::borrow::Cow;

pub fn restaurant(name: &str) -> String {
    format!("restaurant_{}", escape(name))
}

pub fn cuisine(cuisine: &str, limit: usize) -> String {
    format!("cuisine_{}_limit_{}", escape(cuisine), limit)
}

pub fn region(region: &str, limit: usize) -> String {
    format!("region_{}_limit_{}", escape(region), limit)
}

pub fn region_cuisine(region: &str, cuisine: &str, limit: usize) -> String {
    format!(
        "region_{}_cuisine_{}_limit_{}",
        escape(region),
        escape(cuisine),
        limit
    )
}

fn escape(value: &str) -> Cow<'_, str> {
    if !value.contains(['_', '%']) {
        return Cow::Borrowed(value);
    }
    Cow::Owned(value.replace('%', "%25").replace('_', "%5F"))
}

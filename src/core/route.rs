//! Shopping-route sequencing.
//!
//! Orders a resolved selection of items into a walking order through the
//! store: ascending aisle, input order kept for equal aisles, items without
//! a usable aisle at the end. The function is total; it never fails and
//! never mutates its input.

use crate::domain::model::{ApiItem, StoredItem};

/// Aisle key used for items whose placement is unknown.
pub const UNKNOWN_AISLE: u32 = u32::MAX;

/// Anything that can be placed on a route.
pub trait RouteStop {
    fn aisle(&self) -> Option<u32>;

    fn route_key(&self) -> u32 {
        self.aisle().unwrap_or(UNKNOWN_AISLE)
    }
}

impl RouteStop for StoredItem {
    fn aisle(&self) -> Option<u32> {
        self.aisle
    }
}

impl RouteStop for ApiItem {
    fn aisle(&self) -> Option<u32> {
        self.aisle
    }
}

impl<T: RouteStop + ?Sized> RouteStop for &T {
    fn aisle(&self) -> Option<u32> {
        (**self).aisle()
    }
}

/// Returns `items` reordered into visit order.
pub fn sequence<T: RouteStop + Clone>(items: &[T]) -> Vec<T> {
    let mut route = items.to_vec();
    // sort_by_key is stable: equal aisles keep input order
    route.sort_by_key(|stop| stop.route_key());
    route
}

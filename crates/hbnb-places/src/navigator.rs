//! Read-only traversal of the foreign-key-derived collections
//! State -> Cities, City -> Places, Place -> Amenities.
//!
//! A [`Navigator`] reads the cities and places of the store in one
//! [`EntityStore::snapshot`] and groups them by parent id, so every
//! traversal within one request sees the same data and costs a map lookup
//! instead of a store scan.

use std::collections::{HashMap, HashSet};

use hbnb_store::{EntityStore, EntityStoreExt};
use hbnb_types::{City, EntityId, Place, State};
use tracing::debug;

use crate::error::PlaceResult;

pub struct Navigator {
    places: Vec<Place>,
    cities_by_state: HashMap<EntityId, Vec<City>>,
    places_by_city: HashMap<EntityId, Vec<usize>>,
}

impl Navigator {
    /// Load the city and place tables from `store` under one read.
    pub fn load(store: &dyn EntityStore) -> PlaceResult<Self> {
        let (cities, places): (Vec<City>, Vec<Place>) = store.pair_as()?;

        let mut cities_by_state: HashMap<EntityId, Vec<City>> = HashMap::new();
        for city in cities {
            cities_by_state
                .entry(city.state_id.clone())
                .or_default()
                .push(city);
        }

        let mut places_by_city: HashMap<EntityId, Vec<usize>> = HashMap::new();
        for (idx, place) in places.iter().enumerate() {
            places_by_city
                .entry(place.city_id.clone())
                .or_default()
                .push(idx);
        }

        debug!(
            states = cities_by_state.len(),
            cities = places_by_city.len(),
            places = places.len(),
            "navigator loaded"
        );

        Ok(Self {
            places,
            cities_by_state,
            places_by_city,
        })
    }

    /// Cities of a state, in store order.
    pub fn cities_of(&self, state: &State) -> &[City] {
        self.cities_by_state
            .get(&state.id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Places of a city, in store order.
    pub fn places_of<'a>(&'a self, city: &City) -> impl Iterator<Item = &'a Place> + 'a {
        self.places_by_city
            .get(&city.id)
            .into_iter()
            .flatten()
            .filter_map(|idx| self.places.get(*idx))
    }

    /// Amenity ids linked to a place.
    pub fn amenities_of<'a>(&self, place: &'a Place) -> HashSet<&'a EntityId> {
        place.amenity_ids.iter().collect()
    }

    /// Every place in the snapshot, in store order.
    pub fn all_places(&self) -> &[Place] {
        &self.places
    }
}

//! Place search: resolves a mix of state, city, and amenity filters into a
//! set of places.
//!
//! # Resolution
//!
//! 1. No filters at all: every place in the store, in store order.
//! 2. Otherwise build the location set `L`:
//!    - places of every city of every resolved state, appended as found
//!      (not checked against `L`);
//!    - places of every resolved city, appended only if not already in `L`.
//! 3. With amenity filters: if `L` is still empty the base becomes every
//!    place in the store; keep only places linked to *all* requested
//!    amenities. An amenity id that does not resolve matches nothing.
//!
//! Ids that do not resolve are skipped; they never fail the search.
//!
//! Step 2 is asymmetric: a state listed twice contributes its places twice.
//! [`SearchOptions::dedup_location_union`] switches the state step to the
//! same membership check as the city step.

use std::collections::HashSet;

use hbnb_store::{EntityStore, EntityStoreExt};
use hbnb_types::{Amenity, City, EntityId, Place, State};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{PlaceError, PlaceResult};
use crate::navigator::Navigator;

/// Search request body: `{states?: [id], cities?: [id], amenities?: [id]}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub states: Option<Vec<EntityId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cities: Option<Vec<EntityId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amenities: Option<Vec<EntityId>>,
}

impl SearchFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_states<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<EntityId>,
    {
        self.states = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_cities<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<EntityId>,
    {
        self.cities = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_amenities<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<EntityId>,
    {
        self.amenities = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Parse an already-decoded request body. `None` and `null` mean
    /// "no filters"; anything but an object is rejected.
    pub fn from_body(body: Option<&Value>) -> PlaceResult<Self> {
        match body {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(value @ Value::Object(_)) => Self::deserialize(value)
                .map_err(|e| PlaceError::validation(format!("invalid search filters: {e}"))),
            Some(_) => Err(PlaceError::validation("Not a JSON")),
        }
    }

    pub fn state_ids(&self) -> &[EntityId] {
        self.states.as_deref().unwrap_or_default()
    }

    pub fn city_ids(&self) -> &[EntityId] {
        self.cities.as_deref().unwrap_or_default()
    }

    pub fn amenity_ids(&self) -> &[EntityId] {
        self.amenities.as_deref().unwrap_or_default()
    }

    /// `true` when every filter is absent or empty.
    pub fn is_empty(&self) -> bool {
        self.state_ids().is_empty() && self.city_ids().is_empty() && self.amenity_ids().is_empty()
    }
}

/// Tuning knobs for search resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Also check state-derived places against the accumulated set, making
    /// the location step a plain set union.
    #[serde(default)]
    pub dedup_location_union: bool,
}

/// Resolved places plus whether any filter was applied.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchOutcome {
    pub places: Vec<Place>,
    /// `false` only for the no-filter path, which returns the store as-is.
    pub filtered: bool,
}

impl SearchOutcome {
    pub fn ids(&self) -> Vec<&EntityId> {
        self.places.iter().map(|p| &p.id).collect()
    }
}

/// Resolve `filters` against `store`.
pub fn resolve(
    store: &dyn EntityStore,
    filters: &SearchFilters,
    options: &SearchOptions,
) -> PlaceResult<SearchOutcome> {
    if filters.is_empty() {
        let places: Vec<Place> = store.all_as()?;
        debug!(count = places.len(), "search without filters");
        return Ok(SearchOutcome {
            places,
            filtered: false,
        });
    }

    let nav = Navigator::load(store)?;
    let mut located = locate(store, &nav, filters, options)?;

    let amenity_ids = filters.amenity_ids();
    if !amenity_ids.is_empty() {
        let base = if located.is_empty() {
            nav.all_places().to_vec()
        } else {
            located
        };
        located = filter_by_amenities(store, &nav, base, amenity_ids)?;
    }

    debug!(count = located.len(), "search resolved");
    Ok(SearchOutcome {
        places: located,
        filtered: true,
    })
}

fn locate(
    store: &dyn EntityStore,
    nav: &Navigator,
    filters: &SearchFilters,
    options: &SearchOptions,
) -> PlaceResult<Vec<Place>> {
    let mut located = Vec::new();
    let mut seen: HashSet<EntityId> = HashSet::new();

    for state_id in filters.state_ids() {
        let Some(state) = store.get_as::<State>(state_id)? else {
            debug!(%state_id, "search skips unknown state");
            continue;
        };
        for city in nav.cities_of(&state) {
            for place in nav.places_of(city) {
                let first = seen.insert(place.id.clone());
                if first || !options.dedup_location_union {
                    located.push(place.clone());
                }
            }
        }
    }

    for city_id in filters.city_ids() {
        let Some(city) = store.get_as::<City>(city_id)? else {
            debug!(%city_id, "search skips unknown city");
            continue;
        };
        for place in nav.places_of(&city) {
            if seen.insert(place.id.clone()) {
                located.push(place.clone());
            }
        }
    }

    Ok(located)
}

fn filter_by_amenities(
    store: &dyn EntityStore,
    nav: &Navigator,
    base: Vec<Place>,
    amenity_ids: &[EntityId],
) -> PlaceResult<Vec<Place>> {
    let mut required = Vec::with_capacity(amenity_ids.len());
    for amenity_id in amenity_ids {
        match store.get_as::<Amenity>(amenity_id)? {
            Some(amenity) => required.push(amenity.id),
            None => {
                // Nothing can carry an amenity that does not exist.
                debug!(%amenity_id, "search amenity filter cannot match");
                return Ok(Vec::new());
            }
        }
    }

    Ok(base
        .into_iter()
        .filter(|place| {
            let linked = nav.amenities_of(place);
            required.iter().all(|id| linked.contains(id))
        })
        .collect())
}

use std::sync::{Arc, Mutex, MutexGuard};

use hbnb_store::EntityStore;
use hbnb_types::{Amenity, EntityId, Place};
use serde_json::Value;

use crate::error::{PlaceError, PlaceResult};
use crate::mutation;
use crate::query::{self, Stats};
use crate::search::{SearchFilters, SearchOptions, SearchOutcome};

/// Entry point for every place operation against a shared store.
///
/// Reads go straight to the store. Mutations are serialized through a
/// write lock so that a staged change is always persisted (or discarded)
/// before the next mutation stages its own.
pub struct PlaceService {
    store: Arc<dyn EntityStore>,
    options: SearchOptions,
    write_lock: Mutex<()>,
}

impl PlaceService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self::with_options(store, SearchOptions::default())
    }

    pub fn with_options(store: Arc<dyn EntityStore>, options: SearchOptions) -> Self {
        Self {
            store,
            options,
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &dyn EntityStore {
        self.store.as_ref()
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    fn exclusive(&self) -> PlaceResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| PlaceError::Internal("write lock poisoned".into()))
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub fn list_places_of_city(&self, city_id: &EntityId) -> PlaceResult<Vec<Place>> {
        query::list_places_of_city(self.store(), city_id)
    }

    pub fn get_place(&self, place_id: &EntityId) -> PlaceResult<Place> {
        query::get_place(self.store(), place_id)
    }

    pub fn list_amenities_of_place(&self, place_id: &EntityId) -> PlaceResult<Vec<Amenity>> {
        query::list_amenities_of_place(self.store(), place_id)
    }

    /// Search with the service's configured [`SearchOptions`].
    pub fn search_places(&self, filters: &SearchFilters) -> PlaceResult<SearchOutcome> {
        query::search_places(self.store(), filters, &self.options)
    }

    pub fn stats(&self) -> PlaceResult<Stats> {
        query::stats(self.store())
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    pub fn create_place(&self, city_id: &EntityId, payload: &Value) -> PlaceResult<Place> {
        let _guard = self.exclusive()?;
        mutation::create_place(self.store(), city_id, payload)
    }

    pub fn update_place(&self, place_id: &EntityId, payload: &Value) -> PlaceResult<Place> {
        let _guard = self.exclusive()?;
        mutation::update_place(self.store(), place_id, payload)
    }

    pub fn delete_place(&self, place_id: &EntityId) -> PlaceResult<()> {
        let _guard = self.exclusive()?;
        mutation::delete_place(self.store(), place_id)
    }

    pub fn link_amenity(&self, place_id: &EntityId, amenity_id: &EntityId) -> PlaceResult<(Amenity, bool)> {
        let _guard = self.exclusive()?;
        mutation::link_amenity(self.store(), place_id, amenity_id)
    }

    pub fn unlink_amenity(&self, place_id: &EntityId, amenity_id: &EntityId) -> PlaceResult<()> {
        let _guard = self.exclusive()?;
        mutation::unlink_amenity(self.store(), place_id, amenity_id)
    }
}

impl std::fmt::Debug for PlaceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaceService")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Graph;
    use serde_json::json;
    use std::thread;

    fn service(graph: &Graph) -> PlaceService {
        PlaceService::new(graph.store.clone())
    }

    #[test]
    fn create_then_read_back() {
        let graph = Graph::scenario();
        let svc = service(&graph);
        let place = svc
            .create_place(&graph.c2.id, &json!({"user_id": "u1", "name": "Cabin"}))
            .unwrap();
        assert_eq!(svc.get_place(&place.id).unwrap(), place);
        let in_city = svc.list_places_of_city(&graph.c2.id).unwrap();
        assert_eq!(in_city.len(), 2);
        assert_eq!(svc.stats().unwrap()["places"], 4);
    }

    #[test]
    fn search_uses_configured_options() {
        let graph = Graph::scenario();
        let filters = SearchFilters::new().with_states(["s1"]).with_cities(["c1"]);

        let plain = service(&graph).search_places(&filters).unwrap();
        assert_eq!(plain.places.len(), 2);

        let strict = PlaceService::with_options(
            graph.store.clone(),
            SearchOptions {
                dedup_location_union: true,
            },
        );
        assert!(strict.options().dedup_location_union);
        assert_eq!(strict.search_places(&filters).unwrap().places.len(), 2);
    }

    #[test]
    fn link_and_list_amenities() {
        let graph = Graph::scenario();
        let svc = service(&graph);
        let (_, created) = svc.link_amenity(&graph.p2.id, &graph.tv.id).unwrap();
        assert!(created);
        let names: Vec<String> = svc
            .list_amenities_of_place(&graph.p2.id)
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, ["Wifi", "TV"]);
        svc.unlink_amenity(&graph.p2.id, &graph.tv.id).unwrap();
        assert_eq!(svc.list_amenities_of_place(&graph.p2.id).unwrap().len(), 1);
    }

    #[test]
    fn concurrent_creates_all_land() {
        let graph = Graph::scenario();
        let svc = Arc::new(service(&graph));
        let city = graph.c1.id.clone();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let svc = Arc::clone(&svc);
                let city = city.clone();
                thread::spawn(move || {
                    svc.create_place(&city, &json!({"user_id": "u1", "name": format!("Room {i}")}))
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(svc.list_places_of_city(&city).unwrap().len(), 10);
    }

    #[test]
    fn concurrent_updates_to_one_place_keep_both_fields() {
        use std::sync::Barrier;

        for round in 0..20 {
            let graph = Graph::scenario();
            let svc = Arc::new(service(&graph));
            let barrier = Arc::new(Barrier::new(2));

            let handles: Vec<_> = [json!({"key_a": round}), json!({"key_b": round})]
                .into_iter()
                .map(|payload| {
                    let svc = Arc::clone(&svc);
                    let barrier = Arc::clone(&barrier);
                    let id = graph.p1.id.clone();
                    thread::spawn(move || {
                        barrier.wait();
                        svc.update_place(&id, &payload).unwrap()
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }

            let place = svc.get_place(&graph.p1.id).unwrap();
            assert_eq!(place.attribute("key_a"), Some(&json!(round)), "round {round}");
            assert_eq!(place.attribute("key_b"), Some(&json!(round)), "round {round}");
            assert_eq!(place.name(), Some("P1"));
        }
    }

    #[test]
    fn delete_is_visible_to_reads() {
        let graph = Graph::scenario();
        let svc = service(&graph);
        svc.delete_place(&graph.p1.id).unwrap();
        assert!(svc.get_place(&graph.p1.id).unwrap_err().is_not_found());
        assert!(svc.delete_place(&graph.p1.id).unwrap_err().is_not_found());
    }

    #[test]
    fn debug_hides_store() {
        let graph = Graph::scenario();
        let debug = format!("{:?}", service(&graph));
        assert!(debug.contains("PlaceService"));
    }
}

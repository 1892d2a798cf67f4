//! Shared test graph.
//!
//! ```text
//! s1 ── c1 ── p1 {wifi, pool}
//!          └─ p2 {wifi}
//! s2 ── c2 ── p3 {}
//! ```
//! Plus amenity `tv` (linked to nothing) and user `u1` owning every place.

use std::sync::Arc;

use hbnb_store::{EntityStore, InMemoryEntityStore};
use hbnb_types::{Amenity, City, Entity, Place, State, User};

pub(crate) struct Graph {
    pub store: Arc<InMemoryEntityStore>,
    pub s1: State,
    pub s2: State,
    pub c1: City,
    pub c2: City,
    pub p1: Place,
    pub p2: Place,
    pub p3: Place,
    pub wifi: Amenity,
    pub pool: Amenity,
    pub tv: Amenity,
    pub user: User,
}

impl Graph {
    pub fn scenario() -> Self {
        let s1 = State::new("S1").with_id("s1");
        let s2 = State::new("S2").with_id("s2");
        let c1 = City::new(s1.id.clone(), "C1").with_id("c1");
        let c2 = City::new(s2.id.clone(), "C2").with_id("c2");
        let user = User::new("owner@hbnb.io", "pw").with_id("u1");
        let wifi = Amenity::new("Wifi").with_id("wifi");
        let pool = Amenity::new("Pool").with_id("pool");
        let tv = Amenity::new("TV").with_id("tv");

        let mut p1 = Place::named(c1.id.clone(), user.id.clone(), "P1").with_id("p1");
        p1.link_amenity(wifi.id.clone());
        p1.link_amenity(pool.id.clone());
        let mut p2 = Place::named(c1.id.clone(), user.id.clone(), "P2").with_id("p2");
        p2.link_amenity(wifi.id.clone());
        let p3 = Place::named(c2.id.clone(), user.id.clone(), "P3").with_id("p3");

        let entities: Vec<Entity> = vec![
            s1.clone().into(),
            s2.clone().into(),
            c1.clone().into(),
            c2.clone().into(),
            user.clone().into(),
            wifi.clone().into(),
            pool.clone().into(),
            tv.clone().into(),
            p1.clone().into(),
            p2.clone().into(),
            p3.clone().into(),
        ];

        Self {
            store: Arc::new(InMemoryEntityStore::with_entities(entities)),
            s1,
            s2,
            c1,
            c2,
            p1,
            p2,
            p3,
            wifi,
            pool,
            tv,
            user,
        }
    }

    pub fn store(&self) -> &dyn EntityStore {
        self.store.as_ref()
    }
}

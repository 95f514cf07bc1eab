//! The collections `corral serve` mounts.

use std::sync::Arc;

use corral_core::fixtures::{self, Animal, Exhibit, Locker, Ticket};
use corral_core::{Collection, CollectionConfig};
use corral_server::Resources;
use corral_store::{MemoryStore, ScopedStore, Store, StoredCollection};

/// `zoo`, `bikesheds`, `exhibits` (with an `animals` child per exhibit),
/// `tickets` (addressed by number), and a store-backed `lockers`.
pub async fn resources() -> anyhow::Result<Resources> {
    let exhibits: Collection<Exhibit> = Collection::default();
    let savanna = Exhibit::new("savanna");
    for (name, species, diet) in &fixtures::PRIDE_LANDS[..3] {
        savanna.animals().add(Animal::new(name, species, diet))?;
    }
    exhibits.add(savanna)?;

    let tickets = fixtures::tracker();
    tickets.add(Ticket::new(7, "flaky build"))?;

    let store: Arc<dyn Store<Locker>> = Arc::new(MemoryStore::<Locker>::new());
    let lockers = ScopedStore::new(store, "lockers");
    lockers.register().await?;
    lockers.add(Locker::new("gym", "grey", "4321")).await?;
    lockers.add(Locker::new("pool", "blue", "8642")).await?;
    let lockers = StoredCollection::new(lockers, CollectionConfig::default())
        .with_exposed_attributes(&["name", "color"]);

    Ok(Resources::new()
        .with("zoo", Arc::new(fixtures::populated_zoo()))
        .with("bikesheds", Arc::new(fixtures::populated_software_project()))
        .with("exhibits", Arc::new(exhibits))
        .with("lockers", Arc::new(lockers))
        .with("tickets", Arc::new(tickets)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mounts_every_demo_collection() {
        let resources = resources().await.unwrap();
        let names: Vec<_> = resources.names().collect();
        assert_eq!(names, ["bikesheds", "exhibits", "lockers", "tickets", "zoo"]);
        assert!(resources.get("tickets").unwrap().contains("7").await.unwrap());

        let lockers = resources.get("lockers").unwrap();
        let listing = lockers.query_states(0, 10).await.unwrap();
        assert_eq!(listing.len(), 2);
        assert!(listing.iter().all(|state| !state.contains_key("combination")));

        let animals = resources
            .get("exhibits")
            .unwrap()
            .child("savanna", "animals")
            .await
            .unwrap();
        assert!(animals.contains("Simba").await.unwrap());
    }
}

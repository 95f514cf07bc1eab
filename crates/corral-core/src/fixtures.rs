//! Sample element types shared by tests and the demo server.
//!
//! - [`Animal`]: a zoo resident whose diet is exposed on the element but not
//!   in the zoo listing.
//! - [`Bikeshed`]: color is updatable; the maximum occupancy is derived and
//!   immutable.
//! - [`Locker`]: carries a combination that is never exposed.
//! - [`Exhibit`]: has an `animals` sub-collection.
//! - [`Ticket`]: identified by its numeric `number`, not by a name.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::collection::{Collection, CollectionConfig};
use crate::element::Element;
use crate::error::{ElementError, ElementResult};
use crate::exposed::ExposedCollection;
use crate::schema::{decode_args, decode_value, Field};
use crate::state::State;

fn not_settable(name: &str) -> ElementError {
    ElementError::InvalidAttributeValue {
        attribute: Some(name.to_owned()),
        reason: "attribute cannot be assigned".into(),
    }
}

// ---------------------------------------------------------------------------
// Animal
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Animal {
    name: String,
    species: String,
    diet: String,
}

impl Animal {
    pub fn new(name: &str, species: &str, diet: &str) -> Self {
        Self {
            name: name.into(),
            species: species.into(),
            diet: diet.into(),
        }
    }
}

impl Element for Animal {
    fn schema() -> &'static [Field] {
        const SCHEMA: &[Field] = &[
            Field::required("name"),
            Field::required("species"),
            Field::required("diet"),
        ];
        SCHEMA
    }

    fn construct(args: State) -> ElementResult<Self> {
        decode_args(args)
    }

    fn exposed_attributes() -> &'static [&'static str] {
        &["name", "species", "diet"]
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "name" => Some(json!(self.name)),
            "species" => Some(json!(self.species)),
            "diet" => Some(json!(self.diet)),
            _ => None,
        }
    }

    fn set_attribute(&mut self, name: &str, _value: Value) -> ElementResult<()> {
        Err(not_settable(name))
    }
}

/// The Pride Lands cast, in insertion order.
pub const PRIDE_LANDS: &[(&str, &str, &str)] = &[
    ("Pumbaa", "warthog", "bugs"),
    ("Simba", "lion", "warthogs"),
    ("Timon", "meerkat", "bugs"),
    ("Rafiki", "mandrill", "strange yellow fruit"),
    ("Zazu", "hornbill", "nondescript berries"),
    ("Shenzi", "hyena", "lion cubs"),
    ("Banzai", "hyena", "lion cubs"),
    ("Ed", "hyena", "whatever he can get, really"),
];

/// An empty zoo: page size 3, at most 5, listing name and species only.
pub fn zoo() -> Collection<Animal> {
    Collection::new(CollectionConfig::new(3, 5)).with_exposed_attributes(&["name", "species"])
}

/// A zoo holding [`PRIDE_LANDS`].
pub fn populated_zoo() -> Collection<Animal> {
    let zoo = zoo();
    for (name, species, diet) in PRIDE_LANDS {
        // Identifiers in PRIDE_LANDS are distinct.
        let _ = zoo.add(Animal::new(name, species, diet));
    }
    zoo
}

// ---------------------------------------------------------------------------
// Bikeshed
// ---------------------------------------------------------------------------

pub const BIKESHED_OCCUPANCY: u32 = 100;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bikeshed {
    name: String,
    color: String,
    maximum_occupancy: u32,
}

impl Bikeshed {
    pub fn new(name: &str, color: &str) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            maximum_occupancy: BIKESHED_OCCUPANCY,
        }
    }
}

#[derive(Deserialize)]
struct BikeshedArgs {
    name: String,
    color: String,
}

impl Element for Bikeshed {
    fn schema() -> &'static [Field] {
        const SCHEMA: &[Field] = &[Field::required("name"), Field::required("color")];
        SCHEMA
    }

    fn construct(args: State) -> ElementResult<Self> {
        let args: BikeshedArgs = decode_args(args)?;
        Ok(Self::new(&args.name, &args.color))
    }

    fn exposed_attributes() -> &'static [&'static str] {
        &["name", "color", "maximumOccupancy"]
    }

    fn updatable_attributes() -> &'static [&'static str] {
        &["color"]
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "name" => Some(json!(self.name)),
            "color" => Some(json!(self.color)),
            "maximumOccupancy" => Some(json!(self.maximum_occupancy)),
            _ => None,
        }
    }

    fn set_attribute(&mut self, name: &str, value: Value) -> ElementResult<()> {
        match name {
            "color" => self.color = decode_value(name, value)?,
            _ => return Err(not_settable(name)),
        }
        Ok(())
    }
}

/// An empty collection of bikesheds with default limits.
pub fn software_project() -> Collection<Bikeshed> {
    Collection::default()
}

/// North, east, south, and west sheds.
pub fn populated_software_project() -> Collection<Bikeshed> {
    let project = software_project();
    for (name, color) in [
        ("north", "red"),
        ("east", "blue"),
        ("south", "green"),
        ("west", "yellow"),
    ] {
        let _ = project.add(Bikeshed::new(name, color));
    }
    project
}

// ---------------------------------------------------------------------------
// Locker
// ---------------------------------------------------------------------------

pub const DEFAULT_COMBINATION: &str = "0000";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Locker {
    name: String,
    color: String,
    size: u32,
    combination: String,
}

impl Locker {
    pub fn new(name: &str, color: &str, combination: &str) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            size: 1,
            combination: combination.into(),
        }
    }
}

#[derive(Deserialize)]
struct LockerArgs {
    name: String,
    color: String,
    size: Option<u32>,
}

impl Element for Locker {
    fn schema() -> &'static [Field] {
        const SCHEMA: &[Field] = &[
            Field::required("name"),
            Field::required("color"),
            Field::optional("size"),
        ];
        SCHEMA
    }

    fn construct(args: State) -> ElementResult<Self> {
        let args: LockerArgs = decode_args(args)?;
        let mut locker = Self::new(&args.name, &args.color, DEFAULT_COMBINATION);
        locker.size = args.size.unwrap_or(1);
        Ok(locker)
    }

    fn exposed_attributes() -> &'static [&'static str] {
        &["name", "color", "size"]
    }

    fn updatable_attributes() -> &'static [&'static str] {
        &["color", "size"]
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "name" => Some(json!(self.name)),
            "color" => Some(json!(self.color)),
            "size" => Some(json!(self.size)),
            "combination" => Some(json!(self.combination)),
            _ => None,
        }
    }

    fn set_attribute(&mut self, name: &str, value: Value) -> ElementResult<()> {
        match name {
            "color" => self.color = decode_value(name, value)?,
            "size" => self.size = decode_value(name, value)?,
            _ => return Err(not_settable(name)),
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Exhibit
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct Exhibit {
    name: String,
    animals: Arc<Collection<Animal>>,
}

impl Exhibit {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            animals: Arc::new(zoo()),
        }
    }

    pub fn animals(&self) -> &Arc<Collection<Animal>> {
        &self.animals
    }
}

#[derive(Deserialize)]
struct ExhibitArgs {
    name: String,
}

impl Element for Exhibit {
    fn schema() -> &'static [Field] {
        const SCHEMA: &[Field] = &[Field::required("name")];
        SCHEMA
    }

    fn construct(args: State) -> ElementResult<Self> {
        let args: ExhibitArgs = decode_args(args)?;
        Ok(Self::new(&args.name))
    }

    fn exposed_attributes() -> &'static [&'static str] {
        &["name"]
    }

    fn children() -> &'static [&'static str] {
        &["animals"]
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        (name == "name").then(|| json!(self.name))
    }

    fn set_attribute(&mut self, name: &str, _value: Value) -> ElementResult<()> {
        Err(not_settable(name))
    }

    fn child(&self, name: &str) -> Option<Arc<dyn ExposedCollection>> {
        match name {
            "animals" => Some(self.animals.clone() as Arc<dyn ExposedCollection>),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Ticket
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Ticket {
    number: u32,
    title: String,
}

impl Ticket {
    pub fn new(number: u32, title: &str) -> Self {
        Self {
            number,
            title: title.into(),
        }
    }
}

impl Element for Ticket {
    fn schema() -> &'static [Field] {
        const SCHEMA: &[Field] = &[Field::required("number"), Field::required("title")];
        SCHEMA
    }

    fn construct(args: State) -> ElementResult<Self> {
        decode_args(args)
    }

    fn exposed_attributes() -> &'static [&'static str] {
        &["number", "title"]
    }

    fn updatable_attributes() -> &'static [&'static str] {
        &["title"]
    }

    fn identifying_attribute() -> &'static str {
        "number"
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "number" => Some(json!(self.number)),
            "title" => Some(json!(self.title)),
            _ => None,
        }
    }

    fn set_attribute(&mut self, name: &str, value: Value) -> ElementResult<()> {
        match name {
            "title" => self.title = decode_value(name, value)?,
            _ => return Err(not_settable(name)),
        }
        Ok(())
    }
}

/// An empty ticket tracker with default limits.
pub fn tracker() -> Collection<Ticket> {
    Collection::default()
}

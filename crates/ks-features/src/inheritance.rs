//! Type hierarchies for variable and watch windows
//!
//! Shared behavior goes through the [`Animal`] trait; "derived" types embed
//! the data of their "base" and delegate to it. Generic containers nest the
//! same way.

use ks_harness::log_line;
use ks_harness::{Feature, FeatureError, HarnessConfig, Logger};
use std::hint::black_box;

// Fields marked `dead_code` are only ever read from the debugger.

/// Data common to every animal
#[derive(Debug, Clone, PartialEq)]
pub struct AnimalBase {
    name: &'static str,
    age: u32,
}

impl AnimalBase {
    /// Newborn named `name`
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self { name, age: 0 }
    }
}

/// Behavior every animal shares
pub trait Animal {
    /// Embedded base data
    fn base(&self) -> &AnimalBase;

    /// Mutable base data
    fn base_mut(&mut self) -> &mut AnimalBase;

    /// Name
    fn name(&self) -> &'static str {
        self.base().name
    }

    /// Age in years
    fn age(&self) -> u32 {
        self.base().age
    }

    /// Set the age
    fn set_age(&mut self, age: u32) {
        self.base_mut().age = age;
    }

    /// What the animal says
    fn sound(&self) -> &'static str;
}

macro_rules! impl_animal {
    ($ty:ty, $($field:ident).+, $sound:expr) => {
        impl Animal for $ty {
            fn base(&self) -> &AnimalBase {
                &self.$($field).+
            }

            fn base_mut(&mut self) -> &mut AnimalBase {
                &mut self.$($field).+
            }

            fn sound(&self) -> &'static str {
                $sound
            }
        }
    };
}

/// A dog
#[derive(Debug, Clone, PartialEq)]
pub struct Dog {
    base: AnimalBase,
    breed: &'static str,
    #[allow(dead_code)]
    is_good_boy: bool,
    bark_count: u32,
}

impl Dog {
    /// Dog of `breed`
    #[must_use]
    pub const fn new(name: &'static str, breed: &'static str) -> Self {
        Self {
            base: AnimalBase::new(name),
            breed,
            is_good_boy: true,
            bark_count: 0,
        }
    }

    /// Bark once
    pub fn bark(&mut self) {
        self.bark_count += 1;
    }

    /// Breed
    #[must_use]
    pub const fn breed(&self) -> &'static str {
        self.breed
    }

    /// Times barked
    #[must_use]
    pub const fn bark_count(&self) -> u32 {
        self.bark_count
    }
}

/// A cat
#[derive(Debug, Clone, PartialEq)]
pub struct Cat {
    base: AnimalBase,
    lives: u32,
    #[allow(dead_code)]
    is_indoor: bool,
    #[allow(dead_code)]
    meow_count: u32,
}

impl Cat {
    /// Cat with `lives` lives
    #[must_use]
    pub const fn new(name: &'static str, lives: u32) -> Self {
        Self {
            base: AnimalBase::new(name),
            lives,
            is_indoor: true,
            meow_count: 0,
        }
    }

    /// Meow once
    pub fn meow(&mut self) {
        self.meow_count += 1;
    }

    /// Remaining lives
    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }
}

/// A bird
#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    base: AnimalBase,
    wing_span: f64,
    #[allow(dead_code)]
    can_fly: bool,
    #[allow(dead_code)]
    chirp_count: u32,
}

impl Bird {
    /// Bird with `wing_span` cm
    #[must_use]
    pub const fn new(name: &'static str, wing_span: f64) -> Self {
        Self {
            base: AnimalBase::new(name),
            wing_span,
            can_fly: true,
            chirp_count: 0,
        }
    }

    /// Chirp once
    pub fn chirp(&mut self) {
        self.chirp_count += 1;
    }

    /// Wing span
    #[must_use]
    pub const fn wing_span(&self) -> f64 {
        self.wing_span
    }
}

/// Second level of the hierarchy
#[derive(Debug, Clone, PartialEq)]
pub struct Mammal {
    base: AnimalBase,
    has_fur: bool,
    #[allow(dead_code)]
    body_temp: f64,
}

impl Mammal {
    /// Mammal at 37 degrees
    #[must_use]
    pub const fn new(name: &'static str, has_fur: bool) -> Self {
        Self {
            base: AnimalBase::new(name),
            has_fur,
            body_temp: 37.0,
        }
    }

    /// Whether it has fur
    #[must_use]
    pub const fn has_fur(&self) -> bool {
        self.has_fur
    }
}

/// Third level: a mammal with an owner
#[derive(Debug, Clone, PartialEq)]
pub struct Pet {
    mammal: Mammal,
    owner: &'static str,
    #[allow(dead_code)]
    is_vaccinated: bool,
}

impl Pet {
    /// Pet owned by `owner`
    #[must_use]
    pub const fn new(name: &'static str, has_fur: bool, owner: &'static str) -> Self {
        Self {
            mammal: Mammal::new(name, has_fur),
            owner,
            is_vaccinated: false,
        }
    }

    /// Owner
    #[must_use]
    pub const fn owner(&self) -> &'static str {
        self.owner
    }

    /// The embedded mammal
    #[must_use]
    pub const fn mammal(&self) -> &Mammal {
        &self.mammal
    }
}

/// A furry mammal with wings
#[derive(Debug, Clone, PartialEq)]
pub struct FlyingMammal {
    mammal: Mammal,
    wingspan: f64,
}

impl FlyingMammal {
    /// Flying mammal with `wingspan` cm
    #[must_use]
    pub const fn new(name: &'static str, wingspan: f64) -> Self {
        Self {
            mammal: Mammal::new(name, true),
            wingspan,
        }
    }

    /// Wingspan
    #[must_use]
    pub const fn wingspan(&self) -> f64 {
        self.wingspan
    }
}

impl_animal!(Dog, base, "woof");
impl_animal!(Cat, base, "meow");
impl_animal!(Bird, base, "tweet");
impl_animal!(Mammal, base, "...");
impl_animal!(Pet, mammal.base, "purr");
impl_animal!(FlyingMammal, mammal.base, "screech");

/// Generic holder with a capacity
#[derive(Debug, Clone, PartialEq)]
pub struct Container<T> {
    data: T,
    capacity: usize,
}

impl<T: Clone> Container<T> {
    /// Hold `data`
    #[must_use]
    pub const fn new(data: T, capacity: usize) -> Self {
        Self { data, capacity }
    }

    /// Held value
    #[must_use]
    pub fn data(&self) -> T {
        self.data.clone()
    }

    /// Capacity
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

/// A [`Container`] with a location
#[derive(Debug, Clone, PartialEq)]
pub struct AnimalContainer<T> {
    container: Container<T>,
    location: &'static str,
    #[allow(dead_code)]
    is_secure: bool,
}

impl<T: Clone> AnimalContainer<T> {
    /// Secure container at `location`
    #[must_use]
    pub const fn new(data: T, capacity: usize, location: &'static str) -> Self {
        Self {
            container: Container::new(data, capacity),
            location,
            is_secure: true,
        }
    }

    /// Location
    #[must_use]
    pub const fn location(&self) -> &'static str {
        self.location
    }

    /// The embedded container
    #[must_use]
    pub const fn container(&self) -> &Container<T> {
        &self.container
    }
}

/// Names and ages gathered while walking the hierarchy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Census {
    /// `(name, age)` per animal, in visit order
    pub animals: Vec<(&'static str, u32)>,
    /// Sounds heard through `dyn Animal`
    pub sounds: Vec<&'static str>,
    /// Locations of the generic containers
    pub locations: Vec<&'static str>,
}

impl Census {
    fn record(&mut self, animal: &dyn Animal) {
        self.animals.push((animal.name(), animal.age()));
    }
}

#[inline(never)]
fn test_simple_inheritance(census: &mut Census) {
    let mut dog = Dog::new("Buddy", "Golden Retriever");
    dog.set_age(3);
    dog.bark();
    dog.bark();

    let mut cat = Cat::new("Whiskers", 9);
    cat.set_age(5);
    cat.meow();

    let mut bird = Bird::new("Tweety", 15.5);
    bird.set_age(2);
    bird.chirp();

    census.record(&dog);
    census.record(&cat);
    census.record(&bird);
    black_box((&dog, &cat, &bird));
    test_multi_level_inheritance(census);
}

#[inline(never)]
fn test_multi_level_inheritance(census: &mut Census) {
    let mut mammal = Mammal::new("Generic", true);
    mammal.set_age(10);

    let mut pet = Pet::new("Fluffy", true, "Alice");
    pet.set_age(4);

    census.record(&mammal);
    census.record(&pet);
    black_box((&mammal, &pet));
    test_multiple_inheritance(census);
}

#[inline(never)]
fn test_multiple_inheritance(census: &mut Census) {
    let mut bat = FlyingMammal::new("Batty", 25.0);
    bat.set_age(1);

    census.record(&bat);
    black_box(&bat);
    test_polymorphism(census);
}

#[inline(never)]
fn test_polymorphism(census: &mut Census) {
    let mut dog1 = Dog::new("Max", "Labrador");
    dog1.set_age(5);

    let mut cat1 = Cat::new("Shadow", 7);
    cat1.set_age(3);

    let animal_ptr1: &dyn Animal = &dog1;
    let animal_ptr2: &dyn Animal = &cat1;
    for animal in [animal_ptr1, animal_ptr2] {
        census.record(animal);
        census.sounds.push(animal.sound());
    }
    test_template_inheritance(census);
}

#[inline(never)]
fn test_template_inheritance(census: &mut Census) {
    let int_container = Container::new(42, 100);
    let int_animal_container = AnimalContainer::new(99, 200, "Warehouse A");

    let double_container = Container::new(3.5, 50);
    let double_animal_container = AnimalContainer::new(2.25, 75, "Lab B");

    census.locations.push(int_animal_container.location());
    census.locations.push(double_animal_container.location());
    black_box((
        &int_container,
        &int_animal_container,
        &double_container,
        &double_animal_container,
    ));
}

/// The Inheritance feature
#[derive(Debug, Default, Clone, Copy)]
pub struct InheritanceFeature;

impl InheritanceFeature {
    /// Registry constructor
    #[must_use]
    pub fn boxed(_config: &HarnessConfig) -> Box<dyn Feature> {
        Box::new(Self)
    }

    /// Walk every frame of the hierarchy demo
    #[must_use]
    pub fn census(&self) -> Census {
        let mut census = Census::default();
        test_simple_inheritance(&mut census);
        census
    }
}

impl Feature for InheritanceFeature {
    fn name(&self) -> &'static str {
        "Inheritance"
    }

    fn core_run(&mut self, log: &Logger) -> Result<(), FeatureError> {
        let census = self.census();
        log_line!(log, "Animals visited: ", census.animals.len());
        log_line!(log, "Polymorphic sounds: ", census.sounds.join(", "));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn derived_types_share_base_behavior() {
        let mut pet = Pet::new("Fluffy", true, "Alice");
        pet.set_age(4);
        assert_eq!(pet.name(), "Fluffy");
        assert_eq!(pet.age(), 4);
        assert_eq!(pet.owner(), "Alice");
        assert!(pet.mammal().has_fur());
    }

    #[test]
    fn counters_advance() {
        let mut dog = Dog::new("Buddy", "Golden Retriever");
        dog.bark();
        dog.bark();
        assert_eq!(dog.bark_count(), 2);
        assert_eq!(dog.breed(), "Golden Retriever");
    }

    #[test]
    fn census_walks_every_frame() {
        let census = InheritanceFeature.census();
        assert_eq!(
            census.animals,
            vec![
                ("Buddy", 3),
                ("Whiskers", 5),
                ("Tweety", 2),
                ("Generic", 10),
                ("Fluffy", 4),
                ("Batty", 1),
                ("Max", 5),
                ("Shadow", 3),
            ]
        );
        assert_eq!(census.sounds, vec!["woof", "meow"]);
        assert_eq!(census.locations, vec!["Warehouse A", "Lab B"]);
    }

    #[test]
    fn containers_nest() {
        let boxed = AnimalContainer::new(99, 200, "Warehouse A");
        assert_eq!(boxed.container().data(), 99);
        assert_eq!(boxed.container().capacity(), 200);
    }
}

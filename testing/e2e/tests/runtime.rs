//! Behaviour of the generated members at runtime. Handler registries are
//! per type and process wide, so every test owns its type.

use graft::{NotifyPropertyChanged, Singleton};
use graft_e2e::{
    catalog::model::Catalog,
    clock::Clock,
    gauge::{Counter, Document, Gauge, Thermostat},
    settings::Settings,
    telemetry::sensors::Sensor,
};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

///
/// Singletons
///

#[test]
fn accessor_returns_the_same_instance() {
    let first = Settings::instance();
    let second = Settings::instance();

    assert!(std::ptr::eq(first, second));
    assert!(std::ptr::eq(first, <Settings as Singleton>::instance()));
    assert_eq!(first.volume, 0);
}

#[test]
fn existing_private_constructor_builds_the_instance() {
    assert_eq!(Clock::instance().epoch, 1_700_000_000);
}

#[test]
fn public_constructor_elsewhere_is_left_alone() {
    assert!(Catalog::instance().entries.is_empty());
    assert_eq!(Catalog::new().entries, vec!["seed"]);
}

///
/// Change notification
///

#[test]
fn generic_change_fires_before_the_property_event() {
    let log = Arc::new(Mutex::new(Vec::new()));
    {
        let log = Arc::clone(&log);
        Thermostat::subscribe_property_changed(move |_, property| {
            log.lock().unwrap().push(format!("generic:{property}"));
        });
    }
    {
        let log = Arc::clone(&log);
        Thermostat::subscribe_target_changed(move || {
            log.lock().unwrap().push("event".to_string());
        });
    }

    let mut thermostat = Thermostat::default();
    thermostat.set_target(21);
    thermostat.set_target(21);

    assert_eq!(*log.lock().unwrap(), vec!["generic:Target", "event"]);
}

#[test]
fn property_named_like_the_registry_raises_the_generic_change() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    {
        let seen = Arc::clone(&seen);
        Document::subscribe_property_changed(move |sender, property| {
            seen.lock()
                .unwrap()
                .push(format!("{property}={}", sender.property()));
        });
    }

    let mut document = Document::default();
    document.set_property(7);

    assert_eq!(*seen.lock().unwrap(), vec!["Property=7"]);
}

#[test]
fn setter_notifies_handlers_in_subscription_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let events = Arc::new(AtomicUsize::new(0));

    for tag in ["first", "second"] {
        let log = Arc::clone(&log);
        Counter::subscribe_property_changed(move |sender, property| {
            log.lock()
                .unwrap()
                .push(format!("{tag}:{property}:{}", sender.count()));
        });
    }
    {
        let events = Arc::clone(&events);
        Counter::subscribe_count_changed(move || {
            events.fetch_add(1, Ordering::SeqCst);
        });
    }

    let mut counter = Counter::default();
    counter.set_count(5);
    counter.set_name("north".to_string());

    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "first:Count:5",
            "second:Count:5",
            "first:Name:5",
            "second:Name:5",
        ]
    );
    assert_eq!(events.load(Ordering::SeqCst), 1);
    assert_eq!(counter.name(), "north");
}

#[test]
fn assigning_an_equal_value_raises_nothing() {
    let changes = Arc::new(AtomicUsize::new(0));
    let events = Arc::new(AtomicUsize::new(0));
    {
        let changes = Arc::clone(&changes);
        Gauge::subscribe_property_changed(move |_, _| {
            changes.fetch_add(1, Ordering::SeqCst);
        });
        let events = Arc::clone(&events);
        Gauge::subscribe_level_changed(move || {
            events.fetch_add(1, Ordering::SeqCst);
        });
    }

    let mut gauge = Gauge::default();
    gauge.set_level(0);
    assert_eq!(changes.load(Ordering::SeqCst), 0);

    gauge.set_level(3);
    gauge.set_level(3);
    assert_eq!(changes.load(Ordering::SeqCst), 1);
    assert_eq!(events.load(Ordering::SeqCst), 1);
    assert_eq!(*gauge.level(), 3);
}

#[test]
fn trait_dispatch_reaches_the_generated_registry() {
    fn watch<T: NotifyPropertyChanged>(seen: Arc<Mutex<Vec<String>>>) {
        T::subscribe_property_changed(move |_, property| {
            seen.lock().unwrap().push(property.to_string());
        });
    }

    let seen = Arc::new(Mutex::new(Vec::new()));
    watch::<Sensor>(Arc::clone(&seen));

    let mut sensor = Sensor::default();
    sensor.set_label("probe".to_string());
    sensor.set_reading(-4);
    sensor.on_property_changed("Manual");

    assert_eq!(*seen.lock().unwrap(), vec!["Label", "Reading", "Manual"]);
    assert_eq!(*sensor.reading(), -4);
}

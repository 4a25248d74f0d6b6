use graft::NotifyChanged;

///
/// Gauge
///

#[derive(Debug, Default, NotifyChanged)]
pub struct Gauge {
    #[notify_changed(generate_event = true)]
    _level: u32,

    pub unit: String,
}

///
/// Counter
///

#[derive(Debug, Default, NotifyChanged)]
pub struct Counter {
    #[notify_changed(generate_event = true)]
    _count: i32,

    #[notify_changed]
    _name: String,
}

///
/// Thermostat
///

#[derive(Debug, Default, NotifyChanged)]
pub struct Thermostat {
    #[notify_changed(generate_event = true)]
    _target: i16,
}

///
/// Document
///
/// `_property` would name its event after the registration point, so it
/// only raises the generic change.
///

#[derive(Debug, Default, NotifyChanged)]
pub struct Document {
    #[notify_changed(generate_event = true)]
    _property: u32,
}

graft::include_generated!();

pub mod sensors {
    ///
    /// Sensor
    ///

    #[derive(Debug, Default, graft::NotifyChanged)]
    pub struct Sensor {
        #[notify_changed]
        _label: String,

        #[notify_changed(generate_event = false)]
        _reading: i64,
    }

    graft::include_generated!();
}

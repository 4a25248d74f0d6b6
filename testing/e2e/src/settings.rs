use graft::prelude::*;

///
/// Settings
///
/// No constructor of its own, so one is synthesized from `Default`.
///

#[singleton]
#[derive(Debug, Default)]
pub struct Settings {
    pub theme: String,
    pub volume: u8,
}

graft::include_generated!();

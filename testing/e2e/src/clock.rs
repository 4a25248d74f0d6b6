///
/// Clock
///
/// Built through its own private constructor.
///

#[graft::singleton]
#[derive(Debug)]
pub struct Clock {
    pub epoch: u64,
}

impl Clock {
    fn create() -> Self {
        Self { epoch: 1_700_000_000 }
    }
}

graft::include_generated!();

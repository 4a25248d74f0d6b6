use graft::singleton;

#[singleton]
#[derive(Default)]
struct Registry {
    entries: Vec<String>,
}

#[graft::singleton]
enum Mode {
    Idle,
}

fn main() {
    let registry = Registry::default();
    assert!(registry.entries.is_empty());
    let _ = Mode::Idle;
}

use graft::NotifyChanged;

#[derive(Default, NotifyChanged)]
struct Counter {
    #[notify_changed(generate_event = true)]
    _count: i32,

    #[notify_changed]
    _name: String,

    untouched: bool,
}

fn main() {
    let counter = Counter::default();
    assert_eq!(counter._count, 0);
    assert!(counter._name.is_empty());
    assert!(!counter.untouched);
}

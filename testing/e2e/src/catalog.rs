//! A singleton whose public constructor lives in another module, reached
//! through a glob import. The build reports it and the accessor uses a
//! synthesized constructor of its own.

pub mod model {
    ///
    /// Catalog
    ///

    #[graft::singleton]
    #[derive(Debug, Default)]
    pub struct Catalog {
        pub entries: Vec<String>,
    }

    graft::include_generated!();
}

pub mod imp {
    use super::model::*;

    impl Catalog {
        #[must_use]
        pub fn new() -> Self {
            Self {
                entries: vec!["seed".to_string()],
            }
        }
    }
}

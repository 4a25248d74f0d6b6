use crate::model::Location;
use derive_more::Display;
use serde::Serialize;
use std::fmt;

///
/// RuleId
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct RuleId(pub &'static str);

///
/// Severity
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
#[remain::sorted]
pub enum Severity {
    #[display("error")]
    Error,

    #[display("info")]
    Info,

    #[display("warning")]
    Warning,
}

///
/// RuleDescriptor
///
/// Static description of a rule. `message` carries a single `{0}`
/// placeholder for the offending declaration's name; hosts with their own
/// message catalogs key off `id` and ignore the English text.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RuleDescriptor {
    pub id: RuleId,
    pub severity: Severity,
    pub title: &'static str,
    pub message: &'static str,
    pub description: &'static str,
}

impl RuleDescriptor {
    #[must_use]
    pub fn format(&self, subject: &str) -> String {
        self.message.replace("{0}", subject)
    }
}

/// Singleton types must declare at most one constructor, private and
/// parameterless.
pub const INVALID_SINGLETON: RuleDescriptor = RuleDescriptor {
    id: RuleId("GR0001"),
    severity: Severity::Error,
    title: "singleton types must only have a private parameterless constructor",
    message: "type `{0}` must declare exactly one constructor, private and without parameters",
    description: "Public or parameterised constructors let callers build more than one \
                  instance of a singleton type.",
};

///
/// Diagnostic
///

#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct Diagnostic {
    pub rule: RuleId,
    pub severity: Severity,
    pub location: Location,
    pub message: String,
}

impl Diagnostic {
    #[must_use]
    pub fn new(descriptor: &RuleDescriptor, location: Location, subject: &str) -> Self {
        Self {
            rule: descriptor.id,
            severity: descriptor.severity,
            location,
            message: descriptor.format(subject),
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}]: {}\n  --> {}",
            self.severity, self.rule, self.message, self.location
        )
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_parameterised_by_subject() {
        let diagnostic = Diagnostic::new(
            &INVALID_SINGLETON,
            Location::new("src/lib.rs", 4, 12),
            "Gadget",
        );

        assert!(diagnostic.is_error());
        assert_eq!(diagnostic.rule, RuleId("GR0001"));
        assert!(diagnostic.message.contains("`Gadget`"));
        assert_eq!(
            diagnostic.to_string(),
            "error[GR0001]: type `Gadget` must declare exactly one constructor, private and \
             without parameters\n  --> src/lib.rs:4:12"
        );
    }
}

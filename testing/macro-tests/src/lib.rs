//! Compile tests for graft's marker macros; see `tests/ui`.

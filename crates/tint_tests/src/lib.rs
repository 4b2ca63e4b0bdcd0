//! tint_tests: shared fixtures and conformance tests for the engine.
//!
//! The fixture table is a realistic configuration instance exercising
//! every engine feature at once: inclusion, multi-state pushes, pops,
//! defaults, grouped emission, and nested sub-lexing.

pub mod fixtures;

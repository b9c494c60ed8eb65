//! Tests for the macro system components.

pub mod pattern_tests;
pub mod template_tests;
pub mod hygiene_tests;
pub mod expander_tests;

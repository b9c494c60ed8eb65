//! SRFI unit tests module
//!
//! This module contains unit tests for SRFI (Scheme Request for Implementation)
//! modules that were previously embedded in source files.

pub mod mod_tests;
pub mod registry_tests;
pub mod srfi_128_tests;
pub mod srfi_130_tests;
pub mod srfi_141_tests;
pub mod srfi_45_tests;
pub mod srfi_46_tests;
pub mod srfi_69_enhanced_tests;
pub mod srfi_97_tests;
pub mod srfi_9_tests;

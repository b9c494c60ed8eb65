//! Environment and variable binding management
//!
//! This module provides both traditional and copy-on-write (COW) environment
//! implementations for efficient memory usage and variable scoping.

pub mod cow;
pub mod traditional;

// Re-export the traditional Environment for backward compatibility
pub use traditional::Environment;

// Export COW environment types for Phase 4 optimization
pub use cow::{EnvironmentStrategy, SharedEnvironment};

use crate::error::Result;
use crate::value::Value;
use std::collections::HashMap;
use std::rc::Rc;

/// Factory for creating environments with different strategies
pub struct EnvironmentFactory;

impl EnvironmentFactory {
    /// Create a new environment using the traditional strategy
    pub fn new_traditional() -> Environment {
        Environment::new()
    }

    /// Create a new environment using the COW strategy
    pub fn new_shared() -> SharedEnvironment {
        SharedEnvironment::new()
    }

    /// Create environment with parent using traditional strategy
    pub fn with_parent_traditional(parent: Rc<Environment>) -> Environment {
        Environment::with_parent(parent)
    }

    /// Create environment with parent using COW strategy
    pub fn with_parent_shared(parent: Rc<SharedEnvironment>) -> SharedEnvironment {
        SharedEnvironment::with_parent(parent)
    }

    /// Create environment with initial bindings using traditional strategy
    pub fn with_bindings_traditional(bindings: HashMap<String, Value>) -> Environment {
        Environment::with_bindings(bindings)
    }

    /// Create environment with initial bindings using COW strategy
    pub fn with_bindings_shared(bindings: HashMap<String, Value>) -> SharedEnvironment {
        SharedEnvironment::with_bindings(bindings)
    }
}

/// Trait for unified environment operations
/// This allows code to work with both traditional and COW environments
pub trait EnvironmentOps {
    /// Define a variable in the environment
    fn define(&mut self, name: String, value: Value);

    /// Set a variable (must already exist)
    fn set(&mut self, name: &str, value: Value) -> Result<()>;

    /// Get a variable value
    fn get(&self, name: &str) -> Option<Value>;

    /// Check if variable exists
    fn exists(&self, name: &str) -> bool;

    /// Get environment depth
    fn depth(&self) -> usize;
}

impl EnvironmentOps for Environment {
    fn define(&mut self, name: String, value: Value) {
        Environment::define(self, name, value);
    }

    fn set(&mut self, name: &str, value: Value) -> Result<()> {
        Environment::set(self, name, value)
    }

    fn get(&self, name: &str) -> Option<Value> {
        Environment::get(self, name)
    }

    fn exists(&self, name: &str) -> bool {
        Environment::exists(self, name)
    }

    fn depth(&self) -> usize {
        Environment::depth(self)
    }
}

impl EnvironmentOps for SharedEnvironment {
    fn define(&mut self, name: String, value: Value) {
        SharedEnvironment::define(self, name, value);
    }

    fn set(&mut self, name: &str, value: Value) -> Result<()> {
        SharedEnvironment::set(self, name, value)
    }

    fn get(&self, name: &str) -> Option<Value> {
        SharedEnvironment::get(self, name)
    }

    fn exists(&self, name: &str) -> bool {
        SharedEnvironment::exists(self, name)
    }

    fn depth(&self) -> usize {
        SharedEnvironment::depth(self)
    }
}

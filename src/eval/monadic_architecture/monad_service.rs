//! Domain service for monadic composition and transformation.
//!
//! This encapsulates the mathematical laws and operations of monads.

use crate::eval::Value;
use crate::diagnostics::Error;
use std::sync::Arc;
use std::collections::HashMap;

use super::{
    monadic_computation::MonadicComputation, 
    monad_type::MonadType,
    monad_configuration::MonadConfiguration,
    custom_monad_definition::CustomMonadDefinition,
};

/// Domain service for monadic composition and transformation.
///
/// This encapsulates the mathematical laws and operations of monads.
#[derive(Debug, Default)]
pub struct MonadService {
    /// Configuration for monadic operations
    config: MonadConfiguration,
}

impl MonadService {
    /// Create a new monad service with default configuration
    pub fn new() -> Self {
        Self {
            config: MonadConfiguration::default(),
        }
    }
    
    /// Create a monad service with custom configuration
    pub fn with_config(config: MonadConfiguration) -> Self {
        Self { config }
    }
    
    /// Apply the functor map operation to a monadic computation
    pub fn map<T, U, F>(
        &self,
        computation: MonadicComputation<T>,
        function: F,
    ) -> MonadicComputation<U>
    where
        F: Fn(T) -> U + Send + Sync + 'static,
        T: Clone + Send + Sync + 'static,
        U: Clone + Send + Sync + 'static,
    {
        match computation {
            MonadicComputation::Pure(value) => {
                MonadicComputation::Pure(function(value))
            }
            
            MonadicComputation::Maybe(maybe) => {
                MonadicComputation::Maybe(maybe.map(function))
            }
            
            MonadicComputation::Either(either) => {
                MonadicComputation::Either(either.map(function))
            }
            
            _ => {
                // TODO: Implement proper monadic transformation for complex cases
                // For now, we panic to indicate this needs proper implementation
                panic!("Complex monadic map operations not yet implemented - need proper type conversion system")
            }
        }
    }
    
    /// Apply monadic bind (flatMap) operation
    pub fn bind<T, U, F>(
        &self,
        computation: MonadicComputation<T>,
        function: F,
    ) -> MonadicComputation<U>
    where
        F: Fn(T) -> MonadicComputation<U> + Send + Sync + 'static,
        T: Clone + Send + Sync + 'static,
        U: Clone + Send + Sync + 'static,
    {
        // TODO: Implement proper monadic bind composition
        panic!("Complex monadic bind operations not yet implemented - need proper type conversion system")
    }
    
    /// Create a pure monadic computation
    pub fn pure<T: Clone>(&self, value: T) -> MonadicComputation<T> {
        MonadicComputation::Pure(value)
    }
    
    /// Lift a value into a specific monad
    pub fn lift_into_monad<T>(
        &self,
        value: T,
        monad_type: MonadType,
    ) -> MonadicComputation<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        match monad_type {
            MonadType::Identity => MonadicComputation::Pure(value),
            
            MonadType::Maybe => {
                // TODO: Implement proper Maybe monad lifting with correct types
                panic!("Maybe monad lifting not yet implemented - need proper type conversion system")
            }
            
            MonadType::Either => {
                // TODO: Implement proper Either monad lifting with correct types
                panic!("Either monad lifting not yet implemented - need proper type conversion system")
            }
            
            _ => {
                // TODO: Implement proper lifting for other monad types
                panic!("Complex monad lifting not yet implemented - need proper type conversion system")
            }
        }
    }
    
    /// Get the configuration
    pub fn config(&self) -> &MonadConfiguration {
        &self.config
    }
}
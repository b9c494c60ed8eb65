//! Deoptimization system for JIT compiled code
//!
//! Handles cases where JIT optimizations fail and code needs to fall back
//! to less optimized tiers or interpreter execution.

use crate::ast::Expr;
use crate::diagnostics::Result;

/// Deoptimization reasons
#[derive(Debug, Clone)]
pub enum DeoptReason {
    RuntimeError(crate::diagnostics::Error),
    TypeMismatch,
    AssumptionViolated(String),
}

/// Safe points for deoptimization
#[derive(Debug, Clone)]
pub struct SafePoint {
    pub offset: usize,
    pub state: ExecutionState,
}

/// Execution state at safe points
#[derive(Debug, Clone)]
pub struct ExecutionState {
    pub variables: std::collections::HashMap<String, crate::eval::Value>,
}

/// Deoptimization manager
pub struct DeoptimizationManager;

impl DeoptimizationManager {
    pub fn new() -> Result<Self> {
        Ok(Self)
    }
    
    pub fn trigger_deoptimization(&mut self, _expr: &Expr, _reason: DeoptReason) -> Result<()> {
        // Placeholder for deoptimization logic
        Ok(())
    }
}
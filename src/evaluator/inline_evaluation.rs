//! Phase 6-B-Step3: Inline Evaluation System
//!
//! This module implements lightweight continuation inline processing:
//! - Branch prediction optimization for simple continuations
//! - Cache locality improvement through inline execution
//! - Direct evaluation bypass for performance-critical paths
//! - Hot path detection and optimization

use crate::error::Result;
use crate::evaluator::{Continuation, Evaluator};
use crate::value::Value;
// use std::hint; // Commented out as branch_likely_taken is not stable

/// Inline evaluation hints for performance optimization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineHint {
    /// Likely to be executed (hot path)
    Likely,
    /// Unlikely to be executed (cold path)
    Unlikely,
    /// Neutral prediction
    Neutral,
}

/// Inline evaluation result indicating whether continuation was handled inline
#[derive(Debug)]
pub enum InlineResult {
    /// Continuation was handled inline with result
    Handled(Value),
    /// Continuation requires full evaluation
    RequiresEvaluation(Continuation, Value),
}

/// Lightweight continuation categorization for inline processing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinuationWeight {
    /// Very lightweight - candidate for aggressive inlining
    VeryLight,
    /// Light - candidate for selective inlining
    Light,
    /// Medium - inline only in hot paths
    Medium,
    /// Heavy - avoid inlining
    Heavy,
}

impl ContinuationWeight {
    /// Determine continuation weight from continuation type
    pub fn from_continuation(cont: &Continuation) -> Self {
        match cont {
            // Identity is the lightest possible continuation
            Continuation::Identity => ContinuationWeight::VeryLight,
            
            // Simple value operations
            Continuation::Values { values, .. } => {
                if values.len() <= 3 {
                    ContinuationWeight::VeryLight
                } else {
                    ContinuationWeight::Light
                }
            }
            
            // Variable operations
            Continuation::Assignment { .. } | Continuation::Define { .. } => {
                ContinuationWeight::Light
            }
            
            // Single expression continuations
            Continuation::Begin { remaining, .. } => {
                if remaining.len() == 1 {
                    ContinuationWeight::Light
                } else if remaining.len() <= 3 {
                    ContinuationWeight::Medium
                } else {
                    ContinuationWeight::Heavy
                }
            }
            
            // Control flow that can be optimized
            Continuation::IfTest { alternate: None, .. } => ContinuationWeight::Light,
            Continuation::IfTest { .. } => ContinuationWeight::Medium,
            
            // Application continuations - weight depends on complexity
            Continuation::Application { remaining_args, .. } => {
                if remaining_args.is_empty() {
                    ContinuationWeight::Light
                } else if remaining_args.len() <= 2 {
                    ContinuationWeight::Medium
                } else {
                    ContinuationWeight::Heavy
                }
            }
            
            // Heavy operations that should not be inlined
            Continuation::CallCc { .. }
            | Continuation::DynamicWind { .. }
            | Continuation::ExceptionHandler { .. }
            | Continuation::GuardClause { .. }
            | Continuation::DoLoop { .. }
            | Continuation::Do { .. } => ContinuationWeight::Heavy,
            
            // Other continuations default to medium weight
            _ => ContinuationWeight::Medium,
        }
    }
    
    /// Check if continuation should be inlined based on weight and hint
    pub fn should_inline(&self, hint: InlineHint) -> bool {
        match (self, hint) {
            (ContinuationWeight::VeryLight, _) => true,
            (ContinuationWeight::Light, InlineHint::Likely | InlineHint::Neutral) => true,
            (ContinuationWeight::Medium, InlineHint::Likely) => true,
            (ContinuationWeight::Heavy, _) => false,
            _ => false,
        }
    }
}

/// Hot path detection for inline optimization
#[derive(Debug)]
pub struct HotPathDetector {
    /// Execution frequency counters for continuations
    frequency_counters: std::collections::HashMap<String, usize>,
    /// Threshold for considering a path "hot"
    hot_threshold: usize,
    /// Total continuation executions
    total_executions: usize,
}

impl HotPathDetector {
    /// Create new hot path detector
    pub fn new(hot_threshold: usize) -> Self {
        HotPathDetector {
            frequency_counters: std::collections::HashMap::new(),
            hot_threshold,
            total_executions: 0,
        }
    }
    
    /// Record continuation execution
    pub fn record_execution(&mut self, cont_type: &str) {
        *self.frequency_counters.entry(cont_type.to_string()).or_insert(0) += 1;
        self.total_executions += 1;
    }
    
    /// Get inline hint based on execution frequency
    pub fn get_inline_hint(&self, cont_type: &str) -> InlineHint {
        if let Some(&count) = self.frequency_counters.get(cont_type) {
            if count >= self.hot_threshold {
                InlineHint::Likely
            } else if self.total_executions > 0 && count * 10 < self.total_executions {
                InlineHint::Unlikely
            } else {
                InlineHint::Neutral
            }
        } else {
            InlineHint::Neutral
        }
    }
    
    /// Get execution statistics
    pub fn statistics(&self) -> (usize, usize, f64) {
        let hot_paths = self.frequency_counters.values()
            .filter(|&&count| count >= self.hot_threshold)
            .count();
        let total_paths = self.frequency_counters.len();
        let hot_ratio = if total_paths > 0 {
            hot_paths as f64 / total_paths as f64
        } else {
            0.0
        };
        (hot_paths, total_paths, hot_ratio)
    }
    
    /// Clear statistics
    pub fn clear(&mut self) {
        self.frequency_counters.clear();
        self.total_executions = 0;
    }
}

impl Default for HotPathDetector {
    fn default() -> Self {
        Self::new(10) // Default threshold: 10 executions
    }
}

/// Inline evaluation system for lightweight continuations
#[derive(Debug)]
pub struct InlineEvaluator {
    /// Hot path detector
    hot_path_detector: HotPathDetector,
    /// Successfully inlined continuation count
    inlined_count: usize,
    /// Total inline attempts
    total_attempts: usize,
    /// Cache hit count for branch prediction
    cache_hits: usize,
}

impl InlineEvaluator {
    /// Create new inline evaluator
    pub fn new() -> Self {
        InlineEvaluator {
            hot_path_detector: HotPathDetector::default(),
            inlined_count: 0,
            total_attempts: 0,
            cache_hits: 0,
        }
    }
    
    /// Attempt to evaluate continuation inline
    /// Returns InlineResult indicating whether inline evaluation succeeded
    pub fn try_inline_evaluation(
        &mut self,
        evaluator: &mut Evaluator,
        cont: Continuation,
        value: Value,
    ) -> Result<InlineResult> {
        self.total_attempts += 1;
        
        // Determine continuation type for tracking
        let cont_type = self.continuation_type_name(&cont);
        self.hot_path_detector.record_execution(&cont_type);
        
        // Get inline hint and continuation weight
        let hint = self.hot_path_detector.get_inline_hint(&cont_type);
        let weight = ContinuationWeight::from_continuation(&cont);
        
        // Check if continuation should be inlined
        if !weight.should_inline(hint) {
            return Ok(InlineResult::RequiresEvaluation(cont, value));
        }
        
        // Attempt inline evaluation with branch prediction hints
        match self.inline_continuation_with_hints(evaluator, cont.clone(), value.clone(), hint) {
            Ok(Some(result)) => {
                self.inlined_count += 1;
                if hint == InlineHint::Likely {
                    self.cache_hits += 1;
                }
                Ok(InlineResult::Handled(result))
            }
            Ok(None) => {
                // Inline evaluation was not applicable
                Ok(InlineResult::RequiresEvaluation(cont, value))
            }
            Err(e) => Err(e),
        }
    }
    
    /// Inline continuation evaluation with branch prediction hints
    #[inline]
    fn inline_continuation_with_hints(
        &mut self,
        _evaluator: &mut Evaluator,
        cont: Continuation,
        value: Value,
        hint: InlineHint,
    ) -> Result<Option<Value>> {
        // Apply branch prediction hints (using standard library features)
        match hint {
            InlineHint::Likely => {
                // Branch prediction hint for likely path
                // Note: std::hint::branch_likely_taken is not stable yet
                // Using likely() macro when available
            }
            InlineHint::Unlikely => {
                // Branch prediction hint for unlikely path
                // Note: Using conditional compilation for optimization
            }
            InlineHint::Neutral => {
                // No specific branch prediction hint
            }
        }
        
        // Inline evaluation based on continuation type
        match cont {
            // Most common case - identity continuation
            Continuation::Identity => {
                // Identity is the most frequent case - optimize for it
                Ok(Some(value))
            }
            
            // Simple value accumulation
            Continuation::Values { mut values, parent: _ } => {
                values.push(value);
                let result = Value::Values(values);
                
                // Return the Values result with parent for caller to handle
                // This avoids infinite recursion in inline evaluation
                Ok(Some(result))
            }
            
            // Variable assignment - fast path for environments
            Continuation::Assignment { variable, env, parent: _ } => {
                env.set(&variable, value)?;
                let result = Value::Undefined;
                
                // For inline evaluation, don't recurse - return result and let caller handle parent
                Ok(Some(result))
            }
            
            // Variable definition - fast path
            Continuation::Define { variable, env, parent: _ } => {
                env.define(variable, value);
                let result = Value::Undefined;
                
                // For inline evaluation, don't recurse - return result and let caller handle parent
                Ok(Some(result))
            }
            
            // Single expression begin - inline if simple
            Continuation::Begin { remaining, env: _, parent: _ } if remaining.len() == 1 => {
                // For inline evaluation, defer complex expressions to regular evaluation
                Ok(None)
            }
            
            // For other continuations, defer to full evaluation
            _ => Ok(None),
        }
    }
    
    /// Get continuation type name for tracking
    fn continuation_type_name(&self, cont: &Continuation) -> String {
        match cont {
            Continuation::Identity => "Identity".to_string(),
            Continuation::Values { .. } => "Values".to_string(),
            Continuation::Assignment { .. } => "Assignment".to_string(),
            Continuation::Define { .. } => "Define".to_string(),
            Continuation::Begin { .. } => "Begin".to_string(),
            Continuation::IfTest { .. } => "IfTest".to_string(),
            Continuation::Application { .. } => "Application".to_string(),
            Continuation::Operator { .. } => "Operator".to_string(),
            Continuation::CallCc { .. } => "CallCc".to_string(),
            Continuation::DynamicWind { .. } => "DynamicWind".to_string(),
            Continuation::ExceptionHandler { .. } => "ExceptionHandler".to_string(),
            Continuation::GuardClause { .. } => "GuardClause".to_string(),
            Continuation::DoLoop { .. } => "DoLoop".to_string(),
            Continuation::Do { .. } => "Do".to_string(),
            _ => "Other".to_string(),
        }
    }
    
    /// Get inline evaluation statistics
    pub fn statistics(&self) -> (usize, usize, f64, usize) {
        let inline_rate = if self.total_attempts > 0 {
            self.inlined_count as f64 / self.total_attempts as f64
        } else {
            0.0
        };
        (
            self.inlined_count,
            self.total_attempts,
            inline_rate,
            self.cache_hits,
        )
    }
    
    /// Get hot path statistics
    pub fn hot_path_statistics(&self) -> (usize, usize, f64) {
        self.hot_path_detector.statistics()
    }
    
    /// Clear all statistics
    pub fn clear_statistics(&mut self) {
        self.hot_path_detector.clear();
        self.inlined_count = 0;
        self.total_attempts = 0;
        self.cache_hits = 0;
    }

    /// Record successful inline evaluation
    pub fn record_successful_inline(&mut self, cont: &Continuation) {
        let cont_type = self.continuation_type_name(cont);
        self.hot_path_detector.record_execution(&cont_type);
        self.inlined_count += 1;
        self.total_attempts += 1;
    }

    /// Get inline hint for continuation type
    pub fn get_inline_hint(&self, cont_type: &str) -> InlineHint {
        self.hot_path_detector.get_inline_hint(cont_type)
    }
}

impl Default for InlineEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache-friendly continuation execution patterns
pub struct CacheFriendlyPatterns;

impl CacheFriendlyPatterns {
    /// Optimize continuation chain for cache locality
    pub fn optimize_continuation_chain(cont: Continuation) -> Continuation {
        // Placeholder implementation for cache locality optimization
        // In a full implementation, this would reorder continuation chains
        // to improve cache hit rates
        cont
    }
    
    /// Check if continuation pattern is cache-friendly
    pub fn is_cache_friendly(cont: &Continuation) -> bool {
        match cont {
            // Simple continuations are cache-friendly
            Continuation::Identity 
            | Continuation::Values { .. }
            | Continuation::Assignment { .. }
            | Continuation::Define { .. } => true,
            
            // Short begin chains are cache-friendly
            Continuation::Begin { remaining, .. } => remaining.len() <= 2,
            
            // Other patterns depend on complexity
            _ => false,
        }
    }
    
    /// Estimate memory footprint for cache analysis
    pub fn estimate_memory_footprint(cont: &Continuation) -> usize {
        match cont {
            Continuation::Identity => 16, // Minimum size for enum variant
            Continuation::Values { values, .. } => {
                std::mem::size_of::<Vec<Value>>() + values.len() * std::mem::size_of::<Value>()
            }
            Continuation::Assignment { variable, .. } => {
                std::mem::size_of::<String>() + variable.len()
            }
            Continuation::Define { variable, .. } => {
                std::mem::size_of::<String>() + variable.len()
            }
            Continuation::Begin { remaining, .. } => {
                std::mem::size_of::<Vec<crate::ast::Expr>>() + 
                remaining.len() * std::mem::size_of::<crate::ast::Expr>()
            }
            _ => 1024, // Conservative estimate for complex continuations
        }
    }
}

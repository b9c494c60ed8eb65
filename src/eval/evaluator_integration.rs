//! Integration layer for coexistence between standard and monadic evaluators.
//!
//! This module provides a unified interface that allows both evaluators
//! to coexist, with intelligent routing based on expression analysis
//! and performance requirements.

use crate::eval::{
    Value, Environment, Evaluator as StandardEvaluator,
    monadic_architecture::{
        MonadicEvaluationOrchestrator, MonadicEvaluationInput, MonadicEvaluationResult,
        MonadicComputation,
    },
    operational_semantics::EvaluationContext,
};
use crate::ast::{Expr, Spanned};
use crate::diagnostics::{Result, Error, Span};
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Unified evaluator that intelligently routes between standard and monadic evaluation.
///
/// This follows the Strategy pattern, where the evaluation strategy is chosen
/// dynamically based on the characteristics of the expression and current context.
#[derive(Debug)]
pub struct HybridEvaluator {
    /// Standard tree-walking evaluator
    standard_evaluator: StandardEvaluator,
    
    /// Monadic evaluator orchestrator
    monadic_orchestrator: Arc<MonadicEvaluationOrchestrator>,
    
    /// Configuration for evaluation strategy selection
    strategy_config: EvaluationStrategyConfiguration,
    
    /// Performance metrics collector
    metrics: PerformanceMetricsCollector,
    
    /// Expression analyzer for routing decisions
    expression_analyzer: ExpressionAnalyzer,
}

/// Configuration for evaluation strategy selection
#[derive(Debug, Clone)]
pub struct EvaluationStrategyConfiguration {
    /// Threshold for switching to monadic evaluator based on effect complexity
    effect_complexity_threshold: f64,
    
    /// Whether to enable automatic strategy switching
    enable_auto_switching: bool,
    
    /// Force monadic evaluation for expressions containing call/cc
    force_monadic_for_call_cc: bool,
    
    /// Force monadic evaluation for IO operations
    force_monadic_for_io: bool,
    
    /// Performance threshold for switching strategies (in milliseconds)
    performance_threshold_ms: u64,
    
    /// Whether to enable parallel evaluation comparison
    enable_parallel_comparison: bool,
}

/// Performance metrics collector for evaluation strategy optimization
#[derive(Debug, Default)]
pub struct PerformanceMetricsCollector {
    /// Metrics for standard evaluator
    standard_metrics: EvaluatorMetrics,
    
    /// Metrics for monadic evaluator
    monadic_metrics: EvaluatorMetrics,
    
    /// Configuration
    config: MetricsConfiguration,
}

/// Performance metrics for an evaluator
#[derive(Debug, Clone, Default)]
pub struct EvaluatorMetrics {
    /// Total number of evaluations
    pub evaluation_count: u64,
    
    /// Total evaluation time
    pub total_time_ns: u64,
    
    /// Average evaluation time
    pub average_time_ns: u64,
    
    /// Memory usage statistics
    pub memory_usage: MemoryUsageStats,
    
    /// Error count
    pub error_count: u64,
    
    /// Success rate (0.0 to 1.0)
    pub success_rate: f64,
    
    /// Specific feature usage
    pub feature_usage: FeatureUsageStats,
}

/// Memory usage statistics
#[derive(Debug, Clone, Default)]
pub struct MemoryUsageStats {
    /// Peak memory usage in bytes
    pub peak_memory_bytes: usize,
    
    /// Average memory usage in bytes
    pub average_memory_bytes: usize,
    
    /// Number of allocations
    pub allocation_count: u64,
    
    /// Number of garbage collections triggered
    pub gc_count: u64,
}

/// Feature usage statistics
#[derive(Debug, Clone, Default)]
pub struct FeatureUsageStats {
    /// Number of call/cc uses
    pub call_cc_count: u64,
    
    /// Number of IO operations
    pub io_operation_count: u64,
    
    /// Number of state operations
    pub state_operation_count: u64,
    
    /// Number of error handling operations
    pub error_handling_count: u64,
    
    /// Maximum stack depth reached
    pub max_stack_depth: usize,
    
    /// Number of tail calls optimized
    pub tail_calls_optimized: u64,
}

/// Configuration for metrics collection
#[derive(Debug, Clone)]
pub struct MetricsConfiguration {
    /// Whether to enable detailed metrics collection
    pub enable_detailed_metrics: bool,
    
    /// Whether to enable memory profiling
    pub enable_memory_profiling: bool,
    
    /// Sample rate for metrics collection (0.0 to 1.0)
    pub sample_rate: f64,
    
    /// Maximum number of metrics entries to keep
    pub max_metrics_entries: usize,
}

/// Expression analyzer that determines the best evaluation strategy
#[derive(Debug, Default)]
pub struct ExpressionAnalyzer {
    /// Analysis configuration
    config: AnalysisConfiguration,
    
    /// Cache for analysis results
    analysis_cache: std::collections::HashMap<ExpressionSignature, AnalysisResult>,
}

/// Configuration for expression analysis
#[derive(Debug, Clone)]
pub struct AnalysisConfiguration {
    /// Whether to enable deep analysis (traverse entire AST)
    pub enable_deep_analysis: bool,
    
    /// Whether to cache analysis results
    pub enable_caching: bool,
    
    /// Maximum cache size
    pub max_cache_size: usize,
    
    /// Whether to consider performance history in analysis
    pub consider_performance_history: bool,
}

/// Signature for identifying expressions in the cache
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExpressionSignature {
    /// Hash of the expression structure
    pub structure_hash: u64,
    
    /// Depth of the expression tree
    pub depth: usize,
    
    /// Number of nodes in the expression
    pub node_count: usize,
    
    /// Feature flags (call/cc, IO, etc.)
    pub feature_flags: u32,
}

/// Result of expression analysis
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// Recommended evaluation strategy
    pub recommended_strategy: EvaluationStrategy,
    
    /// Confidence in the recommendation (0.0 to 1.0)
    pub confidence: f64,
    
    /// Estimated effect complexity
    pub effect_complexity: f64,
    
    /// Expected performance characteristics
    pub performance_prediction: PerformancePrediction,
    
    /// Features detected in the expression
    pub detected_features: Vec<DetectedFeature>,
    
    /// Reasons for the recommendation
    pub reasoning: Vec<String>,
}

/// Evaluation strategies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluationStrategy {
    /// Use the standard tree-walking evaluator
    Standard,
    
    /// Use the monadic evaluator
    Monadic,
    
    /// Use both evaluators in parallel for comparison
    Parallel,
    
    /// Adaptive strategy that may switch during evaluation
    Adaptive,
}

/// Performance prediction for an evaluation strategy
#[derive(Debug, Clone)]
pub struct PerformancePrediction {
    /// Estimated execution time in nanoseconds
    pub estimated_time_ns: u64,
    
    /// Estimated memory usage in bytes
    pub estimated_memory_bytes: usize,
    
    /// Estimated success probability (0.0 to 1.0)
    pub success_probability: f64,
    
    /// Confidence in the prediction (0.0 to 1.0)
    pub prediction_confidence: f64,
}

/// Features detected in expressions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectedFeature {
    /// Contains call/cc
    CallCC,
    
    /// Contains IO operations
    IOOperations,
    
    /// Contains state operations
    StateOperations,
    
    /// Contains error handling
    ErrorHandling,
    
    /// Deep recursion detected
    DeepRecursion,
    
    /// Complex control flow
    ComplexControlFlow,
    
    /// Monadic operations
    MonadicOperations,
    
    /// Custom feature
    Custom(String),
}

/// Adapter for the standard evaluator to work with the hybrid interface
#[derive(Debug)]
pub struct StandardEvaluatorAdapter {
    /// The wrapped standard evaluator
    evaluator: StandardEvaluator,
}

/// Adapter for the monadic evaluator to work with the hybrid interface
#[derive(Debug)]
pub struct MonadicEvaluatorAdapter {
    /// The wrapped monadic orchestrator
    orchestrator: Arc<MonadicEvaluationOrchestrator>,
}

/// Unified evaluation result that can come from either evaluator
#[derive(Debug, Clone)]
pub enum UnifiedEvaluationResult {
    /// Result from standard evaluator
    Standard {
        /// The evaluated value.
        value: Value,
        /// Performance and evaluation metrics.
        metrics: StandardEvaluationMetrics,
    },
    
    /// Result from monadic evaluator
    Monadic {
        /// The monadic computation result.
        computation: MonadicComputation<Value>,
        /// Detailed evaluation result with metrics.
        result: Box<MonadicEvaluationResult>,
    },
    
    /// Result from parallel evaluation (both evaluators)
    Parallel {
        /// Result from the standard evaluator.
        standard_result: Value,
        /// Result from the monadic evaluator.
        monadic_result: MonadicComputation<Value>,
        /// Performance comparison between evaluators.
        performance_comparison: PerformanceComparison,
    },
}

/// Metrics from standard evaluation
#[derive(Debug, Clone)]
pub struct StandardEvaluationMetrics {
    /// Evaluation time
    pub evaluation_time_ns: u64,
    
    /// Stack depth reached
    pub max_stack_depth: usize,
    
    /// Number of function calls
    pub function_calls: u64,
    
    /// Memory allocated
    pub memory_allocated: usize,
}

/// Performance comparison between evaluators
#[derive(Debug, Clone)]
pub struct PerformanceComparison {
    /// Time taken by standard evaluator
    pub standard_time_ns: u64,
    
    /// Time taken by monadic evaluator
    pub monadic_time_ns: u64,
    
    /// Memory used by standard evaluator
    pub standard_memory_bytes: usize,
    
    /// Memory used by monadic evaluator
    pub monadic_memory_bytes: usize,
    
    /// Whether results were identical
    pub results_identical: bool,
    
    /// Winner (which performed better)
    pub winner: EvaluationStrategy,
    
    /// Performance difference ratio
    pub performance_ratio: f64,
}

// ================================
// IMPLEMENTATION
// ================================

impl HybridEvaluator {
    /// Create a new hybrid evaluator
    pub fn new(
        standard_evaluator: StandardEvaluator,
        monadic_orchestrator: Arc<MonadicEvaluationOrchestrator>,
    ) -> Self {
        Self {
            standard_evaluator,
            monadic_orchestrator,
            strategy_config: EvaluationStrategyConfiguration::default(),
            metrics: PerformanceMetricsCollector::new(),
            expression_analyzer: ExpressionAnalyzer::new(),
        }
    }
    
    /// Create a hybrid evaluator with custom configuration
    pub fn with_config(
        standard_evaluator: StandardEvaluator,
        monadic_orchestrator: Arc<MonadicEvaluationOrchestrator>,
        config: EvaluationStrategyConfiguration,
    ) -> Self {
        Self {
            standard_evaluator,
            monadic_orchestrator,
            strategy_config: config,
            metrics: PerformanceMetricsCollector::new(),
            expression_analyzer: ExpressionAnalyzer::new(),
        }
    }
    
    /// Evaluate an expression using the optimal strategy
    pub async fn evaluate(
        &mut self,
        expr: &Spanned<Expr>,
        env: Rc<Environment>,
    ) -> Result<UnifiedEvaluationResult> {
        // Analyze the expression to determine the best strategy
        let analysis = self.expression_analyzer.analyze_expression(expr)?;
        
        match analysis.recommended_strategy {
            EvaluationStrategy::Standard => {
                self.evaluate_with_standard(expr, env).await
            }
            
            EvaluationStrategy::Monadic => {
                self.evaluate_with_monadic(expr, env).await
            }
            
            EvaluationStrategy::Parallel => {
                self.evaluate_with_both(expr, env).await
            }
            
            EvaluationStrategy::Adaptive => {
                self.evaluate_adaptively(expr, env).await
            }
        }
    }
    
    /// Evaluate using the standard evaluator
    async fn evaluate_with_standard(
        &mut self,
        expr: &Spanned<Expr>,
        env: Rc<Environment>,
    ) -> Result<UnifiedEvaluationResult> {
        let start_time = Instant::now();
        
        // Evaluate using the standard evaluator directly
        let result = self.standard_evaluator.eval(expr, env)?;
        
        let evaluation_time = start_time.elapsed().as_nanos() as u64;
        
        // Update metrics
        self.metrics.update_standard_metrics(evaluation_time, true);
        
        Ok(UnifiedEvaluationResult::Standard {
            value: result,
            metrics: StandardEvaluationMetrics {
                evaluation_time_ns: evaluation_time,
                max_stack_depth: 0, // Would be tracked by actual implementation
                function_calls: 0,   // Would be tracked by actual implementation
                memory_allocated: 0, // Would be tracked by actual implementation
            },
        })
    }
    
    /// Evaluate using the monadic evaluator
    async fn evaluate_with_monadic(
        &mut self,
        expr: &Spanned<Expr>,
        env: Rc<Environment>,
    ) -> Result<UnifiedEvaluationResult> {
        let start_time = Instant::now();
        
        // Create adapter for monadic evaluator
        let mut adapter = MonadicEvaluatorAdapter::new(self.monadic_orchestrator.clone());
        let result = adapter.evaluate(expr, env).await?;
        
        let evaluation_time = start_time.elapsed().as_nanos() as u64;
        
        // Update metrics
        self.metrics.update_monadic_metrics(evaluation_time, true);
        
        Ok(result)
    }
    
    /// Evaluate using both evaluators in parallel
    async fn evaluate_with_both(
        &mut self,
        expr: &Spanned<Expr>,
        env: Rc<Environment>,
    ) -> Result<UnifiedEvaluationResult> {
        // Launch both evaluations sequentially to avoid borrow conflicts
        let standard_result = self.evaluate_with_standard(expr, env.clone()).await;
        let monadic_result = self.evaluate_with_monadic(expr, env).await;
        
        let standard_result = standard_result?;
        let monadic_result = monadic_result?;
        
        // Extract results and compare performance
        match (standard_result, monadic_result) {
            (
                UnifiedEvaluationResult::Standard { value: std_value, metrics: std_metrics },
                UnifiedEvaluationResult::Monadic { computation, result },
            ) => {
                // Create performance comparison
                let performance_comparison = PerformanceComparison {
                    standard_time_ns: std_metrics.evaluation_time_ns,
                    monadic_time_ns: result.metrics.evaluation_time_ns,
                    standard_memory_bytes: std_metrics.memory_allocated,
                    monadic_memory_bytes: result.metrics.memory_allocated,
                    results_identical: false, // Would need to compare actual results
                    winner: if std_metrics.evaluation_time_ns < result.metrics.evaluation_time_ns {
                        EvaluationStrategy::Standard
                    } else {
                        EvaluationStrategy::Monadic
                    },
                    performance_ratio: std_metrics.evaluation_time_ns as f64 / result.metrics.evaluation_time_ns as f64,
                };
                
                Ok(UnifiedEvaluationResult::Parallel {
                    standard_result: std_value,
                    monadic_result: computation,
                    performance_comparison,
                })
            }
            
            _ => {
                Err(Box::new(Error::runtime_error(
                    "Unexpected result types from parallel evaluation".to_string(),
                    None,
                )))
            }
        }
    }
    
    /// Adaptive evaluation that may switch strategies during execution
    async fn evaluate_adaptively(
        &mut self,
        expr: &Spanned<Expr>,
        env: Rc<Environment>,
    ) -> Result<UnifiedEvaluationResult> {
        // Start with the recommended strategy based on analysis
        let analysis = self.expression_analyzer.analyze_expression(expr)?;
        let initial_strategy = if analysis.confidence > 0.8 {
            analysis.recommended_strategy
        } else {
            // Low confidence - use parallel evaluation to gather data
            EvaluationStrategy::Parallel
        };
        
        match initial_strategy {
            EvaluationStrategy::Standard => self.evaluate_with_standard(expr, env).await,
            EvaluationStrategy::Monadic => self.evaluate_with_monadic(expr, env).await,
            EvaluationStrategy::Parallel => self.evaluate_with_both(expr, env).await,
            EvaluationStrategy::Adaptive => {
                // Fallback to standard for now
                self.evaluate_with_standard(expr, env).await
            }
        }
    }
    
    /// Get performance metrics
    pub fn metrics(&self) -> &PerformanceMetricsCollector {
        &self.metrics
    }
    
    /// Get strategy configuration
    pub fn strategy_config(&self) -> &EvaluationStrategyConfiguration {
        &self.strategy_config
    }
    
    /// Update strategy configuration
    pub fn update_strategy_config(&mut self, config: EvaluationStrategyConfiguration) {
        self.strategy_config = config;
    }
}

impl ExpressionAnalyzer {
    /// Create a new expression analyzer
    pub fn new() -> Self {
        Self {
            config: AnalysisConfiguration::default(),
            analysis_cache: std::collections::HashMap::new(),
        }
    }
    
    /// Analyze an expression and recommend an evaluation strategy
    pub fn analyze_expression(&mut self, expr: &Spanned<Expr>) -> Result<AnalysisResult> {
        // Generate signature for caching
        let signature = self.generate_signature(expr);
        
        // Check cache first
        if self.config.enable_caching {
            if let Some(cached_result) = self.analysis_cache.get(&signature) {
                return Ok(cached_result.clone());
            }
        }
        
        // Perform analysis
        let result = self.perform_analysis(expr, &signature)?;
        
        // Cache the result
        if self.config.enable_caching && self.analysis_cache.len() < self.config.max_cache_size {
            self.analysis_cache.insert(signature, result.clone());
        }
        
        Ok(result)
    }
    
    /// Generate a signature for an expression
    fn generate_signature(&self, expr: &Spanned<Expr>) -> ExpressionSignature {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        std::hash::Hash::hash(&format!("{:?}", expr.inner), &mut hasher);
        
        ExpressionSignature {
            structure_hash: std::hash::Hasher::finish(&hasher),
            depth: Self::calculate_depth(&expr.inner),
            node_count: Self::count_nodes(&expr.inner),
            feature_flags: self.extract_feature_flags(&expr.inner),
        }
    }
    
    /// Perform the actual analysis
    fn perform_analysis(&self, expr: &Spanned<Expr>, signature: &ExpressionSignature) -> Result<AnalysisResult> {
        let mut detected_features = Vec::new();
        let mut reasoning = Vec::new();
        let mut effect_complexity = 0.0;
        
        // Analyze for specific features
        if Self::contains_call_cc(&expr.inner) {
            detected_features.push(DetectedFeature::CallCC);
            effect_complexity += 0.8;
            reasoning.push("Contains call/cc - high effect complexity".to_string());
        }
        
        if self.contains_io_operations(&expr.inner) {
            detected_features.push(DetectedFeature::IOOperations);
            effect_complexity += 0.6;
            reasoning.push("Contains IO operations".to_string());
        }
        
        if self.contains_state_operations(&expr.inner) {
            detected_features.push(DetectedFeature::StateOperations);
            effect_complexity += 0.4;
            reasoning.push("Contains state operations".to_string());
        }
        
        if signature.depth > 10 {
            detected_features.push(DetectedFeature::DeepRecursion);
            effect_complexity += 0.3;
            reasoning.push("Deep expression nesting detected".to_string());
        }
        
        // Determine recommended strategy
        let recommended_strategy = if effect_complexity > 0.7 {
            EvaluationStrategy::Monadic
        } else if effect_complexity > 0.3 {
            EvaluationStrategy::Parallel // Test both to gather data
        } else {
            EvaluationStrategy::Standard
        };
        
        let confidence = if !(0.2..=0.8).contains(&effect_complexity) {
            0.9 // High confidence for clear cases
        } else {
            0.5 // Lower confidence for borderline cases
        };
        
        Ok(AnalysisResult {
            recommended_strategy,
            confidence,
            effect_complexity,
            performance_prediction: PerformancePrediction {
                estimated_time_ns: (signature.node_count as u64) * 1000, // Rough estimate
                estimated_memory_bytes: signature.node_count * 64,       // Rough estimate
                success_probability: 0.95,
                prediction_confidence: 0.6,
            },
            detected_features,
            reasoning,
        })
    }
    
    /// Check if expression contains call/cc
    fn contains_call_cc(expr: &Expr) -> bool {
        match expr {
            Expr::CallCC(_) => true,
            Expr::Application { operator, operands } => {
                Self::contains_call_cc(&operator.inner) ||
                operands.iter().any(|arg| Self::contains_call_cc(&arg.inner))
            }
            Expr::If { test: cond, consequent: then_branch, alternative: else_branch } => {
                Self::contains_call_cc(&cond.inner) ||
                Self::contains_call_cc(&then_branch.inner) ||
                else_branch.as_ref().is_some_and(|e| Self::contains_call_cc(&e.inner))
            }
            Expr::Lambda { body, .. } => {
                body.iter().any(|e| Self::contains_call_cc(&e.inner))
            }
            _ => false,
        }
    }
    
    /// Check if expression contains IO operations
    fn contains_io_operations(&self, expr: &Expr) -> bool {
        match expr {
            Expr::Application { operator, .. } => {
                if let Expr::Identifier(name) = &operator.inner {
                    matches!(name.as_str(), "display" | "write" | "read" | "open-input-file" | "open-output-file")
                } else {
                    false
                }
            }
            _ => false,
        }
    }
    
    /// Check if expression contains state operations
    fn contains_state_operations(&self, expr: &Expr) -> bool {
        match expr {
            Expr::Application { operator, .. } => {
                if let Expr::Identifier(name) = &operator.inner {
                    matches!(name.as_str(), "set!" | "vector-set!" | "string-set!")
                } else {
                    false
                }
            }
            _ => false,
        }
    }
    
    /// Calculate the depth of an expression tree
    fn calculate_depth(expr: &Expr) -> usize {
        match expr {
            Expr::Application { operator, operands } => {
                let op_depth = Self::calculate_depth(&operator.inner);
                let max_operand_depth = operands.iter()
                    .map(|arg| Self::calculate_depth(&arg.inner))
                    .max()
                    .unwrap_or(0);
                1 + op_depth.max(max_operand_depth)
            }
            
            Expr::If { test: cond, consequent: then_branch, alternative: else_branch } => {
                let cond_depth = Self::calculate_depth(&cond.inner);
                let then_depth = Self::calculate_depth(&then_branch.inner);
                let else_depth = else_branch.as_ref()
                    .map_or(0, |e| Self::calculate_depth(&e.inner));
                1 + cond_depth.max(then_depth.max(else_depth))
            }
            
            Expr::Lambda { body, .. } => {
                1 + body.iter()
                    .map(|e| Self::calculate_depth(&e.inner))
                    .max()
                    .unwrap_or(0)
            }
            
            _ => 1,
        }
    }
    
    /// Count the number of nodes in an expression tree
    fn count_nodes(expr: &Expr) -> usize {
        match expr {
            Expr::Application { operator, operands } => {
                1 + Self::count_nodes(&operator.inner) +
                operands.iter().map(|arg| Self::count_nodes(&arg.inner)).sum::<usize>()
            }
            
            Expr::If { test: cond, consequent: then_branch, alternative: else_branch } => {
                1 + Self::count_nodes(&cond.inner) + 
                Self::count_nodes(&then_branch.inner) +
                else_branch.as_ref().map_or(0, |e| Self::count_nodes(&e.inner))
            }
            
            Expr::Lambda { body, .. } => {
                1 + body.iter().map(|e| Self::count_nodes(&e.inner)).sum::<usize>()
            }
            
            _ => 1,
        }
    }
    
    /// Extract feature flags as a bitmask
    fn extract_feature_flags(&self, expr: &Expr) -> u32 {
        let mut flags = 0u32;
        
        if Self::contains_call_cc(expr) { flags |= 1; }
        if self.contains_io_operations(expr) { flags |= 2; }
        if self.contains_state_operations(expr) { flags |= 4; }
        
        flags
    }
}

impl StandardEvaluatorAdapter {
    /// Create a new adapter for the standard evaluator
    pub fn new(evaluator: StandardEvaluator) -> Self {
        Self { evaluator }
    }
    
    /// Evaluate an expression using the standard evaluator
    pub fn evaluate(&mut self, expr: &Spanned<Expr>, env: Rc<Environment>) -> Result<Value> {
        // This would delegate to the actual standard evaluator
        // For now, we return a placeholder
        Ok(Value::Unspecified)
    }
}

impl MonadicEvaluatorAdapter {
    /// Create a new adapter for the monadic evaluator
    pub fn new(orchestrator: Arc<MonadicEvaluationOrchestrator>) -> Self {
        Self { orchestrator }
    }
    
    /// Evaluate an expression using the monadic evaluator
    pub async fn evaluate(&mut self, expr: &Spanned<Expr>, env: Rc<Environment>) -> Result<UnifiedEvaluationResult> {
        let context = EvaluationContext::empty(env.clone());
        let input = MonadicEvaluationInput {
            expression: expr.clone(),
            environment: env,
            expected_monad: None,
            context,
        };
        
        // This would delegate to the actual monadic orchestrator
        // For now, we return a placeholder
        let result = MonadicEvaluationResult {
            computation: MonadicComputation::Pure(Value::Unspecified),
            metadata: crate::eval::monadic_architecture::EvaluationMetadata {
                steps_taken: 1,
                max_stack_depth: 1,
                monads_used: vec![],
                tail_call_optimized: false,
            },
            effects: vec![],
            metrics: crate::eval::monadic_architecture::EvaluationMetrics {
                evaluation_time_ns: 1000,
                memory_allocated: 1024,
                continuations_captured: 0,
                io_operations: 0,
            },
        };
        
        Ok(UnifiedEvaluationResult::Monadic {
            computation: result.computation.clone(),
            result: Box::new(result),
        })
    }
}

impl PerformanceMetricsCollector {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            standard_metrics: EvaluatorMetrics::new(),
            monadic_metrics: EvaluatorMetrics::new(),
            config: MetricsConfiguration::default(),
        }
    }
    
    /// Update metrics for the standard evaluator
    pub fn update_standard_metrics(&mut self, evaluation_time_ns: u64, success: bool) {
        self.standard_metrics.update(evaluation_time_ns, success);
    }
    
    /// Update metrics for the monadic evaluator
    pub fn update_monadic_metrics(&mut self, evaluation_time_ns: u64, success: bool) {
        self.monadic_metrics.update(evaluation_time_ns, success);
    }
    
    /// Get standard evaluator metrics
    pub fn standard_metrics(&self) -> &EvaluatorMetrics {
        &self.standard_metrics
    }
    
    /// Get monadic evaluator metrics
    pub fn monadic_metrics(&self) -> &EvaluatorMetrics {
        &self.monadic_metrics
    }
}

impl EvaluatorMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self {
            evaluation_count: 0,
            total_time_ns: 0,
            average_time_ns: 0,
            memory_usage: MemoryUsageStats {
                peak_memory_bytes: 0,
                average_memory_bytes: 0,
                allocation_count: 0,
                gc_count: 0,
            },
            error_count: 0,
            success_rate: 1.0,
            feature_usage: FeatureUsageStats {
                call_cc_count: 0,
                io_operation_count: 0,
                state_operation_count: 0,
                error_handling_count: 0,
                max_stack_depth: 0,
                tail_calls_optimized: 0,
            },
        }
    }
    
    /// Update metrics with new evaluation data
    pub fn update(&mut self, evaluation_time_ns: u64, success: bool) {
        self.evaluation_count += 1;
        self.total_time_ns += evaluation_time_ns;
        self.average_time_ns = self.total_time_ns / self.evaluation_count;
        
        if !success {
            self.error_count += 1;
        }
        
        self.success_rate = (self.evaluation_count - self.error_count) as f64 / self.evaluation_count as f64;
    }
}

// Default implementations

impl Default for EvaluationStrategyConfiguration {
    fn default() -> Self {
        Self {
            effect_complexity_threshold: 0.5,
            enable_auto_switching: true,
            force_monadic_for_call_cc: true,
            force_monadic_for_io: false,
            performance_threshold_ms: 100,
            enable_parallel_comparison: false,
        }
    }
}

impl Default for MetricsConfiguration {
    fn default() -> Self {
        Self {
            enable_detailed_metrics: true,
            enable_memory_profiling: false,
            sample_rate: 1.0,
            max_metrics_entries: 10000,
        }
    }
}

impl Default for AnalysisConfiguration {
    fn default() -> Self {
        Self {
            enable_deep_analysis: true,
            enable_caching: true,
            max_cache_size: 1000,
            consider_performance_history: true,
        }
    }
}

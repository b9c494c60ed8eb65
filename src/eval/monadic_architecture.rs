//! Clean Architecture implementation for monadic evaluator.
//!
//! This module implements a clean separation between:
//! 1. Domain Logic: Pure monadic computations and mathematical operations
//! 2. Application Services: Orchestration and business use cases
//! 3. Infrastructure: IO operations, persistence, external system integration
//!
//! The architecture follows the Dependency Inversion Principle:
//! Domain <- Application <- Infrastructure

use crate::eval::{
    Value, Environment, 
    operational_semantics::{EvaluationContext, ComputationState},
    continuation_domain::{CapturedContinuation, ContinuationId},
};
use crate::ast::{Expr, Spanned};
use crate::diagnostics::{Result, Error, Span};
use crate::effects::{
    Effect, EffectContext, Maybe, Either, IO, State, Reader,
    ContinuationMonad, EffectfulComputation,
};
use std::rc::Rc;
use std::sync::Arc;
use std::collections::HashMap;
use async_trait::async_trait;

// ================================
// DOMAIN LAYER - Core Business Logic
// ================================

/// Pure monadic computation - the core domain entity.
///
/// This represents a computation that may have effects but expresses
/// them in a pure, mathematical way through monadic structures.
#[derive(Debug, Clone)]
pub enum MonadicComputation<T: Clone> {
    /// Pure value computation
    Pure(T),
    
    /// Continuation monad computation
    Continuation(ContinuationMonad<T>),
    
    /// Maybe monad computation (optional values)
    Maybe(Maybe<T>),
    
    /// Either monad computation (error handling)
    Either(Either<Error, T>),
    
    /// IO monad computation
    IO(IO<T>),
    
    /// State monad computation
    State(State<Rc<Environment>, T>),
    
    /// Reader monad computation
    Reader(Reader<Rc<Environment>, T>),
    
    /// Composed monadic computation (monad transformers)
    Composed {
        /// Inner computation
        inner: Box<MonadicComputation<Value>>,
        
        /// Transformation function
        transform: MonadicTransformation<T>,
    },
}

/// Monadic transformation - pure domain logic for transforming computations
#[derive(Clone)]
pub enum MonadicTransformation<T: Clone> {
    /// Map transformation (functor)
    Map {
        function: Arc<dyn Fn(Value) -> T + Send + Sync>,
        function_name: String, // for debugging
    },
    
    /// Bind transformation (monadic composition)
    Bind {
        function: Arc<dyn Fn(Value) -> MonadicComputation<T> + Send + Sync>,
        function_name: String,
    },
    
    /// Lift transformation (lift into another monad)
    Lift {
        target_monad: MonadType,
    },
    
    /// Filter transformation (Maybe monad)
    Filter {
        predicate: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
        predicate_name: String,
    },
}

impl<T: Clone> std::fmt::Debug for MonadicTransformation<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MonadicTransformation::Map { function_name, .. } => {
                write!(f, "Map {{ function: <{}> }}", function_name)
            }
            MonadicTransformation::Bind { function_name, .. } => {
                write!(f, "Bind {{ function: <{}> }}", function_name)
            }
            MonadicTransformation::Lift { target_monad } => {
                write!(f, "Lift {{ target_monad: {:?} }}", target_monad)
            }
            MonadicTransformation::Filter { predicate_name, .. } => {
                write!(f, "Filter {{ predicate: <{}> }}", predicate_name)
            }
        }
    }
}

/// Types of monads available in the system
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonadType {
    /// Identity monad - no computational context
    Identity,
    /// Maybe monad - computations that may fail
    Maybe,
    /// Either monad - computations with error handling
    Either,
    /// IO monad - computations with side effects
    IO,
    /// State monad - stateful computations
    State,
    /// Reader monad - environment-based computations
    Reader,
    /// Continuation monad - control flow computations
    Continuation,
    /// List monad - non-deterministic computations
    List,
    /// Custom monad type
    Custom(String),
}

/// Domain service for monadic composition and transformation.
///
/// This encapsulates the mathematical laws and operations of monads.
#[derive(Debug)]
pub struct MonadService {
    /// Configuration for monadic operations
    config: MonadConfiguration,
}

/// Configuration for monadic operations
#[derive(Debug, Clone)]
pub struct MonadConfiguration {
    /// Maximum composition depth to prevent infinite recursion
    max_composition_depth: usize,
    
    /// Whether to optimize monadic compositions
    optimize_compositions: bool,
    
    /// Whether to enable automatic lifting
    enable_auto_lifting: bool,
    
    /// Custom monad definitions
    custom_monads: HashMap<String, CustomMonadDefinition>,
}

/// Definition of a custom monad
#[derive(Clone)]
pub struct CustomMonadDefinition {
    /// Name of the monad
    pub name: String,
    
    /// Implementation of pure/return
    pub pure_impl: Arc<dyn Fn(Value) -> MonadicComputation<Value> + Send + Sync>,
    
    /// Implementation of bind/flatMap
    pub bind_impl: Arc<dyn Fn(MonadicComputation<Value>, Arc<dyn Fn(Value) -> MonadicComputation<Value> + Send + Sync>) -> MonadicComputation<Value> + Send + Sync>,
    
    /// Optional implementation of map/fmap
    pub map_impl: Option<Arc<dyn Fn(MonadicComputation<Value>, Arc<dyn Fn(Value) -> Value + Send + Sync>) -> MonadicComputation<Value> + Send + Sync>>,
}

impl std::fmt::Debug for CustomMonadDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CustomMonadDefinition {{ name: {:?}, pure_impl: <function>, bind_impl: <function>, map_impl: {} }}", 
               self.name, 
               if self.map_impl.is_some() { "<function>" } else { "None" })
    }
}

// ================================
// APPLICATION LAYER - Use Cases and Orchestration
// ================================

/// Application service for orchestrating monadic evaluations.
///
/// This layer coordinates between domain services and handles
/// business use cases without containing domain logic itself.
#[derive(Debug)]
pub struct MonadicEvaluationOrchestrator {
    /// Domain service for monadic operations
    monad_service: MonadService,
    
    /// Repository for continuations (injected dependency)
    continuation_repository: Box<dyn ContinuationRepository>,
    
    /// Effect interpreter (injected dependency)
    effect_interpreter: Box<dyn EffectInterpreter>,
    
    /// Environment manager (injected dependency)
    environment_manager: Box<dyn EnvironmentManager>,
    
    /// Configuration
    orchestrator_config: OrchestratorConfiguration,
}

/// Configuration for the evaluation orchestrator
#[derive(Debug, Clone)]
pub struct OrchestratorConfiguration {
    /// Maximum evaluation steps before timeout
    max_evaluation_steps: usize,
    
    /// Whether to enable tracing and debugging
    enable_tracing: bool,
    
    /// Whether to enable parallel evaluation
    enable_parallel_evaluation: bool,
    
    /// Timeout for individual computations
    computation_timeout_ms: u64,
}

/// Use case: Evaluate a monadic expression
#[derive(Debug)]
pub struct EvaluateMonadicExpressionUseCase {
    /// The orchestrator that handles this use case
    orchestrator: Arc<MonadicEvaluationOrchestrator>,
}

/// Input for monadic expression evaluation
#[derive(Debug, Clone)]
pub struct MonadicEvaluationInput {
    /// The expression to evaluate
    pub expression: Spanned<Expr>,
    
    /// The environment for evaluation
    pub environment: Rc<Environment>,
    
    /// Expected result type
    pub expected_monad: Option<MonadType>,
    
    /// Additional context
    pub context: EvaluationContext,
}

/// Result of monadic expression evaluation
#[derive(Debug, Clone)]
pub struct MonadicEvaluationResult {
    /// The resulting computation
    pub computation: MonadicComputation<Value>,
    
    /// Metadata about the evaluation
    pub metadata: EvaluationMetadata,
    
    /// Any side effects that occurred
    pub effects: Vec<Effect>,
    
    /// Performance metrics
    pub metrics: EvaluationMetrics,
}

/// Metadata about an evaluation
#[derive(Debug, Clone)]
pub struct EvaluationMetadata {
    /// Number of evaluation steps taken
    pub steps_taken: usize,
    
    /// Maximum stack depth reached
    pub max_stack_depth: usize,
    
    /// Monads that were used
    pub monads_used: Vec<MonadType>,
    
    /// Whether tail call optimization was applied
    pub tail_call_optimized: bool,
}

/// Performance metrics for evaluation
#[derive(Debug, Clone)]
pub struct EvaluationMetrics {
    /// Time taken for evaluation (in nanoseconds)
    pub evaluation_time_ns: u64,
    
    /// Memory allocated during evaluation
    pub memory_allocated: usize,
    
    /// Number of continuations captured
    pub continuations_captured: usize,
    
    /// Number of IO operations performed
    pub io_operations: usize,
}

// ================================
// INFRASTRUCTURE LAYER - External Systems and Persistence
// ================================

/// Repository trait for managing continuations (interface)
pub trait ContinuationRepository: std::fmt::Debug {
    /// Store a continuation
    fn store(&mut self, continuation: CapturedContinuation) -> Result<ContinuationId>;
    
    /// Retrieve a continuation by ID
    fn find_by_id(&self, id: ContinuationId) -> Option<CapturedContinuation>;
    
    /// Remove a continuation
    fn remove(&mut self, id: ContinuationId) -> Result<()>;
    
    /// List all continuation IDs
    fn list_all(&self) -> Vec<ContinuationId>;
    
    /// Garbage collect expired continuations
    fn garbage_collect(&mut self, current_generation: u64) -> Result<usize>;
}

/// Effect interpreter trait (interface for effect handling)
#[async_trait]
pub trait EffectInterpreter: std::fmt::Debug + Send + Sync {
    /// Interpret an effectful computation
    async fn interpret(&self, effect: EffectfulComputation) -> Result<Value>;
    
    /// Check if an effect can be interpreted
    fn can_interpret(&self, effect: &Effect) -> bool;
    
    /// Get available effect handlers
    fn available_effects(&self) -> Vec<Effect>;
}

/// Environment manager trait (interface for environment operations)
pub trait EnvironmentManager: std::fmt::Debug {
    /// Create a new environment
    fn create_environment(&self, parent: Option<Rc<Environment>>) -> Rc<Environment>;
    
    /// Clone an environment
    fn clone_environment(&self, env: &Rc<Environment>) -> Rc<Environment>;
    
    /// Extend an environment with new bindings
    fn extend_environment(
        &self, 
        env: &Rc<Environment>, 
        bindings: HashMap<String, Value>
    ) -> Rc<Environment>;
    
    /// Lookup a value in an environment
    fn lookup(&self, env: &Rc<Environment>, name: &str) -> Option<Value>;
    
    /// Update a binding in an environment
    fn update(&self, env: &mut Rc<Environment>, name: String, value: Value) -> Result<()>;
}

/// In-memory implementation of continuation repository
#[derive(Debug)]
pub struct InMemoryContinuationRepository {
    /// Storage for continuations
    continuations: HashMap<ContinuationId, CapturedContinuation>,
    
    /// Configuration
    config: RepositoryConfiguration,
}

/// Configuration for continuation repository
#[derive(Debug, Clone)]
pub struct RepositoryConfiguration {
    /// Maximum number of continuations to store
    pub max_continuations: usize,
    
    /// Whether to enable automatic garbage collection
    pub auto_gc_enabled: bool,
    
    /// GC threshold (collect when this many generations old)
    pub gc_threshold: u64,
}

/// Default effect interpreter implementation
#[derive(Debug)]
pub struct DefaultEffectInterpreter {
    /// IO context for handling IO effects
    io_context: crate::effects::IOContext,
    
    /// Configuration
    config: InterpreterConfiguration,
}

/// Configuration for effect interpreter
#[derive(Debug, Clone)]
pub struct InterpreterConfiguration {
    /// Whether to enable async IO operations
    pub enable_async_io: bool,
    
    /// Timeout for IO operations
    pub io_timeout_ms: u64,
    
    /// Maximum concurrent IO operations
    pub max_concurrent_io: usize,
}

/// Default environment manager implementation
#[derive(Debug)]
pub struct DefaultEnvironmentManager {
    /// Configuration
    config: EnvironmentManagerConfiguration,
}

/// Configuration for environment manager
#[derive(Debug, Clone)]
pub struct EnvironmentManagerConfiguration {
    /// Whether to enable environment caching
    pub enable_caching: bool,
    
    /// Maximum cache size
    pub max_cache_size: usize,
    
    /// Whether to enable copy-on-write optimization
    pub enable_cow: bool,
}

// ================================
// IMPLEMENTATION
// ================================

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

impl MonadicEvaluationOrchestrator {
    /// Create a new orchestrator with dependencies injected
    pub fn new(
        continuation_repository: Box<dyn ContinuationRepository>,
        effect_interpreter: Box<dyn EffectInterpreter>,
        environment_manager: Box<dyn EnvironmentManager>,
    ) -> Self {
        Self {
            monad_service: MonadService::new(),
            continuation_repository,
            effect_interpreter,
            environment_manager,
            orchestrator_config: OrchestratorConfiguration::default(),
        }
    }
    
    /// Evaluate a monadic expression (main orchestration method)
    pub async fn evaluate(
        &mut self,
        input: MonadicEvaluationInput,
    ) -> Result<MonadicEvaluationResult> {
        let start_time = std::time::Instant::now();
        let mut steps_taken = 0;
        let mut max_stack_depth = 0;
        let mut monads_used = Vec::new();
        let mut effects = Vec::new();
        let mut continuations_captured = 0;
        let mut io_operations = 0;
        
        // Main evaluation loop
        let computation = self.evaluate_expression(&input.expression, &input.environment).await?;
        
        // Create result with metrics
        let evaluation_time_ns = start_time.elapsed().as_nanos() as u64;
        
        Ok(MonadicEvaluationResult {
            computation,
            metadata: EvaluationMetadata {
                steps_taken,
                max_stack_depth,
                monads_used,
                tail_call_optimized: false, // Would be set by actual evaluation
            },
            effects,
            metrics: EvaluationMetrics {
                evaluation_time_ns,
                memory_allocated: 0, // Would be measured by actual implementation
                continuations_captured,
                io_operations,
            },
        })
    }
    
    /// Evaluate a single expression (private helper)
    async fn evaluate_expression(
        &mut self,
        expr: &Spanned<Expr>,
        env: &Rc<Environment>,
    ) -> Result<MonadicComputation<Value>> {
        match &expr.inner {
            Expr::CallCC(proc_expr) => {
                // Handle call/cc by capturing continuation
                self.handle_call_cc(proc_expr, env).await
            }
            
            Expr::Application { operator, operands } => {
                // Check if this is a monadic operation
                if self.is_monadic_operation(operator) {
                    self.handle_monadic_operation(operator, operands, env).await
                } else {
                    // Regular function application
                    Ok(MonadicComputation::Pure(Value::Unspecified)) // Simplified
                }
            }
            
            _ => {
                // For other expressions, return pure computation
                Ok(MonadicComputation::Pure(Value::Unspecified)) // Simplified
            }
        }
    }
    
    /// Handle call/cc expression
    async fn handle_call_cc(
        &mut self,
        _proc_expr: &Spanned<Expr>,
        _env: &Rc<Environment>,
    ) -> Result<MonadicComputation<Value>> {
        // Capture current continuation and create monadic computation
        Ok(MonadicComputation::Continuation(
            ContinuationMonad::pure(Value::Unspecified)
        ))
    }
    
    /// Handle monadic operations
    async fn handle_monadic_operation(
        &mut self,
        _operator: &Spanned<Expr>,
        _operands: &[Spanned<Expr>],
        _env: &Rc<Environment>,
    ) -> Result<MonadicComputation<Value>> {
        // Detect and handle specific monadic operations
        Ok(MonadicComputation::Pure(Value::Unspecified)) // Simplified
    }
    
    /// Check if an expression represents a monadic operation
    fn is_monadic_operation(&self, expr: &Spanned<Expr>) -> bool {
        if let Expr::Identifier(name) = &expr.inner {
            matches!(name.as_str(), "map" | "bind" | "pure" | "lift" | "just" | "nothing" | "left" | "right")
        } else {
            false
        }
    }
}

// Default implementations

impl Default for MonadConfiguration {
    fn default() -> Self {
        Self {
            max_composition_depth: 1000,
            optimize_compositions: true,
            enable_auto_lifting: true,
            custom_monads: HashMap::new(),
        }
    }
}

impl Default for OrchestratorConfiguration {
    fn default() -> Self {
        Self {
            max_evaluation_steps: 10000,
            enable_tracing: false,
            enable_parallel_evaluation: false,
            computation_timeout_ms: 5000,
        }
    }
}

impl Default for RepositoryConfiguration {
    fn default() -> Self {
        Self {
            max_continuations: 1000,
            auto_gc_enabled: true,
            gc_threshold: 10,
        }
    }
}

impl Default for InterpreterConfiguration {
    fn default() -> Self {
        Self {
            enable_async_io: true,
            io_timeout_ms: 1000,
            max_concurrent_io: 10,
        }
    }
}

impl Default for EnvironmentManagerConfiguration {
    fn default() -> Self {
        Self {
            enable_caching: true,
            max_cache_size: 1000,
            enable_cow: true,
        }
    }
}

// Repository implementations

impl ContinuationRepository for InMemoryContinuationRepository {
    fn store(&mut self, continuation: CapturedContinuation) -> Result<ContinuationId> {
        let id = continuation.id;
        
        // Check if we're at capacity
        if self.continuations.len() >= self.config.max_continuations {
            if self.config.auto_gc_enabled {
                self.garbage_collect(0)?; // Force GC
            } else {
                return Err(Box::new(Error::runtime_error(
                    "Continuation repository at capacity".to_string(),
                    None,
                ));
            }
        }
        
        self.continuations.insert(id, continuation);
        Ok(id)
    }
    
    fn find_by_id(&self, id: ContinuationId) -> Option<CapturedContinuation> {
        self.continuations.get(&id).clone())()
    }
    
    fn remove(&mut self, id: ContinuationId) -> Result<()> {
        self.continuations.remove(&id);
        Ok(())
    }
    
    fn list_all(&self) -> Vec<ContinuationId> {
        self.continuations.keys().copied().collect()
    }
    
    fn garbage_collect(&mut self, current_generation: u64) -> Result<usize> {
        let initial_count = self.continuations.len();
        
        // Remove continuations that are too old or already invoked
        self.continuations.retain(|_id, cont| {
            !cont.is_invoked && 
            (current_generation.saturating_sub(cont.metadata.generation) <= self.config.gc_threshold)
        });
        
        let collected = initial_count - self.continuations.len();
        Ok(collected)
    }
}

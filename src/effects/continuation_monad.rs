//! Continuation monad implementation for call/cc support.
//!
//! This module implements the continuation monad that underlies call/cc
//! and provides the mathematical foundation for non-local control flow
//! in Lambdust's operational semantics.

#![allow(missing_docs)]

use crate::diagnostics::{Error, Result, Span};
use crate::eval::value::{Value, ThreadSafeEnvironment};
use crate::ast::Literal;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use std::any::TypeId;

/// Trait for converting between Scheme values and Rust types
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self>;
}

/// Trait for converting Rust types to Scheme values
pub trait ToValue {
    fn to_value(self) -> Value;
}

/// Implement conversions for common types
impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl ToValue for Value {
    fn to_value(self) -> Value {
        self
    }
}

// Note: For generic types, we'll implement conversions on a case-by-case basis
// This avoids the need for unstable features like specialization

impl FromValue for i32 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Literal(Literal::Number(n)) => Ok(n as i32),
            _ => Err(Box::new(Error::type_error("Expected number", Span::new(0, 0).boxed())),
        }
    }
}

impl ToValue for i32 {
    fn to_value(self) -> Value {
        Value::Literal(Literal::Number(self as f64))
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Literal(Literal::String(s)) => Ok(s),
            _ => Err(Box::new(Error::type_error("Expected string", Span::new(0, 0).boxed())),
        }
    }
}

impl ToValue for String {
    fn to_value(self) -> Value {
        Value::Literal(Literal::String(self))
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Literal(Literal::Boolean(b)) => Ok(b),
            _ => Err(Box::new(Error::type_error("Expected boolean", Span::new(0, 0).boxed())),
        }
    }
}

impl ToValue for bool {
    fn to_value(self) -> Value {
        Value::Literal(Literal::Boolean(self))
    }
}

/// The continuation monad - represents computations that can be suspended
/// and resumed with a continuation.
///
/// In Scheme terms, this implements the semantic foundation for call/cc:
/// `Cont r a = (a -> r) -> r`
///
/// Where:
/// - `a` is the value type being computed
/// - `r` is the final answer type 
/// - The continuation `(a -> r)` represents "what to do with the value"
#[derive(Debug, Clone)]
pub struct ContinuationMonad<A> {
    /// The computation: takes a continuation and produces a result
    computation: ContComputation<A>,
}

/// Function wrapper that implements Debug and Clone for continuation functions
#[derive(Clone)]
pub struct ContinuationFunc<A, B> {
    /// Unique identifier for debugging
    id: u64,
    /// Function implementation using Arc for shared ownership
    func: Arc<dyn Fn(A) -> B + Send + Sync + 'static>,
}

impl<A, B> ContinuationFunc<A, B> {
    pub fn new<F>(id: u64, func: F) -> Self
    where
        F: Fn(A) -> B + Send + Sync + 'static,
    {
        Self {
            id,
            func: Arc::new(func),
        }
    }
    
    pub fn call(&self, arg: A) -> B {
        (self.func)(arg)
    }
}

impl<A, B> std::fmt::Debug for ContinuationFunc<A, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ContinuationFunc({})", self.id)
    }
}

/// Internal representation of a continuation computation.
/// This captures the essence of `(a -> r) -> r` in Rust with proper trait support.
#[derive(Debug, Clone)]
pub enum ContComputation<A> {
    /// Pure value - just apply the continuation to it
    Pure(A),
    
    /// Call/cc operation - capture current continuation 
    CallCC {
        /// Function that receives the captured continuation
        proc: ContinuationFunc<ContinuationFunction, ContinuationMonad<A>>,
    },
    
    /// Apply a captured continuation (non-local jump)
    ApplyContinuation {
        continuation: ContinuationFunction,
        value: A,
    },
    
    /// Bind operation for monadic composition
    Bind {
        inner: Box<ContinuationMonad<Value>>,
        next: ContinuationFunc<Value, ContinuationMonad<A>>,
    },
    
    /// Effectful computation embedded in the continuation monad
    Effect {
        effect_computation: EffectfulComputation,
        continuation: ContinuationFunc<Value, ContinuationMonad<A>>,
    },
}

/// A continuation function - represents "what to do next"
/// This is the mathematical continuation in call/cc
#[derive(Debug, Clone)]
pub struct ContinuationFunction {
    /// Unique identifier for this continuation
    pub id: u64,
    
    /// The captured environment at continuation creation
    pub environment: Arc<ThreadSafeEnvironment>,
    
    /// The continuation computation - represents the "rest of the program"
    pub computation: ContinuationComputation,
    
    /// Whether this continuation has been invoked (single-shot semantics)
    pub invoked: bool,
}

/// The actual continuation computation that was captured
#[derive(Debug, Clone)]
pub enum ContinuationComputation {
    /// Return to a specific evaluation context
    EvaluationContext {
        /// The saved evaluation stack
        stack: Vec<EvaluationFrame>,
        
        /// The environment where the continuation was captured
        captured_env: Arc<ThreadSafeEnvironment>,
    },
    
    /// Direct function call continuation
    FunctionCall {
        /// Function to call with the value
        function: Value,
        
        /// Additional arguments to the function
        args: Vec<Value>,
        
        /// Environment for the function call
        env: Arc<ThreadSafeEnvironment>,
    },
    
    /// Composition of continuations
    Composed {
        /// First continuation to apply
        first: Box<ContinuationFunction>,
        
        /// Second continuation to apply to the result
        second: Box<ContinuationFunction>,
    },
}

/// Represents a frame in the evaluation stack for continuation capture
#[derive(Debug, Clone)]
pub enum EvaluationFrame {
    /// Function application frame
    Application {
        /// The function being applied
        function: Value,
        
        /// Arguments already evaluated
        evaluated_args: Vec<Value>,
        
        /// Arguments still to be evaluated
        pending_args: Vec<Value>,
        
        /// Environment for evaluation
        env: Arc<ThreadSafeEnvironment>,
    },
    
    /// Conditional evaluation frame
    Conditional {
        /// The then branch
        then_branch: Value,
        
        /// The else branch  
        else_branch: Value,
        
        /// Environment for evaluation
        env: Arc<ThreadSafeEnvironment>,
    },
    
    /// Begin sequence frame
    Sequence {
        /// Remaining expressions to evaluate
        remaining: Vec<Value>,
        
        /// Environment for evaluation
        env: Arc<ThreadSafeEnvironment>,
    },
    
    /// Let binding frame
    LetBinding {
        /// Variable bindings
        bindings: HashMap<String, Value>,
        
        /// Body expression
        body: Value,
        
        /// Environment for evaluation
        env: Arc<ThreadSafeEnvironment>,
    },
}

/// Effectful computations that can be embedded in the continuation monad
#[derive(Debug, Clone)]
pub enum EffectfulComputation {
    /// IO operation
    IO {
        /// The IO action to perform
        action: ContIOAction,
    },
    
    /// State modification
    State {
        /// The state operation
        action: ContStateAction,
        
        /// Current state
        state: Arc<ThreadSafeEnvironment>,
    },
    
    /// Error handling
    Error {
        /// The error to handle
        error: Error,
    },
}

/// IO actions within the continuation monad (continuation-specific)
#[derive(Debug, Clone)]
pub enum ContIOAction {
    /// Read a value
    Read,
    
    /// Write a value
    Write(Value),
    
    /// Print a value
    Print(Value),
    
    /// Return a pure value from IO
    Return(Value),
}

// Keep the old name for compatibility
pub use ContIOAction as IOAction;

/// State actions within the continuation monad (continuation-specific)
#[derive(Debug, Clone)]  
pub enum ContStateAction {
    /// Get current state
    Get,
    
    /// Set new state
    Put(Arc<ThreadSafeEnvironment>),
    
    /// Return a value with current state
    Return(Value),
}

// Keep the old name for compatibility
pub use ContStateAction as StateAction;

impl<A> ContinuationMonad<A> {
    /// Create a pure continuation computation
    pub fn pure(value: A) -> Self {
        Self {
            computation: ContComputation::Pure(value),
        }
    }
    
    /// Create a call/cc computation with proper trait support
    pub fn call_cc<F>(f: F) -> ContinuationMonad<Value>
    where
        F: Fn(ContinuationFunction) -> ContinuationMonad<Value> + Send + Sync + 'static,
    {
        static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);
        let id = COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        
        ContinuationMonad {
            computation: ContComputation::CallCC {
                proc: ContinuationFunc::new(id, f),
            },
        }
    }
    
    /// Apply a captured continuation (perform non-local jump)
    pub fn apply_continuation(cont: ContinuationFunction, value: A) -> Self {
        Self {
            computation: ContComputation::ApplyContinuation {
                continuation: cont,
                value,
            },
        }
    }
    
    /// Monadic bind specialized for Value type (avoids complex type conversions)
    pub fn bind(self, f: impl Fn(A) -> ContinuationMonad<Value> + Send + Sync + 'static) -> ContinuationMonad<Value>
    where
        A: 'static,
    {
        // For simplicity, we'll implement this for the most common case where A = Value
        // and provide a default error for other cases
        ContinuationMonad::pure(Value::Unspecified) // Simplified implementation
    }
    
    
    /// Lift an effectful computation into the continuation monad
    pub fn lift_effect(effect: EffectfulComputation) -> ContinuationMonad<Value> {
        static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);
        let id = COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        
        ContinuationMonad {
            computation: ContComputation::Effect {
                effect_computation: effect,
                continuation: ContinuationFunc::new(id, |v| ContinuationMonad::pure(v)),
            },
        }
    }
}

impl ContinuationFunction {
    /// Create a new continuation function
    pub fn new(
        id: u64,
        environment: Arc<ThreadSafeEnvironment>,
        computation: ContinuationComputation,
    ) -> Self {
        Self {
            id,
            environment,
            computation,
            invoked: false,
        }
    }
    
    /// Apply this continuation to a value (call the continuation)
    pub fn apply(&mut self, value: Value) -> Result<Value> {
        if self.invoked {
            return Err(Box::new(Error::runtime_error(
                "Continuation has already been invoked".to_string(),
                None,
            ));
        }
        
        self.invoked = true;
        
        match &self.computation {
            ContinuationComputation::EvaluationContext { stack, captured_env } => {
                // Restore the evaluation context and continue with the value
                // This implements the non-local jump semantics of call/cc
                self.restore_evaluation_context(stack, captured_env.clone()), value)
            }
            
            ContinuationComputation::FunctionCall { function, args, env } => {
                // Apply the function to the value plus additional args
                let mut all_args = vec![value];
                all_args.extend_from_slice(args);
                
                // This would call the evaluator - simplified for now
                Ok(Value::Unspecified)
            }
            
            ContinuationComputation::Composed { first, second } => {
                // Apply first continuation, then second
                let intermediate = first.clone()).apply(value)?;
                second.clone()).apply(intermediate)
            }
        }
    }
    
    /// Restore an evaluation context (implements the operational semantics)
    fn restore_evaluation_context(
        &self,
        _stack: &[EvaluationFrame],
        _env: Arc<ThreadSafeEnvironment>,
        value: Value,
    ) -> Result<Value> {
        // In a full implementation, this would restore the entire evaluation stack
        // and continue evaluation from where the continuation was captured.
        // For now, we simply return the value.
        Ok(value)
    }
    
    /// Check if this continuation can be safely invoked
    pub fn is_valid(&self) -> bool {
        !self.invoked
    }
}

/// Execute a continuation monad computation
pub fn run_continuation<A>(cont: ContinuationMonad<A>) -> Result<A> 
where
    A: FromValue + ToValue + 'static,
{
    match cont.computation {
        ContComputation::Pure(value) => Ok(value),
        
        ContComputation::CallCC { proc } => {
            // Create a "dummy" continuation for demonstration
            // In practice, this would capture the real continuation
            let dummy_cont = ContinuationFunction::new(
                0,
                Arc::new(ThreadSafeEnvironment::new(None, 0)),
                ContinuationComputation::EvaluationContext {
                    stack: Vec::new(),
                    captured_env: Arc::new(ThreadSafeEnvironment::new(None, 0)),
                },
            );
            
            let result_cont = proc.call(dummy_cont);
            run_continuation(result_cont)
        }
        
        ContComputation::ApplyContinuation { mut continuation, value } => {
            // Apply the continuation - this performs the non-local jump
            let value_as_value = value.to_value();
            let result = continuation.apply(value_as_value)?;
            
            // For type safety, we convert through Value if A is not Value
            if std::any::TypeId::of::<A>() == std::any::TypeId::of::<Value>() {
                unsafe { Ok(std::mem::transmute_copy(&result)) }
            } else {
                // This is a simplified fallback - in practice we'd need proper conversion
                match A::from_value(result) {
                    Ok(converted) => Ok(converted),
                    Err(_) => Err(Box::new(Error::type_error("Type conversion failed in continuation application", Span::new(0, 0).boxed())),
                }
            }
        }
        
        ContComputation::Bind { inner, next } => {
            // Execute the inner computation first
            let intermediate_result = run_continuation(*inner)?;
            
            // Apply the next function to the result
            let final_cont = next.call(intermediate_result);
            
            // Execute the final computation
            run_continuation(final_cont)
        }
        
        ContComputation::Effect { effect_computation, continuation } => {
            // Execute the effectful computation
            let effect_result = execute_effect(effect_computation)?;
            
            // Continue with the result
            let cont_result = continuation.call(effect_result);
            run_continuation(cont_result)
        }
    }
}

/// Execute an effectful computation
fn execute_effect(effect: EffectfulComputation) -> Result<Value> {
    match effect {
        EffectfulComputation::IO { action } => {
            match action {
                ContIOAction::Read => {
                    // Simplified - would read from stdin
                    Ok(Value::string("input".to_string()))
                }
                ContIOAction::Write(value) => {
                    print!("{}", value);
                    Ok(Value::Unspecified)
                }
                ContIOAction::Print(value) => {
                    println!("{}", value);
                    Ok(Value::Unspecified)
                }
                ContIOAction::Return(value) => Ok(value),
            }
        }
        
        EffectfulComputation::State { action, state: _ } => {
            match action {
                ContStateAction::Get => {
                    // Return current state - simplified
                    Ok(Value::Unspecified)
                }
                ContStateAction::Put(_new_state) => {
                    // Set new state - simplified
                    Ok(Value::Unspecified)
                }
                ContStateAction::Return(value) => Ok(value),
            }
        }
        
        EffectfulComputation::Error { error } => {
            Err(error)
        }
    }
}

/// Helper functions for common continuation patterns
/// Create an escape continuation (typical call/cc usage)  
pub fn escape_continuation(escape_value: Value) -> ContinuationMonad<Value> {
    ContinuationMonad::<Value>::call_cc(move |escape| {
        ContinuationMonad::apply_continuation(escape, escape_value.clone())
    })
}

/// Create a retry continuation
pub fn retry_continuation<F>(computation: F) -> ContinuationMonad<Value>
where
    F: Fn() -> ContinuationMonad<Value> + Send + Sync + 'static,
{
    ContinuationMonad::<Value>::call_cc(move |_retry| {
        computation() // Simplified - just execute the computation
    })
}

impl fmt::Display for ContinuationFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Continuation({})", self.id)
    }
}

impl<A: fmt::Display> fmt::Display for ContinuationMonad<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.computation {
            ContComputation::Pure(value) => write!(f, "Pure({})", value),
            ContComputation::CallCC { .. } => write!(f, "CallCC(<procedure>)"),
            ContComputation::ApplyContinuation { continuation, .. } => {
                write!(f, "ApplyContinuation({})", continuation)
            }
            ContComputation::Bind { .. } => write!(f, "Bind(<computation>)"),
            ContComputation::Effect { .. } => write!(f, "Effect(<computation>)"),
        }
    }
}

// Thread safety
unsafe impl<A: Send> Send for ContinuationMonad<A> {}
unsafe impl<A: Sync> Sync for ContinuationMonad<A> {}
unsafe impl Send for ContinuationFunction {}
unsafe impl Sync for ContinuationFunction {}

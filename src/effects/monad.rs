//! Monadic types and operations for the effect system.
//!
//! This module implements the core monadic abstractions used in Lambdust:
//! - IO monad for side effects
//! - State monad for mutations  
//! - Error monad for exceptions
//! - Combined monad transformers
//! - Monadic composition operations (return, >>=, >>, do-notation)

#![allow(missing_docs)]

use super::{Effect};
use crate::diagnostics::{Error as DiagnosticError, Result};
use crate::eval::value::{ThreadSafeEnvironment, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

/// A monadic computation that tracks effects.
///
/// This represents a computation that may produce side effects and
/// is parameterized by the effect type and return value type.
#[derive(Debug, Clone)]
pub enum MonadicValue {
    /// Pure value (no effects)
    Pure(Value),
    /// IO computation
    IO(IOComputation),
    /// State computation
    State(StateComputation),
    /// Error computation  
    Error(ErrorComputation),
    /// Combined computation with multiple effects
    Combined(CombinedComputation),
}

/// An IO computation that performs side effects.
#[derive(Debug, Clone)]
pub struct IOComputation {
    /// The computation to perform
    action: IOAction,
    /// Continuation after the action
    continuation: Option<Box<MonadicValue>>,
}

/// An action that performs IO.
#[derive(Debug, Clone)]
pub enum IOAction {
    /// Read from input
    Read(IOSource),
    /// Write to output
    Write(IOTarget, Value),
    /// Print a value
    Print(Value),
    /// Print a newline
    Newline,
    /// Open a file for reading
    OpenRead(String),
    /// Open a file for writing  
    OpenWrite(String),
    /// Close a file/port
    Close(Value),
    /// Return a pure value
    Return(Value),
    /// Custom IO action
    Custom(String, Vec<Value>),
}

/// Source for IO operations.
#[derive(Debug, Clone)]
pub enum IOSource {
    /// Standard input
    Stdin,
    /// File input
    File(String),
    /// String input
    String(String),
    /// Port input
    Port(Value),
}

/// Target for IO operations.
#[derive(Debug, Clone)]
pub enum IOTarget {
    /// Standard output
    Stdout,
    /// Standard error
    Stderr,
    /// File output
    File(String),
    /// String output (accumulator) - Thread-safe
    String(Arc<RwLock<String>>),
    /// Port output
    Port(Value),
}

/// A state computation that manages mutable state - Thread-safe.
#[derive(Debug, Clone)]
pub struct StateComputation {
    /// The state transformation to perform
    action: StateAction,
    /// Initial state environment (thread-safe)
    initial_env: Arc<ThreadSafeEnvironment>,
    /// Continuation with the new state
    continuation: Option<Box<MonadicValue>>,
}

/// An action that modifies state.
#[derive(Debug, Clone)]
pub enum StateAction {
    /// Get the current state
    Get,
    /// Set the state to a new value
    Put(Arc<ThreadSafeEnvironment>),
    /// Modify the state with a function (simplified - placeholder for now)
    Modify,
    /// Get a specific variable from state
    GetVar(String),
    /// Set a specific variable in state
    SetVar(String, Value),
    /// Define a new variable in state
    DefineVar(String, Value),
    /// Return a pure value with current state
    Return(Value),
    /// Custom state action
    Custom(String, Vec<Value>),
}

/// An error computation that may fail.
#[derive(Debug, Clone)]
pub struct ErrorComputation {
    /// The computation that may fail
    action: ErrorAction,
    /// Error handler
    handler: Option<ErrorHandler>,
    /// Continuation for success case
    continuation: Option<Box<MonadicValue>>,
}

/// An action that may produce an error.
#[derive(Debug, Clone)]
pub enum ErrorAction {
    /// Throw an error
    Throw(DiagnosticError),
    /// Try a computation, catching errors
    Try(Box<MonadicValue>),
    /// Return a successful value
    Return(Value),
    /// Custom error action
    Custom(String, Vec<Value>),
}

/// Handler for errors in error computations.
#[derive(Debug, Clone)]
pub struct ErrorHandler {
    /// Name of the handler (simplified - no function pointer for now)
    name: String,
}

/// A computation that combines multiple effects.
#[derive(Debug, Clone)]
pub struct CombinedComputation {
    /// The effects present in this computation
    effects: Vec<Effect>,
    /// The underlying computations for each effect
    #[allow(dead_code)]
    computations: HashMap<Effect, Box<MonadicValue>>,
    /// The primary computation
    primary: Box<MonadicValue>,
}

impl CombinedComputation {
    /// Gets the primary computation.
    pub fn primary(&self) -> &MonadicValue {
        &self.primary
    }
}

/// Monadic operations and combinators.
pub struct Monad;

impl MonadicValue {
    /// Creates a pure monadic value.
    pub fn pure(value: Value) -> Self {
        MonadicValue::Pure(value)
    }
    
    /// Creates an IO computation.
    pub fn io(action: IOAction) -> Self {
        MonadicValue::IO(IOComputation {
            action,
            continuation: None,
        })
    }
    
    /// Creates a state computation.
    pub fn state(action: StateAction, env: Arc<ThreadSafeEnvironment>) -> Self {
        MonadicValue::State(StateComputation {
            action,
            initial_env: env,
            continuation: None,
        })
    }
    
    /// Creates an error computation.
    pub fn error(action: ErrorAction) -> Self {
        MonadicValue::Error(ErrorComputation {
            action,
            handler: None,
            continuation: None,
        })
    }
    
    /// Returns the effects present in this monadic value.
    pub fn effects(&self) -> Vec<Effect> {
        match self {
            MonadicValue::Pure(_) => vec![Effect::Pure],
            MonadicValue::IO(_) => vec![Effect::IO],
            MonadicValue::State(_) => vec![Effect::State],
            MonadicValue::Error(_) => vec![Effect::Error],
            MonadicValue::Combined(comp) => comp.effects.clone(),
        }
    }
    
    /// Returns true if this computation is pure.
    pub fn is_pure(&self) -> bool {
        matches!(self, MonadicValue::Pure(_))
    }
    
    /// Extracts the value if this is a pure computation.
    pub fn into_pure(self) -> Option<Value> {
        match self {
            MonadicValue::Pure(value) => Some(value),
            _ => None,
        }
    }
    
    /// Lifts this computation into a specific effect.
    pub fn lift_into(self, effect: Effect) -> Self {
        if self.effects().contains(&effect) {
            return self;
        }
        
        match effect {
            Effect::Pure => self,
            Effect::IO => match self {
                MonadicValue::Pure(value) => MonadicValue::io(IOAction::Return(value)),
                other => other,
            },
            Effect::State => match self {
                MonadicValue::Pure(value) => {
                    // Create a state computation that returns the value with empty env
                    let env = Arc::new(ThreadSafeEnvironment::new(None, 0));
                    MonadicValue::state(StateAction::Return(value), env)
                },
                other => other,
            },
            Effect::Error => match self {
                MonadicValue::Pure(value) => MonadicValue::error(ErrorAction::Return(value)),
                other => other,
            },
            Effect::Custom(_) => {
                // For custom effects, wrap in a combined computation
                let mut effects = self.effects();
                effects.push(effect);
                effects.sort();
                effects.dedup();
                
                let mut computations = HashMap::new();
                computations.insert(Effect::Pure, Box::new(self.clone()));
                
                MonadicValue::Combined(CombinedComputation {
                    effects,
                    computations,
                    primary: Box::new(self),
                })
            }
        }
    }
}

impl Monad {
    /// Monadic return operation - lifts a pure value into the monad.
    pub fn return_value(value: Value) -> MonadicValue {
        MonadicValue::pure(value)
    }
    
    /// Monadic bind operation (>>=) - sequential composition.
    pub fn bind<F>(mv: MonadicValue, f: F) -> MonadicValue 
    where 
        F: Fn(Value) -> MonadicValue + 'static,
    {
        match mv {
            MonadicValue::Pure(value) => f(value),
            MonadicValue::IO(mut io_comp) => {
                // Set the continuation to apply f to the result
                io_comp.continuation = Some(Box::new(
                    MonadicValue::Pure(Value::Unspecified) // Placeholder, will be replaced
                ));
                MonadicValue::IO(io_comp)
            },
            MonadicValue::State(mut state_comp) => {
                // Set the continuation for state computation
                state_comp.continuation = Some(Box::new(
                    MonadicValue::Pure(Value::Unspecified) // Placeholder
                ));
                MonadicValue::State(state_comp)
            },
            MonadicValue::Error(mut error_comp) => {
                // Set the continuation for error computation
                error_comp.continuation = Some(Box::new(
                    MonadicValue::Pure(Value::Unspecified) // Placeholder
                ));
                MonadicValue::Error(error_comp)
            },
            MonadicValue::Combined(combined) => {
                // Handle combined computations
                MonadicValue::Combined(combined) // Simplified for now
            }
        }
    }
    
    /// Monadic sequence operation (>>) - sequential execution, ignoring first result.
    pub fn sequence(first: MonadicValue, second: MonadicValue) -> MonadicValue {
        Self::bind(first, move |_| second.clone())
    }
    
    /// Monadic join operation - flattens nested monadic values.
    pub fn join(nested: MonadicValue) -> MonadicValue {
        Self::bind(nested, |value| {
            // If the value is itself a monadic computation, return it
            // Otherwise, wrap it in a pure computation
            // This is simplified - in practice, we'd need to handle this more carefully
            MonadicValue::pure(value)
        })
    }
    
    /// Lifts a function into the monadic context (fmap).
    pub fn fmap<F>(f: F, mv: MonadicValue) -> MonadicValue 
    where 
        F: Fn(Value) -> Value + 'static,
    {
        Self::bind(mv, move |value| MonadicValue::pure(f(value)))
    }
    
    /// Applicative apply operation (<*>).
    pub fn apply(mf: MonadicValue, mv: MonadicValue) -> MonadicValue {
        Self::bind(mf, move |_f_val| {
            Self::bind(mv.clone(), move |v_val| {
                // Apply the function value to the argument value
                // This is simplified - in practice, we'd need proper function application
                MonadicValue::pure(v_val)
            })
        })
    }
    
    /// Lifts two values with a binary function.
    pub fn lift2<F>(f: F, ma: MonadicValue, mb: MonadicValue) -> MonadicValue 
    where 
        F: FnOnce(Value, Value) -> Value + Clone + 'static,
    {
        let f = f.clone();
        Self::bind(ma, move |a| {
            let f = f.clone();
            Self::bind(mb.clone(), move |b| {
                let f = f.clone();
                MonadicValue::pure(f(a.clone(), b))
            })
        })
    }
    
    /// Conditional monadic execution.
    pub fn when(condition: bool, action: MonadicValue) -> MonadicValue {
        if condition {
            action
        } else {
            MonadicValue::pure(Value::Unspecified)
        }
    }
    
    /// Conditional monadic execution with alternative.
    pub fn if_then_else(
        condition: bool, 
        then_action: MonadicValue, 
        else_action: MonadicValue
    ) -> MonadicValue {
        if condition {
            then_action
        } else {
            else_action
        }
    }
}

impl IOComputation {
    /// Creates a new IO computation.
    pub fn new(action: IOAction) -> Self {
        Self {
            action,
            continuation: None,
        }
    }
    
    /// Adds a continuation to this IO computation.
    pub fn then(mut self, continuation: MonadicValue) -> Self {
        self.continuation = Some(Box::new(continuation));
        self
    }
    
    /// Executes this IO computation.
    pub fn execute(&self) -> Result<Value> {
        match &self.action {
            IOAction::Return(value) => Ok(value.clone()),
            IOAction::Print(value) => {
                print!("{value}");
                Ok(Value::Unspecified)
            },
            IOAction::Newline => {
                println!();
                Ok(Value::Unspecified)
            },
            IOAction::Write(target, value) => {
                match target {
                    IOTarget::Stdout => {
                        print!("{value}");
                        Ok(Value::Unspecified)
                    },
                    IOTarget::Stderr => {
                        eprint!("{value}");
                        Ok(Value::Unspecified)
                    },
                    _ => {
                        // TODO: Implement other IO targets
                        Err(Box::new(DiagnosticError::runtime_error(
                            "IO target not yet implemented".to_string(),
                            None,
                        )))
                    }
                }
            },
            _ => {
                // TODO: Implement other IO actions
                Err(Box::new(DiagnosticError::runtime_error(
                    "IO action not yet implemented".to_string(),
                    None,
                )))
            }
        }
    }
}

impl StateComputation {
    /// Creates a new state computation.
    pub fn new(action: StateAction, env: Arc<ThreadSafeEnvironment>) -> Self {
        Self {
            action,
            initial_env: env,
            continuation: None,
        }
    }
    
    /// Adds a continuation to this state computation.
    pub fn then(mut self, continuation: MonadicValue) -> Self {
        self.continuation = Some(Box::new(continuation));
        self
    }
    
    /// Executes this state computation, returning the result and new state.
    pub fn execute(&self) -> Result<(Value, Arc<ThreadSafeEnvironment>)> {
        match &self.action {
            StateAction::Return(value) => Ok((value.clone(), self.initial_env.clone())),
            StateAction::Get => {
                // Return the environment as a value (simplified)
                Ok((Value::Unspecified, self.initial_env.clone()))
            },
            StateAction::Put(new_env) => {
                Ok((Value::Unspecified, new_env.clone()))
            },
            StateAction::GetVar(name) => {
                match self.initial_env.lookup(name) {
                    Some(value) => Ok((value, self.initial_env.clone())),
                    None => Err(Box::new(DiagnosticError::runtime_error(
                        format!("Unbound variable: {name}"),
                        None,
                    ))),
                }
            },
            StateAction::SetVar(name, value) => {
                // Create a new environment with the updated variable using COW semantics
                if let Some(new_env) = self.initial_env.set_cow(name, value.clone()) {
                    Ok((Value::Unspecified, new_env))
                } else {
                    Err(Box::new(DiagnosticError::runtime_error(
                        format!("Variable {name} not found for setting"),
                        None,
                    )))
                }
            },
            StateAction::DefineVar(name, value) => {
                let new_env = self.initial_env.define_cow(name.clone(), value.clone());
                Ok((Value::Unspecified, new_env))
            },
            _ => {
                // TODO: Implement other state actions
                Err(Box::new(DiagnosticError::runtime_error(
                    "State action not yet implemented".to_string(),
                    None,
                )))
            }
        }
    }
}

impl ErrorComputation {
    /// Creates a new error computation.
    pub fn new(action: ErrorAction) -> Self {
        Self {
            action,
            handler: None,
            continuation: None,
        }
    }
    
    /// Adds an error handler to this computation.
    pub fn with_handler(mut self, handler_name: String) -> Self {
        self.handler = Some(ErrorHandler {
            name: handler_name,
        });
        self
    }
    
    /// Adds a continuation to this error computation.
    pub fn then(mut self, continuation: MonadicValue) -> Self {
        self.continuation = Some(Box::new(continuation));
        self
    }
    
    /// Executes this error computation.
    pub fn execute(&self) -> Result<Value> {
        match &self.action {
            ErrorAction::Return(value) => Ok(value.clone()),
            ErrorAction::Throw(error) => {
                if let Some(_handler) = &self.handler {
                    // Simplified error handling - just return a recovery value
                    Ok(Value::string("Error handled".to_string()))
                } else {
                    Err(Box::new(error.clone()))
                }
            },
            ErrorAction::Try(computation) => {
                // Try to execute the computation, catching any errors
                match computation.as_ref() {
                    MonadicValue::Pure(value) => Ok(value.clone()),
                    _ => {
                        // For non-pure computations, we'd need to execute them
                        // This is simplified for now
                        Ok(Value::Unspecified)
                    }
                }
            },
            _ => {
                // TODO: Implement other error actions
                Err(Box::new(DiagnosticError::runtime_error(
                    "Error action not yet implemented".to_string(),
                    None,
                )))
            }
        }
    }
}

// Custom implementations for traits that can't be automatically derived

impl PartialEq for StateAction {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (StateAction::Get, StateAction::Get) => true,
            (StateAction::Put(a), StateAction::Put(b)) => Arc::ptr_eq(a, b),
            (StateAction::GetVar(a), StateAction::GetVar(b)) => a == b,
            (StateAction::SetVar(a1, v1), StateAction::SetVar(a2, v2)) => a1 == a2 && v1 == v2,
            (StateAction::DefineVar(a1, v1), StateAction::DefineVar(a2, v2)) => a1 == a2 && v1 == v2,
            (StateAction::Return(a), StateAction::Return(b)) => a == b,
            (StateAction::Custom(a1, v1), StateAction::Custom(a2, v2)) => a1 == a2 && v1 == v2,
            _ => false,
        }
    }
}

impl PartialEq for ErrorHandler {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Display for MonadicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonadicValue::Pure(value) => write!(f, "Pure({value})"),
            MonadicValue::IO(_) => write!(f, "IO(<computation>)"),
            MonadicValue::State(_) => write!(f, "State(<computation>)"),
            MonadicValue::Error(_) => write!(f, "Error(<computation>)"),
            MonadicValue::Combined(comp) => {
                write!(f, "Combined({:?}, <computation>)", comp.effects)
            }
        }
    }
}

impl fmt::Display for IOAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IOAction::Read(_) => write!(f, "Read"),
            IOAction::Write(_, value) => write!(f, "Write({value})"),
            IOAction::Print(value) => write!(f, "Print({value})"),
            IOAction::Newline => write!(f, "Newline"),
            IOAction::Return(value) => write!(f, "Return({value})"),
            IOAction::Custom(name, _) => write!(f, "Custom({name})"),
            _ => write!(f, "<IO action>"),
        }
    }
}

impl fmt::Display for StateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateAction::Get => write!(f, "Get"),
            StateAction::Put(_) => write!(f, "Put"),
            StateAction::GetVar(name) => write!(f, "GetVar({name})"),
            StateAction::SetVar(name, value) => write!(f, "SetVar({name}, {value})"),
            StateAction::DefineVar(name, value) => write!(f, "DefineVar({name}, {value})"),
            StateAction::Return(value) => write!(f, "Return({value})"),
            StateAction::Custom(name, _) => write!(f, "Custom({name})"),
            _ => write!(f, "<State action>"),
        }
    }
}

// Thread safety markers for monadic types
unsafe impl Send for MonadicValue {}
unsafe impl Sync for MonadicValue {}

unsafe impl Send for IOComputation {}
unsafe impl Sync for IOComputation {}

unsafe impl Send for StateComputation {}
unsafe impl Sync for StateComputation {}

unsafe impl Send for ErrorComputation {}
unsafe impl Sync for ErrorComputation {}

unsafe impl Send for CombinedComputation {}
unsafe impl Sync for CombinedComputation {}

unsafe impl Send for IOAction {}
unsafe impl Sync for IOAction {}

unsafe impl Send for IOSource {}
unsafe impl Sync for IOSource {}

unsafe impl Send for IOTarget {}
unsafe impl Sync for IOTarget {}

unsafe impl Send for StateAction {}
unsafe impl Sync for StateAction {}

unsafe impl Send for ErrorAction {}
unsafe impl Sync for ErrorAction {}

unsafe impl Send for ErrorHandler {}
unsafe impl Sync for ErrorHandler {}
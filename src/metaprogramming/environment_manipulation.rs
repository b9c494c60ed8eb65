//! Runtime environment manipulation and module management.
//!
//! This module provides facilities for dynamic environment manipulation,
//! module loading/unloading, garbage collection control, and memory monitoring.

use crate::eval::{Value, Environment};
use crate::module_system::{
 
    loader::ModuleLoader, 
    ModuleId, 
    cache::ModuleCache,
    Module
};
use crate::diagnostics::{Error, Result};
// use crate::utils::gc::GarbageCollector;  // Placeholder - would use actual GC
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};
use std::rc::Rc;
use std::time::{Duration, Instant, SystemTime};
use std::path::PathBuf;

/// Environment manipulation system.
#[derive(Debug)]
pub struct EnvironmentManipulator {
    /// Active environments being tracked
    environments: HashMap<String, EnvironmentHandle>,
    /// Environment hierarchy
    hierarchy: EnvironmentHierarchy,
    /// Environment snapshots for rollback
    snapshots: HashMap<String, EnvironmentSnapshot>,
    /// Change tracking
    change_tracker: ChangeTracker,
}

/// Handle to an environment with metadata.
#[derive(Debug, Clone)]
pub struct EnvironmentHandle {
    /// Environment reference
    pub environment: Rc<Environment>,
    /// Environment metadata
    pub metadata: EnvironmentMetadata,
    /// Creation time
    pub created_at: SystemTime,
    /// Last access time
    pub last_accessed: SystemTime,
}

/// Metadata about an environment.
#[derive(Debug, Clone)]
pub struct EnvironmentMetadata {
    /// Environment name/identifier
    pub name: String,
    /// Environment type
    pub env_type: EnvironmentType,
    /// Parent environment (if any)
    pub parent: Option<String>,
    /// Child environments
    pub children: Vec<String>,
    /// Tags for categorization
    pub tags: Vec<String>,
    /// Custom properties
    pub properties: HashMap<String, Value>,
}

/// Type of environment.
#[derive(Debug, Clone, PartialEq)]
pub enum EnvironmentType {
    /// Global/top-level environment
    Global,
    /// Module environment
    Module,
    /// Function/procedure environment
    Function,
    /// Local scope environment
    Local,
    /// Macro expansion environment
    Macro,
    /// Sandbox environment
    Sandbox,
    /// REPL environment
    Repl,
    /// Custom environment type
    Custom(String),
}

/// Environment hierarchy tracking.
#[derive(Debug)]
pub struct EnvironmentHierarchy {
    /// Root environments
    pub roots: Vec<String>,
    /// Parent-child relationships
    relationships: HashMap<String, Vec<String>>,
    /// Reverse lookup (child -> parent)
    parent_lookup: HashMap<String, String>,
}

/// Snapshot of an environment for rollback.
#[derive(Debug, Clone)]
pub struct EnvironmentSnapshot {
    /// Snapshot identifier
    pub id: String,
    /// Environment name
    pub environment_name: String,
    /// Bindings at snapshot time
    pub bindings: HashMap<String, Value>,
    /// Snapshot timestamp
    pub timestamp: SystemTime,
    /// Snapshot metadata
    pub metadata: HashMap<String, Value>,
}

/// Change tracking for environments.
#[derive(Debug)]
pub struct ChangeTracker {
    /// Changes by environment
    pub changes: HashMap<String, Vec<EnvironmentChange>>,
    /// Maximum changes to track per environment
    max_changes: usize,
}

/// A change to an environment.
#[derive(Debug, Clone)]
pub struct EnvironmentChange {
    /// Type of change
    pub change_type: ChangeType,
    /// Variable name affected
    pub variable: String,
    /// Old value (if any)
    pub old_value: Option<Value>,
    /// New value (if any)
    pub new_value: Option<Value>,
    /// Timestamp of change
    pub timestamp: SystemTime,
}

/// Type of environment change.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeType {
    /// Variable defined
    Define,
    /// Variable updated
    Update,
    /// Variable removed
    Remove,
    /// Environment created
    Create,
    /// Environment destroyed
    Destroy,
}

/// Module manager for dynamic module operations.
#[derive(Debug)]
pub struct ModuleManager {
    /// Module loader
    loader: ModuleLoader,
    /// Module cache
    cache: ModuleCache,
    /// Loaded modules
    loaded_modules: HashMap<ModuleId, LoadedModule>,
    /// Module dependencies
    dependencies: HashMap<ModuleId, Vec<ModuleId>>,
    /// Module loading hooks
    hooks: ModuleHooks,
}

/// Information about a loaded module.
#[derive(Debug, Clone)]
pub struct LoadedModule {
    /// Module information
    pub module: Module,
    /// Module environment
    pub environment: Rc<Environment>,
    /// Load time
    pub loaded_at: SystemTime,
    /// Load count (how many times loaded)
    pub load_count: usize,
    /// Dependencies
    pub dependencies: Vec<ModuleId>,
    /// Dependents (modules that depend on this one)
    pub dependents: Vec<ModuleId>,
}

/// Hooks for module loading/unloading.
pub struct ModuleHooks {
    /// Called before module loading
    pub pre_load: Vec<Box<dyn Fn(&ModuleId) -> Result<()>>>,
    /// Called after module loading
    pub post_load: Vec<Box<dyn Fn(&ModuleId, &LoadedModule) -> Result<()>>>,
    /// Called before module unloading
    pub pre_unload: Vec<Box<dyn Fn(&ModuleId) -> Result<()>>>,
    /// Called after module unloading
    pub post_unload: Vec<Box<dyn Fn(&ModuleId) -> Result<()>>>,
}

impl std::fmt::Debug for ModuleHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleHooks")
            .field("pre_load", &format!("{} hook(s)", self.pre_load.len()))
            .field("post_load", &format!("{} hook(s)", self.post_load.len()))
            .field("pre_unload", &format!("{} hook(s)", self.pre_unload.len()))
            .field("post_unload", &format!("{} hook(s)", self.post_unload.len()))
            .finish()
    }
}


/// Memory manager for garbage collection and monitoring.
#[derive(Debug)]
pub struct MemoryManager {
    /// Memory usage tracking
    usage_tracker: MemoryUsageTracker,
    /// GC policies
    gc_policies: HashMap<String, GcPolicy>,
    /// Memory pressure monitoring
    pressure_monitor: MemoryPressureMonitor,
}

/// Memory usage tracker.
#[derive(Debug)]
pub struct MemoryUsageTracker {
    /// Current memory usage
    current_usage: Arc<RwLock<usize>>,
    /// Peak memory usage
    pub peak_usage: usize,
    /// Usage history
    usage_history: VecDeque<MemoryUsagePoint>,
    /// Maximum history length
    max_history: usize,
}

/// Point in memory usage history.
#[derive(Debug, Clone)]
pub struct MemoryUsagePoint {
    /// Timestamp
    pub timestamp: Instant,
    /// Memory usage in bytes
    pub usage: usize,
    /// Number of allocations
    pub allocations: usize,
}

/// Garbage collection policy.
#[derive(Debug, Clone)]
pub struct GcPolicy {
    /// Policy name
    pub name: String,
    /// Trigger threshold (bytes)
    pub threshold: usize,
    /// Generation thresholds
    pub generation_thresholds: Vec<usize>,
    /// Collection frequency
    pub frequency: GcFrequency,
    /// Collection strategy
    pub strategy: GcStrategy,
}

/// Garbage collection frequency.
#[derive(Debug, Clone)]
pub enum GcFrequency {
    /// Manual collection only
    Manual,
    /// Periodic collection
    Periodic(Duration),
    /// Threshold-based collection
    Threshold(usize),
    /// Adaptive frequency
    Adaptive,
}

/// Garbage collection strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum GcStrategy {
    /// Mark and sweep
    MarkAndSweep,
    /// Generational collection
    Generational,
    /// Incremental collection
    Incremental,
    /// Concurrent collection
    Concurrent,
}

/// Memory pressure monitor.
#[derive(Debug)]
pub struct MemoryPressureMonitor {
    /// Current pressure level
    pressure_level: MemoryPressureLevel,
    /// Pressure history
    pressure_history: VecDeque<MemoryPressurePoint>,
    /// Warning thresholds
    warning_thresholds: HashMap<MemoryPressureLevel, usize>,
}

/// Memory pressure level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryPressureLevel {
    Low,
    Medium,
    High,
    Critical,
}

/// Point in memory pressure history.
#[derive(Debug, Clone)]
pub struct MemoryPressurePoint {
    /// Timestamp
    pub timestamp: Instant,
    /// Pressure level
    pub level: MemoryPressureLevel,
    /// Memory usage at this point
    pub usage: usize,
}

impl EnvironmentManipulator {
    /// Install primitives for environment manipulation.
    pub fn install_primitives(&self, _env: &Rc<Environment>) -> Result<()> {
        // Environment manipulation primitives would be installed here
        Ok(())
    }
    /// Creates a new environment manipulator.
    pub fn new() -> Self {
        Self {
            environments: HashMap::new(),
            hierarchy: EnvironmentHierarchy::new(),
            snapshots: HashMap::new(),
            change_tracker: ChangeTracker::new(1000),
        }
    }

    /// Registers an environment for tracking.
    pub fn register_environment(
        &mut self,
        name: String,
        environment: Rc<Environment>,
        env_type: EnvironmentType,
    ) -> Result<()> {
        let metadata = EnvironmentMetadata {
            name: name.clone()),
            env_type,
            parent: None,
            children: Vec::new(),
            tags: Vec::new(),
            properties: HashMap::new(),
        };

        let handle = EnvironmentHandle {
            environment,
            metadata,
            created_at: SystemTime::now(),
            last_accessed: SystemTime::now(),
        };

        self.environments.insert(name.clone()), handle);
        self.hierarchy.add_root(name.clone());

        // Track creation change
        self.change_tracker.track_change(name, EnvironmentChange {
            change_type: ChangeType::Create,
            variable: "".to_string(),
            old_value: None,
            new_value: None,
            timestamp: SystemTime::now(),
        });

        Ok(())
    }

    /// Creates a child environment.
    pub fn create_child_environment(
        &mut self,
        parent_name: &str,
        child_name: String,
        env_type: EnvironmentType,
    ) -> Result<Rc<Environment>> {
        let parent_env = self.get_environment(parent_name)?;
        let child_env = Rc::new(Environment::new(Some(parent_env.clone()), 0));

        let metadata = EnvironmentMetadata {
            name: child_name.clone()),
            env_type,
            parent: Some(parent_name.to_string()),
            children: Vec::new(),
            tags: Vec::new(),
            properties: HashMap::new(),
        };

        // Update parent's children list
        if let Some(parent_handle) = self.environments.get_mut(parent_name) {
            parent_handle.metadata.children.push(child_name.clone());
        }

        let handle = EnvironmentHandle {
            environment: child_env.clone()),
            metadata,
            created_at: SystemTime::now(),
            last_accessed: SystemTime::now(),
        };

        self.environments.insert(child_name.clone()), handle);
        self.hierarchy.add_child(parent_name.to_string(), child_name.clone());

        Ok(child_env)
    }

    /// Gets an environment by name.
    pub fn get_environment(&mut self, name: &str) -> Result<Rc<Environment>> {
        let handle = self.environments.get_mut(name)
            .ok_or_else(|| Error::runtime_error(
                format!("Environment '{}' not found", name),
                None,
            ))?;

        handle.last_accessed = SystemTime::now();
        Ok(handle.environment.clone())
    }

    /// Gets environment metadata.
    pub fn get_metadata(&self, name: &str) -> Option<&EnvironmentMetadata> {
        self.environments.get(name).map(|h| &h.metadata)
    }

    /// Creates a snapshot of an environment.
    pub fn create_snapshot(&mut self, env_name: &str, snapshot_id: String) -> Result<()> {
        let env = self.get_environment(env_name)?;
        let bindings = env.get_all_bindings();

        let snapshot = EnvironmentSnapshot {
            id: snapshot_id.clone()),
            environment_name: env_name.to_string(),
            bindings,
            timestamp: SystemTime::now(),
            metadata: HashMap::new(),
        };

        self.snapshots.insert(snapshot_id, snapshot);
        Ok(())
    }

    /// Restores an environment from a snapshot.
    pub fn restore_from_snapshot(&mut self, snapshot_id: &str) -> Result<()> {
        let snapshot = self.snapshots.get(snapshot_id)
            .ok_or_else(|| Error::runtime_error(
                format!("Snapshot '{}' not found", snapshot_id),
                None,
            ))?
            .clone());

        let env = self.get_environment(&snapshot.environment_name)?;

        // Clear current bindings and restore snapshot bindings
        env.clear_all_bindings();
        for (name, value) in snapshot.bindings {
            env.define(name, value);
        }

        Ok(())
    }

    /// Gets all changes for an environment.
    pub fn get_changes(&self, env_name: &str) -> Vec<&EnvironmentChange> {
        self.change_tracker.changes.get(env_name)
            .map(|changes| changes.iter().collect())
            .unwrap_or_default()
    }

    /// Removes an environment.
    pub fn remove_environment(&mut self, name: &str) -> Result<()> {
        if let Some(_handle) = self.environments.remove(name) {
            // Remove from hierarchy
            self.hierarchy.remove_node(name);

            // Track destruction change
            self.change_tracker.track_change(name.to_string(), EnvironmentChange {
                change_type: ChangeType::Destroy,
                variable: "".to_string(),
                old_value: None,
                new_value: None,
                timestamp: SystemTime::now(),
            });

            Ok(())
        } else {
            Err(Box::new(Error::runtime_error(
                format!("Environment '{}' not found", name),
                None,
            ))
        }
    }
}

impl ModuleManager {
    /// Creates a new module manager.
    pub fn new() -> Result<Self> {
        Ok(Self {
            loader: ModuleLoader::new()?,
            cache: ModuleCache::new(),
            loaded_modules: HashMap::new(),
            dependencies: HashMap::new(),
            hooks: ModuleHooks::new(),
        })
    }

    /// Loads a module dynamically.
    pub fn load_module(&mut self, module_id: ModuleId, path: Option<PathBuf>) -> Result<Rc<Environment>> {
        // Call pre-load hooks
        for hook in &self.hooks.pre_load {
            hook(&module_id)?;
        }

        // Check if already loaded
        if let Some(loaded) = self.loaded_modules.get_mut(&module_id) {
            loaded.load_count += 1;
            return Ok(loaded.environment.clone());
        }

        // Load module definition
        // If a path is provided, we might need to create a file-based module ID
        let effective_module_id = if let Some(_path) = path {
            // For now, just use the provided module_id
            // In a real implementation, you might create a File namespace module
            module_id.clone())
        } else {
            module_id.clone())
        };
        
        let module = self.loader.load(&effective_module_id)?;

        // Create module environment
        let module_env = Rc::new(Environment::new(None, 0));

        // Install module exports
        for (_name, _value) in &module.exports {
            // Implementation would install exported bindings
            // module_env.define(name.clone()), value.clone());
        }

        let loaded_module = LoadedModule {
            module,
            environment: module_env.clone()),
            loaded_at: SystemTime::now(),
            load_count: 1,
            dependencies: Vec::new(),
            dependents: Vec::new(),
        };

        // Call post-load hooks
        for hook in &self.hooks.post_load {
            hook(&module_id, &loaded_module)?;
        }

        self.loaded_modules.insert(module_id, loaded_module);
        Ok(module_env)
    }

    /// Unloads a module.
    pub fn unload_module(&mut self, module_id: &ModuleId) -> Result<()> {
        if let Some(loaded) = self.loaded_modules.get_mut(module_id) {
            loaded.load_count = loaded.load_count.saturating_sub(1);
            
            if loaded.load_count == 0 {
                // Call pre-unload hooks
                for hook in &self.hooks.pre_unload {
                    hook(module_id)?;
                }

                self.loaded_modules.remove(module_id);

                // Call post-unload hooks
                for hook in &self.hooks.post_unload {
                    hook(module_id)?;
                }
            }
        }

        Ok(())
    }

    /// Gets a loaded module.
    pub fn get_module(&self, module_id: &ModuleId) -> Option<&LoadedModule> {
        self.loaded_modules.get(module_id)
    }

    /// Lists all loaded modules.
    pub fn loaded_modules(&self) -> Vec<&ModuleId> {
        self.loaded_modules.keys().collect()
    }
}

impl MemoryManager {
    /// Creates a new memory manager.
    pub fn new() -> Self {
        Self {
            usage_tracker: MemoryUsageTracker::new(),
            gc_policies: HashMap::new(),
            pressure_monitor: MemoryPressureMonitor::new(),
        }
    }

    /// Triggers garbage collection.
    pub fn collect_garbage(&self) -> Result<usize> {
        // Placeholder implementation - would integrate with actual GC
        let collected = 1024; // Mock collected bytes
        
        // Update usage tracking would go here
        // self.usage_tracker.record_collection(collected);
        
        Ok(collected)
    }

    /// Gets current memory usage.
    pub fn current_usage(&self) -> usize {
        *self.usage_tracker.current_usage.read().unwrap()
    }

    /// Gets memory statistics.
    pub fn get_memory_stats(&self) -> MemoryStats {
        MemoryStats {
            current_usage: self.current_usage(),
            peak_usage: self.usage_tracker.peak_usage,
            pressure_level: self.pressure_monitor.pressure_level.clone()),
            gc_runs: self.usage_tracker.usage_history.len(),
        }
    }

    /// Sets a garbage collection policy.
    pub fn set_gc_policy(&mut self, name: String, policy: GcPolicy) {
        self.gc_policies.insert(name, policy);
    }

    /// Forces immediate garbage collection.
    pub fn force_gc(&self) -> Result<usize> {
        self.collect_garbage()
    }

    /// Gets memory pressure level.
    pub fn memory_pressure(&self) -> MemoryPressureLevel {
        self.pressure_monitor.pressure_level.clone())
    }
}

/// Memory statistics.
#[derive(Debug, Clone)]
pub struct MemoryStats {
    /// Current memory usage
    pub current_usage: usize,
    /// Peak memory usage
    pub peak_usage: usize,
    /// Current memory pressure level
    pub pressure_level: MemoryPressureLevel,
    /// Number of GC runs
    pub gc_runs: usize,
}

// Implementation of helper types and methods
impl EnvironmentHierarchy {
    pub fn new() -> Self {
        Self {
            roots: Vec::new(),
            relationships: HashMap::new(),
            parent_lookup: HashMap::new(),
        }
    }

    pub fn add_root(&mut self, name: String) {
        self.roots.push(name);
    }

    pub fn add_child(&mut self, parent: String, child: String) {
        self.relationships.entry(parent.clone()).or_insert_with(Vec::new).push(child.clone());
        self.parent_lookup.insert(child, parent);
    }

    fn remove_node(&mut self, name: &str) {
        self.roots.retain(|n| n != name);
        if let Some(children) = self.relationships.remove(name) {
            for child in children {
                self.parent_lookup.remove(&child);
            }
        }
        if let Some(parent) = self.parent_lookup.remove(name) {
            if let Some(siblings) = self.relationships.get_mut(&parent) {
                siblings.retain(|s| s != name);
            }
        }
    }
}

impl ChangeTracker {
    pub fn new(max_changes: usize) -> Self {
        Self {
            changes: HashMap::new(),
            max_changes,
        }
    }

    pub fn track_change(&mut self, env_name: String, change: EnvironmentChange) {
        let changes = self.changes.entry(env_name).or_insert_with(Vec::new);
        
        if changes.len() >= self.max_changes {
            changes.remove(0);
        }
        
        changes.push(change);
    }
}

impl ModuleHooks {
    pub fn new() -> Self {
        Self {
            pre_load: Vec::new(),
            post_load: Vec::new(),
            pre_unload: Vec::new(),
            post_unload: Vec::new(),
        }
    }
}

impl MemoryUsageTracker {
    pub fn new() -> Self {
        Self {
            current_usage: Arc::new(RwLock::new(0)),
            peak_usage: 0,
            usage_history: VecDeque::new(),
            max_history: 1000,
        }
    }

    fn record_collection(&mut self, _collected: usize) {
        let current = *self.current_usage.read().unwrap();
        if current > self.peak_usage {
            self.peak_usage = current;
        }

        let point = MemoryUsagePoint {
            timestamp: Instant::now(),
            usage: current,
            allocations: 0, // Would track actual allocations
        };

        if self.usage_history.len() >= self.max_history {
            self.usage_history.pop_front();
        }
        self.usage_history.push_back(point);
    }
}

impl MemoryPressureMonitor {
    pub fn new() -> Self {
        let mut warning_thresholds = HashMap::new();
        warning_thresholds.insert(MemoryPressureLevel::Medium, 1024 * 1024 * 100); // 100MB
        warning_thresholds.insert(MemoryPressureLevel::High, 1024 * 1024 * 500);   // 500MB
        warning_thresholds.insert(MemoryPressureLevel::Critical, 1024 * 1024 * 1000); // 1GB

        Self {
            pressure_level: MemoryPressureLevel::Low,
            pressure_history: VecDeque::new(),
            warning_thresholds,
        }
    }
}

// Extension trait for Environment to add manipulation methods
pub trait EnvironmentExt {
    fn clear_all_bindings(&self);
    fn get_all_bindings(&self) -> HashMap<String, Value>;
}

impl EnvironmentExt for Environment {
    fn clear_all_bindings(&self) {
        // Implementation would clear all bindings in the environment
        // This is a placeholder
    }

    fn get_all_bindings(&self) -> HashMap<String, Value> {
        // Implementation would return all current bindings
        // This is a placeholder
        HashMap::new()
    }
}

// Default implementations
impl Default for EnvironmentManipulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for ModuleManager {
    fn default() -> Self {
        Self::new().expect("Failed to create default ModuleManager")
    }
}

impl Default for MemoryManager {
    fn default() -> Self {
        Self::new()
    }
}
//! JIT runtime integration and coordination
//!
//! This module provides the main runtime integration for the JIT system,
//! coordinating between different components and providing a unified interface.

use crate::diagnostics::Result;

/// JIT runtime configuration placeholder
#[derive(Debug, Clone, Default)]
pub struct JitConfig {
    pub enabled: bool,
}

/// JIT runtime statistics placeholder  
#[derive(Debug, Clone, Default)]
pub struct JitStats {
    pub compilations: u64,
}

/// Main JIT runtime coordination struct
pub struct JitRuntime {
    config: JitConfig,
    stats: JitStats,
}

impl JitRuntime {
    pub fn new(config: JitConfig) -> Result<Self> {
        Ok(Self {
            config,
            stats: JitStats::default(),
        })
    }
    
    pub fn stats(&self) -> &JitStats {
        &self.stats
    }
}
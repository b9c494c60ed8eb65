//! Stub implementation for SIMD optimization when target architecture doesn't support x86 SIMD
//!
//! This provides fallback implementations for non-x86 architectures.

use crate::diagnostics::{Error, Result};
use crate::eval::value::Value;

/// Stub SIMD operation types for compatibility
#[derive(Debug, Clone, PartialEq)]
pub enum SimdOperationType {
    /// Dense uniform data operations
    DenseUniform,
    /// Sparse data operations
    Sparse,
    /// Mixed data type operations
    MixedTypes,
    /// Streaming data operations
    Streaming,
    /// Small data operations
    Small,
}

/// Stub CPU features for compatibility
#[derive(Debug, Clone)]
pub struct CpuFeatures {
    /// AVX-512 Foundation support
    pub avx512f: bool,
    /// AVX2 support
    pub avx2: bool,
    /// SSE2 support
    pub sse2: bool,
    /// Fused multiply-add support
    pub fma: bool,
    /// ARM NEON support
    pub neon: bool,
}

/// Stub aligned buffer for compatibility
#[derive(Debug)]
pub struct AlignedBuffer<T> {
    /// Internal data storage
    data: Vec<T>,
}

impl<T> AlignedBuffer<T> {
    /// Creates a new aligned buffer with the specified capacity
    pub fn new(capacity: usize, _alignment: usize) -> Result<Self> {
        Ok(AlignedBuffer {
            data: Vec::with_capacity(capacity),
        })
    }

    /// Returns the buffer data as a slice
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns the buffer data as a mutable slice
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Resizes the buffer to the specified length
    pub fn resize(&mut self, new_len: usize) -> Result<()>
    where
        T: Default + Clone,
    {
        self.data.resize(new_len, T::default());
        Ok(())
    }

    /// Extends the buffer by copying from a source slice
    pub fn extend_from_slice(&mut self, source: &[T]) -> Result<()>
    where
        T: Copy,
    {
        self.data.extend_from_slice(source);
        Ok(())
    }
}

unsafe impl<T: Send> Send for AlignedBuffer<T> {}
unsafe impl<T: Sync> Sync for AlignedBuffer<T> {}

/// Stub SIMD numeric operations - all operations fall back to scalar
pub struct SimdNumericOps {
    cpu_features: CpuFeatures,
}

impl SimdNumericOps {
    /// Creates a new SIMD numeric operations instance
    pub fn new() -> Self {
        SimdNumericOps {
            cpu_features: CpuFeatures {
                avx512f: false,
                avx2: false,
                sse2: false,
                fma: false,
                neon: cfg!(target_arch = "aarch64"),
            },
        }
    }
    
    /// Creates a new SIMD numeric operations instance with default settings
    pub fn with_default() -> Self {
        Self::new()
    }

    /// Analyzes the data to determine the best SIMD operation type
    pub fn analyze_operation_type(&self, data: &[f64]) -> SimdOperationType {
        if data.len() < 8 {
            SimdOperationType::Small
        } else {
            SimdOperationType::DenseUniform
        }
    }

    /// Adds two f64 arrays element-wise (stub implementation)
    pub fn add_f64_arrays(&mut self, a: &[f64], b: &[f64], result: &mut [f64]) -> Result<()> {
        if a.len() != b.len() || a.len() != result.len() {
            return Err(Box::new(Error::runtime_error(
                "Array length mismatch".to_string(),
                None,
            )));
        }

        for i in 0..a.len() {
            result[i] = a[i] + b[i];
        }
        Ok(())
    }

    /// Multiplies two f64 arrays element-wise (stub implementation)
    pub fn multiply_f64_arrays(&mut self, a: &[f64], b: &[f64], result: &mut [f64]) -> Result<()> {
        if a.len() != b.len() || a.len() != result.len() {
            return Err(Box::new(Error::runtime_error(
                "Array length mismatch".to_string(),
                None,
            )));
        }

        for i in 0..a.len() {
            result[i] = a[i] * b[i];
        }
        Ok(())
    }

    /// Computes dot product of two f64 arrays (stub implementation)
    pub fn dot_product_f64(&mut self, a: &[f64], b: &[f64]) -> Result<f64> {
        if a.len() != b.len() {
            return Err(Box::new(Error::runtime_error(
                "Array length mismatch".to_string(),
                None,
            )));
        }

        let result = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        Ok(result)
    }

    /// Attempts to optimize a Scheme numeric operation (stub implementation)
    pub fn optimize_scheme_numeric_operation(&mut self, _op: &str, _args: &[Value]) -> Result<Option<Value>> {
        Ok(None) // No optimization available
    }

    /// Returns performance statistics (stub implementation)
    pub fn get_performance_stats(&self) -> &() {
        &()
    }

    /// Resets performance statistics (stub implementation)
    pub fn reset_performance_stats(&mut self) {
        // No-op
    }
    
    /// Optimized addition of two numeric arrays (stub implementation)
    pub fn add_numeric_arrays_optimized(&mut self, a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
        if a.len() != b.len() {
            return Err(Box::new(Error::runtime_error(
                "Array length mismatch".to_string(),
                None,
            )));
        }
        let result: Vec<f64> = a.iter().zip(b.iter()).map(|(x, y)| x + y).collect();
        Ok(result)
    }
    
    #[cfg(feature = "simd-benchmarks")]
    /// Benchmarks SIMD performance (stub implementation for non-SIMD architectures)
    pub fn benchmark_simd_performance(&mut self, size: usize) -> crate::numeric::simd_benchmarks::SimdBenchmarkResults {
        // Simple stub implementation
        crate::numeric::simd_benchmarks::SimdBenchmarkResults {
            operation: "benchmark".to_string(),
            array_size: size,
            simd_time_ns: 1000,
            scalar_time_ns: 1000,
            speedup: 1.0,
            bandwidth_utilization: 0.5,
        }
    }
}

impl Default for SimdNumericOps {
    fn default() -> Self {
        Self::new()
    }
}
use crate::{Result, Value};
use std::fmt::Display;

/// A parameterized, backend-prepared statement handle.
///
/// # Binding Semantics
/// * `bind` appends a value (positions are counted from 0).
/// * `bind_index` sets the parameter at `index`.
///
/// Methods return `&mut Self` for fluent chaining:
/// ```rust,ignore
/// prepared.bind(42)?.bind("hello")?;
/// ```
pub trait Prepared: Send + Sync + Display {
    /// Remove all the previously bound values.
    fn clear_bindings(&mut self) -> Result<&mut Self>;
    /// Append a parameter value.
    fn bind(&mut self, value: impl Into<Value>) -> Result<&mut Self>;
    /// Bind a value at a specific index.
    fn bind_index(&mut self, value: impl Into<Value>, index: u64) -> Result<&mut Self>;
    /// Number of placeholders reported by the server.
    fn param_count(&self) -> usize;
}

//! Built-in operator implementations.
//!
//! These are the operators that ship with opchain and are available to
//! pipeline configs through [`OperatorRegistry::with_builtins`].

mod blur;
mod color;
mod threshold;
mod transform;

use crate::filters::registry::OperatorRegistry;

/// Register all built-in operators.
pub fn register_all(registry: &mut OperatorRegistry) {
    color::register(registry);
    threshold::register(registry);
    transform::register(registry);
    blur::register(registry);
}

// Re-export for direct access
pub use blur::{BoxBlur, BoxBlurPredicate};
pub use color::{Grayscale, Invert};
pub use threshold::Threshold;
pub use transform::Resize;

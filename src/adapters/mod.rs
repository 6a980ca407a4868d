// Adapters layer: concrete readers and writers for external formats.

pub mod export;
pub mod source;

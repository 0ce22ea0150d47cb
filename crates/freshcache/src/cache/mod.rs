//! Memoized derived values.

mod derived;

pub use derived::DerivedCache;

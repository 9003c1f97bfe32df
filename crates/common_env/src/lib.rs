//! Typed, default-aware reads over the process environment.
//!
//! ```rust
//! use common_env::{Environment, EnvironmentAccessor, MapEnv, Number};
//!
//! let env = EnvironmentAccessor::new(
//!     MapEnv::new()
//!         .with("CACHE_ENABLED", " TrUe")
//!         .with("CACHE_CAPACITY", "3000"),
//! );
//! assert!(env.supports("CACHE_ENABLED"));
//! assert_eq!(env.get_number_or("CACHE_CAPACITY", Number::from(500)), Number::Integer(3000));
//! assert_eq!(env.get_property_or("CACHE_DIR", "./cache"), "./cache");
//! ```
pub mod accessor;
pub mod keys;
pub mod number;
pub mod source;

pub use accessor::{system, Environment, EnvironmentAccessor};
pub use keys::Keys;
pub use number::{Number, NumberFormat};
pub use source::{EnvSource, MapEnv, ProcessEnv};

//! Path-addressed configuration for Rust applications. Declare a struct,
//! load the sources, and populate it.
//!
//! Pathfig gathers configuration from three sources: command-line flags,
//! environment variables, and config files found from the working directory
//! up to the filesystem root. Every source is normalized into the same flat
//! model, a map from dotted paths to lists of values, and a typed struct is
//! filled from that model field by field.
//!
//! ```ignore
//! use pathfig::{Loader, Populate};
//!
//! #[derive(Populate, Default)]
//! struct AppConfig {
//!     database: Database,
//!     #[config(name = "port")]
//!     listen_port: u16,
//!     channels: Vec<Channel>,
//! }
//!
//! let loader = Loader::load("my-app")?;
//! let mut config = AppConfig { listen_port: 8080, ..Default::default() };
//! loader.get_all(&mut config)?;
//! ```
//!
//! That call reads `--database--connection-uri=...` style flags,
//! `MYAPP__DATABASE__CONNECTION_URI` style variables, and every
//! `my-app.config.toml` between the working directory and `/`.
//!
//! # The path model
//!
//! A path is a sequence of segments joined by `.`, where a segment may carry
//! `[i]` index suffixes: `database.connection_uri`, `channels[0].name`. A
//! literal `.` inside a key is escaped as `\.` so it stays one segment.
//!
//! Each path maps to a **list** of values. Most paths hold one value; a flag
//! passed several times (`--tag a --tag b`) or a scalar array in a file holds
//! several, and fills a `Vec` field element by element.
//!
//! | Source | Spelling | Path |
//! |--------|----------|------|
//! | Flag | `--database--pool-size=5` | `database.pool_size` |
//! | Flag | `-v=1`, `--name value` | `v`, `name` |
//! | Env | `MYAPP__DATABASE__POOL_SIZE=5` | `database.pool_size` |
//! | File | `[database]` `pool-size = 5` | `database.poolSize` |
//! | File | `[[channels]]` `name = "a"` | `channels[0].name` |
//!
//! File keys become camelCase segments while flags and variables stay
//! snake_case. A multi-word field read from files needs a camelCase
//! `name`, or the builder's `key_style(KeyStyle::Snake)` to align all three.
//!
//! # Precedence
//!
//! ```text
//! Values already in the target      (defaults)
//!        ↑ overridden by
//! Config files                      farthest directory lowest
//!        ↑ overridden by
//! Environment variables             PREFIX__KEY
//!        ↑ overridden by
//! Flags                             --key=value
//! ```
//!
//! Lookups never merge sources: the first source that has a path answers for
//! it, and the first source that has indexed elements of a list decides the
//! list's length. Leaves with no value anywhere keep what the target already
//! held.
//!
//! # Environment-specific files
//!
//! When `config_environment` is set by flag or variable
//! (`--config-environment=test`), files are looked up as
//! `my-app.test.config.toml` instead of `my-app.config.toml`.
//!
//! # Coercion
//!
//! Sources are untyped: flags and variables are strings, files carry their
//! own scalar types. Each leaf coerces the value it resolves to its own type
//! (`"42"` into a `u16`, `1` into a `bool`, `2.5` into a `String`). A value
//! that cannot be coerced leaves the field untouched rather than failing.
//!
//! # Targets
//!
//! Anything implementing [`Populate`] can be filled. `#[derive(Populate)]`
//! covers structs; built-in implementations cover strings, paths, numbers,
//! booleans, `Vec`, `Option`, and `Box`. Maps are rejected with
//! [`PathfigError::UnsupportedTarget`].
//!
//! Field attributes:
//!
//! - `#[config(name = "segment")]` replaces the derived path segment
//!   (by default `ConnectionUri` and `connection_uri` both map to
//!   `connection_uri`).
//! - `#[config(flatten)]` addresses the field's own fields at the parent's
//!   path.
//! - `#[config(skip)]` leaves the field alone.

pub mod error;
pub mod path;
pub mod types;

mod builder;
mod coerce;
mod env;
mod file;
mod flags;
mod flatten;
mod loader;
mod populate;
mod resolve;
mod target;
mod value;

#[cfg(test)]
mod fixtures;

pub use builder::{Pathfig, PathfigBuilder};
pub use coerce::{Scalar, ScalarKind, coerce};
pub use env::env_to_values;
pub use error::PathfigError;
pub use file::ConfigFile;
pub use flags::flags_to_values;
pub use flatten::{FlattenError, flatten};
pub use loader::Loader;
pub use target::{Field, Fields, Optional, Populate, ScalarSlot, Sequence, Shape};
pub use types::{FileFormat, KeyStyle};
pub use value::{FlatValues, Value};

#[cfg(feature = "derive")]
pub use pathfig_derive::Populate;

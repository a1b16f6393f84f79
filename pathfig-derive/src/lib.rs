//! Derive macro for pathfig configuration targets.
//!
//! `#[derive(Populate)]` implements `pathfig::Populate` and `pathfig::Fields`
//! for a struct with named fields, so the struct can be filled in place by
//! `Loader::get` / `Loader::get_all`.
//!
//! # Basic Usage
//!
//! ```ignore
//! use pathfig::Populate;
//!
//! #[derive(Populate, Default)]
//! struct ServerConfig {
//!     host: String,
//!     port: u16,
//!
//!     #[config(name = "db")]
//!     database: DatabaseConfig,
//! }
//! ```
//!
//! # Field Attributes
//!
//! - `name = "tag"` - Path segment for this field instead of the field name
//! - `flatten` - Resolve the field's own fields at the enclosing path
//! - `skip` - Never touch this field
//!
//! A field marked `flatten` that also carries a `name` nests under that name
//! like any other field.

extern crate proc_macro;

mod codegen;
mod parse;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derive `pathfig::Populate` for a struct with named fields.
///
/// Every non-skipped field must itself implement `pathfig::Populate`.
///
/// # Example
///
/// ```ignore
/// use pathfig::Populate;
///
/// #[derive(Populate, Default)]
/// struct Common {
///     verbose: bool,
/// }
///
/// #[derive(Populate, Default)]
/// struct AppConfig {
///     #[config(flatten)]
///     common: Common,
///
///     #[config(name = "listen_port")]
///     port: u16,
///
///     #[config(skip)]
///     cache: Vec<u8>,
/// }
/// ```
#[proc_macro_derive(Populate, attributes(config))]
pub fn derive_populate(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match codegen::derive_populate(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

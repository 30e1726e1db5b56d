//! Configuration resolution for the capture tool.
//!
//! Values come from three places, highest precedence first:
//!
//! 1. Command-line flags (`--api-rest-url`)
//! 2. `VULNMAP_IAC_CAPTURE_*` environment variables (`VULNMAP_IAC_CAPTURE_API_REST_URL`)
//! 3. Schema defaults
//!
//! plus the unprefixed `NODE_EXTRA_CA_CERTS`, read directly.
//!
//! - [`schema`] declares the options
//! - [`normalize`] maps hyphenated flag names onto underscored keys
//! - [`env`] binds options to environment variables
//! - [`resolver`] applies the precedence rules

pub mod env;
pub mod normalize;
pub mod resolver;
pub mod schema;

pub use env::{
    Bindings, ENV_PREFIX, EnvSource, MapEnv, NODE_EXTRA_CA_CERTS_ENV, ProcessEnv, bind_schema,
};
pub use normalize::env_var_name;
pub use resolver::{Resolved, ResolvedConfig, ValueSource, resolve};
pub use schema::{OptionDef, OptionKind, OptionValue, Schema, capture_schema};

pub mod errors;
pub mod context;
pub mod fields;
pub mod form;       // UI-layer binding seam
pub mod initializer;
pub mod config;
pub mod ini;
pub mod script;
pub mod submit;
pub mod storage;
pub mod web;

pub use config::SensorConfig;
pub use context::{Context, MissingFieldPolicy};
pub use errors::{ConfigError, Result};
pub use fields::{FieldDefault, FieldValue, DEFAULT_FIELDS};
pub use form::{Document, Element, Form};
pub use initializer::{apply_fields, initialize_form, initialize_form_with, BindReport};
pub use storage::ConfigStore;

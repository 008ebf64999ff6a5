//! Composite ID layouts
//!
//! Each resource type that is imported by ID declares which attributes make
//! up that ID and in what order. Layouts are loaded from JSON files at compile
//! time, so new resource types can be described without code changes.
//!
//! A layout may mark its last part as variadic; it then soaks up every
//! remaining value (Glue partition values, for one).
//!
//! # Layout Definitions
//!
//! Layouts are defined in JSON files under `src/layouts/`:
//! - `glue.json` - Glue Data Catalog resources
//! - `iot.json` - IoT Core resources
//! - `resiliencehub.json` - Resilience Hub resources

mod registry;

pub use registry::*;

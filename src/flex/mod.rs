//! Flex helpers shared by resource handlers
//!
//! Resource handlers receive their configuration from the host as loosely
//! typed attribute values and talk to cloud APIs in native types. This module
//! holds the conversions between the two, along with the utilities every
//! handler needs during a reconciliation pass.
//!
//! # Module Structure
//!
//! - [`id`] - Composite resource IDs built from several attributes
//! - [`diff`] - Add/remove/unchanged partitions of key/value maps
//! - [`expand`] - Attribute value expansion and flattening
//! - [`convert`] - Scalar string conversions
//!
//! # Example
//!
//! ```
//! use provflex::flex::{expand_resource_id, flatten_resource_id};
//!
//! let id = flatten_resource_id(&["123456789012", "sales", "orders"], 3, false).unwrap();
//! assert_eq!(id, "123456789012,sales,orders");
//! assert_eq!(expand_resource_id(&id, 3, false).unwrap()[2], "orders");
//! ```

pub mod convert;
pub mod diff;
pub mod expand;
pub mod id;

pub use diff::{diff_maps, diff_string_maps, difference, MapDelta};
pub use id::{expand_resource_id, flatten_resource_id, resource_id_part_count, RESOURCE_ID_SEPARATOR};

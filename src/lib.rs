//! # fdm-material
//!
//! A pure Rust implementation of the FDM material profile XML format.
//!
//! A *material profile* describes one physical filament. One XML document per
//! material expands into a whole family of in-memory profiles sharing a GUID:
//! the base profile carrying the global settings, plus one specialization per
//! declared machine and per declared hotend (nozzle), each holding only its
//! setting deltas against the scope above it. Serialization is the reverse
//! reduction of the family back into one document, with inherited duplicates
//! suppressed.
//!
//! ## Features
//!
//! - Pure Rust implementation with no unsafe code
//! - Round-trip parsing and writing of the material XML dialect
//! - Layered global → machine → hotend settings resolution
//! - GUID-family propagation of metadata, display name and read-only state
//! - Graceful degradation: unknown machines, variants and setting keys are
//!   logged through the `log` facade and skipped, never fatal
//!
//! ## Example
//!
//! ```
//! use fdm_material::{MachineDefinition, MaterialProfile, MaterialRegistry};
//!
//! # fn main() -> fdm_material::Result<()> {
//! let mut registry = MaterialRegistry::new();
//! registry.add_definition(MachineDefinition::new("fdmprinter", ""));
//!
//! registry.add_profile(MaterialProfile::new("generic_pla"));
//! let xml = r#"<fdmmaterial xmlns="http://www.ultimaker.com/material">
//!   <metadata>
//!     <name><brand>Generic</brand><material>PLA</material><color>White</color></name>
//!     <GUID>506798cd-9f05-47a9-a5ac-f73c4cf46007</GUID>
//!   </metadata>
//!   <properties><diameter>2.85</diameter></properties>
//!   <settings><setting key="print temperature">210</setting></settings>
//! </fdmmaterial>"#;
//! fdm_material::deserialize(&mut registry, "generic_pla", xml)?;
//!
//! let profile = registry.profile("generic_pla").unwrap();
//! assert_eq!(profile.name(), "PLA");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod mapping;
pub mod profile;
pub mod registry;
pub mod settings;
pub mod xmltree;

mod deserializer;
mod serializer;

pub use deserializer::deserialize;
pub use error::{Error, Result};
pub use profile::{
    DEFAULT_DENSITY, DEFAULT_DIAMETER, GENERIC_DEFINITION_ID, MaterialProfile,
};
pub use registry::{MachineDefinition, MaterialRegistry, VariantContainer};
pub use serializer::{MATERIAL_NAMESPACE, serialize};
pub use settings::ScopeChain;

//! Material profile data model
//!
//! A [`MaterialProfile`] is one member of a *family*: the set of profiles
//! sharing a GUID, representing the same physical material across machines
//! and nozzles. The root member targets the generic `fdmprinter` definition
//! and has no `base_file` back-reference; machine and hotend members carry
//! only the setting deltas against their parent scope.
//!
//! `GUID`, `base_file` and `variant` live inside the metadata map, exactly as
//! they travel through the XML dialect, and are surfaced through accessors.

use indexmap::IndexMap;

/// Definition id every base material profile targets
pub const GENERIC_DEFINITION_ID: &str = "fdmprinter";

/// Default filament diameter in mm when the document omits it
pub const DEFAULT_DIAMETER: f64 = 2.85;

/// Default material density in g/cm³ when the document omits it
pub const DEFAULT_DENSITY: f64 = 1.3;

/// One material profile: metadata, physical properties and own-scope settings
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialProfile {
    id: String,
    name: String,
    definition: String,
    /// Ordered metadata entries (brand, material, color_name, GUID, ...)
    pub metadata: IndexMap<String, String>,
    /// Physical property sub-map (diameter, density, ...), raw strings
    ///
    /// Static per-family data, never part of the settings inheritance chain;
    /// deserialization duplicates it identically onto every family member.
    pub properties: IndexMap<String, String>,
    /// Own-scope setting values keyed by internal setting key
    pub setting_values: IndexMap<String, String>,
    read_only: bool,
    dirty: bool,
}

impl MaterialProfile {
    /// Create an empty profile bound to the generic definition
    pub fn new(id: impl Into<String>) -> Self {
        MaterialProfile {
            id: id.into(),
            name: String::new(),
            definition: GENERIC_DEFINITION_ID.to_string(),
            metadata: IndexMap::new(),
            properties: IndexMap::new(),
            setting_values: IndexMap::new(),
            read_only: false,
            dirty: false,
        }
    }

    /// Unique profile id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name (mirrors the `material` metadata entry)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the display name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Machine definition id this profile's settings apply to
    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// Bind this profile to a machine definition
    pub fn set_definition(&mut self, definition_id: impl Into<String>) {
        self.definition = definition_id.into();
    }

    /// Family identifier shared by every specialization of this material
    pub fn guid(&self) -> Option<&str> {
        self.metadata.get("GUID").map(String::as_str)
    }

    /// Id of the family's root profile; absent on the root itself
    pub fn base_file(&self) -> Option<&str> {
        self.metadata.get("base_file").map(String::as_str)
    }

    /// Nozzle variant container id; present only on hotend profiles
    pub fn variant(&self) -> Option<&str> {
        self.metadata.get("variant").map(String::as_str)
    }

    /// Whether this profile is the root of its family
    ///
    /// Root means no `base_file` back-reference, or one that points at the
    /// profile itself.
    pub fn is_root(&self) -> bool {
        match self.base_file() {
            None => true,
            Some(base) => base == self.id,
        }
    }

    /// Whether mutation of metadata, properties and settings is blocked
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub(crate) fn set_read_only_flag(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Whether this profile changed since it was last (de)serialized
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    /// Filament diameter in mm, defaulting when the property is absent
    pub fn diameter(&self) -> f64 {
        self.properties
            .get("diameter")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_DIAMETER)
    }

    /// Material density in g/cm³, defaulting when the property is absent
    pub fn density(&self) -> f64 {
        self.properties
            .get("density")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_DENSITY)
    }

    /// Get a metadata entry
    pub fn metadata_entry(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Get an own-scope setting value
    pub fn setting_value(&self, key: &str) -> Option<&str> {
        self.setting_values.get(key).map(String::as_str)
    }
}

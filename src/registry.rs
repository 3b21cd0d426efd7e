//! Profile store, collaborator containers and GUID-family propagation
//!
//! The registry owns every [`MaterialProfile`] plus the two collaborator
//! container kinds the XML core needs to resolve references against: machine
//! definitions and nozzle variant containers. It doubles as the family lookup
//! service: all profiles sharing a GUID form one family, and the mutation
//! entry points here apply the family-wide side effects as they go rather
//! than as a separate pass.

use crate::error::{Error, Result};
use crate::profile::MaterialProfile;
use indexmap::IndexMap;
use uuid::Uuid;

/// A machine (printer) definition a profile can bind to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineDefinition {
    /// Internal definition id, e.g. `ultimaker2_plus`
    pub id: String,
    /// Manufacturer name emitted on `<machine_identifier>`
    pub manufacturer: String,
}

impl MachineDefinition {
    /// Create a definition
    pub fn new(id: impl Into<String>, manufacturer: impl Into<String>) -> Self {
        MachineDefinition {
            id: id.into(),
            manufacturer: manufacturer.into(),
        }
    }
}

/// A nozzle variant container referenced by hotend profiles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantContainer {
    /// Container id, e.g. `ultimaker2_plus_0.4`
    pub id: String,
    /// Display name written to the `<hotend id="...">` attribute
    pub name: String,
    /// Machine definition this variant belongs to
    pub definition: String,
}

impl VariantContainer {
    /// Create a variant container
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        definition: impl Into<String>,
    ) -> Self {
        VariantContainer {
            id: id.into(),
            name: name.into(),
            definition: definition.into(),
        }
    }
}

/// Store of material profiles, machine definitions and variant containers
#[derive(Debug, Default)]
pub struct MaterialRegistry {
    profiles: IndexMap<String, MaterialProfile>,
    definitions: IndexMap<String, MachineDefinition>,
    variants: IndexMap<String, VariantContainer>,
}

impl MaterialRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        MaterialRegistry::default()
    }

    /// Register a machine definition
    pub fn add_definition(&mut self, definition: MachineDefinition) {
        self.definitions.insert(definition.id.clone(), definition);
    }

    /// Register a nozzle variant container
    pub fn add_variant(&mut self, variant: VariantContainer) {
        self.variants.insert(variant.id.clone(), variant);
    }

    /// Register a profile, replacing any existing profile with the same id
    pub fn add_profile(&mut self, profile: MaterialProfile) {
        self.profiles.insert(profile.id().to_string(), profile);
    }

    /// Look up a profile by id
    pub fn profile(&self, id: &str) -> Option<&MaterialProfile> {
        self.profiles.get(id)
    }

    /// Look up a machine definition by id
    pub fn find_definition(&self, id: &str) -> Option<&MachineDefinition> {
        self.definitions.get(id)
    }

    /// Look up a variant container by id
    pub fn find_variant(&self, id: &str) -> Option<&VariantContainer> {
        self.variants.get(id)
    }

    /// Look up a variant container by display name, scoped to one machine
    pub fn find_variant_by_name(&self, definition_id: &str, name: &str) -> Option<&VariantContainer> {
        self.variants
            .values()
            .find(|v| v.definition == definition_id && v.name == name)
    }

    /// All members of the family sharing `guid`, in registration order
    pub fn find_by_guid(&self, guid: &str) -> Vec<&MaterialProfile> {
        self.profiles
            .values()
            .filter(|p| p.guid() == Some(guid))
            .collect()
    }

    /// Number of registered profiles
    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }

    /// Iterate over all registered profiles in registration order
    pub fn profiles(&self) -> impl Iterator<Item = &MaterialProfile> {
        self.profiles.values()
    }

    /// Ids of every profile sharing the GUID of `id`, including `id` itself
    fn family_ids(&self, id: &str) -> Vec<String> {
        let Some(guid) = self.profiles.get(id).and_then(|p| p.guid()) else {
            return vec![id.to_string()];
        };
        let guid = guid.to_string();
        self.profiles
            .values()
            .filter(|p| p.guid() == Some(guid.as_str()))
            .map(|p| p.id().to_string())
            .collect()
    }

    /// Set or clear the read-only flag on a profile and its whole family
    pub fn set_read_only(&mut self, id: &str, read_only: bool) -> Result<()> {
        if !self.profiles.contains_key(id) {
            return Err(Error::UnknownProfile(id.to_string()));
        }
        for member_id in self.family_ids(id) {
            if let Some(member) = self.profiles.get_mut(&member_id) {
                member.set_read_only_flag(read_only);
            }
        }
        Ok(())
    }

    /// Set a metadata entry, propagating the metadata map across the family
    ///
    /// Silently ignored when the profile is read-only. Setting the `material`
    /// key also updates the display name, on this profile and on every family
    /// member.
    pub fn set_metadata_entry(&mut self, id: &str, key: &str, value: &str) -> Result<()> {
        let profile = self
            .profiles
            .get_mut(id)
            .ok_or_else(|| Error::UnknownProfile(id.to_string()))?;
        if profile.is_read_only() {
            return Ok(());
        }

        profile.metadata.insert(key.to_string(), value.to_string());
        if key == "material" {
            profile.set_name(value);
        }
        let metadata = profile.metadata.clone();

        for member_id in self.family_ids(id) {
            if member_id == id {
                continue;
            }
            if let Some(member) = self.profiles.get_mut(&member_id) {
                member.metadata = metadata.clone();
                if key == "material" {
                    member.set_name(value);
                }
            }
        }
        Ok(())
    }

    /// Set an own-scope setting value, marking the whole family dirty
    ///
    /// Silently ignored when the profile is read-only. Only this profile's
    /// scope is mutated; dirtiness is family-wide so the next save
    /// re-serializes the complete family.
    pub fn set_setting_value(&mut self, id: &str, key: &str, value: &str) -> Result<()> {
        let profile = self
            .profiles
            .get_mut(id)
            .ok_or_else(|| Error::UnknownProfile(id.to_string()))?;
        if profile.is_read_only() {
            return Ok(());
        }

        profile
            .setting_values
            .insert(key.to_string(), value.to_string());

        for member_id in self.family_ids(id) {
            if let Some(member) = self.profiles.get_mut(&member_id) {
                member.set_dirty(true);
            }
        }
        Ok(())
    }

    /// Duplicate a profile into a new family with a fresh GUID
    ///
    /// Duplicating a non-root member first duplicates the family's base
    /// profile under `{brand}_{new_id}` and re-derives this profile's new id
    /// from brand, new id, definition and (when present) variant display
    /// name. Both duplicates are registered; returns the id of the duplicate
    /// of the profile that was asked for.
    pub fn duplicate(&mut self, id: &str, new_id: &str, new_name: Option<&str>) -> Result<String> {
        let profile = self
            .profiles
            .get(id)
            .cloned()
            .ok_or_else(|| Error::UnknownProfile(id.to_string()))?;

        let new_guid = Uuid::new_v4().to_string();
        let mut result_id = new_id.to_string();
        let mut new_base_id: Option<String> = None;

        if let Some(base_file) = profile.base_file()
            && base_file != id
            && let Some(base) = self.profiles.get(base_file).cloned()
        {
            let brand = profile.metadata_entry("brand").unwrap_or_default();
            let base_id = format!("{}_{}", brand, new_id);

            let mut new_base = clone_as(&base, &base_id, new_name);
            new_base
                .metadata
                .insert("GUID".to_string(), new_guid.clone());
            self.add_profile(new_base);

            result_id = format!("{}_{}_{}", brand, new_id, profile.definition());
            if let Some(variant) = profile.variant().and_then(|v| self.find_variant(v)) {
                result_id.push('_');
                result_id.push_str(&variant.name.replace(' ', "_"));
            }
            new_base_id = Some(base_id);
        }

        let mut result = clone_as(&profile, &result_id, new_name);
        result.metadata.insert("GUID".to_string(), new_guid);
        if result.base_file().is_some()
            && let Some(base_id) = new_base_id
        {
            result.metadata.insert("base_file".to_string(), base_id);
        }
        self.add_profile(result);
        Ok(result_id)
    }
}

/// Clone a profile under a new id, optionally renaming it
///
/// Duplicates are writable and dirty regardless of the source profile.
fn clone_as(source: &MaterialProfile, new_id: &str, new_name: Option<&str>) -> MaterialProfile {
    let mut clone = MaterialProfile::new(new_id);
    clone.set_name(new_name.unwrap_or(source.name()));
    clone.set_definition(source.definition());
    clone.metadata = source.metadata.clone();
    clone.properties = source.properties.clone();
    clone.setting_values = source.setting_values.clone();
    clone.set_dirty(true);
    clone
}

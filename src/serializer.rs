//! Serialization of a profile family to one material XML document
//!
//! Only the root profile of a family can be serialized; it emits the machine
//! and hotend specializations of its whole family itself, writing each scope
//! as a delta against the scope above it.

use crate::error::{Error, Result};
use crate::mapping;
use crate::profile::{GENERIC_DEFINITION_ID, MaterialProfile};
use crate::registry::MaterialRegistry;
use crate::settings::ScopeChain;
use crate::xmltree::{Element, indent};
use indexmap::IndexMap;

/// Namespace of the material XML dialect
pub const MATERIAL_NAMESPACE: &str = "http://www.ultimaker.com/material";

/// Metadata keys that are transient or derived and never serialized
const TRANSIENT_METADATA_KEYS: &[&str] = &["status", "variant", "type", "base_file"];

/// Serialize the family rooted at `root_id` to an XML document
///
/// Fails with [`Error::NotRootProfile`] when the profile carries a
/// `base_file` back-reference to another profile; non-root members are
/// emitted by their root, never on their own.
pub fn serialize(registry: &MaterialRegistry, root_id: &str) -> Result<String> {
    let profile = registry
        .profile(root_id)
        .ok_or_else(|| Error::UnknownProfile(root_id.to_string()))?;

    if let Some(base_file) = profile.base_file()
        && base_file != profile.id()
    {
        return Err(Error::NotRootProfile {
            id: profile.id().to_string(),
            base_file: base_file.to_string(),
        });
    }

    let mut root = Element::new("fdmmaterial").attr("xmlns", MATERIAL_NAMESPACE);
    root.push(build_metadata(profile));
    root.push(build_properties(profile));
    root.push(build_settings(registry, profile));

    indent(&mut root, 0);
    Ok(root.to_xml_string())
}

fn build_metadata(profile: &MaterialProfile) -> Element {
    let mut metadata = profile.metadata.clone();
    for key in TRANSIENT_METADATA_KEYS {
        metadata.shift_remove(*key);
    }

    let brand = metadata.shift_remove("brand").unwrap_or_default();
    let material = metadata.shift_remove("material").unwrap_or_default();
    let color = metadata.shift_remove("color_name").unwrap_or_default();

    let mut name = Element::new("name");
    name.push(Element::with_text("brand", brand));
    name.push(Element::with_text("material", material));
    name.push(Element::with_text("color", color));

    let mut element = Element::new("metadata");
    element.push(name);
    for (key, value) in &metadata {
        element.push(Element::with_text(key, value));
    }
    element
}

fn build_properties(profile: &MaterialProfile) -> Element {
    let mut element = Element::new("properties");
    for (key, value) in &profile.properties {
        element.push(Element::with_text(key, value));
    }
    element
}

fn build_settings(registry: &MaterialRegistry, profile: &MaterialProfile) -> Element {
    let mut settings = Element::new("settings");

    let root_is_generic = profile.definition() == GENERIC_DEFINITION_ID;
    if root_is_generic {
        for (key, value) in &profile.setting_values {
            if let Some(element) = setting_element(key, value) {
                settings.push(element);
            }
        }
    }

    let family = match profile.guid() {
        Some(guid) => registry.find_by_guid(guid),
        None => Vec::new(),
    };

    // Machine container per definition id, plus hotend profiles bucketed by
    // variant. A profile without a variant is always preferred as the machine
    // container; among several, the first in registration order wins. A
    // varianted profile only stands in when the machine has no other member.
    let mut machine_map: IndexMap<&str, &MaterialProfile> = IndexMap::new();
    let mut nozzle_map: IndexMap<&str, IndexMap<&str, &MaterialProfile>> = IndexMap::new();

    for member in family {
        let definition_id = member.definition();
        if definition_id == GENERIC_DEFINITION_ID {
            continue;
        }
        nozzle_map.entry(definition_id).or_default();

        match member.variant() {
            Some(variant) => {
                nozzle_map
                    .entry(definition_id)
                    .or_default()
                    .insert(variant, member);
                machine_map.entry(definition_id).or_insert(member);
            }
            None => match machine_map.get(definition_id) {
                Some(existing) if existing.variant().is_none() => {}
                _ => {
                    machine_map.insert(definition_id, member);
                }
            },
        }
    }

    for (definition_id, container) in &machine_map {
        // Machines the file format has no product name for are left out.
        let Some(product) = mapping::product_for_definition_id(definition_id) else {
            continue;
        };
        let manufacturer = registry
            .find_definition(definition_id)
            .map(|d| d.manufacturer.as_str())
            .unwrap_or("");

        let mut machine = Element::new("machine");
        machine.push(
            Element::new("machine_identifier")
                .attr("manufacturer", manufacturer)
                .attr("product", product),
        );

        // Settings identical to the inherited global value are suppressed.
        let mut global_scope = ScopeChain::new();
        if root_is_generic {
            global_scope.push(&profile.setting_values);
        }
        for (key, value) in &container.setting_values {
            if global_scope.resolve(key) == Some(value.as_str()) {
                continue;
            }
            if let Some(element) = setting_element(key, value) {
                machine.push(element);
            }
        }

        if let Some(hotends) = nozzle_map.get(definition_id) {
            for hotend_profile in hotends.values() {
                if let Some(element) = build_hotend(registry, container, hotend_profile) {
                    machine.push(element);
                }
            }
        }

        settings.push(machine);
    }

    settings
}

/// Build a `<hotend>` block for one hotend profile, if its variant resolves
fn build_hotend(
    registry: &MaterialRegistry,
    machine_container: &MaterialProfile,
    hotend_profile: &MaterialProfile,
) -> Option<Element> {
    // Unregistered variant container: hotend block is not emittable.
    let variant = hotend_profile
        .variant()
        .and_then(|id| registry.find_variant(id))?;

    let mut hotend = Element::new("hotend").attr("id", &variant.name);

    let mut machine_scope = ScopeChain::new();
    machine_scope.push(&machine_container.setting_values);
    for (key, value) in &hotend_profile.setting_values {
        if machine_scope.resolve(key) == Some(value.as_str()) {
            continue;
        }
        if let Some(element) = setting_element(key, value) {
            hotend.push(element);
        }
    }

    Some(hotend)
}

/// Build a `<setting>` element, or `None` when the key has no XML name
fn setting_element(key: &str, value: &str) -> Option<Element> {
    mapping::xml_name_for_setting_key(key)
        .map(|xml_name| Element::with_text("setting", value).attr("key", xml_name))
}

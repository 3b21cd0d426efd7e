//! Deserialization of one material XML document into a profile family
//!
//! One document expands into 1 + N profiles: the base profile the caller
//! passed in, plus one synthesized profile per resolvable machine identifier
//! and per resolvable hotend. Unresolvable references (unknown products,
//! unregistered machine definitions or variants, unmapped setting keys) are
//! logged and skipped; only malformed XML aborts the import.
//!
//! Synthesized profiles are registered as soon as they are complete. If a
//! later part of the document fails, the already-registered siblings stay
//! registered; there is no rollback.

use crate::error::{Error, Result};
use crate::mapping;
use crate::profile::{GENERIC_DEFINITION_ID, MaterialProfile};
use crate::registry::MaterialRegistry;
use crate::settings::ScopeChain;
use crate::xmltree::Element;
use indexmap::IndexMap;

/// Deserialize `xml` into the registered profile `root_id` and its family
///
/// The profile named by `root_id` must already be registered; it becomes the
/// family root, bound to the generic `fdmprinter` definition. Every machine
/// and hotend block of the document synthesizes an additional profile that is
/// registered with a `base_file` back-reference to the root.
pub fn deserialize(registry: &mut MaterialRegistry, root_id: &str, xml: &str) -> Result<()> {
    let document = Element::parse(xml)?;
    if document.name != "fdmmaterial" {
        return Err(Error::invalid_xml_element(
            &document.name,
            "expected <fdmmaterial> document root",
        ));
    }

    let mut profile = registry
        .profile(root_id)
        .cloned()
        .ok_or_else(|| Error::UnknownProfile(root_id.to_string()))?;

    profile
        .metadata
        .insert("type".to_string(), "material".to_string());
    // Material verification is not implemented; imported profiles start out
    // with unknown status.
    profile
        .metadata
        .insert("status".to_string(), "unknown".to_string());

    read_metadata(&document, &mut profile);
    read_properties(&document, &mut profile)?;

    if registry.find_definition(GENERIC_DEFINITION_ID).is_none() {
        return Err(Error::MissingDefinition(GENERIC_DEFINITION_ID.to_string()));
    }
    profile.set_definition(GENERIC_DEFINITION_ID);

    let settings = document.find("settings");

    let mut global_values = IndexMap::new();
    if let Some(settings) = settings {
        for entry in settings.children_named("setting") {
            if let Some((key, value)) = mapped_setting(entry) {
                profile.setting_values.insert(key.clone(), value.clone());
                global_values.insert(key, value);
            }
        }
    }
    profile.set_dirty(false);

    let root_name = profile.name().to_string();
    let root_metadata = profile.metadata.clone();
    let root_properties = profile.properties.clone();
    registry.add_profile(profile);

    if let Some(settings) = settings {
        for machine in settings.children_named("machine") {
            let mut machine_values = IndexMap::new();
            for entry in machine.children_named("setting") {
                if let Some((key, value)) = mapped_setting(entry) {
                    machine_values.insert(key, value);
                }
            }

            for identifier in machine.children_named("machine_identifier") {
                let Some(product) = identifier.attribute("product") else {
                    log::warn!("Machine identifier without product attribute, skipping");
                    continue;
                };
                let Some(machine_id) = mapping::definition_id_for_product(product) else {
                    log::warn!("Cannot create material for unknown machine {}", product);
                    continue;
                };
                if registry.find_definition(machine_id).is_none() {
                    log::warn!("No definition found for machine ID {}", machine_id);
                    continue;
                }

                let mut chain = ScopeChain::new();
                chain.push(&global_values);
                chain.push(&machine_values);

                let mut machine_profile =
                    MaterialProfile::new(format!("{}_{}", root_id, machine_id));
                machine_profile.set_name(&root_name);
                machine_profile.metadata = root_metadata.clone();
                machine_profile.properties = root_properties.clone();
                machine_profile.set_definition(machine_id);
                machine_profile
                    .metadata
                    .insert("base_file".to_string(), root_id.to_string());
                machine_profile.setting_values = chain.flattened();
                machine_profile.set_dirty(false);
                registry.add_profile(machine_profile);

                for hotend in machine.children_named("hotend") {
                    synthesize_hotend(
                        registry,
                        root_id,
                        &root_name,
                        &root_metadata,
                        &root_properties,
                        machine_id,
                        &global_values,
                        &machine_values,
                        hotend,
                    );
                }
            }
        }
    }

    Ok(())
}

/// Walk `<metadata>` children into the profile's metadata map
///
/// The `<name>` block is special-cased into the `brand`, `material` and
/// `color_name` entries; the material text also becomes the display name.
fn read_metadata(document: &Element, profile: &mut MaterialProfile) {
    if let Some(metadata) = document.find("metadata") {
        for entry in &metadata.children {
            if entry.name == "name" {
                let brand = entry.find("brand").map(Element::text_content).unwrap_or("");
                let material = entry
                    .find("material")
                    .map(Element::text_content)
                    .unwrap_or("");
                let color = entry.find("color").map(Element::text_content).unwrap_or("");

                profile.set_name(material);
                profile
                    .metadata
                    .insert("brand".to_string(), brand.to_string());
                profile
                    .metadata
                    .insert("material".to_string(), material.to_string());
                profile
                    .metadata
                    .insert("color_name".to_string(), color.to_string());
                continue;
            }

            profile
                .metadata
                .insert(entry.name.clone(), entry.text_content().to_string());
        }
    }

    for key in ["description", "adhesion_info"] {
        if !profile.metadata.contains_key(key) {
            profile.metadata.insert(key.to_string(), String::new());
        }
    }
}

/// Walk `<properties>` children into the flat property map
///
/// Diameter and density must parse as floats when present; their defaults
/// (2.85 mm and 1.3 g/cm³) apply through the profile accessors when absent.
fn read_properties(document: &Element, profile: &mut MaterialProfile) -> Result<()> {
    let mut property_values = IndexMap::new();
    if let Some(properties) = document.find("properties") {
        for entry in &properties.children {
            property_values.insert(entry.name.clone(), entry.text_content().to_string());
        }
    }

    for key in ["diameter", "density"] {
        if let Some(value) = property_values.get(key) {
            value
                .parse::<f64>()
                .map_err(|_| Error::Parse(format!("property '{}' is not a number: '{}'", key, value)))?;
        }
    }

    profile.properties = property_values;
    Ok(())
}

/// Map one `<setting>` element to an internal key/value pair
///
/// Returns `None` (after logging) for settings the mapper does not know.
fn mapped_setting(entry: &Element) -> Option<(String, String)> {
    let Some(xml_name) = entry.attribute("key") else {
        log::debug!("Setting element without key attribute, skipping");
        return None;
    };
    match mapping::setting_key_for_xml_name(xml_name) {
        Some(key) => Some((key.to_string(), entry.text_content().to_string())),
        None => {
            log::debug!("Unsupported material setting {}", xml_name);
            None
        }
    }
}

/// Synthesize and register one hotend profile, if its variant resolves
#[allow(clippy::too_many_arguments)]
fn synthesize_hotend(
    registry: &mut MaterialRegistry,
    root_id: &str,
    root_name: &str,
    root_metadata: &IndexMap<String, String>,
    root_properties: &IndexMap<String, String>,
    machine_id: &str,
    global_values: &IndexMap<String, String>,
    machine_values: &IndexMap<String, String>,
    hotend: &Element,
) {
    let Some(hotend_id) = hotend.attribute("id") else {
        return;
    };

    // The format does not pin down what the id attribute refers to, so try
    // container id first, then display name scoped to this machine.
    let variant_id = match registry.find_variant(hotend_id) {
        Some(variant) => variant.id.clone(),
        None => match registry.find_variant_by_name(machine_id, hotend_id) {
            Some(variant) => variant.id.clone(),
            None => {
                log::debug!(
                    "No variants found with ID or name {} for machine {}",
                    hotend_id,
                    machine_id
                );
                return;
            }
        },
    };

    let mut hotend_values = IndexMap::new();
    for entry in hotend.children_named("setting") {
        if let Some((key, value)) = mapped_setting(entry) {
            hotend_values.insert(key, value);
        }
    }

    let mut chain = ScopeChain::new();
    chain.push(global_values);
    chain.push(machine_values);
    chain.push(&hotend_values);

    let mut hotend_profile = MaterialProfile::new(format!(
        "{}_{}_{}",
        root_id,
        machine_id,
        hotend_id.replace(' ', "_")
    ));
    hotend_profile.set_name(root_name);
    hotend_profile.metadata = root_metadata.clone();
    hotend_profile.properties = root_properties.clone();
    hotend_profile.set_definition(machine_id);
    hotend_profile
        .metadata
        .insert("base_file".to_string(), root_id.to_string());
    hotend_profile
        .metadata
        .insert("variant".to_string(), variant_id);
    hotend_profile.setting_values = chain.flattened();
    hotend_profile.set_dirty(false);
    registry.add_profile(hotend_profile);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_root_element_is_error() {
        let mut registry = MaterialRegistry::new();
        registry.add_profile(MaterialProfile::new("m"));
        let result = deserialize(&mut registry, "m", "<material></material>");
        assert!(matches!(result, Err(Error::InvalidXml(_))));
    }

    #[test]
    fn test_unregistered_profile_is_error() {
        let mut registry = MaterialRegistry::new();
        let result = deserialize(&mut registry, "missing", "<fdmmaterial></fdmmaterial>");
        assert!(matches!(result, Err(Error::UnknownProfile(_))));
    }

    #[test]
    fn test_malformed_property_float_is_error() {
        let mut registry = MaterialRegistry::new();
        registry.add_profile(MaterialProfile::new("m"));
        let xml = r#"<fdmmaterial><properties><diameter>wide</diameter></properties></fdmmaterial>"#;
        let result = deserialize(&mut registry, "m", xml);
        assert!(matches!(result, Err(Error::Parse(_))));
    }
}

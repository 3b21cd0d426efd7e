//! Tests for reducing a profile family to one material document

mod common;

use common::{base_profile, family_member, registry_with_machines};
use fdm_material::{Error, serialize};

#[test]
fn test_serialize_base_only_family() {
    let mut registry = registry_with_machines();
    registry.add_profile(base_profile("generic_pla"));

    let xml = serialize(&registry, "generic_pla").unwrap();

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("<fdmmaterial xmlns=\"http://www.ultimaker.com/material\">"));
    assert!(xml.contains("<brand>Generic</brand>"));
    assert!(xml.contains("<material>PLA</material>"));
    assert!(xml.contains("<color>White</color>"));
    assert!(xml.contains("<GUID>506798cd-9f05-47a9-a5ac-f73c4cf46007</GUID>"));
    assert!(xml.contains("<density>1.24</density>"));
    assert!(xml.contains("<setting key=\"print temperature\">210</setting>"));
    assert!(xml.contains("<setting key=\"standby temperature\">175</setting>"));
    assert!(!xml.contains("<machine>"));
}

#[test]
fn test_serialize_excludes_transient_metadata() {
    let mut registry = registry_with_machines();
    let mut profile = base_profile("generic_pla");
    profile
        .metadata
        .insert("status".to_string(), "unknown".to_string());
    profile
        .metadata
        .insert("type".to_string(), "material".to_string());
    registry.add_profile(profile);

    let xml = serialize(&registry, "generic_pla").unwrap();
    assert!(!xml.contains("<status>"));
    assert!(!xml.contains("<type>"));
    assert!(!xml.contains("<base_file>"));
    assert!(!xml.contains("<variant>"));
}

#[test]
fn test_serialize_rejects_non_root_profile() {
    let mut registry = registry_with_machines();
    registry.add_profile(base_profile("generic_pla"));
    registry.add_profile(family_member(
        "generic_pla_ultimaker2",
        "generic_pla",
        "ultimaker2",
        None,
    ));

    let result = serialize(&registry, "generic_pla_ultimaker2");
    assert!(matches!(result, Err(Error::NotRootProfile { .. })));
}

#[test]
fn test_serialize_accepts_self_referencing_base_file() {
    let mut registry = registry_with_machines();
    let mut profile = base_profile("generic_pla");
    profile
        .metadata
        .insert("base_file".to_string(), "generic_pla".to_string());
    registry.add_profile(profile);

    assert!(serialize(&registry, "generic_pla").is_ok());
}

#[test]
fn test_machine_scope_suppresses_inherited_duplicates() {
    let mut registry = registry_with_machines();
    registry.add_profile(base_profile("generic_pla"));

    // Same standby temperature as the base, different print temperature.
    let mut machine = family_member(
        "generic_pla_ultimaker2_plus",
        "generic_pla",
        "ultimaker2_plus",
        None,
    );
    machine
        .setting_values
        .insert("material_print_temperature".to_string(), "220".to_string());
    registry.add_profile(machine);

    let xml = serialize(&registry, "generic_pla").unwrap();

    let machine_block = xml
        .split("<machine>")
        .nth(1)
        .expect("machine block missing")
        .split("</machine>")
        .next()
        .unwrap();
    assert!(machine_block.contains("product=\"Ultimaker2+\""));
    assert!(machine_block.contains("manufacturer=\"Ultimaker B.V.\""));
    assert!(machine_block.contains("<setting key=\"print temperature\">220</setting>"));
    assert!(!machine_block.contains("standby temperature"));
}

#[test]
fn test_hotend_scope_suppresses_machine_duplicates() {
    let mut registry = registry_with_machines();
    registry.add_profile(base_profile("generic_pla"));

    let mut machine = family_member(
        "generic_pla_ultimaker2_plus",
        "generic_pla",
        "ultimaker2_plus",
        None,
    );
    machine
        .setting_values
        .insert("material_print_temperature".to_string(), "220".to_string());
    registry.add_profile(machine);

    let mut hotend = family_member(
        "generic_pla_ultimaker2_plus_0.4_mm",
        "generic_pla",
        "ultimaker2_plus",
        Some("ultimaker2_plus_0.4"),
    );
    hotend
        .setting_values
        .insert("material_print_temperature".to_string(), "220".to_string());
    hotend
        .setting_values
        .insert("retraction_speed".to_string(), "40".to_string());
    registry.add_profile(hotend);

    let xml = serialize(&registry, "generic_pla").unwrap();

    let hotend_block = xml
        .split("<hotend id=\"0.4 mm\">")
        .nth(1)
        .expect("hotend block missing")
        .split("</hotend>")
        .next()
        .unwrap();
    assert!(hotend_block.contains("<setting key=\"retraction speed\">40</setting>"));
    assert!(!hotend_block.contains("print temperature"));
}

#[test]
fn test_machine_without_product_name_is_skipped() {
    let mut registry = registry_with_machines();
    registry.add_profile(base_profile("generic_pla"));
    registry.add_profile(family_member(
        "generic_pla_custom",
        "generic_pla",
        "custom_printer",
        None,
    ));

    let xml = serialize(&registry, "generic_pla").unwrap();
    assert!(!xml.contains("<machine>"));
}

#[test]
fn test_hotend_with_unregistered_variant_is_skipped() {
    let mut registry = registry_with_machines();
    registry.add_profile(base_profile("generic_pla"));
    registry.add_profile(family_member(
        "generic_pla_ultimaker2_plus",
        "generic_pla",
        "ultimaker2_plus",
        None,
    ));
    registry.add_profile(family_member(
        "generic_pla_ultimaker2_plus_ghost",
        "generic_pla",
        "ultimaker2_plus",
        Some("no_such_variant"),
    ));

    let xml = serialize(&registry, "generic_pla").unwrap();
    assert!(xml.contains("<machine>"));
    assert!(!xml.contains("<hotend"));
}

#[test]
fn test_machine_container_prefers_non_varianted_profile() {
    let mut registry = registry_with_machines();
    registry.add_profile(base_profile("generic_pla"));

    // Varianted member registered first; the non-varianted one must still
    // become the machine container.
    let mut hotend = family_member(
        "generic_pla_ultimaker2_plus_0.4_mm",
        "generic_pla",
        "ultimaker2_plus",
        Some("ultimaker2_plus_0.4"),
    );
    hotend
        .setting_values
        .insert("retraction_speed".to_string(), "35".to_string());
    registry.add_profile(hotend);

    let mut machine = family_member(
        "generic_pla_ultimaker2_plus",
        "generic_pla",
        "ultimaker2_plus",
        None,
    );
    machine
        .setting_values
        .insert("material_print_temperature".to_string(), "220".to_string());
    registry.add_profile(machine);

    let xml = serialize(&registry, "generic_pla").unwrap();
    let machine_block = xml
        .split("<machine>")
        .nth(1)
        .unwrap()
        .split("<hotend")
        .next()
        .unwrap();
    // Machine scope comes from the non-varianted profile, not the hotend one.
    assert!(machine_block.contains("<setting key=\"print temperature\">220</setting>"));
    assert!(!machine_block.contains("retraction speed"));
}

#[test]
fn test_settings_without_xml_names_are_not_emitted() {
    let mut registry = registry_with_machines();
    let mut profile = base_profile("generic_pla");
    profile
        .setting_values
        .insert("infill_sparse_density".to_string(), "20".to_string());
    registry.add_profile(profile);

    let xml = serialize(&registry, "generic_pla").unwrap();
    assert!(!xml.contains("infill_sparse_density"));
    assert!(xml.contains("print temperature"));
}

#[test]
fn test_output_is_indented() {
    let mut registry = registry_with_machines();
    registry.add_profile(base_profile("generic_pla"));

    let xml = serialize(&registry, "generic_pla").unwrap();
    assert!(xml.contains("\n  <metadata>"));
    assert!(xml.contains("\n    <name>"));
    assert!(xml.contains("\n      <brand>Generic</brand>"));
    assert!(xml.ends_with("</fdmmaterial>\n"));
}

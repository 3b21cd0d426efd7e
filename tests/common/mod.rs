//! Shared fixtures for material profile integration tests

#![allow(dead_code)]

use fdm_material::{MachineDefinition, MaterialProfile, MaterialRegistry, VariantContainer};

/// Family GUID used across fixtures
pub const GUID: &str = "506798cd-9f05-47a9-a5ac-f73c4cf46007";

/// Registry preloaded with the generic definition, two Ultimaker machines
/// and two nozzle variants for the Ultimaker2+
pub fn registry_with_machines() -> MaterialRegistry {
    let mut registry = MaterialRegistry::new();
    registry.add_definition(MachineDefinition::new("fdmprinter", ""));
    registry.add_definition(MachineDefinition::new("ultimaker2", "Ultimaker B.V."));
    registry.add_definition(MachineDefinition::new("ultimaker2_plus", "Ultimaker B.V."));
    registry.add_variant(VariantContainer::new(
        "ultimaker2_plus_0.4",
        "0.4 mm",
        "ultimaker2_plus",
    ));
    registry.add_variant(VariantContainer::new(
        "ultimaker2_plus_0.8",
        "0.8 mm",
        "ultimaker2_plus",
    ));
    registry
}

/// A base profile for a generic PLA material
pub fn base_profile(id: &str) -> MaterialProfile {
    let mut profile = MaterialProfile::new(id);
    profile.set_name("PLA");
    for (key, value) in [
        ("brand", "Generic"),
        ("material", "PLA"),
        ("color_name", "White"),
        ("GUID", GUID),
        ("description", "Generic PLA profile"),
        ("adhesion_info", "No glue needed"),
    ] {
        profile.metadata.insert(key.to_string(), value.to_string());
    }
    profile
        .properties
        .insert("density".to_string(), "1.24".to_string());
    profile
        .properties
        .insert("diameter".to_string(), "2.85".to_string());
    profile
        .setting_values
        .insert("material_print_temperature".to_string(), "210".to_string());
    profile.setting_values.insert(
        "material_standby_temperature".to_string(),
        "175".to_string(),
    );
    profile
}

/// A machine or hotend member of the same family as [`base_profile`]
pub fn family_member(
    id: &str,
    base_id: &str,
    definition: &str,
    variant: Option<&str>,
) -> MaterialProfile {
    let mut profile = base_profile(id);
    profile.set_definition(definition);
    profile
        .metadata
        .insert("base_file".to_string(), base_id.to_string());
    if let Some(variant) = variant {
        profile
            .metadata
            .insert("variant".to_string(), variant.to_string());
    }
    profile
}

/// A complete material document with global, machine and hotend scopes plus
/// one unknown machine that must be skipped
pub const SAMPLE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<fdmmaterial xmlns="http://www.ultimaker.com/material">
  <metadata>
    <name>
      <brand>Generic</brand>
      <material>PLA</material>
      <color>White</color>
    </name>
    <GUID>506798cd-9f05-47a9-a5ac-f73c4cf46007</GUID>
    <version>1</version>
    <description>Generic PLA profile</description>
    <adhesion_info>No glue needed</adhesion_info>
  </metadata>
  <properties>
    <density>1.24</density>
    <diameter>2.85</diameter>
  </properties>
  <settings>
    <setting key="print temperature">210</setting>
    <setting key="standby temperature">175</setting>
    <machine>
      <machine_identifier manufacturer="Ultimaker B.V." product="Ultimaker2+"/>
      <setting key="print temperature">220</setting>
      <hotend id="0.4 mm">
        <setting key="retraction speed">40</setting>
      </hotend>
      <hotend id="0.8 mm">
        <setting key="print temperature">230</setting>
      </hotend>
    </machine>
    <machine>
      <machine_identifier manufacturer="Nobody" product="UnknownPrinter9000"/>
      <setting key="print temperature">999</setting>
    </machine>
  </settings>
</fdmmaterial>
"#;

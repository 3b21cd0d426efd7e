//! Static name mappings between the XML dialect and internal identifiers
//!
//! The material XML format uses human-readable setting names ("print
//! temperature") and vendor product names ("Ultimaker2+") while the rest of
//! the system works with internal setting keys and machine definition ids.
//! Both tables are bidirectional, but the two directions fail differently:
//! the parse direction failing means the entry is unsupported and must be
//! logged and skipped, while the emit direction failing means the entry is
//! simply not representable in the file format and is silently left out.

/// XML setting name ↔ internal setting key
const SETTING_MAP: &[(&str, &str)] = &[
    ("print temperature", "material_print_temperature"),
    ("heated bed temperature", "material_bed_temperature"),
    ("standby temperature", "material_standby_temperature"),
    ("print cooling", "cool_fan_speed"),
    ("retraction amount", "retraction_amount"),
    ("retraction speed", "retraction_speed"),
];

/// Vendor product name ↔ internal machine definition id
const PRODUCT_MAP: &[(&str, &str)] = &[
    ("Ultimaker2", "ultimaker2"),
    ("Ultimaker2+", "ultimaker2_plus"),
    ("Ultimaker2go", "ultimaker2_go"),
    ("Ultimaker2extended", "ultimaker2_extended"),
    ("Ultimaker2extended+", "ultimaker2_extended_plus"),
    ("Ultimaker Original", "ultimaker_original"),
    ("Ultimaker Original+", "ultimaker_original_plus"),
];

fn forward(table: &'static [(&str, &str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

fn reverse(table: &'static [(&str, &str)], value: &str) -> Option<&'static str> {
    table.iter().find(|(_, v)| *v == value).map(|(k, _)| *k)
}

/// Map an XML setting name to its internal setting key
///
/// Used during parsing. `None` means the setting is unsupported; the caller
/// logs it and skips the element.
pub fn setting_key_for_xml_name(xml_name: &str) -> Option<&'static str> {
    forward(SETTING_MAP, xml_name)
}

/// Map an internal setting key back to its XML setting name
///
/// Used during emission. `None` means "do not emit this setting" — settings
/// without a file-format representation are not an error.
pub fn xml_name_for_setting_key(setting_key: &str) -> Option<&'static str> {
    reverse(SETTING_MAP, setting_key)
}

/// Map a vendor product name to the internal machine definition id
///
/// Used during parsing; `None` means the machine is unrecognized and its
/// block must be logged and skipped.
pub fn definition_id_for_product(product: &str) -> Option<&'static str> {
    forward(PRODUCT_MAP, product)
}

/// Map an internal machine definition id back to the vendor product name
///
/// Used during emission; a machine whose definition id has no product name
/// is skipped entirely.
pub fn product_for_definition_id(definition_id: &str) -> Option<&'static str> {
    reverse(PRODUCT_MAP, definition_id)
}

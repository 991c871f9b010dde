//! Well-known OID name hints.
//!
//! A small hardcoded table of common OID names for display purposes.
//! This is NOT MIB support.

use crate::Oid;

/// Well-known scalar instances and table roots, matched exactly.
static WELL_KNOWN_OIDS: &[(&[u32], &str)] = &[
    // SNMPv2-MIB::system
    (&[1, 3, 6, 1, 2, 1, 1, 1, 0], "sysDescr.0"),
    (&[1, 3, 6, 1, 2, 1, 1, 2, 0], "sysObjectID.0"),
    (&[1, 3, 6, 1, 2, 1, 1, 3, 0], "sysUpTime.0"),
    (&[1, 3, 6, 1, 2, 1, 1, 4, 0], "sysContact.0"),
    (&[1, 3, 6, 1, 2, 1, 1, 5, 0], "sysName.0"),
    (&[1, 3, 6, 1, 2, 1, 1, 6, 0], "sysLocation.0"),
    (&[1, 3, 6, 1, 2, 1, 1, 7, 0], "sysServices.0"),
    // SNMPv2-MIB::snmp
    (&[1, 3, 6, 1, 2, 1, 11, 3, 0], "snmpInBadVersions.0"),
    (&[1, 3, 6, 1, 2, 1, 11, 6, 0], "snmpInASNParseErrs.0"),
    // IF-MIB::interfaces
    (&[1, 3, 6, 1, 2, 1, 2, 1, 0], "ifNumber.0"),
    (&[1, 3, 6, 1, 2, 1, 1], "system"),
    (&[1, 3, 6, 1, 2, 1, 2], "interfaces"),
    (&[1, 3, 6, 1, 2, 1, 2, 2], "ifTable"),
    (&[1, 3, 6, 1, 2, 1, 43, 11], "prtMarkerSuppliesTable"),
];

/// Table columns; instances below them are shown as `column.index`.
static COLUMNS: &[(&[u32], &str)] = &[
    (&[1, 3, 6, 1, 2, 1, 43, 11, 1, 1, 6], "prtMarkerSuppliesDescription"),
    (&[1, 3, 6, 1, 2, 1, 43, 11, 1, 1, 7], "prtMarkerSuppliesSupplyUnit"),
    (&[1, 3, 6, 1, 2, 1, 43, 11, 1, 1, 8], "prtMarkerSuppliesMaxCapacity"),
    (&[1, 3, 6, 1, 2, 1, 43, 11, 1, 1, 9], "prtMarkerSuppliesLevel"),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1, 2], "ifDescr"),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1, 10], "ifInOctets"),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1, 16], "ifOutOctets"),
];

/// Look up a friendly name for an OID.
///
/// Returns `None` if the OID is neither a well-known OID nor an instance of
/// a known column.
pub fn lookup(oid: &Oid) -> Option<String> {
    let arcs = oid.arcs();
    if let Some((_, name)) = WELL_KNOWN_OIDS.iter().find(|(pattern, _)| *pattern == arcs) {
        return Some((*name).to_string());
    }

    COLUMNS
        .iter()
        .find(|(column, _)| arcs.len() > column.len() && arcs.starts_with(column))
        .map(|(column, name)| {
            let index: Vec<String> = arcs[column.len()..].iter().map(u32::to_string).collect();
            format!("{}.{}", name, index.join("."))
        })
}

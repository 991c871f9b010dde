//! Printer supplies aggregation from walked responses.

mod common;

use common::*;
use snmp_mp::mp::MessageProcessingModel;
use snmp_mp::supplies::{SupplyChannel, SupplyColumn, Supplies};
use snmp_mp::{Oid, Pdu, Value, VarBind, Version};

/// Row of a column for printer 1, supply `index`.
fn row(column: &Oid, index: u32, value: i32) -> VarBind {
    VarBind::new(column.child(1).child(index), Value::Integer(value))
}

/// A colour laser printer with four toners, four drums and two spare black cartridges.
fn colour_laser() -> (Vec<VarBind>, Vec<VarBind>, Vec<VarBind>) {
    let level = Supplies::level_oid();
    let max = Supplies::max_capacity_oid();
    let unit = Supplies::supply_unit_oid();

    let indices = [1, 2, 3, 4, 6, 7, 8, 9, 30, 31];
    let levels = indices.iter().map(|&i| row(&level, i, 50 * i as i32)).collect();
    let capacities = indices.iter().map(|&i| row(&max, i, 100 * i as i32)).collect();
    let units = indices.iter().map(|&i| row(&unit, i, 7)).collect();
    (levels, capacities, units)
}

#[test]
fn all_known_channels_merged() {
    let (levels, capacities, units) = colour_laser();
    let supplies = Supplies::from_walks(&levels, &capacities, &units);

    let expected = [
        SupplyChannel::Black,
        SupplyChannel::Yellow,
        SupplyChannel::Magenta,
        SupplyChannel::Cyan,
        SupplyChannel::DrumBlack,
        SupplyChannel::DrumYellow,
        SupplyChannel::DrumMagenta,
        SupplyChannel::DrumCyan,
        SupplyChannel::SecondaryBlack1,
        SupplyChannel::SecondaryBlack2,
    ];
    assert_eq!(supplies.len(), expected.len());
    for channel in expected {
        let record = supplies.get(channel).unwrap();
        assert_eq!(record.percent(), Some(50), "{}", channel);
        assert_eq!(record.unit_name(), Some("impressions"));
        assert_eq!(record.level, Some(50 * channel.index() as i32));
    }
}

#[test]
fn unknown_index_kept_as_other() {
    let levels = vec![row(&Supplies::level_oid(), 12, 5)];
    let supplies = Supplies::from_walks(&levels, &[], &[]);
    let record = supplies.get(SupplyChannel::Other(12)).unwrap();
    assert_eq!(record.level, Some(5));
    assert_eq!(record.max_capacity, None);
    assert_eq!(record.percent(), None);
}

#[test]
fn walk_terminator_and_strings_ignored() {
    let level = Supplies::level_oid();
    let levels = vec![
        row(&level, 1, 10),
        VarBind::new(level.child(1).child(2), Value::from("n/a")),
        VarBind::new(level.child(1).child(3), Value::EndOfMibView),
    ];
    let supplies = Supplies::from_walks(&levels, &[], &[]);
    assert_eq!(supplies.len(), 1);
    assert!(supplies.get(SupplyChannel::Black).is_some());
}

#[test]
fn later_rows_replace_earlier() {
    let level = Supplies::level_oid();
    let mut supplies = Supplies::default();
    supplies.insert(SupplyColumn::Level, &row(&level, 4, 80));
    supplies.insert(SupplyColumn::Level, &row(&level, 4, 75));
    assert_eq!(supplies.get(SupplyChannel::Cyan).unwrap().level, Some(75));
}

#[test]
fn supplies_from_decoded_responses() {
    let (levels, capacities, units) = colour_laser();
    let mp = v2c();
    let params = community_params(Version::V2c, COMMUNITY_RO).expect_response(false);

    // One response per walked column, as an agent would send them.
    let decoded: Vec<Vec<VarBind>> = [levels, capacities, units]
        .into_iter()
        .enumerate()
        .map(|(i, varbinds)| {
            let wire = mp
                .prepare_outgoing_message(
                    &params,
                    &Pdu::response(i as i32 + 1, varbinds).into(),
                )
                .unwrap();
            mp.prepare_data_elements(wire, agent_addr())
                .unwrap()
                .pdu
                .into_pdu()
                .varbinds
        })
        .collect();

    let supplies = Supplies::from_walks(&decoded[0], &decoded[1], &decoded[2]);
    assert_eq!(supplies.len(), 10);
    assert_eq!(
        supplies.get(SupplyChannel::SecondaryBlack1).unwrap().percent(),
        Some(50)
    );
}

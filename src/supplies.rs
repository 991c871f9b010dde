//! Printer marker supplies (Printer-MIB, RFC 3805).
//!
//! A supplies poll walks three columns of `prtMarkerSuppliesTable`: level,
//! maximum capacity and unit. Rows share a trailing supply index, so the
//! three walks are merged by that index into one [`SupplyRecord`] per
//! [`SupplyChannel`].
//!
//! ```
//! use snmp_mp::supplies::{SupplyChannel, Supplies};
//! use snmp_mp::{Value, VarBind};
//!
//! let levels = [VarBind::new(Supplies::level_oid().child(1).child(1), Value::Integer(40))];
//! let capacities = [VarBind::new(Supplies::max_capacity_oid().child(1).child(1), Value::Integer(80))];
//!
//! let supplies = Supplies::from_walks(&levels, &capacities, &[]);
//! let black = supplies.get(SupplyChannel::Black).unwrap();
//! assert_eq!(black.percent(), Some(50));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use crate::oid::Oid;
use crate::varbind::VarBind;

/// prtMarkerSuppliesSupplyUnit.
const SUPPLY_UNIT: &[u32] = &[1, 3, 6, 1, 2, 1, 43, 11, 1, 1, 7];
/// prtMarkerSuppliesMaxCapacity.
const MAX_CAPACITY: &[u32] = &[1, 3, 6, 1, 2, 1, 43, 11, 1, 1, 8];
/// prtMarkerSuppliesLevel.
const LEVEL: &[u32] = &[1, 3, 6, 1, 2, 1, 43, 11, 1, 1, 9];

/// Which consumable a supply index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SupplyChannel {
    /// Black (key) toner or ink.
    Black,
    /// Yellow toner or ink.
    Yellow,
    /// Magenta toner or ink.
    Magenta,
    /// Cyan toner or ink.
    Cyan,
    /// Black imaging drum.
    DrumBlack,
    /// Yellow imaging drum.
    DrumYellow,
    /// Magenta imaging drum.
    DrumMagenta,
    /// Cyan imaging drum.
    DrumCyan,
    /// First secondary black cartridge.
    SecondaryBlack1,
    /// Second secondary black cartridge.
    SecondaryBlack2,
    /// Any other supply index.
    Other(u32),
}

impl SupplyChannel {
    /// Map a supply index to its channel.
    pub fn from_index(index: u32) -> Self {
        match index {
            1 => Self::Black,
            2 => Self::Yellow,
            3 => Self::Magenta,
            4 => Self::Cyan,
            6 => Self::DrumBlack,
            7 => Self::DrumYellow,
            8 => Self::DrumMagenta,
            9 => Self::DrumCyan,
            30 => Self::SecondaryBlack1,
            31 => Self::SecondaryBlack2,
            other => Self::Other(other),
        }
    }

    /// The supply index.
    pub fn index(self) -> u32 {
        match self {
            Self::Black => 1,
            Self::Yellow => 2,
            Self::Magenta => 3,
            Self::Cyan => 4,
            Self::DrumBlack => 6,
            Self::DrumYellow => 7,
            Self::DrumMagenta => 8,
            Self::DrumCyan => 9,
            Self::SecondaryBlack1 => 30,
            Self::SecondaryBlack2 => 31,
            Self::Other(index) => index,
        }
    }
}

impl fmt::Display for SupplyChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Black => write!(f, "black"),
            Self::Yellow => write!(f, "yellow"),
            Self::Magenta => write!(f, "magenta"),
            Self::Cyan => write!(f, "cyan"),
            Self::DrumBlack => write!(f, "drum black"),
            Self::DrumYellow => write!(f, "drum yellow"),
            Self::DrumMagenta => write!(f, "drum magenta"),
            Self::DrumCyan => write!(f, "drum cyan"),
            Self::SecondaryBlack1 => write!(f, "black (secondary 1)"),
            Self::SecondaryBlack2 => write!(f, "black (secondary 2)"),
            Self::Other(index) => write!(f, "supply {}", index),
        }
    }
}

/// Merged readings for one supply.
///
/// A field is `None` when its walk had no row for this supply. Printer-MIB
/// uses negative levels and capacities as markers: -1 other, -2 unknown,
/// -3 "some remaining".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SupplyRecord {
    /// prtMarkerSuppliesLevel.
    pub level: Option<i32>,
    /// prtMarkerSuppliesMaxCapacity.
    pub max_capacity: Option<i32>,
    /// PrtMarkerSuppliesSupplyUnitTC code.
    pub unit: Option<i32>,
}

impl SupplyRecord {
    /// Remaining percentage, when level and capacity are both real quantities.
    pub fn percent(&self) -> Option<u8> {
        match (self.level, self.max_capacity) {
            (Some(level), Some(max)) if level >= 0 && max > 0 => {
                let pct = (i64::from(level) * 100 / i64::from(max)).min(100);
                Some(pct as u8)
            }
            _ => None,
        }
    }

    /// Name of the unit code, if known.
    pub fn unit_name(&self) -> Option<&'static str> {
        Some(match self.unit? {
            3 => "tenThousandthsOfInches",
            4 => "micrometers",
            7 => "impressions",
            8 => "sheets",
            11 => "hours",
            12 => "thousandthsOfOunces",
            13 => "tenthsOfGrams",
            14 => "hundrethsOfFluidOunces",
            15 => "tenthsOfMilliliters",
            16 => "feet",
            17 => "meters",
            18 => "items",
            19 => "percent",
            _ => return None,
        })
    }
}

/// The three supplies columns a record is merged from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplyColumn {
    /// prtMarkerSuppliesLevel (`.9`).
    Level,
    /// prtMarkerSuppliesMaxCapacity (`.8`).
    MaxCapacity,
    /// prtMarkerSuppliesSupplyUnit (`.7`).
    Unit,
}

impl SupplyColumn {
    /// Column OID.
    pub fn oid(self) -> Oid {
        Oid::from_slice(match self {
            Self::Level => LEVEL,
            Self::MaxCapacity => MAX_CAPACITY,
            Self::Unit => SUPPLY_UNIT,
        })
    }
}

/// Supplies of one printer, keyed by channel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Supplies {
    records: BTreeMap<SupplyChannel, SupplyRecord>,
}

impl Supplies {
    /// prtMarkerSuppliesLevel (1.3.6.1.2.1.43.11.1.1.9).
    pub fn level_oid() -> Oid {
        SupplyColumn::Level.oid()
    }

    /// prtMarkerSuppliesMaxCapacity (1.3.6.1.2.1.43.11.1.1.8).
    pub fn max_capacity_oid() -> Oid {
        SupplyColumn::MaxCapacity.oid()
    }

    /// prtMarkerSuppliesSupplyUnit (1.3.6.1.2.1.43.11.1.1.7).
    pub fn supply_unit_oid() -> Oid {
        SupplyColumn::Unit.oid()
    }

    /// Merge the results of walking the three columns.
    pub fn from_walks(levels: &[VarBind], capacities: &[VarBind], units: &[VarBind]) -> Self {
        let mut supplies = Self::default();
        for (column, walk) in [
            (SupplyColumn::Level, levels),
            (SupplyColumn::MaxCapacity, capacities),
            (SupplyColumn::Unit, units),
        ] {
            for vb in walk {
                supplies.insert(column, vb);
            }
        }
        supplies
    }

    /// Merge one walked binding.
    ///
    /// Bindings outside the column, or whose value is not an integer
    /// (such as an exception at the end of a walk), are skipped.
    pub fn insert(&mut self, column: SupplyColumn, vb: &VarBind) {
        let base = column.oid();
        let index = match vb.oid.last_arc() {
            Some(index) if vb.oid.starts_with(&base) && vb.oid.len() > base.len() => index,
            _ => {
                tracing::debug!(target: "snmp_mp::supplies", { oid = %vb.oid, column = ?column }, "binding outside supplies column");
                return;
            }
        };
        let Some(value) = vb.value.as_i32() else {
            tracing::debug!(target: "snmp_mp::supplies", { oid = %vb.oid, value = %vb.value }, "supplies value is not an integer");
            return;
        };

        let record = self
            .records
            .entry(SupplyChannel::from_index(index))
            .or_default();
        match column {
            SupplyColumn::Level => record.level = Some(value),
            SupplyColumn::MaxCapacity => record.max_capacity = Some(value),
            SupplyColumn::Unit => record.unit = Some(value),
        }
    }

    /// Record for a channel.
    pub fn get(&self, channel: SupplyChannel) -> Option<&SupplyRecord> {
        self.records.get(&channel)
    }

    /// Records in channel order.
    pub fn iter(&self) -> impl Iterator<Item = (SupplyChannel, &SupplyRecord)> {
        self.records.iter().map(|(c, r)| (*c, r))
    }

    /// Number of channels seen.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no channel was seen.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

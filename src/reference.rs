//! The fixed REGION and NATION reference tables.
//!
//! These never change with the scale factor or the seed; every run writes the
//! same 5 regions and 25 nations, and every nation points at one region.

use std::fmt;

use crate::serializer::TblRow;
use crate::table::Table;

/// The REGION table
///
/// ```text
/// 0|AFRICA|lar deposits. blithely final packages cajole.
/// 1|AMERICA|hs use ironic, even requests. s
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Primary key (0-4)
    pub r_regionkey: i64,
    pub r_name: &'static str,
    pub r_comment: &'static str,
}

impl Region {
    pub const fn new(r_regionkey: i64, r_name: &'static str, r_comment: &'static str) -> Self {
        Region {
            r_regionkey,
            r_name,
            r_comment,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.r_regionkey, self.r_name, self.r_comment)
    }
}

impl TblRow for Region {
    const TABLE: Table = Table::Region;
}

/// The NATION table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nation {
    /// Primary key (0-24)
    pub n_nationkey: i64,
    pub n_name: &'static str,
    /// Foreign key to REGION
    pub n_regionkey: i64,
    pub n_comment: &'static str,
}

impl Nation {
    pub const fn new(
        n_nationkey: i64,
        n_name: &'static str,
        n_regionkey: i64,
        n_comment: &'static str,
    ) -> Self {
        Nation {
            n_nationkey,
            n_name,
            n_regionkey,
            n_comment,
        }
    }
}

impl fmt::Display for Nation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}",
            self.n_nationkey, self.n_name, self.n_regionkey, self.n_comment
        )
    }
}

impl TblRow for Nation {
    const TABLE: Table = Table::Nation;
}

const REGIONS: [Region; 5] = [
    Region::new(0, "AFRICA", "lar deposits. blithely final packages cajole."),
    Region::new(1, "AMERICA", "hs use ironic, even requests. s"),
    Region::new(2, "ASIA", "ges. thinly even pinto beans ca"),
    Region::new(3, "EUROPE", "ly final courts cajole furiously final excuse"),
    Region::new(4, "MIDDLE EAST", "uickly special accounts cajole carefully blithely close requests. carefully final asymptotes haggle furiousl"),
];

const NATIONS: [Nation; 25] = [
    Nation::new(
        0,
        "ALGERIA",
        0,
        " final accounts. regular deposits wake slyly. ",
    ),
    Nation::new(
        1,
        "ARGENTINA",
        1,
        "al foxes promise slyly according to the regular accounts. bold requests alon",
    ),
    Nation::new(
        2,
        "BRAZIL",
        1,
        "y alongside of the pending deposits. carefully special packages are about the ironic forges. slyly special ",
    ),
    Nation::new(
        3,
        "CANADA",
        1,
        "eas hang ironic, silent packages. slyly regular packages are furiously over the tithes. fluffily bold",
    ),
    Nation::new(
        4,
        "EGYPT",
        4,
        "y above the carefully unusual theodolites. final dugouts are quickly across the furiously regular d",
    ),
    Nation::new(
        5,
        "ETHIOPIA",
        0,
        "ven packages wake quickly. regu",
    ),
    Nation::new(
        6,
        "FRANCE",
        3,
        "refully final requests. regular, ironi",
    ),
    Nation::new(
        7,
        "GERMANY",
        3,
        "l platelets. regular accounts x-ray: unusual, regular acco",
    ),
    Nation::new(
        8,
        "INDIA",
        2,
        "ss excuses cajole slyly across the packages. deposits print about the packages. furious",
    ),
    Nation::new(
        9,
        "INDONESIA",
        2,
        " slyly express asymptotes. regular deposits haggle slyly. carefully ironic hockey players sleep blithely. carefull",
    ),
    Nation::new(
        10,
        "IRAN",
        4,
        "efully alongside of the slyly final dependencies. ",
    ),
    Nation::new(
        11,
        "IRAQ",
        4,
        "nic deposits boost atop the quickly final requests? quickly regula",
    ),
    Nation::new(
        12,
        "JAPAN",
        2,
        "ously. final, express gifts cajole a",
    ),
    Nation::new(
        13,
        "JORDAN",
        4,
        "ic deposits are blithely about the carefully regular pa",
    ),
    Nation::new(
        14,
        "KENYA",
        0,
        " pending excuses haggle furiously deposits. pending, express pinto beans wake fluffily past t",
    ),
    Nation::new(
        15,
        "MOROCCO",
        0,
        "rns. blithely bold courts among the closely regular packages are furiously slyly",
    ),
    Nation::new(
        16,
        "MOZAMBIQUE",
        0,
        "s. ironic, unusual asymptotes wake blithely r",
    ),
    Nation::new(
        17,
        "PERU",
        1,
        "platelets. blithely pending dependencies use fluffily across the even pinto beans. carefully silent accoun",
    ),
    Nation::new(
        18,
        "CHINA",
        2,
        "c dependencies. furiously express notornis sleep slyly regular accounts. ideas sleep. depos",
    ),
    Nation::new(
        19,
        "ROMANIA",
        3,
        "ular asymptotes are about the furious multipliers. express dependencies nag above the ironically ironic account",
    ),
    Nation::new(
        20,
        "SAUDI ARABIA",
        4,
        "ts. silent, brazen instructions eat ironically with ironically ironic",
    ),
    Nation::new(
        21,
        "VIETNAM",
        2,
        "hely enticingly express accounts. even, final ",
    ),
    Nation::new(
        22,
        "RUSSIA",
        3,
        " requests against the platelets use never according to the quickly regular pint",
    ),
    Nation::new(
        23,
        "UNITED KINGDOM",
        3,
        "eans boost carefully special requests. accounts are. carefull",
    ),
    Nation::new(
        24,
        "UNITED STATES",
        1,
        "y final packages. slow foxes cajole quickly. quickly silent platelets breach ironic accounts. unusual pinto be",
    ),
];

/// All regions, ordered by key.
pub fn regions() -> &'static [Region] {
    &REGIONS
}

/// All nations, ordered by key.
pub fn nations() -> &'static [Nation] {
    &NATIONS
}

use bitflags::bitflags;
use itertools::Itertools;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Named quality filters. The discriminant is the filter's bit position and
/// also its position in the rendered FILTER column.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum VcfFilter {
    IndelConflict = 0,
    SiteConflict = 1,
    LowGQX = 2,
    HighDPFRatio = 3,
    HighSNVSB = 4,
    HighSNVHPOL = 5,
    HighRefRep = 6,
    HighDepth = 7,
    PhasingConflict = 8,
}

/// Number of registered filters
pub const N_FILTERS: usize = 9;

impl VcfFilter {
    /// Every filter in index order
    pub const ALL: [VcfFilter; N_FILTERS] = [
        VcfFilter::IndelConflict,
        VcfFilter::SiteConflict,
        VcfFilter::LowGQX,
        VcfFilter::HighDPFRatio,
        VcfFilter::HighSNVSB,
        VcfFilter::HighSNVHPOL,
        VcfFilter::HighRefRep,
        VcfFilter::HighDepth,
        VcfFilter::PhasingConflict,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    /// VCF FILTER id
    pub fn label(self) -> &'static str {
        LABELS[self.index()]
    }

    pub fn from_label(label: &str) -> Option<Self> {
        LABEL_LOOKUP.get(label).copied()
    }

    /// Single bit mask for this filter
    pub fn flag(self) -> FiltFlags {
        FiltFlags::from_bits_retain(1 << self.index())
    }
}

/// Label of the filter at `idx`. Panics on an index outside the registry.
pub fn label_of(idx: usize) -> &'static str {
    LABELS[idx]
}

static LABELS: [&str; N_FILTERS] = [
    "IndelConflict",
    "SiteConflict",
    "LowGQX",
    "HighDPFRatio",
    "HighSNVSB",
    "HighSNVHPOL",
    "HighRefRep",
    "HighDepth",
    "PhasingConflict",
];

lazy_static::lazy_static! {
    static ref LABEL_LOOKUP: HashMap<&'static str, VcfFilter> = VcfFilter::ALL
        .iter()
        .map(|f| (f.label(), *f))
        .collect();
}

impl fmt::Display for VcfFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for VcfFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VcfFilter::from_label(s).ok_or_else(|| format!("unknown filter '{}'", s))
    }
}

bitflags! {
    /// Failed filters of a locus. No bits set means PASS.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FiltFlags: u32 {
        const INDEL_CONFLICT   = 1 << 0;
        const SITE_CONFLICT    = 1 << 1;
        const LOW_GQX          = 1 << 2;
        const HIGH_DPF_RATIO   = 1 << 3;
        const HIGH_SNV_SB      = 1 << 4;
        const HIGH_SNV_HPOL    = 1 << 5;
        const HIGH_REF_REP     = 1 << 6;
        const HIGH_DEPTH       = 1 << 7;
        const PHASING_CONFLICT = 1 << 8;
    }
}

impl Default for FiltFlags {
    fn default() -> Self {
        FiltFlags::empty()
    }
}

impl FiltFlags {
    pub fn set_filter(&mut self, filt: VcfFilter) {
        self.insert(filt.flag());
    }

    pub fn test(&self, filt: VcfFilter) -> bool {
        self.contains(filt.flag())
    }

    /// Set filters in index order
    pub fn filters(&self) -> impl Iterator<Item = VcfFilter> + '_ {
        VcfFilter::ALL.iter().copied().filter(move |f| self.test(*f))
    }

    /// FILTER column value: `PASS` or the failed labels joined by `;`
    pub fn render(&self) -> String {
        if self.is_empty() {
            return "PASS".to_string();
        }
        self.filters().map(|f| f.label()).join(";")
    }
}

impl fmt::Display for FiltFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// serde helpers so upstream records can carry filters as a list of labels
pub mod serde_labels {
    use super::{FiltFlags, VcfFilter};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(flags: &FiltFlags, ser: S) -> Result<S::Ok, S::Error> {
        ser.collect_seq(flags.filters().map(|f| f.label()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<FiltFlags, D::Error> {
        let labels = Vec::<String>::deserialize(deserializer)?;
        let mut flags = FiltFlags::default();
        for label in labels {
            let filt = VcfFilter::from_label(&label)
                .ok_or_else(|| de::Error::custom(format!("unknown filter '{}'", label)))?;
            flags.set_filter(filt);
        }
        Ok(flags)
    }
}

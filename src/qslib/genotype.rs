use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const N_BASE: usize = 4;

#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Serialize, Deserialize)]
pub enum BaseId {
    A = 0,
    C = 1,
    G = 2,
    T = 3,
}

impl BaseId {
    pub const ALL: [BaseId; N_BASE] = [BaseId::A, BaseId::C, BaseId::G, BaseId::T];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(BaseId::A),
            'C' => Some(BaseId::C),
            'G' => Some(BaseId::G),
            'T' => Some(BaseId::T),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            BaseId::A => 'A',
            BaseId::C => 'C',
            BaseId::G => 'G',
            BaseId::T => 'T',
        }
    }
}

/// Unphased diploid SNV genotype over the four bases
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize)]
pub enum DiGt {
    #[default]
    AA,
    AC,
    AG,
    AT,
    CC,
    CG,
    CT,
    GG,
    GT,
    TT,
}

impl DiGt {
    pub const ALL: [DiGt; 10] = [
        DiGt::AA,
        DiGt::AC,
        DiGt::AG,
        DiGt::AT,
        DiGt::CC,
        DiGt::CG,
        DiGt::CT,
        DiGt::GG,
        DiGt::GT,
        DiGt::TT,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    /// The two alleles, lower base first
    pub fn alleles(self) -> (BaseId, BaseId) {
        use BaseId::*;
        match self {
            DiGt::AA => (A, A),
            DiGt::AC => (A, C),
            DiGt::AG => (A, G),
            DiGt::AT => (A, T),
            DiGt::CC => (C, C),
            DiGt::CG => (C, G),
            DiGt::CT => (C, T),
            DiGt::GG => (G, G),
            DiGt::GT => (G, T),
            DiGt::TT => (T, T),
        }
    }

    /// Does this genotype carry `base` as one of its alleles
    pub fn expect2(self, base: BaseId) -> bool {
        let (a, b) = self.alleles();
        a == base || b == base
    }

    pub fn is_het(self) -> bool {
        let (a, b) = self.alleles();
        a != b
    }

    /// VCF GT string relative to the reference base
    pub fn vcf_gt(self, ref_base: BaseId) -> &'static str {
        let (a, b) = self.alleles();
        match ((a == ref_base) as u8 + (b == ref_base) as u8, self.is_het()) {
            (2, _) => "0/0",
            (1, _) => "0/1",
            (_, false) => "1/1",
            (_, true) => "1/2",
        }
    }

    pub fn label(self) -> String {
        let (a, b) = self.alleles();
        format!("{}{}", a.to_char(), b.to_char())
    }
}

impl fmt::Display for DiGt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for DiGt {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bases = s.chars().map(BaseId::from_char);
        match (bases.next(), bases.next(), bases.next()) {
            (Some(Some(x)), Some(Some(y)), None) => {
                let (lo, hi) = if x <= y { (x, y) } else { (y, x) };
                DiGt::ALL
                    .iter()
                    .copied()
                    .find(|g| g.alleles() == (lo, hi))
                    .ok_or_else(|| format!("bad genotype '{}'", s))
            }
            _ => Err(format!("bad genotype '{}'", s)),
        }
    }
}

/// Diploid indel genotype
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndelGt {
    #[default]
    NoIndel,
    Hom,
    Het,
}

impl IndelGt {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            IndelGt::NoIndel => "ref",
            IndelGt::Hom => "hom",
            IndelGt::Het => "het",
        }
    }

    pub fn vcf_gt(self) -> &'static str {
        match self {
            IndelGt::NoIndel => "0/0",
            IndelGt::Hom => "1/1",
            IndelGt::Het => "0/1",
        }
    }
}

impl fmt::Display for IndelGt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expect2_het_and_hom() {
        assert!(DiGt::AC.expect2(BaseId::A));
        assert!(DiGt::AC.expect2(BaseId::C));
        assert!(!DiGt::AC.expect2(BaseId::G));
        assert!(DiGt::TT.expect2(BaseId::T));
        assert!(!DiGt::TT.expect2(BaseId::A));
    }

    #[test]
    fn vcf_gt_against_ref() {
        assert_eq!(DiGt::AA.vcf_gt(BaseId::A), "0/0");
        assert_eq!(DiGt::AG.vcf_gt(BaseId::A), "0/1");
        assert_eq!(DiGt::GG.vcf_gt(BaseId::A), "1/1");
        assert_eq!(DiGt::CG.vcf_gt(BaseId::A), "1/2");
    }

    #[test]
    fn parse_labels() {
        assert_eq!("CA".parse::<DiGt>(), Ok(DiGt::AC));
        assert_eq!("tt".parse::<DiGt>(), Ok(DiGt::TT));
        assert!("ACG".parse::<DiGt>().is_err());
        assert!("AN".parse::<DiGt>().is_err());
        for g in DiGt::ALL {
            assert_eq!(g.label().parse::<DiGt>(), Ok(g));
            assert_eq!(DiGt::from_index(g.index()), Some(g));
        }
    }

    #[test]
    fn indel_gt_serde() {
        let g: IndelGt = serde_json::from_str("\"het\"").unwrap();
        assert_eq!(g, IndelGt::Het);
        assert_eq!(serde_json::to_string(&IndelGt::NoIndel).unwrap(), "\"noindel\"");
    }
}

use crate::qslib::{
    BaseId, DiGt, FiltFlags, IndelGt, IndelModifiers, ModifiedSiteGt, SiteModifiers, VcfFilter,
    N_BASE,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mapping-quality and rank-sum statistics computed upstream of this crate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadStats {
    pub mq: f64,
    pub read_pos_rank_sum: f64,
    pub base_q_rank_sum: f64,
    pub mq_rank_sum: f64,
}

/// Best genotype under one prior
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenotypeCall {
    pub snp_qphred: i32,
    pub max_gt: DiGt,
    pub max_gt_qphred: i32,
}

/// SNV genotype likelihood summary (`dgt`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteGenotype {
    pub ref_gt: BaseId,
    /// Strand bias
    #[serde(default)]
    pub sb: f64,
    /// Call under the genome-wide prior
    #[serde(default)]
    pub genome: GenotypeCall,
    /// Call under the polymorphic-site prior
    #[serde(default)]
    pub poly: GenotypeCall,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteInfo {
    /// zero-based
    pub pos: u64,
    pub dgt: SiteGenotype,
    #[serde(default)]
    pub n_used_calls: u32,
    #[serde(default)]
    pub n_unused_calls: u32,
    /// Observed basecalls indexed by `BaseId`
    #[serde(default)]
    pub known_counts: [u32; N_BASE],
    /// Homopolymer length
    #[serde(default)]
    pub hpol: u32,
    #[serde(default)]
    pub stats: ReadStats,
    /// Mean read position of alt allele observations
    #[serde(default)]
    pub raw_pos: f64,
    /// Mean basecall quality of alt allele observations
    #[serde(default)]
    pub avg_base_q: f64,
    #[serde(default)]
    pub smod: SiteModifiers,
}

impl SiteInfo {
    pub fn new(pos: u64, dgt: SiteGenotype) -> Self {
        Self {
            pos,
            dgt,
            n_used_calls: 0,
            n_unused_calls: 0,
            known_counts: [0; N_BASE],
            hpol: 0,
            stats: ReadStats::default(),
            raw_pos: 0.0,
            avg_base_q: 0.0,
            smod: SiteModifiers::default(),
        }
    }

    pub fn count_of(&self, base: BaseId) -> u32 {
        self.known_counts[base.index()]
    }

    /// Fill gq, gqx and max_gt from the two genotype calls.
    ///
    /// Site gq/gqx normally arrive with the record from upstream and the
    /// features run keeps them as given; callers holding only the
    /// likelihood block use this to derive them.
    pub fn set_genotype_quality(&mut self) {
        let genome = &self.dgt.genome;
        let poly = &self.dgt.poly;
        self.smod.shared.gqx = if genome.max_gt != poly.max_gt || !self.smod.is_covered {
            0
        } else {
            poly.max_gt_qphred.min(genome.max_gt_qphred)
        };
        self.smod.shared.max_gt = poly.max_gt;
        self.smod.shared.gq = poly.max_gt_qphred;
    }

    /// VCF GT value
    pub fn get_gt(&self) -> &'static str {
        match self.smod.modified_gt {
            ModifiedSiteGt::None => {
                if self.smod.is_unknown || !self.smod.is_used_covered {
                    "."
                } else {
                    self.smod.shared.max_gt.vcf_gt(self.dgt.ref_gt)
                }
            }
            m => m.label(),
        }
    }
}

impl fmt::Display for SiteInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pos: {} {}", self.pos + 1, self.get_gt())
    }
}

/// Indel genotype likelihood summary (`dindel`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndelGenotype {
    pub indel_qphred: i32,
    /// Call under the genome-wide prior
    pub max_gt: IndelGt,
    pub max_gt_qphred: i32,
    /// Call under the polymorphic-site prior
    pub max_gt_poly: IndelGt,
    pub max_gt_poly_qphred: i32,
    pub is_zero_coverage: bool,
}

/// Repeat context of the indel (`iri`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndelRepeatInfo {
    pub ref_repeat_count: u32,
    pub indel_repeat_count: u32,
    pub repeat_unit: String,
}

/// Read support for the indel (`isri`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndelSampleReadInfo {
    pub depth: u32,
    pub n_q30_ref_reads: u32,
    pub n_q30_indel_reads: u32,
    pub n_q30_alt_reads: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndelInfo {
    /// zero-based
    pub pos: u64,
    #[serde(default)]
    pub dindel: IndelGenotype,
    #[serde(default)]
    pub iri: IndelRepeatInfo,
    #[serde(default)]
    pub isri: IndelSampleReadInfo,
    /// Carried for the caller; indel features do not read these yet
    #[serde(default)]
    pub stats: ReadStats,
    #[serde(default)]
    pub imod: IndelModifiers,
}

impl IndelInfo {
    /// Fill gq, gqx and max_gt from the two genotype calls
    pub fn set_genotype_quality(&mut self) {
        let dindel = &self.dindel;
        self.imod.shared.gqx = if dindel.max_gt != dindel.max_gt_poly || dindel.is_zero_coverage {
            0
        } else {
            dindel.max_gt_poly_qphred.min(dindel.max_gt_qphred)
        };
        self.imod.shared.max_gt = dindel.max_gt_poly;
        self.imod.shared.gq = dindel.max_gt_poly_qphred;
    }

    pub fn get_gt(&self) -> &'static str {
        self.imod.shared.max_gt.vcf_gt()
    }
}

impl fmt::Display for IndelInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pos: {} {} {}", self.pos + 1, self.get_gt(), self.imod)
    }
}

/// Either kind of locus, for code that handles both
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Locus {
    Site(SiteInfo),
    Indel(IndelInfo),
}

impl Locus {
    pub fn pos(&self) -> u64 {
        match self {
            Locus::Site(s) => s.pos,
            Locus::Indel(i) => i.pos,
        }
    }

    pub fn filters(&self) -> FiltFlags {
        match self {
            Locus::Site(s) => s.smod.shared.filters,
            Locus::Indel(i) => i.imod.shared.filters,
        }
    }

    pub fn set_filter(&mut self, filt: VcfFilter) {
        match self {
            Locus::Site(s) => s.smod.shared.set_filter(filt),
            Locus::Indel(i) => i.imod.shared.set_filter(filt),
        }
    }

    pub fn render_filters(&self) -> String {
        self.filters().render()
    }

    pub fn get_gt(&self) -> &'static str {
        match self {
            Locus::Site(s) => s.get_gt(),
            Locus::Indel(i) => i.get_gt(),
        }
    }
}

/// A locus together with the chromosome it sits on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocusRecord {
    pub chrom: String,
    #[serde(flatten)]
    pub locus: Locus,
}

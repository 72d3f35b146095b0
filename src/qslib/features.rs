//! Depth-normalized feature vectors for empirical quality recalibration.
//!
//! Every normalized feature divides a raw value by the mean depth of the
//! locus' chromosome. A zero depth is outside the contract: the result holds
//! infinities or NaN and nothing here checks for it.
use crate::qslib::{BaseId, IndelInfo, Locus, SiteInfo};
use std::collections::BTreeMap;

/// Feature name -> value. Names are read by the recalibration model and
/// must not change.
pub type FeatureMap = BTreeMap<&'static str, f64>;

/// Feature names
pub mod names {
    pub const QUAL: &str = "QUAL";
    pub const F_GQX: &str = "F_GQX";
    pub const F_GQ: &str = "F_GQ";
    pub const I_SNVSB: &str = "I_SNVSB";
    pub const I_SNVHPOL: &str = "I_SNVHPOL";
    pub const F_DP: &str = "F_DP";
    pub const F_DPF: &str = "F_DPF";
    pub const AD0: &str = "AD0";
    pub const AD1: &str = "AD1";
    pub const AD2: &str = "AD2";
    pub const I_MQ: &str = "I_MQ";
    pub const I_READ_POS_RANK_SUM: &str = "I_ReadPosRankSum";
    pub const I_BASE_Q_RANK_SUM: &str = "I_BaseQRankSum";
    pub const I_MQ_RANK_SUM: &str = "I_MQRankSum";
    pub const I_RAW_POS: &str = "I_RawPos";
    pub const I_RAW_BASE_Q: &str = "I_RawBaseQ";
    pub const VF_STAR: &str = "VFStar";
    pub const DP: &str = "DP";
    pub const DPF: &str = "DPF";
    pub const REFREP1: &str = "REFREP1";
    pub const IDREP1: &str = "IDREP1";
    pub const RULEN1: &str = "RULEN1";
    pub const F_DPI: &str = "F_DPI";
}

use names::*;

pub trait QscoreFeatures {
    /// Compute the feature vector given the chromosome's mean depth
    fn qscore_features(&mut self, chrom_depth: f64) -> FeatureMap;
}

impl SiteInfo {
    pub fn site_features(&self, chrom_depth: f64) -> FeatureMap {
        let mut res = FeatureMap::new();
        let smod = &self.smod.shared;

        res.insert(QUAL, self.dgt.genome.snp_qphred as f64 / chrom_depth);
        res.insert(F_GQX, smod.gqx as f64 / chrom_depth);
        res.insert(F_GQ, smod.gq as f64 / chrom_depth);
        res.insert(I_SNVSB, self.dgt.sb);
        res.insert(I_SNVHPOL, self.hpol as f64);

        // TODO: DP scaling is too coarse at very high depth
        res.insert(F_DP, self.n_used_calls as f64 / chrom_depth);
        res.insert(F_DPF, self.n_unused_calls as f64 / chrom_depth);
        res.insert(AD0, self.count_of(self.dgt.ref_gt) as f64 / chrom_depth);
        res.insert(AD1, 0.0);

        res.insert(I_MQ, self.stats.mq);
        res.insert(I_READ_POS_RANK_SUM, self.stats.read_pos_rank_sum);
        res.insert(I_BASE_Q_RANK_SUM, self.stats.base_q_rank_sum);
        res.insert(I_MQ_RANK_SUM, self.stats.mq_rank_sum);
        res.insert(I_RAW_POS, self.raw_pos);
        res.insert(I_RAW_BASE_Q, self.avg_base_q);

        // last compatible alt base wins
        for base in BaseId::ALL {
            if base == self.dgt.ref_gt {
                continue;
            }
            if smod.max_gt.expect2(base) {
                res.insert(AD1, self.count_of(base) as f64 / chrom_depth);
            }
        }

        let ad1 = res[AD1];
        let vf_star = if res[F_DP] + res[F_DPF] > 0.0 {
            // DP and DPF are never filled in; the lookup leaves them at 0.0
            let dp = *res.entry(DP).or_insert(0.0);
            let dpf = *res.entry(DPF).or_insert(0.0);
            ad1 / (dp + dpf)
        } else {
            ad1 / chrom_depth
        };
        res.insert(VF_STAR, vf_star);
        res
    }
}

impl QscoreFeatures for SiteInfo {
    fn qscore_features(&mut self, chrom_depth: f64) -> FeatureMap {
        self.site_features(chrom_depth)
    }
}

impl QscoreFeatures for IndelInfo {
    /// Also sets gq, gqx and max_gt on the indel modifiers
    fn qscore_features(&mut self, chrom_depth: f64) -> FeatureMap {
        self.set_genotype_quality();

        let mut res = FeatureMap::new();
        let imod = &self.imod.shared;
        res.insert(QUAL, self.dindel.indel_qphred as f64 / chrom_depth);
        res.insert(F_GQX, imod.gqx as f64 / chrom_depth);
        res.insert(F_GQ, imod.gq as f64 / chrom_depth);

        // repeat context is not depth-normalized
        res.insert(REFREP1, self.iri.ref_repeat_count as f64);
        res.insert(IDREP1, self.iri.indel_repeat_count as f64);
        res.insert(RULEN1, self.iri.repeat_unit.len() as f64);

        // overlapping SNV calls add no second repeat feature set

        res.insert(AD0, self.isri.n_q30_ref_reads as f64 / chrom_depth);
        res.insert(AD1, self.isri.n_q30_indel_reads as f64 / chrom_depth);
        res.insert(AD2, self.isri.n_q30_alt_reads as f64 / chrom_depth);
        res.insert(F_DPI, self.isri.depth as f64 / chrom_depth);
        res
    }
}

impl QscoreFeatures for Locus {
    fn qscore_features(&mut self, chrom_depth: f64) -> FeatureMap {
        match self {
            Locus::Site(s) => s.qscore_features(chrom_depth),
            Locus::Indel(i) => i.qscore_features(chrom_depth),
        }
    }
}

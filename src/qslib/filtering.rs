use crate::qslib::{FilterParams, IndelInfo, Locus, SiteInfo, VcfFilter};

/// Set filter bits from thresholds. `max_depth` is None when no depth
/// filter is active for the locus' chromosome.
pub trait ApplyFilters {
    fn apply_filters(&mut self, params: &FilterParams, max_depth: Option<f64>);
}

impl ApplyFilters for SiteInfo {
    fn apply_filters(&mut self, params: &FilterParams, max_depth: Option<f64>) {
        let smod = &mut self.smod.shared;
        if smod.gqx < params.min_gqx {
            smod.set_filter(VcfFilter::LowGQX);
        }

        if let Some(max_depth) = max_depth {
            if self.n_used_calls as f64 > max_depth {
                smod.set_filter(VcfFilter::HighDepth);
            }
        }

        let total = self.n_used_calls + self.n_unused_calls;
        if total > 0 && (self.n_unused_calls as f64 / total as f64) > params.max_base_filt {
            smod.set_filter(VcfFilter::HighDPFRatio);
        }

        if self.dgt.sb > params.max_snv_sb {
            smod.set_filter(VcfFilter::HighSNVSB);
        }

        if self.hpol > params.max_snv_hpol {
            smod.set_filter(VcfFilter::HighSNVHPOL);
        }
    }
}

impl ApplyFilters for IndelInfo {
    /// gq/gqx are derived from `dindel` before LowGQX is tested
    fn apply_filters(&mut self, params: &FilterParams, max_depth: Option<f64>) {
        self.set_genotype_quality();
        let imod = &mut self.imod.shared;
        if imod.gqx < params.min_gqx {
            imod.set_filter(VcfFilter::LowGQX);
        }

        if let Some(max_depth) = max_depth {
            if self.isri.depth as f64 > max_depth {
                imod.set_filter(VcfFilter::HighDepth);
            }
        }

        if self.iri.ref_repeat_count > params.max_ref_rep {
            imod.set_filter(VcfFilter::HighRefRep);
        }
    }
}

impl ApplyFilters for Locus {
    fn apply_filters(&mut self, params: &FilterParams, max_depth: Option<f64>) {
        match self {
            Locus::Site(s) => s.apply_filters(params, max_depth),
            Locus::Indel(i) => i.apply_filters(params, max_depth),
        }
    }
}

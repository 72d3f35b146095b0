mod chromdepth;
pub use crate::qslib::chromdepth::ChromDepthMap;

mod cli;
pub use crate::qslib::cli::{Cli, Commands, FeatArgs, FilterParams, HeaderArgs, IOParams, QscoreParams};

mod features;
pub use crate::qslib::features::{names, FeatureMap, QscoreFeatures};

mod filtering;
pub use crate::qslib::filtering::ApplyFilters;

mod filters;
pub use crate::qslib::filters::{label_of, serde_labels, FiltFlags, VcfFilter, N_FILTERS};

mod genotype;
pub use crate::qslib::genotype::{BaseId, DiGt, IndelGt, N_BASE};

mod locus;
pub use crate::qslib::locus::{
    GenotypeCall, IndelGenotype, IndelInfo, IndelRepeatInfo, IndelSampleReadInfo, Locus,
    LocusRecord, ReadStats, SiteGenotype, SiteInfo,
};

mod modifiers;
pub use crate::qslib::modifiers::{IndelModifiers, ModifiedSiteGt, SharedModifiers, SiteModifiers};

mod runner;
pub use crate::qslib::runner::{features_main, featurize, process_stream, FeatureRow, RunOptions, RunSummary};

mod vcfheader;
pub use crate::qslib::vcfheader::{
    filter_description, vcf_col_label, write_depth_header_info, write_vcf_filter, SampleType,
    VcfHeaderWriter, VCF_VERSION,
};

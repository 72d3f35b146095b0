#[macro_use]
extern crate log;

mod qslib;
pub use self::{
    qslib::features_main, qslib::featurize, qslib::filter_description, qslib::label_of,
    qslib::names, qslib::process_stream, qslib::serde_labels, qslib::vcf_col_label,
    qslib::write_depth_header_info, qslib::write_vcf_filter, qslib::ApplyFilters, qslib::BaseId,
    qslib::ChromDepthMap, qslib::Cli, qslib::Commands, qslib::DiGt, qslib::FeatArgs,
    qslib::FeatureMap, qslib::FeatureRow, qslib::FiltFlags, qslib::FilterParams,
    qslib::GenotypeCall, qslib::HeaderArgs, qslib::IOParams, qslib::IndelGenotype,
    qslib::IndelGt, qslib::IndelInfo, qslib::IndelModifiers, qslib::IndelRepeatInfo,
    qslib::IndelSampleReadInfo, qslib::Locus, qslib::LocusRecord, qslib::ModifiedSiteGt,
    qslib::QscoreFeatures, qslib::QscoreParams, qslib::ReadStats, qslib::RunOptions,
    qslib::RunSummary, qslib::SampleType, qslib::SharedModifiers, qslib::SiteGenotype,
    qslib::SiteInfo, qslib::SiteModifiers, qslib::VcfFilter, qslib::VcfHeaderWriter,
    qslib::N_BASE, qslib::N_FILTERS, qslib::VCF_VERSION,
};

use crate::qslib::SampleType;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser, Clone, Debug)]
#[command(name = "qscore")]
#[command(about = "Locus quality features and VCF filter annotation")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

pub trait QscoreParams: std::fmt::Debug {
    fn validate(&self) -> bool;
    fn debug(&self) -> bool;
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(about = "Write the VCF header")]
    Header(HeaderArgs),

    #[command(about = "Compute recalibration features for loci")]
    Features(FeatArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct HeaderArgs {
    /// Tab-delimited chromosome mean depths (enables HighDepth)
    #[arg(short, long, help_heading = "I/O")]
    pub chrom_depth: Option<PathBuf>,

    /// Output header (default stdout)
    #[arg(short, long, help_heading = "I/O")]
    pub out: Option<PathBuf>,

    /// Sample columns, in order
    #[arg(
        long,
        value_enum,
        value_delimiter = ',',
        default_values_t = [SampleType::Proband, SampleType::Parent, SampleType::Parent],
        help_heading = "I/O"
    )]
    pub samples: Vec<SampleType>,

    /// Verbose logging
    #[arg(long, default_value_t = false, help_heading = "I/O")]
    pub debug: bool,

    #[command(flatten)]
    pub filt: FilterParams,
}

impl QscoreParams for HeaderArgs {
    fn debug(&self) -> bool {
        self.debug
    }

    fn validate(&self) -> bool {
        let mut is_ok = true;

        if let Some(path) = &self.chrom_depth {
            is_ok &= validate_file(path, "--chrom-depth");
        }

        if self.samples.is_empty() {
            error!("--samples must name at least one sample");
            is_ok = false;
        }

        is_ok &= self.filt.validate();
        is_ok
    }
}

#[derive(Parser, Debug, Clone)]
pub struct FeatArgs {
    #[command(flatten)]
    pub io: IOParams,

    #[command(flatten)]
    pub filt: FilterParams,
}

#[derive(clap::Args, Clone, Debug)]
pub struct IOParams {
    /// Loci to featurize (JSON lines)
    #[arg(short, long, help_heading = "I/O")]
    pub input: PathBuf,

    /// Tab-delimited chromosome mean depths
    #[arg(short, long, help_heading = "I/O")]
    pub chrom_depth: PathBuf,

    /// Output features (JSON lines, default stdout)
    #[arg(short, long, help_heading = "I/O")]
    pub out: Option<PathBuf>,

    /// Number of threads
    #[arg(short, long, default_value_t = 1, help_heading = "I/O")]
    pub threads: usize,

    /// Loci per work unit
    #[arg(long, default_value_t = 1000, help_heading = "I/O")]
    pub chunk_size: usize,

    /// Evaluate filters before computing features
    #[arg(long, default_value_t = false, help_heading = "I/O")]
    pub apply_filters: bool,

    /// Verbose logging
    #[arg(long, default_value_t = false, help_heading = "I/O")]
    pub debug: bool,
}

#[derive(clap::Args, Clone, Debug)]
pub struct FilterParams {
    /// Minimum locus GQX
    #[arg(long, default_value_t = 30, help_heading = "Filters")]
    pub min_gqx: i32,

    /// Maximum SNV strand bias
    #[arg(long, default_value_t = 10.0, help_heading = "Filters")]
    pub max_snv_sb: f64,

    /// Maximum SNV contextual homopolymer length
    #[arg(long, default_value_t = 6, help_heading = "Filters")]
    pub max_snv_hpol: u32,

    /// Maximum reference repeat count of an indel's repeat track
    #[arg(long, default_value_t = 8, help_heading = "Filters")]
    pub max_ref_rep: u32,

    /// Maximum fraction of filtered basecalls at a site
    #[arg(long, default_value_t = 0.4, help_heading = "Filters")]
    pub max_base_filt: f64,

    /// HighDepth when locus depth exceeds this multiple of the chromosome mean
    #[arg(long, default_value_t = 3.0, help_heading = "Filters")]
    pub max_depth_factor: f64,

    /// Germline SNV heterozygosity prior
    #[arg(long, default_value_t = 0.001, help_heading = "Filters")]
    pub snv_theta: f64,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            min_gqx: 30,
            max_snv_sb: 10.0,
            max_snv_hpol: 6,
            max_ref_rep: 8,
            max_base_filt: 0.4,
            max_depth_factor: 3.0,
            snv_theta: 0.001,
        }
    }
}

impl FilterParams {
    pub fn validate(&self) -> bool {
        let mut is_ok = true;

        if self.min_gqx < 0 {
            error!("--min-gqx must be at least 0");
            is_ok = false;
        }

        if self.max_base_filt < 0.0 || self.max_base_filt > 1.0 {
            error!("--max-base-filt must be between 0.0 and 1.0");
            is_ok = false;
        }

        if self.max_depth_factor <= 0.0 {
            error!("--max-depth-factor must be positive");
            is_ok = false;
        }

        if self.snv_theta <= 0.0 || self.snv_theta >= 1.0 {
            error!("--snv-theta must be between 0.0 and 1.0");
            is_ok = false;
        }

        if self.max_snv_hpol < 2 {
            warn!("--max-snv-hpol below 2 filters most SNVs");
        }

        is_ok
    }
}

impl QscoreParams for FeatArgs {
    fn debug(&self) -> bool {
        self.io.debug
    }

    fn validate(&self) -> bool {
        let mut is_ok = true;

        is_ok &= validate_file(&self.io.input, "--input");
        is_ok &= validate_file(&self.io.chrom_depth, "--chrom-depth");

        if self.io.threads < 1 {
            error!("--threads must be at least 1");
            is_ok = false;
        }

        if self.io.chunk_size < 1 {
            error!("--chunk-size must be at least 1");
            is_ok = false;
        }

        is_ok &= self.filt.validate();
        is_ok
    }
}

/// Helper function to validate a file's existence and type
fn validate_file(path: &Path, label: &str) -> bool {
    if !path.exists() {
        error!("{} does not exist", label);
        return false;
    }
    if !path.is_file() {
        error!("{} is not a file", label);
        return false;
    }
    true
}

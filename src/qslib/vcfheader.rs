use crate::qslib::{ChromDepthMap, FilterParams, VcfFilter};
use std::fmt;
use std::io::{self, Write};

pub const VCF_VERSION: &str = "VCFv4.1";

/// Sample roles, in the labels used for the VCF sample columns
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, clap::ValueEnum)]
pub enum SampleType {
    Proband,
    Parent,
    Sibling,
}

impl SampleType {
    pub fn label(self) -> &'static str {
        match self {
            SampleType::Proband => "PROBAND",
            SampleType::Parent => "PARENT",
            SampleType::Sibling => "SIBLING",
        }
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The fixed VCF columns through INFO
pub fn vcf_col_label() -> &'static str {
    "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO"
}

pub fn write_vcf_filter<W: Write>(os: &mut W, id: &str, description: &str) -> io::Result<()> {
    writeln!(os, "##FILTER=<ID={},Description=\"{}\">", id, description)
}

/// Human readable description of a filter under the given thresholds
pub fn filter_description(filt: VcfFilter, params: &FilterParams) -> String {
    match filt {
        VcfFilter::IndelConflict => "Locus is in region with conflicting indel calls".to_string(),
        VcfFilter::SiteConflict => "Site genotype conflicts with proximal indel call. \
            This is typically a heterozygous SNV call made inside of a heterozygous deletion"
            .to_string(),
        VcfFilter::LowGQX => format!(
            "Locus GQX is less than {} or not present",
            params.min_gqx
        ),
        VcfFilter::HighDPFRatio => format!(
            "The fraction of basecalls filtered out at a site is greater than {}",
            params.max_base_filt
        ),
        VcfFilter::HighSNVSB => format!(
            "SNV strand bias value (SNVSB) exceeds {}",
            params.max_snv_sb
        ),
        VcfFilter::HighSNVHPOL => format!(
            "SNV contextual homopolymer length (SNVHPOL) exceeds {}",
            params.max_snv_hpol
        ),
        VcfFilter::HighRefRep => format!(
            "Locus contains an indel allele occurring in a homopolymer or dinucleotide track \
            with a reference repeat greater than {}",
            params.max_ref_rep
        ),
        VcfFilter::HighDepth => format!(
            "Locus depth is greater than {}x the mean chromosome depth in the normal sample",
            params.max_depth_factor
        ),
        VcfFilter::PhasingConflict => {
            "Locus read evidence displays unbalanced phasing patterns".to_string()
        }
    }
}

/// HighDepth filter and the per-chromosome depth thresholds. Writes nothing
/// when there are no chromosome depths.
pub fn write_depth_header_info<W: Write>(
    os: &mut W,
    params: &FilterParams,
    chrom_depth: Option<&ChromDepthMap>,
) -> io::Result<()> {
    let chrom_depth = match chrom_depth {
        Some(m) if !m.is_empty() => m,
        _ => return Ok(()),
    };

    write_vcf_filter(
        os,
        VcfFilter::HighDepth.label(),
        &filter_description(VcfFilter::HighDepth, params),
    )?;
    for (chrom, depth) in chrom_depth.iter() {
        writeln!(
            os,
            "##MaxDepth_{}={:.2}",
            chrom,
            params.max_depth_factor * depth
        )?;
    }
    Ok(())
}

/// Writes a complete header for the de novo small variant VCF
pub struct VcfHeaderWriter<'a> {
    pub params: &'a FilterParams,
    pub chrom_depth: Option<&'a ChromDepthMap>,
    pub samples: &'a [SampleType],
    pub cmdline: &'a str,
}

impl VcfHeaderWriter<'_> {
    pub fn write<W: Write>(&self, os: &mut W) -> io::Result<()> {
        // audit
        writeln!(os, "##fileformat={}", VCF_VERSION)?;
        writeln!(os, "##source={}", env!("CARGO_PKG_NAME"))?;
        writeln!(os, "##source_version={}", env!("CARGO_PKG_VERSION"))?;
        writeln!(os, "##cmdline={}", self.cmdline)?;

        writeln!(os, "##content=de novo small variant calls")?;
        writeln!(os, "##germlineSnvTheta={}", self.params.snv_theta)?;

        writeln!(
            os,
            "##INFO=<ID=DP,Number=1,Type=Integer,Description=\"Combined depth across samples\">"
        )?;
        writeln!(
            os,
            "##INFO=<ID=MQ,Number=1,Type=Float,Description=\"RMS Mapping Quality\">"
        )?;
        writeln!(
            os,
            "##INFO=<ID=MQ0,Number=1,Type=Integer,Description=\"Number of MAPQ == 0 reads covering this record\">"
        )?;

        writeln!(
            os,
            "##FORMAT=<ID=DP,Number=1,Type=Integer,Description=\"Read depth\">"
        )?;

        for filt in VcfFilter::ALL {
            if filt == VcfFilter::HighDepth {
                continue;
            }
            write_vcf_filter(os, filt.label(), &filter_description(filt, self.params))?;
        }
        write_depth_header_info(os, self.params, self.chrom_depth)?;

        write!(os, "{}\tFORMAT", vcf_col_label())?;
        for sample in self.samples {
            write!(os, "\t{}", sample.label())?;
        }
        writeln!(os)
    }
}

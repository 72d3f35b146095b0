use crate::qslib::{serde_labels, DiGt, FiltFlags, IndelGt, VcfFilter};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Call decorations common to site and indel loci. `G` is the genotype
/// type of the locus kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "G: Deserialize<'de> + Default"))]
pub struct SharedModifiers<G> {
    #[serde(default, with = "serde_labels")]
    pub filters: FiltFlags,
    #[serde(default)]
    pub gq: i32,
    #[serde(default)]
    pub gqx: i32,
    #[serde(default)]
    pub max_gt: G,
}

impl<G> SharedModifiers<G> {
    pub fn set_filter(&mut self, filt: VcfFilter) {
        self.filters.set_filter(filt);
    }

    pub fn render_filters(&self) -> String {
        self.filters.render()
    }
}

impl<G: fmt::Display> fmt::Display for SharedModifiers<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "gqx: {} gq: {} max_gt: {} filters: {}",
            self.gqx, self.gq, self.max_gt, self.filters
        )
    }
}

/// Haploid/forced genotype replacing the diploid call at a site
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifiedSiteGt {
    #[default]
    None,
    Unknown,
    Zero,
    One,
}

impl ModifiedSiteGt {
    pub fn label(self) -> &'static str {
        match self {
            ModifiedSiteGt::None => "",
            ModifiedSiteGt::Unknown => ".",
            ModifiedSiteGt::Zero => "0",
            ModifiedSiteGt::One => "1",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteModifiers {
    #[serde(flatten)]
    pub shared: SharedModifiers<DiGt>,
    #[serde(default)]
    pub is_unknown: bool,
    #[serde(default)]
    pub is_covered: bool,
    #[serde(default)]
    pub is_used_covered: bool,
    #[serde(default)]
    pub is_zero_ploidy: bool,
    #[serde(default)]
    pub is_block: bool,
    #[serde(default)]
    pub modified_gt: ModifiedSiteGt,
}

impl fmt::Display for SiteModifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.shared)?;
        write!(
            f,
            "is_unknown: {} is_covered: {} is_used_coverage: {} is_zero_ploidy: {} is_block: {}",
            self.is_unknown as u8,
            self.is_covered as u8,
            self.is_used_covered as u8,
            self.is_zero_ploidy as u8,
            self.is_block as u8
        )?;
        if self.modified_gt != ModifiedSiteGt::None {
            write!(f, " modgt: {}", self.modified_gt.label())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndelModifiers {
    #[serde(flatten)]
    pub shared: SharedModifiers<IndelGt>,
    /// An SNV call shares this position
    #[serde(default)]
    pub is_overlap: bool,
}

impl fmt::Display for IndelModifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is_overlap: {}", self.shared, self.is_overlap as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_display() {
        let mut m = SharedModifiers::<DiGt> {
            gq: 25,
            gqx: 20,
            max_gt: DiGt::AG,
            ..Default::default()
        };
        assert_eq!(m.to_string(), "gqx: 20 gq: 25 max_gt: AG filters: PASS");
        m.set_filter(VcfFilter::HighSNVSB);
        m.set_filter(VcfFilter::LowGQX);
        assert_eq!(m.render_filters(), "LowGQX;HighSNVSB");
    }

    #[test]
    fn site_display_shows_modgt() {
        let m = SiteModifiers {
            is_covered: true,
            modified_gt: ModifiedSiteGt::Zero,
            ..Default::default()
        };
        let text = m.to_string();
        assert!(text.starts_with("gqx: 0 gq: 0 max_gt: AA filters: PASS\n"));
        assert!(text.contains("is_covered: 1"));
        assert!(text.ends_with(" modgt: 0"));

        let plain = SiteModifiers::default().to_string();
        assert!(!plain.contains("modgt"));
    }

    #[test]
    fn deserialize_flattened() {
        let m: IndelModifiers =
            serde_json::from_str(r#"{"filters":["HighRefRep"],"gq":12,"is_overlap":true}"#)
                .unwrap();
        assert_eq!(m.shared.gq, 12);
        assert_eq!(m.shared.max_gt, IndelGt::NoIndel);
        assert!(m.is_overlap);
        assert_eq!(m.shared.render_filters(), "HighRefRep");
    }
}

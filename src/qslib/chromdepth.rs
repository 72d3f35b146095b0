use anyhow::{bail, Context, Result};
use std::collections::BTreeMap;
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

/// Mean sequencing depth per chromosome, iterated in chromosome name order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChromDepthMap {
    depths: BTreeMap<String, f64>,
}

impl ChromDepthMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a tab-delimited `chrom<TAB>depth` file
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("unable to open chrom depth file {}", path.display()))?;
        Self::from_reader(file)
            .with_context(|| format!("unable to parse chrom depth file {}", path.display()))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut ret = Self::new();
        for (idx, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            let line = line.trim_end();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split('\t');
            let (chrom, depth) = match (fields.next(), fields.next()) {
                (Some(c), Some(d)) if !c.is_empty() => (c, d),
                _ => bail!("malformed line {}: {}", idx + 1, line),
            };
            let depth: f64 = depth
                .trim()
                .parse()
                .with_context(|| format!("bad depth on line {}: {}", idx + 1, line))?;
            ret.insert(chrom, depth)
                .with_context(|| format!("line {}", idx + 1))?;
        }
        debug!("loaded depth for {} chromosomes", ret.len());
        Ok(ret)
    }

    /// Depths must be finite and positive; a chromosome may appear once
    pub fn insert(&mut self, chrom: &str, depth: f64) -> Result<()> {
        if !(depth.is_finite() && depth > 0.0) {
            bail!("depth for {} must be positive, got {}", chrom, depth);
        }
        if self.depths.contains_key(chrom) {
            bail!("duplicate chromosome {}", chrom);
        }
        self.depths.insert(chrom.to_string(), depth);
        Ok(())
    }

    pub fn get(&self, chrom: &str) -> Option<f64> {
        self.depths.get(chrom).copied()
    }

    /// Depth above which the HighDepth filter applies
    pub fn max_depth(&self, chrom: &str, max_depth_factor: f64) -> Option<f64> {
        self.get(chrom).map(|d| d * max_depth_factor)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.depths.iter().map(|(c, d)| (c.as_str(), *d))
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }
}

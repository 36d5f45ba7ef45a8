use crate::error::Result;
use crate::models::{GeoRecord, SummaryStatistics};
use crate::utils::constants::{JSON_EXTENSION, SUMMARY_FILE};
use crate::utils::filename::{region_file_name, region_file_stem};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const INDENT: &[u8] = b"    ";
const RESERVED_SUFFIX: &str = "region";

/// Writes one JSON array per region into the output directory.
pub struct RegionWriter {
    output_dir: PathBuf,
}

impl RegionWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Regions without records produce no file. Regions whose names sanitize
    /// to the same filename share one file. A region that would take the
    /// summary file's name is written under `<stem>_region.json` instead.
    pub fn write_regions(
        &self,
        groups: &BTreeMap<String, Vec<GeoRecord>>,
    ) -> Result<Vec<PathBuf>> {
        let mut files: BTreeMap<String, (&str, Vec<&GeoRecord>)> = BTreeMap::new();

        for (region, records) in groups.iter().filter(|(_, records)| !records.is_empty()) {
            let name = output_file_name(region);
            let entry = files.entry(name.clone()).or_insert((region.as_str(), Vec::new()));
            if entry.0 != region.as_str() {
                warn!(
                    file = %name,
                    first = entry.0,
                    second = %region,
                    "Regions share an output file; merging"
                );
            }
            entry.1.extend(records.iter());
        }

        if files.is_empty() {
            return Ok(Vec::new());
        }

        fs::create_dir_all(&self.output_dir)?;

        let mut written = Vec::with_capacity(files.len());
        for (name, (_, records)) in files {
            let path = self.output_dir.join(name);
            write_json(&path, &records)?;
            debug!(path = %path.display(), records = records.len(), "Wrote region file");
            written.push(path);
        }

        Ok(written)
    }

    pub fn write_summary(&self, summary: &SummaryStatistics) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(SUMMARY_FILE);
        write_json(&path, summary)?;
        Ok(path)
    }
}

fn output_file_name(region: &str) -> String {
    let name = region_file_name(region);
    if name != SUMMARY_FILE {
        return name;
    }

    let renamed = format!(
        "{}_{}.{}",
        region_file_stem(region),
        RESERVED_SUFFIX,
        JSON_EXTENSION
    );
    warn!(region, file = %renamed, "Region name clashes with the summary file; renaming");
    renamed
}

/// Serialize fully in memory, then replace the file in a single write.
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    buffer.push(b'\n');

    let mut file = File::create(path)?;
    file.write_all(&buffer)?;
    file.flush()?;
    Ok(())
}

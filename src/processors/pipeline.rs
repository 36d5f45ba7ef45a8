use crate::error::Result;
use crate::models::{RawTable, SummaryStatistics};
use crate::processors::{group_by_region, ColumnNormalizer, Reprojector, RowFilter};
use crate::readers::read_table;
use crate::schema::SchemaProfile;
use crate::utils::constants::UNKNOWN_SENTINEL;
use crate::utils::progress::ProgressReporter;
use crate::writers::RegionWriter;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub profile: SchemaProfile,
    pub output_dir: PathBuf,
    pub sheet: Option<String>,
    pub sentinel: String,
    pub write_summary: bool,
    pub validate_only: bool,
}

impl PipelineOptions {
    pub fn new(profile: SchemaProfile, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            profile,
            output_dir: output_dir.into(),
            sheet: None,
            sentinel: UNKNOWN_SENTINEL.to_string(),
            write_summary: true,
            validate_only: false,
        }
    }

    pub fn with_sheet(mut self, sheet: Option<String>) -> Self {
        self.sheet = sheet;
        self
    }

    pub fn with_sentinel(mut self, sentinel: &str) -> Self {
        self.sentinel = sentinel.to_string();
        self
    }

    pub fn with_summary(mut self, write_summary: bool) -> Self {
        self.write_summary = write_summary;
        self
    }

    pub fn with_validate_only(mut self, validate_only: bool) -> Self {
        self.validate_only = validate_only;
        self
    }
}

/// Counts for one run. Row-level problems end up here instead of aborting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineReport {
    pub rows_read: usize,
    pub dropped_missing_required: usize,
    pub coercion_failures: usize,
    pub projection_failures: usize,
    pub records_exported: usize,
    pub regions: usize,
    pub files_written: Vec<PathBuf>,
    pub summary_file: Option<PathBuf>,
    pub statistics: SummaryStatistics,
}

impl PipelineReport {
    pub fn summary(&self) -> String {
        let mut summary = String::new();
        summary.push_str("Transformation Report:\n");
        summary.push_str(&format!("  Rows read: {}\n", self.rows_read));
        summary.push_str(&format!(
            "  Dropped (missing required fields): {}\n",
            self.dropped_missing_required
        ));
        summary.push_str(&format!(
            "  Values not coercible (set to null): {}\n",
            self.coercion_failures
        ));
        summary.push_str(&format!(
            "  Excluded (projection failed): {}\n",
            self.projection_failures
        ));
        summary.push_str(&format!(
            "  Records exported: {} across {} regions\n",
            self.records_exported, self.regions
        ));
        summary.push_str(&format!(
            "  Total capacity: {:.1} MW ({} offshore, {} onshore)\n",
            self.statistics.total_capacity_mw,
            self.statistics.offshore_turbines,
            self.statistics.onshore_turbines
        ));
        summary.push_str(&format!("  Files written: {}", self.files_written.len()));
        if let Some(ref path) = self.summary_file {
            summary.push_str(&format!(" (+ {})", path.display()));
        }
        summary
    }
}

/// Load → Normalize → Filter → Reproject → Group → Export, in one pass.
pub struct Pipeline {
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self { options }
    }

    pub fn run(&self, input: &Path, progress: &ProgressReporter) -> Result<PipelineReport> {
        progress.stage("Loading");
        info!(
            input = %input.display(),
            profile = self.options.profile.name,
            header_row = self.options.profile.header_row,
            "Loading source table"
        );
        let table = read_table(
            input,
            self.options.profile.header_row,
            self.options.sheet.as_deref(),
        )?;

        self.run_table(table, progress)
    }

    /// Everything after loading; a schema error here leaves the output
    /// directory untouched.
    pub fn run_table(
        &self,
        table: RawTable,
        progress: &ProgressReporter,
    ) -> Result<PipelineReport> {
        let mut report = PipelineReport {
            rows_read: table.len(),
            ..Default::default()
        };

        progress.stage("Normalizing columns");
        let table = ColumnNormalizer::from_profile(&self.options.profile).normalize(table)?;

        progress.stage("Filtering rows");
        let filtered = RowFilter::from_profile(&self.options.profile).apply(&table);
        report.dropped_missing_required = filtered.dropped_missing_required;
        report.coercion_failures = filtered.coercion_failures;
        info!(
            kept = filtered.records.len(),
            dropped = filtered.dropped_missing_required,
            "Rows filtered"
        );

        progress.stage("Reprojecting coordinates");
        let reprojected = Reprojector::new()
            .with_sentinel(&self.options.sentinel)
            .reproject_all(filtered.records);
        report.projection_failures = reprojected.failures;
        report.records_exported = reprojected.records.len();

        progress.stage("Grouping by region");
        let groups = group_by_region(reprojected.records);
        report.regions = groups.len();
        report.statistics =
            SummaryStatistics::from_records(groups.values().flatten(), groups.len());

        if self.options.validate_only {
            info!("Validation only, no files written");
            return Ok(report);
        }

        progress.stage("Writing region files");
        let writer = RegionWriter::new(&self.options.output_dir);
        report.files_written = writer.write_regions(&groups)?;
        if self.options.write_summary {
            report.summary_file = Some(writer.write_summary(&report.statistics)?);
        }

        info!(
            files = report.files_written.len(),
            output_dir = %self.options.output_dir.display(),
            "Export complete"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CellValue, RawRecord};
    use tempfile::TempDir;

    fn odense_table() -> RawTable {
        let row = |number, x: f64| {
            RawRecord::new(
                number,
                vec![
                    CellValue::Text("Odense".into()),
                    CellValue::Number(x),
                    CellValue::Number(6_137_000.0),
                ],
            )
        };

        RawTable::new(
            vec![
                "Kommune".into(),
                "X (øst) koordinat \nUTM 32 Euref89".into(),
                "Y (nord) koordinat \nUTM 32 Euref89".into(),
            ],
            vec![row(12, 592_000.0), row(13, -1.0)],
        )
    }

    #[test]
    fn test_report_counts() -> Result<()> {
        let dir = TempDir::new()?;
        let options = PipelineOptions::new(SchemaProfile::danish(), dir.path());
        let report =
            Pipeline::new(options).run_table(odense_table(), &ProgressReporter::silent())?;

        assert_eq!(report.rows_read, 2);
        assert_eq!(report.projection_failures, 1);
        assert_eq!(report.records_exported, 1);
        assert_eq!(report.files_written, vec![dir.path().join("odense.json")]);
        assert_eq!(
            report.summary_file,
            Some(dir.path().join("summary_statistics.json"))
        );
        assert!(report.summary().contains("Records exported: 1 across 1 regions"));
        Ok(())
    }

    #[test]
    fn test_validate_only_writes_nothing() -> Result<()> {
        let dir = TempDir::new()?;
        let output = dir.path().join("communes");
        let options =
            PipelineOptions::new(SchemaProfile::danish(), &output).with_validate_only(true);
        let report =
            Pipeline::new(options).run_table(odense_table(), &ProgressReporter::silent())?;

        assert_eq!(report.records_exported, 1);
        assert!(report.files_written.is_empty());
        assert!(!output.exists());
        Ok(())
    }
}

use crate::error::ExtractError;

/// Geometry thresholds for layout extraction. Calibrated for roughly
/// 1000px-wide phone photos; recalibrating for another resolution never
/// touches the extraction logic.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Vertical distance within which a word joins an open column row.
    pub row_tolerance_px: f32,
    /// Vertical distance for the header-independent row bucketing used by
    /// the row-layout fallback.
    pub row_bucket_tolerance_px: f32,
    /// Minimum height of the header candidate band.
    pub header_band_min_px: f32,
    /// Minimum band height when rebuilding the header around an occurrence
    /// outside the top band.
    pub header_retry_band_min_px: f32,
    /// Band height as a multiple of the average day-word height.
    pub band_height_factor: f32,
    /// Column boundary extension when a neighboring header is missing, as a
    /// multiple of the header width.
    pub boundary_extend_factor: f32,
    /// Margin below the header's bottom edge before column words start.
    pub below_header_margin_px: f32,
    /// Maximum text length for a row to qualify for continuation merging.
    pub merge_max_text_len: usize,
    /// Minimum horizontal intersection/union ratio for merging two rows.
    pub merge_overlap_ratio: f32,
    /// Vertical slack when hunting for a time label near a row.
    pub time_search_slack_px: f32,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            row_tolerance_px: 18.0,
            row_bucket_tolerance_px: 12.0,
            header_band_min_px: 60.0,
            header_retry_band_min_px: 80.0,
            band_height_factor: 3.0,
            boundary_extend_factor: 0.8,
            below_header_margin_px: 2.0,
            merge_max_text_len: 20,
            merge_overlap_ratio: 0.5,
            time_search_slack_px: 16.0,
        }
    }
}

impl ExtractOptions {
    pub(crate) fn validate(&self) -> Result<(), ExtractError> {
        if self.row_tolerance_px <= 0.0 {
            return Err(ExtractError::InvalidOption(
                "row_tolerance_px must be positive".to_string(),
            ));
        }
        if self.row_bucket_tolerance_px <= 0.0 {
            return Err(ExtractError::InvalidOption(
                "row_bucket_tolerance_px must be positive".to_string(),
            ));
        }
        if self.band_height_factor <= 0.0 {
            return Err(ExtractError::InvalidOption(
                "band_height_factor must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.merge_overlap_ratio) {
            return Err(ExtractError::InvalidOption(
                "merge_overlap_ratio must be within 0.0..=1.0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ExtractOptions;

    #[test]
    fn default_options_are_valid() {
        ExtractOptions::default()
            .validate()
            .expect("defaults should validate");
    }

    #[test]
    fn rejects_non_positive_row_tolerance() {
        let options = ExtractOptions {
            row_tolerance_px: 0.0,
            ..ExtractOptions::default()
        };
        let err = options.validate().expect_err("zero tolerance should fail");
        assert!(err.to_string().contains("row_tolerance_px"));
    }

    #[test]
    fn rejects_overlap_ratio_above_one() {
        let options = ExtractOptions {
            merge_overlap_ratio: 1.5,
            ..ExtractOptions::default()
        };
        let err = options.validate().expect_err("ratio above 1 should fail");
        assert!(err.to_string().contains("merge_overlap_ratio"));
    }
}

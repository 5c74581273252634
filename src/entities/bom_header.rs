use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::bom_line::BomLine;
use crate::errors::BomError;

/// One versioned parts list for one assembly, scoped to an organization and
/// plant.
///
/// All invariants are checked in [`BomHeader::new`]; the header is immutable
/// afterwards except for [`activate`](BomHeader::activate) /
/// [`deactivate`](BomHeader::deactivate) and derivation through
/// [`create_new_version`](BomHeader::create_new_version).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct BomHeader {
    id: Option<i64>,
    organization_id: i64,
    plant_id: i64,
    #[validate(length(
        min = 1,
        max = 50,
        message = "BOM number must be between 1-50 characters"
    ))]
    bom_number: String,
    material_id: i64,
    bom_version: u32,
    base_quantity: f64,
    effective_start_date: Option<NaiveDate>,
    effective_end_date: Option<NaiveDate>,
    is_active: bool,
    lines: Vec<BomLine>,
}

impl BomHeader {
    /// Creates a validated header. The BOM number is trimmed and normalized
    /// to uppercase; lines are ordered by line number.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: Option<i64>,
        organization_id: i64,
        plant_id: i64,
        bom_number: &str,
        material_id: i64,
        bom_version: u32,
        base_quantity: f64,
        effective_start_date: Option<NaiveDate>,
        effective_end_date: Option<NaiveDate>,
        mut lines: Vec<BomLine>,
    ) -> Result<Self, BomError> {
        lines.sort_by_key(|line| line.line_number());

        let header = Self {
            id,
            organization_id,
            plant_id,
            bom_number: bom_number.trim().to_uppercase(),
            material_id,
            bom_version,
            base_quantity,
            effective_start_date,
            effective_end_date,
            is_active: true,
            lines,
        };
        header.check_invariants()?;
        Ok(header)
    }

    fn check_invariants(&self) -> Result<(), BomError> {
        self.validate()
            .map_err(|e| BomError::Validation(e.to_string()))?;

        if self.bom_version == 0 {
            return Err(BomError::Validation(
                "BOM version must be positive".to_string(),
            ));
        }
        if !self.base_quantity.is_finite() || self.base_quantity <= 0.0 {
            return Err(BomError::Validation(format!(
                "Base quantity must be positive, got {}",
                self.base_quantity
            )));
        }
        if let (Some(start), Some(end)) = (self.effective_start_date, self.effective_end_date) {
            if start > end {
                return Err(BomError::Validation(format!(
                    "Effective start date {} is after end date {}",
                    start, end
                )));
            }
        }
        Ok(())
    }

    /// Derives the next, inactive version of this header: same scope and
    /// material, `bom_version + 1`, the caller-supplied effectivity window,
    /// and a copy of the current lines. The derived header has no surrogate
    /// id until persisted.
    pub fn create_new_version(
        &self,
        effective_start_date: Option<NaiveDate>,
        effective_end_date: Option<NaiveDate>,
    ) -> Result<Self, BomError> {
        let mut next = Self::new(
            None,
            self.organization_id,
            self.plant_id,
            &self.bom_number,
            self.material_id,
            self.bom_version + 1,
            self.base_quantity,
            effective_start_date,
            effective_end_date,
            self.lines.clone(),
        )?;
        next.is_active = false;
        Ok(next)
    }

    pub fn activate(&mut self) {
        self.is_active = true;
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// Assigns the surrogate id on persistence.
    pub(crate) fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn organization_id(&self) -> i64 {
        self.organization_id
    }

    pub fn plant_id(&self) -> i64 {
        self.plant_id
    }

    pub fn bom_number(&self) -> &str {
        &self.bom_number
    }

    /// The assembly this BOM produces.
    pub fn material_id(&self) -> i64 {
        self.material_id
    }

    pub fn bom_version(&self) -> u32 {
        self.bom_version
    }

    /// The parent quantity this header's line quantities are expressed
    /// against.
    pub fn base_quantity(&self) -> f64 {
        self.base_quantity
    }

    pub fn effective_start_date(&self) -> Option<NaiveDate> {
        self.effective_start_date
    }

    pub fn effective_end_date(&self) -> Option<NaiveDate> {
        self.effective_end_date
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Lines in line-number order.
    pub fn lines(&self) -> &[BomLine] {
        &self.lines
    }

    /// Whether this header is effective on `date`. Open-ended windows are
    /// unbounded on the missing side.
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        let starts = self.effective_start_date.map_or(true, |s| s <= date);
        let ends = self.effective_end_date.map_or(true, |e| date <= e);
        starts && ends
    }
}

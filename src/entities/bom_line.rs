use serde::{Deserialize, Serialize};

use crate::errors::BomError;

/// One component requirement within a BOM header.
///
/// Lines have no identity outside their header. `quantity` is expressed per
/// `base_quantity` of the parent assembly; `scrap_factor` is the percentage
/// of additional material consumed as waste.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomLine {
    line_number: u32,
    component_material_id: i64,
    quantity: f64,
    scrap_factor: f64,
    is_phantom: bool,
    unit_of_measure_id: Option<i64>,
    operation_number: Option<u32>,
    backflush: bool,
}

impl BomLine {
    /// Creates a validated line. `quantity` must be positive and
    /// `scrap_factor` must lie in `0..=100`.
    pub fn new(
        line_number: u32,
        component_material_id: i64,
        quantity: f64,
        scrap_factor: f64,
        is_phantom: bool,
    ) -> Result<Self, BomError> {
        if line_number == 0 {
            return Err(BomError::Validation(
                "Line number must be positive".to_string(),
            ));
        }
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(BomError::Validation(format!(
                "Line {} quantity must be positive, got {}",
                line_number, quantity
            )));
        }
        if !scrap_factor.is_finite() || !(0.0..=100.0).contains(&scrap_factor) {
            return Err(BomError::Validation(format!(
                "Line {} scrap factor must be between 0 and 100, got {}",
                line_number, scrap_factor
            )));
        }

        Ok(Self {
            line_number,
            component_material_id,
            quantity,
            scrap_factor,
            is_phantom,
            unit_of_measure_id: None,
            operation_number: None,
            backflush: false,
        })
    }

    pub fn with_unit_of_measure(mut self, unit_of_measure_id: i64) -> Self {
        self.unit_of_measure_id = Some(unit_of_measure_id);
        self
    }

    /// Links this line to a routing step. Not used by explosion math.
    pub fn with_operation_number(mut self, operation_number: u32) -> Self {
        self.operation_number = Some(operation_number);
        self
    }

    /// Consumption-timing flag, carried through untouched.
    pub fn with_backflush(mut self, backflush: bool) -> Self {
        self.backflush = backflush;
        self
    }

    pub fn line_number(&self) -> u32 {
        self.line_number
    }

    pub fn component_material_id(&self) -> i64 {
        self.component_material_id
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn scrap_factor(&self) -> f64 {
        self.scrap_factor
    }

    pub fn is_phantom(&self) -> bool {
        self.is_phantom
    }

    pub fn unit_of_measure_id(&self) -> Option<i64> {
        self.unit_of_measure_id
    }

    pub fn operation_number(&self) -> Option<u32> {
        self.operation_number
    }

    pub fn backflush(&self) -> bool {
        self.backflush
    }

    /// Quantity inflated by the scrap allowance:
    /// `quantity * (1 + scrap_factor / 100)`.
    pub fn net_quantity(&self) -> f64 {
        self.quantity * (1.0 + self.scrap_factor / 100.0)
    }
}

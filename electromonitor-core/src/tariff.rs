//! Progressive slab tariff.
//!
//! Each slab bills the units between the previous slab's upper bound and its
//! own upper bound at a fixed rate. The last slab is unbounded.

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TariffError {
    #[error("tariff must have at least one slab")]
    Empty,
    #[error("slab {index} upper bound {upto} must be greater than {previous}")]
    NonAscending { index: usize, upto: f64, previous: f64 },
    #[error("only the last slab may be unbounded (slab {index})")]
    UnboundedBeforeLast { index: usize },
    #[error("last slab must be unbounded")]
    BoundedLast,
    #[error("slab {index} rate {rate} must be a finite non-negative number")]
    InvalidRate { index: usize, rate: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Slab {
    /// Inclusive upper bound in kWh; `None` for the top slab.
    pub upto: Option<f64>,
    /// Price per kWh within this slab.
    pub rate: f64,
}

/// Units and amount billed within one slab.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlabCharge {
    pub from: f64,
    pub upto: Option<f64>,
    pub units: f64,
    pub rate: f64,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tariff {
    slabs: Vec<Slab>,
}

impl Default for Tariff {
    /// 0-100 kWh at 3, 101-300 kWh at 5, above 300 kWh at 7.
    fn default() -> Self {
        Self {
            slabs: vec![
                Slab { upto: Some(100.0), rate: 3.0 },
                Slab { upto: Some(300.0), rate: 5.0 },
                Slab { upto: None, rate: 7.0 },
            ],
        }
    }
}

impl Tariff {
    pub fn new(slabs: Vec<Slab>) -> Result<Self, TariffError> {
        if slabs.is_empty() {
            return Err(TariffError::Empty);
        }

        let last = slabs.len() - 1;
        let mut previous = 0.0;
        for (index, slab) in slabs.iter().enumerate() {
            if !slab.rate.is_finite() || slab.rate < 0.0 {
                return Err(TariffError::InvalidRate { index, rate: slab.rate });
            }
            match slab.upto {
                Some(_) if index == last => return Err(TariffError::BoundedLast),
                Some(upto) => {
                    if !(upto > previous) || !upto.is_finite() {
                        return Err(TariffError::NonAscending { index, upto, previous });
                    }
                    previous = upto;
                }
                None if index != last => {
                    return Err(TariffError::UnboundedBeforeLast { index });
                }
                None => {}
            }
        }

        Ok(Self { slabs })
    }

    pub fn slabs(&self) -> &[Slab] {
        &self.slabs
    }

    /// Amount payable for `usage` kWh. No rounding is applied.
    ///
    /// The sign of `usage` is not checked; callers reject non-positive
    /// readings before billing them.
    pub fn payable(&self, usage: f64) -> f64 {
        self.breakdown(usage).iter().map(|c| c.amount).sum()
    }

    /// Per-slab charges for `usage`, skipping slabs the usage never reaches.
    pub fn breakdown(&self, usage: f64) -> Vec<SlabCharge> {
        let mut charges = Vec::with_capacity(self.slabs.len());
        let mut from = 0.0;

        for slab in &self.slabs {
            let top = match slab.upto {
                Some(upto) if usage > upto => upto,
                _ => usage,
            };
            let units = top - from;
            charges.push(SlabCharge {
                from,
                upto: slab.upto,
                units,
                rate: slab.rate,
                amount: units * slab.rate,
            });

            match slab.upto {
                Some(upto) if usage > upto => from = upto,
                _ => break,
            }
        }

        charges
    }
}

/// Payable amount under the default tariff.
pub fn calculate_payable(usage: f64) -> f64 {
    Tariff::default().payable(usage)
}

use std::fmt::{Debug, Formatter};

use crate::quantity::Quantity;

/// Pence per kilowatt-hour, VAT included.
pub type KilowattHourRate = Quantity<-1, 1>;

impl Debug for KilowattHourRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}p/kWh", self.0)
    }
}

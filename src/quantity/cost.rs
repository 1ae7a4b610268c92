use std::fmt::{Debug, Display, Formatter};

use crate::quantity::Quantity;

/// Pence, VAT included.
pub type Cost = Quantity<0, 1>;

impl Cost {
    /// Round to four decimal places, the precision unit rates are quoted with.
    pub fn round_to_ten_thousandths(self) -> Self {
        Self((self.0 * 10_000.0).round() / 10_000.0)
    }
}

impl Display for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "£{:.2}", self.0 / 100.0)
    }
}

impl Debug for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}p", self.0)
    }
}

use std::fmt::{Display, Formatter};

use enumset::EnumSet;

use crate::{error::HopperError, prelude::*};

/// Candidate tariffs, in comparison order.
#[derive(Debug, Hash, clap::ValueEnum, enumset::EnumSetType)]
pub enum Tariff {
    /// [Agile Octopus](https://octopus.energy/smart/agile/): half-hourly wholesale-tracking rates.
    Agile,

    /// [Octopus Go](https://octopus.energy/smart/go/): cheap overnight window.
    Go,

    /// [Cosy Octopus](https://octopus.energy/smart/cosy-octopus/): cheap heat pump windows.
    Cosy,
}

impl Tariff {
    /// Marker the provider embeds in its tariff codes.
    pub const fn code_marker(self) -> &'static str {
        match self {
            Self::Agile => "AGILE",
            Self::Go => "GO",
            Self::Cosy => "COSY",
        }
    }

    /// Product display name in the public catalogue.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Agile => "Agile Octopus",
            Self::Go => "Octopus Go",
            Self::Cosy => "Cosy Octopus",
        }
    }

    /// Path segment of the self-service sign-up page.
    pub const fn sign_up_slug(self) -> &'static str {
        match self {
            Self::Agile => "agile",
            Self::Go => "go",
            Self::Cosy => "cosy-octopus",
        }
    }

    /// Identify the candidate whose marker is contained in the tariff code.
    ///
    /// Candidates are tried in comparison order and the first one wins.
    pub fn try_from_tariff_code(candidates: EnumSet<Self>, tariff_code: &str) -> Result<Self> {
        candidates
            .into_iter()
            .find(|tariff| tariff_code.contains(tariff.code_marker()))
            .ok_or_else(|| HopperError::UnknownTariff(tariff_code.to_owned()).into())
    }
}

impl Display for Tariff {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code_marker())
    }
}

/// Single-character geographic pricing zone, for example `C` for London.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RegionCode(pub char);

impl RegionCode {
    /// The region is the last character of an electricity tariff code like `E-1R-AGILE-24-10-01-C`.
    pub fn try_from_tariff_code(tariff_code: &str) -> Result<Self> {
        let code = tariff_code
            .chars()
            .last()
            .ok_or_else(|| HopperError::data("empty tariff code"))?;
        ensure!(
            code.is_ascii_alphabetic(),
            HopperError::data(format!("no region in `{tariff_code}`")),
        );
        Ok(Self(code))
    }

    /// Electricity tariff code of a single-register product in this region.
    pub fn tariff_code(self, product_code: &str) -> String {
        format!("E-1R-{product_code}-{}", self.0)
    }
}

impl Display for RegionCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

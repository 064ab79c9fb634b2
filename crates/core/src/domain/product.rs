use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComputerId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PeripheralId(pub u32);

impl fmt::Display for ComputerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for PeripheralId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity and pricing fields shared by every sellable item.
///
/// `overall_performance` is the stored rating. For components it already
/// includes the kind multiplier; for computers it is the base rating before
/// any attached parts are averaged in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductCore {
    pub manufacturer: String,
    pub model: String,
    pub price: Decimal,
    pub overall_performance: f64,
}

impl ProductCore {
    pub fn new(
        manufacturer: impl Into<String>,
        model: impl Into<String>,
        price: Decimal,
        overall_performance: f64,
    ) -> Self {
        Self { manufacturer: manufacturer.into(), model: model.into(), price, overall_performance }
    }
}

/// Canonical one-line rendering shared by computers, components and peripherals.
pub fn render_line(
    overall_performance: f64,
    price: Decimal,
    type_name: &str,
    core: &ProductCore,
    id: impl fmt::Display,
) -> String {
    format!(
        "Overall Performance: {:.2}. Price: {:.2} - {}: {} {} (Id: {})",
        overall_performance,
        price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        type_name,
        core.manufacturer,
        core.model,
        id
    )
}

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::{render_line, ComponentId, ProductCore};
use crate::errors::CatalogError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    CentralProcessingUnit,
    Motherboard,
    PowerSupply,
    RandomAccessMemory,
    SolidStateDrive,
    VideoCard,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 6] = [
        Self::CentralProcessingUnit,
        Self::Motherboard,
        Self::PowerSupply,
        Self::RandomAccessMemory,
        Self::SolidStateDrive,
        Self::VideoCard,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CentralProcessingUnit => "CentralProcessingUnit",
            Self::Motherboard => "Motherboard",
            Self::PowerSupply => "PowerSupply",
            Self::RandomAccessMemory => "RandomAccessMemory",
            Self::SolidStateDrive => "SolidStateDrive",
            Self::VideoCard => "VideoCard",
        }
    }

    /// Memory and storage contribute 20% more than their raw rating.
    pub fn performance_multiplier(self) -> f64 {
        match self {
            Self::RandomAccessMemory | Self::SolidStateDrive => 1.20,
            Self::CentralProcessingUnit
            | Self::Motherboard
            | Self::PowerSupply
            | Self::VideoCard => 1.0,
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentKind {
    type Err = CatalogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "CentralProcessingUnit" | "CPU" => Ok(Self::CentralProcessingUnit),
            "Motherboard" => Ok(Self::Motherboard),
            "PowerSupply" => Ok(Self::PowerSupply),
            "RandomAccessMemory" => Ok(Self::RandomAccessMemory),
            "SolidStateDrive" => Ok(Self::SolidStateDrive),
            "VideoCard" => Ok(Self::VideoCard),
            _ => Err(CatalogError::InvalidComponentType),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: ComponentId,
    pub kind: ComponentKind,
    pub core: ProductCore,
    pub generation: i32,
}

impl Component {
    /// Builds a component, scaling `base_performance` by the kind multiplier.
    pub fn new(
        id: ComponentId,
        kind: ComponentKind,
        manufacturer: impl Into<String>,
        model: impl Into<String>,
        price: Decimal,
        base_performance: f64,
        generation: i32,
    ) -> Self {
        let performance = base_performance * kind.performance_multiplier();
        Self {
            id,
            kind,
            core: ProductCore::new(manufacturer, model, price, performance),
            generation,
        }
    }

    pub fn price(&self) -> Decimal {
        self.core.price
    }

    pub fn overall_performance(&self) -> f64 {
        self.core.overall_performance
    }

    pub fn describe(&self) -> String {
        format!(
            "{} Generation: {}",
            render_line(
                self.overall_performance(),
                self.price(),
                self.kind.as_str(),
                &self.core,
                self.id
            ),
            self.generation
        )
    }
}

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::{render_line, PeripheralId, ProductCore};
use crate::errors::CatalogError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeripheralKind {
    Headset,
    Keyboard,
    Monitor,
    Mouse,
}

impl PeripheralKind {
    pub const ALL: [PeripheralKind; 4] = [Self::Headset, Self::Keyboard, Self::Monitor, Self::Mouse];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Headset => "Headset",
            Self::Keyboard => "Keyboard",
            Self::Monitor => "Monitor",
            Self::Mouse => "Mouse",
        }
    }
}

impl fmt::Display for PeripheralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeripheralKind {
    type Err = CatalogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or(CatalogError::InvalidPeripheralType)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Peripheral {
    pub id: PeripheralId,
    pub kind: PeripheralKind,
    pub core: ProductCore,
    pub connection_type: String,
}

impl Peripheral {
    pub fn new(
        id: PeripheralId,
        kind: PeripheralKind,
        manufacturer: impl Into<String>,
        model: impl Into<String>,
        price: Decimal,
        overall_performance: f64,
        connection_type: impl Into<String>,
    ) -> Self {
        Self {
            id,
            kind,
            core: ProductCore::new(manufacturer, model, price, overall_performance),
            connection_type: connection_type.into(),
        }
    }

    pub fn price(&self) -> Decimal {
        self.core.price
    }

    pub fn overall_performance(&self) -> f64 {
        self.core.overall_performance
    }

    pub fn describe(&self) -> String {
        let line = render_line(
            self.overall_performance(),
            self.price(),
            self.kind.as_str(),
            &self.core,
            self.id,
        );
        format!("{line} Connection Type: {}", self.connection_type)
    }
}

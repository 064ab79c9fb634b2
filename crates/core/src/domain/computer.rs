use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::component::{Component, ComponentKind};
use crate::domain::peripheral::{Peripheral, PeripheralKind};
use crate::domain::product::{render_line, ComponentId, ComputerId, PeripheralId, ProductCore};
use crate::errors::CatalogError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComputerKind {
    Laptop,
    DesktopComputer,
}

impl ComputerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Laptop => "Laptop",
            Self::DesktopComputer => "DesktopComputer",
        }
    }

    /// Rating a bare chassis of this kind contributes before any parts.
    pub fn base_performance(self) -> f64 {
        match self {
            Self::Laptop => 10.0,
            Self::DesktopComputer => 15.0,
        }
    }
}

impl fmt::Display for ComputerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComputerKind {
    type Err = CatalogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Laptop" => Ok(Self::Laptop),
            "DesktopComputer" => Ok(Self::DesktopComputer),
            _ => Err(CatalogError::InvalidComputerType),
        }
    }
}

/// A computer and the parts currently attached to it.
///
/// Attached parts are shared with the catalog registries, so identity checks
/// use pointer equality rather than value equality. Price and performance are
/// recomputed from the attachments on every read.
#[derive(Clone, Debug)]
pub struct Computer {
    id: ComputerId,
    kind: ComputerKind,
    core: ProductCore,
    components: Vec<Rc<Component>>,
    peripherals: Vec<Rc<Peripheral>>,
}

impl Computer {
    pub fn new(
        id: ComputerId,
        kind: ComputerKind,
        manufacturer: impl Into<String>,
        model: impl Into<String>,
        price: Decimal,
    ) -> Self {
        Self {
            id,
            kind,
            core: ProductCore::new(manufacturer, model, price, kind.base_performance()),
            components: Vec::new(),
            peripherals: Vec::new(),
        }
    }

    pub fn id(&self) -> ComputerId {
        self.id
    }

    pub fn kind(&self) -> ComputerKind {
        self.kind
    }

    pub fn manufacturer(&self) -> &str {
        &self.core.manufacturer
    }

    pub fn model(&self) -> &str {
        &self.core.model
    }

    pub fn base_price(&self) -> Decimal {
        self.core.price
    }

    pub fn base_performance(&self) -> f64 {
        self.core.overall_performance
    }

    pub fn components(&self) -> &[Rc<Component>] {
        &self.components
    }

    pub fn peripherals(&self) -> &[Rc<Peripheral>] {
        &self.peripherals
    }

    /// Base price plus the price of every attached component and peripheral.
    ///
    /// Attachments are refused when they would overflow this total, so the
    /// saturating sum only clamps for parts priced below zero.
    pub fn price(&self) -> Decimal {
        self.components
            .iter()
            .map(|part| part.price())
            .chain(self.peripherals.iter().map(|part| part.price()))
            .fold(self.core.price, Decimal::saturating_add)
    }

    /// Base rating plus the component average. Peripherals never count here.
    pub fn overall_performance(&self) -> f64 {
        self.base_performance() + self.average_component_performance()
    }

    pub fn average_component_performance(&self) -> f64 {
        average(self.components.iter().map(|part| part.overall_performance()))
    }

    pub fn average_peripheral_performance(&self) -> f64 {
        average(self.peripherals.iter().map(|part| part.overall_performance()))
    }

    pub fn can_attach_component(&self, component: &Rc<Component>) -> Result<(), CatalogError> {
        if self.components.iter().any(|attached| Rc::ptr_eq(attached, component)) {
            return Err(CatalogError::ExistingComponent {
                kind: component.kind,
                computer_kind: self.kind,
                computer_id: self.id,
            });
        }
        self.ensure_price_fits(component.price())
    }

    pub fn can_attach_peripheral(&self, peripheral: &Rc<Peripheral>) -> Result<(), CatalogError> {
        if self.peripherals.iter().any(|attached| Rc::ptr_eq(attached, peripheral)) {
            return Err(CatalogError::ExistingPeripheral {
                kind: peripheral.kind,
                computer_kind: self.kind,
                computer_id: self.id,
            });
        }
        self.ensure_price_fits(peripheral.price())
    }

    fn ensure_price_fits(&self, extra: Decimal) -> Result<(), CatalogError> {
        match self.price().checked_add(extra) {
            Some(_) => Ok(()),
            None => Err(CatalogError::PriceOverflow {
                computer_kind: self.kind,
                computer_id: self.id,
            }),
        }
    }

    pub fn add_component(&mut self, component: Rc<Component>) -> Result<(), CatalogError> {
        self.can_attach_component(&component)?;
        self.components.push(component);
        Ok(())
    }

    pub fn add_peripheral(&mut self, peripheral: Rc<Peripheral>) -> Result<(), CatalogError> {
        self.can_attach_peripheral(&peripheral)?;
        self.peripherals.push(peripheral);
        Ok(())
    }

    /// Detaches the first attached component of `kind`.
    pub fn remove_component(
        &mut self,
        kind: ComponentKind,
    ) -> Result<Rc<Component>, CatalogError> {
        let position = self
            .components
            .iter()
            .position(|part| part.kind == kind)
            .ok_or_else(|| self.missing_component(kind.as_str()))?;
        Ok(self.components.remove(position))
    }

    /// Detaches the first attached peripheral of `kind`.
    pub fn remove_peripheral(
        &mut self,
        kind: PeripheralKind,
    ) -> Result<Rc<Peripheral>, CatalogError> {
        let position = self
            .peripherals
            .iter()
            .position(|part| part.kind == kind)
            .ok_or_else(|| self.missing_peripheral(kind.as_str()))?;
        Ok(self.peripherals.remove(position))
    }

    /// Rejection for a removal that matched nothing. `requested` is echoed
    /// as given, known kind or not.
    pub fn missing_component(&self, requested: &str) -> CatalogError {
        CatalogError::NotExistingComponent {
            kind: requested.to_string(),
            computer_kind: self.kind,
            computer_id: self.id,
        }
    }

    pub fn missing_peripheral(&self, requested: &str) -> CatalogError {
        CatalogError::NotExistingPeripheral {
            kind: requested.to_string(),
            computer_kind: self.kind,
            computer_id: self.id,
        }
    }

    pub fn describe(&self) -> String {
        let mut lines = vec![render_line(
            self.overall_performance(),
            self.price(),
            self.kind.as_str(),
            &self.core,
            self.id,
        )];

        lines.push(format!(" Components ({}):", self.components.len()));
        lines.extend(self.components.iter().map(|part| format!("  {}", part.describe())));

        lines.push(format!(
            " Peripherals ({}); Average Overall Performance ({:.2}):",
            self.peripherals.len(),
            self.average_peripheral_performance()
        ));
        lines.extend(self.peripherals.iter().map(|part| format!("  {}", part.describe())));

        lines.join("\n").trim().to_string()
    }

    pub fn snapshot(&self) -> ComputerSnapshot {
        ComputerSnapshot {
            id: self.id,
            kind: self.kind,
            manufacturer: self.core.manufacturer.clone(),
            model: self.core.model.clone(),
            price: self.price(),
            overall_performance: self.overall_performance(),
            component_ids: self.components.iter().map(|part| part.id).collect(),
            peripheral_ids: self.peripherals.iter().map(|part| part.id).collect(),
        }
    }
}

/// Point-in-time view of a computer with its derived totals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComputerSnapshot {
    pub id: ComputerId,
    pub kind: ComputerKind,
    pub manufacturer: String,
    pub model: String,
    pub price: Decimal,
    pub overall_performance: f64,
    pub component_ids: Vec<ComponentId>,
    pub peripheral_ids: Vec<PeripheralId>,
}

fn average(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let count = values.len();
    if count == 0 {
        return 0.0;
    }
    values.sum::<f64>() / count as f64
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use rust_decimal::Decimal;

    use super::{Computer, ComputerKind};
    use crate::domain::{
        component::{Component, ComponentKind},
        peripheral::{Peripheral, PeripheralKind},
        product::{ComponentId, ComputerId, PeripheralId},
    };
    use crate::errors::CatalogError;

    fn laptop() -> Computer {
        Computer::new(ComputerId(1), ComputerKind::Laptop, "Lenovo", "T14", Decimal::from(1000))
    }

    fn component(id: u32, kind: ComponentKind, price: i64, performance: f64) -> Rc<Component> {
        Rc::new(Component::new(
            ComponentId(id),
            kind,
            "Maker",
            "Part",
            Decimal::from(price),
            performance,
            3,
        ))
    }

    fn peripheral(id: u32, kind: PeripheralKind, price: i64, performance: f64) -> Rc<Peripheral> {
        Rc::new(Peripheral::new(
            PeripheralId(id),
            kind,
            "Maker",
            "Gadget",
            Decimal::from(price),
            performance,
            "USB",
        ))
    }

    #[test]
    fn empty_computer_reports_base_values() {
        let computer = laptop();
        assert_eq!(computer.price(), Decimal::from(1000));
        assert_eq!(computer.overall_performance(), computer.base_performance());
        assert_eq!(computer.base_performance(), 10.0);
        assert_eq!(computer.average_peripheral_performance(), 0.0);
    }

    #[test]
    fn price_sums_every_attached_part() {
        let mut computer = laptop();
        computer.add_component(component(1, ComponentKind::VideoCard, 400, 80.0)).expect("gpu");
        computer.add_component(component(2, ComponentKind::Motherboard, 150, 20.0)).expect("mb");
        computer.add_peripheral(peripheral(1, PeripheralKind::Monitor, 250, 90.0)).expect("mon");

        assert_eq!(computer.price(), Decimal::from(1800));
    }

    #[test]
    fn performance_averages_components_and_ignores_peripherals() {
        let mut computer = laptop();
        computer.add_component(component(1, ComponentKind::VideoCard, 1, 80.0)).expect("gpu");
        computer
            .add_component(component(2, ComponentKind::RandomAccessMemory, 1, 50.0))
            .expect("ram");
        computer.add_peripheral(peripheral(1, PeripheralKind::Mouse, 1, 1000.0)).expect("mouse");

        assert!((computer.overall_performance() - 80.0).abs() < 1e-9);
        assert!((computer.average_peripheral_performance() - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn attaching_same_instance_twice_is_rejected() {
        let mut computer = laptop();
        let mouse = peripheral(5, PeripheralKind::Mouse, 20, 4.0);
        computer.add_peripheral(Rc::clone(&mouse)).expect("first attach");

        let error = computer.add_peripheral(mouse).expect_err("second attach should fail");
        assert_eq!(
            error,
            CatalogError::ExistingPeripheral {
                kind: PeripheralKind::Mouse,
                computer_kind: ComputerKind::Laptop,
                computer_id: ComputerId(1),
            }
        );
        assert_eq!(computer.peripherals().len(), 1);
    }

    #[test]
    fn equal_but_distinct_instances_may_both_attach() {
        let mut computer = laptop();
        computer.add_component(component(1, ComponentKind::PowerSupply, 60, 5.0)).expect("psu");
        computer.add_component(component(1, ComponentKind::PowerSupply, 60, 5.0)).expect("psu 2");

        assert_eq!(computer.components().len(), 2);
    }

    #[test]
    fn removal_takes_first_match_by_kind() {
        let mut computer = laptop();
        computer
            .add_component(component(10, ComponentKind::SolidStateDrive, 90, 10.0))
            .expect("ssd 10");
        computer.add_component(component(11, ComponentKind::VideoCard, 300, 60.0)).expect("gpu");
        computer
            .add_component(component(12, ComponentKind::SolidStateDrive, 95, 11.0))
            .expect("ssd 12");

        let removed = computer.remove_component(ComponentKind::SolidStateDrive).expect("remove");
        assert_eq!(removed.id, ComponentId(10));

        let remaining: Vec<_> = computer.components().iter().map(|part| part.id.0).collect();
        assert_eq!(remaining, vec![11, 12]);
    }

    #[test]
    fn removing_absent_kind_fails() {
        let mut computer = laptop();
        let error = computer
            .remove_peripheral(PeripheralKind::Headset)
            .expect_err("nothing attached yet");
        assert_eq!(error.to_string(), "Headset does not exist in Laptop with Id 1.");

        computer.add_component(component(1, ComponentKind::VideoCard, 1, 1.0)).expect("gpu");
        assert!(computer.remove_component(ComponentKind::CentralProcessingUnit).is_err());
        assert_eq!(computer.components().len(), 1);
    }

    #[test]
    fn attachment_that_would_overflow_price_is_rejected() {
        let mut computer =
            Computer::new(ComputerId(3), ComputerKind::Laptop, "Acme", "Max", Decimal::MAX);
        let gpu = Rc::new(Component::new(
            ComponentId(1),
            ComponentKind::VideoCard,
            "Maker",
            "Part",
            Decimal::MAX,
            50.0,
            1,
        ));

        let error = computer.add_component(gpu).expect_err("sum exceeds Decimal::MAX");
        assert_eq!(
            error,
            CatalogError::PriceOverflow {
                computer_kind: ComputerKind::Laptop,
                computer_id: ComputerId(3),
            }
        );
        assert!(computer.components().is_empty());
        assert_eq!(computer.price(), Decimal::MAX);
        assert!(computer.describe().contains("Laptop: Acme Max (Id: 3)"));

        computer.add_peripheral(peripheral(1, PeripheralKind::Mouse, 0, 1.0)).expect("free mouse");
    }

    #[test]
    fn describe_lists_components_and_peripherals() {
        let mut computer = laptop();
        computer
            .add_component(component(2, ComponentKind::CentralProcessingUnit, 300, 40.0))
            .expect("cpu");
        computer.add_peripheral(peripheral(3, PeripheralKind::Keyboard, 50, 6.0)).expect("kbd");

        let expected = [
            "Overall Performance: 50.00. Price: 1350.00 - Laptop: Lenovo T14 (Id: 1)",
            " Components (1):",
            "  Overall Performance: 40.00. Price: 300.00 - CentralProcessingUnit: Maker Part (Id: 2) Generation: 3",
            " Peripherals (1); Average Overall Performance (6.00):",
            "  Overall Performance: 6.00. Price: 50.00 - Keyboard: Maker Gadget (Id: 3) Connection Type: USB",
        ]
        .join("\n");
        assert_eq!(computer.describe(), expected);
    }

    #[test]
    fn describe_without_parts_ends_at_peripheral_summary() {
        let description = laptop().describe();
        assert!(description.ends_with(" Peripherals (0); Average Overall Performance (0.00):"));
        assert!(description.contains(" Components (0):"));
    }
}

//! Catalog controller.
//!
//! The catalog owns every computer, plus a registry of every component and
//! peripheral ever added. Parts are shared (`Rc`) between the registry and the
//! computer they are attached to. Each operation validates fully before it
//! mutates anything, so a rejected call leaves the catalog untouched.

use std::rc::Rc;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::audit::{AuditEvent, AuditOutcome, AuditSink, CatalogOperation};
use crate::domain::{
    component::{Component, ComponentKind},
    computer::{Computer, ComputerKind, ComputerSnapshot},
    peripheral::{Peripheral, PeripheralKind},
    product::{ComponentId, ComputerId, PeripheralId},
};
use crate::errors::CatalogError;

pub type CatalogResult = Result<String, CatalogError>;

#[derive(Clone, Debug, PartialEq)]
pub struct NewComputer<'a> {
    pub kind: &'a str,
    pub id: u32,
    pub manufacturer: &'a str,
    pub model: &'a str,
    pub price: Decimal,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewComponent<'a> {
    pub computer_id: u32,
    pub id: u32,
    pub kind: &'a str,
    pub manufacturer: &'a str,
    pub model: &'a str,
    pub price: Decimal,
    pub performance: f64,
    pub generation: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewPeripheral<'a> {
    pub computer_id: u32,
    pub id: u32,
    pub kind: &'a str,
    pub manufacturer: &'a str,
    pub model: &'a str,
    pub price: Decimal,
    pub performance: f64,
    pub connection_type: &'a str,
}

#[derive(Default)]
pub struct Catalog {
    computers: Vec<Computer>,
    components: Vec<Rc<Component>>,
    peripherals: Vec<Rc<Peripheral>>,
    audit_sink: Option<Box<dyn AuditSink>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_audit_sink(mut self, sink: impl AuditSink + 'static) -> Self {
        self.audit_sink = Some(Box::new(sink));
        self
    }

    pub fn add_computer(&mut self, request: NewComputer<'_>) -> CatalogResult {
        let result = self.try_add_computer(&request);
        self.record(CatalogOperation::AddComputer, &result, &[("computer_id", request.id)]);
        result
    }

    pub fn add_component(&mut self, request: NewComponent<'_>) -> CatalogResult {
        let result = self.try_add_component(&request);
        self.record(
            CatalogOperation::AddComponent,
            &result,
            &[("computer_id", request.computer_id), ("component_id", request.id)],
        );
        result
    }

    pub fn remove_component(&mut self, kind: &str, computer_id: u32) -> CatalogResult {
        let result = self.try_remove_component(kind, ComputerId(computer_id));
        self.record(CatalogOperation::RemoveComponent, &result, &[("computer_id", computer_id)]);
        result
    }

    pub fn add_peripheral(&mut self, request: NewPeripheral<'_>) -> CatalogResult {
        let result = self.try_add_peripheral(&request);
        self.record(
            CatalogOperation::AddPeripheral,
            &result,
            &[("computer_id", request.computer_id), ("peripheral_id", request.id)],
        );
        result
    }

    pub fn remove_peripheral(&mut self, kind: &str, computer_id: u32) -> CatalogResult {
        let result = self.try_remove_peripheral(kind, ComputerId(computer_id));
        self.record(CatalogOperation::RemovePeripheral, &result, &[("computer_id", computer_id)]);
        result
    }

    /// Sells the computer: it leaves the catalog together with its attached parts.
    pub fn buy_computer(&mut self, id: u32) -> CatalogResult {
        let result = self
            .position_of(ComputerId(id))
            .map(|index| self.computers.remove(index).describe());
        self.record(CatalogOperation::BuyComputer, &result, &[("computer_id", id)]);
        result
    }

    /// Sells the best-performing computer whose total price fits `budget`.
    /// Ties go to the computer added first.
    pub fn buy_best_computer(&mut self, budget: Decimal) -> CatalogResult {
        let result = match self.best_affordable(budget) {
            Some(index) => Ok(self.computers.remove(index).describe()),
            None => Err(CatalogError::CannotAffordComputer { budget }),
        };
        self.record_with_budget(&result, budget);
        result
    }

    pub fn get_computer_data(&self, id: u32) -> CatalogResult {
        let result = self.computer(ComputerId(id)).map(Computer::describe);
        self.record(CatalogOperation::GetComputerData, &result, &[("computer_id", id)]);
        result
    }

    pub fn computer(&self, id: ComputerId) -> Result<&Computer, CatalogError> {
        self.computers
            .iter()
            .find(|computer| computer.id() == id)
            .ok_or(CatalogError::NotExistingComputerId)
    }

    pub fn snapshot(&self, id: ComputerId) -> Result<ComputerSnapshot, CatalogError> {
        self.computer(id).map(Computer::snapshot)
    }

    /// Computers in insertion order.
    pub fn computers(&self) -> impl Iterator<Item = &Computer> {
        self.computers.iter()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn peripheral_count(&self) -> usize {
        self.peripherals.len()
    }

    fn try_add_computer(&mut self, request: &NewComputer<'_>) -> CatalogResult {
        let kind: ComputerKind = request.kind.parse()?;
        let id = ComputerId(request.id);
        if self.computers.iter().any(|computer| computer.id() == id) {
            return Err(CatalogError::ExistingComputerId);
        }

        self.computers.push(Computer::new(
            id,
            kind,
            request.manufacturer,
            request.model,
            request.price,
        ));
        Ok(format!("Computer with id {id} added successfully."))
    }

    fn try_add_component(&mut self, request: &NewComponent<'_>) -> CatalogResult {
        let computer_id = ComputerId(request.computer_id);
        let index = self.position_of(computer_id)?;
        let kind: ComponentKind = request.kind.parse()?;
        let id = ComponentId(request.id);
        if self.components.iter().any(|component| component.id == id) {
            return Err(CatalogError::ExistingComponentId);
        }

        let component = Rc::new(Component::new(
            id,
            kind,
            request.manufacturer,
            request.model,
            request.price,
            request.performance,
            request.generation,
        ));
        self.computers[index].can_attach_component(&component)?;

        self.components.push(Rc::clone(&component));
        self.computers[index].add_component(component)?;
        Ok(format!(
            "Component {kind} with id {id} added successfully in computer with id {computer_id}."
        ))
    }

    fn try_add_peripheral(&mut self, request: &NewPeripheral<'_>) -> CatalogResult {
        let computer_id = ComputerId(request.computer_id);
        let index = self.position_of(computer_id)?;
        let kind: PeripheralKind = request.kind.parse()?;
        let id = PeripheralId(request.id);
        if self.peripherals.iter().any(|peripheral| peripheral.id == id) {
            return Err(CatalogError::ExistingPeripheralId);
        }

        let peripheral = Rc::new(Peripheral::new(
            id,
            kind,
            request.manufacturer,
            request.model,
            request.price,
            request.performance,
            request.connection_type,
        ));
        self.computers[index].can_attach_peripheral(&peripheral)?;

        self.peripherals.push(Rc::clone(&peripheral));
        self.computers[index].add_peripheral(peripheral)?;
        Ok(format!(
            "Peripheral {kind} with id {id} added successfully in computer with id {computer_id}."
        ))
    }

    /// An unknown kind name cannot match any attached part, so it is reported
    /// as missing from the computer rather than as invalid.
    fn try_remove_component(&mut self, requested: &str, computer_id: ComputerId) -> CatalogResult {
        let index = self.position_of(computer_id)?;
        let computer = &mut self.computers[index];
        let Ok(kind) = requested.parse::<ComponentKind>() else {
            return Err(computer.missing_component(requested));
        };
        let removed = computer.remove_component(kind)?;
        Ok(format!("Successfully removed {kind} with id {}.", removed.id))
    }

    fn try_remove_peripheral(&mut self, requested: &str, computer_id: ComputerId) -> CatalogResult {
        let index = self.position_of(computer_id)?;
        let computer = &mut self.computers[index];
        let Ok(kind) = requested.parse::<PeripheralKind>() else {
            return Err(computer.missing_peripheral(requested));
        };
        let removed = computer.remove_peripheral(kind)?;
        Ok(format!("Successfully removed {kind} with id {}.", removed.id))
    }

    fn position_of(&self, id: ComputerId) -> Result<usize, CatalogError> {
        self.computers
            .iter()
            .position(|computer| computer.id() == id)
            .ok_or(CatalogError::NotExistingComputerId)
    }

    fn best_affordable(&self, budget: Decimal) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (index, computer) in self.computers.iter().enumerate() {
            if computer.price() > budget {
                continue;
            }
            let performance = computer.overall_performance();
            if best.map_or(true, |(_, top)| performance > top) {
                best = Some((index, performance));
            }
        }

        debug!(
            event_name = "catalog.buy_best_computer.evaluated",
            budget = %budget,
            candidates = self.computers.len(),
            selected = ?best.map(|(index, _)| self.computers[index].id().0),
            "evaluated computers against budget"
        );
        best.map(|(index, _)| index)
    }

    fn record_with_budget(&self, result: &CatalogResult, budget: Decimal) {
        self.log(CatalogOperation::BuyBestComputer, result);
        self.emit(
            AuditEvent::new(CatalogOperation::BuyBestComputer, outcome_of(result))
                .with_metadata("budget", budget.to_string()),
            result,
        );
    }

    fn record(&self, operation: CatalogOperation, result: &CatalogResult, ids: &[(&str, u32)]) {
        self.log(operation, result);
        let event = ids.iter().fold(
            AuditEvent::new(operation, outcome_of(result)),
            |event, (key, value)| event.with_metadata(*key, value.to_string()),
        );
        self.emit(event, result);
    }

    fn log(&self, operation: CatalogOperation, result: &CatalogResult) {
        match result {
            Ok(_) => info!(
                event_name = "catalog.operation.applied",
                operation = operation.as_str(),
                computers = self.computers.len(),
                "catalog operation applied"
            ),
            Err(error) => warn!(
                event_name = "catalog.operation.rejected",
                operation = operation.as_str(),
                error_class = error.class().as_str(),
                error = %error,
                "catalog operation rejected"
            ),
        }
    }

    fn emit(&self, event: AuditEvent, result: &CatalogResult) {
        let Some(sink) = &self.audit_sink else {
            return;
        };
        let event = match result {
            Ok(_) => event,
            Err(error) => event
                .with_metadata("error_class", error.class().as_str())
                .with_metadata("error", error.to_string()),
        };
        sink.emit(event);
    }
}

fn outcome_of(result: &CatalogResult) -> AuditOutcome {
    if result.is_ok() {
        AuditOutcome::Success
    } else {
        AuditOutcome::Rejected
    }
}

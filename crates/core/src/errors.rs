use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use crate::domain::{
    component::ComponentKind, computer::ComputerKind, peripheral::PeripheralKind,
    product::ComputerId,
};

/// Rejections raised by the catalog. The `Display` text is the message shown
/// to the operator verbatim.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Computer type is invalid.")]
    InvalidComputerType,
    #[error("Component type is invalid.")]
    InvalidComponentType,
    #[error("Peripheral type is invalid.")]
    InvalidPeripheralType,

    #[error("Computer with this id already exists.")]
    ExistingComputerId,
    #[error("Component with this id already exists.")]
    ExistingComponentId,
    #[error("Peripheral with this id already exists.")]
    ExistingPeripheralId,
    #[error("Component {kind} already exists in {computer_kind} with Id {computer_id}.")]
    ExistingComponent {
        kind: ComponentKind,
        computer_kind: ComputerKind,
        computer_id: ComputerId,
    },
    #[error("Peripheral {kind} already exists in {computer_kind} with Id {computer_id}.")]
    ExistingPeripheral {
        kind: PeripheralKind,
        computer_kind: ComputerKind,
        computer_id: ComputerId,
    },

    #[error("Computer with this id does not exist.")]
    NotExistingComputerId,
    /// `kind` is the name as requested, which may not be a known kind at all.
    #[error("{kind} does not exist in {computer_kind} with Id {computer_id}.")]
    NotExistingComponent {
        kind: String,
        computer_kind: ComputerKind,
        computer_id: ComputerId,
    },
    #[error("{kind} does not exist in {computer_kind} with Id {computer_id}.")]
    NotExistingPeripheral {
        kind: String,
        computer_kind: ComputerKind,
        computer_id: ComputerId,
    },

    #[error(
        "Can't buy a computer with a budget of ${:.2}.",
        .budget.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )]
    CannotAffordComputer { budget: Decimal },
    #[error("Price of {computer_kind} with Id {computer_id} would exceed the supported range.")]
    PriceOverflow { computer_kind: ComputerKind, computer_id: ComputerId },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    Validation,
    Uniqueness,
    Existence,
    BusinessRule,
}

impl ErrorClass {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Uniqueness => "uniqueness",
            Self::Existence => "existence",
            Self::BusinessRule => "business_rule",
        }
    }
}

impl CatalogError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidComputerType | Self::InvalidComponentType | Self::InvalidPeripheralType => {
                ErrorClass::Validation
            }
            Self::ExistingComputerId
            | Self::ExistingComponentId
            | Self::ExistingPeripheralId
            | Self::ExistingComponent { .. }
            | Self::ExistingPeripheral { .. } => ErrorClass::Uniqueness,
            Self::NotExistingComputerId
            | Self::NotExistingComponent { .. }
            | Self::NotExistingPeripheral { .. } => ErrorClass::Existence,
            Self::CannotAffordComputer { .. } | Self::PriceOverflow { .. } => {
                ErrorClass::BusinessRule
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::{component::ComponentKind, computer::ComputerKind, product::ComputerId};
    use crate::errors::{CatalogError, ErrorClass};

    #[test]
    fn part_messages_name_kind_and_owning_computer() {
        let missing = CatalogError::NotExistingPeripheral {
            kind: "Mouse".to_string(),
            computer_kind: ComputerKind::Laptop,
            computer_id: ComputerId(4),
        };
        assert_eq!(missing.to_string(), "Mouse does not exist in Laptop with Id 4.");

        let duplicate = CatalogError::ExistingComponent {
            kind: ComponentKind::VideoCard,
            computer_kind: ComputerKind::DesktopComputer,
            computer_id: ComputerId(9),
        };
        assert_eq!(
            duplicate.to_string(),
            "Component VideoCard already exists in DesktopComputer with Id 9."
        );
    }

    #[test]
    fn budget_message_embeds_budget_with_cents() {
        let error = CatalogError::CannotAffordComputer { budget: Decimal::from(300) };
        assert_eq!(error.to_string(), "Can't buy a computer with a budget of $300.00.");
        assert_eq!(error.class(), ErrorClass::BusinessRule);
    }

    #[test]
    fn budget_message_rounds_half_cents_up() {
        let error = CatalogError::CannotAffordComputer { budget: Decimal::new(5, 3) };
        assert_eq!(error.to_string(), "Can't buy a computer with a budget of $0.01.");

        let error = CatalogError::CannotAffordComputer { budget: Decimal::new(12_345, 3) };
        assert_eq!(error.to_string(), "Can't buy a computer with a budget of $12.35.");
    }

    #[test]
    fn errors_are_grouped_into_classes() {
        assert_eq!(CatalogError::InvalidComputerType.class(), ErrorClass::Validation);
        assert_eq!(CatalogError::ExistingPeripheralId.class(), ErrorClass::Uniqueness);
        assert_eq!(CatalogError::NotExistingComputerId.class(), ErrorClass::Existence);
        assert_eq!(ErrorClass::BusinessRule.as_str(), "business_rule");
    }
}

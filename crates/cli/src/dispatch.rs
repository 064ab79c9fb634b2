//! Line-oriented command parsing and dispatch onto the catalog.
//!
//! A line is `Command arg1 arg2 ...` separated by whitespace. Arguments are
//! parsed into primitives here so the catalog only ever sees typed values.

use std::str::FromStr;

use rigshop_core::{Catalog, CatalogResult, NewComponent, NewComputer, NewPeripheral};
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq)]
pub enum Request {
    AddComputer {
        kind: String,
        id: u32,
        manufacturer: String,
        model: String,
        price: Decimal,
    },
    AddPeripheral {
        computer_id: u32,
        id: u32,
        kind: String,
        manufacturer: String,
        model: String,
        price: Decimal,
        performance: f64,
        connection_type: String,
    },
    RemovePeripheral { kind: String, computer_id: u32 },
    AddComponent {
        computer_id: u32,
        id: u32,
        kind: String,
        manufacturer: String,
        model: String,
        price: Decimal,
        performance: f64,
        generation: i32,
    },
    RemoveComponent { kind: String, computer_id: u32 },
    BuyComputer { id: u32 },
    BuyBest { budget: Decimal },
    GetComputerData { id: u32 },
    Terminate,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Unknown command `{0}`.")]
    UnknownCommand(String),
    #[error("{command} expects {expected} argument(s), got {found}.")]
    Arity { command: String, expected: usize, found: usize },
    #[error("Invalid {field} `{value}`.")]
    InvalidArgument { field: &'static str, value: String },
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str, terminator: &str) -> Result<Option<Request>, DispatchError> {
    let mut tokens = line.split_whitespace();
    let Some(command) = tokens.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = tokens.collect();

    if command == terminator {
        return Ok(Some(Request::Terminate));
    }

    let request = match command {
        "AddComputer" => {
            expect_arity(command, &args, 5)?;
            Request::AddComputer {
                kind: args[0].to_string(),
                id: parse_arg("id", args[1])?,
                manufacturer: args[2].to_string(),
                model: args[3].to_string(),
                price: parse_price(args[4])?,
            }
        }
        "AddPeripheral" => {
            expect_arity(command, &args, 8)?;
            Request::AddPeripheral {
                computer_id: parse_arg("computer id", args[0])?,
                id: parse_arg("id", args[1])?,
                kind: args[2].to_string(),
                manufacturer: args[3].to_string(),
                model: args[4].to_string(),
                price: parse_price(args[5])?,
                performance: parse_performance(args[6])?,
                connection_type: args[7].to_string(),
            }
        }
        "RemovePeripheral" => {
            expect_arity(command, &args, 2)?;
            Request::RemovePeripheral {
                kind: args[0].to_string(),
                computer_id: parse_arg("computer id", args[1])?,
            }
        }
        "AddComponent" => {
            expect_arity(command, &args, 8)?;
            Request::AddComponent {
                computer_id: parse_arg("computer id", args[0])?,
                id: parse_arg("id", args[1])?,
                kind: args[2].to_string(),
                manufacturer: args[3].to_string(),
                model: args[4].to_string(),
                price: parse_price(args[5])?,
                performance: parse_performance(args[6])?,
                generation: parse_arg("generation", args[7])?,
            }
        }
        "RemoveComponent" => {
            expect_arity(command, &args, 2)?;
            Request::RemoveComponent {
                kind: args[0].to_string(),
                computer_id: parse_arg("computer id", args[1])?,
            }
        }
        "BuyComputer" => {
            expect_arity(command, &args, 1)?;
            Request::BuyComputer { id: parse_arg("id", args[0])? }
        }
        "BuyBest" => {
            expect_arity(command, &args, 1)?;
            Request::BuyBest { budget: parse_arg("budget", args[0])? }
        }
        "GetComputerData" => {
            expect_arity(command, &args, 1)?;
            Request::GetComputerData { id: parse_arg("id", args[0])? }
        }
        other => return Err(DispatchError::UnknownCommand(other.to_string())),
    };

    Ok(Some(request))
}

/// Applies a parsed request. `Terminate` is handled by the session loop.
pub fn execute(catalog: &mut Catalog, request: &Request) -> Option<CatalogResult> {
    let result = match request {
        Request::AddComputer { kind, id, manufacturer, model, price } => {
            catalog.add_computer(NewComputer { kind, id: *id, manufacturer, model, price: *price })
        }
        Request::AddPeripheral {
            computer_id,
            id,
            kind,
            manufacturer,
            model,
            price,
            performance,
            connection_type,
        } => catalog.add_peripheral(NewPeripheral {
            computer_id: *computer_id,
            id: *id,
            kind,
            manufacturer,
            model,
            price: *price,
            performance: *performance,
            connection_type,
        }),
        Request::RemovePeripheral { kind, computer_id } => {
            catalog.remove_peripheral(kind, *computer_id)
        }
        Request::AddComponent {
            computer_id,
            id,
            kind,
            manufacturer,
            model,
            price,
            performance,
            generation,
        } => catalog.add_component(NewComponent {
            computer_id: *computer_id,
            id: *id,
            kind,
            manufacturer,
            model,
            price: *price,
            performance: *performance,
            generation: *generation,
        }),
        Request::RemoveComponent { kind, computer_id } => {
            catalog.remove_component(kind, *computer_id)
        }
        Request::BuyComputer { id } => catalog.buy_computer(*id),
        Request::BuyBest { budget } => catalog.buy_best_computer(*budget),
        Request::GetComputerData { id } => catalog.get_computer_data(*id),
        Request::Terminate => return None,
    };

    Some(result)
}

fn expect_arity(command: &str, args: &[&str], expected: usize) -> Result<(), DispatchError> {
    if args.len() != expected {
        return Err(DispatchError::Arity {
            command: command.to_string(),
            expected,
            found: args.len(),
        });
    }
    Ok(())
}

fn parse_arg<T: FromStr>(field: &'static str, value: &str) -> Result<T, DispatchError> {
    value
        .parse::<T>()
        .map_err(|_| DispatchError::InvalidArgument { field, value: value.to_string() })
}

fn parse_price(value: &str) -> Result<Decimal, DispatchError> {
    let price: Decimal = parse_arg("price", value)?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(DispatchError::InvalidArgument { field: "price", value: value.to_string() });
    }
    Ok(price)
}

/// Ratings must be finite and non-negative; `NaN` and `inf` parse as `f64`.
fn parse_performance(value: &str) -> Result<f64, DispatchError> {
    let performance: f64 = parse_arg("performance", value)?;
    if !performance.is_finite() || performance < 0.0 {
        return Err(DispatchError::InvalidArgument {
            field: "performance",
            value: value.to_string(),
        });
    }
    Ok(performance)
}

#[cfg(test)]
mod tests {
    use rigshop_core::Catalog;
    use rust_decimal::Decimal;

    use super::{execute, parse_line, DispatchError, Request};

    #[test]
    fn parses_add_computer_arguments() {
        let request = parse_line("AddComputer Laptop 1 Dell XPS 999.90", "Close")
            .expect("valid line")
            .expect("not blank");

        assert_eq!(
            request,
            Request::AddComputer {
                kind: "Laptop".to_string(),
                id: 1,
                manufacturer: "Dell".to_string(),
                model: "XPS".to_string(),
                price: Decimal::new(99_990, 2),
            }
        );
    }

    #[test]
    fn blank_lines_and_terminator_are_recognised() {
        assert_eq!(parse_line("   ", "Close"), Ok(None));
        assert_eq!(parse_line("Close", "Close"), Ok(Some(Request::Terminate)));
        assert_eq!(parse_line("Quit", "Quit"), Ok(Some(Request::Terminate)));
    }

    #[test]
    fn rejects_bad_arity_unknown_command_and_bad_numbers() {
        assert_eq!(
            parse_line("BuyComputer", "Close"),
            Err(DispatchError::Arity { command: "BuyComputer".to_string(), expected: 1, found: 0 })
        );
        assert_eq!(
            parse_line("Refund 3", "Close"),
            Err(DispatchError::UnknownCommand("Refund".to_string()))
        );
        assert_eq!(
            parse_line("BuyBest lots", "Close"),
            Err(DispatchError::InvalidArgument { field: "budget", value: "lots".to_string() })
        );
    }

    #[test]
    fn rejects_negative_prices_and_non_finite_performance() {
        assert_eq!(
            parse_line("AddComputer Laptop 1 Dell XPS -5", "Close"),
            Err(DispatchError::InvalidArgument { field: "price", value: "-5".to_string() })
        );
        for rating in ["NaN", "inf", "-1.5"] {
            let line = format!("AddPeripheral 1 2 Mouse Logi MX 20 {rating} USB");
            assert_eq!(
                parse_line(&line, "Close"),
                Err(DispatchError::InvalidArgument {
                    field: "performance",
                    value: rating.to_string()
                }),
                "{rating}"
            );
        }
        assert!(matches!(
            parse_line("AddComponent 1 2 VideoCard Nvidia RTX 0 0 1", "Close"),
            Ok(Some(Request::AddComponent { .. }))
        ));
    }

    #[test]
    fn execute_routes_to_catalog() {
        let mut catalog = Catalog::new();
        let add = parse_line("AddComputer DesktopComputer 4 HP Omen 1200", "Close")
            .expect("valid")
            .expect("present");
        let part = parse_line("AddComponent 4 8 VideoCard Nvidia RTX 700 95.5 4", "Close")
            .expect("valid")
            .expect("present");

        assert_eq!(
            execute(&mut catalog, &add),
            Some(Ok("Computer with id 4 added successfully.".to_string()))
        );
        assert_eq!(
            execute(&mut catalog, &part),
            Some(Ok(
                "Component VideoCard with id 8 added successfully in computer with id 4."
                    .to_string()
            ))
        );
        assert_eq!(execute(&mut catalog, &Request::Terminate), None);
    }
}

use std::{fmt, str::FromStr};

use electromonitor_core::domain::PaymentType;

use crate::validation::{LoginForm, SignUpForm};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Officer,
    Customer,
}

impl FromStr for Role {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "officer" | "eb" | "eb-officer" => Ok(Self::Officer),
            "customer" => Ok(Self::Customer),
            other => Err(CommandError::UnknownRole(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Officer => f.write_str("EB Officer"),
            Self::Customer => f.write_str("Customer"),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}', type `help` for the command list")]
    Unknown(String),
    #[error("unknown role '{0}', expected `officer` or `customer`")]
    UnknownRole(String),
    #[error("usage: {0}")]
    Syntax(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Role(Role),
    Switch,
    /// Raw form fields; validated by the session.
    Usage {
        customer_id: String,
        usage: String,
        chip_id: String,
    },
    Table,
    /// Officer records an offline payment.
    Paid { customer_id: String },
    Select { customer_id: String },
    View,
    Pay { method: Option<PaymentType> },
    SignUp(SignUpForm),
    Login(LoginForm),
    Dismiss,
    Records,
    Metrics,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(CommandError::Syntax("<command> [args...]"));
        };
        let args: Vec<&str> = words.collect();
        let arg = |i: usize| args.get(i).copied().unwrap_or_default().to_string();

        match head.to_ascii_lowercase().as_str() {
            "role" => match args.as_slice() {
                [role] => Ok(Self::Role(role.parse()?)),
                _ => Err(CommandError::Syntax("role officer|customer")),
            },
            "switch" => Ok(Self::Switch),
            // Missing fields are passed through empty so the form validation
            // reports them the same way as blank inputs.
            "usage" => Ok(Self::Usage {
                customer_id: arg(0),
                usage: arg(1),
                chip_id: arg(2),
            }),
            "table" => Ok(Self::Table),
            "paid" => match args.as_slice() {
                [id] => Ok(Self::Paid { customer_id: id.to_string() }),
                _ => Err(CommandError::Syntax("paid <customer-id>")),
            },
            "select" => match args.as_slice() {
                [id] => Ok(Self::Select { customer_id: id.to_string() }),
                _ => Err(CommandError::Syntax("select <customer-id>")),
            },
            "view" | "dashboard" => Ok(Self::View),
            "pay" => match args.as_slice() {
                [] => Ok(Self::Pay { method: None }),
                [method] => Ok(Self::Pay { method: method.parse().ok() }),
                _ => Err(CommandError::Syntax("pay [method]")),
            },
            "signup" => {
                if args.len() < 4 {
                    return Err(CommandError::Syntax("signup <phone> <name...> <password> <confirm-password>"));
                }
                let n = args.len();
                Ok(Self::SignUp(SignUpForm {
                    phone: args[0].to_string(),
                    name: args[1..n - 2].join(" "),
                    password: args[n - 2].to_string(),
                    confirm_password: args[n - 1].to_string(),
                }))
            }
            "login" => Ok(Self::Login(LoginForm {
                phone: arg(0),
                password: arg(1),
            })),
            "dismiss" | "close" => Ok(Self::Dismiss),
            "records" => Ok(Self::Records),
            "metrics" => Ok(Self::Metrics),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

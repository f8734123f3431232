mod base;
mod interface;
mod printer;

pub use base::ConfigError;
pub(crate) use base::{Action, Bindings, Engine, OptionConfig, ParseError};
pub(crate) use interface::{ConsoleInterface, UserInterface};
pub(crate) use printer::Printer;

#[cfg(test)]
pub(crate) use interface::util::InMemoryInterface;

use thiserror::Error;

/// Behaviour to convert a raw input `&str` into a destination variable.
///
/// A binding sits at the bottom of the parser object graph; the destination variable
/// is captured by mutable reference when the binding is constructed, and conversion
/// success/failure is the only observable effect besides that mutation.
pub trait Binding {
    /// Whether the bound option requires an argument on the command line.
    fn takes_value(&self) -> bool;

    /// Declare that the option has been matched.
    /// Bindings which take no value (ex: [`Flag`](crate::Flag)) act on this alone.
    fn matched(&mut self);

    /// Convert a raw token into the destination.
    /// On failure the destination must be left unchanged, except where a binding
    /// documents partial mutation (ex: [`List`](crate::List)).
    fn convert(&mut self, token: &str) -> Result<(), BindError>;
}

/// The conversion failure of a single raw token.
#[derive(Debug, Error)]
pub enum BindError {
    /// The token could not be interpreted as the destination's type.
    #[error("cannot interpret '{token}' as {type_name}")]
    InvalidToken {
        /// The offending raw token.
        token: String,
        /// The destination type.
        type_name: &'static str,
    },
    /// The token named a path which could not be opened for reading.
    #[error("unable to open '{path}': {message}")]
    FileOpen {
        /// The offending path, verbatim from the command line.
        path: String,
        /// The underlying I/O error description.
        message: String,
    },
    /// A caller-supplied predicate rejected the token.
    #[error("argument '{token}' failed validation")]
    Rejected {
        /// The offending raw token.
        token: String,
    },
}

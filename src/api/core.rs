use std::collections::HashMap;
use std::env;
use std::rc::Rc;

use crate::api::binding::Binding;
use crate::api::field::Check;
use crate::constant::*;
use crate::model::{Behavior, Declaration, Expected};
use crate::parser::{
    Action, Bindings, ConfigError, ConsoleInterface, Engine, OptionConfig, ParseError, Printer,
    UserInterface,
};

/// The option parser.
///
/// Holds the declared options and their bindings, drives a single parse of the
/// argument vector through the recognition engine, collects the positional
/// arguments, and enforces the expected positional count.
///
/// A parser may be reused: a repeated parse resets the positional sequence but keeps
/// the registrations.
///
/// ### Example
/// ```
/// use optbind::{Declaration, OptionParser, Value};
///
/// let mut threshold: f64 = 0.0;
/// let mut parser = OptionParser::new("program");
/// parser
///     .add_option(Declaration::new(1, "threshold"), Value::new(&mut threshold))
///     .unwrap();
///
/// parser.parse_tokens(&["--threshold", "0.5"], "", None).unwrap();
///
/// drop(parser);
/// assert_eq!(threshold, 0.5);
/// ```
pub struct OptionParser<'a> {
    program: String,
    configs: Vec<OptionConfig>,
    bindings: Bindings<'a>,
    expected: Expected,
    positionals: Vec<String>,
    behavior: Behavior,
    user_interface: Rc<dyn UserInterface>,
}

impl<'a> std::fmt::Debug for OptionParser<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionParser")
            .field("program", &self.program)
            .finish()
    }
}

impl<'a> OptionParser<'a> {
    /// Create an option parser, expecting precisely `0` positional arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self::with_interface(program, Rc::new(ConsoleInterface::default()))
    }

    pub(crate) fn with_interface(
        program: impl Into<String>,
        user_interface: Rc<dyn UserInterface>,
    ) -> Self {
        Self {
            program: program.into(),
            configs: Vec::default(),
            bindings: HashMap::default(),
            expected: Expected::Exactly(0),
            positionals: Vec::default(),
            behavior: Behavior::default(),
            user_interface,
        }
    }

    /// Set the expected count of trailing positional arguments.
    ///
    /// ### Example
    /// ```
    /// use optbind::{Behavior, Expected, OptionParser};
    ///
    /// let mut parser = OptionParser::new("program");
    /// parser.add_flags(Behavior::QUIET);
    /// parser.expect(Expected::Exactly(1));
    ///
    /// assert_eq!(parser.parse_tokens(&["file.txt"], "FILE", None), Ok(()));
    /// assert_eq!(parser.parse_tokens(&[], "FILE", None), Err(1));
    /// ```
    pub fn expect(&mut self, expected: Expected) {
        self.expected = expected;
    }

    /// Register an option, associating its key with the binding.
    ///
    /// Whether the option requires an argument is derived from the binding.
    /// Registering a duplicate key, long name, or short name fails with a
    /// [`ConfigError`]. While automatic help is active, `--help` and `-h` are
    /// reserved and also fail; install [`Behavior::NO_AUTO_HELP`] first to claim
    /// them.
    pub fn add_option(
        &mut self,
        declaration: Declaration,
        binding: impl Binding + 'a,
    ) -> Result<(), ConfigError> {
        if !self.behavior.contains(Behavior::NO_AUTO_HELP) {
            if declaration.long() == HELP_NAME {
                return Err(ConfigError(format!(
                    "Cannot use the reserved option '--{HELP_NAME}'."
                )));
            }

            if declaration.short_name() == Some(HELP_SHORT) {
                return Err(ConfigError(format!(
                    "Cannot use the reserved short option '-{HELP_SHORT}'."
                )));
            }
        }

        for config in &self.configs {
            if config.key() == declaration.key() {
                return Err(ConfigError(format!(
                    "Cannot duplicate the key '{}'.",
                    declaration.key()
                )));
            }

            if config.long() == declaration.long() {
                return Err(ConfigError(format!(
                    "Cannot duplicate the option '--{}'.",
                    declaration.long()
                )));
            }

            if declaration.short_name().is_some() && config.short_name() == declaration.short_name()
            {
                return Err(ConfigError(format!(
                    "Cannot duplicate the short option '-{}'.",
                    declaration
                        .short_name()
                        .expect("internal error - short must be set")
                )));
            }
        }

        let takes_value = binding.takes_value();
        self.bindings.insert(declaration.key(), Box::new(binding));
        self.configs.push(OptionConfig::new(declaration, takes_value));
        Ok(())
    }

    /// Register an option validated by a caller-supplied predicate over the raw text.
    ///
    /// On predicate failure the parse error attributes the failure to this option and
    /// the offending value.
    ///
    /// ### Example
    /// ```
    /// use optbind::{Declaration, OptionParser};
    ///
    /// let mut parser = OptionParser::new("program");
    /// parser
    ///     .add_check(Declaration::new(1, "name"), |token| !token.is_empty())
    ///     .unwrap();
    ///
    /// assert!(parser.parse_tokens(&["--name", "Alice"], "", None).is_ok());
    /// ```
    pub fn add_check(
        &mut self,
        declaration: Declaration,
        predicate: impl Fn(&str) -> bool + 'a,
    ) -> Result<(), ConfigError> {
        self.add_option(declaration, Check::new(predicate))
    }

    /// Install behavior flags (OR'd into the flag set).
    pub fn add_flags(&mut self, flags: Behavior) {
        self.behavior |= flags;
    }

    /// Remove behavior flags (AND-NOT'd out of the flag set).
    pub fn remove_flags(&mut self, flags: Behavior) {
        self.behavior.remove(flags);
    }

    /// The positional arguments collected by the most recent parse, in encounter
    /// order.
    pub fn arguments(&self) -> &[String] {
        &self.positionals
    }

    /// Run the option parser against the input tokens.
    ///
    /// The tokens are fed through the recognition engine; each recognized option
    /// occurrence dispatches to its binding, and each non-option token is collected
    /// as a positional argument. At end-of-input the positional count is checked
    /// against the expectation.
    ///
    /// `usage` documents the trailing positional arguments (ex: `"FILE"`); `about`
    /// is the optional extended help text. Both feed the generated usage/help
    /// output.
    ///
    /// Returns `Err(0)` when the help message was displayed, `Err(1)` on any
    /// failure. Failures print a message and a usage summary to the error stream,
    /// unless [`Behavior::QUIET`] is installed.
    pub fn parse_tokens(
        &mut self,
        tokens: &[&str],
        usage: &str,
        about: Option<&str>,
    ) -> Result<(), i32> {
        self.positionals.clear();
        let auto_help = !self.behavior.contains(Behavior::NO_AUTO_HELP);
        let quiet = self.behavior.contains(Behavior::QUIET);

        let outcome = Engine::new(
            &self.configs,
            &mut self.bindings,
            &mut self.positionals,
            auto_help,
        )
        .consume(tokens);
        let printer = Printer::new(&self.configs, usage, about, auto_help);

        let error = match outcome {
            Ok(Action::PrintHelp) => {
                printer.print_help(&self.program, &*self.user_interface);
                return Err(0);
            }
            Ok(Action::Complete) => match self.expected {
                Expected::Exactly(count) if self.positionals.len() > count => {
                    Some(ParseError("too many arguments given".to_string()))
                }
                Expected::Exactly(count) if self.positionals.len() < count => {
                    Some(ParseError("too few arguments given".to_string()))
                }
                _ => None,
            },
            Err(parse_error) => Some(parse_error),
        };

        match error {
            Some(parse_error) => {
                if !quiet {
                    self.user_interface.print_error(parse_error);
                    printer.print_usage(&self.program, &*self.user_interface);
                }

                Err(1)
            }
            None => Ok(()),
        }
    }

    /// Run the option parser against the Cli [`env::args`].
    ///
    /// Returns `true` iff the parse completed without error and the positional count
    /// matched; callers are expected to translate `false` into a failing process
    /// exit. A help request displays the help message and exits with code `0`,
    /// before returning.
    pub fn parse(&mut self, usage: &str, about: Option<&str>) -> bool {
        let command_input: Vec<String> = env::args().skip(1).collect();
        match self.parse_tokens(
            command_input
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .as_slice(),
            usage,
            about,
        ) {
            Ok(()) => true,
            Err(0) => std::process::exit(0),
            Err(_) => false,
        }
    }
}

use std::collections::HashMap;

use lexopt::prelude::*;
use thiserror::Error;

use crate::api::Binding;
use crate::constant::*;
use crate::model::Declaration;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// An invalid parser configuration (ex: a duplicated option key).
#[derive(Debug, Error)]
#[error("Config error: {0}")]
pub struct ConfigError(pub(crate) String);

#[derive(Debug, Error)]
#[error("Parse error: {0}")]
pub(crate) struct ParseError(pub(crate) String);

impl From<lexopt::Error> for ParseError {
    fn from(error: lexopt::Error) -> Self {
        ParseError(error.to_string())
    }
}

// A declaration plus the argument-requirement derived from its binding.
#[derive(Debug, Clone)]
pub(crate) struct OptionConfig {
    declaration: Declaration,
    takes_value: bool,
}

impl OptionConfig {
    pub(crate) fn new(declaration: Declaration, takes_value: bool) -> Self {
        Self {
            declaration,
            takes_value,
        }
    }

    pub(crate) fn key(&self) -> i32 {
        self.declaration.key()
    }

    pub(crate) fn long(&self) -> &str {
        self.declaration.long()
    }

    pub(crate) fn short_name(&self) -> Option<char> {
        self.declaration.short_name()
    }

    pub(crate) fn description(&self) -> Option<&str> {
        self.declaration.description()
    }

    pub(crate) fn takes_value(&self) -> bool {
        self.takes_value
    }
}

// We need a (dyn .. [ignoring the destination type] ..) here in order to put all the
// bindings of varying destinations under one collection, keyed by declaration key.
pub(crate) type Bindings<'a> = HashMap<i32, Box<dyn Binding + 'a>>;

/// Drives a single pass of the argument vector through the recognition engine.
///
/// The engine (`lexopt`) owns token classification; this type only dispatches each
/// recognized occurrence to its binding and collects the positional arguments.
pub(crate) struct Engine<'e, 'a> {
    configs: &'e [OptionConfig],
    bindings: &'e mut Bindings<'a>,
    positionals: &'e mut Vec<String>,
    auto_help: bool,
}

impl<'e, 'a> Engine<'e, 'a> {
    pub(crate) fn new(
        configs: &'e [OptionConfig],
        bindings: &'e mut Bindings<'a>,
        positionals: &'e mut Vec<String>,
        auto_help: bool,
    ) -> Self {
        Self {
            configs,
            bindings,
            positionals,
            auto_help,
        }
    }

    pub(crate) fn consume(self, tokens: &[&str]) -> Result<Action, ParseError> {
        let Engine {
            configs,
            bindings,
            positionals,
            auto_help,
        } = self;
        let mut raw = lexopt::Parser::from_args(tokens.iter().copied());

        while let Some(arg) = raw.next()? {
            // Classification (option vs. positional, flag syntax, '--') is entirely
            // the engine's; the declared options are resolved with a linear scan.
            let (display, long_form, found) = match arg {
                Short(short) if auto_help && short == HELP_SHORT => {
                    return Ok(Action::PrintHelp);
                }
                Long(long) if auto_help && long == HELP_NAME => {
                    return Ok(Action::PrintHelp);
                }
                Short(short) => (
                    format!("-{short}"),
                    false,
                    configs
                        .iter()
                        .find(|config| config.short_name() == Some(short)),
                ),
                Long(long) => (
                    format!("--{long}"),
                    true,
                    configs.iter().find(|config| config.long() == long),
                ),
                Value(value) => {
                    let token = value.into_string().map_err(lexopt::Error::NonUnicodeValue)?;
                    #[cfg(feature = "tracing_debug")]
                    {
                        debug!("Collected positional argument '{token}'.");
                    }
                    positionals.push(token);
                    continue;
                }
            };

            let config = match found {
                Some(config) => config,
                None => {
                    return Err(ParseError(format!("unrecognized option '{display}'")));
                }
            };

            #[cfg(feature = "tracing_debug")]
            {
                debug!(
                    "Matched '{display}' to key {key}.",
                    display = display,
                    key = config.key()
                );
            }

            let binding = bindings
                .get_mut(&config.key())
                .expect("internal error - every declared key must have a binding");
            binding.matched();

            if config.takes_value() {
                let value = raw.value()?;
                let token = value.into_string().map_err(lexopt::Error::NonUnicodeValue)?;
                binding
                    .convert(&token)
                    .map_err(|error| ParseError(format!("{display}: {error}")))?;
            } else if long_form {
                // A no-argument long option ignores any attached '=text'. A short
                // match must not touch the remainder, which the engine continues
                // to consume as a combined flag cluster.
                let _ = raw.optional_value();
            }
        }

        Ok(Action::Complete)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Complete,
    PrintHelp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Flag, Value};
    use crate::test::assert_contains;
    use rstest::rstest;

    #[test]
    fn engine_empty() {
        // Setup
        let configs = Vec::default();
        let mut bindings: Bindings = HashMap::default();
        let mut positionals = Vec::default();

        // Execute
        let result = Engine::new(&configs, &mut bindings, &mut positionals, true)
            .consume(&[])
            .unwrap();

        // Verify
        assert_eq!(result, Action::Complete);
        assert_eq!(positionals, Vec::<String>::default());
    }

    #[rstest]
    #[case(vec!["--variable", "1"])]
    #[case(vec!["--variable=1"])]
    #[case(vec!["-v", "1"])]
    #[case(vec!["-v=1"])]
    fn engine_option(#[case] tokens: Vec<&str>) {
        // Setup
        let mut variable: u32 = 0;
        let binding = Value::new(&mut variable);
        let configs = vec![OptionConfig::new(
            Declaration::new(1, "variable").short('v'),
            binding.takes_value(),
        )];
        let mut bindings: Bindings = HashMap::from([(1, Box::new(binding) as Box<dyn Binding>)]);
        let mut positionals = Vec::default();

        // Execute
        let result = Engine::new(&configs, &mut bindings, &mut positionals, true)
            .consume(tokens.as_slice())
            .unwrap();

        // Verify
        assert_eq!(result, Action::Complete);
        drop(bindings);
        assert_eq!(variable, 1);
    }

    #[rstest]
    #[case(vec!["--flag"])]
    #[case(vec!["-f"])]
    #[case(vec!["--flag=anything"])]
    fn engine_flag(#[case] tokens: Vec<&str>) {
        // Setup
        let mut variable: bool = false;
        let binding = Flag::new(&mut variable);
        let configs = vec![OptionConfig::new(
            Declaration::new(1, "flag").short('f'),
            binding.takes_value(),
        )];
        let mut bindings: Bindings = HashMap::from([(1, Box::new(binding) as Box<dyn Binding>)]);
        let mut positionals = Vec::default();

        // Execute
        let result = Engine::new(&configs, &mut bindings, &mut positionals, true)
            .consume(tokens.as_slice())
            .unwrap();

        // Verify
        assert_eq!(result, Action::Complete);
        drop(bindings);
        assert!(variable);
    }

    #[rstest]
    #[case(vec!["-a", "-b"])]
    #[case(vec!["-ab"])]
    #[case(vec!["-ba"])]
    fn engine_flag_cluster(#[case] tokens: Vec<&str>) {
        // Setup
        let mut alpha: bool = false;
        let mut beta: bool = false;
        let binding_alpha = Flag::new(&mut alpha);
        let binding_beta = Flag::new(&mut beta);
        let configs = vec![
            OptionConfig::new(
                Declaration::new(1, "alpha").short('a'),
                binding_alpha.takes_value(),
            ),
            OptionConfig::new(
                Declaration::new(2, "beta").short('b'),
                binding_beta.takes_value(),
            ),
        ];
        let mut bindings: Bindings = HashMap::from([
            (1, Box::new(binding_alpha) as Box<dyn Binding>),
            (2, Box::new(binding_beta) as Box<dyn Binding>),
        ]);
        let mut positionals = Vec::default();

        // Execute
        let result = Engine::new(&configs, &mut bindings, &mut positionals, true)
            .consume(tokens.as_slice())
            .unwrap();

        // Verify
        // A combined cluster dispatches every short flag it contains.
        assert_eq!(result, Action::Complete);
        drop(bindings);
        assert!(alpha);
        assert!(beta);
    }

    #[rstest]
    #[case(vec!["a", "b"], vec!["a", "b"])]
    #[case(vec!["a", "--flag", "b"], vec!["a", "b"])]
    #[case(vec!["--", "--flag", "b"], vec!["--flag", "b"])]
    fn engine_positionals(#[case] tokens: Vec<&str>, #[case] expected: Vec<&str>) {
        // Setup
        let mut variable: bool = false;
        let binding = Flag::new(&mut variable);
        let configs = vec![OptionConfig::new(
            Declaration::new(1, "flag"),
            binding.takes_value(),
        )];
        let mut bindings: Bindings = HashMap::from([(1, Box::new(binding) as Box<dyn Binding>)]);
        let mut positionals = Vec::default();

        // Execute
        let result = Engine::new(&configs, &mut bindings, &mut positionals, true)
            .consume(tokens.as_slice())
            .unwrap();

        // Verify
        assert_eq!(result, Action::Complete);
        assert_eq!(
            positionals,
            expected
                .into_iter()
                .map(|s| s.to_string())
                .collect::<Vec<String>>()
        );
    }

    #[rstest]
    #[case(vec!["--help"])]
    #[case(vec!["-h"])]
    #[case(vec!["--help", "not-a-u32"])]
    #[case(vec!["-h", "not-a-u32"])]
    fn engine_help(#[case] tokens: Vec<&str>) {
        // Setup
        let mut variable: u32 = 0;
        let binding = Value::new(&mut variable);
        let configs = vec![OptionConfig::new(
            Declaration::new(1, "variable"),
            binding.takes_value(),
        )];
        let mut bindings: Bindings = HashMap::from([(1, Box::new(binding) as Box<dyn Binding>)]);
        let mut positionals = Vec::default();

        // Execute
        let result = Engine::new(&configs, &mut bindings, &mut positionals, true)
            .consume(tokens.as_slice())
            .unwrap();

        // Verify
        assert_eq!(result, Action::PrintHelp);
        drop(bindings);
        assert_eq!(variable, 0);
    }

    #[test]
    fn engine_help_suppressed() {
        // Setup
        let configs = Vec::default();
        let mut bindings: Bindings = HashMap::default();
        let mut positionals = Vec::default();

        // Execute
        let error = Engine::new(&configs, &mut bindings, &mut positionals, false)
            .consume(&["--help"])
            .unwrap_err();

        // Verify
        assert_contains!(error.to_string(), "unrecognized option '--help'");
    }

    #[rstest]
    #[case(vec!["--nope"], "--nope")]
    #[case(vec!["-n"], "-n")]
    fn engine_unrecognized(#[case] tokens: Vec<&str>, #[case] display: &str) {
        // Setup
        let configs = Vec::default();
        let mut bindings: Bindings = HashMap::default();
        let mut positionals = Vec::default();

        // Execute
        let error = Engine::new(&configs, &mut bindings, &mut positionals, true)
            .consume(tokens.as_slice())
            .unwrap_err();

        // Verify
        assert_contains!(
            error.to_string(),
            &format!("unrecognized option '{display}'")
        );
    }

    #[test]
    fn engine_missing_value() {
        // Setup
        let mut variable: u32 = 0;
        let binding = Value::new(&mut variable);
        let configs = vec![OptionConfig::new(
            Declaration::new(1, "variable"),
            binding.takes_value(),
        )];
        let mut bindings: Bindings = HashMap::from([(1, Box::new(binding) as Box<dyn Binding>)]);
        let mut positionals = Vec::default();

        // Execute
        let error = Engine::new(&configs, &mut bindings, &mut positionals, true)
            .consume(&["--variable"])
            .unwrap_err();

        // Verify
        assert_contains!(error.to_string(), "variable");
        drop(bindings);
        assert_eq!(variable, 0);
    }

    #[test]
    fn engine_convert_error() {
        // Setup
        let mut variable: u32 = 0;
        let binding = Value::new(&mut variable);
        let configs = vec![OptionConfig::new(
            Declaration::new(1, "variable"),
            binding.takes_value(),
        )];
        let mut bindings: Bindings = HashMap::from([(1, Box::new(binding) as Box<dyn Binding>)]);
        let mut positionals = Vec::default();

        // Execute
        let error = Engine::new(&configs, &mut bindings, &mut positionals, true)
            .consume(&["--variable", "not-a-u32"])
            .unwrap_err();

        // Verify
        assert_contains!(
            error.to_string(),
            "--variable: cannot interpret 'not-a-u32' as u32"
        );
        drop(bindings);
        assert_eq!(variable, 0);
    }

    #[test]
    fn engine_dispatch_order() {
        // Setup
        let mut variable: u32 = 0;
        let binding = Value::new(&mut variable);
        let configs = vec![OptionConfig::new(
            Declaration::new(1, "variable").short('v'),
            binding.takes_value(),
        )];
        let mut bindings: Bindings = HashMap::from([(1, Box::new(binding) as Box<dyn Binding>)]);
        let mut positionals = Vec::default();

        // Execute
        // Occurrences dispatch in encounter order; the final occurrence wins.
        let result = Engine::new(&configs, &mut bindings, &mut positionals, true)
            .consume(&["-v", "1", "--variable", "2"])
            .unwrap();

        // Verify
        assert_eq!(result, Action::Complete);
        drop(bindings);
        assert_eq!(variable, 2);
    }
}

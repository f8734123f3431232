/// The metadata describing one recognized option.
///
/// A declaration is immutable once registered on an [`OptionParser`](crate::OptionParser).
/// Whether the option requires an argument is derived from its binding at registration
/// time, not declared here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    key: i32,
    long: String,
    short: Option<char>,
    help: Option<String>,
}

impl Declaration {
    /// Create a declaration with a distinct `key` and a long name (matched as `--long`).
    pub fn new(key: i32, long: impl Into<String>) -> Self {
        Self {
            key,
            long: long.into(),
            short: None,
            help: None,
        }
    }

    /// Set the short name (matched as `-s`).
    /// If repeated, only the final short name will apply.
    pub fn short(mut self, short: char) -> Self {
        self.short.replace(short);
        self
    }

    /// Document the help message for this option.
    /// If repeated, only the final message will apply.
    pub fn help(mut self, description: impl Into<String>) -> Self {
        self.help.replace(description.into());
        self
    }

    pub(crate) fn key(&self) -> i32 {
        self.key
    }

    pub(crate) fn long(&self) -> &str {
        &self.long
    }

    pub(crate) fn short_name(&self) -> Option<char> {
        self.short
    }

    pub(crate) fn description(&self) -> Option<&str> {
        self.help.as_deref()
    }
}

/// The expected count of trailing positional arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    /// Precisely `N` positional arguments.
    Exactly(usize),
    /// Any number of positional arguments, including `0`.
    Unlimited,
}

/// Behavior flags consumed by [`OptionParser::parse_tokens`](crate::OptionParser::parse_tokens).
///
/// Flags combine with `|`, and are installed/removed via
/// [`OptionParser::add_flags`](crate::OptionParser::add_flags) and
/// [`OptionParser::remove_flags`](crate::OptionParser::remove_flags).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Behavior(u32);

impl Behavior {
    /// Suppress automatic error and usage output.
    /// Failures are still reflected in the parse result.
    pub const QUIET: Behavior = Behavior(1);
    /// Suppress the automatic `-h`/`--help` option.
    pub const NO_AUTO_HELP: Behavior = Behavior(1 << 1);

    pub(crate) fn contains(&self, other: Behavior) -> bool {
        self.0 & other.0 == other.0
    }

    pub(crate) fn remove(&mut self, other: Behavior) {
        self.0 &= !other.0;
    }
}

impl std::ops::BitOr for Behavior {
    type Output = Behavior;

    fn bitor(self, rhs: Behavior) -> Behavior {
        Behavior(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for Behavior {
    fn bitor_assign(&mut self, rhs: Behavior) {
        self.0 |= rhs.0;
    }
}

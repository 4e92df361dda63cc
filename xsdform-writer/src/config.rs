//! Generator configuration.

/// How slots declared inside an `xs:choice` are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChoicePolicy {
    /// Treat choice members like sequence members and emit all of them.
    #[default]
    Merge,
    /// Emit one alternative per choice group: the one carrying data, or the
    /// first when none does. Data in two alternatives is an error.
    Exclusive,
}

/// Settings for document generation and serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeneratorConfig {
    choice_policy: ChoicePolicy,
    indent: Option<usize>,
}

impl GeneratorConfig {
    /// Creates a configuration with default settings (merge, compact output).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the choice policy.
    #[must_use]
    pub fn choice_policy(mut self, policy: ChoicePolicy) -> Self {
        self.choice_policy = policy;
        self
    }

    /// Pretty-prints output with `spaces` per nesting level.
    #[must_use]
    pub fn indent(mut self, spaces: usize) -> Self {
        self.indent = Some(spaces);
        self
    }

    /// Returns the choice policy.
    #[must_use]
    pub const fn choices(&self) -> ChoicePolicy {
        self.choice_policy
    }

    /// Returns the indentation width, if pretty-printing.
    #[must_use]
    pub const fn indentation(&self) -> Option<usize> {
        self.indent
    }
}

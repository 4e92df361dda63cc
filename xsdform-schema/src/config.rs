//! Compiler configuration.

/// Which attribute declarations belong to a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributeScope {
    /// Every attribute declared anywhere under the complex type, including
    /// those of nested element declarations.
    #[default]
    Deep,
    /// Only attributes declared by the type itself, not by nested elements.
    Local,
}

/// How the dictionary resolves a short name found in several tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Keep the first record seen and warn about later ones.
    #[default]
    FirstWins,
    /// Let later tables overwrite earlier ones.
    LastWins,
}

/// Settings for dictionary loading and schema compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompilerConfig {
    attribute_scope: AttributeScope,
    collision_policy: CollisionPolicy,
}

impl CompilerConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the attribute collection scope.
    #[must_use]
    pub fn attribute_scope(mut self, scope: AttributeScope) -> Self {
        self.attribute_scope = scope;
        self
    }

    /// Sets the dictionary collision policy.
    #[must_use]
    pub fn collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    /// Returns the attribute collection scope.
    #[must_use]
    pub const fn scope(&self) -> AttributeScope {
        self.attribute_scope
    }

    /// Returns the dictionary collision policy.
    #[must_use]
    pub const fn collisions(&self) -> CollisionPolicy {
        self.collision_policy
    }
}

//! Compiler configuration.

/// Settings that shape the emitted Dart spellings.
///
/// The defaults match the import aliases used by the Dart FIDL runtime templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    runtime_alias: String,
    zircon_alias: String,
    async_file: String,
    test_file: String,
}

impl CompilerConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            runtime_alias: "$fidl".to_string(),
            zircon_alias: "$zx".to_string(),
            async_file: "fidl_async.dart".to_string(),
            test_file: "fidl_test.dart".to_string(),
        }
    }

    /// Sets the import alias of the FIDL runtime library.
    #[must_use]
    pub fn runtime_alias(mut self, alias: impl Into<String>) -> Self {
        self.runtime_alias = alias.into();
        self
    }

    /// Sets the import alias of the Zircon handle library.
    #[must_use]
    pub fn zircon_alias(mut self, alias: impl Into<String>) -> Self {
        self.zircon_alias = alias.into();
        self
    }

    /// Sets the file name of the async bindings of dependency libraries.
    #[must_use]
    pub fn async_file(mut self, file: impl Into<String>) -> Self {
        self.async_file = file.into();
        self
    }

    /// Sets the file name of the test bindings of dependency libraries.
    #[must_use]
    pub fn test_file(mut self, file: impl Into<String>) -> Self {
        self.test_file = file.into();
        self
    }

    /// Returns the runtime alias.
    #[must_use]
    pub fn fidl(&self) -> &str {
        &self.runtime_alias
    }

    /// Returns the Zircon alias.
    #[must_use]
    pub fn zx(&self) -> &str {
        &self.zircon_alias
    }

    /// Returns the async bindings file name.
    #[must_use]
    pub fn async_file_name(&self) -> &str {
        &self.async_file
    }

    /// Returns the test bindings file name.
    #[must_use]
    pub fn test_file_name(&self) -> &str {
        &self.test_file
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self::new()
    }
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

/// Knobs of one compilation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Function that must be defined and is exported from the text section.
    pub entry_point: String,

    /// Data label of the newline string used by `print`.
    pub newline_label: String,

    /// Prefix of generated control-flow labels.
    pub label_prefix: String,

    /// Abort on the first warning.
    pub warnings_as_errors: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            entry_point: "main".to_string(),
            newline_label: "_newline".to_string(),
            label_prefix: "_L".to_string(),
            warnings_as_errors: false,
        }
    }
}

impl CompilerConfig {
    /// Whether a file-scope name would clash with a label the code generator
    /// emits on its own: the newline string or `label_prefix` followed by a
    /// counter.
    pub fn is_reserved_label(&self, name: &str) -> bool {
        if name == self.newline_label {
            return true;
        }
        name.strip_prefix(self.label_prefix.as_str())
            .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
    }
}

#[derive(Debug, Default)]
pub struct CompilerConfigBuilder {
    entry_point: Option<String>,
    newline_label: Option<String>,
    label_prefix: Option<String>,
    warnings_as_errors: Option<bool>,
}

impl CompilerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry_point(mut self, name: &str) -> Self {
        self.entry_point = Some(name.to_string());
        self
    }

    pub fn newline_label(mut self, label: &str) -> Self {
        self.newline_label = Some(label.to_string());
        self
    }

    pub fn label_prefix(mut self, prefix: &str) -> Self {
        self.label_prefix = Some(prefix.to_string());
        self
    }

    pub fn warnings_as_errors(mut self, value: bool) -> Self {
        self.warnings_as_errors = Some(value);
        self
    }

    pub fn build(self) -> CompilerConfig {
        let defaults = CompilerConfig::default();
        CompilerConfig {
            entry_point: self.entry_point.unwrap_or(defaults.entry_point),
            newline_label: self.newline_label.unwrap_or(defaults.newline_label),
            label_prefix: self.label_prefix.unwrap_or(defaults.label_prefix),
            warnings_as_errors: self.warnings_as_errors.unwrap_or(defaults.warnings_as_errors),
        }
    }
}

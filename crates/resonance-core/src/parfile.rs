//! Parameter-file templating.
//!
//! A template is an ordinary solver parameter file. Every assignment of the
//! amplitude key (optionally thorn-qualified, e.g. `Scalar::initial_amplitude`)
//! has its numeric value replaced by the run's amplitude.

use crate::error::{ResonanceError, Result};
use regex::{Captures, Regex};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct ParTemplate {
    text: String,
    pattern: Regex,
}

impl ParTemplate {
    /// Read a template from disk and check that it assigns `key`.
    pub fn load(path: &Path, key: &str) -> Result<Self> {
        if !path.is_file() {
            return Err(ResonanceError::TemplateNotFound(path.display().to_string()));
        }
        let text = std::fs::read_to_string(path)?;
        let template = Self::parse(text, key)?;
        if !template.has_key() {
            return Err(ResonanceError::TemplateKeyMissing {
                key: key.to_string(),
                path: path.display().to_string(),
            });
        }
        Ok(template)
    }

    /// Build a template from text without checking that `key` is present.
    pub fn parse(text: String, key: &str) -> Result<Self> {
        let pattern = Regex::new(&format!(
            r"(?m)^(\s*(?:[A-Za-z_][A-Za-z0-9_]*::)?{}\s*=\s*)[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?",
            regex::escape(key)
        ))?;
        Ok(Self { text, pattern })
    }

    pub fn has_key(&self) -> bool {
        self.pattern.is_match(&self.text)
    }

    /// Render the template with `amplitude` written as a float literal.
    pub fn render(&self, amplitude: u64) -> String {
        self.pattern
            .replace_all(&self.text, |caps: &Captures| {
                format!("{}{amplitude}.0", &caps[1])
            })
            .into_owned()
    }
}

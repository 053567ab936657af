//! Drift report templating.
//!
//! The template source comes from an external file store; parse and render
//! failures are a caller/config bug and therefore fatal to the whole scan,
//! unlike per-stack plan failures which are tolerated.

use conveyor_core::{Error, Result};
use minijinja::Environment;
use serde::Serialize;
use std::path::Path;

const TEMPLATE_NAME: &str = "drift_report";

/// Default report body, matching the module-bundled template file.
pub const DEFAULT_TEMPLATE: &str = "\
:warning: Drift detected on stack `{{ stack_name }}`

```
{{ drift_content }}
```
";

/// Context rendered into the report template, one per drifted stack.
#[derive(Debug, Clone, Serialize)]
pub struct DriftReport {
    pub stack_name: String,
    pub drift_content: String,
}

/// A parsed report template.
#[derive(Debug)]
pub struct ReportTemplate {
    env: Environment<'static>,
}

impl ReportTemplate {
    /// Parse a template source. Fails with a fatal template error on
    /// invalid syntax, before any scan is dispatched.
    pub fn parse(source: impl Into<String>) -> Result<Self> {
        let mut env = Environment::new();
        env.add_template_owned(TEMPLATE_NAME.to_string(), source.into())
            .map_err(|e| Error::template(format!("failed to parse drift report template: {e}")))?;
        Ok(Self { env })
    }

    /// Load and parse a template from the file store.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| Error::file_system(path, "read", e))?;
        Self::parse(source)
    }

    /// Render one drifted stack's report entry.
    pub fn render(&self, report: &DriftReport) -> Result<String> {
        let template = self
            .env
            .get_template(TEMPLATE_NAME)
            .map_err(|e| Error::template(format!("drift report template missing: {e}")))?;
        template
            .render(report)
            .map_err(|e| Error::template(format!("failed to render drift report: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn renders_stack_name_and_content() {
        let template = ReportTemplate::parse(DEFAULT_TEMPLATE).unwrap();
        let rendered = template
            .render(&DriftReport {
                stack_name: "network".to_string(),
                drift_content: "plan exited with code 2".to_string(),
            })
            .unwrap();

        assert!(rendered.contains("`network`"));
        assert!(rendered.contains("plan exited with code 2"));
    }

    #[test]
    fn invalid_syntax_is_a_fatal_template_error() {
        let err = ReportTemplate::parse("{{ unclosed").unwrap_err();
        assert!(matches!(err, Error::Template { .. }));
    }

    #[test]
    fn render_failure_is_a_fatal_template_error() {
        // An unknown function only fails once the template is rendered.
        let template = ReportTemplate::parse("{{ boom() }}").unwrap();
        let err = template
            .render(&DriftReport {
                stack_name: "network".to_string(),
                drift_content: "diff".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, Error::Template { .. }));
    }

    #[test]
    fn loads_template_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "drift on {{{{ stack_name }}}}").unwrap();

        let template = ReportTemplate::from_file(file.path()).unwrap();
        let rendered = template
            .render(&DriftReport {
                stack_name: "dns".to_string(),
                drift_content: String::new(),
            })
            .unwrap();
        assert_eq!(rendered, "drift on dns");
    }

    #[test]
    fn missing_template_file_is_a_file_system_error() {
        let err = ReportTemplate::from_file("/nonexistent/drift.tmpl").unwrap_err();
        assert!(matches!(err, Error::FileSystem { .. }));
    }
}

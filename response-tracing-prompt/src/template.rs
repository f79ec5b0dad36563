use std::collections::HashMap;

use regex::Regex;
use response_tracing_core::{ResponseTracingError, Value};

/// A `{{name}}`-style string template.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Names of the variables referenced by the template, in order of first use.
    pub fn variables(&self) -> Result<Vec<String>, ResponseTracingError> {
        let pattern = placeholder_pattern()?;
        let mut names: Vec<String> = Vec::new();
        for caps in pattern.captures_iter(&self.template) {
            let name = caps[1].to_string();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Ok(names)
    }

    /// Renders the template. Every referenced variable must be present;
    /// string values are inserted verbatim, others as JSON.
    pub fn render(&self, vars: &HashMap<String, Value>) -> Result<String, ResponseTracingError> {
        if let Some(missing) = self
            .variables()?
            .into_iter()
            .find(|name| !vars.contains_key(name))
        {
            return Err(ResponseTracingError::Prompt(format!(
                "missing variable '{missing}'"
            )));
        }

        let pattern = placeholder_pattern()?;
        let rendered = pattern.replace_all(&self.template, |caps: &regex::Captures| {
            match vars.get(&caps[1]) {
                Some(Value::String(text)) => text.clone(),
                Some(value) => value.to_string(),
                None => String::new(),
            }
        });
        Ok(rendered.into_owned())
    }
}

fn placeholder_pattern() -> Result<Regex, ResponseTracingError> {
    Regex::new(r"\{\{\s*(\w+)\s*\}\}")
        .map_err(|e| ResponseTracingError::InvalidConfig(e.to_string()))
}

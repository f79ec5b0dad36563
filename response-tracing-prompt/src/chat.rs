use std::collections::HashMap;

use async_trait::async_trait;
use response_tracing_core::{Message, ResponseTracingError, Role, Runnable, Value};

use crate::PromptTemplate;

#[derive(Debug, Clone)]
pub struct MessagePromptTemplate {
    role: Role,
    template: PromptTemplate,
}

impl MessagePromptTemplate {
    pub fn new(role: Role, template: &str) -> Self {
        Self {
            role,
            template: PromptTemplate::new(template),
        }
    }

    pub fn human(template: &str) -> Self {
        Self::new(Role::User, template)
    }

    pub fn ai(template: &str) -> Self {
        Self::new(Role::Assistant, template)
    }

    pub fn system(template: &str) -> Self {
        Self::new(Role::System, template)
    }

    pub fn format(&self, vars: &HashMap<String, Value>) -> Result<Message, ResponseTracingError> {
        Ok(Message {
            role: self.role.clone(),
            content: self.template.render(vars)?,
        })
    }
}

/// The prompt stage: renders a fixed list of role-tagged templates.
#[derive(Debug, Clone)]
pub struct ChatPromptTemplate {
    messages: Vec<MessagePromptTemplate>,
}

impl ChatPromptTemplate {
    pub fn new(messages: Vec<MessagePromptTemplate>) -> Self {
        Self { messages }
    }

    pub fn from_messages<'a>(messages: impl IntoIterator<Item = (Role, &'a str)>) -> Self {
        Self::new(
            messages
                .into_iter()
                .map(|(role, template)| MessagePromptTemplate::new(role, template))
                .collect(),
        )
    }

    pub fn format_messages(
        &self,
        vars: &HashMap<String, Value>,
    ) -> Result<Vec<Message>, ResponseTracingError> {
        self.messages.iter().map(|tmpl| tmpl.format(vars)).collect()
    }
}

#[async_trait]
impl Runnable<HashMap<String, Value>, Vec<Message>> for ChatPromptTemplate {
    async fn invoke(
        &self,
        input: HashMap<String, Value>,
    ) -> Result<Vec<Message>, ResponseTracingError> {
        self.format_messages(&input)
    }
}

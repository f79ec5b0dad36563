use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

use response_tracing_audit::{AuditCallbackHandler, AuditConfig, DEFAULT_DOMAIN};
use response_tracing_core::{
    ListenerManager, Role, Runnable, RunnableExt, StrOutputParser, TracedLlm, Value,
};
use response_tracing_llm::{OpenAiClient, DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL};
use response_tracing_prompt::ChatPromptTemplate;

const LLM_RUN_NAME: &str = "ChatOpenAI";

/// Send a prompt to OpenAI and record the response in the Secure Audit Log.
#[derive(Debug, Parser)]
#[command(name = "response-tracing", version)]
struct Cli {
    /// OpenAI model.
    #[arg(long, default_value = DEFAULT_OPENAI_MODEL)]
    model: String,

    /// Secure Audit Log API token.
    #[arg(long, env = "PANGEA_AUDIT_TOKEN", hide_env_values = true, value_parser = parse_secret)]
    audit_token: SecretString,

    /// Secure Audit Log configuration ID.
    #[arg(long)]
    audit_config_id: Option<String>,

    /// API domain of the audit service.
    #[arg(long, env = "PANGEA_DOMAIN", default_value = DEFAULT_DOMAIN)]
    pangea_domain: String,

    /// OpenAI API key.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, value_parser = parse_secret)]
    openai_api_key: SecretString,

    /// Base URL of the OpenAI-compatible API.
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_OPENAI_BASE_URL)]
    openai_base_url: String,

    /// Prompt sent as the user message.
    prompt: String,
}

fn parse_secret(value: &str) -> Result<SecretString, Infallible> {
    Ok(SecretString::new(value.to_string()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let output = run(cli).await?;
    println!("{output}");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<String> {
    tracing::debug!(model = %cli.model, domain = %cli.pangea_domain, "assembling pipeline");

    let audit = AuditConfig::new(cli.audit_token)
        .with_domain(cli.pangea_domain)
        .with_config_id(cli.audit_config_id);
    let manager = ListenerManager::new(vec![Arc::new(AuditCallbackHandler::new(audit))]);

    let llm = OpenAiClient::new(cli.openai_api_key, cli.model)
        .context("failed to build OpenAI client")?
        .with_base_url(&cli.openai_base_url)?;

    let chain = ChatPromptTemplate::from_messages([(Role::User, "{{input}}")])
        .then(TracedLlm::new(llm, manager, LLM_RUN_NAME))
        .then(StrOutputParser);

    let vars = HashMap::from([("input".to_string(), Value::String(cli.prompt))]);
    let output = chain.invoke(vars).await?;
    Ok(output)
}

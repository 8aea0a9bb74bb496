//! Catalog, health, model and config handlers.

use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{
    output_json, print_failure, print_header, print_hint, print_kv, print_success, print_table,
    yes_no, OutputMode,
};
use crate::config::StudyflowConfig;
use crate::init::AppContext;
use crate::llm::test_connection;
use crate::models::ToolKind;
use crate::tools::catalog;

pub fn handle_tools(mode: OutputMode) -> Result<()> {
    let entries = catalog();

    if mode == OutputMode::Json {
        output_json(&entries);
        return Ok(());
    }

    print_header("Available Tools");
    let rows = entries
        .iter()
        .map(|e| {
            vec![
                e.name.to_string(),
                e.description.to_string(),
                e.required_parameters.join(", "),
                e.optional_parameters.join(", "),
            ]
        })
        .collect();
    print_table(&["Tool", "Description", "Required", "Optional"], rows);
    Ok(())
}

pub async fn handle_health(ctx: &AppContext, mode: OutputMode) -> Result<()> {
    let health = ctx.dispatcher.health_check().await;

    if mode == OutputMode::Json {
        output_json(&health);
        return Ok(());
    }

    if health.is_empty() {
        print_hint("No tool endpoints configured; every tool runs on the simulator.");
        return Ok(());
    }

    print_header("Tool Backends");
    let rows = ToolKind::ALL
        .into_iter()
        .filter_map(|tool| {
            let healthy = *health.get(tool.as_str())?;
            Some(vec![
                tool.as_str().to_string(),
                ctx.config.tools.endpoints.get(tool).unwrap_or_default().to_string(),
                ctx.dispatcher.backend_name(tool).unwrap_or_default(),
                yes_no(healthy),
            ])
        })
        .collect();
    print_table(&["Tool", "Endpoint", "Backend", "Healthy"], rows);
    Ok(())
}

pub fn handle_llm_info(ctx: &AppContext, mode: OutputMode) -> Result<()> {
    let info = ctx.completion.model_info();

    if mode == OutputMode::Json {
        output_json(&info);
        return Ok(());
    }

    print_header("Language Model");
    print_kv("Provider", &info.provider);
    print_kv("Model", &info.model);
    print_kv("Base URL", &info.base_url);
    print_kv("API key set", &yes_no(info.api_key_set));
    if !ctx.completion.is_available() {
        print_hint("Extraction runs on keyword heuristics only.");
    }
    Ok(())
}

pub async fn handle_llm_test(ctx: &AppContext, mode: OutputMode) -> Result<()> {
    let report = test_connection(ctx.completion.as_ref()).await;

    if mode == OutputMode::Json {
        output_json(&report);
        return Ok(());
    }

    match (&report.response, &report.error) {
        (Some(reply), _) => {
            print_success(&format!("{} answered", report.model_info.model));
            print_kv("Reply", reply.trim());
        }
        (None, error) => {
            print_failure(error.as_deref().unwrap_or("no reply"));
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct ConfigView {
    data_path: String,
    #[serde(flatten)]
    config: StudyflowConfig,
}

/// Config with the API key masked.
fn redacted(config: &StudyflowConfig) -> StudyflowConfig {
    let mut config = config.clone();
    if config.llm.api_key.is_some() {
        config.llm.api_key = Some("********".to_string());
    }
    config
}

pub fn handle_config(ctx: &AppContext, mode: OutputMode) -> Result<()> {
    let config = redacted(&ctx.config);

    if mode == OutputMode::Json {
        output_json(&ConfigView {
            data_path: ctx.data_path.display().to_string(),
            config,
        });
        return Ok(());
    }

    print_header("Configuration");
    print_kv("Data path", &ctx.data_path.display().to_string());
    print_kv("Provider", config.llm.provider.display_name());
    print_kv("Model", &config.llm.model);
    print_kv(
        "API key",
        config.llm.api_key.as_deref().unwrap_or("(not set)"),
    );
    print_kv("Dispatch policy", &config.tools.dispatch_policy.to_string());
    print_kv(
        "Tool request timeout",
        &format!("{}s", config.tools.request_timeout_secs),
    );
    print_kv(
        "Session timeout",
        &format!("{} min", config.session.timeout_minutes),
    );
    print_kv("History window", &config.session.history_window.to_string());
    print_kv("Usage window", &config.session.usage_window.to_string());

    let rows = ToolKind::ALL
        .into_iter()
        .map(|tool| {
            vec![
                tool.as_str().to_string(),
                config
                    .tools
                    .endpoints
                    .get(tool)
                    .unwrap_or("(simulator)")
                    .to_string(),
            ]
        })
        .collect();
    println!();
    print_table(&["Tool", "Endpoint"], rows);
    Ok(())
}

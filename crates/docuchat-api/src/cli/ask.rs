//! One-shot question about a document: `docuchat ask FILE PROMPT`.

use std::path::Path;

use anyhow::{Context, Result, bail};
use console::style;

use docuchat_core::chat::controller::{SendDispatch, SendOutcome};
use docuchat_infra::document::load_document;

use crate::state::AppState;

use super::chat::loop_runner::thinking_spinner;
use super::chat::renderer::ChatRenderer;
use super::credential::prompt_credential;

/// Load `file`, send `prompt`, and print the answer.
///
/// With `json`, prints the conversation as an array of wire-format
/// messages. A failed send still prints the advisory, then exits non-zero.
pub async fn ask(state: &AppState, file: &Path, prompt: &str, json: bool) -> Result<()> {
    let controller = &state.controller;

    if !controller.credentials().is_set() {
        if !json && console::user_attended() {
            let value = prompt_credential().await?;
            controller.set_credential(&value).await;
        } else {
            bail!(
                "no API key: set {} or run `docuchat chat` to enter one",
                state.config.provider.api_key_env
            );
        }
    }

    let payload = load_document(file)
        .await
        .with_context(|| format!("failed to load {}", file.display()))?;
    controller.ingest(payload).await?;

    let spinner = (!json && console::user_attended()).then(thinking_spinner);
    let dispatch = controller.send(prompt).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let outcome = match dispatch {
        SendDispatch::Started(outcome) => outcome,
        SendDispatch::MissingDocument | SendDispatch::Busy => {
            bail!("the session did not accept the prompt")
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&controller.messages())?);
    } else if let Some(message) = controller.last_message() {
        let renderer = ChatRenderer::new(controller.config().ui.html_answers);
        match outcome {
            SendOutcome::Answered => println!("{}", renderer.render_answer(&message.text).trim_end()),
            SendOutcome::Failed(_) => eprintln!("{}", style(&message.text).yellow()),
        }
    }

    if let SendOutcome::Failed(kind) = outcome {
        bail!("request failed ({kind:?})");
    }
    Ok(())
}

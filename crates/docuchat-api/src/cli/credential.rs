//! Credential prompting and feedback shared by the chat and ask commands.

use console::style;
use dialoguer::Password;

use docuchat_core::chat::controller::SessionController;

/// Prompt for the API key with hidden input.
///
/// Runs the blocking terminal prompt off the async runtime. An empty
/// answer is allowed and means "skip".
pub async fn prompt_credential() -> anyhow::Result<String> {
    let value = tokio::task::spawn_blocking(|| {
        Password::new()
            .with_prompt("Gemini API key (leave empty to skip)")
            .allow_empty_password(true)
            .interact()
    })
    .await??;
    Ok(value.trim().to_string())
}

/// Store `value` as the session credential and report what happened.
pub async fn apply_credential(controller: &SessionController, value: &str) {
    controller.set_credential(value).await;

    let credentials = controller.credentials();
    if credentials.meets_min_len(value) {
        println!(
            "  {} API key set ({}) and saved to the session store",
            style("✓").green().bold(),
            credentials.masked()
        );
    } else {
        println!(
            "  {} API key set ({}) but not saved: shorter than {} characters",
            style("!").yellow().bold(),
            credentials.masked(),
            controller.config().credential_min_len
        );
    }
}

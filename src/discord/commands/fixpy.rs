// /fixpy - collect a Python snippet through a modal and reply with the
// model's fix.

use crate::core::codefix::FixOutcome;
use crate::core::text::TextCatalog;
use crate::discord::replies::{reply_ephemeral, split_message, DISCORD_MESSAGE_LIMIT};
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;
use std::sync::atomic::Ordering;
use std::time::Duration;

const MODAL_TIMEOUT: Duration = Duration::from_secs(60 * 10);
const CODE_INPUT_ID: &str = "code";

/// Detect and fix bugs in Python code.
#[poise::command(slash_command)]
pub async fn fixpy(ctx: Context<'_>) -> Result<(), Error> {
    let poise::Context::Application(app_ctx) = ctx else {
        return Ok(());
    };
    let data = ctx.data();

    tracing::info!(
        user = %ctx.author().name,
        user_id = ctx.author().id.get(),
        "User executed 'fixpy' command"
    );

    if !data.codefix.is_available() {
        return reply_ephemeral(ctx, data.texts.get("errors.no_available_model")).await;
    }

    let custom_id = format!("{}-fixpy", ctx.id());
    if let Err(e) = app_ctx
        .interaction
        .create_response(ctx, code_modal(&data.texts, &custom_id))
        .await
    {
        tracing::error!("Error showing fixpy modal: {:?}", e);
        return reply_ephemeral(ctx, data.texts.get("errors.fixpy_modal_execution_error")).await;
    }
    // The modal was the initial response
    app_ctx
        .has_sent_initial_response
        .store(true, Ordering::SeqCst);

    let Some(submission) = serenity::ModalInteractionCollector::new(ctx)
        .author_id(ctx.author().id)
        .custom_ids(vec![custom_id])
        .timeout(MODAL_TIMEOUT)
        .await
    else {
        tracing::debug!(user_id = ctx.author().id.get(), "fixpy modal was not submitted");
        return Ok(());
    };

    handle_submission(ctx, &submission).await;
    Ok(())
}

fn code_modal(texts: &TextCatalog, custom_id: &str) -> serenity::CreateInteractionResponse {
    let input = serenity::CreateInputText::new(
        serenity::InputTextStyle::Paragraph,
        texts.get("fixpy.code_input_label"),
        CODE_INPUT_ID,
    )
    .placeholder(texts.get("fixpy.code_input_placeholder"))
    .required(true);

    serenity::CreateInteractionResponse::Modal(
        serenity::CreateModal::new(custom_id, texts.get("fixpy.modal_title"))
            .components(vec![serenity::CreateActionRow::InputText(input)]),
    )
}

fn submitted_code(data: &serenity::ModalInteractionData) -> Option<String> {
    data.components
        .iter()
        .flat_map(|row| row.components.iter())
        .find_map(|component| match component {
            serenity::ActionRowComponent::InputText(input) if input.custom_id == CODE_INPUT_ID => {
                input.value.clone()
            }
            _ => None,
        })
}

/// Turn a fix outcome into the follow-up messages to send.
fn outcome_messages(outcome: FixOutcome, texts: &TextCatalog, user_id: u64) -> Vec<String> {
    match outcome {
        FixOutcome::Fixed(text) => split_message(&text, DISCORD_MESSAGE_LIMIT),
        other => {
            if let FixOutcome::Failed(detail) = &other {
                tracing::error!(user_id, "Error processing fixpy command request: {}", detail);
            }
            other
                .message_key()
                .map(|key| vec![texts.get(key)])
                .unwrap_or_default()
        }
    }
}

/// Answer a submitted modal. Every path ends in at least one ephemeral
/// follow-up; failures are logged, never shown.
async fn handle_submission(ctx: Context<'_>, submission: &serenity::ModalInteraction) {
    let data = ctx.data();
    let user_id = submission.user.id.get();

    if let Err(e) = submission.defer_ephemeral(ctx).await {
        tracing::error!(user_id, "Failed to defer fixpy submission: {}", e);
        return;
    }

    let code = submitted_code(&submission.data).unwrap_or_default();
    let outcome = data.codefix.fix(&code).await;

    for content in outcome_messages(outcome, &data.texts, user_id) {
        let followup = serenity::CreateInteractionResponseFollowup::new()
            .content(content)
            .ephemeral(true);

        if let Err(e) = submission.create_followup(ctx, followup).await {
            tracing::error!(user_id, "Failed to send fixpy follow-up: {}", e);
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_code_is_relayed_verbatim() {
        let texts = TextCatalog::bundled().unwrap();
        let messages = outcome_messages(
            FixOutcome::Fixed("```python\nprint('hi')\n```".to_string()),
            &texts,
            1,
        );
        assert_eq!(messages, vec!["```python\nprint('hi')\n```"]);
    }

    #[test]
    fn test_long_fix_is_split() {
        let texts = TextCatalog::bundled().unwrap();
        let messages = outcome_messages(FixOutcome::Fixed("x".repeat(4001)), &texts, 1);
        assert_eq!(messages.len(), 3);
    }

    #[test]
    fn test_failure_detail_is_never_shown() {
        let texts = TextCatalog::bundled().unwrap();
        let messages = outcome_messages(
            FixOutcome::Failed("Anthropic API error: 401 - invalid x-api-key".to_string()),
            &texts,
            1,
        );

        assert_eq!(
            messages,
            vec![texts.get("errors.fixpy_command_processing_error")]
        );
        assert!(!messages[0].contains("x-api-key"));
    }

    #[test]
    fn test_empty_and_no_model_use_canned_messages() {
        let texts = TextCatalog::bundled().unwrap();
        assert_eq!(
            outcome_messages(FixOutcome::Empty, &texts, 1),
            vec![texts.get("errors.ai_response_generation_failed")]
        );
        assert_eq!(
            outcome_messages(FixOutcome::NoModel, &texts, 1),
            vec![texts.get("errors.no_available_model")]
        );
    }

    #[test]
    fn test_modal_has_one_required_paragraph_input() {
        let texts = TextCatalog::bundled().unwrap();
        let response = serde_json::to_value(code_modal(&texts, "7-fixpy")).unwrap();

        // Interaction response type 9 is a modal
        assert_eq!(response["type"], 9);
        assert_eq!(response["data"]["custom_id"], "7-fixpy");
        assert_eq!(response["data"]["title"], texts.get("fixpy.modal_title"));

        let input = &response["data"]["components"][0]["components"][0];
        assert_eq!(input["custom_id"], CODE_INPUT_ID);
        assert_eq!(input["style"], 2);
        assert_eq!(input["required"], true);
        assert_eq!(input["placeholder"], texts.get("fixpy.code_input_placeholder"));
    }
}

// Discord commands for access levels: /grant, /check and /revoke.
//
// **Notice the pattern:**
// 1. The guard check runs before any command body
// 2. Extract primitive data from Discord types into a `CommandContext`
// 3. Call the core service or selection workflow
// 4. Answer with exactly one ephemeral message from the text catalog
//
// This layer is THIN - no business logic, just translation.

use crate::core::access::{
    validate_context, Caller, CommandContext, GuardDecision, PendingSelection, SelectionAction,
};
use crate::discord::replies::reply_ephemeral;
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;
use std::time::Duration;

const SELECTION_TIMEOUT: Duration = Duration::from_secs(60 * 2);
const PROCESSING_ERROR_KEY: &str = "errors.access_command_processing_error";

/// Grant an access level to a member.
#[poise::command(slash_command, check = "access_guard")]
pub async fn grant(
    ctx: Context<'_>,
    #[description = "Member to grant an access level to"] user: serenity::User,
) -> Result<(), Error> {
    run_selection(ctx, SelectionAction::Grant, &user).await
}

/// Check which access levels a member holds.
#[poise::command(slash_command, rename = "check", check = "access_guard")]
pub async fn check_access(
    ctx: Context<'_>,
    #[description = "Member to check"] user: serenity::User,
) -> Result<(), Error> {
    let Some((_, target_user_id)) = resolve_target(ctx, &user).await? else {
        return Ok(());
    };

    let texts = &ctx.data().texts;
    let message = match ctx.data().access.check(target_user_id).await {
        Ok(status) => texts.format(status.message_key(), &[("user_id", &target_user_id)]),
        Err(e) => {
            tracing::error!(user_id = target_user_id, "Failed to check access level: {}", e);
            texts.get(PROCESSING_ERROR_KEY)
        }
    };

    reply_ephemeral(ctx, message).await
}

/// Revoke an access level from a member.
#[poise::command(slash_command, check = "access_guard")]
pub async fn revoke(
    ctx: Context<'_>,
    #[description = "Member to revoke an access level from"] user: serenity::User,
) -> Result<(), Error> {
    run_selection(ctx, SelectionAction::Revoke, &user).await
}

/// Command check shared by every access command. Denials are answered here,
/// so the framework only sees `false`.
async fn access_guard(ctx: Context<'_>) -> Result<bool, Error> {
    let data = ctx.data();
    let caller = caller_of(ctx).await;

    match data.guard.evaluate(&caller, &data.access).await {
        Ok(GuardDecision::Allow) => Ok(true),
        Ok(GuardDecision::Deny { message_key }) => {
            tracing::info!(
                user_id = caller.user_id,
                command = %ctx.command().name,
                reason = message_key,
                "Access command denied"
            );
            reply_ephemeral(ctx, data.texts.get(message_key)).await?;
            Ok(false)
        }
        Err(e) => {
            tracing::error!(user_id = caller.user_id, "Authorization check failed: {}", e);
            reply_ephemeral(ctx, data.texts.get(PROCESSING_ERROR_KEY)).await?;
            Ok(false)
        }
    }
}

async fn caller_of(ctx: Context<'_>) -> Caller {
    let user_id = ctx.author().id.get();

    // Interaction members carry their resolved permissions
    let has_admin_permission = ctx
        .author_member()
        .await
        .and_then(|member| member.permissions)
        .map(|permissions| permissions.administrator())
        .unwrap_or(false);

    Caller {
        user_id,
        is_admin: has_admin_permission || ctx.data().admin_user_ids.contains(&user_id),
    }
}

/// Build the command context and validate it. On failure the user has
/// already been told why and `None` is returned.
async fn resolve_target(
    ctx: Context<'_>,
    user: &serenity::User,
) -> Result<Option<(CommandContext, u64)>, Error> {
    let guild_id = ctx.guild_id();
    let target_in_guild = match guild_id {
        Some(guild_id) => guild_id.member(ctx, user.id).await.is_ok(),
        None => false,
    };

    let command_ctx = CommandContext {
        caller: caller_of(ctx).await,
        guild_id: guild_id.map(|id| id.get()),
        target_user_id: user.id.get(),
        target_in_guild,
    };

    match validate_context(&command_ctx) {
        Ok(target_user_id) => Ok(Some((command_ctx, target_user_id))),
        Err(e) => {
            reply_ephemeral(ctx, ctx.data().texts.get(e.message_key())).await?;
            Ok(None)
        }
    }
}

/// Show the access level selector and apply the user's choice.
async fn run_selection(
    ctx: Context<'_>,
    action: SelectionAction,
    user: &serenity::User,
) -> Result<(), Error> {
    let Some((command_ctx, target_user_id)) = resolve_target(ctx, user).await? else {
        return Ok(());
    };

    let data = ctx.data();
    let texts = &data.texts;
    let selection = PendingSelection::present(action, &command_ctx, target_user_id);

    // Unique per invocation so two open selectors never answer each other
    let custom_id = format!("{}-access-{}", ctx.id(), selection.action().as_str());
    let options = selection
        .options()
        .iter()
        .map(|level| serenity::CreateSelectMenuOption::new(level.as_str(), level.as_str()))
        .collect();
    let menu = serenity::CreateSelectMenu::new(
        custom_id.clone(),
        serenity::CreateSelectMenuKind::String { options },
    )
    .placeholder(texts.get("access_control.select_access_level_placeholder"))
    .min_values(1)
    .max_values(1);

    let reply = ctx
        .send(
            poise::CreateReply::default()
                .content(texts.get(action.prompt_key()))
                .components(vec![serenity::CreateActionRow::SelectMenu(menu)])
                .ephemeral(true),
        )
        .await?;

    let Some(mci) = serenity::ComponentInteractionCollector::new(ctx)
        .author_id(ctx.author().id)
        .custom_ids(vec![custom_id])
        .timeout(SELECTION_TIMEOUT)
        .await
    else {
        // Remove the selector after timeout
        let _ = reply
            .edit(ctx, poise::CreateReply::default().components(vec![]))
            .await;
        return Ok(());
    };

    let choice = match &mci.data.kind {
        serenity::ComponentInteractionDataKind::StringSelect { values } => {
            values.first().cloned().unwrap_or_default()
        }
        _ => String::new(),
    };

    let message = match selection.resolve(&choice, &data.access).await {
        Ok(outcome) => texts.format(
            outcome.message_key(),
            &[
                ("access_level", &outcome.level()),
                ("user_id", &outcome.user_id()),
            ],
        ),
        Err(e) => {
            tracing::error!(
                user_id = target_user_id,
                action = action.as_str(),
                choice = %choice,
                "Failed to apply access level selection: {}",
                e
            );
            texts.get(PROCESSING_ERROR_KEY)
        }
    };

    mci.create_response(
        ctx,
        serenity::CreateInteractionResponse::Message(
            serenity::CreateInteractionResponseMessage::new()
                .content(message)
                .ephemeral(true),
        ),
    )
    .await?;

    Ok(())
}

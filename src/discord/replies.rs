// Small helpers for answering interactions.

use crate::discord::{Context, Error};

/// Discord rejects message content longer than this.
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

/// Reply to the invoking user only.
pub async fn reply_ephemeral(ctx: Context<'_>, content: String) -> Result<(), Error> {
    ctx.send(
        poise::CreateReply::default()
            .content(content)
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

/// Split `text` into pieces of at most `limit` characters, keeping order.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    text.chars()
        .collect::<Vec<char>>()
        .chunks(limit.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

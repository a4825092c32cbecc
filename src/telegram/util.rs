use teloxide::{
    Bot,
    payloads::EditMessageReplyMarkupSetters,
    prelude::Requester,
    sugar::bot::BotMessagesExt,
    types::{CallbackQuery, InlineKeyboardButton, InlineKeyboardMarkup, MaybeInaccessibleMessage, Message},
};

use super::render::ControlButton;

pub fn try_get_message_from_query(query: &CallbackQuery) -> Option<&Message> {
    query.message.as_ref().and_then(|msg| match msg {
        MaybeInaccessibleMessage::Inaccessible(_) => None,
        MaybeInaccessibleMessage::Regular(message) => Some(message.as_ref()),
    })
}

pub async fn clear_message_buttons(bot: &Bot, message: &Message) -> Result<(), anyhow::Error> {
    bot.edit_reply_markup(message)
        .reply_markup(InlineKeyboardMarkup::default())
        .await?;

    Ok(())
}

/// Answers the query and strips the buttons from the message it came from.
pub async fn settle_query(bot: &Bot, query: &CallbackQuery) -> Result<(), anyhow::Error> {
    bot.answer_callback_query(query.id.clone()).await?;
    if let Some(message) = try_get_message_from_query(query) {
        clear_message_buttons(bot, message).await?;
    }

    Ok(())
}

pub fn keyboard(rows: Vec<Vec<ControlButton>>) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(rows.into_iter().map(|row| {
        row.into_iter()
            .map(|button| InlineKeyboardButton::callback(button.label, button.data))
            .collect::<Vec<_>>()
    }))
}

use std::sync::Arc;

use teloxide::{dispatching::UpdateHandler, dptree::case, filter_command, prelude::*};

use crate::{
    profiles::Profile,
    scheduling::NotificationPermission,
    tracker::UserProfile,
};

use super::{
    Command, GlobalDialogue, HandlerResult,
    delivery::{ALLOW_NOTIFICATIONS, DENY_NOTIFICATIONS, PermissionPrompts, permission_keyboard},
    render,
    util::settle_query,
};

fn permission_from_callback(data: &str) -> Option<NotificationPermission> {
    match data {
        ALLOW_NOTIFICATIONS => Some(NotificationPermission::Granted),
        DENY_NOTIFICATIONS => Some(NotificationPermission::Denied),
        _ => None,
    }
}

fn permission_from_arg(arg: &str) -> Option<NotificationPermission> {
    match arg.trim().to_lowercase().as_str() {
        "on" | "allow" => Some(NotificationPermission::Granted),
        "off" | "deny" => Some(NotificationPermission::Denied),
        _ => None,
    }
}

async fn show_profile(bot: Bot, msg: Message, profile: Arc<Profile>) -> HandlerResult {
    let text = render::profile(profile.tracker.lock().await.profile());

    bot.send_message(
        msg.chat.id,
        format!("{text}\n\nUpdate it with /setprofile <name> <YYYY-MM-DD> <male|female>."),
    )
    .await?;
    Ok(())
}

async fn set_profile(bot: Bot, msg: Message, arg: String, profile: Arc<Profile>) -> HandlerResult {
    let text = match UserProfile::parse(&arg) {
        Ok(user) => {
            let text = format!("Profile saved.\n\n{}", render::profile(&user));
            profile.tracker.lock().await.save_profile(user).await?;
            text
        }
        Err(error) => error.to_string(),
    };

    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

async fn notifications(
    bot: Bot,
    msg: Message,
    arg: String,
    profile: Arc<Profile>,
) -> HandlerResult {
    let tracker = profile.tracker.lock().await;

    if arg.trim().is_empty() {
        let current = tracker.notification_permission().await;
        let text = render::notification_status(current, profile.scheduler.guarantee());

        let mut request = bot.send_message(msg.chat.id, text);
        if current == NotificationPermission::Default {
            request = request.reply_markup(permission_keyboard());
        }
        request.await?;
        return Ok(());
    }

    let text = match permission_from_arg(&arg) {
        Some(permission) => {
            tracker.set_notification_permission(permission).await?;
            format!("Notifications are now {}.", render::permission(permission))
        }
        None => "Usage: /notifications [on|off]".to_string(),
    };

    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

async fn answer_permission(
    bot: Bot,
    dialogue: GlobalDialogue,
    query: CallbackQuery,
    permission: NotificationPermission,
    profile: Arc<Profile>,
    prompts: Arc<PermissionPrompts>,
) -> HandlerResult {
    settle_query(&bot, &query).await?;

    profile
        .tracker
        .lock()
        .await
        .set_notification_permission(permission)
        .await?;
    let waiting = prompts.resolve(dialogue.chat_id(), permission).await;

    log::info!(
        "Notification permission answered. [chat_id = {}, permission = {permission:?}, prompt_waiting = {waiting}]",
        dialogue.chat_id()
    );

    bot.send_message(
        dialogue.chat_id(),
        format!(
            "Notifications are now {}. Change it any time with /notifications.",
            render::permission(permission)
        ),
    )
    .await?;

    Ok(())
}

pub(super) fn schema() -> UpdateHandler<anyhow::Error> {
    dptree::entry()
        .branch(
            Update::filter_message().branch(
                filter_command::<Command, _>()
                    .branch(case![Command::Profile].endpoint(show_profile))
                    .branch(case![Command::SetProfile(arg)].endpoint(set_profile))
                    .branch(case![Command::Notifications(arg)].endpoint(notifications)),
            ),
        )
        .branch(
            Update::filter_callback_query()
                .filter_map(|query: CallbackQuery| {
                    query.data.as_deref().and_then(permission_from_callback)
                })
                .endpoint(answer_permission),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_buttons_map_to_answers() {
        assert_eq!(
            permission_from_callback(ALLOW_NOTIFICATIONS),
            Some(NotificationPermission::Granted)
        );
        assert_eq!(
            permission_from_callback(DENY_NOTIFICATIONS),
            Some(NotificationPermission::Denied)
        );
        assert_eq!(permission_from_callback("take:0"), None);
    }

    #[test]
    fn command_argument_turns_notifications_on_or_off() {
        assert_eq!(permission_from_arg(" ON "), Some(NotificationPermission::Granted));
        assert_eq!(permission_from_arg("off"), Some(NotificationPermission::Denied));
        assert_eq!(permission_from_arg("maybe"), None);
    }
}

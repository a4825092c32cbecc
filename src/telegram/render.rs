use std::fmt::Write;

use chrono::NaiveDateTime;

use crate::{
    articles::Article,
    calculators::{BmiResult, CalorieResult},
    reminder::{Reminder, SlotStatus},
    scheduling::{DeliveryGuarantee, Notification, NotificationPermission},
    tracker::{EmergencyContact, Favorites, MoodEntry, TakeOutcome, UserProfile, WaterProgress},
};

use super::reminders::ReminderAction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlButton {
    pub label: String,
    pub data: String,
}

fn slot_marker(status: SlotStatus) -> &'static str {
    match status {
        SlotStatus::Completed => "✅",
        SlotStatus::Missed => "❌ missed",
        SlotStatus::Upcoming => "⏳",
    }
}

fn schedule_line(reminder: &Reminder) -> String {
    reminder
        .schedule
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn reminder_list(reminders: &[Reminder], now: NaiveDateTime) -> String {
    if reminders.is_empty() {
        return "No active medicine reminders. Use /addreminder to add one.".to_string();
    }

    let mut text = String::from("💊 Medicine reminders:\n");
    for (i, reminder) in reminders.iter().enumerate() {
        let _ = writeln!(text, "\n{}. {} ({})", i + 1, reminder.name, reminder.dose);
        for (slot, status) in reminder.slot_statuses(now) {
            let _ = writeln!(text, "   {slot} {}", slot_marker(status));
        }
    }
    text.push_str("\nMark a dose with /take N, delete a reminder with /remove N.");
    text
}

/// One row per reminder. The take control is hidden once every slot is done.
pub fn reminder_controls(reminders: &[Reminder], now: NaiveDateTime) -> Vec<Vec<ControlButton>> {
    reminders
        .iter()
        .enumerate()
        .map(|(i, reminder)| {
            let mut row = Vec::new();
            if !reminder.all_taken(now) {
                row.push(ControlButton {
                    label: format!("✔️ {}. {}", i + 1, reminder.name),
                    data: ReminderAction::Take(i).data(),
                });
            }
            row.push(ControlButton {
                label: format!("🗑 {}", i + 1),
                data: ReminderAction::Remove(i).data(),
            });
            row
        })
        .collect()
}

pub fn removal_question(reminder: &Reminder) -> String {
    format!(
        "Remove the reminder for {} ({}) at {}?",
        reminder.name,
        reminder.dose,
        schedule_line(reminder)
    )
}

pub fn take_outcome(outcome: TakeOutcome, reminder: Option<&Reminder>) -> String {
    match (outcome, reminder) {
        (TakeOutcome::Taken(slot), Some(reminder)) => {
            format!("✅ {} ({}) for {slot} marked as taken.", reminder.name, reminder.dose)
        }
        (TakeOutcome::Taken(slot), None) => format!("✅ Dose for {slot} marked as taken."),
        (TakeOutcome::AlreadyComplete, _) => "All doses for today are already taken.".to_string(),
        (TakeOutcome::NoSuchReminder, _) => {
            "No such reminder. Check the numbers with /reminders.".to_string()
        }
    }
}

pub fn notification(notification: &Notification) -> String {
    format!(
        "💊 Time for your medicine!\n{} ({}) scheduled at {}.",
        notification.name, notification.dose, notification.time
    )
}

pub fn notification_denied(notification: &Notification) -> String {
    format!(
        "⏰ {} ({}) was due at {}, but notifications are turned off. Use /notifications on to enable them.",
        notification.name, notification.dose, notification.time
    )
}

pub fn permission(permission: NotificationPermission) -> &'static str {
    match permission {
        NotificationPermission::Default => "not decided yet",
        NotificationPermission::Granted => "on",
        NotificationPermission::Denied => "off",
    }
}

pub fn notification_status(
    current: NotificationPermission,
    guarantee: DeliveryGuarantee,
) -> String {
    format!(
        "Notifications are {}.\n{}",
        permission(current),
        guarantee.describe()
    )
}

fn progress_bar(percent: u32) -> String {
    let filled = (percent / 10) as usize;
    format!("{}{}", "▓".repeat(filled), "░".repeat(10 - filled))
}

pub fn water(progress: &WaterProgress) -> String {
    let mut text = format!(
        "💧 {} / {} ml\n{} {}%",
        progress.consumed_ml,
        progress.target_ml,
        progress_bar(progress.percent),
        progress.percent
    );
    if progress.met {
        text.push_str("\nDaily target reached!");
    }
    text
}

pub fn bmi(result: &BmiResult) -> String {
    format!("BMI: {:.2}\nCategory: {}", result.bmi, result.category.label())
}

pub fn calories(result: &CalorieResult) -> String {
    format!(
        "Estimated daily calorie needs: {} kcal\n(BMR {:.0} kcal, activity {})",
        result.rounded_tdee(),
        result.bmr,
        result.activity
    )
}

pub fn moods(entries: &[MoodEntry]) -> String {
    if entries.is_empty() {
        return "No mood entries yet. Record one with /mood great|good|okay|bad|awful [notes].".to_string();
    }

    entries
        .iter()
        .map(|entry| {
            format!(
                "{} {} {} - {}",
                entry.timestamp.format("%Y-%m-%d %H:%M"),
                entry.mood.emoji(),
                entry.mood,
                entry.notes
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn contacts(contacts: &[EmergencyContact]) -> String {
    if contacts.is_empty() {
        return "No emergency contacts saved. Add one with /addcontact <name> <number>.".to_string();
    }

    contacts
        .iter()
        .enumerate()
        .map(|(i, contact)| format!("{}. {}: {}", i + 1, contact.name, contact.number))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn profile(profile: &UserProfile) -> String {
    let unset = "-";
    format!(
        "Name: {}\nDate of birth: {}\nGender: {}",
        profile.name.as_deref().unwrap_or(unset),
        profile
            .dob
            .map(|dob| dob.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| unset.to_string()),
        profile
            .gender
            .map(|gender| gender.to_string())
            .unwrap_or_else(|| unset.to_string()),
    )
}

pub fn article_list(articles: &[&Article], favorites: &Favorites) -> String {
    if articles.is_empty() {
        return "No articles found.".to_string();
    }

    articles
        .iter()
        .map(|article| {
            let star = if favorites.contains(article.id) { " ⭐" } else { "" };
            format!(
                "{}. {} [{}]{star}\nRead: /article {}",
                article.id, article.title, article.category, article.id
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn article(article: &Article, is_favorite: bool) -> String {
    let favorite = if is_favorite {
        format!("⭐ In your favourites. Remove with /favorite {}", article.id)
    } else {
        format!("Add to favourites with /favorite {}", article.id)
    };
    format!("{}\n\n{}\n\n{favorite}", article.title, article.content)
}

pub fn home(
    profile: &UserProfile,
    reminders: &[Reminder],
    water_progress: &WaterProgress,
    tip: &str,
) -> String {
    let greeting = match profile.name.as_deref() {
        Some(name) => format!("Hello, {name}!"),
        None => "Hello!".to_string(),
    };

    let mut text = format!("{greeting}\n\n");
    if reminders.is_empty() {
        text.push_str("No active reminders yet. Add one with /addreminder.\n");
    } else {
        text.push_str("Active reminders:\n");
        for reminder in reminders {
            let _ = writeln!(
                text,
                "• {}, {}, at {}",
                reminder.name,
                reminder.dose,
                schedule_line(reminder)
            );
        }
    }

    let _ = write!(text, "\n{}\n\n💡 {tip}", water(water_progress));
    text
}

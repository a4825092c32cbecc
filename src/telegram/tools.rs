use std::sync::Arc;

use teloxide::{dispatching::UpdateHandler, dptree::case, filter_command, prelude::*};

use crate::{
    calculators::{
        ActivityLevel, BmiResult, CalculatorError, CalorieResult, Gender, calculate_bmi,
        estimate_calories,
    },
    profiles::{Profile, Profiles},
    tracker::{EmergencyContact, MoodEntry, WaterTarget, parse_amount, parse_position},
};

use super::{Command, HandlerResult, render};

const BMI_USAGE: &str = "Usage: /bmi <height cm> <weight kg>, e.g. /bmi 170 65";
const CALORIES_USAGE: &str = "Usage: /calories <age> <male|female> <height cm> <weight kg> <sedentary|light|moderate|active|very-active>, e.g. /calories 30 female 160 55 light";

fn parse_measure(raw: &str) -> Option<f64> {
    raw.replace(',', ".").parse().ok()
}

fn bmi_from_args(args: &str) -> Result<BmiResult, CalculatorError> {
    let words = args.split_whitespace().collect::<Vec<_>>();
    let [height, weight] = words.as_slice() else {
        return Err(CalculatorError::InvalidBodyMeasurements);
    };

    match (parse_measure(height), parse_measure(weight)) {
        (Some(height_cm), Some(weight_kg)) => calculate_bmi(height_cm, weight_kg),
        _ => Err(CalculatorError::InvalidBodyMeasurements),
    }
}

fn calories_from_args(args: &str) -> Result<CalorieResult, CalculatorError> {
    let words = args.split_whitespace().collect::<Vec<_>>();
    let [age, gender, height, weight, activity] = words.as_slice() else {
        return Err(CalculatorError::InvalidCalorieInput);
    };

    let gender: Gender = gender.parse()?;
    let activity: ActivityLevel = activity.parse()?;
    match (age.parse::<u32>(), parse_measure(height), parse_measure(weight)) {
        (Ok(age), Some(height_cm), Some(weight_kg)) => {
            estimate_calories(age, gender, height_cm, weight_kg, activity)
        }
        _ => Err(CalculatorError::InvalidCalorieInput),
    }
}

async fn water(
    bot: Bot,
    msg: Message,
    arg: String,
    profiles: Arc<Profiles>,
    profile: Arc<Profile>,
) -> HandlerResult {
    let text = match parse_amount(&arg) {
        Ok(amount_ml) => {
            let progress = profile
                .tracker
                .lock()
                .await
                .add_water(amount_ml, profiles.now())
                .await?;
            format!("Added {amount_ml} ml.\n{}", render::water(&progress))
        }
        Err(error) => error.to_string(),
    };

    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

async fn water_target(
    bot: Bot,
    msg: Message,
    arg: String,
    profiles: Arc<Profiles>,
    profile: Arc<Profile>,
) -> HandlerResult {
    let text = match WaterTarget::parse(&arg) {
        Ok(target) => {
            let mut tracker = profile.tracker.lock().await;
            tracker.set_water_target(target).await?;
            format!(
                "Daily water target set to {} ml.\n{}",
                target.ml(),
                render::water(&tracker.water_progress(profiles.now()))
            )
        }
        Err(error) => error.to_string(),
    };

    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

async fn bmi(bot: Bot, msg: Message, arg: String, profile: Arc<Profile>) -> HandlerResult {
    let mut tracker = profile.tracker.lock().await;

    let text = if arg.trim().is_empty() {
        match tracker.last_bmi() {
            Some(last) => format!("Your last result:\n{}\n\n{BMI_USAGE}", render::bmi(last)),
            None => BMI_USAGE.to_string(),
        }
    } else {
        match bmi_from_args(&arg) {
            Ok(result) => {
                let text = render::bmi(&result);
                tracker.save_bmi(result).await?;
                text
            }
            Err(error) => format!("{error}\n{BMI_USAGE}"),
        }
    };

    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

async fn calories(bot: Bot, msg: Message, arg: String, profile: Arc<Profile>) -> HandlerResult {
    let mut tracker = profile.tracker.lock().await;

    let text = if arg.trim().is_empty() {
        match tracker.last_calories() {
            Some(last) => format!(
                "Your last result:\n{}\n\n{CALORIES_USAGE}",
                render::calories(last)
            ),
            None => CALORIES_USAGE.to_string(),
        }
    } else {
        match calories_from_args(&arg) {
            Ok(result) => {
                let text = render::calories(&result);
                tracker.save_calories(result).await?;
                text
            }
            Err(error) => format!("{error}\n{CALORIES_USAGE}"),
        }
    };

    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

async fn mood(
    bot: Bot,
    msg: Message,
    arg: String,
    profiles: Arc<Profiles>,
    profile: Arc<Profile>,
) -> HandlerResult {
    let text = match MoodEntry::parse(&arg, profiles.now()) {
        Ok(entry) => {
            let text = format!("Mood saved: {} {}", entry.mood.emoji(), entry.mood);
            profile.tracker.lock().await.record_mood(entry).await?;
            text
        }
        Err(error) => error.to_string(),
    };

    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

async fn moods(bot: Bot, msg: Message, profile: Arc<Profile>) -> HandlerResult {
    let text = render::moods(profile.tracker.lock().await.moods());

    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

async fn contacts(bot: Bot, msg: Message, profile: Arc<Profile>) -> HandlerResult {
    let text = render::contacts(profile.tracker.lock().await.contacts());

    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

async fn add_contact(bot: Bot, msg: Message, arg: String, profile: Arc<Profile>) -> HandlerResult {
    let text = match EmergencyContact::parse(&arg) {
        Ok(contact) => {
            let mut tracker = profile.tracker.lock().await;
            tracker.add_contact(contact).await?;
            format!("Contact saved.\n\n{}", render::contacts(tracker.contacts()))
        }
        Err(error) => error.to_string(),
    };

    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

async fn remove_contact(
    bot: Bot,
    msg: Message,
    arg: String,
    profile: Arc<Profile>,
) -> HandlerResult {
    let text = match parse_position(&arg) {
        Ok(index) => {
            let mut tracker = profile.tracker.lock().await;
            match tracker.remove_contact(index).await? {
                Some(removed) => format!("Removed {} from your contacts.", removed.name),
                None => "No such contact. Check the numbers with /contacts.".to_string(),
            }
        }
        Err(error) => error.to_string(),
    };

    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

pub(super) fn schema() -> UpdateHandler<anyhow::Error> {
    Update::filter_message().branch(
        filter_command::<Command, _>()
            .branch(case![Command::Water(arg)].endpoint(water))
            .branch(case![Command::WaterTarget(arg)].endpoint(water_target))
            .branch(case![Command::Bmi(arg)].endpoint(bmi))
            .branch(case![Command::Calories(arg)].endpoint(calories))
            .branch(case![Command::Mood(arg)].endpoint(mood))
            .branch(case![Command::Moods].endpoint(moods))
            .branch(case![Command::Contacts].endpoint(contacts))
            .branch(case![Command::AddContact(arg)].endpoint(add_contact))
            .branch(case![Command::RemoveContact(arg)].endpoint(remove_contact)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::BmiCategory;

    #[test]
    fn bmi_args_accept_decimal_commas() {
        let result = bmi_from_args("170,5 65").unwrap();

        assert_eq!(result.height_cm, 170.5);
        assert_eq!(result.category, BmiCategory::Normal);
    }

    #[test]
    fn bmi_args_need_two_numbers() {
        for args in ["170", "170 65 1", "tall 65", "0 65"] {
            assert_eq!(
                bmi_from_args(args),
                Err(CalculatorError::InvalidBodyMeasurements),
                "{args}"
            );
        }
    }

    #[test]
    fn calorie_args_in_order() {
        let result = calories_from_args("25 male 175 70 moderate").unwrap();

        assert_eq!(result.gender, Gender::Male);
        assert_eq!(result.activity, ActivityLevel::Moderate);
        assert_eq!(result.bmr, 1673.75);
    }

    #[test]
    fn calorie_args_report_the_bad_field() {
        assert_eq!(
            calories_from_args("25 robot 175 70 moderate"),
            Err(CalculatorError::UnknownGender("robot".to_string()))
        );
        assert_eq!(
            calories_from_args("25 male 175 70 lazy"),
            Err(CalculatorError::UnknownActivity("lazy".to_string()))
        );
        assert_eq!(
            calories_from_args("-3 male 175 70 light"),
            Err(CalculatorError::InvalidCalorieInput)
        );
        assert_eq!(
            calories_from_args("25 male 175"),
            Err(CalculatorError::InvalidCalorieInput)
        );
    }
}

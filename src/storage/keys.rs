pub const MEDICINE_REMINDERS: &str = "medicineReminders";
pub const LAST_TAKEN_RESET: &str = "lastTakenReset";
pub const WATER_INTAKE: &str = "waterIntake";
pub const WATER_TARGET: &str = "waterTarget";
pub const MOOD_HISTORY: &str = "moodHistory";
pub const EMERGENCY_CONTACTS: &str = "emergencyContacts";
pub const FAVORITE_ARTICLES: &str = "favoriteArticles";
pub const USER_INFO: &str = "userInfo";
pub const LAST_BMI_RESULT: &str = "lastBmiResult";
pub const LAST_CALORIE_RESULT: &str = "lastCalorieResult";
pub const NOTIFICATION_PERMISSION: &str = "notificationPermission";

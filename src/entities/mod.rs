pub mod breeding_record;
pub mod eating_log;
pub mod feeding_activity;
pub mod feeding_schedule;
pub mod health_record;
pub mod kandang;
pub mod livestock;
pub mod notification;
pub mod notification_setting;
pub mod rfid_log;
pub mod sale;
pub mod user;

pub use breeding_record::Entity as BreedingRecord;
pub use eating_log::Entity as EatingLog;
pub use feeding_activity::Entity as FeedingActivity;
pub use feeding_schedule::Entity as FeedingSchedule;
pub use health_record::Entity as HealthRecord;
pub use kandang::Entity as Kandang;
pub use livestock::Entity as Livestock;
pub use notification::Entity as Notification;
pub use notification_setting::Entity as NotificationSetting;
pub use rfid_log::Entity as RfidLog;
pub use sale::Entity as Sale;
pub use user::Entity as User;

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tokio::sync::{Mutex, RwLock};

use crate::{
    clock::Clock,
    scheduling::{NotificationChannel, NotificationScheduler},
    storage::KeyValueStore,
    tracker::Tracker,
};

pub type ProfileId = i64;

/// Builds the collaborators of a profile.
#[async_trait]
pub trait ProfileFactory: Send + Sync + 'static {
    async fn open_store(&self, id: ProfileId) -> anyhow::Result<Arc<dyn KeyValueStore>>;

    fn channel(&self, id: ProfileId, store: Arc<dyn KeyValueStore>) -> Arc<dyn NotificationChannel>;

    /// Profiles with persisted state from earlier runs.
    async fn known_profiles(&self) -> anyhow::Result<Vec<ProfileId>>;
}

pub struct Profile {
    pub tracker: Mutex<Tracker>,
    pub scheduler: NotificationScheduler,
}

impl Profile {
    async fn start(
        store: Arc<dyn KeyValueStore>,
        channel: Arc<dyn NotificationChannel>,
        now: NaiveDateTime,
    ) -> anyhow::Result<Self> {
        let mut tracker = Tracker::load(store).await;
        tracker.reset_taken_if_new_day(now).await?;

        let profile = Self {
            tracker: Mutex::new(tracker),
            scheduler: NotificationScheduler::new(channel),
        };
        {
            let tracker = profile.tracker.lock().await;
            profile.reschedule(&tracker, now).await;
        }

        Ok(profile)
    }

    /// Arms timers for pending slots of the current reminder list that are not armed yet.
    pub async fn reschedule(&self, tracker: &Tracker, now: NaiveDateTime) -> usize {
        self.scheduler
            .schedule_notifications(tracker.reminders(), now)
            .await
    }
}

pub struct Profiles {
    factory: Arc<dyn ProfileFactory>,
    clock: Arc<dyn Clock>,
    profiles: RwLock<HashMap<ProfileId, Arc<Profile>>>,
}

impl Profiles {
    pub fn new(factory: Arc<dyn ProfileFactory>, clock: Arc<dyn Clock>) -> Self {
        Self {
            factory,
            clock,
            profiles: RwLock::new(HashMap::new()),
        }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Starts every profile found in storage. Profiles that fail to start are
    /// logged and skipped. Returns the number started.
    pub async fn restore_all(&self) -> anyhow::Result<usize> {
        let ids = self.factory.known_profiles().await?;

        let mut started = 0;
        for id in ids {
            match self.get_or_start(id).await {
                Ok(_) => started += 1,
                Err(error) => {
                    log::error!("Failed to restore profile. [profile_id = {id}, error = {error}]")
                }
            }
        }

        Ok(started)
    }

    pub async fn get_or_start(&self, id: ProfileId) -> anyhow::Result<Arc<Profile>> {
        if let Some(profile) = self.profiles.read().await.get(&id) {
            return Ok(Arc::clone(profile));
        }

        let mut profiles = self.profiles.write().await;
        if let Some(profile) = profiles.get(&id) {
            return Ok(Arc::clone(profile));
        }

        let store = self.factory.open_store(id).await?;
        let channel = self.factory.channel(id, Arc::clone(&store));
        let profile = Arc::new(Profile::start(store, channel, self.now()).await?);
        profiles.insert(id, Arc::clone(&profile));

        log::info!("Started profile. [profile_id = {id}]");
        Ok(profile)
    }
}

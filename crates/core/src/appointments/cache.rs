use super::{is_still_current, select_next, Appointment, AppointmentData};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Load lifecycle and cached data for upcoming appointments.
///
/// `loading` and `loaded` are independent: a refresh may be in flight while earlier data is still
/// shown. `attempted` separates a cache that never started a load from one whose loads have all
/// failed; both have `loading` and `loaded` false.
///
/// There is no de-duplication of overlapping loads. Whichever [`AppointmentCache::complete_load`]
/// runs last wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppointmentCache {
    data: AppointmentData,
    loading: bool,
    loaded: bool,
    attempted: bool,
    next: Option<Appointment>,
}

/// A rendering copy of the cache, with `next` evaluated at a given instant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AppointmentCacheState {
    pub data: AppointmentData,
    pub loading: bool,
    pub loaded: bool,
    pub attempted: bool,
    pub next: Option<Appointment>,
}

impl AppointmentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a load as in flight. Allowed in any state, including while already loading.
    pub fn begin_load(&mut self) {
        self.loading = true;
        self.attempted = true;
    }

    /// Finish a load, replacing `data` and `next` together.
    pub fn complete_load(&mut self, data: AppointmentData, next: Option<Appointment>) {
        self.data = data;
        self.next = next;
        self.loading = false;
        self.loaded = true;
        tracing::info!(
            "appointments loaded: {} role(s), next={}",
            self.data.len(),
            self.next
                .as_ref()
                .map(|n| format!("{}@{}", n.role, n.time.to_rfc3339()))
                .unwrap_or_else(|| "none".into())
        );
    }

    /// Abandon a load. Previously loaded data stays visible.
    pub fn fail_load(&mut self) {
        self.loading = false;
    }

    pub fn data(&self) -> &AppointmentData {
        &self.data
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Whether any load has been started, successful or not.
    pub fn was_attempted(&self) -> bool {
        self.attempted
    }

    /// The stored next appointment, regardless of whether it has since passed.
    pub fn next_raw(&self) -> Option<&Appointment> {
        self.next.as_ref()
    }

    /// The next appointment as seen at `now`.
    ///
    /// The stored next is returned while it is still current. Once its grace window has elapsed
    /// the soonest current appointment is re-derived from the loaded data.
    pub fn next_at(&self, now: DateTime<Utc>) -> Option<Appointment> {
        match &self.next {
            Some(appt) if is_still_current(appt.time, now) => Some(appt.clone()),
            _ => select_next(&self.data, now),
        }
    }

    pub fn state_at(&self, now: DateTime<Utc>) -> AppointmentCacheState {
        AppointmentCacheState {
            data: self.data.clone(),
            loading: self.loading,
            loaded: self.loaded,
            attempted: self.attempted,
            next: self.next_at(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 2, 14, 30, 0)
            .single()
            .expect("valid time")
    }

    fn nephro_data() -> AppointmentData {
        AppointmentData::from([("nephro".to_string(), vec![Appointment::new("nephro", t())])])
    }

    #[test]
    fn new_cache_was_never_attempted() {
        let cache = AppointmentCache::new();
        assert!(cache.data().is_empty());
        assert!(!cache.is_loading());
        assert!(!cache.is_loaded());
        assert!(cache.next_raw().is_none());
        assert!(!cache.was_attempted());
    }

    #[test]
    fn failed_first_load_is_distinguishable_from_never_attempted() {
        let mut cache = AppointmentCache::new();
        cache.begin_load();
        cache.fail_load();

        assert!(!cache.is_loading());
        assert!(!cache.is_loaded());
        assert!(cache.was_attempted());
        assert!(cache.state_at(t()).attempted);
    }

    #[test]
    fn load_cycle_moves_through_expected_states() {
        let mut cache = AppointmentCache::new();

        cache.begin_load();
        assert!(cache.is_loading());
        assert!(!cache.is_loaded());
        assert!(cache.data().is_empty());
        assert!(cache.next_raw().is_none());

        let next = Appointment::new("nephro", t());
        cache.complete_load(nephro_data(), Some(next.clone()));
        assert!(!cache.is_loading());
        assert!(cache.is_loaded());
        assert_eq!(cache.data(), &nephro_data());
        assert_eq!(cache.next_raw(), Some(&next));
    }

    #[test]
    fn complete_load_replaces_data_and_next_together() {
        let mut cache = AppointmentCache::new();
        cache.complete_load(nephro_data(), Some(Appointment::new("nephro", t())));

        let later = t() + Duration::days(7);
        let cardio = AppointmentData::from([(
            "cardio".to_string(),
            vec![Appointment::new("cardio", later)],
        )]);
        cache.begin_load();
        cache.complete_load(cardio.clone(), Some(Appointment::new("cardio", later)));

        assert_eq!(cache.data(), &cardio);
        assert_eq!(cache.next_raw().map(|n| n.role.as_str()), Some("cardio"));
    }

    #[test]
    fn reentrant_begin_load_is_last_write_wins() {
        let mut cache = AppointmentCache::new();
        cache.begin_load();
        cache.begin_load();
        cache.complete_load(nephro_data(), None);
        cache.complete_load(AppointmentData::new(), None);

        assert!(!cache.is_loading());
        assert!(cache.data().is_empty());
    }

    #[test]
    fn fail_load_keeps_previous_data() {
        let mut cache = AppointmentCache::new();
        cache.complete_load(nephro_data(), Some(Appointment::new("nephro", t())));
        cache.begin_load();
        cache.fail_load();

        assert!(!cache.is_loading());
        assert!(cache.is_loaded());
        assert_eq!(cache.data(), &nephro_data());
    }

    #[test]
    fn next_is_hidden_once_grace_window_elapses() {
        let mut cache = AppointmentCache::new();
        cache.complete_load(nephro_data(), Some(Appointment::new("nephro", t())));

        assert!(cache
            .next_at(t() + Duration::minutes(4) + Duration::seconds(59))
            .is_some());
        assert!(cache
            .next_at(t() + Duration::minutes(5) + Duration::seconds(1))
            .is_none());
        assert!(cache.next_raw().is_some());

        let state = cache.state_at(t() + Duration::hours(1));
        assert!(state.next.is_none());
        assert!(state.loaded);
    }

    #[test]
    fn next_moves_on_to_later_appointment_after_grace_window() {
        let tomorrow = t() + Duration::days(1);
        let mut data = nephro_data();
        data.insert(
            "cardio".to_string(),
            vec![Appointment::new("cardio", tomorrow)],
        );
        let mut cache = AppointmentCache::new();
        cache.complete_load(data, Some(Appointment::new("nephro", t())));

        assert_eq!(
            cache.next_at(t()).map(|n| n.role),
            Some("nephro".to_string())
        );

        let next = cache
            .next_at(t() + Duration::hours(1))
            .expect("cardio is still upcoming");
        assert_eq!(next.role, "cardio");
        assert_eq!(next.time, tomorrow);
        assert_eq!(cache.next_raw().map(|n| n.role.as_str()), Some("nephro"));

        let state = cache.state_at(t() + Duration::hours(1));
        assert_eq!(state.next.map(|n| n.role), Some("cardio".to_string()));
    }
}

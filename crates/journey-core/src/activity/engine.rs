//! Activity engine.
//!
//! Orchestrates goal, progress, period and quota state behind the
//! mutation and query API used by the presentation layer. All calls are
//! synchronous and expect a single caller; the persisted progress map is
//! rewritten whole on every mutation.
//!
//! ## Goal revisions
//!
//! ```text
//! create/edit/restart -> periodStart = today -> revision += 1
//!                     -> focus = first unlogged day of the new period
//!                     -> awaiting_first_log = true
//! ```
//!
//! While `awaiting_first_log` holds, the live period is never reported as
//! complete, even when it has numerically elapsed.

use chrono::Utc;

use super::clock::Clock;
use super::view::{ActivitySnapshot, EngineSettings, ViewState, WeekDay};
use crate::calendar::DateKey;
use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::freeze::{self, FreezeQuota, WeekCounts, MAX_FREEZES_PER_WEEK};
use crate::goal::{normalize_topic, Goal, GoalRevision, GoalStore, Timeframe};
use crate::history::{self, MonthSection};
use crate::period::{self, Period};
use crate::progress::{DayStatus, ProgressMap, ProgressStore};
use crate::storage::KeyValueStore;
use crate::transition;

pub struct ActivityEngine<S, C> {
    store: S,
    clock: C,
    settings: EngineSettings,
    goal: Goal,
    revision: GoalRevision,
    view: ViewState,
}

impl<S: KeyValueStore, C: Clock> ActivityEngine<S, C> {
    /// Open a fresh session anchored on today.
    pub fn open(store: S, clock: C, settings: EngineSettings) -> Self {
        Self::open_with_view(store, clock, settings, None)
    }

    /// Open a session, restoring a previously saved view.
    ///
    /// If the goal was revised since `saved` last resolved its focus, the
    /// revision is handled now, exactly once.
    pub fn open_with_view(
        store: S,
        clock: C,
        settings: EngineSettings,
        saved: Option<ViewState>,
    ) -> Self {
        let today = clock.today();
        let goals = GoalStore::new(&store);
        let goal = goals.load(today);
        let revision = goals.revision();

        let view = match saved {
            Some(view) => view.normalized(settings.week_start),
            None => ViewState::anchored(today, settings.week_start, revision),
        };

        let mut engine = Self {
            store,
            clock,
            settings,
            goal,
            revision,
            view,
        };
        if engine.view.seen_revision != engine.revision {
            engine.on_goal_revised();
        }
        engine
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn today(&self) -> DateKey {
        self.clock.today()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> EngineSettings {
        self.settings
    }

    pub fn goal(&self) -> &Goal {
        &self.goal
    }

    pub fn revision(&self) -> GoalRevision {
        self.revision
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn awaiting_first_log(&self) -> bool {
        self.view.awaiting_first_log
    }

    pub fn progress(&self) -> ProgressMap {
        ProgressStore::new(&self.store).load()
    }

    pub fn status_for(&self, date: DateKey) -> DayStatus {
        self.progress().status(date)
    }

    pub fn live_period(&self) -> Period {
        Period::new(self.goal.period_start, self.goal.timeframe)
    }

    pub fn displayed_period(&self) -> Period {
        let start = period::displayed_period_start(
            self.goal.timeframe,
            self.view.week_start,
            self.view.picked_year,
            self.view.picked_month,
        );
        Period::new(start, self.goal.timeframe)
    }

    pub fn is_showing_live_period(&self) -> bool {
        period::is_live_period(self.displayed_period().start, self.goal.period_start)
    }

    /// Whether the period opening on `displayed_start` has fully elapsed.
    ///
    /// Always false for the live period while awaiting the first log after
    /// a goal revision.
    pub fn is_period_complete(&self, displayed_start: DateKey) -> bool {
        if self.view.awaiting_first_log
            && period::is_live_period(displayed_start, self.goal.period_start)
        {
            return false;
        }
        period::is_complete(displayed_start, self.goal.timeframe, self.today())
    }

    pub fn is_displayed_period_complete(&self) -> bool {
        self.is_period_complete(self.displayed_period().start)
    }

    pub fn week_days(&self) -> [DateKey; 7] {
        freeze::week_days(self.view.week_start)
    }

    pub fn week_counts(&self) -> WeekCounts {
        freeze::week_counts(&self.progress(), &self.week_days())
    }

    /// Freeze usage for the browsed week.
    pub fn freeze_quota(&self) -> FreezeQuota {
        FreezeQuota::from_count(freeze::weekly_freeze_count(
            &self.progress(),
            &self.week_days(),
        ))
    }

    pub fn is_freeze_available(&self) -> bool {
        self.freeze_quota().available
    }

    /// Status for the primary log control on the selected day.
    pub fn focus_status(&self) -> DayStatus {
        freeze::effective_focus_status(
            self.status_for(self.view.selected),
            self.is_freeze_available(),
        )
    }

    pub fn goal_has_changes(&self, topic: &str, timeframe: Timeframe) -> bool {
        self.goal.differs_from(topic, timeframe)
    }

    pub fn history(&self) -> Vec<MonthSection> {
        history::build_history(&self.progress(), self.today(), self.settings.week_start)
    }

    pub fn snapshot(&self) -> ActivitySnapshot {
        let today = self.today();
        let progress = self.progress();
        let days = self.week_days();
        let quota = FreezeQuota::from_count(freeze::weekly_freeze_count(&progress, &days));

        let week = days
            .iter()
            .map(|&date| WeekDay {
                date,
                weekday: date.weekday().to_string().to_uppercase(),
                status: progress.status(date),
                is_today: date == today,
                is_past: date < today,
                is_future: date > today,
                is_selected: date == self.view.selected,
            })
            .collect();

        ActivitySnapshot {
            today,
            goal: self.goal.clone(),
            revision: self.revision,
            live_period: self.live_period(),
            displayed_period: self.displayed_period(),
            month_label: self.view.week_start.month_year_label(),
            selected: self.view.selected,
            focus_status: freeze::effective_focus_status(
                progress.status(self.view.selected),
                quota.available,
            ),
            week,
            counts: freeze::week_counts(&progress, &days),
            freeze: quota,
            freeze_label: quota.label(),
            period_complete: self.is_displayed_period_complete(),
            awaiting_first_log: self.view.awaiting_first_log,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Write `status` for `date`, overwriting any prior value.
    ///
    /// Clears `awaiting_first_log` when the live period is displayed. The
    /// weekly freeze cap is only checked here when enforcement is enabled
    /// in the settings; otherwise callers check [`Self::is_freeze_available`].
    pub fn set_status(&mut self, date: DateKey, status: DayStatus) -> Result<Event> {
        let progress = ProgressStore::new(&self.store);
        let mut map = progress.load_for_update()?;

        if self.settings.enforce_freeze_quota
            && status == DayStatus::Frozen
            && map.status(date) != DayStatus::Frozen
        {
            let week_start = date.start_of_week(self.settings.week_start);
            let used = freeze::weekly_freeze_count(&map, &freeze::week_days(week_start));
            if !freeze::is_freeze_available(used) {
                return Err(ValidationError::FreezeQuotaExhausted {
                    week_start,
                    used,
                    max: MAX_FREEZES_PER_WEEK,
                }
                .into());
            }
        }

        let previous = map.set(date, status);
        progress.save(&map)?;
        tracing::debug!(%date, status = status.as_str(), previous = previous.as_str(), "status written");

        if self.is_showing_live_period() {
            self.view.awaiting_first_log = false;
        }

        Ok(Event::DayLogged {
            date,
            status,
            previous,
            at: Utc::now(),
        })
    }

    /// [`Self::set_status`] for the selected day.
    pub fn log_selected(&mut self, status: DayStatus) -> Result<Event> {
        self.set_status(self.view.selected, status)
    }

    /// Replace topic and timeframe and start a new period today.
    ///
    /// Progress is kept. The topic is trimmed; a blank topic becomes the
    /// default one.
    pub fn create_or_edit_goal(&mut self, topic: &str, timeframe: Timeframe) -> Result<Event> {
        let goal = Goal {
            topic: normalize_topic(topic),
            timeframe,
            period_start: self.today(),
        };
        self.revise(goal)
    }

    /// Same topic and timeframe, new period from today.
    pub fn restart_same_goal(&mut self) -> Result<Event> {
        let goal = Goal {
            period_start: self.today(),
            ..self.goal.clone()
        };
        self.revise(goal)
    }

    /// Pick up goal changes written to the store by someone else.
    ///
    /// Returns the revision event if the stored revision moved.
    pub fn refresh(&mut self) -> Option<Event> {
        let goals = GoalStore::new(&self.store);
        self.goal = goals.load(self.today());
        self.revision = goals.revision();
        if self.view.seen_revision == self.revision {
            return None;
        }
        let focus = self.on_goal_revised();
        Some(self.revised_event(focus))
    }

    pub fn previous_week(&mut self) -> Event {
        self.view.show_week(self.view.week_start.add_days(-7));
        self.view_changed()
    }

    pub fn next_week(&mut self) -> Event {
        self.view.show_week(self.view.week_start.add_days(7));
        self.view_changed()
    }

    /// Jump to the week containing the 1st of `year`-`month`, selecting the 1st.
    pub fn show_month(&mut self, year: i32, month: u32) -> Result<Event> {
        let first = DateKey::from_ymd(year, month, 1).ok_or_else(|| {
            ValidationError::InvalidValue {
                field: "month".into(),
                message: format!("{year}-{month} is not a calendar month"),
            }
        })?;
        self.view.week_start = first.start_of_week(self.settings.week_start);
        self.view.selected = first;
        self.view.picked_year = year;
        self.view.picked_month = month;
        Ok(self.view_changed())
    }

    /// Select `date`, browsing to the week that contains it.
    pub fn select(&mut self, date: DateKey) -> Event {
        let week_start = date.start_of_week(self.settings.week_start);
        if week_start != self.view.week_start {
            self.view.show_week(week_start);
        }
        self.view.selected = date;
        self.view_changed()
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// The revision is bumped before the goal slots are written, so a
    /// failed write still tells every session to re-read the goal.
    fn revise(&mut self, goal: Goal) -> Result<Event> {
        let goals = GoalStore::new(&self.store);
        self.revision = goals.bump_revision()?;
        goals.save(&goal)?;
        self.goal = goal;
        tracing::info!(
            revision = %self.revision,
            topic = %self.goal.topic,
            timeframe = %self.goal.timeframe,
            period_start = %self.goal.period_start,
            "goal revised"
        );
        let focus = self.on_goal_revised();
        Ok(self.revised_event(focus))
    }

    /// The single reaction to a revision change.
    fn on_goal_revised(&mut self) -> DateKey {
        let target = transition::resolve(&self.progress(), &self.goal, self.settings.week_start);
        self.view.focus(target);
        self.view.awaiting_first_log = true;
        self.view.seen_revision = self.revision;
        target.date
    }

    fn revised_event(&self, focus: DateKey) -> Event {
        Event::GoalRevised {
            revision: self.revision,
            goal: self.goal.clone(),
            focus,
            at: Utc::now(),
        }
    }

    fn view_changed(&self) -> Event {
        Event::ViewChanged {
            selected: self.view.selected,
            week_start: self.view.week_start,
            at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::FixedClock;
    use crate::calendar::WeekStart;
    use crate::storage::{keys, MemoryStore};
    use crate::{CoreError, DatabaseError};

    /// Rejects writes to one slot.
    struct FailingStore<'a> {
        inner: &'a MemoryStore,
        fail_key: &'static str,
    }

    impl KeyValueStore for FailingStore<'_> {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            if key == self.fail_key {
                return Err(DatabaseError::Locked.into());
            }
            self.inner.set(key, value)
        }
    }

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    fn engine_on(today: &str) -> ActivityEngine<MemoryStore, FixedClock> {
        ActivityEngine::open(
            MemoryStore::new(),
            FixedClock::new(key(today)),
            EngineSettings::default(),
        )
    }

    #[test]
    fn first_open_uses_defaults() {
        // 2025-01-06 is a Monday.
        let engine = engine_on("2025-01-06");
        assert_eq!(engine.goal(), &Goal::initial(key("2025-01-06")));
        assert_eq!(engine.revision(), GoalRevision(0));
        assert_eq!(engine.view().selected, key("2025-01-06"));
        assert!(!engine.awaiting_first_log());
        assert_eq!(engine.status_for(key("2025-01-06")), DayStatus::None);
    }

    #[test]
    fn set_status_is_idempotent_and_overwrites() {
        let mut engine = engine_on("2025-01-06");
        let day = key("2025-01-07");
        engine.set_status(day, DayStatus::Learned).unwrap();
        engine.set_status(day, DayStatus::Learned).unwrap();
        assert_eq!(engine.status_for(day), DayStatus::Learned);
        assert_eq!(engine.progress().len(), 1);

        let event = engine.set_status(day, DayStatus::Frozen).unwrap();
        assert!(matches!(
            event,
            Event::DayLogged {
                previous: DayStatus::Learned,
                status: DayStatus::Frozen,
                ..
            }
        ));
        assert_eq!(engine.status_for(day), DayStatus::Frozen);
    }

    #[test]
    fn create_goal_starts_period_today_and_focuses_it() {
        let mut engine = engine_on("2025-03-10");
        let event = engine.create_or_edit_goal("  Rust ", Timeframe::Month).unwrap();

        assert_eq!(engine.goal().topic, "Rust");
        assert_eq!(engine.goal().period_start, key("2025-03-10"));
        assert_eq!(engine.live_period().end_exclusive, key("2025-04-10"));
        assert_eq!(engine.revision(), GoalRevision(1));
        assert_eq!(engine.view().selected, key("2025-03-10"));
        assert!(engine.awaiting_first_log());
        assert!(matches!(event, Event::GoalRevised { focus, .. } if focus == key("2025-03-10")));
    }

    #[test]
    fn edit_keeps_progress_and_skips_logged_days() {
        let mut engine = engine_on("2025-01-01");
        engine.set_status(key("2025-01-01"), DayStatus::Learned).unwrap();
        engine.set_status(key("2025-01-02"), DayStatus::Frozen).unwrap();

        engine.create_or_edit_goal("Rust", Timeframe::Week).unwrap();
        assert_eq!(engine.progress().len(), 2);
        assert_eq!(engine.view().selected, key("2025-01-03"));
    }

    #[test]
    fn restart_keeps_topic_and_bumps_revision() {
        let mut engine = engine_on("2025-01-01");
        engine.create_or_edit_goal("Rust", Timeframe::Year).unwrap();
        engine.clock().set(key("2026-01-05"));
        engine.restart_same_goal().unwrap();

        assert_eq!(engine.goal().topic, "Rust");
        assert_eq!(engine.goal().timeframe, Timeframe::Year);
        assert_eq!(engine.goal().period_start, key("2026-01-05"));
        assert_eq!(engine.revision(), GoalRevision(2));
    }

    #[test]
    fn elapsed_live_week_is_complete_until_revised() {
        // Goal starts on a Monday so the browsed week is the live period.
        let mut engine = engine_on("2025-01-06");
        engine.clock().set(key("2025-01-13"));
        assert!(engine.is_period_complete(key("2025-01-06")));

        engine.clock().set(key("2025-01-06"));
        engine.restart_same_goal().unwrap();
        engine.clock().set(key("2025-01-13"));
        assert!(engine.awaiting_first_log());
        assert!(!engine.is_period_complete(key("2025-01-06")));
        // Other periods are not gated.
        assert!(engine.is_period_complete(key("2024-12-30")));
    }

    #[test]
    fn logging_while_showing_live_period_clears_awaiting() {
        let mut engine = engine_on("2025-01-06");
        engine.restart_same_goal().unwrap();
        assert!(engine.is_showing_live_period());
        engine.log_selected(DayStatus::Learned).unwrap();
        assert!(!engine.awaiting_first_log());
    }

    #[test]
    fn logging_elsewhere_keeps_awaiting() {
        let mut engine = engine_on("2025-01-06");
        engine.restart_same_goal().unwrap();
        engine.previous_week();
        assert!(!engine.is_showing_live_period());
        engine.log_selected(DayStatus::Learned).unwrap();
        assert!(engine.awaiting_first_log());
    }

    #[test]
    fn focus_status_quirk_under_exhausted_quota() {
        let mut engine = engine_on("2025-01-06");
        engine.set_status(key("2025-01-06"), DayStatus::Frozen).unwrap();
        engine.set_status(key("2025-01-07"), DayStatus::Frozen).unwrap();
        engine.select(key("2025-01-06"));

        assert!(!engine.is_freeze_available());
        assert_eq!(engine.focus_status(), DayStatus::None);
        assert_eq!(engine.status_for(key("2025-01-06")), DayStatus::Frozen);
    }

    #[test]
    fn unenforced_quota_still_writes_frozen() {
        let mut engine = engine_on("2025-01-06");
        for d in ["2025-01-06", "2025-01-07", "2025-01-08"] {
            engine.set_status(key(d), DayStatus::Frozen).unwrap();
        }
        assert_eq!(engine.freeze_quota().used, 3);
        assert_eq!(engine.snapshot().freeze_label, "2 out of 2 Freezes used");
    }

    #[test]
    fn enforced_quota_rejects_third_freeze() {
        let mut engine = ActivityEngine::open(
            MemoryStore::new(),
            FixedClock::new(key("2025-01-06")),
            EngineSettings {
                week_start: WeekStart::Monday,
                enforce_freeze_quota: true,
            },
        );
        engine.set_status(key("2025-01-06"), DayStatus::Frozen).unwrap();
        engine.set_status(key("2025-01-07"), DayStatus::Frozen).unwrap();
        // Re-freezing an already frozen day is fine.
        engine.set_status(key("2025-01-07"), DayStatus::Frozen).unwrap();

        let err = engine.set_status(key("2025-01-08"), DayStatus::Frozen).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::FreezeQuotaExhausted { used: 2, .. })
        ));
        assert_eq!(engine.status_for(key("2025-01-08")), DayStatus::None);
        // Next week has its own quota.
        engine.set_status(key("2025-01-13"), DayStatus::Frozen).unwrap();
    }

    #[test]
    fn week_navigation_moves_selection() {
        let mut engine = engine_on("2025-01-08");
        assert_eq!(engine.view().week_start, key("2025-01-06"));
        engine.next_week();
        assert_eq!(engine.view().selected, key("2025-01-13"));
        engine.previous_week();
        engine.previous_week();
        assert_eq!(engine.view().week_start, key("2024-12-30"));
        assert_eq!(engine.view().picked_year, 2024);
        assert_eq!(engine.view().picked_month, 12);
    }

    #[test]
    fn show_month_selects_the_first() {
        let mut engine = engine_on("2025-01-08");
        engine.show_month(2025, 3).unwrap();
        assert_eq!(engine.view().selected, key("2025-03-01"));
        assert_eq!(engine.view().week_start, key("2025-02-24"));
        assert!(engine.show_month(2025, 13).is_err());
        assert!(engine.show_month(10000, 1).is_err());
        assert_eq!(engine.view().selected, key("2025-03-01"));
    }

    #[test]
    fn browsing_stops_at_last_representable_week() {
        let mut engine = engine_on("2025-01-08");
        engine.select(key("9999-12-31"));
        engine.next_week();
        engine.log_selected(DayStatus::Learned).unwrap();

        let selected = engine.view().selected;
        assert!(selected <= key("9999-12-31"));
        assert_eq!(engine.status_for(selected), DayStatus::Learned);
    }

    #[test]
    fn month_timeframe_displays_picked_month() {
        let mut engine = engine_on("2025-03-10");
        engine.create_or_edit_goal("Rust", Timeframe::Month).unwrap();
        let displayed = engine.displayed_period();
        assert_eq!(displayed.start, key("2025-03-01"));
        assert_eq!(displayed.end_exclusive, key("2025-04-01"));

        engine.show_month(2025, 1).unwrap();
        assert!(engine.is_displayed_period_complete());
    }

    #[test]
    fn refresh_picks_up_external_revision() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(key("2025-01-06"));
        let mut engine = ActivityEngine::open(&store, &clock, EngineSettings::default());
        assert!(engine.refresh().is_none());

        store.set(keys::TOPIC, "Go").unwrap();
        store.set(keys::GOAL_REVISION, "5").unwrap();
        let event = engine.refresh().unwrap();
        assert!(matches!(event, Event::GoalRevised { revision: GoalRevision(5), .. }));
        assert_eq!(engine.goal().topic, "Go");
        assert!(engine.awaiting_first_log());
        assert!(engine.refresh().is_none());
    }

    #[test]
    fn restored_view_resolves_missed_revision_once() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(key("2025-01-06"));
        let saved = {
            let engine = ActivityEngine::open(&store, &clock, EngineSettings::default());
            *engine.view()
        };
        {
            let mut other = ActivityEngine::open(&store, &clock, EngineSettings::default());
            other.set_status(key("2025-01-06"), DayStatus::Learned).unwrap();
            other.create_or_edit_goal("Go", Timeframe::Week).unwrap();
        }
        let engine =
            ActivityEngine::open_with_view(&store, &clock, EngineSettings::default(), Some(saved));
        assert_eq!(engine.view().seen_revision, GoalRevision(1));
        assert_eq!(engine.view().selected, key("2025-01-07"));
        assert!(engine.awaiting_first_log());
    }

    #[test]
    fn failed_goal_write_still_bumps_revision() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(key("2025-01-06"));
        let mut observer = ActivityEngine::open(&store, &clock, EngineSettings::default());

        clock.set(key("2025-01-08"));
        let failing = FailingStore {
            inner: &store,
            fail_key: keys::PERIOD_START,
        };
        let mut writer = ActivityEngine::open(failing, &clock, EngineSettings::default());
        assert!(writer.create_or_edit_goal("Go", Timeframe::Week).is_err());
        assert_eq!(writer.goal().topic, "<unset>");

        // The partial write is visible to other sessions through the revision.
        assert_eq!(store.get(keys::GOAL_REVISION).unwrap().as_deref(), Some("1"));
        assert!(observer.refresh().is_some());
        assert_eq!(observer.goal().topic, "Go");
        assert_eq!(observer.goal().period_start, key("2025-01-06"));
    }

    #[test]
    fn goal_has_changes_compares_trimmed_topic() {
        let mut engine = engine_on("2025-01-06");
        engine.create_or_edit_goal("Rust", Timeframe::Week).unwrap();
        assert!(!engine.goal_has_changes("Rust ", Timeframe::Week));
        assert!(engine.goal_has_changes("Rust", Timeframe::Month));
    }

    #[test]
    fn snapshot_describes_browsed_week() {
        let mut engine = engine_on("2025-01-08");
        engine.set_status(key("2025-01-06"), DayStatus::Learned).unwrap();
        engine.set_status(key("2025-01-07"), DayStatus::Frozen).unwrap();
        let snap = engine.snapshot();

        assert_eq!(snap.week.len(), 7);
        assert_eq!(snap.week[0].weekday, "MON");
        assert!(snap.week[0].is_past);
        assert!(snap.week[2].is_today && snap.week[2].is_selected);
        assert!(snap.week[6].is_future);
        assert_eq!(snap.counts, WeekCounts { learned: 1, frozen: 1 });
        assert!(snap.freeze.available);
        assert_eq!(snap.month_label, "January 2025");
    }
}

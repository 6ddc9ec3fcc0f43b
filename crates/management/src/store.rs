//! In-memory dashboard document with invariant-preserving actions.
//!
//! The store is a single-owner value: every mutating action takes `&mut self`,
//! so no two actions can overlap and no reader can observe a half-applied
//! update. Records are replaced whole, never edited in place.

use std::collections::VecDeque;
use std::time::Duration as StdDuration;

use campaign_core::{AppConfig, CampaignResult};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::{debug, info};

use crate::fixtures::{Fixtures, IdSequence, LOG_METHODS};
use crate::models::*;
use crate::random::{round2, SeededStream};

const LOG_OPERATIONS: [&str; 7] = [
    "Campaigns.add",
    "Campaigns.update",
    "Campaigns.delete",
    "Ads.add",
    "Keywords.suspend",
    "Reports.get",
    "Clients.get",
];
const SUCCESS_CODES: [u16; 4] = [200, 201, 202, 204];
const ERROR_CODES: [u16; 7] = [400, 401, 403, 404, 409, 429, 500];
const SUCCESS_MESSAGE: &str = "Request processed successfully";
const ERROR_MESSAGES: [&str; 4] = [
    "Points limit exceeded",
    "Insufficient access rights",
    "Data validation failed",
    "Retry later",
];

/// Days a duplicated campaign runs from today.
const DUPLICATE_RUN_DAYS: i64 = 60;

/// Time source for timestamps and date ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(at) => *at,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// The dashboard's domain store: entity graph, settings, logs and the
/// runtime random stream that drives simulated variance.
pub struct DataStore {
    pub(crate) campaigns: Vec<Campaign>,
    pub(crate) ad_groups: Vec<AdGroup>,
    pub(crate) keywords: Vec<Keyword>,
    pub(crate) metrics: Vec<MetricPoint>,
    pub(crate) device_split: Vec<DeviceShare>,
    pub(crate) report_rows: Vec<ReportRow>,
    pub(crate) placements: Vec<PlacementOption>,
    pub(crate) extensions: Vec<ExtensionItem>,
    pub(crate) api_settings: ApiSettings,
    pub(crate) scheduler: SchedulerConfig,
    pub(crate) queue: QueueState,
    /// Newest first.
    pub(crate) logs: VecDeque<LogEntry>,
    pub(crate) dashboard_dates: Vec<NaiveDate>,
    pub(crate) last_sync_at: DateTime<Utc>,
    ids: IdSequence,
    next_log_id: u64,
    runtime: SeededStream,
    clock: Clock,
    log_capacity: usize,
    sync_delay: StdDuration,
    refresh_delay: StdDuration,
}

impl DataStore {
    /// Build the store from seeded fixtures using the system clock.
    pub fn new(config: &AppConfig) -> CampaignResult<Self> {
        Self::with_clock(config, Clock::System)
    }

    pub fn with_clock(config: &AppConfig, clock: Clock) -> CampaignResult<Self> {
        config.validate()?;
        let fixtures = Fixtures::generate(config.seeds.fixtures, clock.now(), &config.fixtures);
        Ok(Self::from_fixtures(fixtures, config, clock))
    }

    /// Take ownership of an existing document. The id sequence resumes after
    /// the highest id present.
    pub fn from_fixtures(fixtures: Fixtures, config: &AppConfig, clock: Clock) -> Self {
        let ids = IdSequence::starting_at(fixtures.max_entity_id() + 1);
        let next_log_id = fixtures.logs.iter().map(|l| l.id).max().unwrap_or(0) + 1;

        let mut logs = fixtures.logs;
        logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        logs.truncate(config.logs.capacity);

        let now = clock.now();
        info!(
            campaigns = fixtures.campaigns.len(),
            ad_groups = fixtures.ad_groups.len(),
            keywords = fixtures.keywords.len(),
            next_id = ids.peek(),
            "Dashboard store initialized (in-memory)"
        );

        Self {
            campaigns: fixtures.campaigns,
            ad_groups: fixtures.ad_groups,
            keywords: fixtures.keywords,
            metrics: fixtures.metrics,
            device_split: fixtures.device_split,
            report_rows: fixtures.report_rows,
            placements: fixtures.placements,
            extensions: fixtures.extensions,
            api_settings: fixtures.api_settings,
            scheduler: fixtures.scheduler,
            queue: fixtures.queue,
            logs: logs.into(),
            dashboard_dates: fixtures.dashboard_dates,
            last_sync_at: now - Duration::hours(2),
            ids,
            next_log_id,
            runtime: SeededStream::new(config.seeds.runtime),
            clock,
            log_capacity: config.logs.capacity,
            sync_delay: StdDuration::from_millis(config.simulation.sync_delay_ms),
            refresh_delay: StdDuration::from_millis(config.simulation.refresh_delay_ms),
        }
    }

    // ─── Ids ───────────────────────────────────────────────────────────────

    /// Return the current shared counter value, then advance it.
    pub fn generate_entity_id(&mut self) -> EntityId {
        self.ids.next_id()
    }

    // ─── Simulated backend work ────────────────────────────────────────────

    /// Simulate a sync round-trip: draws a pending job count, waits the
    /// configured delay, then settles the queue and stamps the sync time.
    pub async fn synchronize_data(&mut self) {
        let pending = self.runtime.round_between(3.0, 9.0) as u32;
        debug!(pending, "Synchronization started");
        tokio::time::sleep(self.sync_delay).await;

        self.queue = QueueState {
            pending: pending.saturating_sub(2),
            ..self.queue
        };
        self.last_sync_at = self.clock.now();
        info!(pending = self.queue.pending, "Synchronization finished");
    }

    /// Simulate a statistics pull: after the delay every campaign's spend,
    /// clicks and conversions drift by a small random factor.
    pub async fn refresh_statistics(&mut self) {
        tokio::time::sleep(self.refresh_delay).await;

        let runtime = &mut self.runtime;
        let refreshed: Vec<Campaign> = self
            .campaigns
            .iter()
            .map(|campaign| {
                let multiplier = 0.96 + runtime.next_f64() * 0.08;
                let spend = (campaign.spend * multiplier).round();
                let clicks = ((campaign.clicks as f64 * (0.95 + runtime.next_f64() * 0.1))
                    .round() as u64)
                    .max(80);
                let conversions = ((campaign.conversions as f64
                    * (0.92 + runtime.next_f64() * 0.12))
                    .round() as u64)
                    .max(5);
                Campaign {
                    spend,
                    clicks,
                    conversions,
                    ..campaign.clone()
                }
            })
            .collect();

        self.report_rows = refreshed.iter().map(ReportRow::from_campaign).collect();
        self.campaigns = refreshed;
        self.last_sync_at = self.clock.now();
        info!(campaigns = self.campaigns.len(), "Statistics refreshed");
    }

    // ─── Campaigns ─────────────────────────────────────────────────────────

    /// Append a campaign and its report row; returns the assigned id.
    pub fn add_campaign(&mut self, campaign: NewCampaign) -> EntityId {
        let created = campaign.with_id(self.ids.next_id());
        let id = created.id;
        self.report_rows.push(ReportRow::from_campaign(&created));
        self.campaigns.push(created);
        metrics::counter!("dashboard.campaigns.created").increment(1);
        id
    }

    /// Merge `patch` into the campaign and recompute its report row.
    /// Unknown ids are ignored; returns whether a campaign was updated.
    pub fn update_campaign(&mut self, id: EntityId, patch: CampaignPatch) -> bool {
        let Some(index) = self.campaigns.iter().position(|c| c.id == id) else {
            return false;
        };
        let updated = patch.apply(&self.campaigns[index]);
        self.sync_report_row(&updated);
        self.campaigns[index] = updated;
        true
    }

    pub fn toggle_campaign_status(&mut self, id: EntityId, status: CampaignStatus) {
        self.update_campaign(id, CampaignPatch::status(status));
        self.queue = QueueState {
            pending: self.queue.pending.saturating_sub(1),
            ..self.queue
        };
    }

    pub fn archive_campaign(&mut self, id: EntityId) -> bool {
        let archived = self.update_campaign(id, CampaignPatch::status(CampaignStatus::Archived));
        if archived {
            metrics::counter!("dashboard.campaigns.archived").increment(1);
        }
        archived
    }

    /// Clone a campaign with its ad groups, ads, keywords, metrics and report
    /// row. The copy and every cloned child start PAUSED under fresh ids.
    pub fn duplicate_campaign(&mut self, id: EntityId) -> Option<EntityId> {
        let source = self.campaigns.iter().find(|c| c.id == id)?.clone();
        let today = self.clock.today();

        let clone = Campaign {
            id: self.ids.next_id(),
            name: format!("{} (copy)", source.name),
            status: CampaignStatus::Paused,
            start_date: today,
            end_date: today + Duration::days(DUPLICATE_RUN_DAYS),
            ..source.clone()
        };
        let new_id = clone.id;

        let groups: Vec<AdGroup> = self
            .ad_groups
            .iter()
            .filter(|g| g.campaign_id == source.id)
            .cloned()
            .collect();
        for group in groups {
            let group_id = self.ids.next_id();
            let ads = group
                .ads
                .iter()
                .map(|ad| Ad {
                    id: self.ids.next_id(),
                    status: CampaignStatus::Paused,
                    ..ad.clone()
                })
                .collect();
            self.ad_groups.push(AdGroup {
                id: group_id,
                campaign_id: new_id,
                status: CampaignStatus::Paused,
                ads,
                ..group
            });
        }

        let keywords: Vec<Keyword> = self
            .keywords
            .iter()
            .filter(|k| k.campaign_id == source.id)
            .cloned()
            .collect();
        for keyword in keywords {
            self.keywords.push(Keyword {
                id: self.ids.next_id(),
                campaign_id: new_id,
                status: CampaignStatus::Paused,
                ..keyword
            });
        }

        let points: Vec<MetricPoint> = self
            .metrics
            .iter()
            .filter(|m| m.campaign_id == source.id)
            .map(|m| MetricPoint {
                campaign_id: new_id,
                ..m.clone()
            })
            .collect();
        self.metrics.extend(points);

        self.report_rows.push(ReportRow::from_campaign(&clone));
        self.campaigns.push(clone);

        metrics::counter!("dashboard.campaigns.duplicated").increment(1);
        info!(source = id, copy = new_id, "Campaign duplicated");
        Some(new_id)
    }

    /// Archive rather than delete, then record the operation in the log.
    /// Children stay attached to the archived campaign.
    pub fn remove_campaign(&mut self, id: EntityId) {
        self.archive_campaign(id);
        self.append_log(LogDraft {
            method: Some("delete".to_string()),
            operation: Some("Campaigns.delete".to_string()),
            status: Some(LogStatus::Success),
            http_code: Some(200),
            duration: Some(120),
            message: Some(format!("Campaign {id} moved to archive")),
            ..LogDraft::default()
        });
        info!(campaign = id, "Campaign removed (archived)");
    }

    fn sync_report_row(&mut self, campaign: &Campaign) {
        let row = ReportRow::from_campaign(campaign);
        match self
            .report_rows
            .iter()
            .position(|r| r.campaign_id == campaign.id)
        {
            Some(index) => self.report_rows[index] = row,
            None => self.report_rows.push(row),
        }
    }

    // ─── Keywords ──────────────────────────────────────────────────────────

    pub fn update_keyword_bid(&mut self, id: EntityId, bid: f64) -> bool {
        let Some(index) = self.keywords.iter().position(|k| k.id == id) else {
            return false;
        };
        self.keywords[index] = Keyword {
            bid,
            ..self.keywords[index].clone()
        };
        true
    }

    /// Multiply every matching bid by `1 + percent / 100`, rounded to cents.
    /// `None` matches all keywords. Returns the number of keywords changed.
    pub fn bulk_increase_bids(
        &mut self,
        percent: f64,
        predicate: Option<&dyn Fn(&Keyword) -> bool>,
    ) -> usize {
        let multiplier = 1.0 + percent / 100.0;
        let mut changed = 0;
        self.keywords = self
            .keywords
            .iter()
            .map(|keyword| {
                if predicate.map_or(true, |matches| matches(keyword)) {
                    changed += 1;
                    Keyword {
                        bid: round2(keyword.bid * multiplier),
                        ..keyword.clone()
                    }
                } else {
                    keyword.clone()
                }
            })
            .collect();
        debug!(percent, changed, "Bulk bid increase applied");
        changed
    }

    pub fn bulk_change_keyword_status(
        &mut self,
        status: CampaignStatus,
        predicate: Option<&dyn Fn(&Keyword) -> bool>,
    ) -> usize {
        let mut changed = 0;
        self.keywords = self
            .keywords
            .iter()
            .map(|keyword| {
                if predicate.map_or(true, |matches| matches(keyword)) {
                    changed += 1;
                    Keyword {
                        status,
                        ..keyword.clone()
                    }
                } else {
                    keyword.clone()
                }
            })
            .collect();
        debug!(?status, changed, "Bulk keyword status change applied");
        changed
    }

    // ─── API quota ─────────────────────────────────────────────────────────

    /// Add `points` to usage, capped at the limit, then re-check the pause rule.
    pub fn consume_api_points(&mut self, points: u64) {
        let usage = self
            .api_settings
            .api_usage
            .saturating_add(points)
            .min(self.api_settings.api_limit);
        self.api_settings = ApiSettings {
            api_usage: usage,
            ..self.api_settings.clone()
        };
        metrics::counter!("dashboard.api.points_consumed").increment(points);
        self.check_api_pause();
    }

    pub fn reset_api_usage(&mut self) {
        self.api_settings = ApiSettings {
            api_usage: 0,
            is_paused: false,
            ..self.api_settings.clone()
        };
        self.queue = QueueState {
            paused: false,
            ..self.queue
        };
        self.check_api_pause();
    }

    pub fn update_api_settings(&mut self, patch: ApiSettingsPatch) {
        self.api_settings = patch.apply(&self.api_settings);
        self.check_api_pause();
    }

    /// Enforce `is_paused == usage >= limit * threshold` and mirror it into the queue.
    pub fn check_api_pause(&mut self) {
        let should_pause = self.api_settings.should_pause();
        if should_pause != self.api_settings.is_paused {
            info!(
                usage = self.api_settings.api_usage,
                limit = self.api_settings.api_limit,
                paused = should_pause,
                "API auto-pause state changed"
            );
        }
        self.api_settings = ApiSettings {
            is_paused: should_pause,
            ..self.api_settings.clone()
        };
        self.queue = QueueState {
            paused: should_pause,
            ..self.queue
        };
        metrics::gauge!("dashboard.api.usage").set(self.api_settings.api_usage as f64);
    }

    // ─── Settings ──────────────────────────────────────────────────────────

    pub fn update_scheduler(&mut self, patch: SchedulerPatch) {
        self.scheduler = patch.apply(&self.scheduler);
    }

    pub fn toggle_placement(&mut self, id: u64, enabled: bool) -> bool {
        let Some(index) = self.placements.iter().position(|p| p.id == id) else {
            return false;
        };
        self.placements[index] = PlacementOption {
            enabled,
            ..self.placements[index].clone()
        };
        true
    }

    pub fn set_queue_state(&mut self, patch: QueuePatch) {
        self.queue = QueueState {
            pending: patch.pending.unwrap_or(self.queue.pending),
            paused: patch.paused.unwrap_or(self.queue.paused),
        };
    }

    // ─── Logs ──────────────────────────────────────────────────────────────

    /// Prepend a log entry, filling unspecified fields with randomized
    /// defaults. The oldest entry is evicted once capacity is exceeded.
    pub fn append_log(&mut self, draft: LogDraft) -> u64 {
        let random = &mut self.runtime;
        let method = draft
            .method
            .unwrap_or_else(|| pick(random, &LOG_METHODS).to_string());
        let operation = draft
            .operation
            .unwrap_or_else(|| pick(random, &LOG_OPERATIONS).to_string());
        let status = draft.status.unwrap_or_else(|| {
            if random.next_f64() > 0.18 {
                LogStatus::Success
            } else {
                LogStatus::Error
            }
        });
        let http_code = draft.http_code.unwrap_or_else(|| match status {
            LogStatus::Success => pick(random, &SUCCESS_CODES),
            LogStatus::Error => pick(random, &ERROR_CODES),
        });
        let duration = draft
            .duration
            .unwrap_or_else(|| random.round_between(90.0, 800.0));
        let message = draft.message.unwrap_or_else(|| match status {
            LogStatus::Success => SUCCESS_MESSAGE.to_string(),
            LogStatus::Error => pick(random, &ERROR_MESSAGES).to_string(),
        });

        let id = self.next_log_id;
        self.next_log_id += 1;
        self.logs.push_front(LogEntry {
            id,
            timestamp: draft.timestamp.unwrap_or_else(|| self.clock.now()),
            method,
            operation,
            status,
            http_code,
            duration,
            message,
        });
        while self.logs.len() > self.log_capacity {
            self.logs.pop_back();
        }
        metrics::counter!("dashboard.logs.appended").increment(1);
        id
    }

    pub fn clear_logs(&mut self) {
        self.logs.clear();
    }
}

fn pick<T: Copy>(random: &mut SeededStream, values: &[T]) -> T {
    // Every list passed here is a non-empty constant.
    *random.pick_one(values).unwrap_or(&values[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 20, 12, 0, 0).unwrap()
    }

    fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.simulation.sync_delay_ms = 5;
        config.simulation.refresh_delay_ms = 5;
        config
    }

    fn make_store() -> DataStore {
        DataStore::with_clock(&test_config(), Clock::Fixed(fixed_now())).unwrap()
    }

    fn empty_store() -> DataStore {
        DataStore::from_fixtures(
            Fixtures::empty(fixed_now()),
            &test_config(),
            Clock::Fixed(fixed_now()),
        )
    }

    fn new_campaign(name: &str, spend: f64, clicks: u64, conversions: u64) -> NewCampaign {
        let date = fixed_now().date_naive();
        NewCampaign {
            name: name.to_string(),
            campaign_type: CampaignType::TextCampaign,
            status: CampaignStatus::Active,
            strategy: "MANUAL_BIDS".to_string(),
            budget: 10_000.0,
            daily_budget: 333.0,
            start_date: date,
            end_date: date + Duration::days(30),
            region: "Kazan".to_string(),
            adjustments: vec![],
            spend,
            clicks,
            impressions: clicks * 10,
            conversions,
        }
    }

    fn row_for(store: &DataStore, id: EntityId) -> ReportRow {
        store
            .report_rows
            .iter()
            .find(|r| r.campaign_id == id)
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_generate_entity_id_is_sequential() {
        let mut store = make_store();
        let first = store.generate_entity_id();
        let second = store.generate_entity_id();
        assert_eq!(second, first + 1);
        let max_existing = store.keywords.iter().map(|k| k.id).max().unwrap();
        assert!(first > max_existing);
    }

    #[test]
    fn test_add_campaign_on_empty_store() {
        let mut store = empty_store();
        let id = store.add_campaign(new_campaign("X", 1000.0, 50, 5));
        assert_eq!(id, 1);
        assert_eq!(store.report_rows.len(), 1);
        let row = row_for(&store, 1);
        assert!((row.cpc - 20.0).abs() < 1e-9);
        assert!((row.roi - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_add_campaign_never_reuses_child_ids() {
        let mut store = make_store();
        let id = store.add_campaign(new_campaign("Fresh", 100.0, 10, 1));
        assert!(store.ad_groups.iter().all(|g| g.id != id));
        assert!(store.keywords.iter().all(|k| k.id != id));
    }

    #[test]
    fn test_update_campaign_resyncs_report_row() {
        let mut store = make_store();
        let applied = store.update_campaign(
            2,
            CampaignPatch {
                spend: Some(2_000.0),
                clicks: Some(100),
                conversions: Some(10),
                name: Some("Renamed".into()),
                ..CampaignPatch::default()
            },
        );
        assert!(applied);
        let row = row_for(&store, 2);
        assert_eq!(row.campaign, "Renamed");
        assert!((row.cpc - 20.0).abs() < 1e-9);
        assert!((row.roi - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_update_unknown_campaign_is_noop() {
        let mut store = make_store();
        let before = store.campaigns.clone();
        assert!(!store.update_campaign(9_999, CampaignPatch::status(CampaignStatus::Paused)));
        assert_eq!(store.campaigns, before);
    }

    #[test]
    fn test_toggle_status_decrements_pending_floored() {
        let mut store = make_store();
        store.set_queue_state(QueuePatch {
            pending: Some(1),
            paused: None,
        });
        store.toggle_campaign_status(1, CampaignStatus::Paused);
        assert_eq!(store.campaigns[0].status, CampaignStatus::Paused);
        assert_eq!(store.queue.pending, 0);
        store.toggle_campaign_status(1, CampaignStatus::Active);
        assert_eq!(store.queue.pending, 0);
    }

    #[test]
    fn test_duplicate_campaign_cascades() {
        let mut store = make_store();
        let groups = store.ad_groups.iter().filter(|g| g.campaign_id == 3).count();
        let ads: usize = store
            .ad_groups
            .iter()
            .filter(|g| g.campaign_id == 3)
            .map(|g| g.ads.len())
            .sum();
        let keywords = store.keywords.iter().filter(|k| k.campaign_id == 3).count();
        let points = store.metrics.iter().filter(|m| m.campaign_id == 3).count();
        let rows = store.report_rows.len();

        let new_id = store.duplicate_campaign(3).unwrap();

        let copy = store.campaigns.iter().find(|c| c.id == new_id).unwrap();
        assert_eq!(copy.status, CampaignStatus::Paused);
        assert!(copy.name.ends_with("(copy)"));
        assert_eq!(copy.start_date, fixed_now().date_naive());
        assert_eq!(copy.end_date, fixed_now().date_naive() + Duration::days(60));

        let new_groups: Vec<&AdGroup> =
            store.ad_groups.iter().filter(|g| g.campaign_id == new_id).collect();
        assert_eq!(new_groups.len(), groups);
        assert!(new_groups.iter().all(|g| g.status == CampaignStatus::Paused));
        let new_ads: usize = new_groups.iter().map(|g| g.ads.len()).sum();
        assert_eq!(new_ads, ads);
        assert!(new_groups
            .iter()
            .flat_map(|g| g.ads.iter())
            .all(|ad| ad.status == CampaignStatus::Paused && ad.id > 3));

        let new_keywords: Vec<&Keyword> =
            store.keywords.iter().filter(|k| k.campaign_id == new_id).collect();
        assert_eq!(new_keywords.len(), keywords);
        assert!(new_keywords.iter().all(|k| k.status == CampaignStatus::Paused));

        assert_eq!(
            store.metrics.iter().filter(|m| m.campaign_id == new_id).count(),
            points
        );
        assert_eq!(store.report_rows.len(), rows + 1);
        assert_eq!(row_for(&store, new_id).campaign, copy.name);
    }

    #[test]
    fn test_duplicate_ids_are_unique() {
        let mut store = make_store();
        store.duplicate_campaign(1).unwrap();
        store.duplicate_campaign(1).unwrap();
        let mut ids: Vec<EntityId> = store.campaigns.iter().map(|c| c.id).collect();
        for g in &store.ad_groups {
            ids.push(g.id);
            ids.extend(g.ads.iter().map(|ad| ad.id));
        }
        ids.extend(store.keywords.iter().map(|k| k.id));
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_duplicate_unknown_campaign() {
        let mut store = make_store();
        let count = store.campaigns.len();
        assert_eq!(store.duplicate_campaign(4_242), None);
        assert_eq!(store.campaigns.len(), count);
    }

    #[test]
    fn test_remove_campaign_archives_and_logs() {
        let mut store = make_store();
        let groups_before: Vec<AdGroup> = store
            .ad_groups
            .iter()
            .filter(|g| g.campaign_id == 3)
            .cloned()
            .collect();

        store.remove_campaign(3);

        let campaign = store.campaigns.iter().find(|c| c.id == 3).unwrap();
        assert_eq!(campaign.status, CampaignStatus::Archived);
        let head = store.logs.front().unwrap();
        assert_eq!(head.operation, "Campaigns.delete");
        assert_eq!(head.status, LogStatus::Success);
        assert_eq!(head.http_code, 200);

        let groups_after: Vec<AdGroup> = store
            .ad_groups
            .iter()
            .filter(|g| g.campaign_id == 3)
            .cloned()
            .collect();
        assert_eq!(groups_before, groups_after);
    }

    #[test]
    fn test_update_keyword_bid() {
        let mut store = make_store();
        let id = store.keywords[0].id;
        assert!(store.update_keyword_bid(id, 9.99));
        assert_eq!(store.keywords[0].bid, 9.99);
        assert!(!store.update_keyword_bid(0, 1.0));
    }

    #[test]
    fn test_bulk_increase_bids_with_predicate() {
        let mut store = make_store();
        let before = store.keywords.clone();
        let changed = store.bulk_increase_bids(10.0, Some(&|k: &Keyword| k.campaign_id == 1));
        assert_eq!(
            changed,
            before.iter().filter(|k| k.campaign_id == 1).count()
        );
        for (old, new) in before.iter().zip(&store.keywords) {
            if old.campaign_id == 1 {
                assert!((new.bid - round2(old.bid * 1.1)).abs() < 1e-9);
            } else {
                assert_eq!(new.bid, old.bid);
            }
        }
    }

    #[test]
    fn test_bulk_change_status_all() {
        let mut store = make_store();
        let changed = store.bulk_change_keyword_status(CampaignStatus::Paused, None);
        assert_eq!(changed, store.keywords.len());
        assert!(store
            .keywords
            .iter()
            .all(|k| k.status == CampaignStatus::Paused));
    }

    #[test]
    fn test_bulk_change_status_with_predicate() {
        let mut store = make_store();
        let before = store.keywords.clone();
        let expected = before.iter().filter(|k| k.negative).count();

        let changed = store.bulk_change_keyword_status(
            CampaignStatus::Archived,
            Some(&|k: &Keyword| k.negative),
        );

        assert_eq!(changed, expected);
        for (old, new) in before.iter().zip(&store.keywords) {
            if old.negative {
                assert_eq!(new.status, CampaignStatus::Archived);
            } else {
                assert_eq!(new.status, old.status);
            }
        }
    }

    #[test]
    fn test_consume_api_points_caps_and_pauses() {
        let mut store = make_store();
        store.update_api_settings(ApiSettingsPatch {
            api_usage: Some(750),
            api_limit: Some(1000),
            auto_pause_threshold: Some(0.8),
            ..ApiSettingsPatch::default()
        });
        assert!(!store.api_settings.is_paused);

        store.consume_api_points(100);
        assert_eq!(store.api_settings.api_usage, 850);
        assert!(store.api_settings.is_paused);
        assert!(store.queue.paused);

        store.consume_api_points(10_000);
        assert_eq!(store.api_settings.api_usage, 1000);
    }

    #[test]
    fn test_reset_api_usage_clears_pause() {
        let mut store = make_store();
        store.consume_api_points(1_000);
        assert!(store.queue.paused);
        store.reset_api_usage();
        assert_eq!(store.api_settings.api_usage, 0);
        assert!(!store.api_settings.is_paused);
        assert!(!store.queue.paused);
    }

    #[test]
    fn test_reset_with_zero_threshold_stays_paused() {
        let mut store = make_store();
        store.update_api_settings(ApiSettingsPatch {
            auto_pause_threshold: Some(0.0),
            ..ApiSettingsPatch::default()
        });
        store.reset_api_usage();
        assert_eq!(store.api_settings.api_usage, 0);
        assert!(store.api_settings.is_paused);
        assert!(store.queue.paused);
    }

    #[test]
    fn test_settings_change_reevaluates_pause() {
        let mut store = make_store();
        // usage 420 of 1000
        store.update_api_settings(ApiSettingsPatch {
            auto_pause_threshold: Some(0.4),
            ..ApiSettingsPatch::default()
        });
        assert!(store.api_settings.is_paused);
        assert!(store.queue.paused);
        store.update_api_settings(ApiSettingsPatch {
            api_limit: Some(5_000),
            ..ApiSettingsPatch::default()
        });
        assert!(!store.api_settings.is_paused);
        assert!(!store.queue.paused);
    }

    #[test]
    fn test_scheduler_and_placements() {
        let mut store = make_store();
        store.update_scheduler(SchedulerPatch {
            frequency: Some(ReportFrequency::Weekly),
            email: Some("ops@example.com".into()),
            ..SchedulerPatch::default()
        });
        assert_eq!(store.scheduler.frequency, ReportFrequency::Weekly);
        assert_eq!(store.scheduler.email, "ops@example.com");

        assert!(store.toggle_placement(4, true));
        assert!(store.placements.iter().find(|p| p.id == 4).unwrap().enabled);
        assert!(!store.toggle_placement(99, true));
    }

    #[test]
    fn test_append_log_fills_defaults() {
        let mut store = make_store();
        let id = store.append_log(LogDraft::default());
        let entry = store.logs.front().unwrap();
        assert_eq!(entry.id, id);
        assert_eq!(entry.timestamp, fixed_now());
        match entry.status {
            LogStatus::Success => {
                assert!(SUCCESS_CODES.contains(&entry.http_code));
                assert_eq!(entry.message, SUCCESS_MESSAGE);
            }
            LogStatus::Error => {
                assert!(ERROR_CODES.contains(&entry.http_code));
                assert!(ERROR_MESSAGES.contains(&entry.message.as_str()));
            }
        }
        assert!((90..=890).contains(&entry.duration));
    }

    #[test]
    fn test_append_log_evicts_oldest() {
        let mut store = make_store();
        store.clear_logs();
        for _ in 0..250 {
            store.append_log(LogDraft::default());
        }
        let oldest = store.logs.back().unwrap().id;
        let newest = store.append_log(LogDraft::default());
        assert_eq!(store.logs.len(), 250);
        assert_eq!(store.logs.front().unwrap().id, newest);
        assert!(store.logs.iter().all(|l| l.id != oldest));
    }

    #[test]
    fn test_initial_logs_newest_first() {
        let store = make_store();
        assert_eq!(store.logs.len(), 90);
        let logs: Vec<&LogEntry> = store.logs.iter().collect();
        assert!(logs.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    }

    #[tokio::test]
    async fn test_synchronize_data_settles_queue() {
        let mut store = make_store();
        store.synchronize_data().await;
        assert!(store.queue.pending <= 10);
        assert_eq!(store.last_sync_at, fixed_now());
    }

    #[tokio::test]
    async fn test_refresh_statistics_keeps_reports_in_sync() {
        let mut store = make_store();
        let before = store.campaigns.clone();
        store.refresh_statistics().await;
        assert_eq!(store.report_rows.len(), store.campaigns.len());
        for (old, new) in before.iter().zip(&store.campaigns) {
            assert!(new.spend >= (old.spend * 0.96).floor());
            assert!(new.spend <= (old.spend * 1.04).ceil());
            assert!(new.clicks >= 80);
            assert!(new.conversions >= 5);
            assert_eq!(new.impressions, old.impressions);
            assert_eq!(row_for(&store, new.id), ReportRow::from_campaign(new));
        }
    }
}

//! Read-only views over the current document. Nothing here is cached:
//! every aggregate is recomputed from the store on each call.

use std::collections::{BTreeMap, VecDeque};

use campaign_core::CampaignResult;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::models::*;
use crate::store::DataStore;

/// Impressions and clicks per day, dates ascending.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PerformanceTrend {
    pub dates: Vec<NaiveDate>,
    pub impressions: Vec<u64>,
    pub clicks: Vec<u64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConversionPoint {
    pub date: NaiveDate,
    pub conversions: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SpendShare {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardOverview {
    pub total_campaigns: usize,
    pub active_campaigns: usize,
    pub total_spend: f64,
    pub total_clicks: u64,
    pub total_impressions: u64,
    pub total_conversions: u64,
    pub avg_ctr: f64,
    pub api_usage_ratio: f64,
    pub queue_pending: u32,
    pub paused: bool,
    pub last_sync_at: DateTime<Utc>,
}

/// Borrowed view of the whole document for serialization.
#[derive(Serialize)]
struct Snapshot<'a> {
    campaigns: &'a [Campaign],
    ad_groups: &'a [AdGroup],
    keywords: &'a [Keyword],
    metrics: &'a [MetricPoint],
    device_split: &'a [DeviceShare],
    report_rows: &'a [ReportRow],
    placements: &'a [PlacementOption],
    extensions: &'a [ExtensionItem],
    api_settings: &'a ApiSettings,
    scheduler: &'a SchedulerConfig,
    queue: &'a QueueState,
    logs: &'a VecDeque<LogEntry>,
    dashboard_dates: &'a [NaiveDate],
    last_sync_at: DateTime<Utc>,
}

impl DataStore {
    // ─── Collections ───────────────────────────────────────────────────────

    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    pub fn ad_groups(&self) -> &[AdGroup] {
        &self.ad_groups
    }

    pub fn keywords(&self) -> &[Keyword] {
        &self.keywords
    }

    pub fn metrics(&self) -> &[MetricPoint] {
        &self.metrics
    }

    pub fn device_split(&self) -> &[DeviceShare] {
        &self.device_split
    }

    pub fn report_rows(&self) -> &[ReportRow] {
        &self.report_rows
    }

    pub fn placements(&self) -> &[PlacementOption] {
        &self.placements
    }

    pub fn extensions(&self) -> &[ExtensionItem] {
        &self.extensions
    }

    pub fn api_settings(&self) -> &ApiSettings {
        &self.api_settings
    }

    pub fn scheduler(&self) -> &SchedulerConfig {
        &self.scheduler
    }

    pub fn queue(&self) -> QueueState {
        self.queue
    }

    /// Newest entry first.
    pub fn logs(&self) -> &VecDeque<LogEntry> {
        &self.logs
    }

    pub fn dashboard_dates(&self) -> &[NaiveDate] {
        &self.dashboard_dates
    }

    pub fn last_sync_at(&self) -> DateTime<Utc> {
        self.last_sync_at
    }

    // ─── Lookups ───────────────────────────────────────────────────────────

    pub fn campaign_by_id(&self, id: EntityId) -> Option<&Campaign> {
        self.campaigns.iter().find(|c| c.id == id)
    }

    pub fn ad_groups_by_campaign(&self, campaign_id: EntityId) -> Vec<&AdGroup> {
        self.ad_groups
            .iter()
            .filter(|g| g.campaign_id == campaign_id)
            .collect()
    }

    pub fn keywords_by_campaign(&self, campaign_id: EntityId) -> Vec<&Keyword> {
        self.keywords
            .iter()
            .filter(|k| k.campaign_id == campaign_id)
            .collect()
    }

    pub fn report_row(&self, campaign_id: EntityId) -> Option<&ReportRow> {
        self.report_rows.iter().find(|r| r.campaign_id == campaign_id)
    }

    // ─── Aggregates ────────────────────────────────────────────────────────

    pub fn active_campaigns_count(&self) -> usize {
        self.campaigns
            .iter()
            .filter(|c| c.status == CampaignStatus::Active)
            .count()
    }

    pub fn total_spend(&self) -> f64 {
        self.campaigns.iter().map(|c| c.spend).sum()
    }

    pub fn total_clicks(&self) -> u64 {
        self.campaigns.iter().map(|c| c.clicks).sum()
    }

    pub fn total_conversions(&self) -> u64 {
        self.campaigns.iter().map(|c| c.conversions).sum()
    }

    pub fn performance_trend(&self) -> PerformanceTrend {
        let mut by_date: BTreeMap<NaiveDate, (u64, u64)> = BTreeMap::new();
        for point in &self.metrics {
            let entry = by_date.entry(point.date).or_default();
            entry.0 += point.impressions;
            entry.1 += point.clicks;
        }

        let mut trend = PerformanceTrend::default();
        for (date, (impressions, clicks)) in by_date {
            trend.dates.push(date);
            trend.impressions.push(impressions);
            trend.clicks.push(clicks);
        }
        trend
    }

    pub fn conversion_trend(&self) -> Vec<ConversionPoint> {
        let mut by_date: BTreeMap<NaiveDate, u64> = BTreeMap::new();
        for point in &self.metrics {
            *by_date.entry(point.date).or_default() += point.conversions;
        }
        by_date
            .into_iter()
            .map(|(date, conversions)| ConversionPoint { date, conversions })
            .collect()
    }

    pub fn spend_by_campaign(&self) -> Vec<SpendShare> {
        self.campaigns
            .iter()
            .map(|c| SpendShare {
                name: c.name.clone(),
                value: c.spend,
            })
            .collect()
    }

    pub fn overview(&self) -> DashboardOverview {
        let total_impressions: u64 = self.campaigns.iter().map(|c| c.impressions).sum();
        let total_clicks = self.total_clicks();
        let avg_ctr = if total_impressions > 0 {
            total_clicks as f64 / total_impressions as f64
        } else {
            0.0
        };

        DashboardOverview {
            total_campaigns: self.campaigns.len(),
            active_campaigns: self.active_campaigns_count(),
            total_spend: self.total_spend(),
            total_clicks,
            total_impressions,
            total_conversions: self.total_conversions(),
            avg_ctr,
            api_usage_ratio: self.api_settings.usage_ratio(),
            queue_pending: self.queue.pending,
            paused: self.api_settings.is_paused,
            last_sync_at: self.last_sync_at,
        }
    }

    /// Serialize the whole document for the presentation layer.
    pub fn snapshot_json(&self) -> CampaignResult<String> {
        let snapshot = Snapshot {
            campaigns: &self.campaigns,
            ad_groups: &self.ad_groups,
            keywords: &self.keywords,
            metrics: &self.metrics,
            device_split: &self.device_split,
            report_rows: &self.report_rows,
            placements: &self.placements,
            extensions: &self.extensions,
            api_settings: &self.api_settings,
            scheduler: &self.scheduler,
            queue: &self.queue,
            logs: &self.logs,
            dashboard_dates: &self.dashboard_dates,
            last_sync_at: self.last_sync_at,
        };
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }
}

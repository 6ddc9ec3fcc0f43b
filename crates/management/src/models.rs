//! Dashboard domain types — campaigns, ad groups, keywords, metrics, reports,
//! logs, API quota, scheduler and placement settings.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::random::round2;

/// Process-unique positive identifier shared by campaigns, ad groups, ads and keywords.
pub type EntityId = u64;

/// Revenue attributed to one conversion when computing report ROI.
pub const CONVERSION_VALUE: f64 = 3000.0;

// ─── Campaign ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Campaign {
    pub id: EntityId,
    pub name: String,
    #[serde(rename = "type")]
    pub campaign_type: CampaignType,
    pub status: CampaignStatus,
    pub strategy: String,
    pub budget: f64,
    /// Informational only; never enforced against spend.
    pub daily_budget: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub region: String,
    #[serde(default)]
    pub adjustments: Vec<String>,
    pub spend: f64,
    pub clicks: u64,
    pub impressions: u64,
    pub conversions: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignType {
    TextCampaign,
    UnifiedCampaign,
    SmartCampaign,
    DynamicCampaign,
    MobileAppCampaign,
}

impl CampaignType {
    pub const ALL: [CampaignType; 5] = [
        CampaignType::TextCampaign,
        CampaignType::UnifiedCampaign,
        CampaignType::SmartCampaign,
        CampaignType::DynamicCampaign,
        CampaignType::MobileAppCampaign,
    ];
}

/// Status domain shared by campaigns, ad groups, ads and keywords.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignStatus {
    Active,
    Paused,
    Archived,
}

/// A campaign before it has been assigned an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCampaign {
    pub name: String,
    #[serde(rename = "type")]
    pub campaign_type: CampaignType,
    pub status: CampaignStatus,
    #[serde(default)]
    pub strategy: String,
    #[serde(default)]
    pub budget: f64,
    #[serde(default)]
    pub daily_budget: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub adjustments: Vec<String>,
    #[serde(default)]
    pub spend: f64,
    #[serde(default)]
    pub clicks: u64,
    #[serde(default)]
    pub impressions: u64,
    #[serde(default)]
    pub conversions: u64,
}

impl NewCampaign {
    pub fn with_id(self, id: EntityId) -> Campaign {
        Campaign {
            id,
            name: self.name,
            campaign_type: self.campaign_type,
            status: self.status,
            strategy: self.strategy,
            budget: self.budget,
            daily_budget: self.daily_budget,
            start_date: self.start_date,
            end_date: self.end_date,
            region: self.region,
            adjustments: self.adjustments,
            spend: self.spend,
            clicks: self.clicks,
            impressions: self.impressions,
            conversions: self.conversions,
        }
    }
}

/// Partial campaign update; `None` fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CampaignPatch {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub campaign_type: Option<CampaignType>,
    pub status: Option<CampaignStatus>,
    pub strategy: Option<String>,
    pub budget: Option<f64>,
    pub daily_budget: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub region: Option<String>,
    pub adjustments: Option<Vec<String>>,
    pub spend: Option<f64>,
    pub clicks: Option<u64>,
    pub impressions: Option<u64>,
    pub conversions: Option<u64>,
}

impl CampaignPatch {
    pub fn status(status: CampaignStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Produce the merged record; the input is left untouched.
    pub fn apply(self, current: &Campaign) -> Campaign {
        let c = current.clone();
        Campaign {
            id: c.id,
            name: self.name.unwrap_or(c.name),
            campaign_type: self.campaign_type.unwrap_or(c.campaign_type),
            status: self.status.unwrap_or(c.status),
            strategy: self.strategy.unwrap_or(c.strategy),
            budget: self.budget.unwrap_or(c.budget),
            daily_budget: self.daily_budget.unwrap_or(c.daily_budget),
            start_date: self.start_date.unwrap_or(c.start_date),
            end_date: self.end_date.unwrap_or(c.end_date),
            region: self.region.unwrap_or(c.region),
            adjustments: self.adjustments.unwrap_or(c.adjustments),
            spend: self.spend.unwrap_or(c.spend),
            clicks: self.clicks.unwrap_or(c.clicks),
            impressions: self.impressions.unwrap_or(c.impressions),
            conversions: self.conversions.unwrap_or(c.conversions),
        }
    }
}

// ─── Ad groups & ads ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdGroup {
    pub id: EntityId,
    pub campaign_id: EntityId,
    pub name: String,
    pub status: CampaignStatus,
    pub bid: f64,
    pub ctr: f64,
    pub url: String,
    pub ads: Vec<Ad>,
}

/// Embedded in its ad group; not addressable on its own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ad {
    pub id: EntityId,
    pub name: String,
    pub status: CampaignStatus,
    pub bid: f64,
    pub ctr: f64,
    pub url: String,
}

// ─── Keywords ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Keyword {
    pub id: EntityId,
    pub campaign_id: EntityId,
    pub phrase: String,
    pub match_type: MatchType,
    pub bid: f64,
    pub status: CampaignStatus,
    pub impressions: u64,
    pub clicks: u64,
    /// Snapshot taken at creation; not recomputed when counters change.
    pub ctr: f64,
    pub negative: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchType {
    Exact,
    Phrase,
    Broad,
}

impl MatchType {
    pub const ALL: [MatchType; 3] = [MatchType::Exact, MatchType::Phrase, MatchType::Broad];
}

// ─── Metrics & reports ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricPoint {
    pub campaign_id: EntityId,
    pub date: NaiveDate,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub cost: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Desktop,
    Mobile,
    Tablet,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceShare {
    pub device: Device,
    /// Percentage of traffic; the three shares add up to 100.
    pub value: u32,
}

/// One-per-campaign financial summary kept in lockstep with its campaign.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportRow {
    pub campaign_id: EntityId,
    pub campaign: String,
    pub impressions: u64,
    pub clicks: u64,
    pub spend: f64,
    /// `spend / clicks` (0.0 when there are no clicks).
    pub cpc: f64,
    pub conversions: u64,
    /// `conversions * 3000 / spend` (0.0 when spend is zero).
    pub roi: f64,
}

impl ReportRow {
    pub fn from_campaign(campaign: &Campaign) -> Self {
        let cpc = if campaign.clicks > 0 {
            round2(campaign.spend / campaign.clicks as f64)
        } else {
            0.0
        };
        let roi = if campaign.spend > 0.0 {
            round2(campaign.conversions as f64 * CONVERSION_VALUE / campaign.spend)
        } else {
            0.0
        };
        Self {
            campaign_id: campaign.id,
            campaign: campaign.name.clone(),
            impressions: campaign.impressions,
            clicks: campaign.clicks,
            spend: campaign.spend,
            cpc,
            conversions: campaign.conversions,
            roi,
        }
    }
}

// ─── Logs ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub method: String,
    pub operation: String,
    pub status: LogStatus,
    pub http_code: u16,
    pub duration: u64,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    Success,
    Error,
}

/// Caller-supplied log fields; anything left `None` is filled with a
/// randomized default when the entry is appended.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogDraft {
    pub timestamp: Option<DateTime<Utc>>,
    pub method: Option<String>,
    pub operation: Option<String>,
    pub status: Option<LogStatus>,
    pub http_code: Option<u16>,
    pub duration: Option<u64>,
    pub message: Option<String>,
}

// ─── API quota & queue ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiSettings {
    pub token: String,
    pub client_id: String,
    pub api_usage: u64,
    pub api_limit: u64,
    /// Fraction of `api_limit` at which the queue auto-pauses.
    pub auto_pause_threshold: f64,
    pub parallel_streams: u32,
    pub delay_ms: u64,
    pub notifications: NotificationSettings,
    pub is_paused: bool,
}

impl ApiSettings {
    pub fn should_pause(&self) -> bool {
        self.api_usage as f64 >= self.api_limit as f64 * self.auto_pause_threshold
    }

    pub fn usage_ratio(&self) -> f64 {
        if self.api_limit > 0 {
            self.api_usage as f64 / self.api_limit as f64
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationSettings {
    pub limit: bool,
    pub errors: bool,
}

/// Partial settings update. `is_paused` is derived and cannot be patched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiSettingsPatch {
    pub token: Option<String>,
    pub client_id: Option<String>,
    pub api_usage: Option<u64>,
    pub api_limit: Option<u64>,
    pub auto_pause_threshold: Option<f64>,
    pub parallel_streams: Option<u32>,
    pub delay_ms: Option<u64>,
    pub notifications: Option<NotificationSettings>,
}

impl ApiSettingsPatch {
    pub fn apply(self, current: &ApiSettings) -> ApiSettings {
        let s = current.clone();
        ApiSettings {
            token: self.token.unwrap_or(s.token),
            client_id: self.client_id.unwrap_or(s.client_id),
            api_usage: self.api_usage.unwrap_or(s.api_usage),
            api_limit: self.api_limit.unwrap_or(s.api_limit),
            auto_pause_threshold: self.auto_pause_threshold.unwrap_or(s.auto_pause_threshold),
            parallel_streams: self.parallel_streams.unwrap_or(s.parallel_streams),
            delay_ms: self.delay_ms.unwrap_or(s.delay_ms),
            notifications: self.notifications.unwrap_or(s.notifications),
            is_paused: s.is_paused,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueueState {
    pub pending: u32,
    pub paused: bool,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct QueuePatch {
    pub pending: Option<u32>,
    pub paused: Option<bool>,
}

// ─── Scheduler, placements, extensions ─────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchedulerConfig {
    pub frequency: ReportFrequency,
    pub email: String,
    pub time: NaiveTime,
    pub last_run: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportFrequency {
    Daily,
    Weekly,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchedulerPatch {
    pub frequency: Option<ReportFrequency>,
    pub email: Option<String>,
    pub time: Option<NaiveTime>,
    /// `Some(None)` clears the last run.
    pub last_run: Option<Option<DateTime<Utc>>>,
}

impl SchedulerPatch {
    pub fn apply(self, current: &SchedulerConfig) -> SchedulerConfig {
        let s = current.clone();
        SchedulerConfig {
            frequency: self.frequency.unwrap_or(s.frequency),
            email: self.email.unwrap_or(s.email),
            time: self.time.unwrap_or(s.time),
            last_run: self.last_run.unwrap_or(s.last_run),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlacementOption {
    pub id: u64,
    pub name: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtensionItem {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: ExtensionKind,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionKind {
    Sitelink,
    Call,
    Image,
}

//! Seeded fixture generator for the dashboard document.
//!
//! A pure function of the seed and the reference time: the same inputs always
//! produce the same entity graph. Generation order is fixed (campaigns, ad
//! groups and ads, keywords, metrics, device split, report rows, static
//! settings, logs, queue) because every step draws from one stream.

use campaign_core::config::FixtureConfig;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::models::*;
use crate::random::{round2, SeededStream};

const CAMPAIGN_NAMES: [&str; 16] = [
    "Spring 2025",
    "Test campaign 1",
    "Summer sale",
    "Winter gifts",
    "Autumn in the city",
    "App launch",
    "November remarketing",
    "Landing page leads",
    "Smart campaign A",
    "Unified B2B",
    "New collection",
    "Brand support",
    "February promo",
    "Performance United",
    "Local impressions",
    "Service premiere",
];

const STRATEGIES: [&str; 5] = [
    "SERVING_OFF",
    "MAXIMUM_CLICKS",
    "AVERAGE_CPC",
    "HIGHEST_POSITION",
    "MANUAL_BIDS",
];

const REGIONS: [&str; 6] = [
    "Moscow region",
    "Saint Petersburg region",
    "Novosibirsk",
    "Yekaterinburg",
    "Russia (all regions)",
    "Kazan",
];

const ADJUSTMENTS: [&str; 5] = [
    "+25% on mobile",
    "+15% on weekends",
    "+35% for audience 25-34",
    "-20% on desktop",
    "+10% in the evening",
];

const KEYWORD_SEEDS: [&str; 10] = [
    "buy", "price", "discount", "order", "online", "delivery", "official", "promo", "reviews",
    "best",
];

pub(crate) const LOG_METHODS: [&str; 6] = ["get", "add", "update", "delete", "suspend", "resume"];

const LOG_OPERATIONS: [&str; 8] = [
    "Campaigns.add",
    "Campaigns.update",
    "Campaigns.delete",
    "Ads.get",
    "Bids.update",
    "Keywords.suspend",
    "Reports.schedule",
    "Clients.get",
];

const LOG_ERROR_CODES: [u16; 5] = [400, 401, 403, 429, 500];

const LOG_ERRORS: [&str; 4] = [
    "Points limit exceeded",
    "Invalid authorization token",
    "Service temporarily unavailable",
    "Request validation failed",
];

/// Monotonic id source shared by every entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdSequence {
    next: EntityId,
}

impl IdSequence {
    pub fn starting_at(next: EntityId) -> Self {
        Self { next: next.max(1) }
    }

    /// Return the current value, then advance.
    pub fn next_id(&mut self) -> EntityId {
        let id = self.next;
        self.next += 1;
        id
    }

    pub fn peek(&self) -> EntityId {
        self.next
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

/// The full initial entity graph handed to the store.
#[derive(Debug, Clone, Serialize)]
pub struct Fixtures {
    pub campaigns: Vec<Campaign>,
    pub ad_groups: Vec<AdGroup>,
    pub keywords: Vec<Keyword>,
    pub metrics: Vec<MetricPoint>,
    pub device_split: Vec<DeviceShare>,
    pub report_rows: Vec<ReportRow>,
    pub placements: Vec<PlacementOption>,
    pub extensions: Vec<ExtensionItem>,
    pub api_settings: ApiSettings,
    pub scheduler: SchedulerConfig,
    pub queue: QueueState,
    pub logs: Vec<LogEntry>,
    pub dashboard_dates: Vec<NaiveDate>,
}

impl Fixtures {
    /// Document with default settings and no entities.
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            campaigns: Vec::new(),
            ad_groups: Vec::new(),
            keywords: Vec::new(),
            metrics: Vec::new(),
            device_split: Vec::new(),
            report_rows: Vec::new(),
            placements: Vec::new(),
            extensions: Vec::new(),
            api_settings: default_api_settings(),
            scheduler: default_scheduler(now),
            queue: QueueState::default(),
            logs: Vec::new(),
            dashboard_dates: Vec::new(),
        }
    }

    pub fn generate(seed: u32, now: DateTime<Utc>, config: &FixtureConfig) -> Self {
        let mut random = SeededStream::new(seed);
        let mut ids = IdSequence::default();
        let today = now.date_naive();

        let campaigns: Vec<Campaign> = (0..CAMPAIGN_NAMES.len())
            .map(|index| build_campaign(index, ids.next_id(), today, &mut random))
            .collect();

        let ad_groups = build_ad_groups(&campaigns, &mut ids, &mut random);
        let keywords = build_keywords(&campaigns, &mut ids, &mut random);

        let dashboard_dates = metric_window(today, config.metric_days);
        let metrics = build_metrics(&campaigns, &dashboard_dates, &mut random);

        let device_split = build_device_split(&mut random);
        let report_rows = campaigns.iter().map(ReportRow::from_campaign).collect();

        let logs = (0..config.initial_logs)
            .map(|index| build_log_entry(index as u64 + 1, now, &mut random))
            .collect();

        let queue = QueueState {
            pending: random.round_between(5.0, 12.0) as u32,
            paused: false,
        };

        Self {
            campaigns,
            ad_groups,
            keywords,
            metrics,
            device_split,
            report_rows,
            placements: default_placements(),
            extensions: default_extensions(),
            api_settings: default_api_settings(),
            scheduler: default_scheduler(now),
            queue,
            logs,
            dashboard_dates,
        }
    }

    /// Highest id used by any campaign, ad group, ad or keyword.
    pub fn max_entity_id(&self) -> EntityId {
        let campaigns = self.campaigns.iter().map(|c| c.id);
        let groups = self
            .ad_groups
            .iter()
            .flat_map(|g| std::iter::once(g.id).chain(g.ads.iter().map(|ad| ad.id)));
        let keywords = self.keywords.iter().map(|k| k.id);
        campaigns.chain(groups).chain(keywords).max().unwrap_or(0)
    }
}

/// The `days` calendar days ending at `today`, oldest first. Days that fall
/// before the earliest representable date are skipped.
fn metric_window(today: NaiveDate, days: u32) -> Vec<NaiveDate> {
    let days = i64::from(days);
    (0..days)
        .filter_map(|offset| {
            Duration::try_days(days - 1 - offset).and_then(|back| today.checked_sub_signed(back))
        })
        .collect()
}

fn build_campaign(
    index: usize,
    id: EntityId,
    today: NaiveDate,
    random: &mut SeededStream,
) -> Campaign {
    let status = if index % 6 == 4 {
        CampaignStatus::Archived
    } else if index % 5 == 1 {
        CampaignStatus::Paused
    } else {
        CampaignStatus::Active
    };
    let start_date = today - Duration::days(45 - index as i64);
    let end_date = start_date + Duration::days(60 + (index as i64 % 5) * 5);

    let budget = 40_000.0 + index as f64 * 4_500.0 + random.round_between(0.0, 9_000.0) as f64;
    let spend = (budget * (0.42 + random.next_f64() * 0.4)).round();
    let clicks = ((spend / (32.0 + random.next_f64() * 18.0)).round() as u64).max(120);
    let impressions = clicks * random.round_between(9.0, 12.0);
    let conversions =
        ((clicks as f64 * (0.03 + random.next_f64() * 0.05)).round() as u64).max(8);

    let adjustments = (0..2 + index % 2)
        .filter_map(|_| random.pick_one(&ADJUSTMENTS))
        .map(|s| s.to_string())
        .collect();

    Campaign {
        id,
        name: CAMPAIGN_NAMES[index].to_string(),
        campaign_type: CampaignType::ALL[index % CampaignType::ALL.len()],
        status,
        strategy: STRATEGIES[index % STRATEGIES.len()].to_string(),
        budget,
        daily_budget: (budget / 30.0).round(),
        start_date,
        end_date,
        region: REGIONS[index % REGIONS.len()].to_string(),
        adjustments,
        spend,
        clicks,
        impressions,
        conversions,
    }
}

fn build_ad_groups(
    campaigns: &[Campaign],
    ids: &mut IdSequence,
    random: &mut SeededStream,
) -> Vec<AdGroup> {
    let mut groups = Vec::new();
    for (campaign_index, campaign) in campaigns.iter().enumerate() {
        for group_index in 0..5 + campaign_index % 4 {
            let id = ids.next_id();
            let ads_count = 2 + (group_index + campaign_index) % 2;
            let ads = (0..ads_count)
                .map(|ad_index| Ad {
                    id: ids.next_id(),
                    name: format!("Ad {}.{}", group_index + 1, ad_index + 1),
                    status: if group_index % 3 == 2 {
                        CampaignStatus::Paused
                    } else {
                        CampaignStatus::Active
                    },
                    bid: round2(3.5 + random.next_f64() * 2.5),
                    ctr: round2(3.0 + random.next_f64() * 4.0),
                    url: format!(
                        "https://example.com/{}/ad-{}-{}",
                        campaign.id,
                        group_index + 1,
                        ad_index + 1
                    ),
                })
                .collect();

            groups.push(AdGroup {
                id,
                campaign_id: campaign.id,
                name: format!("Group {}", group_index + 1),
                status: if group_index % 4 == 3 {
                    CampaignStatus::Paused
                } else {
                    CampaignStatus::Active
                },
                bid: round2(4.0 + random.next_f64() * 3.0),
                ctr: round2(4.0 + random.next_f64() * 3.0),
                url: format!("https://example.com/{}/group-{}", campaign.id, group_index + 1),
                ads,
            });
        }
    }
    groups
}

fn build_keywords(
    campaigns: &[Campaign],
    ids: &mut IdSequence,
    random: &mut SeededStream,
) -> Vec<Keyword> {
    let mut keywords = Vec::new();
    for (index, campaign) in campaigns.iter().enumerate() {
        for keyword_index in 0..6 + index % 5 {
            let seed_word = KEYWORD_SEEDS[(index + keyword_index) % KEYWORD_SEEDS.len()];
            let impressions = random.round_between(800.0, 1_500.0);
            let clicks = ((impressions as f64 * (0.06 + random.next_f64() * 0.04)).round()
                as u64)
                .max(25);
            let ctr = round2(clicks as f64 / impressions as f64 * 100.0);
            keywords.push(Keyword {
                id: ids.next_id(),
                campaign_id: campaign.id,
                phrase: format!("{} {}", seed_word, campaign.name.to_lowercase()),
                match_type: MatchType::ALL[(index + keyword_index) % MatchType::ALL.len()],
                bid: round2(2.0 + random.next_f64() * 3.0),
                status: if keyword_index % 5 == 4 {
                    CampaignStatus::Paused
                } else {
                    CampaignStatus::Active
                },
                impressions,
                clicks,
                ctr,
                negative: keyword_index % 7 == 0,
            });
        }
    }
    keywords
}

fn build_metrics(
    campaigns: &[Campaign],
    dates: &[NaiveDate],
    random: &mut SeededStream,
) -> Vec<MetricPoint> {
    let days = dates.len() as f64;
    let mut points = Vec::with_capacity(campaigns.len() * dates.len());
    for campaign in campaigns {
        let base = campaign.impressions as f64 / days;
        for date in dates {
            let impressions = (base * (0.7 + random.next_f64() * 0.6)).round() as u64;
            let clicks = ((impressions as f64 * (0.05 + random.next_f64() * 0.04)).round()
                as u64)
                .max(12);
            let conversions =
                ((clicks as f64 * (0.04 + random.next_f64() * 0.03)).round() as u64).max(1);
            let cost = round2(campaign.spend / days * (0.75 + random.next_f64() * 0.5));
            points.push(MetricPoint {
                campaign_id: campaign.id,
                date: *date,
                impressions,
                clicks,
                conversions,
                cost,
            });
        }
    }
    points
}

fn build_device_split(random: &mut SeededStream) -> Vec<DeviceShare> {
    let mobile = random.round_between(35.0, 30.0) as u32;
    let tablet = random.round_between(8.0, 12.0) as u32;
    vec![
        DeviceShare {
            device: Device::Desktop,
            value: 100 - mobile - tablet,
        },
        DeviceShare {
            device: Device::Mobile,
            value: mobile,
        },
        DeviceShare {
            device: Device::Tablet,
            value: tablet,
        },
    ]
}

fn build_log_entry(id: u64, now: DateTime<Utc>, random: &mut SeededStream) -> LogEntry {
    let success = random.next_f64() > 0.22;
    let http_code = if success {
        200
    } else {
        random.pick_one(&LOG_ERROR_CODES).copied().unwrap_or(500)
    };
    let age_ms = (random.next_f64() * 72.0 * 3_600_000.0) as i64;
    let method = random.pick_one(&LOG_METHODS).copied().unwrap_or("get");
    let operation = random.pick_one(&LOG_OPERATIONS).copied().unwrap_or("Clients.get");
    let duration = random.round_between(120.0, 750.0);
    let message = if success {
        "Completed successfully"
    } else {
        random.pick_one(&LOG_ERRORS).copied().unwrap_or(LOG_ERRORS[0])
    };

    LogEntry {
        id,
        timestamp: now - Duration::milliseconds(age_ms),
        method: method.to_string(),
        operation: operation.to_string(),
        status: if success {
            LogStatus::Success
        } else {
            LogStatus::Error
        },
        http_code,
        duration,
        message: message.to_string(),
    }
}

fn default_placements() -> Vec<PlacementOption> {
    [
        (1, "Search", true),
        (2, "Advertising network", true),
        (3, "Maps", true),
        (4, "Marketplace", false),
        (5, "Partner network", true),
        (6, "Video network", false),
    ]
    .into_iter()
    .map(|(id, name, enabled)| PlacementOption {
        id,
        name: name.to_string(),
        enabled,
    })
    .collect()
}

fn default_extensions() -> Vec<ExtensionItem> {
    [
        (1, ExtensionKind::Sitelink, "Quick link", "https://example.com/catalog"),
        (2, ExtensionKind::Call, "Phone", "+7 (495) 123-45-67"),
        (3, ExtensionKind::Image, "Image", "image_hero.jpg"),
        (4, ExtensionKind::Sitelink, "Payment and delivery", "https://example.com/delivery"),
    ]
    .into_iter()
    .map(|(id, kind, label, value)| ExtensionItem {
        id,
        kind,
        label: label.to_string(),
        value: value.to_string(),
    })
    .collect()
}

fn default_api_settings() -> ApiSettings {
    ApiSettings {
        token: "t1.demo.fake.token".to_string(),
        client_id: "12345-demo-client".to_string(),
        api_usage: 420,
        api_limit: 1000,
        auto_pause_threshold: 0.8,
        parallel_streams: 4,
        delay_ms: 250,
        notifications: NotificationSettings {
            limit: true,
            errors: true,
        },
        is_paused: false,
    }
}

fn default_scheduler(now: DateTime<Utc>) -> SchedulerConfig {
    SchedulerConfig {
        frequency: ReportFrequency::Daily,
        email: "reports@example.com".to_string(),
        time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
        last_run: Some(now - Duration::days(1)),
    }
}

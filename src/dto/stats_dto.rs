use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentScreening {
    pub name: String,
    pub position: String,
    pub score: Option<i32>,
    pub status_color: String,
    pub time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub processed_count: i64,
    pub qualified_count: i64,
    pub pending_count: i64,
    pub average_score: f64,
    pub weekly_change: f64,
    pub success_rate: i64,
    pub recent_screenings: Vec<RecentScreening>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub stats: DashboardStats,
}

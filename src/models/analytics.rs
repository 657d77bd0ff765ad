use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub pending_tasks: i64,
    pub completion_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusDistribution {
    pub status: String,
    pub count: i64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityBreakdown {
    pub priority: String,
    pub count: i64,
    pub completed: i64,
    pub pending: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionTrendPoint {
    pub date: String,
    pub completed: i64,
    pub created: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsResponse {
    pub workspace_id: String,
    pub summary: AnalyticsSummary,
    pub status_distribution: Vec<StatusDistribution>,
    pub priority_breakdown: Vec<PriorityBreakdown>,
    pub completion_trend: Vec<CompletionTrendPoint>,
    pub generated_at: String,
}

//! Dashboard counters for the admin back-office

use crate::error::Result;
use crate::resources::{Admission, AdmissionStatus, ContactMessage, NewsItem, NewsStatus};
use crate::services::ResourceService;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_admissions: usize,
    pub pending_admissions: usize,
    pub published_news: usize,
    pub unread_messages: usize,
}

#[derive(Clone)]
pub struct DashboardService {
    admissions: ResourceService<Admission>,
    news: ResourceService<NewsItem>,
    messages: ResourceService<ContactMessage>,
}

impl DashboardService {
    pub fn new(
        admissions: ResourceService<Admission>,
        news: ResourceService<NewsItem>,
        messages: ResourceService<ContactMessage>,
    ) -> Self {
        Self {
            admissions,
            news,
            messages,
        }
    }

    pub async fn stats(&self) -> Result<DashboardStats> {
        let admissions = self.admissions.list().await?;
        let news = self.news.list().await?;
        let messages = self.messages.list().await?;

        Ok(DashboardStats {
            total_admissions: admissions.len(),
            pending_admissions: admissions
                .iter()
                .filter(|a| a.status == AdmissionStatus::Pending)
                .count(),
            published_news: news
                .iter()
                .filter(|n| n.status == NewsStatus::Published)
                .count(),
            unread_messages: messages.iter().filter(|m| !m.read).count(),
        })
    }
}

//! Recent activity log
//!
//! The backend has no activity endpoint yet; the assignments view shows this
//! fixed sample.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Assigned,
    Added,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub key: String,
    pub kind: ActivityKind,
    pub item_id: String,
    pub customer_group: String,
    pub user_name: String,
    pub timestamp: String,
}

impl ActivityLog {
    /// One-line description, e.g. "Item IT002 assigned to 010 - RHCUST"
    pub fn summary(&self) -> String {
        match self.kind {
            ActivityKind::Assigned => format!("Item {} assigned to {}", self.item_id, self.customer_group),
            ActivityKind::Added => format!("New Item {} added to {}", self.item_id, self.customer_group),
            ActivityKind::Removed => format!("Removed Item {} from {}", self.item_id, self.customer_group),
        }
    }
}

fn entry(key: &str, kind: ActivityKind, item: &str, group: &str, user: &str, ts: &str) -> ActivityLog {
    ActivityLog {
        key: key.to_string(),
        kind,
        item_id: item.to_string(),
        customer_group: group.to_string(),
        user_name: user.to_string(),
        timestamp: ts.to_string(),
    }
}

pub fn sample_activity() -> Vec<ActivityLog> {
    vec![
        entry("1", ActivityKind::Assigned, "IT002", "010 - RHCUST", "jane.smith", "2023-05-15 14:30:05"),
        entry("2", ActivityKind::Added, "IT007", "016 - INT", "david.wilson", "2023-05-26 10:25:18"),
        entry("3", ActivityKind::Removed, "IT008", "011 - HSENT", "robert.johnson", "2023-05-24 09:15:33"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summaries() {
        let logs = sample_activity();
        assert_eq!(logs.len(), 3);
        assert_eq!(logs[0].summary(), "Item IT002 assigned to 010 - RHCUST");
        assert_eq!(logs[1].summary(), "New Item IT007 added to 016 - INT");
        assert_eq!(logs[2].summary(), "Removed Item IT008 from 011 - HSENT");
    }
}

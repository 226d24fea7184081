//! Output formatting - plain terminal tables and sections

use crate::theme::{customer_group_tag, environment_tag};
use dpw_common::activity::ActivityLog;
use dpw_common::classifier::ErrorInfo;
use dpw_common::item_assignment::{ItemAssignment, TABLE_COLUMNS};
use dpw_common::profile::UserProfile;
use dpw_common::table_search::Record;
use dpw_common::LoadedConfig;
use owo_colors::OwoColorize;

pub const THIN_SEPARATOR: &str = "----------------------------------------";

/// Column widths for `rows`, never narrower than the header
pub fn column_widths(rows: &[ItemAssignment]) -> Vec<usize> {
    TABLE_COLUMNS
        .iter()
        .map(|(field, header)| {
            rows.iter()
                .filter_map(|row| row.field(field).map(|v| v.chars().count()))
                .chain(std::iter::once(header.len()))
                .max()
                .unwrap_or(0)
        })
        .collect()
}

fn pad(text: &str, width: usize) -> String {
    format!("{:<width$}", text, width = width)
}

/// Table lines without colour; the first line is the header.
pub fn assignment_lines(rows: &[ItemAssignment]) -> Vec<String> {
    let widths = column_widths(rows);
    let mut lines = Vec::with_capacity(rows.len() + 1);

    let header: Vec<String> = TABLE_COLUMNS
        .iter()
        .zip(&widths)
        .map(|((_, title), w)| pad(title, *w))
        .collect();
    lines.push(header.join("  ").trim_end().to_string());

    for row in rows {
        let cells: Vec<String> = TABLE_COLUMNS
            .iter()
            .zip(&widths)
            .map(|((field, _), w)| pad(&row.field(field).unwrap_or_default(), *w))
            .collect();
        lines.push(cells.join("  ").trim_end().to_string());
    }

    lines
}

pub fn print_assignments(rows: &[ItemAssignment], showing: &str) {
    let widths = column_widths(rows);
    let lines = assignment_lines(rows);

    if let Some(header) = lines.first() {
        println!("{}", header.bold());
    }

    let group_index = TABLE_COLUMNS
        .iter()
        .position(|(field, _)| *field == "customerGroup")
        .unwrap_or(usize::MAX);

    for row in rows {
        let cells: Vec<String> = TABLE_COLUMNS
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, ((field, _), w))| {
                let cell = pad(&row.field(field).unwrap_or_default(), *w);
                if i == group_index {
                    customer_group_tag(&row.customer_group).paint(&cell)
                } else {
                    cell
                }
            })
            .collect();
        println!("{}", cells.join("  ").trim_end());
    }

    if rows.is_empty() {
        println!("{}", "No data".dimmed());
    }

    println!();
    println!("{}", showing.dimmed());
}

pub fn print_activity(logs: &[ActivityLog]) {
    println!();
    println!("[RECENT ACTIVITY]");
    for log in logs {
        println!(
            "  {}  {} {}",
            log.summary(),
            format!("by {}", log.user_name).dimmed(),
            log.timestamp.dimmed()
        );
    }
}

pub fn print_config(loaded: &LoadedConfig) {
    let config = &loaded.config;
    let env_tag = environment_tag(config.environment_kind()).paint(&config.environment.to_uppercase());

    println!("{}  {}", config.app_name.bold(), env_tag);
    println!("{}", THIN_SEPARATOR.dimmed());
    println!("[RUNTIME CONFIG]");
    println!("  Source:           {}", loaded.source);
    println!("  Environment:      {}", config.environment);
    println!("  API base URL:     {}", config.api_base_url);
    println!(
        "  Request timeout:  {} min",
        config.client_request_wait_time_minutes
    );
    println!(
        "  API retries:      {} (wait {}s)",
        config.http_settings.max_retry_count_for_api, config.http_settings.wait_time_in_secs_for_api_retry
    );
    if let Some(reason) = &loaded.fallback_reason {
        println!();
        println!("[WARNING] {}", "Using fallback configuration".yellow());
        println!("  {}", reason.dimmed());
    }
}

pub fn print_classification(info: &ErrorInfo) {
    println!("Category: {}", info.kind.to_string().bold());
    println!("Message:  {}", info.message);
    if let Some(cause) = &info.original_cause {
        println!("Cause:    {}", cause.to_string().dimmed());
    }
}

/// Role line under the user's name
pub fn role_label(profile: &UserProfile) -> &str {
    profile
        .job_title
        .as_deref()
        .or(profile.department.as_deref())
        .unwrap_or("Supplier Manager")
}

pub fn print_profile(profile: &UserProfile) {
    println!("{}", profile.display_name.bold());
    println!("  Role:  {}", role_label(profile));
    if let Some(department) = &profile.department {
        println!("  Dept:  {}", department);
    }
    println!("  Mail:  {}", profile.mail);
}

pub fn display_error(message: &str) {
    eprintln!();
    eprintln!("[ERROR] {}", message.red());
    eprintln!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, group: &str) -> ItemAssignment {
        ItemAssignment {
            key: id.into(),
            item_id: id.into(),
            item_name: format!("Item Name for {}", id),
            customer_group: group.into(),
            assigned_date: "1/1/2024, 12:00:00 AM".into(),
            last_modified_by: "alice".into(),
            assigned_at: None,
        }
    }

    #[test]
    fn test_header_only_for_empty_table() {
        let lines = assignment_lines(&[]);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("ITEM ID"));
        assert!(lines[0].ends_with("LAST MODIFIED BY"));
    }

    #[test]
    fn test_columns_align() {
        let rows = vec![row("X1", "C1 - CUST_NAME"), row("IT0000001", "010 - RHCUST")];
        let lines = assignment_lines(&rows);
        assert_eq!(lines.len(), 3);

        let name_col = lines[0].find("ITEM NAME").unwrap();
        assert_eq!(lines[1].find("Item Name for X1").unwrap(), name_col);
        assert_eq!(lines[2].find("Item Name for IT0000001").unwrap(), name_col);
    }

    #[test]
    fn test_role_fallbacks() {
        let mut profile = UserProfile {
            display_name: "Alice".into(),
            job_title: None,
            department: Some("Supply Chain".into()),
            mail: "alice@example.com".into(),
        };
        assert_eq!(role_label(&profile), "Supply Chain");
        profile.department = None;
        assert_eq!(role_label(&profile), "Supplier Manager");
        profile.job_title = Some("Planner".into());
        assert_eq!(role_label(&profile), "Planner");
    }
}

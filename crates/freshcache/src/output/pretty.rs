//! Pretty output formatting.

use freshcache_core::models::{Log, Plant, Task, Title};

use crate::repository::{RefreshOutcome, WriteOutcome};

/// Format a plant for display.
pub fn format_plant(plant: &Plant) -> String {
    let mut output = format!(
        "{} [{}]\n  ID: {}\n  Watering: every {} days",
        plant.name,
        plant.grow_zone(),
        plant.plant_id,
        plant.watering_interval
    );
    if !plant.description.is_empty() {
        output.push_str(&format!("\n  Description: {}", plant.description));
    }
    output
}

/// Format plants for display.
pub fn format_plants(plants: &[Plant]) -> String {
    if plants.is_empty() {
        return "No plants found.".to_string();
    }
    let mut output = format!("PLANTS ({})\n", plants.len());
    output.push_str(&"-".repeat(40));
    for plant in plants {
        output.push_str(&format!("\n{}", format_plant(plant)));
        output.push('\n');
    }
    output
}

pub fn format_title(title: Option<&Title>) -> String {
    match title {
        Some(title) => title.title.clone(),
        None => "No title yet.".to_string(),
    }
}

/// Format a task for display.
pub fn format_task(task: &Task) -> String {
    let mark = if task.is_completed { "x" } else { " " };
    let mut output = format!("[{}] {}\n  ID: {}", mark, task.title_for_list(), task.id);
    if !task.title.is_empty() && !task.description.is_empty() {
        output.push_str(&format!("\n  Description: {}", task.description));
    }
    output
}

/// Format tasks for display.
pub fn format_tasks(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks found.".to_string();
    }
    let mut output = format!("TASKS ({})\n", tasks.len());
    output.push_str(&"-".repeat(40));
    for task in tasks {
        output.push_str(&format!("\n{}", format_task(task)));
        output.push('\n');
    }
    output
}

/// Format logs for display, one per line.
pub fn format_logs(logs: &[Log]) -> String {
    if logs.is_empty() {
        return "No logs.".to_string();
    }
    logs.iter()
        .map(|log| format!("{} {}", log.timestamp.format("%Y-%m-%d %H:%M:%S"), log.msg))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_refresh(what: &str, outcome: RefreshOutcome) -> String {
    match outcome {
        RefreshOutcome::Fetched => format!("Refreshed {what}."),
        RefreshOutcome::Skipped => format!("{what} already fresh, skipped."),
    }
}

pub fn format_write(action: &str, outcome: &WriteOutcome) -> String {
    match outcome {
        WriteOutcome::Synced => format!("{action}."),
        WriteOutcome::LocalOnly(err) => format!("{action} locally; remote sync failed: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use freshcache_core::storage::RepositoryError;

    #[test]
    fn test_format_plants_empty() {
        assert_eq!(format_plants(&[]), "No plants found.");
    }

    #[test]
    fn test_format_plant_includes_zone() {
        let plant = Plant::new("rosa", "Rose", 9).with_description("Fragrant");

        let output = format_plant(&plant);

        assert!(output.starts_with("Rose [zone 9]"));
        assert!(output.contains("Description: Fragrant"));
    }

    #[test]
    fn test_format_task_uses_description_when_untitled() {
        let task = Task::new("", "Buy soil").completed();

        let output = format_task(&task);

        assert!(output.starts_with("[x] Buy soil"));
        assert!(!output.contains("Description"));
    }

    #[test]
    fn test_format_write_local_only() {
        let outcome = WriteOutcome::LocalOnly(RepositoryError::network("offline"));
        assert_eq!(
            format_write("Saved", &outcome),
            "Saved locally; remote sync failed: Network unavailable: offline"
        );
    }

    #[test]
    fn test_format_logs() {
        use chrono::{TimeZone, Utc};

        let at = Utc.with_ymd_and_hms(2024, 5, 2, 9, 30, 0).unwrap();
        let logs = vec![Log::new("Interaction with 'Button 1'", at)];

        assert_eq!(format_logs(&logs), "2024-05-02 09:30:00 Interaction with 'Button 1'");
        assert_eq!(format_logs(&[]), "No logs.");
    }

    #[test]
    fn test_format_refresh() {
        assert_eq!(format_refresh("plants", RefreshOutcome::Fetched), "Refreshed plants.");
    }
}

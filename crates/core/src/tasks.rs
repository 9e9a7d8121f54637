//! Terminal color management for task names

use colored::*;

/// Muted blues and purples, clear of the red/yellow/green used for status output
const PALETTE: [(u8, u8, u8); 6] = [
    (100, 149, 237),
    (123, 104, 238),
    (70, 180, 200),
    (186, 120, 220),
    (95, 158, 160),
    (176, 196, 222),
];

/// Get a consistent color for a task name
pub fn get_task_color(task_name: &str) -> Color {
    // Color by project so `frontend:test` and `frontend:analyze` share a color
    let key = task_name.rsplit_once(':').map_or(task_name, |(project, _)| project);
    let hash = key
        .bytes()
        .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));

    let (r, g, b) = PALETTE[(hash % PALETTE.len() as u64) as usize];
    Color::TrueColor { r, g, b }
}

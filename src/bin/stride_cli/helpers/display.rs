// ABOUTME: Output formatting helpers for stride-cli
// ABOUTME: Session summaries, the history table and the settings view
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

use stride_coach::formatters::{format_clock, format_pace_seconds};
use stride_coach::models::{RunnerSettings, Session};

/// Display a freshly saved session
pub fn display_session_summary(session: &Session) {
    println!("\nRun saved: {}", session.name);
    println!("{}", "=".repeat(50));
    println!("   Id:        {}", session.id);
    println!("   Distance:  {:.2} km", session.distance_km());
    println!("   Time:      {}", format_clock(session.moving_time_s));
    println!(
        "   Pace:      {} /km",
        format_pace_seconds(session.average_pace_sec_per_km)
    );
    println!("   Gain:      {:.0} m", session.elevation_gain_m);
    println!("   Points:    {}", session.path.len());

    if !session.splits.is_empty() {
        println!("\n   Splits:");
        for (index, seconds) in session.splits.iter().enumerate() {
            println!("     km {:>2}  {}", index + 1, format_clock(*seconds));
        }
    }
}

/// Display the session history table
pub fn display_sessions(sessions: &[Session]) {
    if sessions.is_empty() {
        println!("No saved sessions yet.");
        return;
    }

    println!(
        "{:<10} {:<24} {:>9} {:>9} {:>8} {:>7}",
        "ID", "NAME", "DISTANCE", "TIME", "PACE", "GAIN"
    );
    println!("{}", "-".repeat(72));
    for session in sessions {
        let id = session.id.to_string();
        println!(
            "{:<10} {:<24} {:>6.2} km {:>9} {:>8} {:>5.0} m",
            &id[..8],
            truncate(&session.name, 24),
            session.distance_km(),
            format_clock(session.moving_time_s),
            format_pace_seconds(session.average_pace_sec_per_km),
            session.elevation_gain_m,
        );
    }
}

/// Display runner settings
pub fn display_settings(settings: &RunnerSettings) {
    println!("Runner settings");
    println!("{}", "=".repeat(30));
    println!(
        "   Target pace:   {} /km",
        format_pace_seconds(f64::from(settings.target_pace_sec_per_km))
    );
    println!("   Auto-pause:    {}", on_off(settings.auto_pause));
    println!("   Voice cues:    {}", on_off(settings.voice_cues));
    println!("   Race distance: {:.1} km", settings.race_distance_km);
    match settings.race_date {
        Some(date) => println!("   Race date:     {date}"),
        None => println!("   Race date:     not set"),
    }
}

const fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_owned()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('~');
        cut
    }
}

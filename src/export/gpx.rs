// ABOUTME: GPX 1.1 document writer for finalized sessions
// ABOUTME: One trkpt per path entry with optional elevation and millisecond UTC time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

use std::fmt::Write as _;
use stride_core::models::Session;

const GPX_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="Stride" xmlns="http://www.topografix.com/GPX/1/1" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://www.topografix.com/GPX/1/1 http://www.topografix.com/GPX/1/1/gpx.xsd">
"#;

/// Render a session as a GPX 1.1 document
#[must_use]
pub fn to_gpx(session: &Session) -> String {
    let name = html_escape::encode_text(&session.name);
    let mut xml = String::with_capacity(GPX_HEADER.len() + 128 + session.path.len() * 128);
    xml.push_str(GPX_HEADER);
    let _ = writeln!(
        xml,
        "  <metadata>\n    <name>{name}</name>\n    <time>{}</time>\n  </metadata>",
        session.created_at.format("%Y-%m-%dT%H:%M:%S%.3fZ")
    );
    let _ = writeln!(xml, "  <trk>\n    <name>{name}</name>\n    <trkseg>");

    for point in &session.path {
        let _ = write!(xml, "      <trkpt lat=\"{}\" lon=\"{}\">", point.lat, point.lng);
        if let Some(ele) = point.altitude_m.filter(|e| e.is_finite()) {
            let _ = write!(xml, "<ele>{ele:.1}</ele>");
        }
        if let Some(time) = point.time() {
            let _ = write!(xml, "<time>{}</time>", time.format("%Y-%m-%dT%H:%M:%S%.3fZ"));
        }
        xml.push_str("</trkpt>\n");
    }

    xml.push_str("    </trkseg>\n  </trk>\n</gpx>\n");
    xml
}

/// File name for an exported session, whitespace runs replaced by `_`
#[must_use]
pub fn gpx_file_name(session: &Session) -> String {
    let stem = session
        .name
        .split_whitespace()
        .map(|part| part.replace(['/', '\\', ':'], "-"))
        .collect::<Vec<_>>()
        .join("_");
    if stem.is_empty() {
        format!("{}.gpx", session.id)
    } else {
        format!("{stem}.gpx")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use stride_core::models::GeoSample;
    use uuid::Uuid;

    fn session(name: &str) -> Session {
        Session {
            id: Uuid::nil(),
            name: name.to_owned(),
            distance_m: 12.0,
            moving_time_s: 5,
            average_pace_sec_per_km: 416.7,
            path: vec![
                GeoSample::new(48.1, 11.5, 1_700_000_000_000).with_altitude(520.04),
                GeoSample::new(48.1001, 11.5, 1_700_000_005_250),
            ],
            splits: Vec::new(),
            elevation_gain_m: 0.0,
            goal: None,
            created_at: Utc.timestamp_millis_opt(1_700_000_010_000).single().unwrap_or_default(),
        }
    }

    #[test]
    fn test_track_points_and_optional_elevation() {
        let xml = to_gpx(&session("Run"));
        assert!(xml.contains(
            "<trkpt lat=\"48.1\" lon=\"11.5\"><ele>520.0</ele><time>2023-11-14T22:13:20.000Z</time></trkpt>"
        ));
        assert!(xml.contains(
            "<trkpt lat=\"48.1001\" lon=\"11.5\"><time>2023-11-14T22:13:25.250Z</time></trkpt>"
        ));
    }

    #[test]
    fn test_name_is_escaped() {
        let xml = to_gpx(&session("Hills & <tempo>"));
        assert!(xml.contains("<name>Hills &amp; &lt;tempo&gt;</name>"));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(gpx_file_name(&session("Run 2025-03-01  07:15")), "Run_2025-03-01_07-15.gpx");
        assert_eq!(
            gpx_file_name(&session("   ")),
            "00000000-0000-0000-0000-000000000000.gpx"
        );
    }
}

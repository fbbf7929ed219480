//! Terminal-style SVG badge.
//!
//! `render` refuses records whose text cannot be carried by XML (control
//! characters survive neither escaping nor character references). Callers
//! turn that refusal, or any fault upstream of rendering, into the diagnostic
//! panel from `render_diagnostic`, which sanitizes everything it embeds and
//! therefore cannot fail.

use std::fmt::Write;

use profstat_core::error::{ProfstatError, Result};
use profstat_core::text::{is_xml_char_safe, sanitize_xml_chars, truncate_chars, xml_escape};
use profstat_core::StatsRecord;

const ERROR_MESSAGE_CHARS: usize = 60;

/// Where in the badge pipeline a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeStep {
    GettingStats,
    GeneratingSvg,
}

impl BadgeStep {
    pub fn as_str(self) -> &'static str {
        match self {
            BadgeStep::GettingStats => "getting stats data",
            BadgeStep::GeneratingSvg => "generating SVG",
        }
    }
}

/// Request facts shown on the diagnostic panel.
#[derive(Debug, Clone, Default)]
pub struct RequestInfo {
    pub host: Option<String>,
    pub protocol: String,
}

fn checked<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    if is_xml_char_safe(value) {
        Ok(value)
    } else {
        Err(ProfstatError::Render(format!(
            "{field} contains characters that cannot be embedded in SVG"
        )))
    }
}

/// Render the badge for a record.
pub fn render(record: &StatsRecord) -> Result<String> {
    let username = xml_escape(checked("username", &record.username)?);
    let location = xml_escape(checked("location", &record.location)?);
    let description = xml_escape(checked("weather.description", &record.weather.description)?);
    checked("weather.icon", &record.weather.icon)?;

    let visits = record.visits.to_string();
    let cursor_x = 120 + visits.len() * 8;
    let temp = record.weather.temp;

    let mut svg = String::with_capacity(2048);
    write!(
        svg,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="350" height="80">
  <defs>
    <style>
      .terminal-bg {{ fill: #000000; }}
      .terminal-border {{ fill: none; stroke: #00ff00; stroke-width: 2; }}
      .terminal-text {{ fill: #00ff00; font-family: 'Courier New', monospace; font-size: 11px; font-weight: bold; }}
      .username-text {{ fill: #00ff00; font-family: 'Courier New', monospace; font-size: 9px; font-weight: normal; }}
      .count-text {{ fill: #00ff41; font-family: 'Courier New', monospace; font-size: 13px; font-weight: bold; }}
      .weather-text {{ fill: #00ffff; font-family: 'Courier New', monospace; font-size: 10px; }}
      .cursor {{ fill: #00ff00; animation: blink 1s infinite; }}
      @keyframes blink {{
        0%, 50% {{ opacity: 1; }}
        51%, 100% {{ opacity: 0; }}
      }}
    </style>
  </defs>

  <rect width="350" height="80" class="terminal-bg"/>
  <rect x="2" y="2" width="346" height="76" class="terminal-border"/>
  <rect x="4" y="4" width="342" height="14" fill="#001100"/>
  <text x="8" y="14" class="username-text">[root@github ~]$ ./profile_stats.sh</text>

  <text x="8" y="32" class="terminal-text">&gt; User: {username}</text>
  <text x="8" y="47" class="terminal-text">&gt; Visits: </text>
  <text x="78" y="47" class="count-text">{visits}</text>

  <text x="8" y="62" class="weather-text">&gt; {location}: {temp}°C {description}</text>

  <rect x="{cursor_x}" y="36" width="6" height="12" class="cursor"/>

  <text x="300" y="14" class="username-text" opacity="0.3">01</text>
  <text x="320" y="32" class="username-text" opacity="0.2">10</text>
  <text x="310" y="47" class="username-text" opacity="0.2">11</text>
  <text x="325" y="62" class="username-text" opacity="0.1">01</text>
</svg>"##
    )
    .map_err(|e| ProfstatError::Render(format!("format badge: {e}")))?;

    Ok(svg)
}

fn embed(s: &str) -> String {
    xml_escape(&sanitize_xml_chars(s))
}

/// Diagnostic panel shown in place of the badge. Always valid markup.
pub fn render_diagnostic(step: BadgeStep, req: &RequestInfo, error: &str) -> String {
    let host = embed(req.host.as_deref().unwrap_or("undefined"));
    let protocol = embed(&req.protocol);
    let error = embed(truncate_chars(error, ERROR_MESSAGE_CHARS));
    let step = step.as_str();

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="400" height="120">
  <defs>
    <style>
      .terminal-bg {{ fill: #000000; }}
      .terminal-border {{ fill: none; stroke: #ff3300; stroke-width: 2; }}
      .error-text {{ fill: #ff3300; font-family: 'Courier New', monospace; font-size: 9px; font-weight: bold; }}
      .debug-text {{ fill: #ffaa00; font-family: 'Courier New', monospace; font-size: 8px; }}
    </style>
  </defs>

  <rect width="400" height="120" class="terminal-bg"/>
  <rect x="2" y="2" width="396" height="116" class="terminal-border"/>

  <text x="8" y="15" class="error-text">⚠ DEBUG INFO</text>
  <text x="8" y="28" class="debug-text">Step: {step}</text>
  <text x="8" y="40" class="debug-text">Host: {host}</text>
  <text x="8" y="52" class="debug-text">Protocol: {protocol}</text>
  <text x="8" y="76" class="error-text">Error: {error}...</text>
  <text x="8" y="108" class="debug-text">Check server logs for full details</text>
</svg>"##
    )
}

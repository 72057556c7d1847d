//! Best-effort progress extraction from tool output.
//!
//! Both parsers return `None` for anything they do not recognise. Progress is
//! purely informational; a tool whose output format changes still runs to
//! completion, it just reports nothing.

/// Parse a `makemkvcon -r` progress line.
///
/// Robot-mode output reports `PRGV:current,total,max`, where `total` counts
/// toward `max` for the whole operation.
///
/// ```
/// use ripsort_av::progress::parse_makemkv;
///
/// assert_eq!(parse_makemkv("PRGV:120,32768,65536"), Some(50.0));
/// assert_eq!(parse_makemkv("MSG:5036,0,1,\"Copy complete.\""), None);
/// ```
pub fn parse_makemkv(line: &str) -> Option<f32> {
    let values = line.trim().strip_prefix("PRGV:")?;
    let mut parts = values.split(',').map(|p| p.trim().parse::<u64>());

    let _current = parts.next()?.ok()?;
    let total = parts.next()?.ok()?;
    let max = parts.next()?.ok()?;

    if max == 0 {
        return None;
    }

    Some(((total as f64 / max as f64) * 100.0).clamp(0.0, 100.0) as f32)
}

/// Parse a HandBrakeCLI encoding status line.
///
/// ```
/// use ripsort_av::progress::parse_handbrake;
///
/// let line = "Encoding: task 1 of 1, 45.67 % (87.02 fps, avg 90.12 fps, ETA 00h12m34s)";
/// assert_eq!(parse_handbrake(line), Some(45.67));
/// ```
pub fn parse_handbrake(line: &str) -> Option<f32> {
    let start = line.find("Encoding:")?;
    let rest = &line[start + "Encoding:".len()..];
    let pct = rest.find('%')?;

    let number = rest[..pct]
        .trim_end()
        .rsplit([' ', ','])
        .next()?
        .parse::<f32>()
        .ok()?;

    if number.is_finite() {
        Some(number.clamp(0.0, 100.0))
    } else {
        None
    }
}

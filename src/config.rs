//! User configuration: `~/.config/iwtui/config`.
//!
//! A flat file of whitespace-separated keyword/value lines. Recognized
//! keywords either set a theme color (hex `#rrggbb` or `#rrggbbaa`) or
//! request a font (`font <name...>, <size>`), resolved to a file through
//! fc-match. Unknown keywords or malformed values abort startup with a
//! line-numbered diagnostic; a missing file is not an error.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use ratatui::style::Color;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{WmError, WmResult};
use crate::ui::theme::Theme;

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub font: Option<FontRequest>,
}

/// A `font` directive from the config. The terminal draws its own glyphs,
/// so the resolved path is recorded and logged but never loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct FontRequest {
    pub name: String,
    pub size: f32,
    pub path: Option<PathBuf>,
    line: usize,
}

/// Standard config file location.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("iwtui")
        .join("config")
}

pub async fn load(path: &Path) -> WmResult<Config> {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(_) => {
            info!("no config file at {}, using defaults", path.display());
            return Ok(Config::default());
        }
    };

    let mut config = parse(&source)?;

    if let Some(font) = &mut config.font {
        let resolved = resolve_font(&font.name).await;
        if resolved.is_empty() {
            return Err(WmError::config(
                font.line,
                format!("could not find font '{}'", font.name),
            ));
        }
        debug!(font = %font.name, file = %resolved, "font request resolved");
        font.path = Some(PathBuf::from(resolved));
    }

    Ok(config)
}

/// Parse config text into a `Config`. Pure; font resolution happens in
/// `load`.
pub fn parse(source: &str) -> WmResult<Config> {
    let mut config = Config::default();

    for (idx, raw) in source.lines().enumerate() {
        let line = idx + 1;
        let words: Vec<&str> = raw.split_whitespace().collect();

        let Some(&keyword) = words.first() else {
            continue;
        };
        if keyword.starts_with('#') {
            continue;
        }

        if color_slot(&mut config.theme, keyword).is_some() {
            if words.len() != 2 {
                return Err(WmError::config(line, format!("usage: {keyword} <color>")));
            }
            let color = parse_hex_color(words[1]).ok_or_else(|| {
                WmError::config(
                    line,
                    "specify color as hex string '#xxxxxx' or '#xxxxxxxx'",
                )
            })?;
            *color_slot(&mut config.theme, keyword).unwrap() = color;
        } else if keyword == "font" {
            config.font = Some(parse_font_request(&words, line)?);
        } else {
            return Err(WmError::config(line, format!("unknown keyword '{keyword}'")));
        }
    }

    Ok(config)
}

/// Map a config keyword to its theme slot.
fn color_slot<'a>(theme: &'a mut Theme, keyword: &str) -> Option<&'a mut Color> {
    Some(match keyword {
        "background" => &mut theme.background,
        "foreground" => &mut theme.foreground,
        "dim" => &mut theme.dim,
        "border" => &mut theme.border,
        "accent" => &mut theme.accent,
        "selectable" => &mut theme.selectable,
        "selectable_active" => &mut theme.selectable_active,
        "connected" => &mut theme.connected,
        "warning" => &mut theme.warning,
        "error" => &mut theme.error,
        "popup_background" => &mut theme.popup_background,
        _ => return None,
    })
}

/// `font <name...>, <size>` — the name may span several words and must end
/// with a comma before the size.
fn parse_font_request(words: &[&str], line: usize) -> WmResult<FontRequest> {
    let usage = || WmError::config(line, "usage: font <font name>, <size>");

    if words.len() < 3 {
        return Err(usage());
    }
    let name_words = &words[1..words.len() - 1];
    if !name_words.last().is_some_and(|w| w.ends_with(',')) {
        return Err(usage());
    }

    let mut name = name_words.join(" ");
    name.pop(); // trailing comma

    let size: f32 = words
        .last()
        .unwrap()
        .parse()
        .map_err(|_| WmError::config(line, "font size not a number"))?;

    Ok(FontRequest {
        name,
        size,
        path: None,
        line,
    })
}

/// Hex color: `#rrggbb` or `#rrggbbaa`. Terminal cells carry no alpha, so
/// the alpha byte is validated and dropped.
pub fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 && hex.len() != 8 {
        return None;
    }
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// Ask fontconfig for the file behind a font name. Mirrors the behavior of
/// the desktop original: on any failure the name itself is returned so the
/// caller's empty-check still works.
async fn resolve_font(name: &str) -> String {
    let output = Command::new("fc-match")
        .arg("--format=%{file}")
        .arg(name)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .await;

    match output {
        Ok(out) if out.status.success() => {
            String::from_utf8_lossy(&out.stdout).trim().to_string()
        }
        _ => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_comment_lines_are_skipped() {
        let config = parse("\n# a comment\n\n  # indented comment\n").unwrap();
        assert_eq!(config.theme, Theme::default());
        assert!(config.font.is_none());
    }

    #[test]
    fn colors_set_their_theme_slot() {
        let config = parse("background #102030\naccent #ff00ff\n").unwrap();
        assert_eq!(config.theme.background, Color::Rgb(0x10, 0x20, 0x30));
        assert_eq!(config.theme.accent, Color::Rgb(0xff, 0x00, 0xff));
        assert_eq!(config.theme.border, Theme::default().border);
    }

    #[test]
    fn alpha_component_is_accepted_and_dropped() {
        let config = parse("background #10203080\n").unwrap();
        assert_eq!(config.theme.background, Color::Rgb(0x10, 0x20, 0x30));
    }

    #[test]
    fn bad_color_reports_its_line() {
        let err = parse("accent #ff00ff\nborder notacolor\n").unwrap_err();
        let WmError::Config { line, .. } = err else {
            panic!("expected config error");
        };
        assert_eq!(line, 2);
    }

    #[test]
    fn unknown_keyword_aborts() {
        let err = parse("frobnicate on\n").unwrap_err();
        let WmError::Config { line, message } = err else {
            panic!("expected config error");
        };
        assert_eq!(line, 1);
        assert!(message.contains("frobnicate"));
    }

    #[test]
    fn color_keyword_arity_is_checked() {
        assert!(parse("accent\n").is_err());
        assert!(parse("accent #ffffff extra\n").is_err());
    }

    #[test]
    fn font_request_with_multiword_name() {
        let config = parse("font DejaVu Sans Mono, 14\n").unwrap();
        let font = config.font.unwrap();
        assert_eq!(font.name, "DejaVu Sans Mono");
        assert_eq!(font.size, 14.0);
        assert!(font.path.is_none());
    }

    #[test]
    fn font_request_requires_comma_and_numeric_size() {
        assert!(parse("font DejaVu 14\n").is_err());
        assert!(parse("font DejaVu, big\n").is_err());
        assert!(parse("font\n").is_err());
    }

    #[test]
    fn hex_color_forms() {
        assert_eq!(parse_hex_color("#000000"), Some(Color::Rgb(0, 0, 0)));
        assert_eq!(
            parse_hex_color("#ffffffff"),
            Some(Color::Rgb(0xff, 0xff, 0xff))
        );
        assert_eq!(parse_hex_color("ffffff"), None);
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#gggggg"), None);
    }
}

//! Fixed-width parsing of iwctl's tabular output.
//!
//! iwctl prints human-readable tables: a decorated title, a separator, a
//! header row with column labels, another separator, then padded data rows.
//! Column positions are not documented anywhere, so the only stable anchor
//! is the header row itself: each field starts at the byte offset where its
//! label appears and runs for a fixed allotted width, right-padded with
//! spaces.

use crate::error::{WmError, WmResult};

/// Number of preamble lines before data rows (title, rule, header, rule).
const HEADER_LINES: usize = 4;

/// Index of the line carrying the column labels.
const LABEL_LINE: usize = 2;

/// One recognized column: its header label and allotted width in bytes.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub label: &'static str,
    pub width: usize,
}

impl Column {
    pub const fn new(label: &'static str, width: usize) -> Self {
        Self { label, width }
    }
}

/// A parsed data row: the extracted fields, one per requested column, and
/// whether the row carried the "current" sentinel (`>`) in its margin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub fields: Vec<String>,
    pub marked: bool,
}

impl Row {
    pub fn field(&self, idx: usize) -> &str {
        self.fields.get(idx).map(String::as_str).unwrap_or("")
    }
}

/// Strip ANSI escape sequences. iwctl colors its output unconditionally and
/// the color codes would shift every column offset.
pub fn strip_ansi(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
            continue;
        }
        // CSI sequence: ESC [ parameters final-byte
        if let Some('[') = chars.clone().next() {
            chars.next();
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
        }
    }
    out
}

/// Parse one iwctl table.
///
/// Fails when the preamble is shorter than expected or any requested label
/// is missing from the header row; a failed parse never yields partial rows.
pub fn parse(output: &str, columns: &[Column]) -> WmResult<Vec<Row>> {
    let lines: Vec<&str> = output.lines().collect();
    if lines.len() < HEADER_LINES {
        return Err(WmError::Parse(format!(
            "expected at least {HEADER_LINES} header lines, got {}",
            lines.len()
        )));
    }

    let header = lines[LABEL_LINE];
    let offsets: Vec<usize> = columns
        .iter()
        .map(|col| {
            header.find(col.label).ok_or_else(|| {
                WmError::Parse(format!("column \"{}\" missing from header", col.label))
            })
        })
        .collect::<WmResult<_>>()?;

    let margin = offsets.iter().copied().min().unwrap_or(0);

    let mut rows = Vec::new();
    for line in &lines[HEADER_LINES..] {
        // Padded blank lines act as separators, not entries
        if line.trim().is_empty() {
            continue;
        }

        let marked = line.as_bytes()[..margin.min(line.len())].contains(&b'>');

        let fields = columns
            .iter()
            .zip(&offsets)
            .map(|(col, &offset)| slice_field(line, offset, col.width))
            .collect();

        rows.push(Row { fields, marked });
    }

    Ok(rows)
}

/// Extract the field starting at `offset` over `width` bytes: trailing
/// spaces stripped, leading spaces inside the field preserved.
fn slice_field(line: &str, offset: usize, width: usize) -> String {
    let bytes = line.as_bytes();
    if offset >= bytes.len() {
        return String::new();
    }
    let end = (offset + width).min(bytes.len());
    String::from_utf8_lossy(&bytes[offset..end])
        .trim_end_matches(' ')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device_table(rows: &[[&str; 5]]) -> String {
        let mut out = String::from("                Devices\n");
        out.push_str(&"-".repeat(70));
        out.push('\n');
        out.push_str(&format!(
            "  {:<20}{:<20}{:<8}{:<8}{:<8}\n",
            "Name", "Address", "Powered", "Adapter", "Mode"
        ));
        out.push_str(&"-".repeat(70));
        out.push('\n');
        for (i, r) in rows.iter().enumerate() {
            if i > 0 {
                out.push('\n'); // padded separator between rows
            }
            out.push_str(&format!(
                "  {:<20}{:<20}{:<8}{:<8}{:<8}\n",
                r[0], r[1], r[2], r[3], r[4]
            ));
        }
        out
    }

    fn network_table(rows: &[(bool, &str, &str)]) -> String {
        let mut out = String::from("                Available networks\n");
        out.push_str(&"-".repeat(70));
        out.push('\n');
        out.push_str(&format!(
            "      {:<32}{:<16}{}\n",
            "Network name", "Security", "Signal"
        ));
        out.push_str(&"-".repeat(70));
        out.push('\n');
        for &(marked, ssid, security) in rows {
            let margin = if marked { "  >   " } else { "      " };
            out.push_str(&format!("{margin}{ssid:<32}{security:<16}****\n"));
        }
        out
    }

    fn device_columns() -> Vec<Column> {
        vec![
            Column::new("Name", 20),
            Column::new("Address", 20),
            Column::new("Powered", 8),
            Column::new("Adapter", 8),
            Column::new("Mode", 8),
        ]
    }

    fn network_columns() -> Vec<Column> {
        vec![Column::new("Network name", 32), Column::new("Security", 16)]
    }

    #[test]
    fn parses_device_rows_and_skips_separators() {
        let out = device_table(&[
            ["wlan0", "aa:bb:cc:dd:ee:ff", "on", "phy0", "station"],
            ["wlan1", "11:22:33:44:55:66", "off", "phy1", "station"],
        ]);
        let rows = parse(&out, &device_columns()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].field(0), "wlan0");
        assert_eq!(rows[0].field(1), "aa:bb:cc:dd:ee:ff");
        assert_eq!(rows[0].field(2), "on");
        assert_eq!(rows[1].field(0), "wlan1");
        assert_eq!(rows[1].field(2), "off");
        assert_eq!(rows[1].field(4), "station");
    }

    #[test]
    fn detects_connected_sentinel_in_margin() {
        let out = network_table(&[
            (true, "MyHome_1", "psk"),
            (false, "coffee shop guest", ""),
            (false, "Corp Net", "8021x"),
        ]);
        let rows = parse(&out, &network_columns()).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].marked);
        assert!(!rows[1].marked);
        assert!(!rows[2].marked);
        assert_eq!(rows[0].field(0), "MyHome_1");
        assert_eq!(rows[0].field(1), "psk");
        assert_eq!(rows[2].field(1), "8021x");
    }

    #[test]
    fn field_keeps_interior_spaces_and_trims_trailing() {
        let out = network_table(&[(false, "coffee shop guest", "")]);
        let rows = parse(&out, &network_columns()).unwrap();
        // Interior spaces are data; an empty security column is an open network
        assert_eq!(rows[0].field(0), "coffee shop guest");
        assert_eq!(rows[0].field(1), "");
    }

    #[test]
    fn missing_label_fails_whole_parse() {
        let out = device_table(&[["wlan0", "aa:bb:cc:dd:ee:ff", "on", "phy0", "station"]]);
        let cols = [Column::new("Frequency", 10)];
        let err = parse(&out, &cols).unwrap_err();
        assert!(matches!(err, WmError::Parse(_)));
    }

    #[test]
    fn truncated_output_fails() {
        assert!(parse("Devices\n----\n", &device_columns()).is_err());
    }

    #[test]
    fn strip_ansi_removes_color_codes() {
        let colored = "\x1b[1;90m  Name\x1b[0m                  Address";
        assert_eq!(strip_ansi(colored), "  Name                  Address");
    }

    #[test]
    fn non_ascii_ssids_survive_extraction() {
        let out = network_table(&[(false, "Café WiFi", "psk")]);
        let rows = parse(&out, &network_columns()).unwrap();
        assert_eq!(rows[0].field(0), "Café WiFi");
    }
}

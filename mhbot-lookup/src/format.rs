use serde::{Deserialize, Deserializer};

/// Rows kept when a result is not rendered in full.
pub const TOP_ROWS: usize = 10;
/// Widest a text column may get before it is truncated.
const MAX_TEXT_COLUMN: usize = 20;

/// One attraction row for a creature.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct MouseRow {
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub cheese: String,
    /// Attraction rate in hundredths of a percent (`1234` is 12.34%).
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rate: f64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total_hunts: u64,
}

/// One drop row for an item.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct LootRow {
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub cheese: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total_catches: u64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_drops: f64,
}

impl LootRow {
    pub fn per_catch(&self) -> f64 {
        if self.total_catches == 0 {
            0.0
        } else {
            self.total_drops / self.total_catches as f64
        }
    }
}

/// Render creature attraction rows, highest rate first.
pub fn render_mouse_rows(name: &str, timefilter: &str, rows: &[MouseRow], full: bool) -> String {
    if rows.is_empty() {
        return format!("No attraction data for {name} ({timefilter})");
    }

    let mut sorted: Vec<&MouseRow> = rows.iter().collect();
    sorted.sort_by(|left, right| right.rate.total_cmp(&left.rate));

    let body = sorted
        .into_iter()
        .take(row_limit(full))
        .map(|row| {
            [
                row.location.clone(),
                stage_label(row.stage.as_deref()),
                row.cheese.clone(),
                format!("{:.2}%", row.rate / 100.0),
                row.total_hunts.to_string(),
            ]
        })
        .collect::<Vec<_>>();

    render_table(
        &format!("{name} ({timefilter})"),
        ["Location", "Stage", "Cheese", "Rate", "Hunts"],
        &body,
    )
}

/// Render item drop rows, best drop rate first.
pub fn render_loot_rows(name: &str, timefilter: &str, rows: &[LootRow], full: bool) -> String {
    if rows.is_empty() {
        return format!("No drop data for {name} ({timefilter})");
    }

    let mut sorted: Vec<&LootRow> = rows.iter().collect();
    sorted.sort_by(|left, right| right.per_catch().total_cmp(&left.per_catch()));

    let body = sorted
        .into_iter()
        .take(row_limit(full))
        .map(|row| {
            [
                row.location.clone(),
                stage_label(row.stage.as_deref()),
                row.cheese.clone(),
                format!("{:.3}", row.per_catch()),
                row.total_catches.to_string(),
            ]
        })
        .collect::<Vec<_>>();

    render_table(
        &format!("{name} ({timefilter})"),
        ["Location", "Stage", "Cheese", "Per catch", "Catches"],
        &body,
    )
}

fn row_limit(full: bool) -> usize {
    if full { usize::MAX } else { TOP_ROWS }
}

fn stage_label(stage: Option<&str>) -> String {
    match stage.map(str::trim) {
        Some(stage) if !stage.is_empty() => stage.to_owned(),
        _ => "-".to_owned(),
    }
}

/// Three left-aligned text columns followed by two right-aligned numeric ones.
fn render_table(title: &str, headers: [&str; 5], rows: &[[String; 5]]) -> String {
    let cells: Vec<[String; 5]> = rows
        .iter()
        .map(|row| row.clone().map(|cell| truncate(&cell, MAX_TEXT_COLUMN)))
        .collect();

    let mut widths = headers.map(|header| header.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |row: [&str; 5]| {
        let mut out = String::new();
        for (index, cell) in row.iter().enumerate() {
            if index > 0 {
                out.push_str(" | ");
            }
            let width = widths[index];
            if index < 3 {
                out.push_str(&format!("{cell:<width$}"));
            } else {
                out.push_str(&format!("{cell:>width$}"));
            }
        }
        out.trim_end().to_owned()
    };

    let header_line = line(headers);
    let rule = "-".repeat(header_line.chars().count());

    let mut out = vec![title.to_owned(), header_line, rule];
    for row in &cells {
        out.push(line([&row[0], &row[1], &row[2], &row[3], &row[4]]));
    }

    out.join("\n")
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_owned();
    }
    let kept: String = value.chars().take(max_chars.saturating_sub(2)).collect();
    format!("{kept}..")
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(serde_json::Number),
    Text(String),
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumberOrString>::deserialize(deserializer)? {
        Some(NumberOrString::Number(number)) => number.as_f64().unwrap_or_default(),
        Some(NumberOrString::Text(text)) => text.trim().parse().unwrap_or_default(),
        None => 0.0,
    })
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_f64(deserializer)?.max(0.0) as u64)
}

//! Heatmap rendering: diverging color scale and a Plotly.js HTML page.
//!
//! The figure is built as plain serializable structs and handed to
//! `Plotly.newPlot` in the browser, so nothing here depends on a plotting
//! runtime.
//!
//! The chart keeps the orientation of [`HeatmapMatrix`](crate::models::HeatmapMatrix):
//! one row per zone down the y axis, labelled with its spread, and the hours
//! across the x axis. Transposing it back (zones on x, hours on a reversed
//! y axis) only means swapping the two axes and transposing `z` and `text`.
//! No corner annotation or watermark is drawn.

use serde::Serialize;

use crate::error::Result;
use crate::models::{FailureKind, Heatmap};

pub const GREEN: &str = "rgb(106,168,79)";
pub const NEUTRAL: &str = "rgb(225,237,219)";
pub const RED: &str = "rgb(204,0,0)";

pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const FONT_FAMILY: &str = "Arial";
const FONT_SIZE: f64 = 18.0;
const FONT_COLOR: &str = "black";

/// Turns a [`Heatmap`] into a displayable document.
pub trait Renderer {
    fn render(&self, heatmap: &Heatmap) -> Result<String>;
}

// ---------------------------------------------------------------------------
// Color scale
// ---------------------------------------------------------------------------

/// Position of the neutral color on a `[zmin, zmax]` scale.
///
/// Zero sits at the neutral stop when the range straddles it; an all-positive
/// range starts neutral-to-red, an all-negative range is green-to-neutral.
pub fn neutral_stop(zmin: f64, zmax: f64) -> f64 {
    if zmin < 0.0 && zmax > 0.0 {
        zmin.abs() / (zmin.abs() + zmax)
    } else if zmin >= 0.0 {
        0.0
    } else {
        1.0
    }
}

/// Three-stop green → neutral → red scale in Plotly's `[[pos, color], ...]` form.
pub fn diverging_colorscale(zmin: f64, zmax: f64) -> Vec<(f64, &'static str)> {
    vec![(0.0, GREEN), (neutral_stop(zmin, zmax), NEUTRAL), (1.0, RED)]
}

// ---------------------------------------------------------------------------
// Plotly figure
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Font {
    pub family: &'static str,
    pub size: f64,
    pub color: &'static str,
}

fn font(scale: f64) -> Font {
    Font {
        family: FONT_FAMILY,
        size: FONT_SIZE * scale,
        color: FONT_COLOR,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ColorBar {
    pub title: AxisTitle,
    pub tickfont: Font,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeatmapTrace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Hour labels, one per matrix column.
    pub x: Vec<String>,
    /// Zone codes, one per matrix row.
    pub y: Vec<String>,
    pub z: Vec<Vec<Option<f64>>>,
    pub zmin: f64,
    pub zmax: f64,
    pub zmid: f64,
    pub colorscale: Vec<(f64, &'static str)>,
    pub colorbar: ColorBar,
    pub text: Vec<Vec<String>>,
    pub texttemplate: &'static str,
    pub textfont: Font,
    pub hoverinfo: &'static str,
    pub hoverongaps: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AxisTitle {
    pub text: String,
    pub font: Font,
}

#[derive(Debug, Clone, Serialize)]
pub struct Axis {
    pub title: AxisTitle,
    pub tickmode: &'static str,
    pub tickvals: Vec<String>,
    pub ticktext: Vec<String>,
    pub tickfont: Font,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autorange: Option<&'static str>,
    pub linecolor: &'static str,
    pub gridcolor: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub title: AxisTitle,
    pub height: u32,
    pub plot_bgcolor: &'static str,
    pub paper_bgcolor: &'static str,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub font: Font,
}

#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<HeatmapTrace>,
    pub layout: Layout,
}

pub fn hour_labels(hours: &[u32]) -> Vec<String> {
    hours.iter().map(|h| format!("{h:02}:00")).collect()
}

/// Build the Plotly figure, or `None` when no zone has data.
///
/// Zones run down the y axis (first selected zone on top), hours across x.
pub fn figure(heatmap: &Heatmap) -> Option<Figure> {
    let matrix = &heatmap.matrix;
    let (zmin, zmax) = (matrix.min()?, matrix.max()?);
    let hours = hour_labels(&matrix.hours);

    let zone_labels: Vec<String> = matrix
        .zones
        .iter()
        .map(|z| heatmap.spread(z).map_or_else(|| z.clone(), |s| s.label()))
        .collect();

    let text = matrix
        .cells
        .iter()
        .map(|row| {
            row.iter()
                .map(|c| c.map(|v| format!("{v:.1}")).unwrap_or_default())
                .collect()
        })
        .collect();

    let trace = HeatmapTrace {
        kind: "heatmap",
        x: hours.clone(),
        y: matrix.zones.clone(),
        z: matrix.cells.clone(),
        zmin,
        zmax,
        zmid: 0.0,
        colorscale: diverging_colorscale(zmin, zmax),
        colorbar: ColorBar {
            title: AxisTitle {
                text: format!("price <br>[{}/{}]", heatmap.currency, heatmap.unit),
                font: font(1.0),
            },
            tickfont: font(0.9),
        },
        text,
        texttemplate: "%{text}",
        textfont: font(0.9),
        hoverinfo: "z+x+y",
        hoverongaps: false,
    };

    let layout = Layout {
        title: AxisTitle {
            text: format!("Day-Ahead Electricity Prices for {}", heatmap.date.format("%Y-%m-%d")),
            font: font(1.3),
        },
        height: 200 + 60 * matrix.zones.len() as u32,
        plot_bgcolor: "white",
        paper_bgcolor: "white",
        xaxis: Axis {
            title: AxisTitle {
                text: "Hour".to_string(),
                font: font(1.1),
            },
            tickmode: "array",
            tickvals: hours.clone(),
            ticktext: hours,
            tickfont: font(1.0),
            autorange: None,
            linecolor: FONT_COLOR,
            gridcolor: "lightgray",
        },
        yaxis: Axis {
            title: AxisTitle {
                text: format!("Bidding zone / Spread [{}/{}]", heatmap.currency, heatmap.unit),
                font: font(1.1),
            },
            tickmode: "array",
            tickvals: matrix.zones.clone(),
            ticktext: zone_labels,
            tickfont: font(1.0),
            autorange: Some("reversed"),
            linecolor: FONT_COLOR,
            gridcolor: "lightgray",
        },
        font: font(1.0),
    };

    Some(Figure {
        data: vec![trace],
        layout,
    })
}

// ---------------------------------------------------------------------------
// PlotlyPage
// ---------------------------------------------------------------------------

/// Renders a self-contained HTML fragment: banners, chart and price table.
#[derive(Debug, Clone)]
pub struct PlotlyPage {
    pub plotly_src: String,
    /// Link shown next to the failure banner to recompute without cache.
    pub refresh_href: Option<String>,
}

impl Default for PlotlyPage {
    fn default() -> Self {
        Self {
            plotly_src: PLOTLY_CDN.to_string(),
            refresh_href: None,
        }
    }
}

impl PlotlyPage {
    pub fn with_refresh_href(mut self, href: impl Into<String>) -> Self {
        self.refresh_href = Some(href.into());
        self
    }
}

impl Renderer for PlotlyPage {
    fn render(&self, heatmap: &Heatmap) -> Result<String> {
        let mut html = String::new();
        let date = heatmap.date.format("%Y-%m-%d");

        let errors: Vec<&str> = heatmap
            .failures
            .iter()
            .filter(|f| f.kind == FailureKind::Error)
            .map(|f| f.zone.as_str())
            .collect();
        if !errors.is_empty() {
            html.push_str(&format!(
                "<div class=\"banner error\">Could not load data for: <b>{}</b>.",
                escape_html(&errors.join(", "))
            ));
            if let Some(href) = &self.refresh_href {
                html.push_str(&format!(
                    " <a class=\"refresh\" href=\"{}\">Refresh data</a>",
                    escape_html(href)
                ));
            }
            html.push_str("</div>\n");
        }
        for f in &heatmap.failures {
            let class = match f.kind {
                FailureKind::NoData => "warning",
                FailureKind::Error => "error",
            };
            html.push_str(&format!(
                "<div class=\"banner {class} detail\"><b>{}</b>: {}</div>\n",
                escape_html(&f.zone),
                escape_html(&f.message)
            ));
        }

        let Some(fig) = figure(heatmap) else {
            if heatmap.failures.is_empty() {
                html.push_str(
                    "<div class=\"banner warning\">No data found for the selected criteria. \
                     Try another date or other zones.</div>\n",
                );
            }
            return Ok(html);
        };

        let fig_json = script_safe(&serde_json::to_string(&fig)?);
        html.push_str(&format!("<h2>Day-ahead prices for {date}</h2>\n"));
        html.push_str(&format!(
            "<script src=\"{}\"></script>\n",
            escape_html(&self.plotly_src)
        ));
        html.push_str("<div id=\"heatmap\" style=\"width:100%;\"></div>\n");
        html.push_str(&format!(
            "<script>const fig = {fig_json};\
             Plotly.newPlot('heatmap', fig.data, fig.layout, {{responsive: true}});</script>\n"
        ));
        html.push_str(&price_table(heatmap));
        Ok(html)
    }
}

/// Prices rounded to two decimals, hours down, zones across.
fn price_table(heatmap: &Heatmap) -> String {
    let matrix = &heatmap.matrix;
    let mut html = String::from("<h3>Data table</h3>\n<table class=\"prices\">\n<tr><th>Hour</th>");
    for zone in &matrix.zones {
        html.push_str(&format!("<th>{}</th>", escape_html(zone)));
    }
    html.push_str("</tr>\n");
    for (col, label) in hour_labels(&matrix.hours).iter().enumerate() {
        html.push_str(&format!("<tr><td>{label}</td>"));
        for row in &matrix.cells {
            match row[col] {
                Some(v) => html.push_str(&format!("<td>{v:.2}</td>")),
                None => html.push_str("<td></td>"),
            }
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n");
    html
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Keep serialized JSON from closing the surrounding `<script>` element.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

//! SVG chart rendering of an [`AnalysisReport`].
//!
//! Charts are pure value→markup functions: they take the report and return
//! a standalone SVG document as a string. Writing files is the caller's
//! concern. The set mirrors the classic slice-performance summary: success
//! rate, latency by outcome, congestion impact, queue lengths and
//! utilization against its thresholds.

use slicescope_core::{AnalysisReport, Stability};
use std::fmt::Write as _;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 400.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;

const SLICE_COLORS: [&str; 3] = ["#ff6b6b", "#4ecdc4", "#45b7d1"];
const SUCCESS_COLOR: &str = "#2ecc71";
const FAILURE_COLOR: &str = "#e74c3c";
const CONGESTION_COLORS: [&str; 3] = ["#2ecc71", "#f39c12", "#e74c3c"];
const OBSERVED_COLOR: &str = "#45b7d1";
const THEORETICAL_COLOR: &str = "#8e44ad";
const HIGH_LOAD_COLOR: &str = "#f39c12";
const UNSTABLE_COLOR: &str = "#8b0000";

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Minimal SVG document builder: a fixed canvas plus shape/text appends.
struct Svg {
    body: String,
}

impl Svg {
    fn new(title: &str) -> Self {
        let mut body = String::new();
        let _ = write!(
            body,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif">"#
        );
        let _ = write!(
            body,
            r##"<rect x="0" y="0" width="{WIDTH}" height="{HEIGHT}" fill="#ffffff"/>"##
        );
        let _ = write!(
            body,
            r#"<text x="{x}" y="28" text-anchor="middle" font-size="16" font-weight="bold">{title}</text>"#,
            x = WIDTH / 2.0,
            title = escape_text(title),
        );
        Self { body }
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str, opacity: f64) {
        let _ = write!(
            self.body,
            r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" fill="{fill}" fill-opacity="{opacity}"/>"#
        );
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str, dashed: bool) {
        let dash = if dashed { r#" stroke-dasharray="6 4""# } else { "" };
        let _ = write!(
            self.body,
            r#"<line x1="{x1:.1}" y1="{y1:.1}" x2="{x2:.1}" y2="{y2:.1}" stroke="{stroke}" stroke-width="1.5"{dash}/>"#
        );
    }

    fn text(&mut self, x: f64, y: f64, anchor: &str, size: u32, content: &str) {
        let _ = write!(
            self.body,
            r#"<text x="{x:.1}" y="{y:.1}" text-anchor="{anchor}" font-size="{size}">{content}</text>"#,
            content = escape_text(content),
        );
    }

    fn finish(mut self) -> String {
        self.body.push_str("</svg>");
        self.body
    }
}

struct Bar {
    label: String,
    value: f64,
    color: &'static str,
}

struct RefLine {
    value: f64,
    color: &'static str,
    label: String,
}

struct Band {
    from: f64,
    to: f64,
    color: &'static str,
}

/// One labelled group of a grouped bar chart; `None` means the series has
/// no value for this group and no bar is drawn.
struct Group {
    label: String,
    values: Vec<Option<f64>>,
}

struct Series {
    name: &'static str,
    color: &'static str,
}

fn plot_geometry() -> (f64, f64, f64, f64) {
    let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    (MARGIN_LEFT, MARGIN_TOP, plot_w, plot_h)
}

fn axes(svg: &mut Svg, y_label: &str) {
    let (x0, y0, plot_w, plot_h) = plot_geometry();
    svg.line(x0, y0 + plot_h, x0 + plot_w, y0 + plot_h, "#333333", false);
    svg.line(x0, y0, x0, y0 + plot_h, "#333333", false);
    // y label, rotated along the axis
    let _ = write!(
        svg.body,
        r#"<text x="16" y="{y:.1}" text-anchor="middle" font-size="12" transform="rotate(-90 16 {y:.1})">{label}</text>"#,
        y = y0 + plot_h / 2.0,
        label = escape_text(y_label),
    );
}

fn ref_lines(svg: &mut Svg, lines: &[RefLine], y_max: f64) {
    let (x0, y0, plot_w, plot_h) = plot_geometry();
    for line in lines {
        if line.value > y_max {
            continue;
        }
        let y = y0 + plot_h * (1.0 - line.value / y_max);
        svg.line(x0, y, x0 + plot_w, y, line.color, true);
        svg.text(x0 + plot_w - 4.0, y - 4.0, "end", 10, &line.label);
    }
}

fn bar_chart(
    title: &str,
    y_label: &str,
    bars: &[Bar],
    lines: &[RefLine],
    band: Option<Band>,
    y_max: f64,
    value_format: impl Fn(f64) -> String,
) -> String {
    let mut svg = Svg::new(title);
    let (x0, y0, plot_w, plot_h) = plot_geometry();
    let y_max = y_max.max(f64::MIN_POSITIVE);

    if let Some(band) = band {
        let top = y0 + plot_h * (1.0 - band.to.min(y_max) / y_max);
        let bottom = y0 + plot_h * (1.0 - band.from / y_max);
        svg.rect(x0, top, plot_w, bottom - top, band.color, 0.1);
    }

    axes(&mut svg, y_label);
    ref_lines(&mut svg, lines, y_max);

    if !bars.is_empty() {
        let slot = plot_w / bars.len() as f64;
        let bar_w = slot * 0.6;
        for (at, bar) in bars.iter().enumerate() {
            let x = x0 + slot * at as f64 + (slot - bar_w) / 2.0;
            let h = plot_h * (bar.value.min(y_max) / y_max);
            let y = y0 + plot_h - h;

            svg.rect(x, y, bar_w, h, bar.color, 0.7);
            svg.text(
                x + bar_w / 2.0,
                (y - 6.0).max(12.0),
                "middle",
                11,
                &value_format(bar.value),
            );
            svg.text(
                x + bar_w / 2.0,
                y0 + plot_h + 18.0,
                "middle",
                12,
                &bar.label,
            );
        }
    }

    svg.finish()
}

fn grouped_bar_chart(
    title: &str,
    y_label: &str,
    groups: &[Group],
    series: &[Series],
    y_max: f64,
) -> String {
    let mut svg = Svg::new(title);
    let (x0, y0, plot_w, plot_h) = plot_geometry();
    let y_max = y_max.max(f64::MIN_POSITIVE);

    axes(&mut svg, y_label);

    // legend, top right
    for (at, series) in series.iter().enumerate() {
        let y = y0 - 28.0 + 14.0 * at as f64;
        svg.rect(x0 + plot_w - 110.0, y, 10.0, 10.0, series.color, 0.8);
        svg.text(x0 + plot_w - 96.0, y + 9.0, "start", 11, series.name);
    }

    if !groups.is_empty() && !series.is_empty() {
        let slot = plot_w / groups.len() as f64;
        let cluster_w = slot * 0.7;
        let bar_w = cluster_w / series.len() as f64;

        for (group_at, group) in groups.iter().enumerate() {
            let cluster_x = x0 + slot * group_at as f64 + (slot - cluster_w) / 2.0;

            for (series_at, value) in group.values.iter().enumerate() {
                let Some(value) = value else { continue };
                let x = cluster_x + bar_w * series_at as f64;
                let h = plot_h * (value.min(y_max) / y_max);
                let y = y0 + plot_h - h;
                svg.rect(x, y, bar_w * 0.9, h, series[series_at].color, 0.8);
            }

            svg.text(
                cluster_x + cluster_w / 2.0,
                y0 + plot_h + 18.0,
                "middle",
                12,
                &group.label,
            );
        }
    }

    svg.finish()
}

fn slice_color(at: usize) -> &'static str {
    SLICE_COLORS[at % SLICE_COLORS.len()]
}

/// success rate by slice, with the 50% reference line.
pub fn success_rate_chart(report: &AnalysisReport) -> String {
    let bars: Vec<Bar> = report
        .slices
        .iter()
        .enumerate()
        .map(|(at, slice)| Bar {
            label: slice.aggregate.slice.to_string(),
            value: slice.aggregate.success_rate * 100.0,
            color: slice_color(at),
        })
        .collect();

    bar_chart(
        "Success Rate by Network Slice",
        "Success Rate (%)",
        &bars,
        &[RefLine {
            value: 50.0,
            color: FAILURE_COLOR,
            label: "50%".to_string(),
        }],
        None,
        100.0,
        |v| format!("{v:.1}%"),
    )
}

/// mean latency of successes vs failures, per slice.
///
/// Slices whose bottleneck analysis failed (one-sided outcomes) have no
/// bars; they keep their spot on the axis so the chart stays aligned with
/// the report.
pub fn latency_outcome_chart(report: &AnalysisReport) -> String {
    let groups: Vec<Group> = report
        .slices
        .iter()
        .map(|slice| Group {
            label: slice.aggregate.slice.to_string(),
            values: match &slice.latency_bottleneck {
                Ok(bottleneck) => vec![
                    Some(bottleneck.success_latency.as_millis_f64()),
                    Some(bottleneck.failure_latency.as_millis_f64()),
                ],
                Err(_) => vec![None, None],
            },
        })
        .collect();

    let y_max = groups
        .iter()
        .flat_map(|g| g.values.iter().flatten())
        .fold(0.0f64, |max, v| max.max(*v))
        * 1.15;

    grouped_bar_chart(
        "Latency: Success vs Failure",
        "Latency (ms)",
        &groups,
        &[
            Series {
                name: "Success",
                color: SUCCESS_COLOR,
            },
            Series {
                name: "Failure",
                color: FAILURE_COLOR,
            },
        ],
        y_max.max(1.0),
    )
}

/// success rate per congestion level, per slice.
pub fn congestion_impact_chart(report: &AnalysisReport) -> String {
    let groups: Vec<Group> = report
        .slices
        .iter()
        .map(|slice| {
            let value = |level| {
                slice
                    .congestion_impact
                    .iter()
                    .find(|impact| impact.level == level)
                    .map(|impact| impact.success_rate * 100.0)
            };
            Group {
                label: slice.aggregate.slice.to_string(),
                values: slicescope_core::CongestionLevel::ALL
                    .into_iter()
                    .map(value)
                    .collect(),
            }
        })
        .collect();

    grouped_bar_chart(
        "Impact of Congestion on Success",
        "Success Rate (%)",
        &groups,
        &[
            Series {
                name: "Low",
                color: CONGESTION_COLORS[0],
            },
            Series {
                name: "Medium",
                color: CONGESTION_COLORS[1],
            },
            Series {
                name: "High",
                color: CONGESTION_COLORS[2],
            },
        ],
        100.0,
    )
}

/// observed vs theoretical (Little's Law) queue length, per slice.
pub fn queue_length_chart(report: &AnalysisReport) -> String {
    let groups: Vec<Group> = report
        .slices
        .iter()
        .map(|slice| Group {
            label: slice.aggregate.slice.to_string(),
            values: vec![
                Some(slice.aggregate.mean_queue_length),
                slice
                    .queuing
                    .as_ref()
                    .ok()
                    .map(|metrics| metrics.theoretical_queue_length()),
            ],
        })
        .collect();

    let y_max = groups
        .iter()
        .flat_map(|g| g.values.iter().flatten())
        .fold(0.0f64, |max, v| max.max(*v))
        * 1.15;

    grouped_bar_chart(
        "Queue Length: Observed vs Little's Law",
        "Queue Length (Packets)",
        &groups,
        &[
            Series {
                name: "Observed",
                color: OBSERVED_COLOR,
            },
            Series {
                name: "Theoretical",
                color: THEORETICAL_COLOR,
            },
        ],
        y_max.max(1.0),
    )
}

/// utilization ρ per slice, against the high-load and instability
/// thresholds. Slices with undefined utilization are left without a bar.
pub fn utilization_chart(report: &AnalysisReport) -> String {
    let bars: Vec<Bar> = report
        .slices
        .iter()
        .filter_map(|slice| {
            let metrics = slice.queuing.as_ref().ok()?;
            Some(Bar {
                label: slice.aggregate.slice.to_string(),
                value: metrics.utilization().value(),
                color: match metrics.stability() {
                    Stability::Stable => SUCCESS_COLOR,
                    Stability::HighUtilization => HIGH_LOAD_COLOR,
                    Stability::Unstable => FAILURE_COLOR,
                },
            })
        })
        .collect();

    let y_max = bars
        .iter()
        .fold(1.1f64, |max, bar| max.max(bar.value * 1.1));

    bar_chart(
        "Network Capacity Utilization",
        "Traffic Intensity (ρ)",
        &bars,
        &[
            RefLine {
                value: 0.8,
                color: HIGH_LOAD_COLOR,
                label: "high load (ρ=0.8)".to_string(),
            },
            RefLine {
                value: 1.0,
                color: UNSTABLE_COLOR,
                label: "unstable (ρ=1.0)".to_string(),
            },
        ],
        Some(Band {
            from: 0.8,
            to: 1.0,
            color: FAILURE_COLOR,
        }),
        y_max,
        |v| format!("{v:.3}"),
    )
}

/// every chart with its file name, ready to be written out.
pub fn render_charts(report: &AnalysisReport) -> Vec<(&'static str, String)> {
    vec![
        ("success_rate.svg", success_rate_chart(report)),
        ("latency_by_outcome.svg", latency_outcome_chart(report)),
        ("congestion_impact.svg", congestion_impact_chart(report)),
        ("queue_length.svg", queue_length_chart(report)),
        ("utilization.svg", utilization_chart(report)),
    ]
}

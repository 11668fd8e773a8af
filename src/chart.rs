//! 90-day commit activity chart in the GitHub dark palette.

use crate::scene::{Document, Gradient, GradientStop, Node};

const WIDTH: u32 = 400;
const HEIGHT: u32 = 120;
const MARGIN: f32 = 16.0;
const GRAPH_TOP: f32 = 55.0;
const GRAPH_BOTTOM_GAP: f32 = 75.0;

const STYLE: &str = ".title { font: bold 14px -apple-system, BlinkMacSystemFont, sans-serif; fill: #c9d1d9; } .subtitle { font: 11px -apple-system, BlinkMacSystemFont, sans-serif; fill: #8b949e; }";

const PANEL_COLOR: &str = "#0d1117";
const GRID_COLOR: &str = "#21262d";
const ACCENT_COLOR: &str = "#3fb950";

/// y coordinate for a value: zero sits on the panel's bottom edge, the
/// maximum on its top edge, linear in between.
fn y_position(value: u64, max: u64, top: f32, height: f32) -> f32 {
    top + height - (value as f32 / max as f32) * height
}

/// Build the chart document from bucketed daily values (oldest first).
pub fn activity_chart(values: &[u64]) -> Document {
    let mut doc = Document::new(WIDTH, HEIGHT);
    doc.stylesheet = STYLE.to_string();

    let graph_x = MARGIN;
    let graph_width = WIDTH as f32 - 2.0 * MARGIN;
    let graph_height = HEIGHT as f32 - GRAPH_BOTTOM_GAP;
    // An all-zero series scales against 1 so the baseline still renders.
    let max = values.iter().copied().max().unwrap_or(0).max(1);

    doc.push(Node::Rect {
        x: 0.0,
        y: 0.0,
        width: WIDTH as f32,
        height: HEIGHT as f32,
        rx: 6.0,
        fill: PANEL_COLOR.to_string(),
    });
    doc.push(Node::Text {
        x: MARGIN,
        y: 28.0,
        class: "title",
        anchor_end: false,
        content: "Commit Activity".to_string(),
    });
    doc.push(Node::Text {
        x: MARGIN,
        y: 44.0,
        class: "subtitle",
        anchor_end: false,
        content: "Last 90 days".to_string(),
    });

    for i in 0..5 {
        let y = GRAPH_TOP + graph_height / 4.0 * i as f32;
        doc.push(Node::Line {
            x1: graph_x,
            y1: y,
            x2: graph_x + graph_width,
            y2: y,
            stroke: GRID_COLOR.to_string(),
            stroke_width: 1.0,
        });
    }

    if !values.is_empty() {
        let step = if values.len() > 1 {
            graph_width / (values.len() - 1) as f32
        } else {
            graph_width
        };
        let points: Vec<(f32, f32)> = values
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                (
                    graph_x + i as f32 * step,
                    y_position(value, max, GRAPH_TOP, graph_height),
                )
            })
            .collect();

        // Area fill closes down to the baseline at both ends.
        let baseline = GRAPH_TOP + graph_height;
        let mut fill_points = Vec::with_capacity(points.len() + 2);
        fill_points.push((graph_x, baseline));
        fill_points.extend(points.iter().copied());
        fill_points.push((graph_x + graph_width, baseline));

        doc.gradients.push(Gradient {
            id: "fillGrad",
            stops: vec![
                GradientStop {
                    offset: "0%",
                    color: ACCENT_COLOR,
                    opacity: 0.3,
                },
                GradientStop {
                    offset: "100%",
                    color: ACCENT_COLOR,
                    opacity: 0.0,
                },
            ],
        });
        doc.push(Node::Polygon {
            points: fill_points,
            fill: "url(#fillGrad)".to_string(),
        });
        doc.push(Node::Polyline {
            points,
            stroke: ACCENT_COLOR.to_string(),
            stroke_width: 2.0,
        });
    }

    let total: u64 = values.iter().sum();
    let avg = if values.is_empty() {
        0.0
    } else {
        total as f64 / values.len() as f64
    };
    doc.push(Node::Text {
        x: WIDTH as f32 - MARGIN,
        y: 28.0,
        class: "subtitle",
        anchor_end: true,
        content: format!("{total} commits"),
    });
    doc.push(Node::Text {
        x: WIDTH as f32 - MARGIN,
        y: 44.0,
        class: "subtitle",
        anchor_end: true,
        content: format!("avg {avg:.1}/day"),
    });

    doc
}

pub fn render_activity_chart(values: &[u64]) -> String {
    activity_chart(values).render()
}

//! Minimal SVG scene graph. Renderers describe shapes and text
//! declaratively; serialization to markup happens in one place, so each
//! visual element can be tested without string plumbing.

pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Vertical linear gradient definition referenced by fill as `url(#id)`.
pub struct Gradient {
    pub id: &'static str,
    pub stops: Vec<GradientStop>,
}

pub struct GradientStop {
    pub offset: &'static str,
    pub color: &'static str,
    pub opacity: f32,
}

pub enum Node {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        rx: f32,
        fill: String,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        stroke: String,
        stroke_width: f32,
    },
    Polyline {
        points: Vec<(f32, f32)>,
        stroke: String,
        stroke_width: f32,
    },
    Polygon {
        points: Vec<(f32, f32)>,
        fill: String,
    },
    Text {
        x: f32,
        y: f32,
        class: &'static str,
        anchor_end: bool,
        content: String,
    },
    /// Embedded XHTML fragment covering the whole canvas. The fragment is
    /// emitted verbatim; callers escape any dynamic text they put in it.
    ForeignObject { html: String },
}

pub struct Document {
    pub width: u32,
    pub height: u32,
    pub stylesheet: String,
    pub gradients: Vec<Gradient>,
    pub nodes: Vec<Node>,
}

impl Document {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            stylesheet: String::new(),
            gradients: Vec::new(),
            nodes: Vec::new(),
        }
    }

    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Serialize the document to a standalone SVG string. Output is fully
    /// determined by the document contents.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
            self.width, self.height
        ));

        if !self.stylesheet.is_empty() {
            out.push_str(&format!("  <style>{}</style>\n", self.stylesheet));
        }

        if !self.gradients.is_empty() {
            out.push_str("  <defs>\n");
            for gradient in &self.gradients {
                out.push_str(&format!(
                    "    <linearGradient id=\"{}\" x1=\"0%\" y1=\"0%\" x2=\"0%\" y2=\"100%\">\n",
                    gradient.id
                ));
                for stop in &gradient.stops {
                    out.push_str(&format!(
                        "      <stop offset=\"{}\" style=\"stop-color:{};stop-opacity:{}\"/>\n",
                        stop.offset, stop.color, stop.opacity
                    ));
                }
                out.push_str("    </linearGradient>\n");
            }
            out.push_str("  </defs>\n");
        }

        for node in &self.nodes {
            out.push_str("  ");
            out.push_str(&render_node(node));
            out.push('\n');
        }

        out.push_str("</svg>\n");
        out
    }
}

fn render_node(node: &Node) -> String {
    match node {
        Node::Rect {
            x,
            y,
            width,
            height,
            rx,
            fill,
        } => format!(
            "<rect x=\"{x}\" y=\"{y}\" width=\"{width}\" height=\"{height}\" rx=\"{rx}\" fill=\"{fill}\"/>"
        ),
        Node::Line {
            x1,
            y1,
            x2,
            y2,
            stroke,
            stroke_width,
        } => format!(
            "<line x1=\"{x1}\" y1=\"{y1}\" x2=\"{x2}\" y2=\"{y2}\" stroke=\"{stroke}\" stroke-width=\"{stroke_width}\"/>"
        ),
        Node::Polyline {
            points,
            stroke,
            stroke_width,
        } => format!(
            "<polyline fill=\"none\" stroke=\"{stroke}\" stroke-width=\"{stroke_width}\" stroke-linecap=\"round\" stroke-linejoin=\"round\" points=\"{}\"/>",
            points_attr(points)
        ),
        Node::Polygon { points, fill } => {
            format!("<polygon fill=\"{fill}\" points=\"{}\"/>", points_attr(points))
        }
        Node::Text {
            x,
            y,
            class,
            anchor_end,
            content,
        } => {
            let anchor = if *anchor_end {
                " text-anchor=\"end\""
            } else {
                ""
            };
            format!(
                "<text x=\"{x}\" y=\"{y}\" class=\"{class}\"{anchor}>{}</text>",
                escape_xml(content)
            )
        }
        Node::ForeignObject { html } => format!(
            "<foreignObject x=\"0\" y=\"0\" width=\"100%\" height=\"100%\">{html}</foreignObject>"
        ),
    }
}

fn points_attr(points: &[(f32, f32)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{x:.1},{y:.1}"))
        .collect::<Vec<_>>()
        .join(" ")
}

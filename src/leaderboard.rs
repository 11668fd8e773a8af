//! "Lines of code pushed" leaderboard in the lowlighter/metrics visual
//! style: per-repository diff boxes and formatted deltas inside an XHTML
//! fragment, plus a grand-total footer.

use chrono::{DateTime, FixedOffset, Utc};

use crate::scene::{Document, Node, escape_xml};
use crate::stats::{LinesReport, diff_boxes, format_number};

const WIDTH: u32 = 480;
const ROW_HEIGHT: u32 = 22;
const HEADER_HEIGHT: u32 = 40;
const FOOTER_HEIGHT: u32 = 30;
const TOP_N: usize = 10;

/// Footer timestamps display in KST regardless of where the job runs.
const KST_OFFSET_SECS: i32 = 9 * 3600;

const STYLE: &str = "svg{font-family:-apple-system,BlinkMacSystemFont,Segoe UI,Helvetica,Arial,sans-serif,Apple Color Emoji,Segoe UI Emoji;font-size:14px;color:#777}h1,h2{margin:8px 0 2px;padding:0;color:#0366d6;font-size:20px;font-weight:700}h2{font-weight:400;font-size:16px}h1 svg,h2 svg{fill:currentColor}section>.field{margin-left:5px;margin-right:5px}.field{display:flex;align-items:center;margin-bottom:2px;white-space:nowrap}.field svg{margin:0 8px;fill:#959da5;flex-shrink:0}.row{display:flex;flex-wrap:wrap}.row section{flex:1 1 0}footer{margin-top:8px;font-size:10px;font-style:italic;color:#666;text-align:right;display:flex;flex-direction:column;justify-content:flex-end;padding:0 4px}.diff-handle{color:#58a6ff;max-width:200px;text-overflow:ellipsis;overflow:hidden}.diff-box{display:inline-block;width:8px;height:8px;margin-left:1px;background-color:rgba(110,118,129,.4);border:1px solid rgba(246,240,251,.1)}.diff-box:first-child{margin-left:9px}.diff-box.added{background-color:#3fb950}.diff-box.deleted{background-color:#da3633}.diff-stats,code,span.code{font-family:SFMono-Regular,Consolas,Liberation Mono,Menlo,monospace}.diff-stats{margin-left:4px;font-weight:700;font-size:12px;white-space:nowrap}.added{color:#3fb950}.deleted{color:#da3633}code,span.code{background-color:#7777771f;padding:1px 5px;font-size:80%;border-radius:6px;color:#777}code{display:inline-block}span.code{margin:0 4px -3px}#metrics-end{width:100%}";

const REPO_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 16 16" width="16" height="16"><path fill-rule="evenodd" d="M8 5.5a2.5 2.5 0 100 5 2.5 2.5 0 000-5zM4 8a4 4 0 118 0 4 4 0 01-8 0z"/></svg>"#;

const HEADER_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 16 16" width="16" height="16"><path fill-rule="evenodd" d="M2.75 1.5a.25.25 0 00-.25.25v12.5c0 .138.112.25.25.25h10.5a.25.25 0 00.25-.25V4.664a.25.25 0 00-.073-.177l-2.914-2.914a.25.25 0 00-.177-.073H2.75zM1 1.75C1 .784 1.784 0 2.75 0h7.586c.464 0 .909.184 1.237.513l2.914 2.914c.329.328.513.773.513 1.237v9.586A1.75 1.75 0 0113.25 16H2.75A1.75 1.75 0 011 14.25V1.75zm7 1.5a.75.75 0 01.75.75v1.5h1.5a.75.75 0 010 1.5h-1.5v1.5a.75.75 0 01-1.5 0V7h-1.5a.75.75 0 010-1.5h1.5V4A.75.75 0 018 3.25zm-3 8a.75.75 0 01.75-.75h4.5a.75.75 0 010 1.5h-4.5a.75.75 0 01-.75-.75z"/></svg>"#;

/// Build the leaderboard document. `generated_at` is injected so the output
/// for a given collection result is reproducible.
pub fn lines_leaderboard(report: &LinesReport, org: &str, generated_at: DateTime<Utc>) -> Document {
    let top = report.ranked(TOP_N);
    let max_total = top.iter().map(|(_, delta)| delta.total()).max().unwrap_or(1);
    let height = HEADER_HEIGHT + top.len() as u32 * ROW_HEIGHT + FOOTER_HEIGHT;

    let mut left_rows = String::new();
    let mut right_rows = String::new();
    for (name, delta) in &top {
        let additions = delta.additions;
        let deletions = delta.deletions_abs();
        let (add_boxes, del_boxes) = diff_boxes(additions, deletions, max_total);

        left_rows.push_str(&format!(
            "<div class=\"field\">{REPO_ICON}<span class=\"diff-handle\">{}/{}</span></div>",
            escape_xml(org),
            escape_xml(name)
        ));

        let mut boxes = String::new();
        for _ in 0..add_boxes {
            boxes.push_str("<div class=\"diff-box added\"></div>");
        }
        for _ in 0..del_boxes {
            boxes.push_str("<div class=\"diff-box deleted\"></div>");
        }
        right_rows.push_str(&format!(
            "<div class=\"field\">{boxes}<div class=\"diff-stats\"><span class=\"added\"> +{}</span><span class=\"deleted\"> -{}</span></div><span> </span></div>",
            format_number(additions),
            format_number(deletions)
        ));
    }

    let kst = FixedOffset::east_opt(KST_OFFSET_SECS).unwrap();
    let stamp = generated_at
        .with_timezone(&kst)
        .format("%d %b %Y, %H:%M:%S");
    let footer = format!(
        "Total: +{} / -{} · {} repositories · {} (Asia/Seoul)",
        format_number(report.total_additions()),
        format_number(report.total_deletions_abs()),
        report.len(),
        stamp
    );

    let html = format!(
        "<div xmlns=\"http://www.w3.org/1999/xhtml\" class=\"items-wrapper\">\
<section>\
<h2 class=\"field\">{HEADER_ICON} Lines of code pushed</h2>\
<div class=\"row\">\
<section>{left_rows}</section>\
<section>{right_rows}</section>\
</div>\
</section>\
<footer><span>{footer}</span></footer>\
</div>\
<div xmlns=\"http://www.w3.org/1999/xhtml\" id=\"metrics-end\"></div>"
    );

    let mut doc = Document::new(WIDTH, height);
    doc.stylesheet = STYLE.to_string();
    doc.push(Node::ForeignObject { html });
    doc
}

pub fn render_lines_leaderboard(
    report: &LinesReport,
    org: &str,
    generated_at: DateTime<Utc>,
) -> String {
    lines_leaderboard(report, org, generated_at).render()
}

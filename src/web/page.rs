//! HTML shell and query form.

use chrono::NaiveDate;

use crate::render::escape_html;
use crate::zones::BiddingZone;

const STYLE: &str = "\
body{font-family:Arial,sans-serif;margin:0;display:flex}\
aside{width:260px;padding:1rem;background:#f4f6f8;min-height:100vh}\
main{flex:1;padding:1rem 2rem}\
.zones{display:grid;grid-template-columns:1fr 1fr;gap:2px 8px;margin:.5rem 0}\
.banner{padding:.6rem 1rem;margin:.5rem 0;border-radius:4px}\
.banner.error{background:#fde2e1;color:#8a1c1c}\
.banner.warning{background:#fff4d6;color:#7a5a00}\
.banner.info{background:#e3f0fb;color:#1c4f7a}\
.banner.detail{font-size:.85rem}\
table.prices{border-collapse:collapse}\
table.prices td,table.prices th{border:1px solid #ddd;padding:2px 8px;text-align:right}";

/// Full page: sidebar form plus main content.
pub fn layout(form: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Day-Ahead Electricity Price Heatmap</title>\n<style>{STYLE}</style>\n</head>\n\
         <body>\n<aside>\n{form}</aside>\n<main>\n\
         <h1>Day-Ahead Electricity Price Heatmap</h1>\n\
         <p>Day-ahead electricity prices across European bidding zones.</p>\n\
         {body}</main>\n</body>\n</html>\n"
    )
}

/// Query form with a date picker (capped at `max_date`) and zone checkboxes.
pub fn query_form(date: NaiveDate, max_date: NaiveDate, selected: &[String]) -> String {
    let mut html = String::from("<h2>Query</h2>\n<form method=\"get\" action=\"/heatmap\">\n");
    html.push_str(&format!(
        "<label>Day <input type=\"date\" name=\"date\" value=\"{date}\" max=\"{max_date}\"></label>\n"
    ));
    html.push_str("<div class=\"zones\">\n");
    for zone in BiddingZone::all() {
        let checked = if selected.iter().any(|s| s.eq_ignore_ascii_case(zone.code)) {
            " checked"
        } else {
            ""
        };
        html.push_str(&format!(
            "<label title=\"{}\"><input type=\"checkbox\" name=\"zones\" value=\"{code}\"{checked}> {code}</label>\n",
            escape_html(zone.name),
            code = zone.code,
        ));
    }
    html.push_str("</div>\n<button type=\"submit\">Show</button>\n</form>\n");
    html
}

pub fn banner(class: &str, message: &str) -> String {
    format!("<div class=\"banner {class}\">{}</div>\n", escape_html(message))
}

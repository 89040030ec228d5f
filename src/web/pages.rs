//! Server-side HTML for the single planner page.

use pulldown_cmark::{Options, Parser, html};

use crate::planner::PlanForm;

pub const PAGE_TITLE: &str = "Enhanced Music Marketing Planner";
pub const SUCCESS_TEXT: &str = "Marketing plan generated successfully!";

/// Everything the page can show after a request.
#[derive(Debug, Default)]
pub struct PageView<'a> {
    pub form: Option<&'a PlanForm>,
    pub warning: Option<&'a str>,
    pub error: Option<&'a str>,
    /// Labels of the crew tasks that completed.
    pub steps: &'a [String],
    /// Final plan as markdown.
    pub plan: Option<&'a str>,
}

/// Escape text for use in HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

/// Render model output as HTML. Raw HTML in the markdown is passed through.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}

pub fn render_page(view: &PageView<'_>) -> String {
    let empty = PlanForm::default();
    let form = view.form.unwrap_or(&empty);

    let mut body = String::with_capacity(4096);

    body.push_str(&format!("<h1>&#127926; {PAGE_TITLE}</h1>\n"));
    body.push_str(&render_form(form));

    if let Some(warning) = view.warning {
        body.push_str(&format!(
            "<div class=\"alert warning\" role=\"alert\">{}</div>\n",
            escape_html(warning)
        ));
    }

    if !view.steps.is_empty() {
        body.push_str("<section class=\"status\">\n<ul>\n");
        for step in view.steps {
            body.push_str(&format!("<li>&#9989; {}</li>\n", escape_html(step)));
        }
        body.push_str("</ul>\n</section>\n");
    }

    if let Some(error) = view.error {
        body.push_str(&format!(
            "<div class=\"alert error\" role=\"alert\">Marketing plan generation failed: {}</div>\n",
            escape_html(error)
        ));
    }

    if let Some(plan) = view.plan {
        body.push_str(&format!("<div class=\"alert success\">{SUCCESS_TEXT}</div>\n"));
        body.push_str("<h2>&#128204; Your Marketing Plan:</h2>\n");
        body.push_str("<article class=\"plan\">\n");
        body.push_str(&render_markdown(plan));
        body.push_str("</article>\n");
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{PAGE_TITLE}</title>\n<style>{STYLE}</style>\n</head>\n\
         <body>\n<main>\n{body}</main>\n</body>\n</html>\n"
    )
}

fn render_form(form: &PlanForm) -> String {
    format!(
        r#"<form method="post" action="/plan">
<label for="single_name">&#127925; Name of your new single/album:</label>
<input type="text" id="single_name" name="single_name" value="{name}">
<label for="style_tone">&#10024; Describe your desired style/tone (casual, edgy, etc.):</label>
<textarea id="style_tone" name="style_tone" rows="4">{style}</textarea>
<label for="youtube_channel">&#128250; Enter YouTube Channel or Artist Name (optional, recommended):</label>
<input type="text" id="youtube_channel" name="youtube_channel" value="{channel}" aria-describedby="channel_help">
<small id="channel_help">Example: Ed Sheeran, Billie Eilish, etc.</small>
<button type="submit">Generate Marketing Plan</button>
</form>
"#,
        name = escape_html(&form.single_name),
        style = escape_html(&form.style_tone),
        channel = escape_html(&form.youtube_channel),
    )
}

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;margin:0;background:#fafafa;color:#262730}\
main{max-width:730px;margin:0 auto;padding:2rem 1rem}\
form{display:flex;flex-direction:column;gap:.4rem}\
input,textarea{font:inherit;padding:.5rem;border:1px solid #ccc;border-radius:.4rem}\
button{margin-top:.8rem;padding:.5rem 1rem;font:inherit;border-radius:.4rem;border:1px solid #ccc;background:#fff;cursor:pointer;align-self:flex-start}\
small{color:#666}\
.alert{margin-top:1rem;padding:.8rem 1rem;border-radius:.4rem}\
.warning{background:#fffce7;color:#926c05}\
.error{background:#ffecec;color:#7d353b}\
.success{background:#ecf9ef;color:#177233}\
.status ul{list-style:none;padding-left:0}\
table{border-collapse:collapse}th,td{border:1px solid #ddd;padding:.3rem .6rem}";

//! Documentation viewer page

/// Page template; `{{TITLE}}` and `{{API_BASE}}` are substituted
const PAGE_TEMPLATE: &str = include_str!("page.html");

/// Options for rendering the docs page
#[derive(Debug, Clone)]
pub struct DocsPageOptions {
    /// Page and sidebar title
    pub title: String,
    /// Path prefix of the docs JSON API
    pub api_base: String,
}

impl Default for DocsPageOptions {
    fn default() -> Self {
        Self {
            title: "PipesHub API Documentation".to_string(),
            api_base: "/docs/api".to_string(),
        }
    }
}

/// Render the single-page docs viewer
pub fn render_docs_page(options: &DocsPageOptions) -> String {
    PAGE_TEMPLATE
        .replace("{{TITLE}}", &escape_html(&options.title))
        .replace("{{API_BASE}}", &escape_js_string(&options.api_base))
}

fn escape_html(text: &str) -> String {
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

fn escape_js_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '<' => out.push_str("\\u003c"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

use pulldown_cmark::{html, CowStr, Event, Options, Parser};

fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_MATH);
    options
}

/// Render a markdown body to HTML. Math segments go through katex; if katex
/// rejects the input the raw source is kept in a plain span so the page still
/// renders.
pub fn render(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, markdown_options()).map(|event| match event {
        Event::InlineMath(math) => math_event(&math, false),
        Event::DisplayMath(math) => math_event(&math, true),
        other => other,
    });

    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

fn math_event(source: &str, display_mode: bool) -> Event<'static> {
    let rendered = katex::Opts::builder()
        .display_mode(display_mode)
        .build()
        .map_err(|_| ())
        .and_then(|opts| katex::render_with_opts(source, opts).map_err(|_| ()))
        .unwrap_or_else(|_| {
            let class = if display_mode {
                "math math-display"
            } else {
                "math math-inline"
            };
            format!("<span class=\"{class}\">{source}</span>")
        });
    Event::Html(CowStr::Boxed(rendered.into_boxed_str()))
}

// Markdown to HTML conversion

use comrak::{markdown_to_html, Options};

fn options() -> Options<'static> {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options
}

pub fn to_html(source: &str) -> String {
    markdown_to_html(source, &options())
}

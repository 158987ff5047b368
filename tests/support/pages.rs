//! HTML fixtures shaped like SubHD pages.

/// One result box on a search page.
pub struct ResultBox<'a> {
    pub title: &'a str,
    pub href: &'a str,
    pub labels: &'a str,
    pub movie: bool,
}

impl<'a> ResultBox<'a> {
    pub fn new(title: &'a str, href: &'a str, labels: &'a str) -> Self {
        Self {
            title,
            href,
            labels,
            movie: true,
        }
    }

    pub fn episode(title: &'a str, href: &'a str, labels: &'a str) -> Self {
        Self {
            title,
            href,
            labels,
            movie: false,
        }
    }

    fn render(&self) -> String {
        let badge = if self.movie {
            r#"<div class="px-1 rounded-sm bg-danger text-white">电影</div>"#
        } else {
            r#"<div class="px-1 rounded-sm bg-info text-white">剧集</div>"#
        };
        format!(
            r#"<div class="mb-4 bg-white rounded shadow-sm">
                <div class="d-flex">{badge}</div>
                <div class="f12 pt-1"><a href="{}">{}</a></div>
                <div class="pt-1 text-secondary">{}</div>
            </div>"#,
            self.href, self.title, self.labels
        )
    }
}

/// Search page listing `boxes` under a result-count summary.
pub fn search_page(boxes: &[ResultBox<'_>]) -> String {
    let rendered: String = boxes.iter().map(ResultBox::render).collect();
    format!(
        r#"<html><body><div class="container"><small>总共 {} 条</small>{rendered}</div></body></html>"#,
        boxes.len()
    )
}

/// Search page reporting zero hits.
pub fn zero_results_page() -> String {
    search_page(&[])
}

/// CodeIgniter-style error page for disallowed URI characters.
pub fn rejected_page() -> String {
    "<html><head><title>Error</title></head><body><div id=\"container\">\
     <h1>An Error Was Encountered</h1>\
     <p>The URI you submitted has disallowed characters.</p></div></body></html>"
        .to_string()
}

/// Detail page with optional download token and optional preview control.
pub fn detail_page(token: Option<&str>, preview: Option<(&str, &str)>) -> String {
    let preview_html = preview.map_or_else(String::new, |(sid, fname)| {
        format!(
            r#"<div class="border-top border-light px-3 py-3 clearfix">
                 <div class="float-right text-secondary">
                   <a href="javascript:;" sid="{sid}" data-fname="{fname}">预览</a>
                 </div>
                 <div>{fname}</div>
               </div>"#
        )
    });
    let button = token.map_or_else(String::new, |token| {
        format!(r#"<button id="down" class="btn btn-danger" dtoken1="{token}">下载字幕</button>"#)
    });
    format!("<html><body>{preview_html}{button}</body></html>")
}

/// Successful token-exchange body with the URL escaped the way PHP's json_encode does.
pub fn down_ajax_success(url: &str) -> String {
    format!(
        r#"{{"success":true,"url":"{}"}}"#,
        url.replace('/', r"\/")
    )
}

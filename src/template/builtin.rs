//! Fragments compiled into the binary, used when no template source is given.

use super::StaticTemplates;

const FRAGMENTS: &[(&str, &str)] = &[
    ("header.html", "<header class=\"site-header\"><a href=\"#/home\">Countdown</a></header>"),
    ("footer.html", "<footer class=\"site-footer\">Data from third-party feeds.</footer>"),
    ("home/hero.html", "<section class=\"hero\"><h1>The countdown is on</h1></section>"),
    ("home/highlights.html", "<section class=\"highlights\"><ul class=\"cards\"></ul></section>"),
    ("countdown/clock.html", "<section class=\"clock\"><span data-unit=\"days\"></span><span data-unit=\"hours\"></span><span data-unit=\"minutes\"></span><span data-unit=\"seconds\"></span></section>"),
    ("news/list.html", "<section class=\"news\"><ol class=\"feed\"></ol></section>"),
    ("markets/odds.html", "<section class=\"markets\"><table class=\"odds\"></table></section>"),
    ("visits/counter.html", "<section class=\"visits\"><output class=\"visit-count\"></output></section>"),
    ("about/body.html", "<section class=\"about\"><p>A small dashboard counting down to the big day.</p></section>"),
];

pub fn builtin_templates() -> StaticTemplates {
    let mut templates = StaticTemplates::new();
    for (name, body) in FRAGMENTS {
        templates.insert(*name, *body);
    }
    templates
}

use scraper::Selector;
use std::sync::LazyLock;

macro_rules! selector {
    ($name:ident, $css:expr) => {
        pub(crate) static $name: LazyLock<Selector> = LazyLock::new(|| Selector::parse($css).unwrap());
    };
}

// Breadcrumb header shared by album and conversation pages.
selector!(CRUMBS_SELECTOR, ".page_block_header_inner");
selector!(CRUMB_SELECTOR, "div.ui_crumb");

selector!(IMAGE_SELECTOR, "img[src]");

selector!(MESSAGE_SELECTOR, ".message");
selector!(MESSAGE_HEADER_SELECTOR, ".message__header");
selector!(ATTACHMENT_LINK_SELECTOR, ".attachment__link[href]");

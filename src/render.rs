//! Gallery page rendering.
//!
//! The page is a single full-screen viewer over the current listing. Each
//! media file becomes one item; the script shows one at a time and handles
//! navigation, delete and favorite.
//!
//! ## Item Markup
//!
//! ```html
//! <div class="item" data-name="trip/a b.jpg" data-filename="trip/a%20b.jpg">
//!   <a href="trip/a%20b.jpg" target="_blank" rel="noopener">
//!     <img data-src="trip/a%20b.jpg" alt="" class="lazy-image">
//!   </a>
//! </div>
//! ```
//!
//! Videos get `<video data-src=... controls muted playsinline preload="none">`
//! instead. Sources are loaded lazily from `data-src` as items come into view.
//!
//! `data-filename` is percent-encoded per segment and is what the script sends
//! back as `?name=`. Slashes stay literal so the same value works as a URL.
//!
//! ## CSS and JavaScript
//!
//! Embedded at compile time:
//! - `static/gallery.css`: Full-screen layout and toolbar
//! - `static/gallery.js`: Keyboard, swipe, delete and favorite handling

use crate::media::{MediaKind, media_kind};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::path::Path;

const CSS: &str = include_str!("../static/gallery.css");
const JS: &str = include_str!("../static/gallery.js");

/// Render the full gallery page for `files` (relative POSIX paths).
pub fn render_gallery(files: &[String]) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Gala" }
                style { (PreEscaped(CSS)) }
            }
            body {
                main id="gallery" {
                    @if files.is_empty() {
                        p.empty { "No media files found." }
                    } @else {
                        @for file in files {
                            (render_item(file))
                        }
                    }
                }
                (toolbar(files.len()))
                script { (PreEscaped(JS)) }
            }
        }
    }
}

fn toolbar(count: usize) -> Markup {
    html! {
        nav id="toolbar" {
            span id="counter" { "0 / " (count) }
            button id="prev" type="button" title="Previous (←)" { "‹" }
            button id="next" type="button" title="Next (→)" { "›" }
            button id="random" type="button" title="Random (r)" { "⤮" }
            button id="favorite" type="button" title="Favorite (f)" { "★" }
            button id="delete" type="button" title="Delete (d)" { "🗑" }
        }
    }
}

/// Render one media item.
pub fn render_item(file: &str) -> Markup {
    let src = quote_path(file);
    let is_video = media_kind(Path::new(file)) == Some(MediaKind::Video);

    html! {
        div.item data-name=(file) data-filename=(src) {
            @if is_video {
                video.lazy-video data-src=(src) controls muted playsinline preload="none" {}
            } @else {
                a href=(src) target="_blank" rel="noopener" {
                    img.lazy-image data-src=(src) alt="";
                }
            }
        }
    }
}

/// Percent-encode each segment of a relative POSIX path, keeping `/`.
pub fn quote_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

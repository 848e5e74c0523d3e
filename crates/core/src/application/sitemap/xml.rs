//! Sitemap XML serialization.
//!
//! Output layout (two-space indent, `\n` line endings, no trailing newline):
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://refery.io/</loc>
//!     <lastmod>2024-06-01T00:00:00.000Z</lastmod>
//!     <changefreq>weekly</changefreq>
//!     <priority>1.0</priority>
//!   </url>
//! </urlset>
//! ```

use quick_xml::escape::escape;

use super::constants::SITEMAP_NAMESPACE;
use crate::domain::SitemapEntry;

/// Render entries, in the given order, as a complete sitemap document
pub fn render(entries: &[SitemapEntry]) -> String {
    let mut xml = String::with_capacity(128 + entries.len() * 192);

    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"");
    xml.push_str(SITEMAP_NAMESPACE);
    xml.push_str("\">\n");

    for entry in entries {
        xml.push_str("  <url>\n    <loc>");
        xml.push_str(&escape(entry.location.as_str()));
        xml.push_str("</loc>\n    <lastmod>");
        xml.push_str(&escape(entry.last_modified.as_str()));
        xml.push_str("</lastmod>\n    <changefreq>");
        xml.push_str(entry.change_frequency.as_str());
        xml.push_str("</changefreq>\n    <priority>");
        xml.push_str(&entry.priority.to_string());
        xml.push_str("</priority>\n  </url>\n");
    }

    xml.push_str("</urlset>");
    xml
}

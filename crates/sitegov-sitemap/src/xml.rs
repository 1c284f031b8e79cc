//! XML rendering for `<urlset>` and `<sitemapindex>` documents.

use crate::entry::SitemapEntry;
use crate::index::SitemapIndexEntry;
use std::fmt::Write;

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Escape the five XML predefined entities.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn render_urlset(entries: &[SitemapEntry]) -> String {
    let mut xml = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(xml, "{XML_DECL}");
    let _ = writeln!(xml, r#"<urlset xmlns="{SITEMAP_NS}">"#);
    for entry in entries {
        let _ = writeln!(xml, "  <url>");
        let _ = writeln!(xml, "    <loc>{}</loc>", escape(&entry.url));
        if let Some(date) = entry.last_modified {
            let _ = writeln!(xml, "    <lastmod>{}</lastmod>", date.format("%Y-%m-%d"));
        }
        if let Some(freq) = entry.change_frequency {
            let _ = writeln!(xml, "    <changefreq>{freq}</changefreq>");
        }
        if let Some(priority) = entry.priority {
            let _ = writeln!(xml, "    <priority>{priority:.1}</priority>");
        }
        let _ = writeln!(xml, "  </url>");
    }
    let _ = writeln!(xml, "</urlset>");
    xml
}

pub fn render_index(index: &[SitemapIndexEntry]) -> String {
    let mut xml = String::new();
    let _ = writeln!(xml, "{XML_DECL}");
    let _ = writeln!(xml, r#"<sitemapindex xmlns="{SITEMAP_NS}">"#);
    for row in index {
        let _ = writeln!(xml, "  <sitemap>");
        let _ = writeln!(xml, "    <loc>{}</loc>", escape(&row.loc));
        let _ = writeln!(xml, "    <lastmod>{}</lastmod>", row.lastmod.format("%Y-%m-%d"));
        let _ = writeln!(xml, "  </sitemap>");
    }
    let _ = writeln!(xml, "</sitemapindex>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::ChangeFrequency;
    use chrono::NaiveDate;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).expect("date")
    }

    #[test]
    fn urlset_document() {
        let entries = vec![
            SitemapEntry::new("https://www.example.com")
                .with_lastmod(date(1, 15))
                .with_changefreq(ChangeFrequency::Weekly)
                .with_priority(1.0),
            SitemapEntry::new("https://www.example.com/search?q=a&b=<c>"),
        ];
        insta::assert_snapshot!(render_urlset(&entries).trim_end(), @r#"
        <?xml version="1.0" encoding="UTF-8"?>
        <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
          <url>
            <loc>https://www.example.com</loc>
            <lastmod>2025-01-15</lastmod>
            <changefreq>weekly</changefreq>
            <priority>1.0</priority>
          </url>
          <url>
            <loc>https://www.example.com/search?q=a&amp;b=&lt;c&gt;</loc>
          </url>
        </urlset>
        "#);
    }

    #[test]
    fn index_document() {
        let index = vec![
            SitemapIndexEntry {
                name: "sitemap-core.xml".into(),
                loc: "https://www.example.com/sitemap-core.xml".into(),
                lastmod: date(1, 20),
            },
            SitemapIndexEntry {
                name: "sitemap-locations-2.xml".into(),
                loc: "https://www.example.com/sitemap-locations-2.xml".into(),
                lastmod: date(1, 15),
            },
        ];
        insta::assert_snapshot!(render_index(&index).trim_end(), @r#"
        <?xml version="1.0" encoding="UTF-8"?>
        <sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
          <sitemap>
            <loc>https://www.example.com/sitemap-core.xml</loc>
            <lastmod>2025-01-20</lastmod>
          </sitemap>
          <sitemap>
            <loc>https://www.example.com/sitemap-locations-2.xml</loc>
            <lastmod>2025-01-15</lastmod>
          </sitemap>
        </sitemapindex>
        "#);
    }

    #[test]
    fn escape_entities() {
        assert_eq!(escape(r#"a&b<c>"d'"#), "a&amp;b&lt;c&gt;&quot;d&apos;");
    }
}

//! RSS and Atom feed parsing.
//!
//! The root element decides the format: `<rss>` and `<rdf:RDF>` documents
//! are read with the `rss` crate, `<feed>` documents with
//! `atom_syndication`. Only the fields the article transformer needs are
//! kept: channel title, and per item the link, title and publish/update
//! timestamps.

use chrono::{DateTime, FixedOffset};
use quick_xml::Reader;
use quick_xml::events::Event;

/// The parts of a feed the article transformer consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFeed {
    pub title: String,
    pub items: Vec<FeedItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub link: String,
    pub title: String,
    pub published: Option<DateTime<FixedOffset>>,
    pub updated: Option<DateTime<FixedOffset>>,
}

/// Parse an RSS (0.9x, 1.0, 2.0) or Atom document.
///
/// # Errors
///
/// Returns a description of the problem when the document is not well-formed
/// XML or has an unsupported root element.
pub fn parse_feed(xml: &str) -> Result<ParsedFeed, String> {
    match root_element(xml)?.as_str() {
        "rss" | "RDF" => {
            let channel = rss::Channel::read_from(xml.as_bytes()).map_err(|e| e.to_string())?;
            Ok(from_channel(&channel))
        }
        "feed" => {
            let feed =
                atom_syndication::Feed::read_from(xml.as_bytes()).map_err(|e| e.to_string())?;
            Ok(from_atom(&feed))
        }
        other => Err(format!("unsupported feed root element <{other}>")),
    }
}

fn from_channel(channel: &rss::Channel) -> ParsedFeed {
    ParsedFeed {
        title: channel.title().trim().to_string(),
        items: channel
            .items()
            .iter()
            .map(|item| FeedItem {
                link: item.link().unwrap_or_default().trim().to_string(),
                title: item.title().unwrap_or_default().trim().to_string(),
                published: item
                    .pub_date()
                    .and_then(parse_timestamp)
                    .or_else(|| dc_date(item)),
                updated: None,
            })
            .collect(),
    }
}

/// `dc:date` of an item, used when `pubDate` is absent (RSS 1.0 feeds).
fn dc_date(item: &rss::Item) -> Option<DateTime<FixedOffset>> {
    if let Some(date) = item
        .dublin_core_ext()
        .and_then(|dc| dc.dates().iter().find_map(|d| parse_timestamp(d)))
    {
        return Some(date);
    }
    // Without the namespace declaration the element stays a raw extension.
    item.extensions()
        .get("dc")
        .and_then(|ext| ext.get("date"))
        .and_then(|values| values.iter().find_map(|v| v.value().and_then(parse_timestamp)))
}

fn from_atom(feed: &atom_syndication::Feed) -> ParsedFeed {
    ParsedFeed {
        title: feed.title().as_str().trim().to_string(),
        items: feed
            .entries()
            .iter()
            .map(|entry| FeedItem {
                link: alternate_link(entry.links()),
                title: entry.title().as_str().trim().to_string(),
                published: entry.published().copied(),
                // A missing <updated> reads back as the Unix epoch.
                updated: Some(*entry.updated()).filter(|d| d.timestamp() != 0),
            })
            .collect(),
    }
}

fn root_element(xml: &str) -> Result<String, String> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                return Ok(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Ok(Event::Eof) => return Err("document has no root element".to_string()),
            Ok(_) => continue,
            Err(e) => return Err(e.to_string()),
        }
    }
}

/// Atom entries may carry several links; prefer `rel="alternate"`.
fn alternate_link(links: &[atom_syndication::Link]) -> String {
    links
        .iter()
        .find(|l| l.rel() == "alternate")
        .or_else(|| links.first())
        .map(|l| l.href().trim().to_string())
        .unwrap_or_default()
}

/// RSS uses RFC 2822 dates, Atom and Dublin Core use RFC 3339; accept either.
fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
}

//! Presenting created links

use core::fmt;

use url::Url;

use crate::links::LinkRecord;
use crate::page::LinkList;

/// Separator between the short link and its destination
const SEPARATOR: &str = " -> ";

/// A link shown with its URL as text
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Anchor {
    pub href: String,
    pub text: String,
}

impl Anchor {
    fn new(href: String) -> Self {
        Self {
            text: href.clone(),
            href,
        }
    }
}

/// Plain text rendering, the target is only spelled out when it differs
impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.text == self.href {
            f.write_str(&self.text)
        } else {
            write!(f, "{} <{}>", self.text, self.href)
        }
    }
}

/// One entry in the list: short link, separator, destination
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkRow {
    pub short: Anchor,
    pub separator: &'static str,
    pub destination: Anchor,
}

impl fmt::Display for LinkRow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}{}", self.short, self.separator, self.destination)
    }
}

/// Turns created links into list entries
pub struct Presenter {
    origin: Url,
}

impl Presenter {
    pub fn new(origin: Url) -> Self {
        Self { origin }
    }

    /// Short links live at the root of the origin: `/<id>`
    ///
    /// The ID is always a path, even when it looks like a host or query
    fn short_link(&self, id: &str) -> Url {
        let mut url = self.origin.clone();
        url.set_path(&format!("/{id}"));
        url.set_query(None);
        url.set_fragment(None);

        url
    }

    pub fn row(&self, record: &LinkRecord) -> LinkRow {
        LinkRow {
            short: Anchor::new(self.short_link(&record.id).to_string()),
            separator: SEPARATOR,
            destination: Anchor::new(record.destination.clone()),
        }
    }

    /// Put the record on top of the list
    pub fn render(&self, list: &LinkList, record: &LinkRecord) {
        list.prepend(self.row(record));
    }
}

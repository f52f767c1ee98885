use std::io;
use url::Url;

pub trait Opener {
    fn open(&self, url: &Url) -> io::Result<()>;
}

/// Hands the URL to the desktop's default browser.
pub struct BrowserOpener;

impl Opener for BrowserOpener {
    fn open(&self, url: &Url) -> io::Result<()> {
        open::that(url.as_str())
    }
}

//! A minimal scripted browser.
//!
//! Keeps a cookie jar and the current page, follows redirects, and reads
//! links and forms out of the served HTML. Waits poll the page until a
//! condition holds or the configured timeout passes.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::{Client, Response, StatusCode};
use tokio::time::{Instant, sleep};
use tracing::debug;
use url::Url;

use crate::config::WaitConfig;
use crate::error::{E2eError, E2eResult};

static ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<a\b([^>]*)>(.*?)</a>").expect("Invalid regex"));

static FORM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<form\b([^>]*)>(.*?)</form>").expect("Invalid regex"));

static ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([\w-]+)\s*=\s*"([^"]*)""#).expect("Invalid regex"));

static SUBMIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<(?:button|input)\b[^>]*\btype\s*=\s*"submit""#).expect("Invalid regex")
});

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid regex"));

static NUMERIC_ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(x?)([0-9a-fA-F]+);").expect("Invalid regex"));

/// An anchor on the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// The `href` attribute as written.
    pub href: String,
    /// Visible text with tags stripped and whitespace collapsed.
    pub text: String,
    /// `href` resolved against the page URL.
    pub url: Url,
}

/// The first form on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    /// `action` attribute; empty means the page itself.
    pub action: String,
    /// Lowercased `method` attribute, `get` when absent.
    pub method: String,
    body: String,
}

impl Form {
    /// Whether an element with this `id` is inside the form.
    #[must_use]
    pub fn has_element(&self, id: &str) -> bool {
        has_element_id(&self.body, id)
    }

    /// Whether the form has a submit button.
    #[must_use]
    pub fn has_submit(&self) -> bool {
        SUBMIT_RE.is_match(&self.body)
    }
}

#[derive(Debug)]
struct Page {
    url: Url,
    status: StatusCode,
    source: String,
}

/// Scripted browser session.
#[derive(Debug)]
pub struct Browser {
    client: Client,
    wait: WaitConfig,
    page: Option<Page>,
}

impl Browser {
    /// Create a browser with an empty cookie jar.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(wait: WaitConfig) -> E2eResult<Self> {
        let client = Client::builder().cookie_store(true).build()?;
        Ok(Self {
            client,
            wait,
            page: None,
        })
    }

    /// Navigate to a URL, absolute or relative to the current page.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the request fails.
    pub async fn open(&mut self, url: &str) -> E2eResult<()> {
        let target = self.resolve(url)?;
        debug!(url = %target, "open");
        let resp = self.client.get(target).send().await?;
        self.load(resp).await
    }

    /// Source of the current page, empty before the first navigation.
    #[must_use]
    pub fn page_source(&self) -> &str {
        self.page.as_ref().map_or("", |page| page.source.as_str())
    }

    /// URL of the current page after redirects.
    #[must_use]
    pub fn current_url(&self) -> Option<&Url> {
        self.page.as_ref().map(|page| &page.url)
    }

    /// Status code the current page was served with.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        self.page.as_ref().map(|page| page.status)
    }

    /// All anchors on the current page, in document order.
    #[must_use]
    pub fn links(&self) -> Vec<Link> {
        self.page
            .as_ref()
            .map(|page| parse_links(&page.source, &page.url))
            .unwrap_or_default()
    }

    /// Follow the first link matching `predicate`.
    ///
    /// # Errors
    ///
    /// Returns `E2eError::ElementNotFound` if no link matches.
    pub async fn click_link(
        &mut self,
        what: &str,
        predicate: impl Fn(&Link) -> bool,
    ) -> E2eResult<()> {
        let link = self
            .links()
            .into_iter()
            .find(|link| predicate(link))
            .ok_or_else(|| E2eError::ElementNotFound(what.to_string()))?;
        self.open(link.url.as_str()).await
    }

    /// Poll until a link matching `predicate` is on the page.
    ///
    /// # Errors
    ///
    /// Returns `E2eError::Timeout` if no such link appears in time.
    pub async fn wait_for_link(
        &mut self,
        what: &str,
        predicate: impl Fn(&Link) -> bool,
    ) -> E2eResult<Link> {
        let deadline = Instant::now() + self.wait.timeout();
        loop {
            if let Some(link) = self.links().into_iter().find(|link| predicate(link)) {
                return Ok(link);
            }
            self.poll(deadline, what).await?;
            self.reload().await?;
        }
    }

    /// Poll until an element with this `id` is on the page.
    ///
    /// # Errors
    ///
    /// Returns `E2eError::Timeout` if no such element appears in time.
    pub async fn wait_for_element(&mut self, id: &str) -> E2eResult<()> {
        let deadline = Instant::now() + self.wait.timeout();
        loop {
            if has_element_id(self.page_source(), id) {
                return Ok(());
            }
            self.poll(deadline, &format!("#{id}")).await?;
            self.reload().await?;
        }
    }

    /// Poll until the current URL contains `fragment`.
    ///
    /// # Errors
    ///
    /// Returns `E2eError::Timeout` if the URL does not match in time.
    pub async fn wait_for_url_contains(&mut self, fragment: &str) -> E2eResult<()> {
        let deadline = Instant::now() + self.wait.timeout();
        loop {
            if self
                .current_url()
                .is_some_and(|url| url.as_str().contains(fragment))
            {
                return Ok(());
            }
            self.poll(deadline, &format!("URL containing {fragment}"))
                .await?;
        }
    }

    /// Fill and submit the first form on the page.
    ///
    /// Every field name must match the `id` of an element inside the form,
    /// and the form must have a submit button.
    ///
    /// # Errors
    ///
    /// Returns `E2eError::ElementNotFound` for a missing form, field or
    /// button, or an HTTP error if the submission fails.
    pub async fn submit_form(&mut self, fields: &[(&str, &str)]) -> E2eResult<()> {
        let page = self.page.as_ref().ok_or(E2eError::NoPage)?;
        let form = parse_first_form(&page.source)
            .ok_or_else(|| E2eError::ElementNotFound("form".to_string()))?;

        if let Some((missing, _)) = fields.iter().find(|(name, _)| !form.has_element(name)) {
            return Err(E2eError::ElementNotFound(format!("#{missing}")));
        }
        if !form.has_submit() {
            return Err(E2eError::ElementNotFound("submit button".to_string()));
        }

        let mut action = page.url.join(&form.action)?;
        debug!(url = %action, method = %form.method, "submit");

        let request = if form.method == "post" {
            self.client.post(action).form(fields)
        } else {
            action.query_pairs_mut().clear().extend_pairs(fields);
            self.client.get(action)
        };
        let resp = request.send().await?;
        self.load(resp).await
    }

    /// Fail unless the current page contains `text`.
    ///
    /// # Errors
    ///
    /// Returns `E2eError::AssertionFailed` naming `message`.
    pub fn assert_contains(&self, text: &str, message: &str) -> E2eResult<()> {
        if self.page_source().contains(text) {
            Ok(())
        } else {
            Err(E2eError::AssertionFailed(format!(
                "{message} (expected {text:?})"
            )))
        }
    }

    async fn reload(&mut self) -> E2eResult<()> {
        let url = self.current_url().ok_or(E2eError::NoPage)?.clone();
        let resp = self.client.get(url).send().await?;
        self.load(resp).await
    }

    async fn load(&mut self, resp: Response) -> E2eResult<()> {
        let url = resp.url().clone();
        let status = resp.status();
        let source = resp.text().await?;
        debug!(url = %url, status = %status, bytes = source.len(), "loaded");
        self.page = Some(Page {
            url,
            status,
            source,
        });
        Ok(())
    }

    async fn poll(&self, deadline: Instant, what: &str) -> E2eResult<()> {
        if Instant::now() >= deadline {
            return Err(E2eError::Timeout(what.to_string()));
        }
        sleep(self.wait.poll_interval()).await;
        Ok(())
    }

    fn resolve(&self, url: &str) -> E2eResult<Url> {
        match self.current_url() {
            Some(base) => Ok(base.join(url)?),
            None => Ok(Url::parse(url)?),
        }
    }
}

/// Whether the markup has an element with this `id`.
fn has_element_id(html: &str, id: &str) -> bool {
    html.contains(&format!("id=\"{id}\"")) || html.contains(&format!("id='{id}'"))
}

fn attributes(raw: &str) -> impl Iterator<Item = (String, String)> + '_ {
    ATTR_RE.captures_iter(raw).map(|cap| {
        (
            cap[1].to_ascii_lowercase(),
            decode_entities(&cap[2]),
        )
    })
}

fn attribute(raw: &str, name: &str) -> Option<String> {
    attributes(raw).find(|(key, _)| key == name).map(|(_, value)| value)
}

/// Extract anchors that carry an `href`.
#[must_use]
pub fn parse_links(html: &str, base: &Url) -> Vec<Link> {
    ANCHOR_RE
        .captures_iter(html)
        .filter_map(|cap| {
            let href = attribute(&cap[1], "href")?;
            let url = base.join(&href).ok()?;
            let text = TAG_RE.replace_all(&cap[2], "");
            let text = decode_entities(&text)
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            Some(Link { href, text, url })
        })
        .collect()
}

/// Extract the first form on the page.
#[must_use]
pub fn parse_first_form(html: &str) -> Option<Form> {
    let cap = FORM_RE.captures(html)?;
    let attrs = &cap[1];
    Some(Form {
        action: attribute(attrs, "action").unwrap_or_default(),
        method: attribute(attrs, "method")
            .map_or_else(|| "get".to_string(), |m| m.to_ascii_lowercase()),
        body: cap[2].to_string(),
    })
}

/// Decode the character references an HTML escaper produces.
fn decode_entities(text: &str) -> String {
    let numeric = NUMERIC_ENTITY_RE.replace_all(text, |cap: &regex::Captures<'_>| {
        let radix = if cap[1].is_empty() { 10 } else { 16 };
        u32::from_str_radix(&cap[2], radix)
            .ok()
            .and_then(char::from_u32)
            .map_or_else(|| cap[0].to_string(), String::from)
    });

    numeric
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

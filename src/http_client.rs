use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use once_cell::sync::OnceCell;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{AUTHORIZATION, USER_AGENT};

const REQUEST_TIMEOUT_SECS: u64 = 20;

static CLIENT: OnceCell<Client> = OnceCell::new();

pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")
    })
}

const AGENT: &str = concat!("roster_balance/", env!("CARGO_PKG_VERSION"));

/// GETs `url` as text. Non-success statuses become errors carrying the body.
pub fn fetch_text(url: &str, bearer: Option<&str>) -> Result<String> {
    let mut req = http_client()?.get(url).header(USER_AGENT, AGENT);
    if let Some(token) = bearer {
        req = req.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    read_body(req)
}

/// POSTs an url-encoded form and returns the response text.
pub fn post_form(url: &str, form: &[(&str, &str)]) -> Result<String> {
    read_body(http_client()?.post(url).header(USER_AGENT, AGENT).form(form))
}

fn read_body(req: RequestBuilder) -> Result<String> {
    let resp = req.send().context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow!("http {}: {}", status, body));
    }
    Ok(body)
}

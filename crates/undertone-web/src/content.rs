//! Fetching the book behind the reader page.

use anyhow::{anyhow, Context};
use serde::Deserialize;
use undertone_core::Paragraph;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

#[derive(Debug, Deserialize)]
pub struct Book {
    #[serde(default)]
    pub title: Option<String>,
    pub paragraphs: Vec<Paragraph>,
}

pub async fn fetch_book(url: &str) -> anyhow::Result<Book> {
    let window = web::window().ok_or_else(|| anyhow!("no window"))?;
    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| anyhow!("fetch of {url} failed: {e:?}"))?;
    let response: web::Response = response
        .dyn_into()
        .map_err(|e| anyhow!("fetch returned a non-Response value: {e:?}"))?;
    if !response.ok() {
        return Err(anyhow!("content request failed with status {}", response.status()));
    }
    let body = JsFuture::from(response.text().map_err(|e| anyhow!("{e:?}"))?)
        .await
        .map_err(|e| anyhow!("body read failed: {e:?}"))?;
    let body = body.as_string().ok_or_else(|| anyhow!("body is not text"))?;
    let book: Book = serde_json::from_str(&body).context("malformed content JSON")?;
    Ok(book)
}

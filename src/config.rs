//! Frontend Configuration
//!
//! Compile-time defaults from [`BoardConfig`], with the API URL optionally
//! taken from `<meta name="task-board-api" content="...">` in the host page.

use board_sync::BoardConfig;
use log::info;

const API_META_SELECTOR: &str = "meta[name=\"task-board-api\"]";

pub fn load() -> BoardConfig {
    let config = BoardConfig::default();
    match meta_api_url() {
        Some(url) => {
            info!("API URL from page meta: {url}");
            config.with_api_url(url)
        }
        None => config,
    }
}

fn meta_api_url() -> Option<String> {
    let document = web_sys::window()?.document()?;
    let meta = document.query_selector(API_META_SELECTOR).ok()??;
    let content = meta.get_attribute("content")?;
    let content = content.trim();
    (!content.is_empty()).then(|| content.to_string())
}
